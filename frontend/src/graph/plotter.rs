//! Plotter domain: owns the viewport, the per-row interval caches and the
//! debounced backfill requests against the evaluation service.
//!
//! View changes repaint immediately; fetching is debounced (~50 ms) so a
//! wheel burst or a drag doesn't turn into a request storm. Each enabled
//! non-blank row fetches its own missing sub-ranges independently; fragments
//! are merged additively when they arrive. A per-row generation counter keeps
//! fragments of an outdated expression text from ever landing in the cache.

use crate::api::{self, ApiError};
use crate::auth::AuthSession;
use crate::dataflow::{Actor, Relay, relay};
use crate::expressions::{ExpressionRow, ExpressionRows};
use crate::graph::intervals::{CachedInterval, IntervalCache};
use crate::graph::viewport::Viewport;
use futures::StreamExt;
use gloo_timers::callback::Timeout;
use shared::{EvaluationRange, EvaluationRequest};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use zoon::*;

/// Delay between the last view change and the backfill request.
const REFRESH_DEBOUNCE_MS: u32 = 50;

/// Polylines break where neighbouring samples are farther apart than this
/// many pixels, so separate curve branches don't get joined.
const SEGMENT_GAP_PX: f64 = 10.0;

#[derive(Clone, Debug, Default)]
pub struct RowPlotData {
    pub generation: u64,
    pub cache: IntervalCache,
    pub errors: Vec<String>,
    pub pending_requests: u32,
    text: String,
    enabled: bool,
    color: String,
}

/// Per-render projection of one expression row, in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct RowDrawing {
    pub row_id: u64,
    pub color: String,
    pub segments: Vec<Vec<(f64, f64)>>,
}

#[derive(Clone)]
pub struct GraphPlotter {
    pub viewport: Actor<Viewport>,
    /// Bumped on anything that should repaint the canvas.
    pub repaint: Actor<u64>,
    row_data: Actor<BTreeMap<u64, RowPlotData>>,

    expression_rows: ExpressionRows,
    auth: AuthSession,
    fragments_arrived_relay: Relay<RowFragments>,
    refresh_debounce: Rc<RefCell<Option<Timeout>>>,
}

/// Outcome of one row's evaluation round-trip.
#[derive(Clone, Debug)]
struct RowFragments {
    row_id: u64,
    generation: u64,
    fragments: Vec<CachedInterval>,
    errors: Vec<String>,
}

impl GraphPlotter {
    pub async fn new(expression_rows: ExpressionRows, auth: AuthSession) -> Self {
        let viewport = Actor::new(Viewport::default(), |_state| async move {});
        let repaint = Actor::new(0_u64, |_state| async move {});
        let row_data = Actor::new(BTreeMap::new(), |_state| async move {});
        let (fragments_arrived_relay, fragments_arrived_stream) = relay::<RowFragments>();

        let plotter = Self {
            viewport,
            repaint,
            row_data,
            expression_rows,
            auth,
            fragments_arrived_relay,
            refresh_debounce: Rc::new(RefCell::new(None)),
        };

        plotter.spawn_rows_listener();
        plotter.spawn_fragments_listener(fragments_arrived_stream);
        plotter.sync_rows();
        plotter.schedule_refresh();

        plotter
    }

    // ===== VIEW MANIPULATION =====

    pub fn zoom_at(&self, canvas_x: f64, canvas_y: f64, factor: f64) {
        let mut viewport = self.viewport.state.get_cloned();
        viewport.zoom_at(
            crate::graph::viewport::CanvasPoint::new(canvas_x, canvas_y),
            factor,
        );
        self.viewport.state.set(viewport);
        self.bump_repaint();
        self.schedule_refresh();
    }

    pub fn zoom_centered(&self, factor: f64) {
        let mut viewport = self.viewport.state.get_cloned();
        viewport.zoom_centered(factor);
        self.viewport.state.set(viewport);
        self.bump_repaint();
        self.schedule_refresh();
    }

    pub fn pan_by_pixels(&self, delta_x: f64, delta_y: f64) {
        let mut viewport = self.viewport.state.get_cloned();
        viewport.pan_by_pixels(delta_x, delta_y);
        self.viewport.state.set(viewport);
        self.bump_repaint();
        self.schedule_refresh();
    }

    pub fn canvas_resized(&self, width: f64, height: f64) {
        let mut viewport = self.viewport.state.get_cloned();
        viewport.resized(width, height);
        self.viewport.state.set(viewport);
        self.bump_repaint();
        self.schedule_refresh();
    }

    pub fn reset_view(&self) {
        let mut viewport = self.viewport.state.get_cloned();
        viewport.reset();
        self.viewport.state.set(viewport);
        self.bump_repaint();
        self.schedule_refresh();
    }

    // ===== SIGNALS FOR THE UI =====

    pub fn errors_signal(&self, row_id: u64) -> impl Signal<Item = Vec<String>> + use<> {
        self.row_data.signal_ref(move |map| {
            map.get(&row_id)
                .map(|data| data.errors.clone())
                .unwrap_or_default()
        })
    }

    pub fn loading_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.row_data
            .signal_ref(|map| map.values().any(|data| data.pending_requests > 0))
    }

    /// Current drawing sets, filtered to the view window and sorted by x.
    pub fn drawing_sets(&self) -> Vec<RowDrawing> {
        let viewport = self.viewport.state.get_cloned();
        let window = viewport.view_window();
        let max_gap = SEGMENT_GAP_PX / viewport.scale;
        let map = self.row_data.state.lock_ref();
        map.iter()
            .filter(|(_, data)| data.enabled && !data.text.is_empty())
            .map(|(row_id, data)| RowDrawing {
                row_id: *row_id,
                color: data.color.clone(),
                segments: split_into_segments(
                    data.cache.points_within(window.origin, window.bound),
                    max_gap,
                ),
            })
            .collect()
    }

    // ===== ROW SYNCHRONIZATION =====

    fn spawn_rows_listener(&self) {
        let plotter = self.clone();
        Task::start(async move {
            let mut revision_stream = plotter.expression_rows.revision.signal().to_stream().fuse();
            while revision_stream.next().await.is_some() {
                plotter.sync_rows();
                plotter.bump_repaint();
                plotter.schedule_refresh();
            }
        });
    }

    /// Diff the editor rows against the plot map: new rows get an entry, an
    /// edited text invalidates the whole cache and bumps the generation,
    /// removed rows are dropped.
    fn sync_rows(&self) {
        let rows = self.expression_rows.rows.snapshot();
        let mut map = self.row_data.state.lock_mut();

        map.retain(|row_id, _| rows.iter().any(|row| row.id == *row_id));

        for row in &rows {
            let text = row.text_now().trim().to_string();
            let entry = map.entry(row.id).or_insert_with(|| RowPlotData {
                color: row.color.clone(),
                ..RowPlotData::default()
            });
            entry.enabled = row.enabled_now();
            entry.color = row.color.clone();
            if entry.text != text {
                entry.text = text;
                entry.generation += 1;
                entry.cache.clear();
                entry.errors.clear();
            }
        }
    }

    // ===== BACKFILL =====

    fn schedule_refresh(&self) {
        if let Some(timer) = self.refresh_debounce.borrow_mut().take() {
            timer.cancel();
        }
        let debounce_slot = self.refresh_debounce.clone();
        let plotter = self.clone();
        let timeout = Timeout::new(REFRESH_DEBOUNCE_MS, move || {
            *debounce_slot.borrow_mut() = None;
            plotter.refresh();
        });
        *self.refresh_debounce.borrow_mut() = Some(timeout);
    }

    /// Fetch whatever the visible x-range is missing, one request per row.
    fn refresh(&self) {
        let viewport = self.viewport.state.get_cloned();
        let window = viewport.view_window();
        if !(window.origin.is_finite() && window.bound.is_finite()) {
            return;
        }
        let step = 1.0 / viewport.scale;

        let rows: Vec<ExpressionRow> = self.expression_rows.plottable_rows();
        for row in rows {
            let (generation, missing) = {
                let mut map = self.row_data.state.lock_mut();
                let Some(data) = map.get_mut(&row.id) else {
                    continue;
                };
                let missing = data.cache.missing_ranges(window.origin, window.bound);
                if missing.is_empty() {
                    continue;
                }
                data.pending_requests += 1;
                (data.generation, missing)
            };

            let request = EvaluationRequest {
                expression: row.text_now().trim().to_string(),
                ranges: missing
                    .iter()
                    .map(|&(from, to)| EvaluationRange { from, to, step })
                    .collect(),
            };

            let fragments_arrived_relay = self.fragments_arrived_relay.clone();
            let session_expired_relay = self.auth.session_expired_relay.clone();
            let row_id = row.id;
            Task::start(async move {
                let mut fragments = Vec::new();
                let mut errors = Vec::new();
                match api::evaluate(&request).await {
                    Ok(response) => {
                        for result in response.results {
                            match (result.output, result.error) {
                                (Some(output), None) => {
                                    let points = shared::drawing::parse_points_sorted(&output);
                                    fragments.push(CachedInterval::new(
                                        result.from,
                                        result.to,
                                        points,
                                    ));
                                }
                                (_, Some(error)) => errors.push(error),
                                (None, None) => {
                                    // Nothing came back for the sub-range;
                                    // leave it uncached so a later pass retries.
                                }
                            }
                        }
                    }
                    Err(ApiError::AuthRequired) => {
                        session_expired_relay.send(());
                        return;
                    }
                    Err(error) => errors.push(error.to_string()),
                }
                fragments_arrived_relay.send(RowFragments {
                    row_id,
                    generation,
                    fragments,
                    errors,
                });
            });
        }
    }

    fn spawn_fragments_listener(
        &self,
        fragments_stream: impl futures::Stream<Item = RowFragments> + Unpin + 'static,
    ) {
        let plotter = self.clone();
        Task::start(async move {
            let mut stream = fragments_stream.fuse();
            while let Some(arrived) = stream.next().await {
                plotter.apply_fragments(arrived);
            }
        });
    }

    fn apply_fragments(&self, arrived: RowFragments) {
        {
            let mut map = self.row_data.state.lock_mut();
            let Some(data) = map.get_mut(&arrived.row_id) else {
                return;
            };
            data.pending_requests = data.pending_requests.saturating_sub(1);
            // The row's text changed while this request was in flight.
            if data.generation != arrived.generation {
                return;
            }
            for fragment in arrived.fragments {
                data.cache.insert(fragment);
            }
            data.errors.extend(arrived.errors);
        }
        self.bump_repaint();
    }

    fn bump_repaint(&self) {
        let current = self.repaint.state.get_cloned();
        self.repaint.state.set(current.wrapping_add(1));
    }
}

/// Break a sorted point run into polyline segments at oversized x-gaps and
/// non-finite samples.
pub fn split_into_segments(points: Vec<(f64, f64)>, max_gap: f64) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for point in points {
        if !(point.0.is_finite() && point.1.is_finite()) {
            if current.len() > 1 {
                segments.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            continue;
        }
        if let Some(last) = current.last() {
            if point.0 - last.0 > max_gap {
                if current.len() > 1 {
                    segments.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
        }
        current.push(point);
    }
    if current.len() > 1 {
        segments.push(current);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_large_gaps() {
        let points = vec![(0.0, 0.0), (0.1, 0.1), (5.0, 5.0), (5.1, 5.1)];
        let segments = split_into_segments(points, 1.0);
        assert_eq!(
            segments,
            vec![
                vec![(0.0, 0.0), (0.1, 0.1)],
                vec![(5.0, 5.0), (5.1, 5.1)],
            ]
        );
    }

    #[test]
    fn drops_single_point_runs() {
        let points = vec![(0.0, 0.0), (5.0, 5.0), (5.1, 5.1)];
        let segments = split_into_segments(points, 1.0);
        assert_eq!(segments, vec![vec![(5.0, 5.0), (5.1, 5.1)]]);
    }

    #[test]
    fn breaks_on_non_finite_samples() {
        let points = vec![(0.0, 0.0), (0.1, 0.2), (0.2, f64::NAN), (0.3, 0.4), (0.4, 0.5)];
        let segments = split_into_segments(points, 1.0);
        assert_eq!(
            segments,
            vec![
                vec![(0.0, 0.0), (0.1, 0.2)],
                vec![(0.3, 0.4), (0.4, 0.5)],
            ]
        );
    }

    #[test]
    fn contiguous_run_stays_single_segment() {
        let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64 * 0.1, 1.0)).collect();
        let segments = split_into_segments(points.clone(), 0.5);
        assert_eq!(segments, vec![points]);
    }
}
