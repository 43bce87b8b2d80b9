//! Expression row editor domain.
//!
//! The editor always holds at least one row. Blurring the last row while it
//! has text appends a fresh empty row; clearing a non-last row's text removes
//! it. Text and the enabled flag live in row-local `Mutable`s so keystrokes
//! don't rebuild the row element; structural changes (add/remove/replace) go
//! through the `ActorVec`.

use crate::dataflow::{Actor, ActorVec, Relay, relay};
use futures::{StreamExt, select};
use shared::SnapshotExpression;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use zoon::*;

/// Stroke colors assigned to new rows, round-robin.
pub const ROW_COLOR_PALETTE: [&str; 8] = [
    "#4fc3f7", "#ff8a65", "#aed581", "#ba68c8", "#ffd54f", "#4db6ac", "#f06292", "#90a4ae",
];

#[derive(Clone, Debug)]
pub struct ExpressionRow {
    pub id: u64,
    pub text: Mutable<String>,
    pub enabled: Mutable<bool>,
    pub color: String,
}

impl ExpressionRow {
    fn new(id: u64, color: String, text: String) -> Self {
        Self {
            id,
            text: Mutable::new(text),
            enabled: Mutable::new(true),
            color,
        }
    }

    pub fn text_now(&self) -> String {
        self.text.get_cloned()
    }

    pub fn is_blank(&self) -> bool {
        self.text.lock_ref().trim().is_empty()
    }

    pub fn enabled_now(&self) -> bool {
        self.enabled.get()
    }
}

pub fn palette_color(index: usize) -> String {
    ROW_COLOR_PALETTE[index % ROW_COLOR_PALETTE.len()].to_string()
}

#[derive(Clone)]
pub struct ExpressionRows {
    pub rows: ActorVec<ExpressionRow>,
    /// Bumped whenever plot-relevant state changed; the plotter diffs rows on
    /// every bump.
    pub revision: Actor<u64>,

    pub row_edited_relay: Relay<u64>,
    pub row_blurred_relay: Relay<u64>,
    pub row_toggled_relay: Relay<u64>,
    pub snapshot_restored_relay: Relay<Vec<SnapshotExpression>>,
}

impl ExpressionRows {
    pub async fn new() -> Self {
        let (row_edited_relay, mut row_edited_stream) = relay::<u64>();
        let (row_blurred_relay, mut row_blurred_stream) = relay::<u64>();
        let (row_toggled_relay, mut row_toggled_stream) = relay::<u64>();
        let (snapshot_restored_relay, mut snapshot_restored_stream) =
            relay::<Vec<SnapshotExpression>>();
        let (revision_bumped_relay, mut revision_bumped_stream) = relay::<()>();

        let next_id = Arc::new(AtomicU64::new(0));

        let revision = Actor::new(0_u64, async move |state| {
            while let Some(()) = revision_bumped_stream.next().await {
                let current = state.get_cloned();
                state.set(current + 1);
            }
        });

        let seed_row =
            ExpressionRow::new(next_id.fetch_add(1, Ordering::Relaxed), palette_color(0), String::new());
        let rows = ActorVec::new(vec![seed_row], {
            let next_id = next_id.clone();
            let revision_bumped_relay = revision_bumped_relay.clone();
            async move |rows| {
                loop {
                    select! {
                        id = row_edited_stream.next() => {
                            match id {
                                Some(id) => {
                                    let snapshot = rows.snapshot();
                                    let is_last = snapshot.last().map(|row| row.id) == Some(id);
                                    let blank = snapshot
                                        .iter()
                                        .find(|row| row.id == id)
                                        .is_some_and(|row| row.is_blank());
                                    if blank && !is_last && snapshot.len() > 1 {
                                        rows.retain(|row| row.id != id);
                                    } else if is_last && !blank {
                                        // Typing into the trailing row opens a new one.
                                        let id = next_id.fetch_add(1, Ordering::Relaxed);
                                        rows.push_cloned(ExpressionRow::new(
                                            id,
                                            palette_color(id as usize),
                                            String::new(),
                                        ));
                                    }
                                    if rows.is_empty() {
                                        let id = next_id.fetch_add(1, Ordering::Relaxed);
                                        rows.push_cloned(ExpressionRow::new(
                                            id,
                                            palette_color(id as usize),
                                            String::new(),
                                        ));
                                    }
                                    revision_bumped_relay.send(());
                                }
                                None => break,
                            }
                        }
                        id = row_blurred_stream.next() => {
                            match id {
                                Some(id) => {
                                    let snapshot = rows.snapshot();
                                    let last_with_text = snapshot
                                        .last()
                                        .is_some_and(|row| row.id == id && !row.is_blank());
                                    if last_with_text {
                                        let id = next_id.fetch_add(1, Ordering::Relaxed);
                                        rows.push_cloned(ExpressionRow::new(
                                            id,
                                            palette_color(id as usize),
                                            String::new(),
                                        ));
                                    }
                                }
                                None => break,
                            }
                        }
                        id = row_toggled_stream.next() => {
                            match id {
                                Some(id) => {
                                    if let Some(row) =
                                        rows.snapshot().iter().find(|row| row.id == id)
                                    {
                                        let enabled = row.enabled.get();
                                        row.enabled.set(!enabled);
                                    }
                                    revision_bumped_relay.send(());
                                }
                                None => break,
                            }
                        }
                        restored = snapshot_restored_stream.next() => {
                            match restored {
                                Some(expressions) => {
                                    let mut replacement: Vec<ExpressionRow> = expressions
                                        .into_iter()
                                        .filter(|expression| !expression.text.trim().is_empty())
                                        .map(|expression| {
                                            ExpressionRow::new(
                                                next_id.fetch_add(1, Ordering::Relaxed),
                                                expression.color,
                                                expression.text,
                                            )
                                        })
                                        .collect();
                                    // Always end with an empty row ready for input.
                                    let id = next_id.fetch_add(1, Ordering::Relaxed);
                                    replacement.push(ExpressionRow::new(
                                        id,
                                        palette_color(id as usize),
                                        String::new(),
                                    ));
                                    rows.replace_cloned(replacement);
                                    revision_bumped_relay.send(());
                                }
                                None => break,
                            }
                        }
                        complete => break,
                    }
                }
            }
        });

        Self {
            rows,
            revision,
            row_edited_relay,
            row_blurred_relay,
            row_toggled_relay,
            snapshot_restored_relay,
        }
    }

    /// Rows worth plotting: enabled with non-blank text.
    pub fn plottable_rows(&self) -> Vec<ExpressionRow> {
        self.rows
            .snapshot()
            .into_iter()
            .filter(|row| row.enabled_now() && !row.is_blank())
            .collect()
    }

    /// Rows worth saving into a history snapshot.
    pub fn snapshot_expressions(&self) -> Vec<SnapshotExpression> {
        self.rows
            .snapshot()
            .into_iter()
            .filter(|row| !row.is_blank())
            .map(|row| SnapshotExpression {
                text: row.text_now(),
                color: row.color.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle() {
        tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn starts_with_one_empty_row() {
        let rows = ExpressionRows::new().await;
        settle().await;
        let snapshot = rows.rows.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].is_blank());
    }

    #[tokio::test]
    async fn blur_on_last_row_with_text_appends_empty_row() {
        let rows = ExpressionRows::new().await;
        settle().await;

        let first = rows.rows.snapshot()[0].clone();
        first.text.set("sin(x)".to_string());
        rows.row_blurred_relay.send(first.id);
        settle().await;

        let snapshot = rows.rows.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].text_now(), "sin(x)");
        assert!(snapshot[1].is_blank());
    }

    #[tokio::test]
    async fn typing_into_last_row_appends_empty_row() {
        let rows = ExpressionRows::new().await;
        settle().await;

        let first = rows.rows.snapshot()[0].clone();
        first.text.set("x".to_string());
        rows.row_edited_relay.send(first.id);
        settle().await;

        let snapshot = rows.rows.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot[1].is_blank());

        // A later blur on the same row must not append another one.
        rows.row_blurred_relay.send(first.id);
        settle().await;
        assert_eq!(rows.rows.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn blur_on_non_last_row_does_not_append() {
        let rows = ExpressionRows::new().await;
        settle().await;

        let first = rows.rows.snapshot()[0].clone();
        first.text.set("x".to_string());
        rows.row_blurred_relay.send(first.id);
        settle().await;
        assert_eq!(rows.rows.snapshot().len(), 2);

        // The first row is no longer last, so blurring it appends nothing.
        rows.row_blurred_relay.send(first.id);
        settle().await;
        assert_eq!(rows.rows.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn clearing_non_last_row_removes_it() {
        let rows = ExpressionRows::new().await;
        settle().await;

        let first = rows.rows.snapshot()[0].clone();
        first.text.set("x^2".to_string());
        rows.row_blurred_relay.send(first.id);
        settle().await;
        assert_eq!(rows.rows.snapshot().len(), 2);

        first.text.set(String::new());
        rows.row_edited_relay.send(first.id);
        settle().await;

        let snapshot = rows.rows.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].is_blank());
        assert_ne!(snapshot[0].id, first.id);
    }

    #[tokio::test]
    async fn clearing_the_only_row_keeps_it() {
        let rows = ExpressionRows::new().await;
        settle().await;

        let first = rows.rows.snapshot()[0].clone();
        first.text.set("1/x".to_string());
        first.text.set(String::new());
        rows.row_edited_relay.send(first.id);
        settle().await;

        let snapshot = rows.rows.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, first.id);
    }

    #[tokio::test]
    async fn toggle_flips_enabled_and_bumps_revision() {
        let rows = ExpressionRows::new().await;
        settle().await;

        let first = rows.rows.snapshot()[0].clone();
        assert!(first.enabled_now());
        rows.row_toggled_relay.send(first.id);
        settle().await;
        assert!(!rows.rows.snapshot()[0].enabled_now());
    }

    #[tokio::test]
    async fn restore_replaces_rows_and_appends_blank() {
        let rows = ExpressionRows::new().await;
        settle().await;

        rows.snapshot_restored_relay.send(vec![
            SnapshotExpression {
                text: "cos(x)".to_string(),
                color: "#4fc3f7".to_string(),
            },
            SnapshotExpression {
                text: "x^3".to_string(),
                color: "#ff8a65".to_string(),
            },
        ]);
        settle().await;

        let snapshot = rows.rows.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].text_now(), "cos(x)");
        assert_eq!(snapshot[1].text_now(), "x^3");
        assert!(snapshot[2].is_blank());
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(palette_color(0), ROW_COLOR_PALETTE[0]);
        assert_eq!(palette_color(8), ROW_COLOR_PALETTE[0]);
        assert_eq!(palette_color(9), ROW_COLOR_PALETTE[1]);
    }
}
