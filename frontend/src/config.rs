//! Application configuration persisted in browser local storage.

use crate::browser::local_storage;
use crate::dataflow::{Actor, Relay, relay};
use futures::{StreamExt, select};
use gloo_timers::callback::Timeout;
use serde::{Deserialize, Serialize};
use shared::Theme;
use std::cell::RefCell;
use std::rc::Rc;
use zoon::*;

const STORAGE_KEY: &str = "graphcalc_config";
const SAVE_DEBOUNCE_MS: u32 = 1_000;

pub const DEFAULT_EDITOR_PANEL_WIDTH: f32 = 320.0;
pub const MIN_EDITOR_PANEL_WIDTH: f32 = 240.0;
pub const MAX_EDITOR_PANEL_WIDTH: f32 = 560.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
struct StoredConfig {
    theme: Theme,
    editor_panel_width: f32,
    history_panel_open: bool,
    toast_dismiss_ms: u32,
}

impl Default for StoredConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            editor_panel_width: DEFAULT_EDITOR_PANEL_WIDTH,
            history_panel_open: false,
            toast_dismiss_ms: 5_000,
        }
    }
}

fn load_stored() -> StoredConfig {
    local_storage()
        .and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten())
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

fn persist(config: &StoredConfig) {
    if let Some(storage) = local_storage() {
        if let Ok(raw) = serde_json::to_string(config) {
            let _ = storage.set_item(STORAGE_KEY, &raw);
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub theme_actor: Actor<Theme>,
    pub editor_panel_width_actor: Actor<f32>,
    pub history_panel_open_actor: Actor<bool>,
    pub toast_dismiss_ms_actor: Actor<u32>,

    pub theme_toggle_requested_relay: Relay<()>,
    pub editor_panel_width_changed_relay: Relay<f32>,
    pub history_panel_toggled_relay: Relay<()>,
}

impl AppConfig {
    pub async fn new() -> Self {
        let stored = load_stored();

        let (theme_toggle_requested_relay, mut theme_toggle_stream) = relay::<()>();
        let (editor_panel_width_changed_relay, mut panel_width_stream) = relay::<f32>();
        let (history_panel_toggled_relay, mut history_toggle_stream) = relay::<()>();

        let theme_actor = Actor::new(stored.theme, async move |state| {
            while let Some(()) = theme_toggle_stream.next().await {
                let toggled = match state.get_cloned() {
                    Theme::Dark => Theme::Light,
                    Theme::Light => Theme::Dark,
                };
                state.set(toggled);
            }
        });

        let editor_panel_width_actor =
            Actor::new(stored.editor_panel_width, async move |state| {
                while let Some(width) = panel_width_stream.next().await {
                    state.set_neq(width.clamp(MIN_EDITOR_PANEL_WIDTH, MAX_EDITOR_PANEL_WIDTH));
                }
            });

        let history_panel_open_actor = Actor::new(stored.history_panel_open, async move |state| {
            while let Some(()) = history_toggle_stream.next().await {
                let open = state.get_cloned();
                state.set(!open);
            }
        });

        let toast_dismiss_ms_actor =
            Actor::new(stored.toast_dismiss_ms, |_state| async move {});

        let config = Self {
            theme_actor,
            editor_panel_width_actor,
            history_panel_open_actor,
            toast_dismiss_ms_actor,
            theme_toggle_requested_relay,
            editor_panel_width_changed_relay,
            history_panel_toggled_relay,
        };
        config.spawn_persistence();
        config
    }

    /// Write the whole config snapshot behind a debounce whenever any of the
    /// persisted values change.
    fn spawn_persistence(&self) {
        let theme = self.theme_actor.clone();
        let width = self.editor_panel_width_actor.clone();
        let history_open = self.history_panel_open_actor.clone();
        let dismiss = self.toast_dismiss_ms_actor.clone();

        Task::start(async move {
            let save_debounce: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
            let mut snapshots = map_ref! {
                let theme = theme.signal(),
                let editor_panel_width = width.signal(),
                let history_panel_open = history_open.signal(),
                let toast_dismiss_ms = dismiss.signal() =>
                StoredConfig {
                    theme: *theme,
                    editor_panel_width: *editor_panel_width,
                    history_panel_open: *history_panel_open,
                    toast_dismiss_ms: *toast_dismiss_ms,
                }
            }
            .to_stream()
            .fuse();

            loop {
                select! {
                    snapshot = snapshots.next() => {
                        match snapshot {
                            Some(snapshot) => {
                                if let Some(timer) = save_debounce.borrow_mut().take() {
                                    timer.cancel();
                                }
                                let slot = save_debounce.clone();
                                let timeout = Timeout::new(SAVE_DEBOUNCE_MS, move || {
                                    *slot.borrow_mut() = None;
                                    persist(&snapshot);
                                });
                                *save_debounce.borrow_mut() = Some(timeout);
                            }
                            None => break,
                        }
                    }
                    complete => break,
                }
            }
        });
    }
}

/// Background and foreground palette for the current theme.
pub fn theme_colors(theme: Theme) -> ThemeColors {
    match theme {
        Theme::Dark => ThemeColors {
            page_background: "rgb(13, 13, 13)",
            panel_background: "rgb(30, 32, 36)",
            panel_border: "rgb(55, 58, 64)",
            text_primary: "rgb(240, 240, 240)",
            text_muted: "rgb(150, 155, 160)",
            canvas_background: "#101114",
            grid_line: "rgba(255, 255, 255, 0.08)",
            axis_line: "rgba(255, 255, 255, 0.45)",
            axis_label: "#9aa0a6",
            error_text: "rgb(240, 110, 110)",
        },
        Theme::Light => ThemeColors {
            page_background: "rgb(250, 250, 250)",
            panel_background: "rgb(255, 255, 255)",
            panel_border: "rgb(220, 222, 226)",
            text_primary: "rgb(25, 25, 25)",
            text_muted: "rgb(110, 115, 120)",
            canvas_background: "#ffffff",
            grid_line: "rgba(0, 0, 0, 0.08)",
            axis_line: "rgba(0, 0, 0, 0.45)",
            axis_label: "#5f6368",
            error_text: "rgb(200, 45, 45)",
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeColors {
    pub page_background: &'static str,
    pub panel_background: &'static str,
    pub panel_border: &'static str,
    pub text_primary: &'static str,
    pub text_muted: &'static str,
    pub canvas_background: &'static str,
    pub grid_line: &'static str,
    pub axis_line: &'static str,
    pub axis_label: &'static str,
    pub error_text: &'static str,
}
