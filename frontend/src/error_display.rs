//! Toast notification domain.
//!
//! Row-scoped evaluation errors render inline under their row and never get
//! here; toasts are for app-level failures (history, account, auth) and the
//! occasional success confirmation.

use crate::dataflow::{ActorVec, Relay, relay};
use futures::{StreamExt, select};
use std::sync::atomic::{AtomicU64, Ordering};
use zoon::*;

static TOAST_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AlertVariant {
    #[default]
    Error,
    Info,
    Success,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ErrorAlert {
    pub id: u64,
    pub title: String,
    pub message: String,
    /// Raw error for the console; the `message` stays user-presentable.
    pub technical_error: String,
    pub auto_dismiss_ms: u32,
    pub variant: AlertVariant,
}

impl ErrorAlert {
    fn next_id() -> u64 {
        TOAST_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
    }

    pub fn history_error(action: &str, error: impl std::fmt::Display) -> Self {
        Self {
            id: Self::next_id(),
            title: "History".to_string(),
            message: format!("Could not {action}. Please try again."),
            technical_error: format!("history {action} failed: {error}"),
            auto_dismiss_ms: 5_000,
            variant: AlertVariant::Error,
        }
    }

    pub fn account_error(action: &str, error: impl std::fmt::Display) -> Self {
        Self {
            id: Self::next_id(),
            title: "Account".to_string(),
            message: format!("Could not {action}."),
            technical_error: format!("account {action} failed: {error}"),
            auto_dismiss_ms: 5_000,
            variant: AlertVariant::Error,
        }
    }

    pub fn account_deleted() -> Self {
        Self {
            id: Self::next_id(),
            title: "Account".to_string(),
            message: "Your account was deleted.".to_string(),
            technical_error: String::new(),
            auto_dismiss_ms: 5_000,
            variant: AlertVariant::Info,
        }
    }

    pub fn session_expired() -> Self {
        Self {
            id: Self::next_id(),
            title: "Signed out".to_string(),
            message: "Your session expired. Please sign in again.".to_string(),
            technical_error: "session expired (401/403)".to_string(),
            auto_dismiss_ms: 5_000,
            variant: AlertVariant::Info,
        }
    }

    pub fn snapshot_saved() -> Self {
        Self {
            id: Self::next_id(),
            title: "History".to_string(),
            message: "Snapshot saved.".to_string(),
            technical_error: String::new(),
            auto_dismiss_ms: 3_000,
            variant: AlertVariant::Success,
        }
    }
}

#[derive(Clone)]
pub struct ErrorDisplay {
    pub active_toasts: ActorVec<ErrorAlert>,
    pub toast_added_relay: Relay<ErrorAlert>,
    pub toast_dismissed_relay: Relay<u64>,
}

impl ErrorDisplay {
    pub async fn new(dismiss_ms: crate::dataflow::Actor<u32>) -> Self {
        let (toast_added_relay, mut toast_added_stream) = relay::<ErrorAlert>();
        let (toast_dismissed_relay, mut toast_dismissed_stream) = relay::<u64>();

        let dismiss_relay_for_timers = toast_dismissed_relay.clone();
        let active_toasts = ActorVec::new(vec![], async move |toasts| {
            loop {
                select! {
                    alert = toast_added_stream.next() => {
                        match alert {
                            Some(alert) => {
                                if !alert.technical_error.is_empty() {
                                    zoon::println!("Error: {}", alert.technical_error);
                                }
                                let alert_id = alert.id;
                                // Sticky alerts keep 0; the rest follow config.
                                let dismiss_after = if alert.auto_dismiss_ms > 0 {
                                    dismiss_ms.state.get_cloned()
                                } else {
                                    0
                                };
                                toasts.push_cloned(alert);
                                if dismiss_after > 0 {
                                    let dismiss_relay = dismiss_relay_for_timers.clone();
                                    Task::start(async move {
                                        Timer::sleep(dismiss_after).await;
                                        dismiss_relay.send(alert_id);
                                    });
                                }
                            }
                            None => break,
                        }
                    }
                    dismissed = toast_dismissed_stream.next() => {
                        match dismissed {
                            Some(id) => toasts.retain(|alert| alert.id != id),
                            None => break,
                        }
                    }
                    complete => break,
                }
            }
        });

        Self {
            active_toasts,
            toast_added_relay,
            toast_dismissed_relay,
        }
    }
}
