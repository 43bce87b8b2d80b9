//! Snapshot history domain: save, list, restore and delete expression sets
//! against the external history service.

use crate::api::{self, ApiError};
use crate::auth::AuthSession;
use crate::dataflow::{ActorVec, Atom, Relay, relay};
use crate::error_display::{ErrorAlert, ErrorDisplay};
use crate::expressions::ExpressionRows;
use futures::{StreamExt, select};
use shared::{HistorySnapshot, NewSnapshot};
use zoon::*;

#[derive(Clone)]
pub struct History {
    pub snapshots: ActorVec<HistorySnapshot>,
    pub loading: Atom<bool>,

    pub refresh_requested_relay: Relay<()>,
    pub save_clicked_relay: Relay<()>,
    pub delete_clicked_relay: Relay<u64>,
    pub restore_clicked_relay: Relay<u64>,
}

impl History {
    pub async fn new(
        expression_rows: ExpressionRows,
        auth: AuthSession,
        error_display: ErrorDisplay,
    ) -> Self {
        let (refresh_requested_relay, mut refresh_stream) = relay::<()>();
        let (save_clicked_relay, mut save_stream) = relay::<()>();
        let (delete_clicked_relay, mut delete_stream) = relay::<u64>();
        let (restore_clicked_relay, mut restore_stream) = relay::<u64>();

        let (list_loaded_relay, mut list_loaded_stream) = relay::<Vec<HistorySnapshot>>();
        let (snapshot_saved_relay, mut snapshot_saved_stream) = relay::<HistorySnapshot>();
        let (snapshot_deleted_relay, mut snapshot_deleted_stream) = relay::<u64>();

        let loading = Atom::new(false);

        let snapshots = ActorVec::new(vec![], {
            let expression_rows = expression_rows.clone();
            let auth = auth.clone();
            let error_display = error_display.clone();
            let loading = loading.clone();
            async move |snapshots| {
                loop {
                    select! {
                        event = refresh_stream.next() => {
                            match event {
                                Some(()) => {
                                    loading.set_neq(true);
                                    let list_loaded_relay = list_loaded_relay.clone();
                                    let session_expired_relay = auth.session_expired_relay.clone();
                                    let toast_added_relay = error_display.toast_added_relay.clone();
                                    let loading = loading.clone();
                                    Task::start(async move {
                                        match api::history_list().await {
                                            Ok(list) => list_loaded_relay.send(list),
                                            Err(ApiError::AuthRequired) => {
                                                session_expired_relay.send(());
                                            }
                                            Err(error) => {
                                                toast_added_relay.send(ErrorAlert::history_error(
                                                    "load the snapshot list",
                                                    error,
                                                ));
                                            }
                                        }
                                        loading.set_neq(false);
                                    });
                                }
                                None => break,
                            }
                        }
                        event = save_stream.next() => {
                            match event {
                                Some(()) => {
                                    let expressions = expression_rows.snapshot_expressions();
                                    if expressions.is_empty() {
                                        continue;
                                    }
                                    let snapshot_saved_relay = snapshot_saved_relay.clone();
                                    let session_expired_relay = auth.session_expired_relay.clone();
                                    let toast_added_relay = error_display.toast_added_relay.clone();
                                    Task::start(async move {
                                        let body = NewSnapshot { expressions };
                                        match api::history_save(&body).await {
                                            Ok(saved) => {
                                                snapshot_saved_relay.send(saved);
                                                toast_added_relay.send(ErrorAlert::snapshot_saved());
                                            }
                                            Err(ApiError::AuthRequired) => {
                                                session_expired_relay.send(());
                                            }
                                            Err(error) => {
                                                toast_added_relay.send(ErrorAlert::history_error(
                                                    "save the snapshot",
                                                    error,
                                                ));
                                            }
                                        }
                                    });
                                }
                                None => break,
                            }
                        }
                        id = delete_stream.next() => {
                            match id {
                                Some(id) => {
                                    let snapshot_deleted_relay = snapshot_deleted_relay.clone();
                                    let session_expired_relay = auth.session_expired_relay.clone();
                                    let toast_added_relay = error_display.toast_added_relay.clone();
                                    Task::start(async move {
                                        match api::history_delete(id).await {
                                            Ok(()) => snapshot_deleted_relay.send(id),
                                            Err(ApiError::AuthRequired) => {
                                                session_expired_relay.send(());
                                            }
                                            Err(error) => {
                                                toast_added_relay.send(ErrorAlert::history_error(
                                                    "delete the snapshot",
                                                    error,
                                                ));
                                            }
                                        }
                                    });
                                }
                                None => break,
                            }
                        }
                        id = restore_stream.next() => {
                            match id {
                                Some(id) => {
                                    let restored = snapshots
                                        .snapshot()
                                        .into_iter()
                                        .find(|snapshot| snapshot.id == id);
                                    if let Some(snapshot) = restored {
                                        expression_rows
                                            .snapshot_restored_relay
                                            .send(snapshot.expressions);
                                    }
                                }
                                None => break,
                            }
                        }
                        list = list_loaded_stream.next() => {
                            match list {
                                Some(list) => snapshots.replace_cloned(list),
                                None => break,
                            }
                        }
                        saved = snapshot_saved_stream.next() => {
                            match saved {
                                Some(saved) => {
                                    snapshots.retain(|existing| existing.id != saved.id);
                                    snapshots.push_cloned(saved);
                                }
                                None => break,
                            }
                        }
                        deleted = snapshot_deleted_stream.next() => {
                            match deleted {
                                Some(id) => snapshots.retain(|snapshot| snapshot.id != id),
                                None => break,
                            }
                        }
                        complete => break,
                    }
                }
            }
        });

        Self {
            snapshots,
            loading,
            refresh_requested_relay,
            save_clicked_relay,
            delete_clicked_relay,
            restore_clicked_relay,
        }
    }
}
