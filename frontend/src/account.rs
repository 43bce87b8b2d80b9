//! Authenticated user profile and account deletion.

use crate::api::{self, ApiError};
use crate::auth::AuthSession;
use crate::dataflow::{Actor, Atom, Relay, relay};
use crate::error_display::{ErrorAlert, ErrorDisplay};
use futures::{StreamExt, select};
use shared::UserProfile;
use zoon::*;

#[derive(Clone)]
pub struct Account {
    pub profile: Actor<Option<UserProfile>>,
    pub delete_confirm_open: Atom<bool>,

    pub profile_requested_relay: Relay<()>,
    pub deletion_confirmed_relay: Relay<()>,
}

impl Account {
    pub async fn new(auth: AuthSession, error_display: ErrorDisplay) -> Self {
        let (profile_requested_relay, mut profile_requested_stream) = relay::<()>();
        let (deletion_confirmed_relay, mut deletion_confirmed_stream) = relay::<()>();
        let (profile_loaded_relay, mut profile_loaded_stream) = relay::<UserProfile>();

        let profile = Actor::new(None, {
            let auth = auth.clone();
            let error_display = error_display.clone();
            async move |state| {
                loop {
                    select! {
                        event = profile_requested_stream.next() => {
                            match event {
                                Some(()) => {
                                    let profile_loaded_relay = profile_loaded_relay.clone();
                                    let session_expired_relay = auth.session_expired_relay.clone();
                                    Task::start(async move {
                                        match api::user_profile().await {
                                            Ok(profile) => profile_loaded_relay.send(profile),
                                            Err(ApiError::AuthRequired) => {
                                                session_expired_relay.send(());
                                            }
                                            Err(error) => {
                                                zoon::println!("profile load failed: {error}");
                                            }
                                        }
                                    });
                                }
                                None => break,
                            }
                        }
                        event = deletion_confirmed_stream.next() => {
                            match event {
                                Some(()) => {
                                    let session_expired_relay = auth.session_expired_relay.clone();
                                    let toast_added_relay = error_display.toast_added_relay.clone();
                                    Task::start(async move {
                                        match api::delete_account().await {
                                            Ok(()) => {
                                                toast_added_relay.send(ErrorAlert::account_deleted());
                                                crate::auth::clear_session();
                                                session_expired_relay.send(());
                                            }
                                            Err(ApiError::AuthRequired) => {
                                                session_expired_relay.send(());
                                            }
                                            Err(error) => {
                                                toast_added_relay.send(ErrorAlert::account_error(
                                                    "delete your account",
                                                    error,
                                                ));
                                            }
                                        }
                                    });
                                }
                                None => break,
                            }
                        }
                        loaded = profile_loaded_stream.next() => {
                            match loaded {
                                Some(profile) => state.set(Some(profile)),
                                None => break,
                            }
                        }
                        complete => break,
                    }
                }
            }
        });

        Self {
            profile,
            delete_confirm_open: Atom::new(false),
            profile_requested_relay,
            deletion_confirmed_relay,
        }
    }
}
