//! Client side of the OAuth2 Authorization Code + PKCE flow.
//!
//! The provider is an external service; this module only produces the
//! verifier/challenge pair, drives the two redirects and keeps the access
//! token in browser session storage under the well-known keys.

use crate::browser::{origin, redirect_to, replace_url, session_storage};
use crate::dataflow::{Actor, Relay, relay};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures::{StreamExt, select};
use shared::TokenResponse;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};
use zoon::*;

/// Origin of the OAuth provider. Same origin by default; a gateway routes
/// `/oauth2/*` and `/logout` to the provider.
const PROVIDER_BASE: &str = "";
const CLIENT_ID: &str = "graphcalc-web";

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const CODE_VERIFIER_KEY: &str = "code_verifier";
pub const CODE_CHALLENGE_KEY: &str = "code_challenge";

// ===== SESSION STORAGE =====

pub fn access_token() -> Option<String> {
    session_storage()?.get_item(ACCESS_TOKEN_KEY).ok()?
}

fn store_token(token: &str) {
    if let Some(storage) = session_storage() {
        let _ = storage.set_item(ACCESS_TOKEN_KEY, token);
    }
}

fn store_pkce_pair(verifier: &str, challenge: &str) {
    if let Some(storage) = session_storage() {
        let _ = storage.set_item(CODE_VERIFIER_KEY, verifier);
        let _ = storage.set_item(CODE_CHALLENGE_KEY, challenge);
    }
}

fn take_verifier() -> Option<String> {
    let storage = session_storage()?;
    let verifier = storage.get_item(CODE_VERIFIER_KEY).ok()??;
    let _ = storage.remove_item(CODE_VERIFIER_KEY);
    let _ = storage.remove_item(CODE_CHALLENGE_KEY);
    Some(verifier)
}

pub fn clear_session() {
    if let Some(storage) = session_storage() {
        let _ = storage.remove_item(ACCESS_TOKEN_KEY);
        let _ = storage.remove_item(CODE_VERIFIER_KEY);
        let _ = storage.remove_item(CODE_CHALLENGE_KEY);
    }
}

// ===== PKCE =====

fn random_verifier() -> Result<String, String> {
    let crypto = crate::browser::browser_window()
        .crypto()
        .map_err(|error| format!("crypto unavailable: {error:?}"))?;
    let mut bytes = [0u8; 32];
    crypto
        .get_random_values_with_u8_array(&mut bytes)
        .map_err(|error| format!("random source failed: {error:?}"))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

async fn s256_challenge(verifier: &str) -> Result<String, String> {
    let subtle = crate::browser::browser_window()
        .crypto()
        .map_err(|error| format!("crypto unavailable: {error:?}"))?
        .subtle();
    let mut data = verifier.as_bytes().to_vec();
    let promise = subtle
        .digest_with_str_and_u8_array("SHA-256", &mut data)
        .map_err(|error| format!("digest failed: {error:?}"))?;
    let buffer = JsFuture::from(promise)
        .await
        .map_err(|error| format!("digest failed: {error:?}"))?;
    let digest = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(URL_SAFE_NO_PAD.encode(digest))
}

// ===== FLOW =====

/// Generate and stash the PKCE pair, then hand the browser to the provider.
pub async fn begin_login() -> Result<(), String> {
    let verifier = random_verifier()?;
    let challenge = s256_challenge(&verifier).await?;
    store_pkce_pair(&verifier, &challenge);

    let redirect_uri = format!("{}/", origin());
    let authorize_url = format!(
        "{PROVIDER_BASE}/oauth2/authorize?response_type=code&client_id={CLIENT_ID}\
         &redirect_uri={}&code_challenge={challenge}&code_challenge_method=S256",
        js_sys::encode_uri_component(&redirect_uri),
    );
    redirect_to(&authorize_url);
    Ok(())
}

/// Exchange the callback `code` for a token and store it.
pub async fn complete_login(code: &str) -> Result<(), String> {
    let verifier = take_verifier().ok_or_else(|| "login session expired".to_string())?;
    let redirect_uri = format!("{}/", origin());
    let body = format!(
        "grant_type=authorization_code&client_id={CLIENT_ID}&code={}&redirect_uri={}&code_verifier={}",
        js_sys::encode_uri_component(code),
        js_sys::encode_uri_component(&redirect_uri),
        js_sys::encode_uri_component(&verifier),
    );

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&wasm_bindgen::JsValue::from_str(&body));
    let headers = web_sys::Headers::new().map_err(|error| format!("{error:?}"))?;
    headers
        .set("Content-Type", "application/x-www-form-urlencoded")
        .map_err(|error| format!("{error:?}"))?;
    opts.set_headers(&headers.into());

    let url = format!("{PROVIDER_BASE}/oauth2/token");
    let request =
        Request::new_with_str_and_init(&url, &opts).map_err(|error| format!("{error:?}"))?;
    let response = JsFuture::from(crate::browser::browser_window().fetch_with_request(&request))
        .await
        .map_err(|error| format!("token request failed: {error:?}"))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| "token request returned no response".to_string())?;
    if !response.ok() {
        return Err(format!("token endpoint answered {}", response.status()));
    }
    let text = JsFuture::from(
        response
            .text()
            .map_err(|error| format!("{error:?}"))?,
    )
    .await
    .map_err(|error| format!("{error:?}"))?;
    let text = text.as_string().unwrap_or_default();
    let token: TokenResponse =
        serde_json::from_str(&text).map_err(|error| format!("malformed token response: {error}"))?;

    store_token(&token.access_token);
    replace_url("/");
    Ok(())
}

pub fn logout() {
    clear_session();
    redirect_to(&format!("{PROVIDER_BASE}/logout"));
}

// ===== DOMAIN =====

/// Authentication domain: the token as reactive state plus the flow events.
#[derive(Clone)]
pub struct AuthSession {
    pub token: Actor<Option<String>>,

    pub login_requested_relay: Relay<()>,
    pub logout_requested_relay: Relay<()>,
    pub session_expired_relay: Relay<()>,
    pub token_stored_relay: Relay<String>,
}

impl AuthSession {
    pub async fn new() -> Self {
        let (login_requested_relay, mut login_requested_stream) = relay::<()>();
        let (logout_requested_relay, mut logout_requested_stream) = relay::<()>();
        let (session_expired_relay, mut session_expired_stream) = relay::<()>();
        let (token_stored_relay, mut token_stored_stream) = relay::<String>();

        let token = Actor::new(access_token(), async move |state| {
            loop {
                select! {
                    event = login_requested_stream.next() => {
                        match event {
                            Some(()) => {
                                Task::start(async {
                                    if let Err(error) = begin_login().await {
                                        zoon::println!("login failed: {error}");
                                    }
                                });
                            }
                            None => break,
                        }
                    }
                    event = logout_requested_stream.next() => {
                        match event {
                            Some(()) => {
                                state.set(None);
                                logout();
                            }
                            None => break,
                        }
                    }
                    event = session_expired_stream.next() => {
                        match event {
                            Some(()) => {
                                clear_session();
                                state.set_neq(None);
                            }
                            None => break,
                        }
                    }
                    stored = token_stored_stream.next() => {
                        match stored {
                            Some(token) => state.set_neq(Some(token)),
                            None => break,
                        }
                    }
                    complete => break,
                }
            }
        });

        Self {
            token,
            login_requested_relay,
            logout_requested_relay,
            session_expired_relay,
            token_stored_relay,
        }
    }
}
