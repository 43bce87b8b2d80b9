//! REST client for the external math, history and user services.
//!
//! Thin fetch wrapper: JSON bodies, bearer token from session storage, and a
//! dedicated error variant for responses that mean the session is gone.

use crate::auth::access_token;
use crate::browser::browser_window;
use shared::{
    EvaluationRequest, EvaluationResponse, HistorySnapshot, NewSnapshot, UserProfile,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

/// Origin of the API gateway. Same origin by default.
const API_BASE: &str = "";

#[derive(Clone, Debug, PartialEq)]
pub enum ApiError {
    /// 401, or 403 while no token is stored: the session must be rebuilt.
    AuthRequired,
    Http { status: u16, message: String },
    Network(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::AuthRequired => write!(f, "authentication required"),
            ApiError::Http { status, message } => write!(f, "HTTP {status}: {message}"),
            ApiError::Network(message) => write!(f, "network error: {message}"),
        }
    }
}

// ===== ENDPOINTS =====

pub async fn evaluate(request: &EvaluationRequest) -> Result<EvaluationResponse, ApiError> {
    let body = serde_json::to_string(request)
        .map_err(|error| ApiError::Network(format!("serialize request: {error}")))?;
    let text = fetch_text("POST", "/api/v1/math/evaluation", Some(body)).await?;
    serde_json::from_str(&text)
        .map_err(|error| ApiError::Network(format!("malformed evaluation response: {error}")))
}

pub async fn history_list() -> Result<Vec<HistorySnapshot>, ApiError> {
    let text = fetch_text("GET", "/api/v1/math/history", None).await?;
    serde_json::from_str(&text)
        .map_err(|error| ApiError::Network(format!("malformed history response: {error}")))
}

pub async fn history_save(snapshot: &NewSnapshot) -> Result<HistorySnapshot, ApiError> {
    let body = serde_json::to_string(snapshot)
        .map_err(|error| ApiError::Network(format!("serialize snapshot: {error}")))?;
    let text = fetch_text("POST", "/api/v1/math/history", Some(body)).await?;
    serde_json::from_str(&text)
        .map_err(|error| ApiError::Network(format!("malformed snapshot response: {error}")))
}

pub async fn history_delete(id: u64) -> Result<(), ApiError> {
    fetch_text("DELETE", &format!("/api/v1/math/history/{id}"), None).await?;
    Ok(())
}

pub async fn user_profile() -> Result<UserProfile, ApiError> {
    let text = fetch_text("GET", "/api/user", None).await?;
    serde_json::from_str(&text)
        .map_err(|error| ApiError::Network(format!("malformed profile response: {error}")))
}

pub async fn delete_account() -> Result<(), ApiError> {
    fetch_text("POST", "/api/user/deletion", None).await?;
    Ok(())
}

// ===== FETCH PLUMBING =====

async fn fetch_text(method: &str, path: &str, body: Option<String>) -> Result<String, ApiError> {
    let headers = Headers::new().map_err(js_error)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(js_error)?;
    let token = access_token();
    if let Some(token) = &token {
        headers
            .set("Authorization", &format!("Bearer {token}"))
            .map_err(js_error)?;
    }

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    opts.set_headers(&headers.into());
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(&body));
    }

    let url = format!("{API_BASE}{path}");
    let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
    let response = JsFuture::from(browser_window().fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| ApiError::Network("fetch returned no response".to_string()))?;

    let status = response.status();
    let text = match response.text() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .ok()
            .and_then(|value| value.as_string())
            .unwrap_or_default(),
        Err(_) => String::new(),
    };

    if status == 401 || (status == 403 && token.is_none()) {
        return Err(ApiError::AuthRequired);
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::Http {
            status,
            message: text,
        });
    }
    Ok(text)
}

fn js_error(error: JsValue) -> ApiError {
    ApiError::Network(format!("{error:?}"))
}
