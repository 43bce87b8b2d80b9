//! Page resolution: login page vs. calculator, plus the OAuth callback leg.

use crate::auth;
use crate::browser::{location, replace_url};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Login,
    Calculator,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartupAction {
    /// `?code=` present: finish the PKCE exchange, then show the calculator.
    CompleteLogin(String),
    ShowLogin,
    ShowCalculator,
}

/// Decide what to do for a given URL and token state.
pub fn route_for(path: &str, code: Option<String>, has_token: bool) -> StartupAction {
    if let Some(code) = code {
        if !code.is_empty() {
            return StartupAction::CompleteLogin(code);
        }
    }
    if path == "/login" || !has_token {
        StartupAction::ShowLogin
    } else {
        StartupAction::ShowCalculator
    }
}

/// Resolve the startup action from the browser location.
pub fn resolve_startup() -> StartupAction {
    let location = location();
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let code = location
        .search()
        .ok()
        .and_then(|search| {
            let query = search.trim_start_matches('?');
            web_sys::UrlSearchParams::new_with_str(query).ok()
        })
        .and_then(|params| params.get("code"));
    route_for(&path, code, auth::access_token().is_some())
}

pub fn show_login_url() {
    replace_url("/login");
}

pub fn show_calculator_url() {
    replace_url("/");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_code_wins_over_everything() {
        assert_eq!(
            route_for("/login", Some("abc123".to_string()), false),
            StartupAction::CompleteLogin("abc123".to_string())
        );
    }

    #[test]
    fn empty_code_is_ignored() {
        assert_eq!(
            route_for("/", Some(String::new()), true),
            StartupAction::ShowCalculator
        );
    }

    #[test]
    fn login_path_or_missing_token_shows_login() {
        assert_eq!(route_for("/login", None, true), StartupAction::ShowLogin);
        assert_eq!(route_for("/", None, false), StartupAction::ShowLogin);
    }

    #[test]
    fn token_holder_lands_on_calculator() {
        assert_eq!(route_for("/", None, true), StartupAction::ShowCalculator);
    }
}
