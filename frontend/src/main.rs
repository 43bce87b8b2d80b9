//! GraphCalc frontend entry point.

use std::sync::OnceLock;
use zoon::*;

/// Keeps the main application task alive for the whole session.
static MAIN_TASK: OnceLock<TaskHandle> = OnceLock::new();

mod account;
mod api;
mod app;
mod auth;
mod browser;
mod config;
mod dataflow;
mod editor_panel;
mod error_display;
mod error_ui;
mod expressions;
mod graph;
mod history;
mod history_panel;
mod login_page;
mod router;

pub fn main() {
    let handle = Task::start_droppable(async {
        let app = app::GraphCalcApp::new().await;
        let root_element = app.root();
        start_app("app", move || root_element);
        // The domains stay alive as long as `app` does; park the task.
        let _app = app;
        std::future::pending::<()>().await;
    });
    let _ = MAIN_TASK.set(handle);
}
