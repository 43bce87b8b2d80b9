//! GraphCalcApp: builds the domains, wires them together and renders the
//! page shell.

use crate::account::Account;
use crate::auth::{self, AuthSession};
use crate::config::{AppConfig, theme_colors};
use crate::dataflow::Actor;
use crate::error_display::{ErrorAlert, ErrorDisplay};
use crate::expressions::ExpressionRows;
use crate::graph::canvas::graph_canvas;
use crate::graph::plotter::GraphPlotter;
use crate::history::History;
use crate::router::{self, Page, StartupAction};
use futures::StreamExt;
use zoon::*;

pub struct GraphCalcApp {
    pub config: AppConfig,
    pub auth: AuthSession,
    pub expression_rows: ExpressionRows,
    pub plotter: GraphPlotter,
    pub history: History,
    pub account: Account,
    pub error_display: ErrorDisplay,
    pub page: Actor<Page>,
}

impl GraphCalcApp {
    pub async fn new() -> Self {
        let config = AppConfig::new().await;
        let error_display = ErrorDisplay::new(config.toast_dismiss_ms_actor.clone()).await;

        // Finish the OAuth callback before the token actor first reads
        // session storage, so a fresh login lands directly on the calculator.
        if let StartupAction::CompleteLogin(code) = router::resolve_startup() {
            if let Err(error) = auth::complete_login(&code).await {
                zoon::println!("login completion failed: {error}");
                auth::clear_session();
            }
        }

        let auth = AuthSession::new().await;
        let expression_rows = ExpressionRows::new().await;
        let plotter = GraphPlotter::new(expression_rows.clone(), auth.clone()).await;
        let history = History::new(
            expression_rows.clone(),
            auth.clone(),
            error_display.clone(),
        )
        .await;
        let account = Account::new(auth.clone(), error_display.clone()).await;

        let page = Actor::new(Page::Login, |_state| async move {});
        Self::spawn_page_sync(
            &auth,
            &page,
            &history,
            &account,
            &error_display,
        );

        GraphCalcApp {
            config,
            auth,
            expression_rows,
            plotter,
            history,
            account,
            error_display,
            page,
        }
    }

    /// The page follows the token: a stored token shows the calculator and
    /// loads its remote state, losing the token forces the login page.
    fn spawn_page_sync(
        auth: &AuthSession,
        page: &Actor<Page>,
        history: &History,
        account: &Account,
        error_display: &ErrorDisplay,
    ) {
        let token = auth.token.clone();
        let page = page.clone();
        let history = history.clone();
        let account = account.clone();
        let error_display = error_display.clone();

        Task::start(async move {
            let mut token_stream = token.signal().to_stream().fuse();
            let mut previous: Option<Option<String>> = None;
            while let Some(current) = token_stream.next().await {
                match (&previous, &current) {
                    (_, Some(_)) => {
                        if page.state.get_cloned() != Page::Calculator {
                            page.state.set(Page::Calculator);
                            router::show_calculator_url();
                            history.refresh_requested_relay.send(());
                            account.profile_requested_relay.send(());
                        }
                    }
                    (Some(Some(_)), None) => {
                        // Token was there and vanished without a redirect.
                        error_display
                            .toast_added_relay
                            .send(ErrorAlert::session_expired());
                        page.state.set(Page::Login);
                        router::show_login_url();
                    }
                    (_, None) => {
                        page.state.set(Page::Login);
                        router::show_login_url();
                    }
                }
                previous = Some(current);
            }
        });
    }

    pub fn root(&self) -> impl Element {
        let app_for_pages = self.clone_handles();
        Stack::new()
            .s(Height::screen())
            .s(Width::fill())
            .s(Background::new().color_signal(
                self.config
                    .theme_actor
                    .signal()
                    .map(|theme| theme_colors(theme).page_background),
            ))
            .s(Font::new().family([
                FontFamily::new("Inter"),
                FontFamily::new("system-ui"),
                FontFamily::new("Segoe UI"),
                FontFamily::new("Arial"),
                FontFamily::SansSerif,
            ]))
            .update_raw_el({
                let plotter = self.plotter.clone();
                move |raw_el| {
                    raw_el.global_event_handler(move |event: KeyDown| {
                        if text_input_focused() {
                            return;
                        }
                        let key = event.key();
                        if key == "ArrowLeft" {
                            plotter.pan_by_pixels(60.0, 0.0);
                        } else if key == "ArrowRight" {
                            plotter.pan_by_pixels(-60.0, 0.0);
                        } else if key == "ArrowUp" {
                            plotter.pan_by_pixels(0.0, 60.0);
                        } else if key == "ArrowDown" {
                            plotter.pan_by_pixels(0.0, -60.0);
                        } else if key == "+" || key == "=" {
                            plotter.zoom_centered(1.25);
                        } else if key == "-" {
                            plotter.zoom_centered(0.8);
                        } else if key == "0" {
                            plotter.reset_view();
                        }
                    })
                }
            })
            .layer(
                El::new()
                    .s(Width::fill())
                    .s(Height::fill())
                    .child_signal(self.page.signal().map(move |page| match page {
                        Page::Login => app_for_pages.login_view().unify(),
                        Page::Calculator => app_for_pages.calculator_view().unify(),
                    })),
            )
            .layer(crate::error_ui::toast_notifications_container(
                self.error_display.clone(),
                self.config.clone(),
            ))
    }

    fn clone_handles(&self) -> AppHandles {
        AppHandles {
            config: self.config.clone(),
            auth: self.auth.clone(),
            expression_rows: self.expression_rows.clone(),
            plotter: self.plotter.clone(),
            history: self.history.clone(),
            account: self.account.clone(),
        }
    }
}

#[derive(Clone)]
struct AppHandles {
    config: AppConfig,
    auth: AuthSession,
    expression_rows: ExpressionRows,
    plotter: GraphPlotter,
    history: History,
    account: Account,
}

impl AppHandles {
    fn login_view(&self) -> impl Element {
        crate::login_page::login_page(&self.auth, &self.config)
    }

    fn calculator_view(&self) -> impl Element {
        Column::new()
            .s(Width::fill())
            .s(Height::fill())
            .item(self.header())
            .item(
                Row::new()
                    .s(Width::fill())
                    .s(Height::fill())
                    .item(
                        El::new()
                            .s(Height::fill())
                            .s(Width::exact_signal(
                                self.config
                                    .editor_panel_width_actor
                                    .signal()
                                    .map(|width| width as u32),
                            ))
                            .child(crate::editor_panel::editor_panel(
                                &self.expression_rows,
                                &self.plotter,
                                &self.config,
                            )),
                    )
                    .item(self.editor_divider())
                    .item(
                        El::new()
                            .s(Width::fill())
                            .s(Height::fill())
                            .child(graph_canvas(&self.plotter, &self.config)),
                    )
                    .item_signal(self.config.history_panel_open_actor.signal().map({
                        let history = self.history.clone();
                        let config = self.config.clone();
                        move |open| {
                            open.then(|| {
                                crate::history_panel::history_panel(
                                    history.clone(),
                                    config.clone(),
                                )
                            })
                        }
                    })),
            )
    }

    /// Draggable divider between the editor panel and the canvas. The drag is
    /// tracked on the document so fast pointer moves don't escape it.
    fn editor_divider(&self) -> impl Element {
        use std::cell::Cell;
        use std::rc::Rc;
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let config = self.config.clone();
        El::new()
            .s(Width::exact(4))
            .s(Height::fill())
            .s(Cursor::new(CursorIcon::ColumnResize))
            .s(Background::new().color_signal(
                self.config
                    .theme_actor
                    .signal()
                    .map(|theme| theme_colors(theme).panel_border),
            ))
            .update_raw_el(move |raw_el| {
                let drag_start: Rc<Cell<Option<(f64, f32)>>> = Rc::new(Cell::new(None));

                let divider = raw_el.dom_element();
                let mousedown_closure = Closure::wrap(Box::new({
                    let drag_start = drag_start.clone();
                    let width_actor = config.editor_panel_width_actor.clone();
                    move |event: web_sys::MouseEvent| {
                        if event.button() == 0 {
                            event.prevent_default();
                            let current = width_actor.state.get_cloned();
                            drag_start.set(Some((event.client_x() as f64, current)));
                        }
                    }
                })
                    as Box<dyn FnMut(web_sys::MouseEvent)>);
                let _ = divider.add_event_listener_with_callback(
                    "mousedown",
                    mousedown_closure.as_ref().unchecked_ref(),
                );
                mousedown_closure.forget();

                if let Some(document) = crate::browser::browser_window().document() {
                    let mousemove_closure = Closure::wrap(Box::new({
                        let drag_start = drag_start.clone();
                        let width_changed_relay =
                            config.editor_panel_width_changed_relay.clone();
                        move |event: web_sys::MouseEvent| {
                            if let Some((start_x, start_width)) = drag_start.get() {
                                let delta = event.client_x() as f64 - start_x;
                                width_changed_relay.send(start_width + delta as f32);
                            }
                        }
                    })
                        as Box<dyn FnMut(web_sys::MouseEvent)>);
                    let _ = document.add_event_listener_with_callback(
                        "mousemove",
                        mousemove_closure.as_ref().unchecked_ref(),
                    );
                    mousemove_closure.forget();

                    let mouseup_closure = Closure::wrap(Box::new({
                        let drag_start = drag_start.clone();
                        move |_event: web_sys::MouseEvent| {
                            drag_start.set(None);
                        }
                    })
                        as Box<dyn FnMut(web_sys::MouseEvent)>);
                    let _ = document.add_event_listener_with_callback(
                        "mouseup",
                        mouseup_closure.as_ref().unchecked_ref(),
                    );
                    mouseup_closure.forget();
                }

                raw_el
            })
    }

    fn header(&self) -> impl Element {
        let colors_signal = self.config.theme_actor.signal();
        Row::new()
            .s(Width::fill())
            .s(Padding::new().x(12).y(6))
            .s(Gap::new().x(8))
            .s(Borders::new().bottom_signal(self.config.theme_actor.signal().map(
                |theme| {
                    Border::new()
                        .width(1)
                        .color(theme_colors(theme).panel_border)
                },
            )))
            .item(
                El::new()
                    .s(Font::new().size(16).weight(FontWeight::Bold).color_signal(
                        colors_signal.map(|theme| theme_colors(theme).text_primary),
                    ))
                    .s(Align::new().center_y())
                    .child("GraphCalc"),
            )
            .item(
                El::new()
                    .s(Font::new().size(12).color_signal(
                        self.config
                            .theme_actor
                            .signal()
                            .map(|theme| theme_colors(theme).text_muted),
                    ))
                    .s(Align::new().center_y())
                    .child_signal(
                        self.plotter
                            .loading_signal()
                            .map(|loading| loading.then(|| "evaluating…")),
                    ),
            )
            .item(El::new().s(Width::fill()))
            .item(crate::history_panel::small_button(
                "Reset view",
                self.config.clone(),
                {
                    let plotter = self.plotter.clone();
                    move || plotter.reset_view()
                },
            ))
            .item(crate::history_panel::small_button(
                "History",
                self.config.clone(),
                {
                    let history_panel_toggled_relay =
                        self.config.history_panel_toggled_relay.clone();
                    move || history_panel_toggled_relay.send(())
                },
            ))
            .item(crate::history_panel::small_button(
                "Theme",
                self.config.clone(),
                {
                    let theme_toggle_requested_relay =
                        self.config.theme_toggle_requested_relay.clone();
                    move || theme_toggle_requested_relay.send(())
                },
            ))
            .item(
                El::new()
                    .s(Font::new().size(13).color_signal(
                        self.config
                            .theme_actor
                            .signal()
                            .map(|theme| theme_colors(theme).text_muted),
                    ))
                    .s(Align::new().center_y())
                    .child_signal(self.account.profile.signal().map(|profile| {
                        profile.map(|profile| profile.username)
                    })),
            )
            .item(crate::history_panel::small_button(
                "Sign out",
                self.config.clone(),
                {
                    let logout_requested_relay = self.auth.logout_requested_relay.clone();
                    move || logout_requested_relay.send(())
                },
            ))
            .item_signal(self.account.delete_confirm_open.signal().map({
                let account = self.account.clone();
                let config = self.config.clone();
                move |open| {
                    let account = account.clone();
                    let config = config.clone();
                    if open {
                        crate::history_panel::small_button("Really delete?", config, {
                            let account = account.clone();
                            move || {
                                account.delete_confirm_open.set(false);
                                account.deletion_confirmed_relay.send(());
                            }
                        })
                    } else {
                        crate::history_panel::small_button("Delete account", config, {
                            let account = account.clone();
                            move || account.delete_confirm_open.set(true)
                        })
                    }
                }
            }))
    }
}

fn text_input_focused() -> bool {
    crate::browser::browser_window()
        .document()
        .and_then(|document| document.active_element())
        .map(|element| {
            let tag = element.tag_name();
            tag.eq_ignore_ascii_case("input") || tag.eq_ignore_ascii_case("textarea")
        })
        .unwrap_or(false)
}
