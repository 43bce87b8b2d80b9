//! Sign-in page shown when no session token is present.

use crate::auth::AuthSession;
use crate::config::{AppConfig, theme_colors};
use zoon::*;

pub fn login_page(auth: &AuthSession, config: &AppConfig) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Align::center())
        .s(Gap::new().y(16))
        .item(
            El::new()
                .s(Font::new().size(28).weight(FontWeight::Bold).color_signal(
                    config
                        .theme_actor
                        .signal()
                        .map(|theme| theme_colors(theme).text_primary),
                ))
                .child("GraphCalc"),
        )
        .item(
            El::new()
                .s(Font::new().size(14).color_signal(
                    config
                        .theme_actor
                        .signal()
                        .map(|theme| theme_colors(theme).text_muted),
                ))
                .child("Plot expressions, pan and zoom, keep your history."),
        )
        .item(
            Button::new()
                .s(Padding::new().x(20).y(8))
                .s(RoundedCorners::all(6))
                .s(Font::new().size(15).color("rgb(255, 255, 255)"))
                .s(Background::new().color("rgb(45, 110, 200)"))
                .label("Sign in")
                .on_press({
                    let login_requested_relay = auth.login_requested_relay.clone();
                    move || login_requested_relay.send(())
                }),
        )
}
