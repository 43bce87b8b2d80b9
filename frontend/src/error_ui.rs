//! Toast overlay rendering.

use crate::config::AppConfig;
use crate::error_display::{AlertVariant, ErrorAlert, ErrorDisplay};
use shared::Theme;
use zoon::*;

pub fn toast_notifications_container(
    error_display: ErrorDisplay,
    config: AppConfig,
) -> impl Element {
    Column::new()
        .s(Align::new().bottom().right())
        .s(Padding::all(16))
        .s(Gap::new().y(8))
        .items_signal_vec(error_display.active_toasts.signal_vec().map({
            let error_display = error_display.clone();
            let config = config.clone();
            move |alert| toast(alert, error_display.clone(), config.clone())
        }))
}

fn toast(alert: ErrorAlert, error_display: ErrorDisplay, config: AppConfig) -> impl Element {
    let accent = match alert.variant {
        AlertVariant::Error => "rgb(200, 60, 60)",
        AlertVariant::Info => "rgb(60, 120, 200)",
        AlertVariant::Success => "rgb(60, 160, 90)",
    };
    let alert_id = alert.id;

    Column::new()
        .s(Width::exact(320))
        .s(Padding::all(12))
        .s(Gap::new().y(4))
        .s(RoundedCorners::all(6))
        .s(Background::new().color_signal(config.theme_actor.signal().map(|theme| {
            match theme {
                Theme::Dark => "rgb(40, 42, 48)",
                Theme::Light => "rgb(245, 245, 245)",
            }
        })))
        .s(Borders::new().left(Border::new().width(3).color(accent)))
        .s(Cursor::new(CursorIcon::Pointer))
        .update_raw_el(move |raw_el| {
            raw_el.event_handler(move |_: Click| {
                error_display.toast_dismissed_relay.send(alert_id);
            })
        })
        .item(
            El::new()
                .s(Font::new().weight(FontWeight::SemiBold).size(14).color_signal(
                    config.theme_actor.signal().map(|theme| match theme {
                        Theme::Dark => "rgb(240, 240, 240)",
                        Theme::Light => "rgb(25, 25, 25)",
                    }),
                ))
                .child(alert.title.clone()),
        )
        .item(
            El::new()
                .s(Font::new().size(13).color_signal(config.theme_actor.signal().map(
                    |theme| match theme {
                        Theme::Dark => "rgb(190, 192, 196)",
                        Theme::Light => "rgb(70, 72, 76)",
                    },
                )))
                .child(alert.message.clone()),
        )
}
