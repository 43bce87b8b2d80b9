//! History panel: saved snapshots with restore and delete.

use crate::config::{AppConfig, theme_colors};
use crate::history::History;
use shared::HistorySnapshot;
use zoon::*;

pub fn history_panel(history: History, config: AppConfig) -> impl Element {
    Column::new()
        .s(Width::exact(280))
        .s(Height::fill())
        .s(Scrollbars::both())
        .s(Background::new().color_signal(
            config
                .theme_actor
                .signal()
                .map(|theme| theme_colors(theme).panel_background),
        ))
        .s(Borders::new().left_signal(config.theme_actor.signal().map(|theme| {
            Border::new().width(1).color(theme_colors(theme).panel_border)
        })))
        .s(Padding::all(10))
        .s(Gap::new().y(8))
        .item(panel_header(&history, &config))
        .item(snapshot_list(&history, &config))
}

fn panel_header(history: &History, config: &AppConfig) -> impl Element {
    Row::new()
        .s(Width::fill())
        .s(Gap::new().x(6))
        .item(
            El::new()
                .s(Font::new().size(14).weight(FontWeight::SemiBold).color_signal(
                    config
                        .theme_actor
                        .signal()
                        .map(|theme| theme_colors(theme).text_primary),
                ))
                .s(Align::new().center_y())
                .child("History"),
        )
        .item(
            El::new()
                .s(Font::new().size(11).color_signal(
                    config
                        .theme_actor
                        .signal()
                        .map(|theme| theme_colors(theme).text_muted),
                ))
                .s(Align::new().center_y())
                .child_signal(
                    history
                        .loading
                        .signal()
                        .map(|loading| loading.then(|| "loading…")),
                ),
        )
        .item(El::new().s(Width::fill()))
        .item(small_button(
            "Save",
            config.clone(),
            {
                let save_clicked_relay = history.save_clicked_relay.clone();
                move || save_clicked_relay.send(())
            },
        ))
        .item(small_button(
            "Refresh",
            config.clone(),
            {
                let refresh_requested_relay = history.refresh_requested_relay.clone();
                move || refresh_requested_relay.send(())
            },
        ))
}

fn snapshot_list(history: &History, config: &AppConfig) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(6))
        .items_signal_vec(history.snapshots.signal_vec().map({
            let history = history.clone();
            let config = config.clone();
            move |snapshot| snapshot_entry(snapshot, history.clone(), config.clone())
        }))
}

fn snapshot_entry(snapshot: HistorySnapshot, history: History, config: AppConfig) -> impl Element {
    let preview = snapshot
        .expressions
        .iter()
        .map(|expression| expression.text.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let snapshot_id = snapshot.id;

    Column::new()
        .s(Width::fill())
        .s(Padding::all(8))
        .s(Gap::new().y(4))
        .s(RoundedCorners::all(4))
        .s(Borders::all_signal(config.theme_actor.signal().map(|theme| {
            Border::new().width(1).color(theme_colors(theme).panel_border)
        })))
        .item(
            El::new()
                .s(Font::new().size(11).color_signal(
                    config
                        .theme_actor
                        .signal()
                        .map(|theme| theme_colors(theme).text_muted),
                ))
                .child(snapshot.created_at.clone()),
        )
        .item(
            El::new()
                .s(Font::new().size(13).color_signal(
                    config
                        .theme_actor
                        .signal()
                        .map(|theme| theme_colors(theme).text_primary),
                ))
                .child(preview),
        )
        .item(
            Row::new()
                .s(Gap::new().x(6))
                .item(small_button("Restore", config.clone(), {
                    let restore_clicked_relay = history.restore_clicked_relay.clone();
                    move || restore_clicked_relay.send(snapshot_id)
                }))
                .item(small_button("Delete", config.clone(), {
                    let delete_clicked_relay = history.delete_clicked_relay.clone();
                    move || delete_clicked_relay.send(snapshot_id)
                })),
        )
}

pub fn small_button(
    label: &'static str,
    config: AppConfig,
    on_press: impl FnMut() + 'static,
) -> impl Element {
    Button::new()
        .s(Padding::new().x(8).y(3))
        .s(RoundedCorners::all(4))
        .s(Font::new().size(12).color_signal(
            config
                .theme_actor
                .signal()
                .map(|theme| theme_colors(theme).text_primary),
        ))
        .s(Background::new().color_signal(config.theme_actor.signal().map(|theme| {
            match theme {
                shared::Theme::Dark => "rgba(255, 255, 255, 0.08)",
                shared::Theme::Light => "rgba(0, 0, 0, 0.06)",
            }
        })))
        .label(label)
        .on_press(on_press)
}
