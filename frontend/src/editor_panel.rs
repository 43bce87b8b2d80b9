//! Expression editor panel: one input row per expression, with the row's
//! color swatch and its evaluation errors inline underneath.

use crate::config::{AppConfig, theme_colors};
use crate::expressions::{ExpressionRow, ExpressionRows};
use crate::graph::plotter::GraphPlotter;
use zoon::*;

pub fn editor_panel(
    rows: &ExpressionRows,
    plotter: &GraphPlotter,
    config: &AppConfig,
) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Scrollbars::both())
        .s(Background::new().color_signal(
            config
                .theme_actor
                .signal()
                .map(|theme| theme_colors(theme).panel_background),
        ))
        .s(Borders::new().right_signal(config.theme_actor.signal().map(|theme| {
            Border::new().width(1).color(theme_colors(theme).panel_border)
        })))
        .s(Padding::new().x(10).y(8))
        .s(Gap::new().y(2))
        .items_signal_vec(rows.rows.signal_vec().map({
            let rows = rows.clone();
            let plotter = plotter.clone();
            let config = config.clone();
            move |row| expression_row_editor(row, rows.clone(), plotter.clone(), config.clone())
        }))
}

fn expression_row_editor(
    row: ExpressionRow,
    rows: ExpressionRows,
    plotter: GraphPlotter,
    config: AppConfig,
) -> impl Element {
    let row_id = row.id;

    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(2))
        .s(Padding::new().y(4))
        .item(
            Row::new()
                .s(Width::fill())
                .s(Gap::new().x(8))
                .item(color_swatch(&row, rows.clone()))
                .item(
                    TextInput::new()
                        .s(Width::fill())
                        .s(Padding::new().x(6).y(4))
                        .s(Font::new().size(14).color_signal(
                            config
                                .theme_actor
                                .signal()
                                .map(|theme| theme_colors(theme).text_primary),
                        ))
                        .s(Background::new().color("transparent"))
                        .s(Borders::new().bottom_signal(config.theme_actor.signal().map(
                            |theme| {
                                Border::new()
                                    .width(1)
                                    .color(theme_colors(theme).panel_border)
                            },
                        )))
                        .label_hidden("expression")
                        .placeholder(Placeholder::new("y = f(x)").s(Font::new().color_signal(
                            config
                                .theme_actor
                                .signal()
                                .map(|theme| theme_colors(theme).text_muted),
                        )))
                        .text(&row.text_now())
                        .on_change({
                            let text = row.text.clone();
                            let row_edited_relay = rows.row_edited_relay.clone();
                            move |new_text| {
                                text.set(new_text);
                                row_edited_relay.send(row_id);
                            }
                        })
                        .on_blur({
                            let row_blurred_relay = rows.row_blurred_relay.clone();
                            move || row_blurred_relay.send(row_id)
                        }),
                ),
        )
        .item(row_errors(row_id, plotter, config))
}

/// Clicking the swatch toggles whether the row is plotted.
fn color_swatch(row: &ExpressionRow, rows: ExpressionRows) -> impl Element {
    let row_id = row.id;
    let color = row.color.clone();

    El::new()
        .s(Width::exact(16))
        .s(Height::exact(16))
        .s(Align::new().center_y())
        .s(RoundedCorners::all(8))
        .s(Cursor::new(CursorIcon::Pointer))
        .s(Background::new().color_signal(row.enabled.signal().map({
            let color = color.clone();
            move |enabled| {
                if enabled {
                    color.clone()
                } else {
                    "rgba(128, 128, 128, 0.35)".to_string()
                }
            }
        })))
        .update_raw_el(move |raw_el| {
            raw_el.event_handler(move |_: Click| {
                rows.row_toggled_relay.send(row_id);
            })
        })
}

fn row_errors(row_id: u64, plotter: GraphPlotter, config: AppConfig) -> impl Element {
    El::new()
        .s(Width::fill())
        .child_signal(plotter.errors_signal(row_id).map(move |errors| {
            let config = config.clone();
            Column::new()
                .s(Width::fill())
                .s(Gap::new().y(1))
                .items(errors.into_iter().map(move |error| {
                    El::new()
                        .s(Padding::new().left(24))
                        .s(Font::new().size(12).color_signal(
                            config
                                .theme_actor
                                .signal()
                                .map(|theme| theme_colors(theme).error_text),
                        ))
                        .child(error)
                }))
        }))
}
