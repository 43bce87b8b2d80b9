//! Graph canvas element: 2D-context rendering plus wheel/drag interaction.
//!
//! Rendering is immediate on every repaint bump; the plotter debounces the
//! backfill requests on its own, so gestures stay smooth regardless of
//! network behavior.

use crate::config::{AppConfig, ThemeColors, theme_colors};
use crate::graph::grid::{format_label, window_grid};
use crate::graph::plotter::GraphPlotter;
use crate::graph::viewport::WorldPoint;
use futures::{StreamExt, select};
use shared::Theme;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use zoon::*;

const AXIS_LABEL_FONT: &str = "11px system-ui, sans-serif";
const WHEEL_ZOOM_RATE: f64 = 0.0015;

pub fn graph_canvas(plotter: &GraphPlotter, config: &AppConfig) -> impl Element {
    let mut canvas = Canvas::new()
        .width(0)
        .height(0)
        .s(Width::fill())
        .s(Height::fill());

    let dom_canvas = canvas.raw_el_mut().dom_element();
    if let Some(context) = context_2d(&dom_canvas) {
        spawn_render_loop(context, dom_canvas.clone(), plotter.clone(), config.clone());
    }
    attach_pointer_listeners(&dom_canvas, plotter.clone());

    canvas.update_raw_el({
        let plotter = plotter.clone();
        move |raw_el| {
            raw_el.on_resize(move |width, height| {
                if width > 0 && height > 0 {
                    dom_canvas.set_width(width);
                    dom_canvas.set_height(height);
                    plotter.canvas_resized(width as f64, height as f64);
                }
            })
        }
    })
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())
}

fn spawn_render_loop(
    context: CanvasRenderingContext2d,
    canvas: HtmlCanvasElement,
    plotter: GraphPlotter,
    config: AppConfig,
) {
    Task::start(async move {
        let mut repaint_stream = plotter.repaint.signal().to_stream().fuse();
        let mut theme_stream = config.theme_actor.signal().to_stream().fuse();
        let mut theme = Theme::default();

        loop {
            select! {
                bump = repaint_stream.next() => {
                    match bump {
                        Some(_) => draw(&context, &canvas, &plotter, theme_colors(theme)),
                        None => break,
                    }
                }
                changed = theme_stream.next() => {
                    match changed {
                        Some(new_theme) => {
                            theme = new_theme;
                            draw(&context, &canvas, &plotter, theme_colors(theme));
                        }
                        None => break,
                    }
                }
                complete => break,
            }
        }
    });
}

// ===== INTERACTION =====

fn attach_pointer_listeners(canvas: &HtmlCanvasElement, plotter: GraphPlotter) {
    let drag_anchor: Rc<Cell<Option<(f64, f64)>>> = Rc::new(Cell::new(None));

    let wheel_closure = Closure::wrap(Box::new({
        let plotter = plotter.clone();
        move |event: web_sys::WheelEvent| {
            event.prevent_default();
            let factor = (-event.delta_y() * WHEEL_ZOOM_RATE).exp();
            plotter.zoom_at(event.offset_x() as f64, event.offset_y() as f64, factor);
        }
    }) as Box<dyn FnMut(web_sys::WheelEvent)>);
    let _ = canvas.add_event_listener_with_callback("wheel", wheel_closure.as_ref().unchecked_ref());
    wheel_closure.forget();

    let mousedown_closure = Closure::wrap(Box::new({
        let drag_anchor = drag_anchor.clone();
        move |event: web_sys::MouseEvent| {
            if event.button() == 0 {
                drag_anchor.set(Some((event.client_x() as f64, event.client_y() as f64)));
            }
        }
    }) as Box<dyn FnMut(web_sys::MouseEvent)>);
    let _ = canvas
        .add_event_listener_with_callback("mousedown", mousedown_closure.as_ref().unchecked_ref());
    mousedown_closure.forget();

    let mousemove_closure = Closure::wrap(Box::new({
        let drag_anchor = drag_anchor.clone();
        let plotter = plotter.clone();
        move |event: web_sys::MouseEvent| {
            if let Some((last_x, last_y)) = drag_anchor.get() {
                let (x, y) = (event.client_x() as f64, event.client_y() as f64);
                drag_anchor.set(Some((x, y)));
                plotter.pan_by_pixels(x - last_x, y - last_y);
            }
        }
    }) as Box<dyn FnMut(web_sys::MouseEvent)>);
    let _ = canvas
        .add_event_listener_with_callback("mousemove", mousemove_closure.as_ref().unchecked_ref());
    mousemove_closure.forget();

    for stop_event in ["mouseup", "mouseleave"] {
        let release_closure = Closure::wrap(Box::new({
            let drag_anchor = drag_anchor.clone();
            move |_event: web_sys::MouseEvent| {
                drag_anchor.set(None);
            }
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);
        let _ = canvas
            .add_event_listener_with_callback(stop_event, release_closure.as_ref().unchecked_ref());
        release_closure.forget();
    }
}

// ===== RENDERING =====

fn draw(
    context: &CanvasRenderingContext2d,
    canvas: &HtmlCanvasElement,
    plotter: &GraphPlotter,
    colors: ThemeColors,
) {
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    let viewport = plotter.viewport.state.get_cloned();
    let window = viewport.view_window();

    context.set_fill_style_str(colors.canvas_background);
    context.fill_rect(0.0, 0.0, width, height);

    let (step, vertical_lines, horizontal_lines) = window_grid(&window, viewport.scale);

    // Minor grid.
    context.set_stroke_style_str(colors.grid_line);
    context.set_line_width(1.0);
    for &world_x in &vertical_lines {
        let x = viewport.world_to_canvas(WorldPoint::new(world_x, 0.0)).x;
        context.begin_path();
        context.move_to(x, 0.0);
        context.line_to(x, height);
        context.stroke();
    }
    for &world_y in &horizontal_lines {
        let y = viewport.world_to_canvas(WorldPoint::new(0.0, world_y)).y;
        context.begin_path();
        context.move_to(0.0, y);
        context.line_to(width, y);
        context.stroke();
    }

    // Axes, when inside the window.
    context.set_stroke_style_str(colors.axis_line);
    let axis = viewport.world_to_canvas(WorldPoint::new(0.0, 0.0));
    if window.origin <= 0.0 && window.bound >= 0.0 {
        context.begin_path();
        context.move_to(axis.x, 0.0);
        context.line_to(axis.x, height);
        context.stroke();
    }
    if window.bottom <= 0.0 && window.top >= 0.0 {
        context.begin_path();
        context.move_to(0.0, axis.y);
        context.line_to(width, axis.y);
        context.stroke();
    }

    // Labels hug their axis but stay on-canvas when the axis scrolls out.
    context.set_fill_style_str(colors.axis_label);
    context.set_font(AXIS_LABEL_FONT);
    let label_y = (axis.y + 14.0).clamp(12.0, height - 4.0);
    for &world_x in &vertical_lines {
        if world_x == 0.0 {
            continue;
        }
        let x = viewport.world_to_canvas(WorldPoint::new(world_x, 0.0)).x;
        let _ = context.fill_text(&format_label(world_x, step), x + 3.0, label_y);
    }
    let label_x = (axis.x + 5.0).clamp(4.0, width - 44.0);
    for &world_y in &horizontal_lines {
        if world_y == 0.0 {
            continue;
        }
        let y = viewport.world_to_canvas(WorldPoint::new(0.0, world_y)).y;
        let _ = context.fill_text(&format_label(world_y, step), label_x, y - 3.0);
    }
    if window.origin <= 0.0 && window.bound >= 0.0 && window.bottom <= 0.0 && window.top >= 0.0 {
        let _ = context.fill_text("0", label_x, label_y);
    }

    // Curves.
    context.set_line_width(2.0);
    context.set_line_join("round");
    for drawing in plotter.drawing_sets() {
        context.set_stroke_style_str(&drawing.color);
        for segment in &drawing.segments {
            let mut samples = segment.iter();
            let Some(&(first_x, first_y)) = samples.next() else {
                continue;
            };
            context.begin_path();
            let start = viewport.world_to_canvas(WorldPoint::new(first_x, first_y));
            context.move_to(start.x, start.y);
            for &(world_x, world_y) in samples {
                let point = viewport.world_to_canvas(WorldPoint::new(world_x, world_y));
                context.line_to(point.x, point.y);
            }
            context.stroke();
        }
    }
}
