//! Adaptive grid stepping and axis label formatting.

use super::viewport::ViewWindow;

/// Pixel distance the grid aims to keep between neighbouring lines.
pub const TARGET_GRID_SPACING_PX: f64 = 80.0;

/// Fixed-point formatting bounds; outside them labels switch to exponential.
const EXP_UPPER_BOUND: f64 = 1e6;
const EXP_LOWER_BOUND: f64 = 1e-4;

/// Snap a raw world-space spacing to the nearest nicer 1/2/5/10 decade value.
pub fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10_f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// World-space step between grid lines for a given scale (px per world unit).
pub fn grid_step(scale: f64) -> f64 {
    nice_step(TARGET_GRID_SPACING_PX / scale)
}

/// Grid line positions covering `from..to` at integer multiples of `step`.
pub fn grid_lines(from: f64, to: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || !from.is_finite() || !to.is_finite() || to <= from {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut index = (from / step).ceil() as i64;
    let last = (to / step).floor() as i64;
    while index <= last {
        // Positions are exact step multiples, not accumulated additions.
        let value = index as f64 * step;
        lines.push(if value == 0.0 { 0.0 } else { value });
        index += 1;
    }
    lines
}

/// Both axes' grid lines for a window at the given scale.
pub fn window_grid(window: &ViewWindow, scale: f64) -> (f64, Vec<f64>, Vec<f64>) {
    let step = grid_step(scale);
    let vertical = grid_lines(window.origin, window.bound, step);
    let horizontal = grid_lines(window.bottom, window.top, step);
    (step, vertical, horizontal)
}

/// Format an axis label for a value positioned on a grid with `step` spacing.
///
/// Fixed-point with just enough precision for the step inside the configured
/// bounds, exponential outside, always trimmed of trailing zeros.
pub fn format_label(value: f64, step: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= EXP_UPPER_BOUND || magnitude < EXP_LOWER_BOUND {
        return trim_exponential(value);
    }
    let decimals = step_decimals(step);
    let formatted = format!("{value:.decimals$}");
    trim_fixed(formatted)
}

/// Decimal places needed to distinguish neighbouring multiples of `step`.
fn step_decimals(step: f64) -> usize {
    if step >= 1.0 || step <= 0.0 {
        return 0;
    }
    let mut decimals = 0usize;
    let mut current = step;
    while current < 1.0 && decimals < 12 {
        current *= 10.0;
        decimals += 1;
    }
    decimals
}

fn trim_fixed(mut formatted: String) -> String {
    if formatted.contains('.') {
        while formatted.ends_with('0') {
            formatted.pop();
        }
        if formatted.ends_with('.') {
            formatted.pop();
        }
    }
    formatted
}

fn trim_exponential(value: f64) -> String {
    let formatted = format!("{value:e}");
    // `{:e}` prints `2.5e3`; strip a trailing `.0…` mantissa tail if present.
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let mantissa = trim_fixed(mantissa.to_string());
            format!("{mantissa}e{exponent}")
        }
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_to_decade_values() {
        assert_eq!(nice_step(0.9), 1.0);
        assert_eq!(nice_step(1.5), 2.0);
        assert_eq!(nice_step(3.0), 5.0);
        assert_eq!(nice_step(7.0), 10.0);
        assert_eq!(nice_step(0.03), 0.05);
        assert_eq!(nice_step(230.0), 500.0);
    }

    #[test]
    fn step_grows_as_scale_shrinks() {
        let mut scale = 1e5;
        let mut previous = grid_step(scale);
        while scale > 1e-5 {
            scale /= 1.5;
            let current = grid_step(scale);
            assert!(
                current >= previous,
                "step shrank from {previous} to {current} at scale {scale}"
            );
            previous = current;
        }
    }

    #[test]
    fn lines_cover_range_at_step_multiples() {
        let lines = grid_lines(-1.05, 1.02, 0.5);
        assert_eq!(lines, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn lines_empty_for_degenerate_input() {
        assert!(grid_lines(1.0, 1.0, 0.5).is_empty());
        assert!(grid_lines(0.0, 1.0, 0.0).is_empty());
        assert!(grid_lines(f64::NAN, 1.0, 0.5).is_empty());
    }

    #[test]
    fn labels_trim_trailing_zeros() {
        assert_eq!(format_label(2.5, 0.5), "2.5");
        assert_eq!(format_label(2.0, 0.5), "2");
        assert_eq!(format_label(-0.25, 0.05), "-0.25");
        assert_eq!(format_label(0.0, 0.5), "0");
    }

    #[test]
    fn labels_switch_to_exponential_outside_bounds() {
        assert_eq!(format_label(2_500_000.0, 500_000.0), "2.5e6");
        assert_eq!(format_label(0.00002, 0.00001), "2e-5");
        assert_eq!(format_label(-4_000_000.0, 1_000_000.0), "-4e6");
    }

    #[test]
    fn fixed_point_precision_follows_step() {
        assert_eq!(format_label(0.1, 0.1), "0.1");
        assert_eq!(format_label(0.30000000000000004, 0.1), "0.3");
        assert_eq!(format_label(1234.0, 500.0), "1234");
    }
}
