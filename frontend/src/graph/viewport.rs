//! World/canvas coordinate mapping and the visible window.
//!
//! The transform is an affine map parameterized by `scale` (pixels per world
//! unit) and `offset` (world-space pan). It stays invertible because the
//! scale is clamped to a positive range.

pub const MIN_SCALE: f64 = 1e-6;
pub const MAX_SCALE: f64 = 1e6;
pub const DEFAULT_SCALE: f64 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible world-coordinate rectangle of the canvas.
///
/// `origin..bound` is the x-range, `bottom..top` the y-range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewWindow {
    pub origin: f64,
    pub bound: f64,
    pub bottom: f64,
    pub top: f64,
}

impl ViewWindow {
    pub fn width(&self) -> f64 {
        self.bound - self.origin
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset: WorldPoint,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            offset: WorldPoint::default(),
            canvas_width: 800.0,
            canvas_height: 600.0,
        }
    }
}

impl Viewport {
    pub fn world_to_canvas(&self, point: WorldPoint) -> CanvasPoint {
        CanvasPoint::new(
            self.canvas_width / 2.0 + (point.x + self.offset.x) * self.scale,
            self.canvas_height / 2.0 - (point.y + self.offset.y) * self.scale,
        )
    }

    pub fn canvas_to_world(&self, point: CanvasPoint) -> WorldPoint {
        WorldPoint::new(
            (point.x - self.canvas_width / 2.0) / self.scale - self.offset.x,
            (self.canvas_height / 2.0 - point.y) / self.scale - self.offset.y,
        )
    }

    /// Regenerated on every drag, zoom and resize.
    pub fn view_window(&self) -> ViewWindow {
        let half_width = self.canvas_width / (2.0 * self.scale);
        let half_height = self.canvas_height / (2.0 * self.scale);
        ViewWindow {
            origin: -half_width - self.offset.x,
            bound: half_width - self.offset.x,
            bottom: -half_height - self.offset.y,
            top: half_height - self.offset.y,
        }
    }

    /// Translate by a pixel delta; canvas y grows downwards.
    pub fn pan_by_pixels(&mut self, delta_x: f64, delta_y: f64) {
        self.offset.x += delta_x / self.scale;
        self.offset.y -= delta_y / self.scale;
    }

    /// Rescale keeping the world point under `anchor` on the same pixel.
    pub fn zoom_at(&mut self, anchor: CanvasPoint, factor: f64) {
        let world = self.canvas_to_world(anchor);
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.offset.x = (anchor.x - self.canvas_width / 2.0) / self.scale - world.x;
        self.offset.y = (self.canvas_height / 2.0 - anchor.y) / self.scale - world.y;
    }

    /// Zoom keeping the window center fixed, for keyboard navigation.
    pub fn zoom_centered(&mut self, factor: f64) {
        let center = CanvasPoint::new(self.canvas_width / 2.0, self.canvas_height / 2.0);
        self.zoom_at(center, factor);
    }

    pub fn resized(&mut self, width: f64, height: f64) {
        self.canvas_width = width.max(1.0);
        self.canvas_height = height.max(1.0);
    }

    pub fn reset(&mut self) {
        self.scale = DEFAULT_SCALE;
        self.offset = WorldPoint::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn round_trip_is_identity() {
        let mut viewport = Viewport::default();
        viewport.offset = WorldPoint::new(3.25, -1.5);
        for &scale in &[1e-6, 0.001, 1.0, 40.0, 12345.0] {
            viewport.scale = scale;
            for &(x, y) in &[(0.0, 0.0), (10.5, -3.25), (-1e3, 1e3)] {
                let back = viewport.canvas_to_world(viewport.world_to_canvas(WorldPoint::new(x, y)));
                assert!((back.x - x).abs() < 1e-6 * x.abs().max(1.0));
                assert!((back.y - y).abs() < 1e-6 * y.abs().max(1.0));
            }
        }
    }

    #[test]
    fn window_matches_corner_projection() {
        let mut viewport = Viewport::default();
        viewport.offset = WorldPoint::new(-2.0, 0.75);
        viewport.scale = 25.0;
        let window = viewport.view_window();

        let top_left = viewport.canvas_to_world(CanvasPoint::new(0.0, 0.0));
        let bottom_right =
            viewport.canvas_to_world(CanvasPoint::new(viewport.canvas_width, viewport.canvas_height));
        assert_close(window.origin, top_left.x);
        assert_close(window.top, top_left.y);
        assert_close(window.bound, bottom_right.x);
        assert_close(window.bottom, bottom_right.y);
    }

    #[test]
    fn zoom_keeps_anchor_pixel_fixed() {
        let mut viewport = Viewport::default();
        let anchor = CanvasPoint::new(137.0, 412.0);
        let world_before = viewport.canvas_to_world(anchor);

        viewport.zoom_at(anchor, 1.7);
        let projected = viewport.world_to_canvas(world_before);
        assert_close(projected.x, anchor.x);
        assert_close(projected.y, anchor.y);

        viewport.zoom_at(anchor, 0.31);
        let projected = viewport.world_to_canvas(world_before);
        assert_close(projected.x, anchor.x);
        assert_close(projected.y, anchor.y);
    }

    #[test]
    fn zoom_clamps_scale() {
        let mut viewport = Viewport::default();
        viewport.zoom_centered(1e12);
        assert_close(viewport.scale, MAX_SCALE);
        viewport.zoom_centered(1e-24);
        assert_close(viewport.scale, MIN_SCALE);
    }

    #[test]
    fn pan_follows_pixel_delta() {
        let mut viewport = Viewport::default();
        let grabbed = viewport.canvas_to_world(CanvasPoint::new(400.0, 300.0));
        viewport.pan_by_pixels(60.0, -20.0);
        let projected = viewport.world_to_canvas(grabbed);
        assert_close(projected.x, 460.0);
        assert_close(projected.y, 280.0);
    }
}
