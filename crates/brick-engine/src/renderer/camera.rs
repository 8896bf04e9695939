use glam::Vec2;

/// Side-scrolling camera.
///
/// The camera is a scroll offset: the world position drawn at the display's
/// top-left corner. Everything is rendered at `world - offset()`.
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// Display size in pixels.
    pub width: f32,
    pub height: f32,
    /// Unrounded scroll accumulator.
    pub scroll: Vec2,
    /// Follow lag: each frame the camera closes `1/lag` of the remaining gap.
    pub lag: f32,
}

impl Camera2D {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll: Vec2::ZERO,
            lag: 30.0,
        }
    }

    pub fn with_lag(mut self, lag: f32) -> Self {
        self.lag = lag.max(1.0);
        self
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Ease toward centring `target` on the display.
    pub fn follow(&mut self, target: Vec2) {
        let goal = target - self.viewport() * 0.5;
        self.scroll += (goal - self.scroll) / self.lag;
    }

    /// Move the camera by a fixed amount (editor panning).
    pub fn pan(&mut self, delta: Vec2) {
        self.scroll += delta;
    }

    /// Whole-pixel offset used for rendering (truncated toward zero).
    pub fn offset(&self) -> Vec2 {
        self.scroll.trunc()
    }

    /// Convert a display-space point (e.g. pointer) to world space.
    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        p + self.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_closes_one_thirtieth_of_the_gap() {
        let mut cam = Camera2D::new(320.0, 240.0);
        cam.follow(Vec2::new(160.0 + 300.0, 120.0));
        assert!((cam.scroll.x - 10.0).abs() < 1e-5);
        assert!(cam.scroll.y.abs() < 1e-5);
    }

    #[test]
    fn follow_converges_on_target() {
        let mut cam = Camera2D::new(320.0, 240.0);
        let target = Vec2::new(1000.0, 400.0);
        for _ in 0..2000 {
            cam.follow(target);
        }
        let expected = target - Vec2::new(160.0, 120.0);
        assert!((cam.scroll - expected).length() < 0.01);
    }

    #[test]
    fn offset_truncates_toward_zero() {
        let mut cam = Camera2D::new(320.0, 240.0);
        cam.scroll = Vec2::new(12.9, -3.7);
        assert_eq!(cam.offset(), Vec2::new(12.0, -3.0));
    }

    #[test]
    fn pan_and_screen_to_world() {
        let mut cam = Camera2D::new(320.0, 240.0);
        cam.pan(Vec2::new(2.0, 0.0));
        cam.pan(Vec2::new(2.0, -2.0));
        assert_eq!(cam.screen_to_world(Vec2::new(10.0, 10.0)), Vec2::new(14.0, 8.0));
    }
}
