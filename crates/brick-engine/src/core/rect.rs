use glam::Vec2;

/// Axis-aligned rectangle in world pixels, anchored at its top-left corner (Y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn set_left(&mut self, v: f32) {
        self.x = v;
    }

    /// Move so the right edge sits at `v`.
    pub fn set_right(&mut self, v: f32) {
        self.x = v - self.w;
    }

    pub fn set_top(&mut self, v: f32) {
        self.y = v;
    }

    /// Move so the bottom edge sits at `v`.
    pub fn set_bottom(&mut self, v: f32) {
        self.y = v - self.h;
    }

    /// Strict overlap test. Rectangles that only share an edge do not collide.
    pub fn collides(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Half-open point containment: left/top edges inclusive, right/bottom exclusive.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 16.0, 16.0);
        let b = Rect::new(16.0, 0.0, 16.0, 16.0);
        let c = Rect::new(0.0, 16.0, 16.0, 16.0);
        assert!(!a.collides(&b));
        assert!(!a.collides(&c));
    }

    #[test]
    fn overlapping_rects_collide_both_ways() {
        let a = Rect::new(0.0, 0.0, 16.0, 16.0);
        let b = Rect::new(15.5, 8.0, 4.0, 4.0);
        assert!(a.collides(&b));
        assert!(b.collides(&a));
    }

    #[test]
    fn edge_setters_keep_size() {
        let mut r = Rect::new(3.0, 4.0, 10.0, 20.0);
        r.set_bottom(48.0);
        assert_eq!(r.y, 28.0);
        assert_eq!(r.h, 20.0);
        r.set_right(32.0);
        assert_eq!(r.x, 22.0);
        assert_eq!(r.right(), 32.0);
    }

    #[test]
    fn contains_point_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(Vec2::new(0.0, 0.0)));
        assert!(r.contains_point(Vec2::new(9.9, 9.9)));
        assert!(!r.contains_point(Vec2::new(10.0, 5.0)));
    }
}
