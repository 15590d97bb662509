use egui::{Pos2, Rect, Vec2};

/// View transform (pan/zoom) of the editing surface.
///
/// `screen = scene * zoom + pan`. Zoom and pan never touch object geometry;
/// objects always live in design units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Viewport {
    pub const IDENTITY: Viewport = Viewport {
        zoom: 1.0,
        pan: Vec2::ZERO,
    };

    pub fn new(zoom: f32, pan: Vec2) -> Self {
        Self { zoom, pan }
    }

    /// Convert a scene-space point to screen coordinates
    pub fn scene_to_screen(&self, scene: Pos2) -> Pos2 {
        Pos2::new(
            scene.x * self.zoom + self.pan.x,
            scene.y * self.zoom + self.pan.y,
        )
    }

    /// Convert a screen-space point to scene coordinates
    pub fn screen_to_scene(&self, screen: Pos2) -> Pos2 {
        Pos2::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    pub fn scene_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.scene_to_screen(rect.min), self.scene_to_screen(rect.max))
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Set a new zoom factor, keeping the scene point under `anchor` fixed
    pub fn zoom_at(&mut self, anchor: Pos2, zoom: f32) {
        let scene_anchor = self.screen_to_scene(anchor);
        self.zoom = zoom;
        self.pan = anchor.to_vec2() - scene_anchor.to_vec2() * zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let vp = Viewport::new(2.5, Vec2::new(137.0, -42.0));
        let p = Pos2::new(10.0, 20.0);
        let back = vp.screen_to_scene(vp.scene_to_screen(p));
        assert!((back - p).length() < 1e-4);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut vp = Viewport::new(1.0, Vec2::new(30.0, 10.0));
        let anchor = Pos2::new(200.0, 150.0);
        let before = vp.screen_to_scene(anchor);
        vp.zoom_at(anchor, 3.0);
        let after = vp.screen_to_scene(anchor);
        assert!((before - after).length() < 1e-3);
        assert_eq!(vp.zoom, 3.0);
    }
}
