use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::geometry::transform::{Matrix, rotate_vec};

/// Smallest scale factor an interactive resize may produce
pub const MIN_SCALE: f32 = 0.01;

/// Horizontal anchor of an object's stored position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginX {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical anchor of an object's stored position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginY {
    Top,
    #[default]
    Center,
    Bottom,
}

impl OriginX {
    /// Fraction of the width between the left edge and the anchor
    pub fn fraction(&self) -> f32 {
        match self {
            OriginX::Left => 0.0,
            OriginX::Center => 0.5,
            OriginX::Right => 1.0,
        }
    }
}

impl OriginY {
    /// Fraction of the height between the top edge and the anchor
    pub fn fraction(&self) -> f32 {
        match self {
            OriginY::Top => 0.0,
            OriginY::Center => 0.5,
            OriginY::Bottom => 1.0,
        }
    }
}

/// Compositing mode applied when an object is drawn over what is below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    SourceOver,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

impl BlendMode {
    pub const ALL: [BlendMode; 12] = [
        BlendMode::SourceOver,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BlendMode::SourceOver => "Normal",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
            BlendMode::Darken => "Darken",
            BlendMode::Lighten => "Lighten",
            BlendMode::ColorDodge => "Color dodge",
            BlendMode::ColorBurn => "Color burn",
            BlendMode::HardLight => "Hard light",
            BlendMode::SoftLight => "Soft light",
            BlendMode::Difference => "Difference",
            BlendMode::Exclusion => "Exclusion",
        }
    }
}

/// Placement of an object: an origin point plus the anchor it refers to,
/// independent scale factors, a clockwise angle in degrees and flip flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTransform {
    pub left: f32,
    pub top: f32,
    pub origin_x: OriginX,
    pub origin_y: OriginY,
    pub scale_x: f32,
    pub scale_y: f32,
    pub angle: f32,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            origin_x: OriginX::Center,
            origin_y: OriginY::Center,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }
}

impl ObjectTransform {
    /// Centred on `center`, unscaled and unrotated
    pub fn centered_at(center: Pos2) -> Self {
        Self {
            left: center.x,
            top: center.y,
            ..Self::default()
        }
    }

    pub fn origin_point(&self) -> Pos2 {
        Pos2::new(self.left, self.top)
    }

    /// Vector from the stored origin point to the centre, in scene space,
    /// for an object whose unscaled size is `size`
    fn origin_to_center(&self, size: Vec2) -> Vec2 {
        let local = Vec2::new(
            (0.5 - self.origin_x.fraction()) * size.x * self.scale_x,
            (0.5 - self.origin_y.fraction()) * size.y * self.scale_y,
        );
        rotate_vec(local, self.angle)
    }

    pub fn center(&self, size: Vec2) -> Pos2 {
        self.origin_point() + self.origin_to_center(size)
    }

    /// Move the object so that its centre lands on `center`
    pub fn set_center(&mut self, center: Pos2, size: Vec2) {
        let origin = center - self.origin_to_center(size);
        self.left = origin.x;
        self.top = origin.y;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.left += delta.x;
        self.top += delta.y;
    }

    /// Matrix mapping centre-relative local coordinates (unscaled units) to
    /// scene space: translate(centre) * rotate * scale(with flips)
    pub fn matrix(&self, size: Vec2) -> Matrix {
        let sx = if self.flip_x { -self.scale_x } else { self.scale_x };
        let sy = if self.flip_y { -self.scale_y } else { self.scale_y };
        Matrix::translation(self.center(size).to_vec2())
            .then_after(&Matrix::rotation_degrees(self.angle))
            .then_after(&Matrix::scale(sx, sy))
    }

    /// The four corners in scene space: top-left, top-right, bottom-right,
    /// bottom-left of the unrotated box
    pub fn corners(&self, size: Vec2) -> [Pos2; 4] {
        let m = self.matrix_without_flip(size);
        let h = size / 2.0;
        [
            m.transform_point(Pos2::new(-h.x, -h.y)),
            m.transform_point(Pos2::new(h.x, -h.y)),
            m.transform_point(Pos2::new(h.x, h.y)),
            m.transform_point(Pos2::new(-h.x, h.y)),
        ]
    }

    fn matrix_without_flip(&self, size: Vec2) -> Matrix {
        Matrix::translation(self.center(size).to_vec2())
            .then_after(&Matrix::rotation_degrees(self.angle))
            .then_after(&Matrix::scale(self.scale_x, self.scale_y))
    }

    /// Axis-aligned bounding rectangle of the transformed box
    pub fn bounding_rect(&self, size: Vec2) -> Rect {
        let corners = self.corners(size);
        let mut rect = Rect::NOTHING;
        for corner in corners {
            rect.extend_with(corner);
        }
        rect
    }

    /// Whether a scene-space point falls inside the transformed box
    pub fn contains(&self, size: Vec2, point: Pos2) -> bool {
        match self.matrix_without_flip(size).inverse() {
            Some(inv) => {
                let local = inv.transform_point(point);
                local.x.abs() <= size.x / 2.0 && local.y.abs() <= size.y / 2.0
            }
            None => false,
        }
    }
}

/// Independently lockable interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockFlags {
    pub movement_x: bool,
    pub movement_y: bool,
    pub scaling: bool,
    pub rotation: bool,
}

impl LockFlags {
    pub const ALL: LockFlags = LockFlags {
        movement_x: true,
        movement_y: true,
        scaling: true,
        rotation: true,
    };

    pub fn is_fully_locked(&self) -> bool {
        *self == Self::ALL
    }
}

/// Capability flags of a design object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectFlags {
    pub visible: bool,
    pub locked: LockFlags,
    pub excluded_from_export: bool,
    /// Stand-in objects (e.g. an upload in progress) never leave the editor
    pub placeholder: bool,
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self {
            visible: true,
            locked: LockFlags::default(),
            excluded_from_export: false,
            placeholder: false,
        }
    }
}

impl ObjectFlags {
    pub fn is_exportable(&self) -> bool {
        self.visible && !self.excluded_from_export && !self.placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_anchor_is_the_center() {
        let t = ObjectTransform::centered_at(Pos2::new(100.0, 50.0));
        assert_eq!(t.center(Vec2::new(40.0, 20.0)), Pos2::new(100.0, 50.0));
    }

    #[test]
    fn test_top_left_anchor_offsets_center() {
        let t = ObjectTransform {
            left: 10.0,
            top: 10.0,
            origin_x: OriginX::Left,
            origin_y: OriginY::Top,
            scale_x: 2.0,
            ..Default::default()
        };
        let c = t.center(Vec2::new(40.0, 20.0));
        assert!((c.x - 50.0).abs() < 1e-4);
        assert!((c.y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotated_bounding_rect_grows() {
        let mut t = ObjectTransform::centered_at(Pos2::new(0.0, 0.0));
        t.angle = 45.0;
        let rect = t.bounding_rect(Vec2::new(100.0, 100.0));
        let diag = 100.0 * std::f32::consts::SQRT_2;
        assert!((rect.width() - diag).abs() < 1e-3);
        assert!((rect.center().x).abs() < 1e-3);
    }

    #[test]
    fn test_contains_respects_rotation() {
        let mut t = ObjectTransform::centered_at(Pos2::new(0.0, 0.0));
        t.angle = 45.0;
        let size = Vec2::new(100.0, 10.0);
        assert!(t.contains(size, Pos2::new(30.0, 30.0)));
        assert!(!t.contains(size, Pos2::new(30.0, -30.0)));
    }
}
