use egui::{Color32, CursorIcon, Painter, Pos2, Stroke, Vec2};

use crate::element::DesignObject;
use crate::geometry::transform::rotate_vec;
use crate::viewport::Viewport;

/// Distance in screen pixels between the top edge and the rotation handle
pub const ROTATE_HANDLE_OFFSET: f32 = 30.0;

const HANDLE_FILL: Color32 = Color32::from_rgb(30, 120, 255);

/// Represents a corner of a selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Index into `DesignObject::corners`
    pub fn index(&self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }

    pub fn opposite(&self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomRight => Corner::TopLeft,
            Corner::BottomLeft => Corner::TopRight,
        }
    }

    /// Direction of this corner from the centre in the unrotated frame
    pub fn sign(&self) -> Vec2 {
        match self {
            Corner::TopLeft => Vec2::new(-1.0, -1.0),
            Corner::TopRight => Vec2::new(1.0, -1.0),
            Corner::BottomRight => Vec2::new(1.0, 1.0),
            Corner::BottomLeft => Vec2::new(-1.0, 1.0),
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Corner::TopLeft => CursorIcon::ResizeNwSe,
            Corner::TopRight => CursorIcon::ResizeNeSw,
            Corner::BottomLeft => CursorIcon::ResizeNeSw,
            Corner::BottomRight => CursorIcon::ResizeNwSe,
        }
    }
}

/// An interactive control drawn around the single selected object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformHandle {
    Scale(Corner),
    Rotate,
}

impl TransformHandle {
    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            TransformHandle::Scale(corner) => corner.cursor_icon(),
            TransformHandle::Rotate => CursorIcon::Alias,
        }
    }
}

/// Screen positions of every handle of `object`
pub fn handle_positions(object: &DesignObject, viewport: &Viewport) -> Vec<(TransformHandle, Pos2)> {
    let corners = object.corners();
    let mut handles: Vec<_> = Corner::ALL
        .iter()
        .map(|c| (TransformHandle::Scale(*c), viewport.scene_to_screen(corners[c.index()])))
        .collect();

    let top_mid = corners[0].lerp(corners[1], 0.5);
    let up = rotate_vec(Vec2::new(0.0, -1.0), object.transform.angle);
    handles.push((
        TransformHandle::Rotate,
        viewport.scene_to_screen(top_mid) + up * ROTATE_HANDLE_OFFSET,
    ));
    handles
}

/// The handle under a screen point, if any, honouring lock flags
pub fn handle_at(object: &DesignObject, viewport: &Viewport, screen: Pos2, radius: f32) -> Option<TransformHandle> {
    let locks = object.flags.locked;
    handle_positions(object, viewport)
        .into_iter()
        .filter(|(handle, _)| match handle {
            TransformHandle::Scale(_) => !locks.scaling,
            TransformHandle::Rotate => !locks.rotation,
        })
        .find(|(_, pos)| (*pos - screen).length() <= radius)
        .map(|(handle, _)| handle)
}

/// Draw a corner scale handle
pub fn draw_scale_handle(painter: &Painter, position: Pos2, size: f32) {
    painter.rect_filled(egui::Rect::from_center_size(position, Vec2::splat(size)), 2.0, HANDLE_FILL);
    painter.rect_stroke(
        egui::Rect::from_center_size(position, Vec2::splat(size)),
        2.0,
        Stroke::new(1.0, Color32::WHITE),
    );
}

/// Draw the rotation handle and its stem back to the top edge
pub fn draw_rotate_handle(painter: &Painter, position: Pos2, stem_from: Pos2, size: f32) {
    painter.line_segment([stem_from, position], Stroke::new(1.0, HANDLE_FILL));
    painter.circle_filled(position, size / 2.0, HANDLE_FILL);
    painter.circle_stroke(position, size / 2.0, Stroke::new(1.0, Color32::WHITE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ShapeKind, factory};
    use crate::util::Color;

    #[test]
    fn test_opposite_corners() {
        for corner in Corner::ALL {
            assert_eq!(corner.opposite().opposite(), corner);
            assert_eq!(corner.sign(), -corner.opposite().sign());
        }
    }

    #[test]
    fn test_handle_hit_respects_locks() {
        let mut object = factory::create_shape(ShapeKind::Rect, Vec2::splat(100.0), Color::BLACK, Pos2::new(200.0, 200.0));
        let vp = Viewport::IDENTITY;
        let bottom_right = Pos2::new(250.0, 250.0);
        assert_eq!(
            handle_at(&object, &vp, bottom_right, 8.0),
            Some(TransformHandle::Scale(Corner::BottomRight))
        );
        object.flags.locked.scaling = true;
        assert_eq!(handle_at(&object, &vp, bottom_right, 8.0), None);
    }
}
