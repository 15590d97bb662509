//! Artboard-relative geometry.
//!
//! Every query here runs with the view transform reset to identity, so the
//! results are in design units no matter how the user has panned or zoomed.

use egui::{Pos2, Rect, Vec2};

use crate::id_generator::ObjectId;
use crate::scene::Scene;
use crate::viewport::Viewport;

/// Run `f` with the scene's view transform temporarily set to identity
pub fn with_identity_viewport<R>(scene: &mut Scene, f: impl FnOnce(&mut Scene) -> R) -> R {
    let saved = *scene.viewport();
    scene.set_viewport(Viewport::IDENTITY);
    let result = f(scene);
    scene.set_viewport(saved);
    result
}

/// The artboard's axis-aligned rect in identity-viewport space
pub fn artboard_rect(scene: &mut Scene) -> Rect {
    with_identity_viewport(scene, |s| s.artboard_view_rect())
}

/// An object's stored origin point relative to the artboard's top-left
/// corner. `None` when the object does not exist.
pub fn origin_in_artboard_space(scene: &mut Scene, id: ObjectId) -> Option<Pos2> {
    with_identity_viewport(scene, |s| {
        let object = s.get(id)?;
        let origin = s.viewport().scene_to_screen(object.transform.origin_point());
        let artboard = s.artboard_view_rect();
        Some((origin - artboard.min).to_pos2())
    })
}

/// Bounding rect relative to the artboard's top-left corner
pub fn bounding_rect_in_artboard_space(scene: &mut Scene, id: ObjectId) -> Option<Rect> {
    with_identity_viewport(scene, |s| {
        let rect = s.bounding_rect_of(id)?;
        let artboard = s.artboard_view_rect();
        Some(rect.translate(-artboard.min.to_vec2()))
    })
}

/// Shift needed to bring `object` back onto `artboard`.
///
/// Per axis: an object no larger than the artboard must lie fully inside it;
/// a larger one only needs its centre inside, so full-bleed designs may
/// overhang.
pub fn containment_delta(object: Rect, artboard: Rect) -> Vec2 {
    Vec2::new(
        axis_delta(object.min.x, object.max.x, artboard.min.x, artboard.max.x),
        axis_delta(object.min.y, object.max.y, artboard.min.y, artboard.max.y),
    )
}

fn axis_delta(min: f32, max: f32, lo: f32, hi: f32) -> f32 {
    if max - min <= hi - lo {
        if min < lo {
            lo - min
        } else if max > hi {
            hi - max
        } else {
            0.0
        }
    } else {
        let center = (min + max) / 2.0;
        if center < lo {
            lo - center
        } else if center > hi {
            hi - center
        } else {
            0.0
        }
    }
}

/// Clamp one object to the artboard. Returns the applied scene-space shift,
/// or `None` when the object does not exist.
pub fn clamp_to_artboard(scene: &mut Scene, id: ObjectId) -> Option<Vec2> {
    clamp_group_to_artboard(scene, &[id])
}

/// Clamp a group of objects as one unit using their union rect
pub fn clamp_group_to_artboard(scene: &mut Scene, ids: &[ObjectId]) -> Option<Vec2> {
    let delta = with_identity_viewport(scene, |s| {
        let rect = ids
            .iter()
            .filter_map(|id| s.bounding_rect_of(*id))
            .reduce(|a, b| a.union(b))?;
        let view_delta = containment_delta(rect, s.artboard_view_rect());
        Some(view_delta / s.viewport().zoom)
    })?;
    if delta != Vec2::ZERO {
        for id in ids {
            if let Some(object) = scene.get_mut(*id) {
                object.translate(delta);
            }
        }
    }
    Some(delta)
}
