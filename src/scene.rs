use egui::{Pos2, Rect, Vec2};
use log::debug;

use crate::artboard::{Artboard, ClipBoundary};
use crate::element::DesignObject;
use crate::geometry;
use crate::id_generator::{ObjectId, generate_id};
use crate::util::Color;
use crate::viewport::Viewport;

/// One slot of the stacking order, bottom first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackEntry {
    Artboard,
    Object(ObjectId),
}

/// The editable scene: the artboard, its clip boundary, the ordered design
/// objects (index 0 is drawn first, directly above the artboard) and the
/// current view transform.
#[derive(Debug, Clone)]
pub struct Scene {
    artboard: Artboard,
    clip: ClipBoundary,
    objects: Vec<DesignObject>,
    viewport: Viewport,
}

impl Scene {
    pub fn new(artboard: Artboard) -> Self {
        Self {
            clip: ClipBoundary::from_artboard(&artboard),
            artboard,
            objects: Vec::new(),
            viewport: Viewport::IDENTITY,
        }
    }

    pub fn artboard(&self) -> &Artboard {
        &self.artboard
    }

    pub fn clip(&self) -> &ClipBoundary {
        &self.clip
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_artboard_fill(&mut self, fill: Option<Color>) {
        self.artboard.fill = fill;
    }

    /// Move the artboard to `top_left`, carrying every object along so that
    /// artboard-relative geometry is unchanged
    pub fn move_artboard(&mut self, top_left: Pos2) {
        let delta = top_left - self.artboard.top_left();
        if delta == Vec2::ZERO {
            return;
        }
        self.artboard.left = top_left.x;
        self.artboard.top = top_left.y;
        for object in &mut self.objects {
            object.translate(delta);
        }
        self.clip = ClipBoundary::from_artboard(&self.artboard);
    }

    /// Replace artboard, clip and objects wholesale (history replay, design load)
    pub fn replace_contents(&mut self, artboard: Artboard, clip: ClipBoundary, objects: Vec<DesignObject>) {
        self.artboard = artboard;
        self.clip = clip;
        self.objects = objects;
    }

    pub fn objects(&self) -> &[DesignObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id).collect()
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: ObjectId) -> Option<&DesignObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut DesignObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Bottom-to-top stacking order; the artboard is always first
    pub fn stacking_order(&self) -> Vec<StackEntry> {
        std::iter::once(StackEntry::Artboard)
            .chain(self.objects.iter().map(|o| StackEntry::Object(o.id)))
            .collect()
    }

    /// Append an object on top, assigning an id if it has none, and clamp it
    /// to the artboard
    pub fn add_object(&mut self, mut object: DesignObject) -> ObjectId {
        if !object.id.is_assigned() {
            object.id = generate_id();
        }
        let id = object.id;
        debug!("Adding {} object {}", object.element_type(), id);
        self.objects.push(object);
        geometry::clamp_to_artboard(self, id);
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<DesignObject> {
        let index = self.index_of(id)?;
        Some(self.objects.remove(index))
    }

    /// Remove every listed object that exists, returning the removed ones
    pub fn remove_objects(&mut self, ids: &[ObjectId]) -> Vec<DesignObject> {
        ids.iter().filter_map(|id| self.remove_object(*id)).collect()
    }

    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        self.move_to_index(id, self.objects.len().saturating_sub(1))
    }

    /// Move an object to the lowest slot, which is directly above the artboard
    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        self.move_to_index(id, 0)
    }

    /// Move one slot up the stack
    pub fn reorder_forward(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.objects.len() => self.move_to_index(id, index + 1),
            _ => false,
        }
    }

    /// Move one slot down the stack, never below the artboard
    pub fn reorder_backward(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => self.move_to_index(id, index - 1),
            _ => false,
        }
    }

    fn move_to_index(&mut self, id: ObjectId, target: usize) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if index == target {
            return false;
        }
        let object = self.objects.remove(index);
        self.objects.insert(target.min(self.objects.len()), object);
        true
    }

    /// Topmost selectable object under a scene-space point. Hidden and fully
    /// locked objects are skipped.
    pub fn object_at(&self, pos: Pos2) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .filter(|o| o.flags.visible && !o.flags.locked.is_fully_locked())
            .find(|o| o.hit_test(pos))
            .map(|o| o.id)
    }

    /// Selectable objects whose bounding rect intersects `rect`, bottom first
    pub fn objects_in_rect(&self, rect: Rect) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.flags.visible && !o.flags.locked.is_fully_locked())
            .filter(|o| o.bounding_rect().intersects(rect))
            .map(|o| o.id)
            .collect()
    }

    /// Bounding rect of an object as seen through the current viewport
    pub fn bounding_rect_of(&self, id: ObjectId) -> Option<Rect> {
        self.get(id)
            .map(|o| self.viewport.scene_rect_to_screen(o.bounding_rect()))
    }

    /// Artboard rect as seen through the current viewport
    pub fn artboard_view_rect(&self) -> Rect {
        self.viewport.scene_rect_to_screen(self.artboard.rect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ShapeKind, factory};

    fn square(center: Pos2) -> DesignObject {
        factory::create_shape(ShapeKind::Rect, Vec2::splat(20.0), Color::BLACK, center)
    }

    #[test]
    fn test_add_assigns_id_and_keeps_explicit_one() {
        let mut scene = Scene::new(Artboard::new(500.0, 500.0));
        let id = scene.add_object(square(Pos2::new(100.0, 100.0)));
        assert!(id.is_assigned());

        let mut explicit = square(Pos2::new(50.0, 50.0));
        explicit.id = generate_id();
        let kept = explicit.id;
        assert_eq!(scene.add_object(explicit), kept);
    }

    #[test]
    fn test_move_artboard_carries_objects() {
        let mut scene = Scene::new(Artboard::new(500.0, 500.0));
        let id = scene.add_object(square(Pos2::new(100.0, 100.0)));
        scene.move_artboard(Pos2::new(40.0, 60.0));
        assert_eq!(scene.get(id).unwrap().center(), Pos2::new(140.0, 160.0));
        assert_eq!(scene.clip().rect(), scene.artboard().rect());
    }

    #[test]
    fn test_reorder_backward_stops_above_artboard() {
        let mut scene = Scene::new(Artboard::new(500.0, 500.0));
        let a = scene.add_object(square(Pos2::new(100.0, 100.0)));
        let b = scene.add_object(square(Pos2::new(120.0, 100.0)));
        assert!(scene.reorder_backward(b));
        assert!(!scene.reorder_backward(b));
        assert_eq!(
            scene.stacking_order(),
            vec![StackEntry::Artboard, StackEntry::Object(b), StackEntry::Object(a)]
        );
    }
}
