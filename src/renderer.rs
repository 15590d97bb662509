use egui::epaint::{Mesh, TextShape, Vertex};
use egui::{Color32, Context, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2, pos2};

use crate::editor::Editor;
use crate::element::{DesignObject, ImageElement, ObjectKind, ShapeElement, ShapeKind, TextElement};
use crate::eraser::EraseSession;
use crate::texture_manager::TextureManager;
use crate::viewport::Viewport;
use crate::widgets::TransformHandle;
use crate::widgets::resize_handle;

const SELECTION_COLOR: Color32 = Color32::from_rgb(33, 150, 243);
const ARTBOARD_OUTLINE: Color32 = Color32::from_gray(150);
const ERASE_PREVIEW: Color32 = Color32::from_rgba_premultiplied(120, 40, 40, 120);
const HANDLE_SIZE: f32 = 10.0;
const ELLIPSE_SEGMENTS: usize = 48;
const TEXTURE_CACHE_SIZE: usize = 64;

/// Draws the scene, selection chrome and erase preview onto an egui painter
pub struct Renderer {
    textures: TextureManager,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            textures: TextureManager::new(TEXTURE_CACHE_SIZE),
        }
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    /// Render one frame of the editor into `canvas_rect`
    pub fn render(&mut self, ctx: &Context, painter: &Painter, canvas_rect: Rect, editor: &Editor) {
        self.textures.begin_frame();
        let scene = editor.scene();
        let view = CanvasView {
            origin: canvas_rect.min.to_vec2(),
            viewport: *scene.viewport(),
        };

        let painter = painter.with_clip_rect(canvas_rect);
        painter.rect_filled(canvas_rect, 0.0, Color32::from_gray(235));

        let artboard = view.rect(scene.artboard().rect());
        match scene.artboard().fill {
            Some(fill) => {
                painter.rect_filled(artboard, 0.0, fill.to_color32());
            }
            None => draw_dashed_rect(&painter, artboard, Stroke::new(1.0, ARTBOARD_OUTLINE)),
        }

        // Content outside the clip boundary is hidden
        let clipped = painter.with_clip_rect(view.rect(scene.clip().rect()).intersect(canvas_rect));
        for object in scene.objects().iter().filter(|o| o.flags.visible) {
            match &object.kind {
                ObjectKind::Text(text) => draw_text(&clipped, &view, object, text),
                ObjectKind::Image(image) => self.draw_image(ctx, &clipped, &view, object, image),
                ObjectKind::Shape(shape) => draw_shape(&clipped, &view, object, shape),
            }
        }

        if let Some(session) = editor.erase_session() {
            draw_erase_preview(&clipped, &view, session);
        }

        self.draw_selection(&painter, &view, editor);

        if let Some(rect) = editor.interaction().marquee_rect() {
            let rect = view.rect(rect);
            painter.rect_filled(rect, 0.0, SELECTION_COLOR.gamma_multiply(0.1));
            painter.rect_stroke(rect, 0.0, Stroke::new(1.0, SELECTION_COLOR));
        }

        self.textures.release_unused();
    }

    fn draw_image(
        &mut self,
        ctx: &Context,
        painter: &Painter,
        view: &CanvasView,
        object: &DesignObject,
        image: &ImageElement,
    ) {
        let texture = match self.textures.texture_for(object.id, image, ctx) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("Skipping image {}: {}", object.id, e);
                return;
            }
        };

        // The object matrix carries the flips, so fixed UVs mirror correctly
        let matrix = object.matrix();
        let half = image.natural_size() / 2.0;
        let tint = Color32::WHITE.gamma_multiply(object.opacity);
        let mut mesh = Mesh::with_texture(texture);
        for (local, uv) in [
            (pos2(-half.x, -half.y), pos2(0.0, 0.0)),
            (pos2(half.x, -half.y), pos2(1.0, 0.0)),
            (pos2(half.x, half.y), pos2(1.0, 1.0)),
            (pos2(-half.x, half.y), pos2(0.0, 1.0)),
        ] {
            mesh.vertices.push(Vertex {
                pos: view.point(matrix.transform_point(local)),
                uv,
                color: tint,
            });
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        painter.add(Shape::mesh(mesh));
    }

    fn draw_selection(&self, painter: &Painter, view: &CanvasView, editor: &Editor) {
        let scene = editor.scene();
        let ids = editor.selection().ids();
        for id in ids {
            let Some(object) = scene.get(*id) else {
                continue;
            };
            let outline: Vec<Pos2> = object.corners().iter().map(|c| view.point(*c)).collect();
            painter.add(Shape::closed_line(outline, Stroke::new(1.5, SELECTION_COLOR)));
        }

        // Handles only for a single selection outside of erasing
        if ids.len() != 1 || editor.erase_session().is_some() {
            return;
        }
        let Some(object) = scene.get(ids[0]) else {
            return;
        };
        let corners = object.corners();
        let top_mid = view.point(corners[0].lerp(corners[1], 0.5));
        let locks = object.flags.locked;
        for (handle, pos) in resize_handle::handle_positions(object, scene.viewport()) {
            let pos = pos + view.origin;
            match handle {
                TransformHandle::Scale(_) if !locks.scaling => {
                    resize_handle::draw_scale_handle(painter, pos, HANDLE_SIZE);
                }
                TransformHandle::Rotate if !locks.rotation => {
                    resize_handle::draw_rotate_handle(painter, pos, top_mid, HANDLE_SIZE);
                }
                _ => {}
            }
        }
    }
}

/// Maps scene coordinates onto the canvas widget
struct CanvasView {
    origin: Vec2,
    viewport: Viewport,
}

impl CanvasView {
    fn point(&self, scene: Pos2) -> Pos2 {
        self.viewport.scene_to_screen(scene) + self.origin
    }

    fn rect(&self, scene: Rect) -> Rect {
        self.viewport.scene_rect_to_screen(scene).translate(self.origin)
    }
}

fn draw_text(painter: &Painter, view: &CanvasView, object: &DesignObject, text: &TextElement) {
    let corners = object.corners();
    let screen: Vec<Pos2> = corners.iter().map(|c| view.point(*c)).collect();
    if let Some(background) = text.text_background_color {
        painter.add(Shape::convex_polygon(
            screen.clone(),
            background.to_color32().gamma_multiply(object.opacity),
            Stroke::NONE,
        ));
    }

    let size = text.font_size * object.transform.scale_y * view.viewport.zoom;
    if size < 0.5 {
        return;
    }
    let color = text.fill.to_color32().gamma_multiply(object.opacity);
    let galley = painter.layout_no_wrap(text.text.clone(), FontId::proportional(size), color);
    let shape = TextShape::new(screen[0], galley, color).with_angle(object.transform.angle.to_radians());
    painter.add(shape);
}

fn draw_shape(painter: &Painter, view: &CanvasView, object: &DesignObject, shape: &ShapeElement) {
    let fill = shape.fill.to_color32().gamma_multiply(object.opacity);
    let points: Vec<Pos2> = match shape.shape {
        ShapeKind::Rect => object.corners().iter().map(|c| view.point(*c)).collect(),
        ShapeKind::Ellipse => {
            let matrix = object.matrix();
            let radii = Vec2::new(shape.width, shape.height) / 2.0;
            (0..ELLIPSE_SEGMENTS)
                .map(|i| {
                    let t = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
                    view.point(matrix.transform_point(pos2(radii.x * t.cos(), radii.y * t.sin())))
                })
                .collect()
        }
    };
    painter.add(Shape::convex_polygon(points, fill, Stroke::NONE));
}

fn draw_erase_preview(painter: &Painter, view: &CanvasView, session: &EraseSession) {
    let zoom = view.viewport.zoom;
    for stroke in session.strokes() {
        let points: Vec<Pos2> = stroke.points().map(|p| view.point(p)).collect();
        draw_brush_path(painter, &points, stroke.width() * zoom);
    }
    let current: Vec<Pos2> = session.current_points().iter().map(|p| view.point(*p)).collect();
    draw_brush_path(painter, &current, session.brush_size() * zoom);
}

fn draw_brush_path(painter: &Painter, points: &[Pos2], width: f32) {
    match points {
        [] => {}
        [only] => {
            painter.circle_filled(*only, width / 2.0, ERASE_PREVIEW);
        }
        _ => {
            painter.add(Shape::line(points.to_vec(), Stroke::new(width, ERASE_PREVIEW)));
            for end in [points[0], points[points.len() - 1]] {
                painter.circle_filled(end, width / 2.0, ERASE_PREVIEW);
            }
        }
    }
}

fn draw_dashed_rect(painter: &Painter, rect: Rect, stroke: Stroke) {
    let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom(), rect.left_top()];
    painter.extend(Shape::dashed_line(&corners, stroke, 6.0, 4.0));
}
