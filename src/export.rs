//! Design-intent export.
//!
//! The document carries the scene twice: `design`, which can be loaded back
//! into the editor, and `normalized`, a flat artboard-relative description
//! of every exported object for consumers that know nothing about the editor.

use serde::{Deserialize, Serialize};

use crate::element::{BlendMode, DesignObject, FontStyle, FontWeight, ObjectKind, OriginX, OriginY, TextAlign};
use crate::error::EditorResult;
use crate::geometry;
use crate::history::{SNAPSHOT_VERSION, SceneSnapshot, SnapshotCodec, SnapshotPurpose};
use crate::id_generator::ObjectId;
use crate::scene::Scene;
use crate::util::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtboardSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransform {
    pub origin_left: f32,
    pub origin_top: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub angle: f32,
    pub flip_x: bool,
    pub flip_y: bool,
    pub origin_x: OriginX,
    pub origin_y: OriginY,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub text: String,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
    pub line_height: f32,
    pub char_spacing: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_background_color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStyle {
    pub opacity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(flatten)]
    pub text: Option<TextStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedObject {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub object_type: String,
    pub bounding_box: BoundingBox,
    pub transform: NormalizedTransform,
    pub style: NormalizedStyle,
}

/// The exported document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignIntent {
    pub version: u32,
    pub artboard: ArtboardSize,
    pub design: SceneSnapshot,
    pub normalized: Vec<NormalizedObject>,
}

impl DesignIntent {
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Build the design-intent document. All geometry is read with the view
/// transform at identity, so pan and zoom never leak into the output.
pub fn export_design(scene: &mut Scene) -> DesignIntent {
    geometry::with_identity_viewport(scene, |scene| {
        let design = SnapshotCodec::capture(scene, SnapshotPurpose::Export);
        let artboard = scene.artboard().size();
        let normalized = design
            .objects
            .iter()
            .filter_map(|object| normalize(scene, object))
            .collect();

        DesignIntent {
            version: SNAPSHOT_VERSION,
            artboard: ArtboardSize {
                width: artboard.x,
                height: artboard.y,
            },
            design,
            normalized,
        }
    })
}

fn normalize(scene: &mut Scene, object: &DesignObject) -> Option<NormalizedObject> {
    let rect = geometry::bounding_rect_in_artboard_space(scene, object.id)?;
    let origin = geometry::origin_in_artboard_space(scene, object.id)?;
    let t = &object.transform;
    let src = object.as_image().map(|image| image.src().to_owned());

    let text = match &object.kind {
        ObjectKind::Text(text) => Some(TextStyle {
            text: text.text.clone(),
            font_family: text.font_family.clone(),
            font_size: text.font_size,
            font_weight: text.font_weight,
            font_style: text.font_style,
            text_align: text.text_align,
            line_height: text.line_height,
            char_spacing: text.char_spacing,
            text_background_color: text.text_background_color,
        }),
        _ => None,
    };
    let blend_mode = object.is_image().then(|| object.blend_mode.unwrap_or_default());

    Some(NormalizedObject {
        id: object.id,
        object_type: object.element_type().to_owned(),
        bounding_box: BoundingBox {
            left: rect.min.x,
            top: rect.min.y,
            width: rect.width(),
            height: rect.height(),
        },
        transform: NormalizedTransform {
            origin_left: origin.x,
            origin_top: origin.y,
            scale_x: t.scale_x,
            scale_y: t.scale_y,
            angle: t.angle,
            flip_x: t.flip_x,
            flip_y: t.flip_y,
            origin_x: t.origin_x,
            origin_y: t.origin_y,
            src: src.clone(),
            blend_mode,
        },
        style: NormalizedStyle {
            opacity: object.opacity,
            fill: object.fill(),
            text,
            src,
            blend_mode,
        },
    })
}
