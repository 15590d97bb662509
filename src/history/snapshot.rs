use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::artboard::{Artboard, ClipBoundary};
use crate::element::DesignObject;
use crate::error::EditorResult;
use crate::scene::Scene;

/// Format version written into every snapshot and export document
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of the whole scene.
///
/// History entries carry the artboard and clip with objects in scene
/// coordinates. The `design` half of an export omits both and stores object
/// positions relative to the artboard's top-left corner; on restore a missing
/// artboard is rebuilt and the objects are placed relative to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artboard: Option<Artboard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipBoundary>,
    #[serde(default)]
    pub objects: Vec<DesignObject>,
}

/// What a snapshot is taken for; decides which parts of the scene survive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotPurpose {
    /// Undo/redo entry: everything except stand-in objects
    History,
    /// Export `design`: no artboard, only exportable objects, positions
    /// relative to the artboard
    Export,
}

impl SnapshotPurpose {
    fn keeps(&self, object: &DesignObject) -> bool {
        match self {
            SnapshotPurpose::History => !object.flags.placeholder,
            SnapshotPurpose::Export => object.flags.is_exportable(),
        }
    }

    fn keeps_artboard(&self) -> bool {
        matches!(self, SnapshotPurpose::History)
    }
}

/// Converts between the live scene and its serialized snapshots.
///
/// This is the only place that knows which fields and objects are left out
/// of a snapshot.
pub struct SnapshotCodec;

impl SnapshotCodec {
    pub fn capture(scene: &Scene, purpose: SnapshotPurpose) -> SceneSnapshot {
        let keep_artboard = purpose.keeps_artboard();
        let offset = if keep_artboard {
            Vec2::ZERO
        } else {
            -scene.artboard().top_left().to_vec2()
        };
        SceneSnapshot {
            version: SNAPSHOT_VERSION,
            artboard: keep_artboard.then(|| scene.artboard().clone()),
            clip: keep_artboard.then(|| *scene.clip()),
            objects: scene
                .objects()
                .iter()
                .filter(|o| purpose.keeps(o))
                .map(|o| {
                    let mut object = o.clone();
                    object.translate(offset);
                    object
                })
                .collect(),
        }
    }

    pub fn encode(snapshot: &SceneSnapshot) -> EditorResult<String> {
        Ok(serde_json::to_string(snapshot)?)
    }

    pub fn decode(json: &str) -> EditorResult<SceneSnapshot> {
        Ok(serde_json::from_str(json)?)
    }

    /// Capture and encode a history entry in one step
    pub fn encode_scene(scene: &Scene) -> EditorResult<String> {
        Self::encode(&Self::capture(scene, SnapshotPurpose::History))
    }

    /// Load a snapshot into the live scene.
    ///
    /// `fallback_artboard` is used when the snapshot carries none, and the
    /// objects, stored relative to the artboard, are moved onto it. The clip
    /// is rebuilt from the artboard when missing. Returns whether the
    /// fallback was needed.
    pub fn restore(scene: &mut Scene, snapshot: SceneSnapshot, fallback_artboard: Artboard) -> bool {
        let SceneSnapshot {
            artboard,
            clip,
            mut objects,
            ..
        } = snapshot;
        let reconstructed = artboard.is_none();
        let artboard = match artboard {
            Some(artboard) => artboard,
            None => {
                let offset = fallback_artboard.top_left().to_vec2();
                for object in &mut objects {
                    object.translate(offset);
                }
                fallback_artboard
            }
        };
        let clip = clip.unwrap_or_else(|| ClipBoundary::from_artboard(&artboard));
        scene.replace_contents(artboard, clip, objects);
        reconstructed
    }
}
