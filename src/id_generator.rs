use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a design object.
///
/// Assigned once at creation and carried through every snapshot, so undo/redo
/// can re-acquire objects by id after the scene has been rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// The "not yet assigned" id
    pub const UNASSIGNED: ObjectId = ObjectId(Uuid::nil());

    pub fn is_assigned(&self) -> bool {
        !self.0.is_nil()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn generate_id() -> ObjectId {
    ObjectId(Uuid::new_v4())
}
