use serde::{Deserialize, Serialize};

/// The mutually exclusive editing modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    #[default]
    Select,
    /// Next canvas click places a text object
    Text,
    Uploads,
    Layers,
    /// Freehand erasing on the selected image
    Erase,
}

impl ToolMode {
    pub const ALL: [ToolMode; 5] = [
        ToolMode::Select,
        ToolMode::Text,
        ToolMode::Uploads,
        ToolMode::Layers,
        ToolMode::Erase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolMode::Select => "select",
            ToolMode::Text => "text",
            ToolMode::Uploads => "uploads",
            ToolMode::Layers => "layers",
            ToolMode::Erase => "erase",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolMode::Select => "Select",
            ToolMode::Text => "Text",
            ToolMode::Uploads => "Uploads",
            ToolMode::Layers => "Layers",
            ToolMode::Erase => "Erase",
        }
    }

    /// Whether clicks on the canvas pick and drag objects in this mode
    pub fn allows_selection(&self) -> bool {
        !matches!(self, ToolMode::Erase | ToolMode::Text)
    }
}
