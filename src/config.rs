use serde::{Deserialize, Serialize};

/// Tunable editor settings.
///
/// Every field has a default, so a partial JSON document only needs to name
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Printable area width in design units
    pub artboard_width: f32,
    /// Printable area height in design units
    pub artboard_height: f32,
    /// Number of undo steps kept; the stack also holds the current state
    pub history_cap: usize,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Zoom multiplier per scroll unit, raised to the power of the scroll delta
    pub scroll_zoom_base: f32,
    pub eraser_default_size: f32,
    pub eraser_min_size: f32,
    pub eraser_max_size: f32,
    /// Maximum delay between two taps on a text object that enters live editing
    pub double_tap_secs: f64,
    pub nudge_step: f32,
    pub nudge_step_large: f32,
    pub default_text: String,
    pub default_font_size: f32,
    pub default_font_family: String,
    /// Hit radius of transform handles, in screen pixels
    pub handle_radius: f32,
    /// Fraction of the artboard an uploaded image may cover when first placed
    pub upload_fit_ratio: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            artboard_width: 500.0,
            artboard_height: 500.0,
            history_cap: 50,
            min_zoom: 0.1,
            max_zoom: 5.0,
            scroll_zoom_base: 0.999,
            eraser_default_size: 20.0,
            eraser_min_size: 5.0,
            eraser_max_size: 100.0,
            double_tap_secs: 0.4,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            default_text: "Heading".to_owned(),
            default_font_size: 48.0,
            default_font_family: "Ubuntu".to_owned(),
            handle_radius: 8.0,
            upload_fit_ratio: 0.8,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON configuration over the defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Clamp a requested eraser diameter into the configured range
    pub fn clamp_eraser_size(&self, size: f32) -> f32 {
        size.clamp(self.eraser_min_size, self.eraser_max_size)
    }

    /// Clamp a requested zoom factor into the configured range
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
