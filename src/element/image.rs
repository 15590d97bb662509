use std::hash::{DefaultHasher, Hash, Hasher};
use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use base64::Engine;
use egui::Vec2;
use image::{ImageFormat, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};

use super::Element;
use crate::error::{EditorError, EditorResult};

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Raster image element.
///
/// `src` is the authoritative, serializable source (a `data:` URI). The
/// decoded pixels are cached next to it and rebuilt on demand after the
/// element comes back from a snapshot.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    src: String,
    natural_width: u32,
    natural_height: u32,
    #[serde(skip)]
    raster: OnceLock<Arc<RgbaImage>>,
    #[serde(skip)]
    fingerprint: OnceLock<u64>,
}

// Custom Debug implementation so the data URI doesn't flood logs
impl std::fmt::Debug for ImageElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageElement")
            .field("src_len", &self.src.len())
            .field("natural_width", &self.natural_width)
            .field("natural_height", &self.natural_height)
            .field("decoded", &self.raster.get().is_some())
            .finish()
    }
}

impl PartialEq for ImageElement {
    fn eq(&self, other: &Self) -> bool {
        self.natural_width == other.natural_width
            && self.natural_height == other.natural_height
            && self.src == other.src
    }
}

impl ImageElement {
    /// Build an element from decoded pixels, encoding them as a PNG data URI
    pub fn from_raster(raster: RgbaImage) -> EditorResult<Self> {
        let src = encode_png_data_uri(&raster)?;
        let (natural_width, natural_height) = raster.dimensions();
        let element = Self {
            src,
            natural_width,
            natural_height,
            raster: OnceLock::new(),
            fingerprint: OnceLock::new(),
        };
        let _ = element.raster.set(Arc::new(raster));
        Ok(element)
    }

    /// Build an element from an existing data URI, decoding it eagerly
    pub fn from_data_uri(src: impl Into<String>) -> EditorResult<Self> {
        let src = src.into();
        let raster = decode_data_uri(&src)?;
        let (natural_width, natural_height) = raster.dimensions();
        let element = Self {
            src,
            natural_width,
            natural_height,
            raster: OnceLock::new(),
            fingerprint: OnceLock::new(),
        };
        let _ = element.raster.set(Arc::new(raster));
        Ok(element)
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn natural_width(&self) -> u32 {
        self.natural_width
    }

    pub fn natural_height(&self) -> u32 {
        self.natural_height
    }

    pub fn natural_size(&self) -> Vec2 {
        Vec2::new(self.natural_width as f32, self.natural_height as f32)
    }

    /// Decoded pixels at natural resolution
    pub fn raster(&self) -> EditorResult<Arc<RgbaImage>> {
        if let Some(raster) = self.raster.get() {
            return Ok(Arc::clone(raster));
        }
        debug!("Decoding image source ({} bytes)", self.src.len());
        let raster = Arc::new(decode_data_uri(&self.src)?);
        // Another caller may have won the race; either copy is the same image
        let _ = self.raster.set(Arc::clone(&raster));
        Ok(raster)
    }

    /// Hash of the source, stable for as long as the pixels are unchanged
    pub fn fingerprint(&self) -> u64 {
        *self.fingerprint.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            self.src.hash(&mut hasher);
            hasher.finish()
        })
    }

    /// Replace the source with new pixels (used after erasing)
    pub fn replace_raster(&mut self, raster: RgbaImage) -> EditorResult<()> {
        *self = Self::from_raster(raster)?;
        Ok(())
    }
}

impl Element for ImageElement {
    fn element_type(&self) -> &'static str {
        "image"
    }

    fn local_size(&self) -> Vec2 {
        self.natural_size()
    }
}

/// Encode pixels as `data:image/png;base64,...`
pub fn encode_png_data_uri(raster: &RgbaImage) -> EditorResult<String> {
    let mut bytes = Vec::new();
    raster
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| EditorError::ImageEncode(e.to_string()))?;
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("{PNG_DATA_URI_PREFIX}{payload}"))
}

/// Decode a base64 `data:` URI into RGBA pixels
pub fn decode_data_uri(uri: &str) -> EditorResult<RgbaImage> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| EditorError::InvalidSource("not a data URI".to_owned()))?;
    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| EditorError::InvalidSource("missing data URI payload".to_owned()))?;
    if !metadata.ends_with(";base64") {
        return Err(EditorError::InvalidSource(format!(
            "unsupported data URI encoding '{metadata}'"
        )));
    }
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload)?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_data_uri_round_trip() {
        let raster = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let element = ImageElement::from_raster(raster.clone()).unwrap();
        assert!(element.src().starts_with(PNG_DATA_URI_PREFIX));
        assert_eq!(element.natural_size(), Vec2::new(3.0, 2.0));

        let decoded = decode_data_uri(element.src()).unwrap();
        assert_eq!(decoded, raster);
    }

    #[test]
    fn test_fingerprint_follows_pixels() {
        let mut element = ImageElement::from_raster(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]))).unwrap();
        let before = element.fingerprint();
        assert_eq!(element.clone().fingerprint(), before);
        element.replace_raster(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]))).unwrap();
        assert_ne!(element.fingerprint(), before);
    }

    #[test]
    fn test_raster_is_rebuilt_after_deserialization() {
        let raster = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        let element = ImageElement::from_raster(raster.clone()).unwrap();
        let json = serde_json::to_string(&element).unwrap();
        let restored: ImageElement = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, element);
        assert_eq!(*restored.raster().unwrap(), raster);
    }

    #[test]
    fn test_rejects_non_data_uri() {
        assert!(matches!(
            decode_data_uri("https://example.com/a.png"),
            Err(EditorError::InvalidSource(_))
        ));
    }
}
