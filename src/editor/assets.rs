use egui::Pos2;
use image::RgbaImage;
use log::{debug, warn};

use super::Editor;
use crate::element::{ImageElement, factory};
use crate::error::EditorResult;
use crate::id_generator::ObjectId;

/// External collaborator that turns uploaded file bytes into pixels
pub trait ImageDecodeService: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> EditorResult<RgbaImage>;
}

/// Decoder backed by the `image` crate; accepts every format it was built with
#[derive(Debug, Default, Clone)]
pub struct RasterDecoder;

impl ImageDecodeService for RasterDecoder {
    fn decode(&self, bytes: &[u8]) -> EditorResult<RgbaImage> {
        Ok(image::load_from_memory(bytes)?.to_rgba8())
    }
}

impl Editor {
    /// Decode an uploaded file and place it centred on the artboard, scaled
    /// down to fit. A decode failure leaves the scene untouched.
    pub fn upload_image(&mut self, bytes: &[u8]) -> EditorResult<ObjectId> {
        let raster = self.decoder.decode(bytes).inspect_err(|e| {
            warn!("Upload rejected: {}", e);
        })?;
        let element = ImageElement::from_raster(raster)?;
        let natural = element.natural_size();
        let artboard = self.scene.artboard();
        let fit = self.config.upload_fit_ratio;
        let scale = (artboard.width * fit / natural.x)
            .min(artboard.height * fit / natural.y)
            .min(1.0);
        let center = artboard.rect().center();
        debug!(
            "Placing {}x{} upload at scale {:.3}",
            natural.x, natural.y, scale
        );

        let id = self.add_object(factory::create_image(element, center, scale));
        self.selection.select_only(id);
        self.after_selection_change();
        Ok(id)
    }

    /// Add a default text object centred on a scene point and select it
    pub fn add_text(&mut self, center: Pos2) -> ObjectId {
        let object = factory::create_text(
            self.config.default_text.clone(),
            self.config.default_font_family.clone(),
            self.config.default_font_size,
            center,
        );
        let id = self.add_object(object);
        self.selection.select_only(id);
        self.after_selection_change();
        id
    }
}
