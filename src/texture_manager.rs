use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::RgbaImage;
use thiserror::Error;

use crate::element::ImageElement;
use crate::id_generator::ObjectId;

/// Errors that can occur while uploading an image to the GPU
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Failed to generate texture: {0}")]
    GenerationFailed(String),
    #[error("Invalid texture dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

type CacheKey = (ObjectId, u64);

/// Caches GPU textures for image objects.
///
/// Entries are keyed by object id and source fingerprint, so an erased or
/// replaced image gets a fresh texture while moves and restyles reuse the
/// cached one.
pub struct TextureManager {
    texture_cache: HashMap<CacheKey, TextureHandle>,
    /// Frame each entry was last drawn in
    last_used: HashMap<CacheKey, u64>,
    current_frame: u64,
    max_cache_size: usize,
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size,
        }
    }

    /// Call once at the start of every frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Texture for an image object, decoding and uploading it on a miss
    pub fn texture_for(
        &mut self,
        id: ObjectId,
        image: &ImageElement,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError> {
        self.get_or_create_texture(
            id,
            image.fingerprint(),
            || {
                let raster = image
                    .raster()
                    .map_err(|e| TextureGenerationError::GenerationFailed(e.to_string()))?;
                color_image(&raster)
            },
            ctx,
        )
    }

    pub fn get_or_create_texture<F>(
        &mut self,
        id: ObjectId,
        fingerprint: u64,
        generator: F,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        let cache_key = (id, fingerprint);

        if let Some(handle) = self.texture_cache.get(&cache_key) {
            self.last_used.insert(cache_key, self.current_frame);
            return Ok(handle.id());
        }

        // A new fingerprint supersedes every older texture of the same object
        self.invalidate_object(id);
        self.prune_cache_if_needed();

        let image = generator()?;
        let name = format!("object_{}_{:016x}", id, fingerprint);
        let handle = ctx.load_texture(name, image, TextureOptions::LINEAR);

        self.texture_cache.insert(cache_key, handle.clone());
        self.last_used.insert(cache_key, self.current_frame);
        log::debug!("Uploaded texture for {} ({} cached)", id, self.texture_cache.len());

        Ok(handle.id())
    }

    pub fn invalidate_object(&mut self, id: ObjectId) {
        self.texture_cache.retain(|(object, _), _| *object != id);
        self.last_used.retain(|(object, _), _| *object != id);
    }

    /// Drop textures that were not drawn this frame.
    ///
    /// Call at the end of a frame to release removed objects.
    pub fn release_unused(&mut self) {
        let frame = self.current_frame;
        self.last_used.retain(|_, used| *used == frame);
        let live = &self.last_used;
        self.texture_cache.retain(|key, _| live.contains_key(key));
    }

    /// Evict least recently used entries so one more fits under the cap
    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() < self.max_cache_size {
            return;
        }

        let mut entries: Vec<(CacheKey, u64)> = self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() + 1 - self.max_cache_size.max(1);
        for (key, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(key);
            self.last_used.remove(key);
        }
    }

    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    pub fn get_texture(&self, id: ObjectId, fingerprint: u64) -> Option<&TextureHandle> {
        self.texture_cache.get(&(id, fingerprint))
    }
}

fn color_image(raster: &RgbaImage) -> Result<ColorImage, TextureGenerationError> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureGenerationError::InvalidDimensions { width, height });
    }
    Ok(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        raster.as_raw(),
    ))
}
