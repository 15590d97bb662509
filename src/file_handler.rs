use std::sync::Arc;

use eframe::egui;

/// An uploaded image file waiting to be decoded by the editor
#[derive(Debug, Clone)]
pub struct DroppedImage {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

/// Collects image files dropped onto the window
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
    processed_files: Vec<String>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up newly dropped files from the UI context.
    /// Returns true if any new files arrived.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;

        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });

        new_dropped_files
    }

    /// Drain the dropped files, returning the bytes of every image among them
    pub fn take_dropped_images(&mut self) -> Vec<DroppedImage> {
        let mut images = Vec::new();

        for file in std::mem::take(&mut self.dropped_files) {
            let file_name = file_name(&file);

            if self.processed_files.contains(&file_name) {
                continue;
            }

            if !is_image_file(&file) {
                log::warn!("Dropped file is not a supported type: {}", file_name);
                continue;
            }

            if let Some(bytes) = read_bytes(&file, &file_name) {
                log::info!("Uploading {} ({} bytes)", file_name, bytes.len());
                self.processed_files.push(file_name.clone());
                images.push(DroppedImage { name: file_name, bytes });
            }
        }

        images
    }

    /// Overlay listing the files being dragged over the window
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop to upload:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(20.0),
            Color32::WHITE,
        );
    }

    /// Forget which files were already uploaded, so they can be dropped again
    pub fn clear_processed_files(&mut self) {
        self.dropped_files.clear();
        self.processed_files.clear();
    }
}

fn file_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = file
        .path
        .as_ref()
        .and_then(|p| p.extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .or_else(|| file.name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()));
    matches!(
        name.as_deref(),
        Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
    )
}

fn read_bytes(file: &egui::DroppedFile, file_name: &str) -> Option<Arc<[u8]>> {
    if let Some(bytes) = &file.bytes {
        return Some(Arc::clone(bytes));
    }

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = &file.path {
        return match std::fs::read(path) {
            Ok(bytes) => Some(bytes.into()),
            Err(err) => {
                log::error!("Failed to read image file: {}: {}", path.display(), err);
                None
            }
        };
    }

    log::warn!("Dropped file has no accessible data: {}", file_name);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dropped(name: &str, mime: &str, bytes: &[u8]) -> egui::DroppedFile {
        egui::DroppedFile {
            name: name.to_owned(),
            mime: mime.to_owned(),
            bytes: Some(bytes.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_image_detection() {
        assert!(is_image_file(&dropped("a.bin", "image/png", b"")));
        assert!(!is_image_file(&dropped("a.png", "text/plain", b"")));
        assert!(is_image_file(&dropped("photo.JPG", "", b"")));
        assert!(!is_image_file(&dropped("notes.txt", "", b"")));
    }

    #[test]
    fn test_each_file_is_taken_once() {
        let mut handler = FileHandler::new();
        handler.dropped_files = vec![dropped("a.png", "image/png", &[1, 2, 3]), dropped("b.txt", "", &[4])];
        let images = handler.take_dropped_images();
        assert_eq!(images.len(), 1);
        assert_eq!(&*images[0].bytes, &[1, 2, 3]);

        handler.dropped_files = vec![dropped("a.png", "image/png", &[1, 2, 3])];
        assert!(handler.take_dropped_images().is_empty());

        handler.clear_processed_files();
        handler.dropped_files = vec![dropped("a.png", "image/png", &[1, 2, 3])];
        assert_eq!(handler.take_dropped_images().len(), 1);
    }
}
