use std::task::{Context as TaskContext, Poll};

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::error::EditorResult;
use crate::file_handler::FileHandler;
use crate::id_generator::ObjectId;
use crate::input::InputHandler;
use crate::panels;
use crate::renderer::Renderer;

/// Font family change waiting for its font to finish loading
struct PendingFont {
    family: String,
    /// Objects selected when the change was requested
    targets: Vec<ObjectId>,
    load: BoxFuture<'static, bool>,
}

/// The eframe host around the editor core.
///
/// Only the `EditorConfig` is persisted between runs; the design itself is
/// the embedding page's concern.
pub struct CottonBroApp {
    editor: Editor,
    renderer: Renderer,
    input: InputHandler,
    file_handler: FileHandler,
    pending_font: Option<PendingFont>,
    /// Last exported design document, shown until dismissed
    export_text: Option<String>,
    status: Option<String>,
}

impl CottonBroApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> EditorResult<Self> {
        let config: EditorConfig = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_config(config)
    }

    pub fn with_config(config: EditorConfig) -> EditorResult<Self> {
        Ok(Self {
            editor: Editor::new(config)?,
            renderer: Renderer::new(),
            input: InputHandler::new(),
            file_handler: FileHandler::new(),
            pending_font: None,
            export_text: None,
            status: None,
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Editor, &mut Renderer, &mut InputHandler) {
        (&mut self.editor, &mut self.renderer, &mut self.input)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn export_text(&self) -> Option<&str> {
        self.export_text.as_deref()
    }

    pub fn close_export(&mut self) {
        self.export_text = None;
    }

    /// Export the design and keep the JSON for display
    pub fn export_design(&mut self) {
        match self.editor.export_json() {
            Ok(json) => {
                log::info!("Exported design ({} bytes)", json.len());
                self.export_text = Some(json);
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.set_status(format!("Export failed: {e}"));
            }
        }
    }

    /// Start loading a font; the family is applied once the load settles
    pub fn request_font_family(&mut self, family: &str) {
        if self.editor.fonts().is_loaded(family) {
            self.editor.apply_font_family(family);
            return;
        }
        self.pending_font = Some(PendingFont {
            family: family.to_owned(),
            targets: self.editor.selected_ids(),
            load: self.editor.fonts().load(family).boxed(),
        });
    }

    pub fn pending_font(&self) -> Option<&str> {
        self.pending_font.as_ref().map(|p| p.family.as_str())
    }

    fn poll_pending_font(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.pending_font.as_mut() else {
            return;
        };
        let mut task_cx = TaskContext::from_waker(futures::task::noop_waker_ref());
        match pending.load.poll_unpin(&mut task_cx) {
            Poll::Ready(loaded) => {
                if !loaded {
                    self.status = Some(format!("Font '{}' could not be loaded", pending.family));
                }
                if let Some(PendingFont { family, targets, .. }) = self.pending_font.take() {
                    self.editor.apply_font_family_to(&targets, &family);
                }
            }
            Poll::Pending => ctx.request_repaint(),
        }
    }

    fn upload_dropped_files(&mut self, ctx: &egui::Context) {
        self.file_handler.preview_files_being_dropped(ctx);
        if !self.file_handler.check_for_dropped_files(ctx) {
            return;
        }
        for file in self.file_handler.take_dropped_images() {
            if let Err(e) = self.editor.upload_image(&file.bytes) {
                self.status = Some(format!("Could not upload {}: {e}", file.name));
            }
        }
    }
}

impl eframe::App for CottonBroApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self.editor.config());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_pending_font(ctx);
        self.upload_dropped_files(ctx);

        panels::tools_panel(self, ctx);
        panels::layers_panel(self, ctx);
        panels::properties_panel(self, ctx);
        panels::central_panel(self, ctx);

        if let Some(json) = self.export_text.clone() {
            let mut open = true;
            egui::Window::new("Design export")
                .open(&mut open)
                .default_size([420.0, 360.0])
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.add(egui::TextEdit::multiline(&mut json.as_str()).code_editor());
                    });
                    if ui.button("Copy").clicked() {
                        ctx.copy_text(json.clone());
                    }
                });
            if !open {
                self.close_export();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_font_family_applies_after_load() {
        let mut app = CottonBroApp::with_config(EditorConfig::default()).unwrap();
        app.editor_mut().add_text(pos2(250.0, 250.0));
        app.request_font_family("Lobster");
        assert_eq!(app.pending_font(), Some("Lobster"));

        let ctx = egui::Context::default();
        app.poll_pending_font(&ctx);
        assert!(app.pending_font().is_none());
        assert_eq!(app.editor().current_style().font_family.as_deref(), Some("Lobster"));
    }

    #[test]
    fn test_font_family_goes_to_text_selected_at_request() {
        let mut app = CottonBroApp::with_config(EditorConfig::default()).unwrap();
        let requested = app.editor_mut().add_text(pos2(150.0, 150.0));
        let later = app.editor_mut().add_text(pos2(350.0, 350.0));
        app.editor_mut().select([requested]);
        app.request_font_family("Lobster");

        app.editor_mut().select([later]);
        app.poll_pending_font(&egui::Context::default());
        assert!(app.pending_font().is_none());

        let family = |id| app.editor().scene().get(id).unwrap().as_text().unwrap().font_family.clone();
        assert_eq!(family(requested), "Lobster");
        assert_eq!(family(later), "Ubuntu");
        assert_eq!(app.editor().selected_ids(), vec![later]);
    }

    #[test]
    fn test_export_keeps_document() {
        let mut app = CottonBroApp::with_config(EditorConfig::default()).unwrap();
        app.export_design();
        assert!(app.export_text().is_some_and(|json| json.contains("\"artboard\"")));
        app.close_export();
        assert!(app.export_text().is_none());
    }
}
