#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod artboard;
pub mod components;
pub mod config;
pub mod editor;
pub mod element;
pub mod eraser;
pub mod error;
pub mod event;
pub mod export;
pub mod file_handler;
pub mod fonts;
pub mod geometry;
pub mod history;
pub mod id_generator;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod scene;
pub mod selection;
pub mod texture_manager;
pub mod tools;
pub mod util;
pub mod viewport;
pub mod widgets;

pub use app::CottonBroApp;
pub use artboard::{Artboard, ClipBoundary};
pub use config::EditorConfig;
pub use editor::{Editor, ImageDecodeService, RasterDecoder};
pub use element::{DesignObject, ObjectKind};
pub use error::{EditorError, EditorResult};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use export::DesignIntent;
pub use fonts::{FontLoader, FontService};
pub use history::{HistoryManager, HistoryState, SceneSnapshot, SnapshotCodec};
pub use id_generator::ObjectId;
pub use input::InputEvent;
pub use renderer::Renderer;
pub use scene::Scene;
pub use tools::ToolMode;
pub use viewport::Viewport;
