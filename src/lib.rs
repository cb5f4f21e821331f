//! Draw bounding boxes over a folder of images and keep them in plain-text
//! sidecar files (`photo.jpg` → `photo.jpg.txt`), one box per line.

pub mod app;
pub mod bbox;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod sidecar;
pub mod workspace;

pub use bbox::{BoundingBox, CanvasPoint};
pub use error::{AnnotatorError, Result};
pub use session::{InputEvent, LoadedImage, Session, SessionState, Shortcut, Status};
