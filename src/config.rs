//! Built-in settings and the little state remembered between runs.

use crate::session::Shortcut;
use eframe::egui;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const APP_TITLE: &str = "Easy Bounding Boxes";

#[derive(Clone, Debug)]
pub struct KeyBindings {
    pub previous_image: egui::Key,
    pub next_image: egui::Key,
    pub delete_last_box: egui::Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            previous_image: egui::Key::A,
            next_image: egui::Key::D,
            delete_last_box: egui::Key::Backspace,
        }
    }
}

impl KeyBindings {
    pub fn pressed(&self, input: &egui::InputState) -> Vec<Shortcut> {
        [
            (self.previous_image, Shortcut::PreviousImage),
            (self.next_image, Shortcut::NextImage),
            (self.delete_last_box, Shortcut::DeleteLastBox),
        ]
        .into_iter()
        .filter(|(key, _)| input.key_pressed(*key))
        .map(|(_, shortcut)| shortcut)
        .collect()
    }
}

#[derive(Clone, Debug)]
pub struct AnnotatorConfig {
    pub title: String,
    pub window_size: [f32; 2],
    pub outline: egui::Color32,
    pub outline_width: f32,
    pub keys: KeyBindings,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            title: APP_TITLE.to_string(),
            window_size: [1000.0, 800.0],
            outline: egui::Color32::RED,
            outline_width: 1.0,
            keys: KeyBindings::default(),
        }
    }
}

/// Survives restarts through eframe's app storage. Only seeds the
/// directory picker; nothing is loaded automatically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedState {
    pub last_directory: Option<PathBuf>,
}

impl RememberedState {
    pub const STORAGE_KEY: &'static str = "easy_bbox_state";

    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        let Some(raw) = storage.and_then(|s| s.get_string(Self::STORAGE_KEY)) else {
            return Self::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring unreadable saved state: {e}");
            Self::default()
        })
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        match serde_json::to_string(self) {
            Ok(raw) => storage.set_string(Self::STORAGE_KEY, raw),
            Err(e) => warn!("Could not save state: {e}"),
        }
    }
}
