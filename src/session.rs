//! The annotator session: one directory, one current image and its boxes.
//!
//! The session knows nothing about the GUI toolkit. The front end turns
//! clicks and key presses into [`InputEvent`]s and feeds them to
//! [`Session::handle`], then redraws from [`Session::boxes`] and
//! [`Session::in_progress`]. Every mutation is written to the sidecar file
//! before the handler returns, so memory and disk agree between events.

use crate::bbox::{BoundingBox, CanvasPoint};
use crate::error::{AnnotatorError, Result};
use crate::sidecar;
use crate::workspace::{self, Direction};
use image::{ImageReader, RgbaImage};
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    PreviousImage,
    NextImage,
    DeleteLastBox,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// `None` when the picker was cancelled
    DirectoryPicked(Option<PathBuf>),
    Press(CanvasPoint),
    Drag(CanvasPoint),
    Release(CanvasPoint),
    Key(Shortcut),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    DirectorySelected,
    ImageLoaded,
    BoxInProgress,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    NoDirectory,
    Selected(PathBuf),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::NoDirectory => f.write_str("No directory selected"),
            Status::Selected(dir) => write!(f, "Selected Directory: {}", dir.display()),
        }
    }
}

pub struct LoadedImage {
    path: PathBuf,
    pixels: RgbaImage,
    revision: u64,
}

impl LoadedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Bumped on every load, including reloads of the same path, so the
    /// front end knows when to re-upload its texture.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedImage")
            .field("path", &self.path)
            .field("size", &(self.width(), self.height()))
            .field("revision", &self.revision)
            .finish()
    }
}

#[derive(Debug)]
pub struct Session {
    status: Status,
    directory: Option<PathBuf>,
    current: Option<LoadedImage>,
    boxes: Vec<BoundingBox>,
    in_progress: Option<BoundingBox>,
    loads: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            status: Status::NoDirectory,
            directory: None,
            current: None,
            boxes: Vec::new(),
            in_progress: None,
            loads: 0,
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn current_image(&self) -> Option<&LoadedImage> {
        self.current.as_ref()
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn in_progress(&self) -> Option<BoundingBox> {
        self.in_progress
    }

    /// Derived from what is loaded, not from the status label: a cancelled
    /// pick shows "No directory selected" but keeps the previous directory
    /// and image.
    pub fn state(&self) -> SessionState {
        match (&self.directory, &self.current, &self.in_progress) {
            (_, Some(_), Some(_)) => SessionState::BoxInProgress,
            (_, Some(_), None) => SessionState::ImageLoaded,
            (Some(_), None, _) => SessionState::DirectorySelected,
            (None, None, _) => SessionState::Idle,
        }
    }

    pub fn handle(&mut self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::DirectoryPicked(dir) => self.select_directory(dir),
            InputEvent::Press(p) => {
                self.start_box(p);
                Ok(())
            }
            InputEvent::Drag(p) => {
                self.drag_box(p);
                Ok(())
            }
            InputEvent::Release(p) => self.end_box(p),
            InputEvent::Key(Shortcut::PreviousImage) => self.previous_image(),
            InputEvent::Key(Shortcut::NextImage) => self.next_image(),
            InputEvent::Key(Shortcut::DeleteLastBox) => self.delete_last_box(),
        }
    }

    /// Records the picked directory and loads its first `.jpg`.
    ///
    /// A cancelled pick only resets the status label. A directory without a
    /// `.jpg` leaves the current image, if any, untouched.
    pub fn select_directory(&mut self, dir: Option<PathBuf>) -> Result<()> {
        let Some(dir) = dir else {
            info!("Directory selection cancelled");
            self.status = Status::NoDirectory;
            return Ok(());
        };
        info!("Selected directory {}", dir.display());
        self.status = Status::Selected(dir.clone());
        self.directory = Some(dir.clone());

        let entries = workspace::list_entries(&dir)?;
        match workspace::first_initial_image(&entries) {
            Some(name) => self.load_image(&dir.join(name)),
            None => {
                info!("No {} image in {}", workspace::INITIAL_SUFFIX, dir.display());
                Ok(())
            }
        }
    }

    /// Makes `path` the current image and rebuilds the box list from its
    /// sidecar. Reloading the same path re-reads both from disk.
    pub fn load_image(&mut self, path: &Path) -> Result<()> {
        let pixels = decode(path)?;
        let boxes = sidecar::load_boxes(path)?;
        info!(
            "Loaded {} ({}x{}) with {} boxes",
            path.display(),
            pixels.width(),
            pixels.height(),
            boxes.len()
        );

        self.loads += 1;
        self.current = Some(LoadedImage {
            path: path.to_path_buf(),
            pixels,
            revision: self.loads,
        });
        self.boxes = boxes;
        self.in_progress = None;
        Ok(())
    }

    /// Starts a new box at `p`, replacing any box already in progress.
    pub fn start_box(&mut self, p: CanvasPoint) {
        if self.current.is_none() {
            debug!("Press at {p:?} ignored: no image loaded");
            return;
        }
        self.in_progress = Some(BoundingBox::from_corners(p, p));
    }

    pub fn drag_box(&mut self, p: CanvasPoint) {
        match self.in_progress.as_mut() {
            Some(b) => {
                b.right_x = p.x;
                b.bottom_y = p.y;
            }
            None => debug!("Drag to {p:?} ignored: no box in progress"),
        }
    }

    /// Commits the box in progress with `p` as its second corner and
    /// rewrites the whole sidecar.
    pub fn end_box(&mut self, p: CanvasPoint) -> Result<()> {
        let Some(started) = self.in_progress.take() else {
            debug!("Release at {p:?} ignored: no box in progress");
            return Ok(());
        };
        let Some(image) = self.current.as_ref() else {
            return Ok(());
        };
        let b = BoundingBox::from_corners(started.start(), p);
        self.boxes.push(b);
        sidecar::save_boxes(&image.path, &self.boxes)?;
        info!("Added box {b} to {} ({} total)", image.path.display(), self.boxes.len());
        Ok(())
    }

    /// Removes the newest box from memory and from the sidecar file.
    pub fn delete_last_box(&mut self) -> Result<()> {
        if self.boxes.is_empty() {
            return Ok(());
        }
        let Some(image) = self.current.as_ref() else {
            return Ok(());
        };
        sidecar::drop_last_line(&image.path)?;
        if let Some(b) = self.boxes.pop() {
            info!("Deleted box {b} from {} ({} left)", image.path.display(), self.boxes.len());
        }
        Ok(())
    }

    pub fn next_image(&mut self) -> Result<()> {
        self.step(Direction::Next)
    }

    pub fn previous_image(&mut self) -> Result<()> {
        self.step(Direction::Previous)
    }

    fn step(&mut self, direction: Direction) -> Result<()> {
        let Some(image) = self.current.as_ref() else {
            return Ok(());
        };
        let path = image.path.clone();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AnnotatorError::CurrentImageMissing(path.clone()))?;

        let entries = workspace::list_entries(&dir)?;
        let target = workspace::neighbor(&entries, name, direction)
            .map_err(|_| AnnotatorError::CurrentImageMissing(path.clone()))?;
        match target {
            Some(next) => self.load_image(&dir.join(next)),
            None => {
                debug!("No {direction:?} image after {}", path.display());
                Ok(())
            }
        }
    }
}

fn decode(path: &Path) -> Result<RgbaImage> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| AnnotatorError::io(path, e))?;
    let img = reader.decode().map_err(|source| AnnotatorError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}
