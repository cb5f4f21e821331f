//! Per-image annotation files.
//!
//! `photo.jpg` keeps its boxes in `photo.jpg.txt`, one box per line in
//! creation order:
//! ```text
//! <left_x> <top_y> <right_x> <bottom_y>
//! ```

use crate::bbox::BoundingBox;
use crate::error::{AnnotatorError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const SIDECAR_SUFFIX: &str = ".txt";

pub fn sidecar_path(image_path: &Path) -> PathBuf {
    let mut name = image_path.as_os_str().to_owned();
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// Reads every box recorded for `image_path`.
///
/// A missing sidecar means no boxes. Any line that is not exactly four
/// integers fails the whole load.
pub fn load_boxes(image_path: &Path) -> Result<Vec<BoundingBox>> {
    let path = sidecar_path(image_path);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(&path).map_err(|e| AnnotatorError::io(&path, e))?;
    data.lines()
        .enumerate()
        .map(|(i, line)| {
            line.parse::<BoundingBox>().map_err(|_| AnnotatorError::Parse {
                path: path.clone(),
                line: i + 1,
                content: line.to_string(),
            })
        })
        .collect()
}

/// Overwrites the sidecar with `boxes`. An empty list writes nothing, so
/// no file is ever created for an image without boxes.
pub fn save_boxes(image_path: &Path, boxes: &[BoundingBox]) -> Result<()> {
    if boxes.is_empty() {
        return Ok(());
    }
    let path = sidecar_path(image_path);
    let mut data = String::new();
    for b in boxes {
        data.push_str(&b.to_string());
        data.push('\n');
    }
    fs::write(&path, data).map_err(|e| AnnotatorError::io(&path, e))
}

/// Rewrites the sidecar without its last line. Other lines are kept
/// byte-for-byte. The file stays in place even when it ends up empty.
pub fn drop_last_line(image_path: &Path) -> Result<()> {
    let path = sidecar_path(image_path);
    let data = match fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AnnotatorError::MissingSidecar(path));
        }
        Err(e) => return Err(AnnotatorError::io(&path, e)),
    };
    let mut lines: Vec<&str> = data.split_inclusive('\n').collect();
    lines.pop();
    fs::write(&path, lines.concat()).map_err(|e| AnnotatorError::io(&path, e))
}
