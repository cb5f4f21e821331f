//! Directory listing and image discovery.
//!
//! Entries are used in whatever order the filesystem returns them. Two
//! filters exist: picking a directory only auto-loads a `.jpg`, while
//! stepping between images accepts any of [`NAVIGATION_SUFFIXES`].

use crate::error::{AnnotatorError, Result};
use std::fs;
use std::path::Path;

pub const INITIAL_SUFFIX: &str = ".jpg";

pub const NAVIGATION_SUFFIXES: [&str; 6] = [".jpg", ".png", ".jpeg", ".JPG", ".PNG", ".JPEG"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// File names in `dir`, unsorted, not recursive. Names that are not valid
/// UTF-8 are skipped; they can never match an image suffix anyway.
pub fn list_entries(dir: &Path) -> Result<Vec<String>> {
    let read_dir = fs::read_dir(dir).map_err(|e| AnnotatorError::io(dir, e))?;
    let mut names = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| AnnotatorError::io(dir, e))?;
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    Ok(names)
}

pub fn is_initial_image(name: &str) -> bool {
    name.ends_with(INITIAL_SUFFIX)
}

pub fn is_qualifying_image(name: &str) -> bool {
    NAVIGATION_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// First entry ending in exactly `.jpg`.
pub fn first_initial_image(entries: &[String]) -> Option<&str> {
    entries
        .iter()
        .map(String::as_str)
        .find(|name| is_initial_image(name))
}

/// Nearest qualifying entry before or after `current`, without wrapping.
///
/// Returns `Ok(None)` at either end of the listing. `current` must be one of
/// the entries.
pub fn neighbor<'a>(
    entries: &'a [String],
    current: &str,
    direction: Direction,
) -> std::result::Result<Option<&'a str>, NotListed> {
    let index = entries
        .iter()
        .position(|name| name == current)
        .ok_or(NotListed)?;
    let found = match direction {
        Direction::Next => entries[index + 1..]
            .iter()
            .find(|name| is_qualifying_image(name)),
        Direction::Previous => entries[..index]
            .iter()
            .rev()
            .find(|name| is_qualifying_image(name)),
    };
    Ok(found.map(String::as_str))
}

/// The name looked up by [`neighbor`] is absent from the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotListed;
