//! Collision data model and two-level navigation.
//!
//! The model is an indexed arena: a [`ReviewState`] owns an ordered list of
//! [`Collision`]s, each of which owns its files and its own inner cursor.
//! A file is identified by a [`FileId`], the pair of its collision index and
//! its position inside that collision. Indices never change after
//! construction because no operation adds or removes files.

use std::path::Path;

use thiserror::Error;

use super::check::{CheckRequest, CheckResult};
use crate::parser::CollisionSet;

/// Error type for building a review from a collision set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// No collision with at least one file was found in the report.
    #[error("nothing to review: the report lists no files")]
    NothingToReview,
}

/// Stable identity of a file inside a [`ReviewState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId {
    /// Index of the collision.
    pub collision: usize,
    /// Index of the file inside its collision.
    pub file: usize,
}

impl FileId {
    /// Create a new file identity.
    #[must_use]
    pub fn new(collision: usize, file: usize) -> Self {
        Self { collision, file }
    }
}

/// One candidate file within a collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChoice {
    name: String,
    selected: bool,
    valid: bool,
}

impl FileChoice {
    /// Create a choice that is kept and presumed to exist.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected: true,
            valid: true,
        }
    }

    /// The filename as it appeared in the report.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The filename as a path.
    #[must_use]
    pub fn path(&self) -> &Path {
        Path::new(&self.name)
    }

    /// Whether the file will be kept (`true`) or deleted (`false`).
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether the file existed the last time it was checked.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    fn toggle(&mut self) {
        self.selected = !self.selected;
    }
}

/// A group of files sharing one reported hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    hash: String,
    files: Vec<FileChoice>,
    cursor: usize,
}

impl Collision {
    /// Create a collision. Returns `None` when `files` is empty.
    #[must_use]
    pub fn new(hash: impl Into<String>, files: Vec<FileChoice>) -> Option<Self> {
        if files.is_empty() {
            return None;
        }
        Some(Self {
            hash: hash.into(),
            files,
            cursor: 0,
        })
    }

    /// The reported hash.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// All files in report order.
    #[must_use]
    pub fn files(&self) -> &[FileChoice] {
        &self.files
    }

    /// Index of the highlighted file.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The highlighted file.
    #[must_use]
    pub fn current_file(&self) -> &FileChoice {
        &self.files[self.cursor]
    }

    /// Number of files marked for deletion.
    #[must_use]
    pub fn deselected_count(&self) -> usize {
        self.files.iter().filter(|f| !f.selected).count()
    }

    fn next_file(&mut self) {
        self.cursor = (self.cursor + 1) % self.files.len();
    }

    fn prev_file(&mut self) {
        self.cursor = self
            .cursor
            .checked_sub(1)
            .unwrap_or(self.files.len() - 1);
    }
}

/// Live working copy of a review session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewState {
    collisions: Vec<Collision>,
    cursor: usize,
    confirmed: bool,
    errors: Vec<String>,
}

impl ReviewState {
    /// Build the review model from a parsed collision set.
    ///
    /// Records without any filename are skipped so every collision has at
    /// least one file.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::NothingToReview`] if no collision remains.
    pub fn from_collision_set(set: &CollisionSet) -> Result<Self, ReviewError> {
        let collisions: Vec<Collision> = set
            .iter()
            .filter_map(|(hash, names)| {
                let files = names.iter().map(FileChoice::new).collect();
                let collision = Collision::new(hash, files);
                if collision.is_none() {
                    log::warn!("Skipping hash {} with no files", hash);
                }
                collision
            })
            .collect();

        Self::new(collisions)
    }

    /// Build the review model from already constructed collisions.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::NothingToReview`] if `collisions` is empty.
    pub fn new(collisions: Vec<Collision>) -> Result<Self, ReviewError> {
        if collisions.is_empty() {
            return Err(ReviewError::NothingToReview);
        }

        log::debug!("Review state holds {} collision(s)", collisions.len());
        Ok(Self {
            collisions,
            cursor: 0,
            confirmed: false,
            errors: Vec::new(),
        })
    }

    // ==================== Accessors ====================

    /// All collisions in report order.
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Number of collisions.
    #[must_use]
    pub fn collision_count(&self) -> usize {
        self.collisions.len()
    }

    /// Index of the currently viewed collision.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The currently viewed collision.
    #[must_use]
    pub fn current_collision(&self) -> &Collision {
        &self.collisions[self.cursor]
    }

    /// The highlighted file of the currently viewed collision.
    #[must_use]
    pub fn current_file(&self) -> &FileChoice {
        self.current_collision().current_file()
    }

    /// Look up a file by identity.
    #[must_use]
    pub fn file(&self, id: FileId) -> Option<&FileChoice> {
        self.collisions
            .get(id.collision)
            .and_then(|c| c.files.get(id.file))
    }

    /// Whether the user confirmed their choices.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Transient error messages, oldest first, without repeats.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Total number of files marked for deletion.
    #[must_use]
    pub fn deselected_count(&self) -> usize {
        self.collisions.iter().map(Collision::deselected_count).sum()
    }

    /// Total number of files across all collisions.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.collisions.iter().map(|c| c.files.len()).sum()
    }

    // ==================== Navigation ====================

    /// Move to the next collision, wrapping around.
    pub fn next_collision(&mut self) {
        self.cursor = (self.cursor + 1) % self.collisions.len();
        log::trace!("Navigate next collision: cursor = {}", self.cursor);
    }

    /// Move to the previous collision, wrapping around.
    pub fn prev_collision(&mut self) {
        self.cursor = self
            .cursor
            .checked_sub(1)
            .unwrap_or(self.collisions.len() - 1);
        log::trace!("Navigate previous collision: cursor = {}", self.cursor);
    }

    /// Highlight the next file of the current collision, wrapping around.
    pub fn next_file(&mut self) {
        self.collisions[self.cursor].next_file();
    }

    /// Highlight the previous file of the current collision, wrapping around.
    pub fn prev_file(&mut self) {
        self.collisions[self.cursor].prev_file();
    }

    // ==================== Selection ====================

    /// Flip keep/delete on the highlighted file.
    pub fn toggle_current_file(&mut self) {
        let collision = &mut self.collisions[self.cursor];
        let cursor = collision.cursor;
        let file = &mut collision.files[cursor];
        file.toggle();
        log::debug!(
            "{} {}",
            if file.selected { "Keep" } else { "Delete" },
            file.name
        );
    }

    /// Keep the highlighted file and mark every other file of the current
    /// collision for deletion.
    pub fn keep_only_current_file(&mut self) {
        let collision = &mut self.collisions[self.cursor];
        let cursor = collision.cursor;
        for (i, file) in collision.files.iter_mut().enumerate() {
            file.selected = i == cursor;
        }
        log::debug!(
            "Keep only {} in {}",
            collision.files[cursor].name,
            collision.hash
        );
    }

    /// Record that the user confirmed their choices.
    pub(crate) fn confirm(&mut self) {
        self.confirmed = true;
    }

    // ==================== Existence checks ====================

    /// Build a check covering every file of the current collision.
    #[must_use]
    pub fn check_current_collision(&self) -> CheckRequest {
        let targets = self.collisions[self.cursor]
            .files
            .iter()
            .enumerate()
            .map(|(i, f)| (FileId::new(self.cursor, i), f.path().to_path_buf()))
            .collect();
        CheckRequest::new(targets)
    }

    /// Apply the outcome of an existence check.
    ///
    /// Only the files named in the result are touched, whichever collision is
    /// currently viewed.
    pub fn apply_check(&mut self, result: &CheckResult) {
        for &id in result.existing() {
            self.set_valid(id, true);
        }
        for &id in result.missing() {
            self.set_valid(id, false);
        }
        if let Some(message) = result.error() {
            self.push_error(message);
        }
    }

    fn set_valid(&mut self, id: FileId, valid: bool) {
        match self
            .collisions
            .get_mut(id.collision)
            .and_then(|c| c.files.get_mut(id.file))
        {
            Some(file) => file.valid = valid,
            None => log::warn!("Check result for unknown file {:?}", id),
        }
    }

    /// Record a transient error message unless the same text is already
    /// recorded.
    pub fn push_error(&mut self, message: &str) {
        if self.errors.iter().any(|m| m == message) {
            return;
        }
        self.errors.push(message.to_string());
    }
}
