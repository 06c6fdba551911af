//! An editing session: the current image, where it came from, and its
//! undo/redo history.
//!
//! The session is an explicit value handed to whoever needs it; there is no
//! global editor state. The interactive shell drives one session for its
//! whole lifetime.

use crate::command::{Command, CommandError};
use crate::history::History;
use crate::imaging::{self, Histogram, ImagingError, OutputFormat, adjust};
use crate::pipeline::StepStatus;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no image loaded (use 'open PATH' first)")]
    NoImage,
    #[error("no output path given and no source path to fall back on")]
    NoSavePath,
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Imaging(#[from] ImagingError),
}

#[derive(Debug, Default)]
pub struct Session {
    image: Option<DynamicImage>,
    source: Option<PathBuf>,
    history: History,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Load an image from disk, replacing whatever was being edited.
    /// History from the previous image is dropped.
    pub fn open(&mut self, path: &Path) -> Result<(), SessionError> {
        let img = imaging::load(path)?;
        self.image = Some(img);
        self.source = Some(path.to_path_buf());
        self.history.clear();
        Ok(())
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn current(&self) -> Result<&DynamicImage, SessionError> {
        self.image.as_ref().ok_or(SessionError::NoImage)
    }

    /// Run one command against the current image. The pre-edit snapshot is
    /// recorded only when the command actually applies; a skipped step (a
    /// missing watermark file, say) leaves both image and history untouched.
    pub fn apply(&mut self, command: &Command) -> Result<StepStatus, SessionError> {
        let current = self.image.as_ref().ok_or(SessionError::NoImage)?;
        match command.apply(current) {
            Ok(next) => {
                self.history.record(current);
                self.image = Some(next);
                Ok(StepStatus::Applied)
            }
            Err(err) if err.is_skippable() => Ok(StepStatus::Skipped(err.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    /// Step back one edit. `Ok(false)` means there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, SessionError> {
        let current = self.image.as_mut().ok_or(SessionError::NoImage)?;
        Ok(self.history.undo(current))
    }

    /// Step forward again. `Ok(false)` means there was nothing to redo.
    pub fn redo(&mut self) -> Result<bool, SessionError> {
        let current = self.image.as_mut().ok_or(SessionError::NoImage)?;
        Ok(self.history.redo(current))
    }

    /// Encode the current image. With no explicit path, writes back to the
    /// file the image was opened from.
    pub fn save(
        &self,
        path: Option<&Path>,
        format: Option<OutputFormat>,
    ) -> Result<PathBuf, SessionError> {
        let img = self.current()?;
        let target = match (path, &self.source) {
            (Some(p), _) => p.to_path_buf(),
            (None, Some(src)) => src.clone(),
            (None, None) => return Err(SessionError::NoSavePath),
        };
        let target = imaging::codec::apply_format(&target, format);
        imaging::save(img, &target, format)?;
        Ok(target)
    }

    /// Per-channel histogram of the current image.
    pub fn histogram(&self) -> Result<Histogram, SessionError> {
        Ok(adjust::histogram(self.current()?))
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }
}
