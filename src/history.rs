//! Undo/redo stacks of whole-image snapshots.
//!
//! Snapshots, not command replay: each entry is a full clone of the image as
//! it was before an edit. Memory-hungry but trivially correct, since no
//! command has to be invertible.

use image::DynamicImage;

#[derive(Debug, Default)]
pub struct History {
    undo: Vec<DynamicImage>,
    redo: Vec<DynamicImage>,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// Snapshot the pre-edit image. Any redo branch is abandoned.
    pub fn record(&mut self, current: &DynamicImage) {
        self.undo.push(current.clone());
        self.redo.clear();
    }

    /// Step back one edit, swapping `current` for the previous snapshot.
    /// Returns false when there is nothing to undo (the caller reports this,
    /// it is not an error) and leaves `current` untouched.
    pub fn undo(&mut self, current: &mut DynamicImage) -> bool {
        match self.undo.pop() {
            Some(previous) => {
                self.redo.push(std::mem::replace(current, previous));
                true
            }
            None => false,
        }
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: &mut DynamicImage) -> bool {
        match self.redo.pop() {
            Some(next) => {
                self.undo.push(std::mem::replace(current, next));
                true
            }
            None => false,
        }
    }

    /// Drop both stacks, as when a new image is opened.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}
