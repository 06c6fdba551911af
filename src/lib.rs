//! # Retouch
//!
//! A batch photo editor for the command line. Point it at one image or a whole
//! directory tree, describe the edits with flags, and get the results written
//! out in the format you asked for. An interactive shell covers the cases
//! where you want to experiment with undo/redo before committing.
//!
//! # Architecture: One Catalog, Three Front Ends
//!
//! Every edit is a [`command::Command`]: a named, fully parameterized,
//! side-effect-free transform of one image. Three front ends build commands
//! and hand them to the same machinery:
//!
//! ```text
//! 1. Single     --input photo.jpg --resize 800 600 --output out.jpg
//! 2. Batch      --batch --input photos/ --output edited/   (same flags)
//! 3. Shell      --interactive                              (line commands)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **One validation path**: flags are checked completely before any image
//!   is opened, so a typo never leaves a directory half-processed.
//! - **One semantics**: `resize 800 600` in the shell and `--resize 800 600`
//!   on the command line are the same [`command::Command`] value.
//! - **Testability**: commands are pure functions of pixels, so the whole
//!   catalog is unit-testable on synthetic images without touching disk.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`command`] | The command catalog: every edit as a value, plus the shell-line parsers |
//! | [`pipeline`] | Flag surface, up-front validation, and ordered execution with per-step reports |
//! | [`history`] | Undo/redo stacks of whole-image snapshots |
//! | [`session`] | Current image + source path + history, driven by the shell |
//! | [`shell`] | The interactive line-based editing loop |
//! | [`batch`] | Directory traversal, per-file isolation, text and JSON run logs |
//! | [`imaging`] | Pixel operations: codec, geometry, adjustments, filters, compositing |
//! | [`output`] | CLI output formatting — step reports, batch summaries, histograms |
//!
//! # Design Decisions
//!
//! ## Snapshots Over Command Replay
//!
//! Undo history stores full image clones, not command descriptors. Replaying
//! would require every command to be invertible (crop and grayscale are not)
//! or a re-run from the original through the whole edit list. Snapshots make
//! undo O(1) and unconditionally correct at the cost of memory, which is the
//! right trade for interactive editing of single photos.
//!
//! ## Fixed Application Order
//!
//! Combined flags always apply in catalog order (resize first, text last),
//! never flag order. Batch runs stay reproducible regardless of how the
//! command line was typed, and geometric ops run before per-pixel ones so the
//! expensive filters work on the smallest image.
//!
//! ## Missing Assets Skip, Corrupt Inputs Fail
//!
//! A watermark file that does not exist skips that one step and reports it;
//! the edit run continues. A source image that cannot be decoded fails that
//! file. In batch mode the failure is logged and the run moves on, so one bad
//! frame in a directory of thousands costs one log line, not the whole night.

pub mod batch;
pub mod command;
pub mod history;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod session;
pub mod shell;
