//! Archive editing.
//!
//! This module rewrites an existing ZIP archive into a new one by:
//! - Copying members the substitution does not touch
//! - Renaming members whose name contains the search string
//! - Updating members whose content contains the search string
//!
//! # Example
//!
//! ```rust,no_run
//! use std::fs::File;
//! use zipfnr::edit::{ArchiveEditor, Mode, Substitution};
//! use zipfnr::progress::NoProgress;
//! use zipfnr::select::ExtensionFilter;
//!
//! let editor = ArchiveEditor::open(File::open("original.zip")?)?
//!     .with_selector(ExtensionFilter::new(".xml"));
//!
//! let sub = Substitution::new(Mode::Filename, "draft", "final")?;
//! let result = editor.apply(File::create("modified.zip")?, &sub, &mut NoProgress)?;
//!
//! println!("Copied {} members, renamed {}, updated {}",
//!          result.members_copied,
//!          result.members_renamed,
//!          result.members_updated);
//! # Ok::<(), zipfnr::Error>(())
//! ```
//!
//! # Implementation Notes
//!
//! The editor works by:
//! 1. Iterating through the source archive in stored order
//! 2. Asking the [`Substitution`] for an [`Operation`] per selected member
//! 3. Copying compressed data as-is for copies and renames
//! 4. Recompressing only members whose content changed
//!
//! A rename onto a name that is already written stops the pass with
//! [`Error::NameCollision`](crate::Error::NameCollision). To list every
//! collision up front, run [`find_collisions`] on the output of
//! [`ArchiveEditor::plan`].

mod editor;
mod operation;

pub use editor::{ArchiveEditor, EditResult};
pub use operation::{Collision, Mode, Operation, Substitution, find_collisions};
