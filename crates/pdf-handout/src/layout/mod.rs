//! Layout calculation modules for handouts
//!
//! This module handles all the geometric calculations for a handout sheet:
//! - Grid layout (sheet size, grid shape, slot rectangles)
//! - Notes area (ruled note-taking band inside a slot)
//! - Content placement (content box, page fitting, coordinate origins)
//! - Layout plan assembly in mm, pt and px

mod grid;
mod notes;
mod placement;
mod plan;
mod types;

pub use grid::*;
pub use notes::*;
pub use placement::*;
pub use plan::*;
pub use types::*;
