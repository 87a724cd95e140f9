//! # CLI UI Module
//!
//! Consistent styling and formatting for docsmith CLI output.
//!
//! Output respects `NO_COLOR`, and every listing command has a `--json` form
//! for scripting.
//!
//! ## Module Structure
//!
//! - `color`: Color mode detection and terminal capability checks
//! - `style`: Message types, prefixes, and styling functions
//! - `format`: Utility formatters (bytes, time, truncation)
//! - `table`: Table rendering with comfy-table
//! - `progress`: Spinners and progress bars for long operations

pub mod color;
pub mod format;
pub mod progress;
pub mod style;
pub mod table;

pub use color::ColorMode;
pub use progress::{Progress, ProgressMode};
pub use style::{MessageType, Style};
