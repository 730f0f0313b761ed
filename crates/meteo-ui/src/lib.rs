//! Terminal interface for the weather lookup.

pub mod display;
pub mod error_mapping;
pub mod session;
pub mod terminal;

pub use display::{render_report, write_lines, Line, Palette};
pub use error_mapping::IntoAppError;
pub use session::{Session, SessionUpdate};
pub use terminal::{print_once, run, Command};
