//! Output formats for page summaries and recovered recordings.

mod csv;
mod json;
mod summary;

pub use self::csv::{write_beats_csv, write_samples_csv};
pub use json::{to_json, JsonFormat};
pub use summary::PageSummary;
