//! Output collaborators: renamed file names and tabular export.

mod filename;
mod table;

pub use filename::{generate_filename, FilenameOptions};
pub use table::{TableExporter, TableRow, MISSING_VALUE};
