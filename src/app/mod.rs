//! Main application modules.
//!
//! URL input handling, progress logging, Ctrl-C handling and statistics
//! printing used by the binary.

pub mod logging;
pub mod shutdown;
pub mod statistics;
pub mod url;

// Re-export public API
pub use logging::log_batch_progress;
pub use shutdown::stop_on_ctrl_c;
pub use statistics::{print_error_statistics, print_summary};
pub use url::{parse_url_list, read_url_list, validate_and_normalize_url};
