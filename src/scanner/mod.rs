pub mod file_discovery;
pub mod file_filter;

pub use file_discovery::{FileDiscovery, TextFile};
pub use file_filter::FileFilter;
