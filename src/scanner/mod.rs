pub mod data_scanner;
pub mod file_filter;

pub use data_scanner::{DataFile, DataScanner, ScanStatistics};
pub use file_filter::FileFilter;
