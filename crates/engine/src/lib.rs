pub mod format;
pub mod recipients;
pub mod tasks;
