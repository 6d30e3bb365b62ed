//! CLI command implementations

pub mod clear;
pub mod download;
pub mod path;
pub mod status;

pub use clear::ClearCommand;
pub use download::DownloadCommand;
pub use path::PathCommand;
pub use status::StatusCommand;
