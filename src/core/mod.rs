//! Core module - session state and configuration

pub mod config;
pub mod entry;
pub mod hub;
pub mod notice;
pub mod registry;

pub use config::Config;
pub use entry::{EntryId, IdParseError, SchemaEntry};
pub use hub::{Hub, RenderView};
pub use notice::{Notice, NoticeLevel};
pub use registry::Registry;
