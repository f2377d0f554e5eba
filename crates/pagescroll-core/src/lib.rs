pub mod config;
pub mod error;
pub mod host;
pub mod scroll;

pub use config::{AppConfig, EasingKind, IndexRecognition, PagingThreshold, ScrollOptions};
pub use error::{Error, Result};
pub use host::MemoryHost;
pub use scroll::{ScrollEngine, ScrollEvent};
