//! Host adapters shipped with the core crate

pub mod memory;

pub use memory::{ListenerTarget, MemoryHost, PageId};
