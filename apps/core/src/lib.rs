#[cfg(test)]
extern crate self as palette_core;

pub mod config;
pub mod contract;
pub mod dispatch;
pub mod error;
pub mod loader;
pub mod logging;
pub mod matched;
pub mod matcher;
pub mod model;
pub mod options;
pub mod palette;
pub mod ranking;
pub mod registry;
pub mod runtime;
pub mod sort;
pub mod transport;

pub use dispatch::{DispatchTable, DispatchTarget};
pub use error::EngineError;
pub use loader::{CommandSource, LoadError, LoadStatus};
pub use model::{Callback, Command, CommandPatch, CommandSet};
pub use options::{OptionKey, Options, OptionsPatch, SortStrategy};
pub use palette::{CommandPalette, SharedPalette};
