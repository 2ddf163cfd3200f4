//! Front-end driver shared by the allocation, batch and step programs.

mod exports;
mod plugin;
mod resolver;
mod verify;

pub use exports::{for_options, ExportSet};
pub use plugin::{PluginOptions, SecondaryTable};
pub use resolver::{Component, Resolution, ResolveError, Resolver};
pub use verify::{verify, VerifyError};
