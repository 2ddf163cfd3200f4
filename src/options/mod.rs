//! Declarative option registry and the machinery that applies it.
//!
//! Every configurable field is described once by an [`OptionDescriptor`];
//! the flag grammar, environment ingestion, multi-pass reset and the
//! diagnostic report are all driven from the same [`Registry`].

pub(crate) mod builders;
pub mod codes;
pub mod context;
pub mod descriptor;
pub mod dispatch;
pub mod registry;
pub mod report;
pub mod reset;
pub mod table;

pub use context::{is_reachable, select_setter, Context};
pub use descriptor::{
    Behavior, ContextSetters, DescriptorBuilder, DescriptorError, FlagArity, OptCode,
    OptionDescriptor,
};
pub use dispatch::{process, OptionError, Pass, Source};
pub use registry::Registry;
pub use report::{render, report, SetOptions};
pub use reset::reset_all;
