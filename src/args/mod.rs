//! Command-line handling for the front-ends.
//!
//! ```text
//! Registry → Grammar (per context) → tokenize → split_components → dispatch
//! ```
//!
//! Each stage is a pure function that can be unit-tested independently.

mod classifier;
mod registry;

pub use classifier::{first_action, split_components, tokenize, ArgError, ComponentArgs, Token};
pub use registry::{Action, FlagDef, FlagKind, Grammar};
