//! Option resolution for job allocation, batch submission and step launch.
//!
//! A single declarative [`options::Registry`] drives the command-line
//! grammar, environment ingestion, per-component resets and the
//! diagnostic report; [`frontend::Resolver`] runs them in order.

pub mod args;
pub mod codec;
pub mod config;
pub mod env;
pub mod frontend;
pub mod logging;
pub mod options;
pub mod state;
