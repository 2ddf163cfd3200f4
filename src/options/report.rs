//! Diagnostic report of explicitly set options.

use std::fmt::{Display, Write as _};

use crate::options::descriptor::OptionDescriptor;
use crate::options::registry::Registry;
use crate::state::JobOptions;

const RULE: &str = "-------------------- --------------------";

/// Lazy iterator over `(name, value)` for every explicitly set option,
/// in registry order. Cloning restarts from the clone point.
#[derive(Clone)]
pub struct SetOptions<'a, I> {
    descriptors: I,
    opts: &'a JobOptions,
}

impl<'a, I> Iterator for SetOptions<'a, I>
where
    I: Iterator<Item = &'a OptionDescriptor>,
{
    type Item = (&'static str, String);

    fn next(&mut self) -> Option<Self::Item> {
        let opts = self.opts;
        self.descriptors
            .by_ref()
            .find(|d| d.is_set())
            .map(|d| (d.display_name(), d.get(opts)))
    }
}

/// Report the options set in `opts`.
pub fn report<'a>(
    registry: &'a Registry,
    opts: &'a JobOptions,
) -> SetOptions<'a, impl Iterator<Item = &'a OptionDescriptor> + Clone> {
    SetOptions { descriptors: registry.iter(), opts }
}

/// Format report entries as the "defined options" block.
pub fn render<I, N, V>(entries: I) -> String
where
    I: IntoIterator<Item = (N, V)>,
    N: Display,
    V: Display,
{
    let mut out = String::new();
    let _ = writeln!(out, "defined options");
    let _ = writeln!(out, "{}", RULE);
    for (name, value) in entries {
        let _ = writeln!(out, "{:<20}: {}", name.to_string(), value);
    }
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "end of defined options");
    out
}
