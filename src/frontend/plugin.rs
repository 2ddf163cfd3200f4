//! Secondary option tables registered at runtime.

use std::collections::BTreeMap;

use crate::args::FlagDef;
use crate::options::{codes, FlagArity, OptCode, OptionError};

/// A table consulted for codes the main registry does not know.
pub trait SecondaryTable {
    /// Flags to add to the grammar.
    fn flags(&self) -> Vec<FlagDef>;

    /// Handle `code`. `Ok(false)` means the code is not ours.
    fn process(&mut self, code: OptCode, value: Option<&str>) -> Result<bool, OptionError>;
}

#[derive(Debug, Clone)]
struct PluginOption {
    name: String,
    arity: FlagArity,
    code: OptCode,
}

/// Plugin-provided options, stored as raw strings for the plugin to read.
#[derive(Debug, Clone, Default)]
pub struct PluginOptions {
    specs: Vec<PluginOption>,
    values: BTreeMap<String, Option<String>>,
}

impl PluginOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `--name` and return the code assigned to it.
    pub fn register(&mut self, name: impl Into<String>, arity: FlagArity) -> OptCode {
        let index = u32::try_from(self.specs.len()).unwrap_or(u32::MAX);
        let code = OptCode(codes::SECONDARY_BASE.0.saturating_add(index));
        self.specs.push(PluginOption { name: name.into(), arity, code });
        code
    }

    /// Values seen so far, by option name. `None` marks a flag given
    /// without a value.
    pub fn values(&self) -> &BTreeMap<String, Option<String>> {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.values.get(name).map(Option::as_deref)
    }
}

impl SecondaryTable for PluginOptions {
    fn flags(&self) -> Vec<FlagDef> {
        self.specs
            .iter()
            .map(|spec| FlagDef::option(spec.name.clone(), None, spec.arity, spec.code))
            .collect()
    }

    fn process(&mut self, code: OptCode, value: Option<&str>) -> Result<bool, OptionError> {
        let Some(spec) = self.specs.iter().find(|s| s.code == code) else {
            return Ok(false);
        };
        if spec.arity == FlagArity::RequiresValue && value.is_none() {
            return Err(OptionError::InvalidValue {
                option: spec.name.clone(),
                message: format!("option '--{}' requires an argument", spec.name),
            });
        }
        tracing::debug!(option = %spec.name, value, "plugin option set");
        self.values.insert(spec.name.clone(), value.map(str::to_string));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_start_at_secondary_base() {
        let mut table = PluginOptions::new();
        let first = table.register("tmpfs", FlagArity::RequiresValue);
        let second = table.register("x11", FlagArity::OptionalValue);
        assert_eq!(first, codes::SECONDARY_BASE);
        assert_eq!(second.0, codes::SECONDARY_BASE.0 + 1);
        assert_eq!(table.flags().len(), 2);
    }

    #[test]
    fn foreign_codes_are_declined() {
        let mut table = PluginOptions::new();
        table.register("tmpfs", FlagArity::RequiresValue);
        assert_eq!(table.process(codes::PARTITION, Some("x")), Ok(false));
        assert!(table.values().is_empty());
    }

    #[test]
    fn values_are_recorded() {
        let mut table = PluginOptions::new();
        let code = table.register("x11", FlagArity::OptionalValue);
        assert_eq!(table.process(code, None), Ok(true));
        assert_eq!(table.get("x11"), Some(None));
        assert_eq!(table.get("tmpfs"), None);
    }
}
