//! Option registry: the ordered descriptor table.

use std::collections::HashSet;

use crate::options::context::{is_reachable, Context};
use crate::options::descriptor::{OptCode, OptionDescriptor};
use crate::options::dispatch::OptionError;
use crate::options::table;

/// Every option descriptor, in registry order.
///
/// Order matters twice: the first reachable descriptor wins when codes
/// collide, and reports list options in this order.
#[derive(Debug)]
pub struct Registry {
    descriptors: Vec<OptionDescriptor>,
}

impl Registry {
    /// Build the full option table.
    ///
    /// # Panics
    ///
    /// Panics if a table entry is malformed.
    pub fn build() -> Self {
        let descriptors =
            table::descriptors().unwrap_or_else(|e| panic!("malformed option table: {}", e));
        Self::from_descriptors(descriptors)
    }

    /// Build a registry from an arbitrary descriptor list.
    pub fn from_descriptors(descriptors: Vec<OptionDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDescriptor> + Clone {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&OptionDescriptor> {
        self.descriptors.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut OptionDescriptor> {
        self.descriptors.get_mut(index)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut OptionDescriptor> {
        self.descriptors.iter_mut()
    }

    /// Position of the first descriptor with `code` reachable in `ctx`.
    pub(crate) fn position(&self, code: OptCode, ctx: Context) -> Option<usize> {
        self.descriptors
            .iter()
            .position(|d| d.code() == code && is_reachable(d, ctx))
    }

    /// The descriptor `code` dispatches to in `ctx`.
    ///
    /// Descriptors without a setter for `ctx` are skipped even when the code
    /// matches, so an option unsupported here reads as unknown.
    pub fn lookup_by_code(&self, code: OptCode, ctx: Context) -> Result<&OptionDescriptor, OptionError> {
        self.position(code, ctx)
            .and_then(|i| self.descriptors.get(i))
            .ok_or(OptionError::UnknownOption { code })
    }

    /// Named descriptors usable in `ctx`, each long name listed once.
    pub fn visible(&self, ctx: Context) -> Vec<&OptionDescriptor> {
        let mut seen = HashSet::new();
        self.descriptors
            .iter()
            .filter(|d| is_reachable(d, ctx))
            .filter(|d| d.name().is_some_and(|name| seen.insert(name)))
            .collect()
    }

    /// Whether the first descriptor carrying `code` was last set from the
    /// environment. Context is not considered.
    pub fn set_by_env(&self, code: OptCode) -> bool {
        self.descriptors
            .iter()
            .find(|d| d.code() == code)
            .is_some_and(|d| d.is_set_by_env())
    }

    /// Find a descriptor by its long name or display name.
    pub fn by_name(&self, name: &str) -> Option<&OptionDescriptor> {
        self.descriptors.iter().find(|d| d.display_name() == name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::build()
    }
}
