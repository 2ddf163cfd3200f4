//! Option descriptors: one record per configurable field.

use std::fmt;

use thiserror::Error;

use crate::codec::ValueError;
use crate::options::context::Context;
use crate::state::JobOptions;

/// Applies a (possibly absent) value to the configuration.
pub type Setter = Box<dyn Fn(&mut JobOptions, Option<&str>) -> Result<(), ValueError>>;
/// Renders the current value for diagnostics.
pub type Getter = Box<dyn Fn(&JobOptions) -> String>;
/// Restores the field to its default.
pub type Resetter = Box<dyn Fn(&mut JobOptions)>;

/// Stable identifier shared by flag parsing and dispatch.
///
/// Printable ASCII codes double as the short flag character; long-only
/// options use codes from [`OptCode::LONG_BASE`] upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptCode(pub u32);

impl OptCode {
    pub const LONG_BASE: u32 = 0x100;

    pub const fn short(c: char) -> Self {
        Self(c as u32)
    }

    pub const fn long(n: u32) -> Self {
        Self(Self::LONG_BASE + n)
    }

    /// The short flag character, if this code has one.
    pub fn as_short(self) -> Option<char> {
        char::from_u32(self.0).filter(|c| c.is_ascii_graphic())
    }
}

impl fmt::Display for OptCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_short() {
            Some(c) => write!(f, "-{}", c),
            None => write!(f, "{:#x}", self.0),
        }
    }
}

/// Whether a flag takes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagArity {
    /// Boolean flag, no value (e.g., --hold, -v).
    NoValue,
    /// Requires exactly one value (e.g., --partition <NAME>).
    RequiresValue,
    /// Optional value, only attached with `=` (e.g., --exclusive[=user]).
    OptionalValue,
}

/// Setters registered for individual contexts.
#[derive(Default)]
pub struct ContextSetters {
    alloc: Option<Setter>,
    batch: Option<Setter>,
    step: Option<Setter>,
}

impl ContextSetters {
    pub fn get(&self, ctx: Context) -> Option<&Setter> {
        match ctx {
            Context::Alloc => self.alloc.as_ref(),
            Context::Batch => self.batch.as_ref(),
            Context::Step => self.step.as_ref(),
        }
    }

    fn slot(&mut self, ctx: Context) -> &mut Option<Setter> {
        match ctx {
            Context::Alloc => &mut self.alloc,
            Context::Batch => &mut self.batch,
            Context::Step => &mut self.step,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.alloc.is_none() && self.batch.is_none() && self.step.is_none()
    }

    /// Contexts with a registered setter.
    pub fn contexts(&self) -> impl Iterator<Item = Context> + '_ {
        Context::ALL.into_iter().filter(|ctx| self.get(*ctx).is_some())
    }
}

/// How a descriptor applies values: one setter for everyone, or a
/// non-empty set of per-context setters.
pub enum Behavior {
    Generic(Setter),
    PerContext(ContextSetters),
}

/// Registry construction errors. These indicate a malformed table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("option '{option}' has neither a generic nor a per-context setter")]
    NoBehavior { option: String },

    #[error("option '{option}' has both a generic and a per-context setter")]
    ConflictingBehavior { option: String },

    #[error("option '{option}' has no getter")]
    MissingGetter { option: String },

    #[error("option '{option}' has no resetter")]
    MissingResetter { option: String },
}

/// A single option descriptor.
pub struct OptionDescriptor {
    name: Option<&'static str>,
    key: &'static str,
    aliases: Vec<&'static str>,
    code: OptCode,
    arity: FlagArity,
    behavior: Behavior,
    getter: Getter,
    resetter: Resetter,
    reset_each_pass: bool,
    early_pass: bool,
    pub(crate) explicitly_set: bool,
    pub(crate) set_by_env: bool,
}

impl OptionDescriptor {
    /// Start a descriptor exposed as `--name`.
    pub fn flag(name: &'static str, code: OptCode, arity: FlagArity) -> DescriptorBuilder {
        DescriptorBuilder::new(Some(name), name, code, arity)
    }

    /// Start a descriptor reachable only through the environment.
    pub fn env_only(key: &'static str, code: OptCode, arity: FlagArity) -> DescriptorBuilder {
        DescriptorBuilder::new(None, key, code, arity)
    }

    /// Long flag name; `None` for environment-only options.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Name used in diagnostics, available for every descriptor.
    pub fn display_name(&self) -> &'static str {
        self.name.unwrap_or(self.key)
    }

    pub fn aliases(&self) -> &[&'static str] {
        &self.aliases
    }

    pub fn code(&self) -> OptCode {
        self.code
    }

    pub fn arity(&self) -> FlagArity {
        self.arity
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn reset_each_pass(&self) -> bool {
        self.reset_each_pass
    }

    pub fn early_pass(&self) -> bool {
        self.early_pass
    }

    pub fn is_set(&self) -> bool {
        self.explicitly_set
    }

    pub fn is_set_by_env(&self) -> bool {
        self.set_by_env
    }

    pub fn get(&self, opts: &JobOptions) -> String {
        (self.getter)(opts)
    }

    pub fn reset(&self, opts: &mut JobOptions) {
        (self.resetter)(opts)
    }
}

impl fmt::Debug for OptionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDescriptor")
            .field("name", &self.display_name())
            .field("code", &self.code)
            .field("arity", &self.arity)
            .field("reset_each_pass", &self.reset_each_pass)
            .field("early_pass", &self.early_pass)
            .field("explicitly_set", &self.explicitly_set)
            .field("set_by_env", &self.set_by_env)
            .finish()
    }
}

/// Collects the parts of a descriptor; [`DescriptorBuilder::build`]
/// rejects combinations that break the behavior invariants.
pub struct DescriptorBuilder {
    name: Option<&'static str>,
    key: &'static str,
    aliases: Vec<&'static str>,
    code: OptCode,
    arity: FlagArity,
    generic: Option<Setter>,
    per_context: ContextSetters,
    getter: Option<Getter>,
    resetter: Option<Resetter>,
    reset_each_pass: bool,
    early_pass: bool,
}

impl DescriptorBuilder {
    fn new(name: Option<&'static str>, key: &'static str, code: OptCode, arity: FlagArity) -> Self {
        Self {
            name,
            key,
            aliases: Vec::new(),
            code,
            arity,
            generic: None,
            per_context: ContextSetters::default(),
            getter: None,
            resetter: None,
            reset_each_pass: false,
            early_pass: false,
        }
    }

    /// Additional long name resolving to the same descriptor.
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Setter shared by every context.
    pub fn setter<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut JobOptions, Option<&str>) -> Result<(), ValueError> + 'static,
    {
        self.generic = Some(Box::new(f));
        self
    }

    /// Setter used only when `ctx` is active.
    pub fn context_setter<F>(mut self, ctx: Context, f: F) -> Self
    where
        F: Fn(&mut JobOptions, Option<&str>) -> Result<(), ValueError> + 'static,
    {
        *self.per_context.slot(ctx) = Some(Box::new(f));
        self
    }

    pub fn getter<F>(mut self, f: F) -> Self
    where
        F: Fn(&JobOptions) -> String + 'static,
    {
        self.getter = Some(Box::new(f));
        self
    }

    pub fn resetter<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut JobOptions) + 'static,
    {
        self.resetter = Some(Box::new(f));
        self
    }

    /// Reset between every component of a composite job.
    pub fn reset_each_pass(mut self) -> Self {
        self.reset_each_pass = true;
        self
    }

    /// Batch submission processes this option in the early scan only.
    pub fn early_pass(mut self) -> Self {
        self.early_pass = true;
        self
    }

    pub fn build(self) -> Result<OptionDescriptor, DescriptorError> {
        let option = self.key.to_string();

        let behavior = match (self.generic, self.per_context.is_empty()) {
            (Some(_), false) => return Err(DescriptorError::ConflictingBehavior { option }),
            (None, true) => return Err(DescriptorError::NoBehavior { option }),
            (Some(setter), true) => Behavior::Generic(setter),
            (None, false) => Behavior::PerContext(self.per_context),
        };
        let getter = self
            .getter
            .ok_or_else(|| DescriptorError::MissingGetter { option: option.clone() })?;
        let resetter = self
            .resetter
            .ok_or(DescriptorError::MissingResetter { option })?;

        Ok(OptionDescriptor {
            name: self.name,
            key: self.key,
            aliases: self.aliases,
            code: self.code,
            arity: self.arity,
            behavior,
            getter,
            resetter,
            reset_each_pass: self.reset_each_pass,
            early_pass: self.early_pass,
            explicitly_set: false,
            set_by_env: false,
        })
    }
}
