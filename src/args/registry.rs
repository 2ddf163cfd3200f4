//! Flag grammar: the command-line view of the option registry.

use std::fmt::Write as _;

use crate::args::classifier::ArgError;
use crate::options::{Context, FlagArity, OptCode, Registry};

/// Informational flags handled before any option is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Help,
    Usage,
    Version,
}

/// What matching a flag produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Dispatched through the option registry (or a secondary table).
    Option(OptCode),
    Action(Action),
}

/// A single flag definition.
#[derive(Debug, Clone)]
pub struct FlagDef {
    /// Long name without dashes (e.g., "partition").
    pub long: String,
    /// Optional short form (e.g., 'p').
    pub short: Option<char>,
    /// Does it take a value?
    pub arity: FlagArity,
    pub kind: FlagKind,
}

impl FlagDef {
    pub fn option(long: impl Into<String>, short: Option<char>, arity: FlagArity, code: OptCode) -> Self {
        Self { long: long.into(), short, arity, kind: FlagKind::Option(code) }
    }

    fn action(long: &str, short: char, action: Action) -> Self {
        Self {
            long: long.to_string(),
            short: Some(short),
            arity: FlagArity::NoValue,
            kind: FlagKind::Action(action),
        }
    }
}

/// Every flag one front-end accepts.
#[derive(Debug, Clone)]
pub struct Grammar {
    flags: Vec<FlagDef>,
}

impl Grammar {
    /// Build the grammar for `ctx` from the descriptors reachable there.
    /// Environment-only descriptors have no name and never appear.
    pub fn for_context(registry: &Registry, ctx: Context) -> Self {
        let mut flags = vec![
            FlagDef::action("help", 'h', Action::Help),
            FlagDef::action("usage", 'u', Action::Usage),
            FlagDef::action("version", 'V', Action::Version),
        ];
        for descriptor in registry.visible(ctx) {
            let Some(name) = descriptor.name() else {
                continue;
            };
            let code = descriptor.code();
            flags.push(FlagDef::option(name, code.as_short(), descriptor.arity(), code));
            for alias in descriptor.aliases() {
                flags.push(FlagDef::option(*alias, None, descriptor.arity(), code));
            }
        }
        Self { flags }
    }

    /// Add flags from another table (e.g., plugin options).
    pub fn extend(&mut self, defs: impl IntoIterator<Item = FlagDef>) {
        self.flags.extend(defs);
    }

    pub fn flags(&self) -> &[FlagDef] {
        &self.flags
    }

    /// Resolve a long flag by exact name, then by unambiguous prefix.
    ///
    /// A prefix matching several names is still accepted when they all
    /// lead to the same option.
    pub fn find_long(&self, name: &str) -> Result<&FlagDef, ArgError> {
        if let Some(def) = self.flags.iter().find(|d| d.long == name) {
            return Ok(def);
        }

        let candidates: Vec<&FlagDef> = self.flags.iter().filter(|d| d.long.starts_with(name)).collect();
        match candidates.as_slice() {
            [] => Err(ArgError::UnknownFlag(format!("--{}", name))),
            [first, rest @ ..] if rest.iter().all(|d| d.kind == first.kind) => Ok(*first),
            _ => Err(ArgError::AmbiguousFlag {
                flag: format!("--{}", name),
                candidates: candidates.iter().map(|d| format!("--{}", d.long)).collect(),
            }),
        }
    }

    pub fn find_short(&self, c: char) -> Option<&FlagDef> {
        self.flags.iter().find(|d| d.short == Some(c))
    }

    /// Usage text listing every flag.
    pub fn usage(&self, ctx: Context) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Usage: {} [OPTIONS(0)...] [ : [OPTIONS(N)...]] [command [args...]]", ctx.program());
        let _ = writeln!(out);
        for def in &self.flags {
            let short = def.short.map(|c| format!("-{}, ", c)).unwrap_or_default();
            let value = match def.arity {
                FlagArity::NoValue => "",
                FlagArity::RequiresValue => "=<value>",
                FlagArity::OptionalValue => "[=<value>]",
            };
            let _ = writeln!(out, "  {:>4}--{}{}", short, def.long, value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::codes;

    #[test]
    fn grammar_follows_context() {
        let registry = Registry::build();
        let alloc = Grammar::for_context(&registry, Context::Alloc);
        let step = Grammar::for_context(&registry, Context::Step);

        assert!(alloc.find_long("bell").is_ok());
        assert!(step.find_long("bell").is_err());
        assert_eq!(alloc.find_short('K').map(|d| d.long.as_str()), Some("kill-command"));
        assert_eq!(step.find_short('K').map(|d| d.long.as_str()), Some("kill-on-bad-exit"));
    }

    #[test]
    fn env_only_options_are_not_flags() {
        let registry = Registry::build();
        let grammar = Grammar::for_context(&registry, Context::Batch);
        assert!(grammar.flags().iter().all(|d| d.long != "switch_req"));
        assert!(matches!(grammar.find_long("switch_wait"), Err(ArgError::UnknownFlag(_))));
    }

    #[test]
    fn prefix_matching() {
        let registry = Registry::build();
        let grammar = Grammar::for_context(&registry, Context::Batch);

        let def = grammar.find_long("parti").unwrap();
        assert_eq!(def.kind, FlagKind::Option(codes::PARTITION));

        assert!(matches!(grammar.find_long("mem-per"), Err(ArgError::AmbiguousFlag { .. })));
        assert!(matches!(grammar.find_long("bogus"), Err(ArgError::UnknownFlag(_))));
    }

    #[test]
    fn aliases_resolve_to_same_code() {
        let registry = Registry::build();
        let grammar = Grammar::for_context(&registry, Context::Step);
        let tasks = grammar.find_long("tasks").unwrap();
        let ntasks = grammar.find_long("ntasks").unwrap();
        assert_eq!(tasks.kind, ntasks.kind);
    }
}
