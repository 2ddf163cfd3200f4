//! Front-end driver: raw arguments and environment to resolved components.

use serde::Serialize;
use thiserror::Error;

use crate::args::{first_action, split_components, tokenize, Action, ArgError, ComponentArgs, Grammar};
use crate::config::{ConfigError, SiteConfig};
use crate::env::{ingest, EnvSource, EnvTable};
use crate::frontend::exports;
use crate::frontend::plugin::SecondaryTable;
use crate::frontend::verify::{verify, VerifyError};
use crate::options::{process, report, reset_all, Context, OptCode, OptionError, Pass, Registry, Source};
use crate::state::JobOptions;

/// Errors that stop resolution. Environment problems never do.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Args(#[from] ArgError),

    #[error(transparent)]
    Option(#[from] OptionError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One component of a (possibly heterogeneous) job.
#[derive(Debug, Clone, Serialize)]
pub struct Component {
    pub options: JobOptions,
    pub command: Vec<String>,
    /// Packed job flag bits.
    pub job_flags: u32,
    /// Explicitly set options, as the diagnostic report shows them.
    pub report: Vec<(String, String)>,
    /// Environment to export to the command.
    pub exports: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub context: Context,
    /// Informational flag given instead of a job; no components then.
    #[serde(skip)]
    pub action: Option<Action>,
    pub components: Vec<Component>,
}

/// Resolves option sets for one front-end.
pub struct Resolver<'s> {
    ctx: Context,
    registry: Registry,
    /// Built from `registry` and `secondary`; rebuilt when either changes.
    grammar: Grammar,
    site: SiteConfig,
    secondary: Option<&'s mut dyn SecondaryTable>,
}

impl<'s> Resolver<'s> {
    pub fn new(ctx: Context, site: SiteConfig) -> Self {
        let registry = Registry::build();
        let grammar = Grammar::for_context(&registry, ctx);
        Self { ctx, registry, grammar, site, secondary: None }
    }

    /// Resolver using the site configuration file.
    pub fn load(ctx: Context) -> Result<Self, ResolveError> {
        Ok(Self::new(ctx, SiteConfig::load()?))
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self.rebuild_grammar();
        self
    }

    /// Consult `table` for codes the registry does not know.
    pub fn with_secondary(mut self, table: &'s mut dyn SecondaryTable) -> Self {
        self.secondary = Some(table);
        self.rebuild_grammar();
        self
    }

    pub fn context(&self) -> Context {
        self.ctx
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Flags accepted by this front-end, plugin flags included.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn rebuild_grammar(&mut self) {
        let mut grammar = Grammar::for_context(&self.registry, self.ctx);
        if let Some(table) = self.secondary.as_deref() {
            grammar.extend(table.flags());
        }
        self.grammar = grammar;
    }

    /// Resolve `raw_args` (program name excluded) against `env`.
    ///
    /// Every component starts from the previous one: persistent options
    /// carry over, the rest are reset before the environment and the
    /// component's own arguments are applied.
    pub fn resolve(&mut self, env: &dyn EnvSource, raw_args: &[String]) -> Result<Resolution, ResolveError> {
        let tokens = tokenize(raw_args, &self.grammar)?;
        if let Some(action) = first_action(&tokens) {
            return Ok(Resolution { context: self.ctx, action: Some(action), components: Vec::new() });
        }

        let parts = split_components(&tokens);
        let env_table = EnvTable::for_context(self.ctx);
        let mut opts = JobOptions::new(self.ctx);
        opts.launch_mem_sort = self.site.mem_sort();

        let last = parts.len().saturating_sub(1);
        let mut components = Vec::with_capacity(parts.len());
        for (index, part) in parts.into_iter().enumerate() {
            let first_pass = index == 0;
            tracing::debug!(component = index, first_pass, "resolving component");

            opts.apply_defaults(first_pass);
            reset_all(&mut self.registry, &mut opts, first_pass);
            ingest(&env_table, env, &mut self.registry, &mut opts);

            let ComponentArgs { options, mut command } = part;
            if self.ctx == Context::Batch {
                self.apply_args(&mut opts, &options, Pass::Early)?;
            }
            self.apply_args(&mut opts, &options, Pass::Normal)?;

            verify(&mut opts, &mut command, &self.site, env, index == last)?;

            components.push(Component {
                job_flags: opts.job_flags(),
                report: report(&self.registry, &opts)
                    .map(|(name, value)| (name.to_string(), value))
                    .collect(),
                exports: exports::for_options(&opts, env),
                options: opts.clone(),
                command,
            });
        }

        Ok(Resolution { context: self.ctx, action: None, components })
    }

    fn apply_args(
        &mut self,
        opts: &mut JobOptions,
        options: &[(OptCode, Option<String>)],
        pass: Pass,
    ) -> Result<(), ResolveError> {
        for (code, value) in options {
            let value = value.as_deref();
            match process(&mut self.registry, opts, *code, value, Source::CommandLine, pass) {
                Ok(()) => {}
                // Plugin options are only handled once, in the normal pass.
                Err(OptionError::UnknownOption { .. }) if pass == Pass::Early => {}
                Err(OptionError::UnknownOption { code }) => {
                    let handled = match self.secondary.as_deref_mut() {
                        Some(table) => table.process(code, value)?,
                        None => false,
                    };
                    if !handled {
                        return Err(OptionError::UnknownOption { code }.into());
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::PluginOptions;
    use crate::options::FlagArity;
    use std::collections::HashMap;

    fn raw_args(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn action_short_circuits() {
        let mut resolver = Resolver::new(Context::Alloc, SiteConfig::default());
        let resolution = resolver.resolve(&HashMap::new(), &raw_args(&["-p", "x", "-V"])).unwrap();
        assert_eq!(resolution.action, Some(Action::Version));
        assert!(resolution.components.is_empty());
    }

    #[test]
    fn one_component_per_separator() {
        let mut resolver = Resolver::new(Context::Step, SiteConfig::default());
        let resolution = resolver
            .resolve(&HashMap::new(), &raw_args(&["-n2", "a", ":", "-n3", "b"]))
            .unwrap();
        let tasks: Vec<i32> = resolution.components.iter().map(|c| c.options.ntasks).collect();
        assert_eq!(tasks, vec![2, 3]);
    }

    #[test]
    fn grammar_follows_secondary_table() {
        let mut plugins = PluginOptions::new();
        plugins.register("tmpfs", FlagArity::RequiresValue);

        let plain = Resolver::new(Context::Batch, SiteConfig::default());
        assert!(plain.grammar().find_long("tmpfs").is_err());

        let extended = Resolver::new(Context::Batch, SiteConfig::default()).with_secondary(&mut plugins);
        assert!(extended.grammar().find_long("tmpfs").is_ok());
        assert!(extended.grammar().find_long("partition").is_ok());
    }

    #[test]
    fn invalid_command_line_value_is_fatal() {
        let mut resolver = Resolver::new(Context::Batch, SiteConfig::default());
        let err = resolver.resolve(&HashMap::new(), &raw_args(&["--nice=abc"])).unwrap_err();
        assert!(matches!(err, ResolveError::Option(OptionError::InvalidValue { .. })));
    }
}
