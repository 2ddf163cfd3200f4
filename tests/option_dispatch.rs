//! Registry lookup and dispatch rules, exercised through the public API.

use jobopt::options::{codes, process, Context, OptCode, OptionError, Pass, Registry, Source};
use jobopt::state::JobOptions;

fn dispatch(
    registry: &mut Registry,
    opts: &mut JobOptions,
    code: OptCode,
    value: Option<&str>,
    source: Source,
) -> Result<(), OptionError> {
    process(registry, opts, code, value, source, Pass::Normal)
}

// ============================================================================
// Context filtering
// ============================================================================

#[test]
fn alloc_only_option_is_unknown_in_step() {
    let registry = Registry::build();
    let err = registry.lookup_by_code(codes::NO_SHELL, Context::Step).err();
    assert_eq!(err, Some(OptionError::UnknownOption { code: codes::NO_SHELL }));
}

#[test]
fn colliding_short_code_follows_context() {
    let registry = Registry::build();

    let alloc = registry.lookup_by_code(codes::KILL_COMMAND, Context::Alloc).unwrap();
    assert_eq!(alloc.display_name(), "kill-command");

    let step = registry.lookup_by_code(codes::KILL_ON_BAD_EXIT, Context::Step).unwrap();
    assert_eq!(step.display_name(), "kill-on-bad-exit");

    assert!(registry.lookup_by_code(codes::KILL_COMMAND, Context::Batch).is_err());
    assert!(!registry
        .visible(Context::Alloc)
        .iter()
        .any(|d| d.name() == Some("kill-on-bad-exit")));
}

#[test]
fn dispatching_unreachable_code_fails() {
    let mut registry = Registry::build();
    let mut opts = JobOptions::new(Context::Batch);
    let err = dispatch(&mut registry, &mut opts, codes::BELL, None, Source::CommandLine).unwrap_err();
    assert_eq!(err, OptionError::UnknownOption { code: codes::BELL });
}

#[test]
fn visible_names_are_unique() {
    let registry = Registry::build();
    for ctx in Context::ALL {
        let mut names: Vec<_> = registry.visible(ctx).iter().filter_map(|d| d.name()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total, "{ctx}");
    }
}

// ============================================================================
// Boolean coercion of no-value options
// ============================================================================

#[test]
fn truthy_environment_values_set_flag() {
    for value in ["", "yes", "YES", "3"] {
        let mut registry = Registry::build();
        let mut opts = JobOptions::new(Context::Batch);
        dispatch(&mut registry, &mut opts, codes::OVERCOMMIT, Some(value), Source::Environment).unwrap();
        assert!(opts.overcommit, "value {value:?}");
        assert!(registry.set_by_env(codes::OVERCOMMIT));
    }
}

#[test]
fn falsy_environment_values_reset_flag() {
    for value in ["0", "no", "bogus"] {
        let mut registry = Registry::build();
        let mut opts = JobOptions::new(Context::Batch);
        opts.overcommit = true;
        dispatch(&mut registry, &mut opts, codes::OVERCOMMIT, Some(value), Source::Environment).unwrap();
        assert!(!opts.overcommit, "value {value:?}");
        assert!(!registry.by_name("overcommit").unwrap().is_set());
    }
}

#[test]
fn empty_optional_value_counts_as_absent() {
    let mut registry = Registry::build();
    let mut opts = JobOptions::new(Context::Alloc);
    dispatch(&mut registry, &mut opts, codes::IMMEDIATE, Some(""), Source::CommandLine).unwrap();
    assert_eq!(opts.immediate, Some(1));
}

// ============================================================================
// Passes and errors
// ============================================================================

#[test]
fn early_option_skipped_in_normal_batch_pass() {
    let mut registry = Registry::build();
    let mut opts = JobOptions::new(Context::Batch);

    dispatch(&mut registry, &mut opts, codes::VERBOSE, None, Source::CommandLine).unwrap();
    assert_eq!(opts.verbose, 0);
    assert!(!registry.by_name("verbose").unwrap().is_set());

    process(&mut registry, &mut opts, codes::VERBOSE, None, Source::CommandLine, Pass::Early).unwrap();
    assert_eq!(opts.verbose, 1);
}

#[test]
fn normal_option_skipped_in_early_pass() {
    let mut registry = Registry::build();
    let mut opts = JobOptions::new(Context::Batch);
    process(&mut registry, &mut opts, codes::PARTITION, Some("gpu"), Source::CommandLine, Pass::Early).unwrap();
    assert_eq!(opts.partition, None);
}

#[test]
fn passes_only_apply_to_batch() {
    let mut registry = Registry::build();
    let mut opts = JobOptions::new(Context::Step);
    dispatch(&mut registry, &mut opts, codes::VERBOSE, None, Source::CommandLine).unwrap();
    assert_eq!(opts.verbose, 1);
}

#[test]
fn setter_rejection_names_option() {
    let mut registry = Registry::build();
    let mut opts = JobOptions::new(Context::Step);
    let err = dispatch(&mut registry, &mut opts, codes::NTASKS, Some("zero"), Source::CommandLine).unwrap_err();
    match err {
        OptionError::InvalidValue { option, .. } => assert_eq!(option, "ntasks"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(opts.ntasks, 1);
}
