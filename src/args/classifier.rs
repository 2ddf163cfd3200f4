//! Argument tokenizer: raw args → tokens → job components.

use thiserror::Error;

use crate::args::registry::{Action, FlagDef, FlagKind, Grammar};
use crate::options::{FlagArity, OptCode};

/// A tokenized argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Option with its value, if one was given.
    Option { code: OptCode, value: Option<String> },
    Action(Action),
    /// Command word (not a flag).
    Positional(String),
    /// A lone `:` between components of a composite job.
    ComponentSeparator,
}

/// Errors produced while tokenizing arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("unrecognized option '{0}'")]
    UnknownFlag(String),

    #[error("option '{flag}' is ambiguous; possibilities: {}", candidates.join(" "))]
    AmbiguousFlag { flag: String, candidates: Vec<String> },

    #[error("option '{0}' requires an argument")]
    MissingValue(String),

    #[error("option '{0}' doesn't allow an argument")]
    UnexpectedValue(String),
}

/// Options and command of one job component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentArgs {
    pub options: Vec<(OptCode, Option<String>)>,
    pub command: Vec<String>,
}

fn token_for(def: &FlagDef, value: Option<String>) -> Token {
    match def.kind {
        FlagKind::Option(code) => Token::Option { code, value },
        FlagKind::Action(action) => Token::Action(action),
    }
}

/// Tokenize raw args against `grammar`.
///
/// Option parsing stops at the first non-option or `--`; everything up to
/// the next lone `:` is the component's command, after which option
/// parsing resumes for the next component.
pub fn tokenize(raw_args: &[String], grammar: &Grammar) -> Result<Vec<Token>, ArgError> {
    let mut tokens = Vec::new();
    let mut in_command = false;
    let mut iter = raw_args.iter();

    while let Some(arg) = iter.next() {
        if arg == ":" {
            tokens.push(Token::ComponentSeparator);
            in_command = false;
            continue;
        }
        if in_command {
            tokens.push(Token::Positional(arg.clone()));
            continue;
        }
        if arg == "--" {
            in_command = true;
            continue;
        }

        // Long form: --name, --name=value, --name value
        if let Some(body) = arg.strip_prefix("--") {
            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (body, None),
            };
            let def = grammar.find_long(name)?;
            let flag = format!("--{}", def.long);
            let value = match def.arity {
                FlagArity::NoValue if inline.is_some() => return Err(ArgError::UnexpectedValue(flag)),
                FlagArity::NoValue => None,
                FlagArity::RequiresValue => match inline {
                    Some(value) => Some(value),
                    None => Some(iter.next().ok_or(ArgError::MissingValue(flag))?.clone()),
                },
                FlagArity::OptionalValue => inline,
            };
            tokens.push(token_for(def, value));
            continue;
        }

        // Short form, possibly bundled: -v, -vvO, -pdebug, -p debug
        if let Some(body) = arg.strip_prefix('-').filter(|b| !b.is_empty()) {
            for (i, c) in body.char_indices() {
                let def = grammar
                    .find_short(c)
                    .ok_or_else(|| ArgError::UnknownFlag(format!("-{}", c)))?;
                let rest = &body[i + c.len_utf8()..];
                match def.arity {
                    FlagArity::NoValue => tokens.push(token_for(def, None)),
                    FlagArity::RequiresValue => {
                        let value = if rest.is_empty() {
                            iter.next()
                                .ok_or_else(|| ArgError::MissingValue(format!("-{}", c)))?
                                .clone()
                        } else {
                            rest.to_string()
                        };
                        tokens.push(token_for(def, Some(value)));
                        break;
                    }
                    FlagArity::OptionalValue => {
                        let value = (!rest.is_empty()).then(|| rest.to_string());
                        tokens.push(token_for(def, value));
                        break;
                    }
                }
            }
            continue;
        }

        // First non-option (a lone "-" included) starts the command.
        in_command = true;
        tokens.push(Token::Positional(arg.clone()));
    }

    Ok(tokens)
}

/// Group option and command tokens by job component. Actions are ignored.
pub fn split_components(tokens: &[Token]) -> Vec<ComponentArgs> {
    let mut components = vec![ComponentArgs::default()];
    for token in tokens {
        let Some(current) = components.last_mut() else {
            continue;
        };
        match token {
            Token::Option { code, value } => current.options.push((*code, value.clone())),
            Token::Positional(word) => current.command.push(word.clone()),
            Token::Action(_) => {}
            Token::ComponentSeparator => components.push(ComponentArgs::default()),
        }
    }
    components
}

/// The first informational action requested, if any.
pub fn first_action(tokens: &[Token]) -> Option<Action> {
    tokens.iter().find_map(|t| match t {
        Token::Action(action) => Some(*action),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{codes, Context, Registry};

    fn raw_args(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn grammar(ctx: Context) -> Grammar {
        Grammar::for_context(&Registry::build(), ctx)
    }

    fn opt(code: OptCode, value: Option<&str>) -> Token {
        Token::Option { code, value: value.map(str::to_string) }
    }

    // ========================================================================
    // Long flags
    // ========================================================================

    #[test]
    fn long_flag_value_forms() {
        let tokens = tokenize(&raw_args(&["--partition=gpu", "--account", "phys"]), &grammar(Context::Batch)).unwrap();
        assert_eq!(
            tokens,
            vec![opt(codes::PARTITION, Some("gpu")), opt(codes::ACCOUNT, Some("phys"))]
        );
    }

    #[test]
    fn optional_value_only_attached() {
        let tokens = tokenize(&raw_args(&["--exclusive", "user"]), &grammar(Context::Step)).unwrap();
        assert_eq!(
            tokens,
            vec![opt(codes::EXCLUSIVE, None), Token::Positional("user".into())]
        );
    }

    #[test]
    fn no_value_flag_rejects_value() {
        let err = tokenize(&raw_args(&["--hold=yes"]), &grammar(Context::Batch)).unwrap_err();
        assert_eq!(err, ArgError::UnexpectedValue("--hold".into()));
    }

    #[test]
    fn missing_required_value() {
        let err = tokenize(&raw_args(&["--partition"]), &grammar(Context::Batch)).unwrap_err();
        assert_eq!(err, ArgError::MissingValue("--partition".into()));
    }

    // ========================================================================
    // Short flags
    // ========================================================================

    #[test]
    fn bundled_short_flags() {
        let tokens = tokenize(&raw_args(&["-vvOpdebug"]), &grammar(Context::Step)).unwrap();
        assert_eq!(
            tokens,
            vec![
                opt(codes::VERBOSE, None),
                opt(codes::VERBOSE, None),
                opt(codes::OVERCOMMIT, None),
                opt(codes::PARTITION, Some("debug")),
            ]
        );
    }

    #[test]
    fn short_flag_separate_value() {
        let tokens = tokenize(&raw_args(&["-N", "2-4"]), &grammar(Context::Alloc)).unwrap();
        assert_eq!(tokens, vec![opt(codes::NODES, Some("2-4"))]);
    }

    #[test]
    fn unknown_short_flag() {
        let err = tokenize(&raw_args(&["-Z"]), &grammar(Context::Alloc)).unwrap_err();
        assert_eq!(err, ArgError::UnknownFlag("-Z".into()));
    }

    // ========================================================================
    // Commands and components
    // ========================================================================

    #[test]
    fn parsing_stops_at_first_command_word() {
        let tokens = tokenize(&raw_args(&["-n2", "hostname", "-p", "x"]), &grammar(Context::Step)).unwrap();
        let components = split_components(&tokens);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].options, vec![(codes::NTASKS, Some("2".into()))]);
        assert_eq!(components[0].command, raw_args(&["hostname", "-p", "x"]));
    }

    #[test]
    fn double_dash_starts_command() {
        let tokens = tokenize(&raw_args(&["--", "-weird-name"]), &grammar(Context::Step)).unwrap();
        assert_eq!(tokens, vec![Token::Positional("-weird-name".into())]);
    }

    #[test]
    fn colon_separates_components() {
        let tokens = tokenize(
            &raw_args(&["-p", "a", "cmd1", ":", "-p", "b", "cmd2"]),
            &grammar(Context::Step),
        )
        .unwrap();
        let components = split_components(&tokens);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].command, raw_args(&["cmd1"]));
        assert_eq!(components[1].options, vec![(codes::PARTITION, Some("b".into()))]);
        assert_eq!(components[1].command, raw_args(&["cmd2"]));
    }

    #[test]
    fn actions_are_reported_separately() {
        let tokens = tokenize(&raw_args(&["-p", "a", "--help"]), &grammar(Context::Alloc)).unwrap();
        assert_eq!(first_action(&tokens), Some(Action::Help));
        assert_eq!(split_components(&tokens)[0].options.len(), 1);
    }
}
