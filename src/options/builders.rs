//! Generic descriptor builders for the common field shapes.

use std::fmt::Display;

use crate::codec::{mbytes_to_str, parse_int, str_to_mbytes, ValueError};
use crate::options::descriptor::{DescriptorBuilder, FlagArity, OptCode, OptionDescriptor};
use crate::state::JobOptions;

/// Accessor pair for one `JobOptions` field.
pub(crate) struct Field<T: 'static> {
    pub(crate) get: fn(&JobOptions) -> &T,
    pub(crate) get_mut: fn(&mut JobOptions) -> &mut T,
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

/// `field!(name)` builds the [`Field`] accessors for `JobOptions::name`.
macro_rules! field {
    ($name:ident) => {
        $crate::options::builders::Field {
            get: |o| &o.$name,
            get_mut: |o| &mut o.$name,
        }
    };
}
pub(crate) use field;

/// The value, or an error naming the option that needed one.
pub(crate) fn required<'a>(name: &str, arg: Option<&'a str>) -> Result<&'a str, ValueError> {
    arg.ok_or_else(|| ValueError::new(format!("option '--{}' requires an argument", name)))
}

pub(crate) fn show<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map_or_else(|| "unset".to_string(), ToString::to_string)
}

pub(crate) fn show_flag(value: bool) -> String {
    if value { "set" } else { "unset" }.to_string()
}

/// Free-form string option.
pub(crate) fn string_option(
    name: &'static str,
    code: OptCode,
    field: Field<Option<String>>,
) -> DescriptorBuilder {
    OptionDescriptor::flag(name, code, FlagArity::RequiresValue)
        .setter(move |opts, arg| {
            *(field.get_mut)(opts) = Some(required(name, arg)?.to_string());
            Ok(())
        })
        .getter(move |opts| show((field.get)(opts)))
        .resetter(move |opts| *(field.get_mut)(opts) = None)
}

/// Option whose value goes through a codec parser first.
pub(crate) fn parsed_option<T: Display + 'static>(
    name: &'static str,
    code: OptCode,
    field: Field<Option<T>>,
    parse: fn(&str) -> Result<T, ValueError>,
) -> DescriptorBuilder {
    OptionDescriptor::flag(name, code, FlagArity::RequiresValue)
        .setter(move |opts, arg| {
            *(field.get_mut)(opts) = Some(parse(required(name, arg)?)?);
            Ok(())
        })
        .getter(move |opts| show((field.get)(opts)))
        .resetter(move |opts| *(field.get_mut)(opts) = None)
}

/// Presence flag.
pub(crate) fn bool_option(name: &'static str, code: OptCode, field: Field<bool>) -> DescriptorBuilder {
    OptionDescriptor::flag(name, code, FlagArity::NoValue)
        .setter(move |opts, _| {
            *(field.get_mut)(opts) = true;
            Ok(())
        })
        .getter(move |opts| show_flag(*(field.get)(opts)))
        .resetter(move |opts| *(field.get_mut)(opts) = false)
}

/// Integer option; `positive` rejects zero and negatives.
pub(crate) fn int_option(
    name: &'static str,
    code: OptCode,
    field: Field<Option<i32>>,
    positive: bool,
) -> DescriptorBuilder {
    OptionDescriptor::flag(name, code, FlagArity::RequiresValue)
        .setter(move |opts, arg| {
            let label = format!("--{}", name);
            *(field.get_mut)(opts) = Some(parse_int(&label, required(name, arg)?, positive)?);
            Ok(())
        })
        .getter(move |opts| show((field.get)(opts)))
        .resetter(move |opts| *(field.get_mut)(opts) = None)
}

/// Memory size in megabytes.
pub(crate) fn mbytes_option(
    name: &'static str,
    code: OptCode,
    field: Field<Option<u64>>,
) -> DescriptorBuilder {
    OptionDescriptor::flag(name, code, FlagArity::RequiresValue)
        .setter(move |opts, arg| {
            *(field.get_mut)(opts) = Some(str_to_mbytes(required(name, arg)?)?);
            Ok(())
        })
        .getter(move |opts| mbytes_to_str(*(field.get)(opts)))
        .resetter(move |opts| *(field.get_mut)(opts) = None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::context::{select_setter, Context};

    fn apply(desc: &OptionDescriptor, opts: &mut JobOptions, arg: Option<&str>) -> Result<(), ValueError> {
        let setter = select_setter(desc, opts.context()).expect("setter");
        setter(opts, arg)
    }

    #[test]
    fn string_option_round_trip() {
        let desc = string_option("account", OptCode::short('A'), field!(account))
            .build()
            .unwrap();
        let mut opts = JobOptions::new(Context::Batch);
        assert_eq!(desc.get(&opts), "unset");

        apply(&desc, &mut opts, Some("physics")).unwrap();
        assert_eq!(opts.account.as_deref(), Some("physics"));
        assert_eq!(desc.get(&opts), "physics");

        desc.reset(&mut opts);
        assert_eq!(opts.account, None);
    }

    #[test]
    fn missing_value_is_an_error() {
        let desc = string_option("account", OptCode::short('A'), field!(account))
            .build()
            .unwrap();
        let mut opts = JobOptions::new(Context::Batch);
        let err = apply(&desc, &mut opts, None).unwrap_err();
        assert!(err.to_string().contains("--account"));
    }

    #[test]
    fn int_option_rejects_before_mutating() {
        let desc = int_option("mincpus", OptCode::long(900), field!(min_cpus), true)
            .build()
            .unwrap();
        let mut opts = JobOptions::new(Context::Step);
        apply(&desc, &mut opts, Some("4")).unwrap();
        assert!(apply(&desc, &mut opts, Some("-2")).is_err());
        assert_eq!(opts.min_cpus, Some(4));
    }

    #[test]
    fn mbytes_option_reports_units() {
        let desc = mbytes_option("tmp", OptCode::long(901), field!(tmp_disk))
            .build()
            .unwrap();
        let mut opts = JobOptions::new(Context::Alloc);
        apply(&desc, &mut opts, Some("2G")).unwrap();
        assert_eq!(opts.tmp_disk, Some(2048));
        assert_eq!(desc.get(&opts), mbytes_to_str(Some(2048)));
    }
}
