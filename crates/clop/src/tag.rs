//! The `#[clop("...")]` mini-language.
//!
//! A tag is a `;` separated list of clauses:
//!
//! ```text
//! -d; --debug; short; long          names
//! greedy; once                      modifiers
//! env; env=NAME; args; args=NAME    fallback sources
//! callback; callback=NAME           raw value handler
//! version=STR; about=STR            scope metadata
//! subcommand; subcommand=NAME       nested scope
//! flatten                           nested struct, same scope
//! ```

use crate::{
    error::{Error, Result},
    name,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Clause<'t> {
    Short(&'t str),
    Long(&'t str),
    AutoShort,
    AutoLong,
    Greedy,
    Once,
    Env(Option<&'t str>),
    Args(Option<&'t str>),
    Callback(Option<&'t str>),
    Version(&'t str),
    About(&'t str),
    Subcommand(Option<&'t str>),
    Flatten,
}

/// Clauses paired with their source text.
pub(crate) fn clauses(tag: &str) -> Result<Vec<(&str, Clause<'_>)>> {
    let mut res = Vec::new();
    for clause in tag.split(';').map(str::trim) {
        if clause.is_empty() {
            continue;
        }
        res.push((clause, clause_of(clause, tag)?));
    }
    Ok(res)
}

fn clause_of<'t>(clause: &'t str, tag: &str) -> Result<Clause<'t>> {
    if let Some(name) = clause.strip_prefix("--") {
        return Ok(Clause::Long(name));
    }
    if let Some(name) = clause.strip_prefix('-') {
        return Ok(Clause::Short(name));
    }
    let (key, value) = match clause.split_once('=') {
        Some((key, value)) => (key.trim(), Some(value.trim())),
        None => (clause, None),
    };
    let res = match (key, value) {
        ("short", None) => Clause::AutoShort,
        ("long", None) => Clause::AutoLong,
        ("greedy", None) => Clause::Greedy,
        ("once", None) => Clause::Once,
        ("flatten", None) => Clause::Flatten,
        ("env", value) => Clause::Env(value),
        ("args", value) => Clause::Args(value),
        ("callback", value) => Clause::Callback(value),
        ("subcommand", value) => Clause::Subcommand(value),
        ("version", Some(value)) => Clause::Version(value),
        ("about", Some(value)) => Clause::About(value),
        _ => {
            return Err(Error::UnsupportedClause {
                clause: clause.to_string(),
                tag: tag.to_string(),
            })
        }
    };
    Ok(res)
}

/// Everything a leaf declaration asks for, with auto names resolved.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Spec {
    pub(crate) shorts: Vec<char>,
    pub(crate) longs: Vec<String>,
    pub(crate) env: Option<String>,
    pub(crate) args: Option<String>,
    pub(crate) greedy: bool,
    pub(crate) once: bool,
    pub(crate) callback: Option<String>,
}

impl Spec {
    pub(crate) fn has_names(&self) -> bool {
        !self.shorts.is_empty() || !self.longs.is_empty()
    }
}

/// Scope metadata carried by a tag instead of an option.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Meta {
    Version(String),
    About(String),
}

pub(crate) enum Parsed {
    Option(Spec),
    Meta(Meta),
}

/// Parses a leaf tag. `field` is the declaring identifier used by the
/// `short`, `long`, `env` and `args` shorthands.
pub(crate) fn parse(field: &str, tag: &str) -> Result<Parsed> {
    let clauses = clauses(tag)?;
    if let [(_, clause)] = clauses.as_slice() {
        match clause {
            Clause::Version(it) => return Ok(Parsed::Meta(Meta::Version(it.to_string()))),
            Clause::About(it) => return Ok(Parsed::Meta(Meta::About(it.to_string()))),
            _ => (),
        }
    }

    let mut spec = Spec::default();
    let mut args = None;
    for (text, clause) in clauses {
        match clause {
            Clause::Short(it) => spec.shorts.push(short_name(it)?),
            Clause::Long(it) => spec.longs.push(long_name(it)?),
            Clause::AutoShort => match name::short_option_name(field) {
                Some(it) => spec.shorts.push(short_name(&it.to_string())?),
                None => return Err(Error::illegal_name(field, "can't derive a short name")),
            },
            Clause::AutoLong => {
                if field.trim_start_matches('_').len() > 1 {
                    spec.longs.push(long_name(&name::gnu_option_name(field))?)
                }
            }
            Clause::Greedy => spec.greedy = true,
            Clause::Once => spec.once = true,
            Clause::Env(it) => {
                spec.env = Some(it.map_or_else(|| name::env_option_name(field), str::to_string))
            }
            Clause::Args(it) => args = Some(it.map_or_else(|| field.to_string(), str::to_string)),
            Clause::Callback(it) => spec.callback = Some(it.unwrap_or("parse").to_string()),
            Clause::Version(_) | Clause::About(_) | Clause::Subcommand(_) | Clause::Flatten => {
                return Err(Error::UnsupportedClause {
                    clause: text.to_string(),
                    tag: tag.to_string(),
                })
            }
        }
    }

    // Positional binding only applies to declarations without names.
    if !spec.has_names() {
        spec.args = args;
    }
    if !spec.has_names() && spec.env.is_none() && spec.args.is_none() {
        return Err(Error::NoBindingName { field: field.to_string(), tag: tag.to_string() });
    }
    Ok(Parsed::Option(spec))
}

/// Subcommand name from `subcommand` / `subcommand=NAME`, if the tag has one.
pub(crate) fn subcommand_name(field: &str, tag: &str) -> Result<Option<String>> {
    for (_, clause) in clauses(tag)? {
        if let Clause::Subcommand(name) = clause {
            let name = name.map_or_else(|| field.to_ascii_lowercase(), str::to_string);
            return Ok(Some(name));
        }
    }
    Ok(None)
}

fn short_name(name: &str) -> Result<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(Error::illegal_name(name, "empty short option")),
        (Some(c), None) => {
            name::check_option_name(name)
                .map_err(|bad| Error::illegal_name(name, format!("unsupported character `{bad}`")))?;
            Ok(c)
        }
        (Some(_), Some(_)) => {
            Err(Error::illegal_name(name, "short options are a single character, use `--`"))
        }
    }
}

fn long_name(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(Error::illegal_name("--", "empty long option"));
    }
    name::check_option_name(name)
        .map_err(|bad| Error::illegal_name(name, format!("unsupported character `{bad}`")))?;
    Ok(name.to_string())
}
