//! Binds command line arguments into a plain struct, driven by a small tag
//! language on each field.
//!
//! ```
//! use clop::Clop;
//!
//! #[derive(Debug, Default, Clop)]
//! struct Cat {
//!     /// number nonempty output lines, overrides -n
//!     #[clop("-b; --number-nonblank")]
//!     number_nonblank: bool,
//!
//!     /// display $ at end of each line
//!     #[clop("-E; --show-ends")]
//!     show_ends: bool,
//!
//!     #[clop("args=files")]
//!     files: Vec<String>,
//! }
//!
//! let cat = Cat::from_vec(vec!["-bE".into(), "a.txt".into()]).unwrap();
//! assert!(cat.number_nonblank && cat.show_ends);
//! assert_eq!(cat.files, ["a.txt"]);
//! ```
//!
//! Tag clauses, separated by `;`:
//!
//! - `-x`, `--name`: short and long names. `short` and `long` derive them
//!   from the field name.
//! - `greedy`: keep taking values until the next registered option.
//! - `once`: a second occurrence is an error.
//! - `env`, `env=NAME`: read the variable when the command line left the
//!   option unset.
//! - `args`, `args=NAME`: bind leftover positional arguments.
//! - `callback`, `callback=METHOD`: hand raw values to `fn METHOD(&mut self,
//!   &str)` instead of storing them.
//! - `subcommand`, `subcommand=NAME`: the field is a nested command.
//! - `flatten`: the field's own fields join the current scope.
//! - `version=STR`, `about=STR`: text for `-V` and `-h`.
//!
//! A bare `#[clop]` means `short; long`. Doc comments become usage text and
//! `#[clop("...", default = "...")]` sets an initial value.

mod cli;
mod error;
mod fallback;
mod help;
mod matcher;
mod name;
mod outcome;
mod rt;
mod slot;
mod suggest;
mod table;
mod tag;

pub use clop_macros::Clop;

pub use crate::{
    cli::Cli,
    error::{Error, Result, TRY_HELP},
    outcome::Outcome,
    rt::{Parser, ScopeId},
    slot::{FromArg, IntoSlot, Json, Kind, Repeated, Scalar, Slot},
};

/// A struct whose fields can be bound from the command line.
///
/// Normally derived. `register` hands every field to the [`Parser`];
/// `finish` runs once the pass is over and the fields are no longer
/// borrowed, which is where callbacks and [`SubMain`] hooks fire.
pub trait Clop {
    fn register<'a>(&'a mut self, p: &mut Parser<'a>, scope: ScopeId) -> Result<()>;

    fn finish(&mut self, _outcome: &Outcome, _scope: ScopeId) {}

    fn from_vec(args: Vec<String>) -> Result<Self>
    where
        Self: Default + Sized,
    {
        let mut res = Self::default();
        Cli::new(args).try_bind(&mut res)?;
        Ok(res)
    }

    fn from_env() -> Result<Self>
    where
        Self: Default + Sized,
    {
        let mut res = Self::default();
        Cli::from_env().try_bind(&mut res)?;
        Ok(res)
    }

    /// Prints usage or the error and exits on failure.
    fn from_env_or_exit() -> Self
    where
        Self: Default + Sized,
    {
        Self::from_env().unwrap_or_else(|err| err.exit())
    }
}

/// Hook run after binding for an invoked subcommand that opts in with
/// `#[clop(sub_main)]`. Nested subcommands run before their parents.
///
/// Hooks fire only once the whole command line has bound, parents'
/// positionals and env included. If anything fails, none of them run.
pub trait SubMain {
    fn sub_main(&mut self);
}
