//! The entry point a program configures once and binds with.

use std::{
    collections::HashMap,
    fmt,
    io::{self, Write},
    process,
};

use tracing::debug;

use crate::{
    error::{Error, Result, TRY_HELP},
    fallback::Env,
    outcome::Outcome,
    rt::{Parser, ScopeId},
    Clop,
};

/// Arguments plus everything that shapes how a bind pass reports.
///
/// ```no_run
/// # #[derive(Default, clop::Clop)]
/// # struct Cat { #[clop("-n; --number")] number: bool }
/// let mut cat = Cat::default();
/// let outcome = clop::Cli::from_env().version("v0.1.0").bind(&mut cat);
/// ```
pub struct Cli<'w> {
    args: Vec<String>,
    proc_name: String,
    version: Option<String>,
    about: Option<String>,
    exit: bool,
    out: Box<dyn io::Write + 'w>,
    env: Env,
}

impl fmt::Debug for Cli<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("args", &self.args)
            .field("proc_name", &self.proc_name)
            .field("exit", &self.exit)
            .finish_non_exhaustive()
    }
}

impl Cli<'static> {
    /// Binds an explicit argument vector, without the program name.
    pub fn new<I>(args: I) -> Cli<'static>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Cli {
            args: args.into_iter().map(Into::into).collect(),
            proc_name: String::new(),
            version: None,
            about: None,
            exit: true,
            out: Box::new(io::stderr()),
            env: Env::Process,
        }
    }

    /// Binds the process arguments; `argv[0]` becomes the program name.
    pub fn from_env() -> Cli<'static> {
        let mut args = std::env::args();
        let proc_name = args.next().unwrap_or_default();
        Cli::new(args).proc_name(proc_name)
    }
}

impl<'w> Cli<'w> {
    /// `false` turns `bind` failures into plain `Err` returns.
    pub fn exit_on_error(mut self, yes: bool) -> Self {
        self.exit = yes;
        self
    }

    /// Where `bind` reports errors, help and version text.
    ///
    /// Stderr by default, help included, so a tool's stdout only carries its
    /// own output. Pass `io::stdout()` to print usage to stdout instead.
    /// [`Error::exit`] is separate: it sends help to stdout and errors to
    /// stderr.
    pub fn output<'o>(self, out: impl io::Write + 'o) -> Cli<'o> {
        Cli {
            args: self.args,
            proc_name: self.proc_name,
            version: self.version,
            about: self.about,
            exit: self.exit,
            out: Box::new(out),
            env: self.env,
        }
    }

    /// Replaces the process environment with a fixed set of variables.
    /// Every call adds one variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut vars = match self.env {
            Env::Fixed(vars) => vars,
            Env::Process => HashMap::new(),
        };
        vars.insert(key.into(), value.into());
        self.env = Env::Fixed(vars);
        self
    }

    pub fn proc_name(mut self, name: impl Into<String>) -> Self {
        self.proc_name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Binds without printing anything.
    pub fn try_bind<T: Clop>(&self, target: &mut T) -> Result<Outcome> {
        let target: &mut dyn Clop = target;
        self.try_bind_all(&mut [target])
    }

    /// Binds several independent structs against the same arguments, as
    /// if their fields were declared in one struct.
    pub fn try_bind_all(&self, targets: &mut [&mut dyn Clop]) -> Result<Outcome> {
        let mut parser = Parser::new();
        parser.set_proc_name(self.proc_name.as_str());
        parser.set_env(self.env.clone());
        if let Some(version) = &self.version {
            parser.set_version(ScopeId::ROOT, version.as_str());
        }
        if let Some(about) = &self.about {
            parser.set_about(ScopeId::ROOT, about.as_str());
        }
        for target in targets.iter_mut() {
            target.register(&mut parser, ScopeId::ROOT)?;
        }

        let outcome = parser.run(&self.args)?;
        debug!(subcommands = ?outcome.subcommands(), "bind finished");
        for target in targets.iter_mut() {
            target.finish(&outcome, ScopeId::ROOT);
        }
        Ok(outcome)
    }

    /// Binds and reports: the error and a `--help` hint go to the output,
    /// then the process exits unless [`Cli::exit_on_error`] said otherwise.
    pub fn bind<T: Clop>(&mut self, target: &mut T) -> Result<Outcome> {
        let target: &mut dyn Clop = target;
        self.bind_all(&mut [target])
    }

    pub fn bind_all(&mut self, targets: &mut [&mut dyn Clop]) -> Result<Outcome> {
        let res = self.try_bind_all(targets);
        if let Err(err) = &res {
            self.report(err);
        }
        res
    }

    /// Builds a default `T` and binds it.
    pub fn parse<T: Clop + Default>(&mut self) -> Result<T> {
        let mut res = T::default();
        self.bind(&mut res)?;
        Ok(res)
    }

    fn report(&mut self, err: &Error) {
        let status = if err.is_help() {
            let _ = writeln!(self.out, "{err}");
            0
        } else {
            let _ = writeln!(self.out, "{err}\n{TRY_HELP}");
            1
        };
        let _ = self.out.flush();
        if self.exit {
            process::exit(status)
        }
    }
}
