//! Token classification and option binding for one scope.

use tracing::trace;

use crate::{
    error::{Error, Result},
    help,
    rt::{Scope, ScopeId},
    suggest,
    table::OptId,
};

/// What a scan leaves behind for the fallback pass and the dispatcher.
#[derive(Debug, Default)]
pub(crate) struct Scan {
    /// Non-option tokens with their absolute argv position.
    pub(crate) unparsed: Vec<(usize, String)>,
    /// Invoked subcommand and the index of its first token.
    pub(crate) handoff: Option<(ScopeId, usize)>,
}

pub(crate) struct Matcher<'s, 'a> {
    scope: &'s mut Scope<'a>,
    path: &'s str,
    args: &'s [String],
    offset: usize,
    i: usize,
    after_double_dash: bool,
    unparsed: Vec<(usize, String)>,
}

impl<'s, 'a> Matcher<'s, 'a> {
    pub(crate) fn new(
        scope: &'s mut Scope<'a>,
        path: &'s str,
        args: &'s [String],
        offset: usize,
    ) -> Matcher<'s, 'a> {
        Matcher { scope, path, args, offset, i: 0, after_double_dash: false, unparsed: Vec::new() }
    }

    pub(crate) fn scan(mut self) -> Result<Scan> {
        let args = self.args;
        while self.i < args.len() {
            let arg = args[self.i].as_str();
            trace!(pos = self.pos(), arg, "token");
            if arg.is_empty() {
                return Err(Error::EmptyArgument { index: self.pos() });
            }

            if self.after_double_dash || arg == "-" {
                self.positional(arg);
            } else if arg == "--" {
                self.after_double_dash = true;
            } else if !arg.starts_with('-') {
                if let Some(child) = self.subcommand(arg)? {
                    let handoff = Some((child, self.i + 1));
                    return Ok(Scan { unparsed: self.unparsed, handoff });
                }
                self.positional(arg);
            } else if let Some(name) = arg.strip_prefix("--") {
                self.long(name)?;
            } else {
                self.short(&arg[1..])?;
            }
            self.i += 1;
        }
        Ok(Scan { unparsed: self.unparsed, handoff: None })
    }

    fn pos(&self) -> usize {
        self.offset + self.i
    }

    fn positional(&mut self, arg: &str) {
        self.unparsed.push((self.pos(), arg.to_string()));
    }

    fn subcommand(&self, arg: &str) -> Result<Option<ScopeId>> {
        let table = &self.scope.table;
        if table.subcommands.is_empty() {
            return Ok(None);
        }
        if let Some(child) = table.subcommands.get(arg) {
            return Ok(Some(child.scope));
        }
        // Without env or positional bindings the token can only be a typo.
        if table.fallback.is_empty() {
            let suggestion = suggest::subcommand(table, arg);
            return Err(Error::UnknownSubcommand { name: arg.to_string(), suggestion });
        }
        Ok(None)
    }

    /// `-h`/`--help` and `-V`/`--version` answer unless the caller took
    /// those names for something else.
    fn builtin(&self, name: &str) -> Result<()> {
        if self.scope.table.resolve(name).is_some() {
            return Ok(());
        }
        match name {
            "h" | "help" => Err(Error::Help(help::render(self.scope, self.path))),
            "V" | "version" => match &self.scope.version {
                Some(version) if self.path.is_empty() => Err(Error::Version(version.clone())),
                Some(version) => Err(Error::Version(format!("{} {version}", self.path))),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn long(&mut self, name: &str) -> Result<()> {
        self.builtin(name)?;
        let table = &self.scope.table;
        let (id, key, inline) = match table.resolve(name) {
            Some(id) => (id, name, None),
            None => {
                let (key, value) = match name.split_once('=') {
                    Some((key, value)) => (key, Some(value)),
                    None => (name, None),
                };
                match (table.resolve(key), value) {
                    (Some(id), Some(value)) => (id, key, Some(value)),
                    _ => {
                        let suggestion = suggest::option(table, key);
                        let arg = format!("--{key}");
                        return Err(Error::UnknownOption { arg, suggestion });
                    }
                }
            }
        };

        let arg = format!("--{key}");
        let flag = table.get(id).kind().is_flag();
        match inline.or(if flag { Some("true") } else { None }) {
            Some(value) => {
                let pos = self.pos();
                let opt = self.scope.table.get_mut(id);
                opt.check_once(&arg)?;
                opt.bind(&arg, value, pos, 0)
            }
            None => self.values(id, &arg, true),
        }
    }

    fn short(&mut self, bundle: &str) -> Result<()> {
        if bundle.len() == 1 {
            self.builtin(bundle)?;
        }
        let pos = self.pos();
        let bytes = bundle.as_bytes();
        let mut k = 0;
        while k < bytes.len() {
            if !bytes[k].is_ascii() {
                return Err(Error::IllegalCharacterSet { arg: format!("-{bundle}") });
            }
            let c = bytes[k] as char;
            let Some(id) = self.scope.table.resolve_short(c) else {
                return Err(self.unknown_short(c, bundle));
            };

            let arg = format!("-{c}");
            let rest = &bundle[k + 1..];
            let opt = self.scope.table.get_mut(id);
            if opt.kind().is_flag() {
                // `-vvv` keeps going, `-d=false` ends the bundle
                let inline = rest.strip_prefix('=');
                opt.check_once(&arg)?;
                opt.bind(&arg, inline.unwrap_or("true"), pos, k)?;
                if inline.is_some() {
                    return Ok(());
                }
                k += 1;
                continue;
            }

            if rest.is_empty() {
                return self.values(id, &arg, true);
            }
            let (value, eq) = match rest.strip_prefix('=') {
                Some(it) => (it, true),
                None => (rest, false),
            };
            opt.check_once(&arg)?;
            opt.bind(&arg, value, pos, k)?;
            if eq || !opt.greedy {
                return Ok(());
            }
            return self.values(id, &arg, false);
        }
        Ok(())
    }

    /// Consumes values from the following tokens. A token that names a
    /// registered option ends the run, anything else (`-3`, `-`) is a value.
    /// Only running out of tokens makes a missing value an error.
    fn values(&mut self, id: OptId, arg: &str, required: bool) -> Result<()> {
        let args = self.args;
        if required && self.i + 1 >= args.len() {
            return Err(Error::MissingValue { arg: arg.to_string() });
        }
        let mut first = required;
        while self.i + 1 < args.len() {
            let value = args[self.i + 1].as_str();
            if value.starts_with('-') && self.scope.table.is_registered_option(value) {
                break;
            }
            self.i += 1;
            let pos = self.pos();
            let opt = self.scope.table.get_mut(id);
            if first {
                opt.check_once(arg)?;
                first = false;
            }
            opt.bind(arg, value, pos, 0)?;
            if !opt.greedy {
                return Ok(());
            }
        }
        Ok(())
    }

    fn unknown_short(&self, c: char, bundle: &str) -> Error {
        let table = &self.scope.table;
        let suggestion = if bundle.len() > 1 && table.resolve(bundle).is_some() {
            Some(format!("--{bundle}"))
        } else {
            suggest::subcommand_hint(table, bundle)
        };
        Error::UnknownOption { arg: format!("-{c}"), suggestion }
    }
}
