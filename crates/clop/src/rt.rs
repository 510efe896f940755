//! Registration and the bind pass.
//!
//! A [`Parser`] is an arena of scopes: the root, plus one child per declared
//! subcommand. Callers (normally the `Clop` derive) register fields into it,
//! then [`Parser::run`] consumes it, so every borrowed field is released
//! before the [`Outcome`] is handed back.

use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    fallback::{self, Env},
    matcher::{Matcher, Scan},
    outcome::Outcome,
    slot::IntoSlot,
    table::{Opt, OptionTable, Subcommand},
    tag::{self, Meta, Parsed},
};

/// Index of a scope inside a [`Parser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

#[derive(Debug, Default)]
pub(crate) struct Scope<'a> {
    /// Subcommand name, empty for the root.
    pub(crate) name: String,
    /// Declaring field of a subcommand.
    pub(crate) field: String,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) usage: String,
    pub(crate) version: Option<String>,
    pub(crate) about: Option<String>,
    pub(crate) table: OptionTable<'a>,
}

#[derive(Debug)]
pub struct Parser<'a> {
    pub(crate) scopes: Vec<Scope<'a>>,
    proc_name: String,
    env: Env,
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Parser::new()
    }
}

/// Subcommand bookkeeping shared by every scope of one pass.
#[derive(Debug, Default)]
pub(crate) struct Invocations {
    pub(crate) names: Vec<String>,
    pub(crate) scopes: Vec<ScopeId>,
    pub(crate) active: Option<String>,
}

impl<'a> Parser<'a> {
    pub fn new() -> Parser<'a> {
        Parser { scopes: vec![Scope::default()], proc_name: String::new(), env: Env::default() }
    }

    pub fn set_proc_name(&mut self, name: impl Into<String>) {
        self.proc_name = name.into();
    }

    pub fn set_version(&mut self, scope: ScopeId, version: impl Into<String>) {
        self.scope_mut(scope).version = Some(version.into());
    }

    pub fn set_about(&mut self, scope: ScopeId, about: impl Into<String>) {
        self.scope_mut(scope).about = Some(about.into());
    }

    pub(crate) fn set_env(&mut self, env: Env) {
        self.env = env;
    }

    /// Registers one field.
    ///
    /// `tag` uses the `#[clop("...")]` grammar. A `version=`/`about=` tag
    /// only records scope metadata and ignores `slot`. `default` is coerced
    /// into the slot right away.
    pub fn option(
        &mut self,
        scope: ScopeId,
        field: &str,
        tag: &str,
        slot: impl IntoSlot<'a>,
        usage: &str,
        default: Option<&str>,
    ) -> Result<()> {
        let spec = match tag::parse(field, tag)? {
            Parsed::Option(it) => it,
            Parsed::Meta(Meta::Version(it)) => {
                self.set_version(scope, it);
                return Ok(());
            }
            Parsed::Meta(Meta::About(it)) => {
                self.set_about(scope, it);
                return Ok(());
            }
        };

        let mut opt = Opt::new(field, spec, slot.into_slot(), usage);
        if let Some(default) = default.map(str::trim).filter(|it| !it.is_empty()) {
            opt.slot
                .set_default(default)
                .map_err(|reason| Error::invalid_value(&opt.display(), default, reason))?;
            opt.has_default = true;
            opt.default = Some(default.to_string());
        }
        debug!(scope = scope.0, field, tag, "register option");
        self.scope_mut(scope).table.insert(opt)?;
        Ok(())
    }

    /// Registers a subcommand declared by `field` and returns its scope.
    pub fn subcommand(
        &mut self,
        scope: ScopeId,
        field: &str,
        tag: &str,
        usage: &str,
    ) -> Result<ScopeId> {
        let name = tag::subcommand_name(field, tag)?
            .unwrap_or_else(|| field.to_ascii_lowercase());
        if self.scope(scope).table.subcommands.contains_key(&name) {
            return Err(Error::DuplicateOptions { existing: name.clone(), name });
        }

        let id = ScopeId(self.scopes.len());
        debug!(parent = scope.0, child = id.0, name = name.as_str(), "register subcommand");
        let entry = Subcommand { scope: id, usage: usage.to_string() };
        self.scope_mut(scope).table.subcommands.insert(name.clone(), entry);
        self.scopes.push(Scope {
            name,
            field: field.to_string(),
            parent: Some(scope),
            usage: usage.to_string(),
            ..Scope::default()
        });
        Ok(id)
    }

    /// Binds `args` (without the program name) and reports what happened.
    pub fn run(mut self, args: &[String]) -> Result<Outcome> {
        let mut invocations = Invocations::default();
        self.bind_scope(ScopeId::ROOT, args, 0, &mut invocations)?;
        Ok(Outcome::collect(&mut self.scopes, invocations))
    }

    fn bind_scope(
        &mut self,
        id: ScopeId,
        args: &[String],
        offset: usize,
        invocations: &mut Invocations,
    ) -> Result<()> {
        let path = self.path(id);
        trace!(scope = id.0, path = path.as_str(), ?args, "bind scope");
        let Scan { unparsed, handoff } =
            Matcher::new(&mut self.scopes[id.0], &path, args, offset).scan()?;

        if let Some((child, start)) = handoff {
            let scope = self.scope(child);
            debug!(name = scope.name.as_str(), rest = args.len() - start, "enter subcommand");
            invocations.names.push(scope.name.clone());
            invocations.scopes.push(child);
            if id == ScopeId::ROOT {
                invocations.active = Some(scope.field.clone());
            }
            self.bind_scope(child, &args[start..], offset + start, invocations)?;
        }

        fallback::bind(&mut self.scopes[id.0].table, unparsed, &self.env)
    }

    /// `cat`, or `git add` for a subcommand scope.
    fn path(&self, mut id: ScopeId) -> String {
        let mut names = Vec::new();
        loop {
            let scope = self.scope(id);
            match scope.parent {
                Some(parent) => {
                    names.push(scope.name.as_str());
                    id = parent;
                }
                None => break,
            }
        }
        if !self.proc_name.is_empty() {
            names.push(&self.proc_name);
        }
        names.reverse();
        names.join(" ")
    }

    pub(crate) fn scope(&self, id: ScopeId) -> &Scope<'a> {
        &self.scopes[id.0]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope<'a> {
        &mut self.scopes[id.0]
    }
}
