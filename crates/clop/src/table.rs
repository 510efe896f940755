//! Per-scope option registry.

use std::collections::{BTreeMap, HashMap};

use crate::{
    error::{Error, Result},
    rt::ScopeId,
    slot::{Kind, Slot},
    tag::Spec,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct OptId(pub(crate) usize);

/// One binding target.
#[derive(Debug)]
pub(crate) struct Opt<'a> {
    pub(crate) field: String,
    pub(crate) slot: Slot<'a>,
    pub(crate) shorts: Vec<char>,
    pub(crate) longs: Vec<String>,
    pub(crate) env: Option<String>,
    pub(crate) args: Option<String>,
    pub(crate) greedy: bool,
    pub(crate) once: bool,
    pub(crate) callback: Option<String>,
    pub(crate) usage: String,
    pub(crate) default: Option<String>,
    pub(crate) has_default: bool,
    /// `(argv position << 31) | bundle position` of the last bind.
    pub(crate) priority: u64,
    /// Set by the first bind of this pass, from any source.
    pub(crate) bound: bool,
}

impl<'a> Opt<'a> {
    pub(crate) fn new(field: &str, spec: Spec, slot: Slot<'a>, usage: &str) -> Opt<'a> {
        let slot = if spec.callback.is_some() { Slot::callback() } else { slot };
        Opt {
            field: field.to_string(),
            slot,
            shorts: spec.shorts,
            longs: spec.longs,
            env: spec.env,
            args: spec.args,
            greedy: spec.greedy,
            once: spec.once,
            callback: spec.callback,
            usage: usage.to_string(),
            default: None,
            has_default: false,
            priority: 0,
            bound: false,
        }
    }

    pub(crate) fn kind(&self) -> Kind {
        self.slot.kind()
    }

    /// `-d, --debug`, or `<files>` / `$NAME` for fallback-only options.
    pub(crate) fn display(&self) -> String {
        let mut names = self
            .shorts
            .iter()
            .map(|it| format!("-{it}"))
            .chain(self.longs.iter().map(|it| format!("--{it}")))
            .collect::<Vec<_>>();
        if names.is_empty() {
            if let Some(args) = &self.args {
                names.push(format!("<{args}>"));
            }
            if let Some(env) = &self.env {
                names.push(format!("${env}"));
            }
        }
        names.join(", ")
    }

    /// A first real bind of an option with a declared default drops the
    /// default, so `-s 3 -s 4` replaces `["one", "two"]` instead of
    /// appending to it.
    fn reset_default_once(&mut self) {
        if self.has_default && !self.bound && !self.slot.is_zero() {
            self.slot.reset();
        }
        self.bound = true;
    }

    pub(crate) fn bind(&mut self, arg: &str, value: &str, pos: usize, bundle: usize) -> Result<()> {
        self.reset_default_once();
        self.priority = ((pos as u64) << 31) | bundle as u64;
        self.slot.set(value).map_err(|reason| Error::invalid_value(arg, value, reason))
    }

    pub(crate) fn check_once(&self, arg: &str) -> Result<()> {
        if self.once && self.bound && !self.slot.is_zero() {
            return Err(Error::OnceViolation { arg: arg.to_string() });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct Subcommand {
    pub(crate) scope: ScopeId,
    pub(crate) usage: String,
}

#[derive(Debug, Default)]
pub(crate) struct OptionTable<'a> {
    pub(crate) opts: Vec<Opt<'a>>,
    short: HashMap<char, OptId>,
    long: HashMap<String, OptId>,
    env: HashMap<String, OptId>,
    args: HashMap<String, OptId>,
    /// Env and positional bound options, in declaration order.
    pub(crate) fallback: Vec<OptId>,
    pub(crate) subcommands: BTreeMap<String, Subcommand>,
}

impl<'a> OptionTable<'a> {
    pub(crate) fn insert(&mut self, opt: Opt<'a>) -> Result<OptId> {
        let id = OptId(self.opts.len());
        for &c in &opt.shorts {
            let mut buf = [0; 4];
            if let Some(existing) = self.resolve(c.encode_utf8(&mut buf)) {
                return Err(self.duplicate(format!("-{c}"), existing));
            }
        }
        for name in &opt.longs {
            if let Some(existing) = self.resolve(name) {
                return Err(self.duplicate(format!("--{name}"), existing));
            }
        }
        if let Some(existing) = opt.env.as_ref().and_then(|it| self.env.get(it)) {
            return Err(self.duplicate(format!("env={}", opt.env.as_deref().unwrap_or("")), *existing));
        }
        if let Some(existing) = opt.args.as_ref().and_then(|it| self.args.get(it)) {
            return Err(self.duplicate(format!("args={}", opt.args.as_deref().unwrap_or("")), *existing));
        }

        // A long name can't be duplicated within one declaration either.
        let mut seen = Vec::new();
        for name in opt.longs.iter().cloned().chain(opt.shorts.iter().map(|it| it.to_string())) {
            if seen.contains(&name) {
                return Err(Error::DuplicateOptions { existing: opt.display(), name });
            }
            seen.push(name);
        }

        self.short.extend(opt.shorts.iter().map(|&it| (it, id)));
        self.long.extend(opt.longs.iter().map(|it| (it.clone(), id)));
        if let Some(env) = &opt.env {
            self.env.insert(env.clone(), id);
        }
        if let Some(args) = &opt.args {
            self.args.insert(args.clone(), id);
        }
        if opt.env.is_some() || opt.args.is_some() {
            self.fallback.push(id);
        }
        self.opts.push(opt);
        Ok(id)
    }

    fn duplicate(&self, name: String, existing: OptId) -> Error {
        Error::DuplicateOptions { name, existing: self.opts[existing.0].display() }
    }

    /// Resolves a name without dashes. Long and short names share one
    /// namespace, so `--a` finds a short-only `-a`.
    pub(crate) fn resolve(&self, name: &str) -> Option<OptId> {
        if let Some(&id) = self.long.get(name) {
            return Some(id);
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.short.get(&c).copied(),
            _ => None,
        }
    }

    pub(crate) fn resolve_short(&self, c: char) -> Option<OptId> {
        self.short.get(&c).copied()
    }

    /// Whether `arg` looks like a registered option: `-x`, `--name` or
    /// `--name=value`. Used to stop value consumption, so an unregistered
    /// `-3` still passes as a value.
    pub(crate) fn is_registered_option(&self, arg: &str) -> bool {
        let Some(rest) = arg.strip_prefix('-') else { return false };
        let rest = rest.strip_prefix('-').unwrap_or(rest);
        let name = rest.split_once('=').map_or(rest, |(name, _)| name);
        !name.is_empty() && self.resolve(name).is_some()
    }

    pub(crate) fn get(&self, id: OptId) -> &Opt<'a> {
        &self.opts[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: OptId) -> &mut Opt<'a> {
        &mut self.opts[id.0]
    }

    /// Every registered name with its dashes, for suggestions.
    pub(crate) fn names(&self) -> impl Iterator<Item = String> + '_ {
        self.long.keys().map(|it| format!("--{it}")).chain(self.short.keys().map(|it| format!("-{it}")))
    }
}
