//! What a bind pass reports back once the caller's fields are released.

use std::collections::HashMap;

use crate::rt::{Invocations, Scope, ScopeId};

#[derive(Debug, Default)]
pub struct Outcome {
    indices: HashMap<(ScopeId, String), u64>,
    callbacks: HashMap<(ScopeId, String), Vec<String>>,
    invoked: Vec<String>,
    invoked_scopes: Vec<ScopeId>,
    children: HashMap<(ScopeId, String), ScopeId>,
    active: Option<String>,
}

impl Outcome {
    pub(crate) fn collect(scopes: &mut [Scope<'_>], invocations: Invocations) -> Outcome {
        let mut res = Outcome {
            invoked: invocations.names,
            active: invocations.active,
            ..Outcome::default()
        };
        for (i, scope) in scopes.iter_mut().enumerate() {
            let id = ScopeId(i);
            for opt in scope.table.opts.iter_mut() {
                let shorts = opt.shorts.iter().map(|it| it.to_string());
                for name in shorts.chain(opt.longs.iter().cloned()) {
                    res.indices.insert((id, name), opt.priority);
                }
                for name in opt.args.iter().cloned() {
                    res.indices.entry((id, name)).or_insert(opt.priority);
                }
                if opt.callback.is_some() {
                    let values = opt.slot.take_callback_values();
                    res.callbacks.insert((id, opt.field.clone()), values);
                }
            }
        }
        for child in invocations.scopes {
            let scope = &scopes[child.0];
            if let Some(parent) = scope.parent {
                res.children.insert((parent, scope.field.clone()), child);
            }
            res.invoked_scopes.push(child);
        }
        res
    }

    /// Whether the subcommand called `name` was invoked, at any depth.
    pub fn is_set_subcommand(&self, name: &str) -> bool {
        self.invoked.iter().any(|it| it == name)
    }

    /// Invoked subcommand names, outermost first.
    pub fn subcommands(&self) -> &[String] {
        &self.invoked
    }

    /// Priority of a root option, looked up by any of its names or by its
    /// positional name. `0` for unknown or unbound options. When a
    /// positional shares a name with an option, the option wins.
    ///
    /// Larger means later on the command line: `-Eb` gives `E` a smaller
    /// index than `b`.
    pub fn index(&self, name: &str) -> u64 {
        self.index_in(ScopeId::ROOT, name)
    }

    pub fn index_in(&self, scope: ScopeId, name: &str) -> u64 {
        let name = name.trim_start_matches('-');
        self.indices.get(&(scope, name.to_string())).copied().unwrap_or(0)
    }

    /// Field of the root struct that holds the invoked subcommand.
    pub fn active_subcommand_field(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Raw values captured for a `callback` field, in command-line order.
    pub fn callback_values(&self, scope: ScopeId, field: &str) -> &[String] {
        self.callbacks.get(&(scope, field.to_string())).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Scope of the subcommand declared by `field`, if it was invoked.
    pub fn invoked(&self, scope: ScopeId, field: &str) -> Option<ScopeId> {
        self.children.get(&(scope, field.to_string())).copied()
    }

    pub fn is_invoked(&self, scope: ScopeId) -> bool {
        self.invoked_scopes.contains(&scope)
    }
}
