//! Environment variables and positional arguments, applied after the token
//! pass to whatever the command line left unset.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace};

use crate::{error::Result, table::OptionTable};

/// Where `env` bindings read from.
#[derive(Debug, Clone, Default)]
pub(crate) enum Env {
    #[default]
    Process,
    Fixed(HashMap<String, String>),
}

impl Env {
    pub(crate) fn get(&self, key: &str) -> Option<String> {
        match self {
            Env::Process => std::env::var(key).ok(),
            Env::Fixed(vars) => vars.get(key).cloned(),
        }
    }
}

pub(crate) fn bind(table: &mut OptionTable<'_>, unparsed: Vec<(usize, String)>, env: &Env) -> Result<()> {
    let mut queue = VecDeque::from(unparsed);
    for id in table.fallback.clone() {
        let opt = table.get_mut(id);

        if let Some(name) = opt.env.clone() {
            if let Some(value) = env.get(&name) {
                if !opt.bound {
                    let value =
                        if opt.kind().is_flag() && value != "false" { "true" } else { value.as_str() };
                    trace!(env = name.as_str(), value, "bind from environment");
                    opt.bind(&format!("${name}"), value, 0, 0)?;
                }
                continue;
            }
        }

        let Some(name) = opt.args.clone() else { continue };
        let arg = format!("<{name}>");
        let take = if opt.kind().is_slice() { queue.len() } else { queue.len().min(1) };
        for (pos, value) in queue.drain(..take) {
            trace!(args = name.as_str(), pos, value = value.as_str(), "bind positional");
            opt.bind(&arg, &value, pos, 0)?;
        }
    }

    if !queue.is_empty() {
        debug!(leftover = ?queue, "ignoring unparsed arguments");
    }
    Ok(())
}
