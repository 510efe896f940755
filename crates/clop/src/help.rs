//! Plain-text usage for `-h`/`--help`.

use std::fmt::Write;

use crate::{rt::Scope, table::Opt};

struct Row {
    name: String,
    usage: String,
}

fn row(opt: &Opt<'_>, name: String) -> Row {
    let mut usage = opt.usage.clone();
    if let Some(env) = &opt.env {
        push_note(&mut usage, &format!("[env: {env}]"));
    }
    if let Some(default) = &opt.default {
        push_note(&mut usage, &format!("[default: {default}]"));
    }
    Row { name, usage }
}

fn push_note(usage: &mut String, note: &str) {
    if !usage.is_empty() {
        usage.push(' ');
    }
    usage.push_str(note);
}

pub(crate) fn render(scope: &Scope<'_>, path: &str) -> String {
    let mut flags = Vec::new();
    let mut options = Vec::new();
    let mut args = Vec::new();
    for opt in &scope.table.opts {
        if opt.shorts.is_empty() && opt.longs.is_empty() {
            let name = match &opt.args {
                Some(it) => format!("<{it}>"),
                None => opt.display(),
            };
            args.push(row(opt, name));
        } else if opt.kind().is_flag() {
            flags.push(row(opt, opt.display()));
        } else {
            options.push(row(opt, opt.display()));
        }
    }
    flags.sort_by(|a, b| a.name.cmp(&b.name));
    options.sort_by(|a, b| a.name.cmp(&b.name));
    let subcommands = scope
        .table
        .subcommands
        .iter()
        .map(|(name, it)| Row { name: name.clone(), usage: it.usage.clone() })
        .collect::<Vec<_>>();

    let width = [&flags, &options, &args, &subcommands]
        .iter()
        .flat_map(|rows| rows.iter())
        .map(|it| it.name.len())
        .max()
        .unwrap_or(0);

    let mut buf = String::new();
    if let Some(version) = &scope.version {
        writeln!(buf, "{version}").ok();
    }
    if let Some(about) = &scope.about {
        writeln!(buf, "{about}").ok();
    }
    if !scope.usage.is_empty() {
        writeln!(buf, "{}", scope.usage).ok();
    }
    if !buf.is_empty() {
        buf.push('\n');
    }

    let mut usage = vec![if path.is_empty() { "<command>" } else { path }.to_string()];
    if !flags.is_empty() {
        usage.push("[Flags]".to_string());
    }
    if !options.is_empty() {
        usage.push("[Options]".to_string());
    }
    usage.extend(args.iter().map(|it| it.name.clone()));
    if !subcommands.is_empty() {
        usage.push("<Subcommand>".to_string());
    }
    writeln!(buf, "Usage:\n    {}", usage.join(" ")).ok();

    for (title, rows) in
        [("Flags", &flags), ("Options", &options), ("Args", &args), ("Subcommand", &subcommands)]
    {
        if rows.is_empty() {
            continue;
        }
        writeln!(buf, "\n{title}:").ok();
        for it in rows.iter() {
            let line = format!("    {:width$}    {}", it.name, it.usage);
            writeln!(buf, "{}", line.trim_end()).ok();
        }
    }
    buf.trim_end().to_string()
}
