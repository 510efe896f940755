//! "Did you mean ...?" hints.

use strsim::normalized_levenshtein;

use crate::table::OptionTable;

/// Minimum similarity for a hint to be worth printing.
const THRESHOLD: f64 = 0.6;

fn best_match<'n>(input: &str, candidates: impl Iterator<Item = &'n str>) -> Option<&'n str> {
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let score = normalized_levenshtein(input, candidate);
        if score < THRESHOLD {
            continue;
        }
        match best {
            Some((_, best_score)) if best_score >= score => (),
            _ => best = Some((candidate, score)),
        }
    }
    best.map(|(it, _)| it)
}

/// Closest registered option for an unknown `name` (dashes stripped),
/// falling back to a subcommand hint.
pub(crate) fn option(table: &OptionTable<'_>, name: &str) -> Option<String> {
    let mut names = table.names().collect::<Vec<_>>();
    names.sort();
    let bare = names.iter().map(|it| it.trim_start_matches('-'));
    if let Some(found) = best_match(name, bare) {
        let dashes = if found.len() == 1 { "-" } else { "--" };
        return Some(format!("{dashes}{found}"));
    }
    subcommand_hint(table, name)
}

/// `git ad` → `add`.
pub(crate) fn subcommand(table: &OptionTable<'_>, name: &str) -> Option<String> {
    best_match(name, table.subcommands.keys().map(String::as_str)).map(str::to_string)
}

/// Someone typed `--add` where `add` is a subcommand.
pub(crate) fn subcommand_hint(table: &OptionTable<'_>, name: &str) -> Option<String> {
    table.subcommands.contains_key(name).then(|| format!("'{name}' subcommand"))
}
