//! Names derived from field identifiers.

/// Acronyms that are used verbatim instead of being split into words.
const SPECIAL_NAMES: &[&str] = &["JSON", "XML", "YAML", "URL", "URI"];

fn word_start(b: u8) -> bool {
    b.is_ascii_uppercase() || b == b'_'
}

/// GNU style long name: `LongOpt` and `long_opt` both become `long-opt`.
pub fn gnu_option_name(ident: &str) -> String {
    if SPECIAL_NAMES.contains(&ident) {
        return ident.to_string();
    }
    let mut name = String::with_capacity(ident.len() + 4);
    for b in ident.bytes() {
        if word_start(b) {
            if !name.is_empty() && !name.ends_with('-') {
                name.push('-');
            }
            if b != b'_' {
                name.push(b.to_ascii_lowercase() as char);
            }
            continue;
        }
        name.push(b as char);
    }
    name
}

/// Environment variable name: `envOpt_all` becomes `ENV_OPT_ALL`.
pub fn env_option_name(ident: &str) -> String {
    if SPECIAL_NAMES.contains(&ident) {
        return ident.to_string();
    }
    let mut name = String::with_capacity(ident.len() + 4);
    for b in ident.bytes() {
        if word_start(b) {
            if !name.is_empty() && !name.ends_with('_') {
                name.push('_');
            }
            if b != b'_' {
                name.push(b as char);
            }
            continue;
        }
        if b.is_ascii_lowercase() || b.is_ascii_digit() {
            name.push(b.to_ascii_uppercase() as char);
        } else if !name.ends_with('_') {
            name.push('_');
        }
    }
    name
}

/// Short name picked by a bare `short` clause.
pub fn short_option_name(ident: &str) -> Option<char> {
    ident.trim_start_matches('_').chars().next().map(|it| it.to_ascii_lowercase())
}

/// Option names are ASCII letters, digits, `-` and `_`. Returns the first
/// offending character.
pub fn check_option_name(name: &str) -> Result<(), char> {
    match name.chars().find(|&c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_')) {
        Some(c) => Err(c),
        None => Ok(()),
    }
}
