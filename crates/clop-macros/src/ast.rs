#[derive(Debug)]
pub(crate) struct Clop {
    pub(crate) name: String,
    pub(crate) sub_main: bool,
    pub(crate) fields: Vec<Field>,
}

impl Clop {
    pub(crate) fn needs_finish(&self) -> bool {
        self.sub_main || self.fields.iter().any(|it| it.kind.needs_finish())
    }
}

#[derive(Debug)]
pub(crate) struct Field {
    /// As written, possibly `r#type`.
    pub(crate) ident: String,
    pub(crate) tag: String,
    pub(crate) usage: String,
    pub(crate) default: Option<String>,
    pub(crate) kind: Kind,
}

impl Field {
    pub(crate) fn name(&self) -> &str {
        self.ident.trim_start_matches("r#")
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    Value,
    /// Raw values go to `self.<method>(&str)`.
    Callback(String),
    /// `version=` / `about=`, the field itself is left alone.
    Meta,
    Subcommand,
    Flatten,
}

impl Kind {
    pub(crate) fn of(tag: &str) -> Kind {
        let clauses = tag.split(';').map(str::trim).filter(|it| !it.is_empty()).collect::<Vec<_>>();
        let mut res = Kind::Value;
        for clause in &clauses {
            let (key, value) = match clause.split_once('=') {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (*clause, None),
            };
            match key {
                "subcommand" => return Kind::Subcommand,
                "flatten" => return Kind::Flatten,
                "callback" => res = Kind::Callback(value.unwrap_or("parse").to_string()),
                "version" | "about" if clauses.len() == 1 => return Kind::Meta,
                _ => (),
            }
        }
        res
    }

    fn needs_finish(&self) -> bool {
        matches!(self, Kind::Callback(_) | Kind::Subcommand | Kind::Flatten)
    }
}
