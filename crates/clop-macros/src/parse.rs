use std::{fmt, mem};

#[cfg(not(test))]
use proc_macro::{Delimiter, TokenStream, TokenTree};
#[cfg(test)]
use proc_macro2::{Delimiter, TokenStream, TokenTree};

use crate::ast;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) struct Error {
    msg: String,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

pub(crate) fn clop(ts: TokenStream) -> Result<ast::Clop> {
    let p = &mut Parser::new(ts);
    let struct_attrs = attrs(p)?;
    if struct_attrs.clop.as_ref().is_some_and(|it| it.tag.is_some() || it.default.is_some()) {
        bail!("only `#[clop(sub_main)]` is allowed on the struct")
    }
    let sub_main = struct_attrs.clop.is_some_and(|it| it.sub_main);

    vis(p);
    if p.at_keyword("enum") || p.at_keyword("union") {
        bail!("only structs are supported")
    }
    p.expect_keyword("struct")?;
    let name = p.expect_ident()?;
    if p.at_punct('<') {
        bail!("generic structs are not supported: `{name}`")
    }
    if !p.at_delim(Delimiter::Brace) {
        bail!("`{name}` must have named fields")
    }

    p.enter_delim(Delimiter::Brace)?;
    let mut fields = Vec::new();
    while !p.end() {
        let attrs = attrs(p)?;
        vis(p);
        let ident = p.expect_ident()?;
        p.expect_punct(':')?;
        skip_ty(p);
        p.eat_punct(',');
        if let Some(field) = field(ident, attrs)? {
            fields.push(field);
        }
    }
    p.exit_delim()?;

    Ok(ast::Clop { name, sub_main, fields })
}

#[derive(Default)]
struct Attrs {
    doc: Vec<String>,
    clop: Option<ClopAttr>,
}

#[derive(Default)]
struct ClopAttr {
    tag: Option<String>,
    default: Option<String>,
    sub_main: bool,
}

fn field(ident: String, attrs: Attrs) -> Result<Option<ast::Field>> {
    let Some(clop) = attrs.clop else { return Ok(None) };
    if clop.sub_main {
        bail!("`sub_main` goes on the struct, not on `{ident}`")
    }
    let tag = clop.tag.unwrap_or_else(|| "short;long".to_string());
    let kind = ast::Kind::of(&tag);
    if clop.default.is_some() && matches!(kind, ast::Kind::Subcommand | ast::Kind::Flatten) {
        bail!("`default` needs a value field, `{ident}` is not one")
    }
    let usage = attrs.doc.iter().map(|it| it.trim()).collect::<Vec<_>>().join(" ");
    Ok(Some(ast::Field { ident, tag, usage: usage.trim().to_string(), default: clop.default, kind }))
}

fn attrs(p: &mut Parser) -> Result<Attrs> {
    let mut res = Attrs::default();
    while p.eat_punct('#') {
        p.enter_delim(Delimiter::Bracket)?;
        if p.eat_keyword("doc") {
            p.expect_punct('=')?;
            res.doc.push(p.expect_string()?);
        } else if p.eat_keyword("clop") {
            if res.clop.is_some() {
                bail!("duplicate `#[clop]` attribute")
            }
            let mut clop = ClopAttr::default();
            if p.at_delim(Delimiter::Parenthesis) {
                p.enter_delim(Delimiter::Parenthesis)?;
                clop_args(p, &mut clop)?;
                p.exit_delim()?;
            }
            res.clop = Some(clop);
        } else {
            p.skip_rest();
        }
        p.exit_delim()?;
    }
    Ok(res)
}

/// `"-d; --debug"`, `default = "..."`, `sub_main`, comma separated.
fn clop_args(p: &mut Parser, clop: &mut ClopAttr) -> Result<()> {
    while !p.end() {
        if p.eat_keyword("default") {
            p.expect_punct('=')?;
            clop.default = Some(p.expect_string()?);
        } else if p.eat_keyword("sub_main") {
            clop.sub_main = true;
        } else if let Some(tag) = p.eat_string() {
            if clop.tag.is_some() {
                bail!("only one tag string is allowed, got `{tag}`")
            }
            clop.tag = Some(tag);
        } else {
            let next = p.ts.pop().map(|it| it.to_string()).unwrap_or_default();
            bail!("unexpected `{next}` in `#[clop(...)]`")
        }
        if !p.end() {
            p.expect_punct(',')?;
        }
    }
    Ok(())
}

fn vis(p: &mut Parser) {
    if p.eat_keyword("pub") && p.at_delim(Delimiter::Parenthesis) {
        p.ts.pop();
    }
}

/// Skips a field type, up to the next top-level `,`.
fn skip_ty(p: &mut Parser) {
    let mut depth = 0usize;
    let mut arrow = false;
    while let Some(tt) = p.ts.last() {
        match tt {
            TokenTree::Punct(punct) => {
                match punct.as_char() {
                    ',' if depth == 0 => break,
                    '<' => depth += 1,
                    '>' if !arrow => depth = depth.saturating_sub(1),
                    _ => (),
                }
                arrow = punct.as_char() == '-';
            }
            _ => arrow = false,
        }
        p.ts.pop();
    }
}

struct Parser {
    stack: Vec<Vec<TokenTree>>,
    ts: Vec<TokenTree>,
}

impl Parser {
    fn new(ts: TokenStream) -> Self {
        let mut ts = ts.into_iter().collect::<Vec<_>>();
        ts.reverse();
        Self { stack: Vec::new(), ts }
    }

    fn at_delim(&self, delimiter: Delimiter) -> bool {
        matches!(self.ts.last(), Some(TokenTree::Group(g)) if g.delimiter() == delimiter)
    }
    fn enter_delim(&mut self, delimiter: Delimiter) -> Result<()> {
        match self.ts.pop() {
            Some(TokenTree::Group(g)) if g.delimiter() == delimiter => {
                let mut ts = g.stream().into_iter().collect::<Vec<_>>();
                ts.reverse();
                let ts = mem::replace(&mut self.ts, ts);
                self.stack.push(ts);
            }
            _ => bail!("expected `{}`", open(delimiter)),
        }
        Ok(())
    }
    fn exit_delim(&mut self) -> Result<()> {
        if !self.end() {
            let next = self.ts.last().map(|it| it.to_string()).unwrap_or_default();
            bail!("unexpected `{next}`")
        }
        self.ts = self.stack.pop().unwrap_or_default();
        Ok(())
    }
    fn end(&self) -> bool {
        self.ts.last().is_none()
    }
    fn skip_rest(&mut self) {
        self.ts.clear();
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<()> {
        if !self.eat_keyword(kw) {
            bail!("expected `{kw}`")
        }
        Ok(())
    }
    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_keyword(&self, kw: &str) -> bool {
        match self.ts.last() {
            Some(TokenTree::Ident(ident)) => ident.to_string() == kw,
            _ => false,
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Ident(ident)) => Ok(ident.to_string()),
            Some(tt) => bail!("expected an identifier, got `{tt}`"),
            None => bail!("expected an identifier"),
        }
    }

    fn at_punct(&self, punct: char) -> bool {
        matches!(self.ts.last(), Some(TokenTree::Punct(p)) if p.as_char() == punct)
    }
    fn expect_punct(&mut self, punct: char) -> Result<()> {
        if !self.eat_punct(punct) {
            bail!("expected `{punct}`")
        }
        Ok(())
    }
    fn eat_punct(&mut self, punct: char) -> bool {
        if self.at_punct(punct) {
            self.ts.pop();
            true
        } else {
            false
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        self.eat_string().ok_or_else(|| format_err!("expected a string"))
    }
    fn eat_string(&mut self) -> Option<String> {
        let res = match self.ts.last() {
            Some(TokenTree::Literal(lit)) => str_lit_value(&lit.to_string())?,
            _ => return None,
        };
        self.ts.pop();
        Some(res)
    }
}

fn open(delimiter: Delimiter) -> &'static str {
    match delimiter {
        Delimiter::Parenthesis => "(",
        Delimiter::Brace => "{",
        Delimiter::Bracket => "[",
        Delimiter::None => "group",
    }
}

/// Value of a string literal token, raw or not. `proc_macro` has no API
/// for this, so common escapes are decoded by hand.
fn str_lit_value(lit: &str) -> Option<String> {
    if let Some(raw) = lit.strip_prefix('r') {
        let hashes = raw.len() - raw.trim_start_matches('#').len();
        let body = raw.get(hashes..raw.len().checked_sub(hashes)?)?;
        return Some(body.strip_prefix('"')?.strip_suffix('"')?.to_string());
    }
    let body = lit.strip_prefix('"')?.strip_suffix('"')?;
    Some(unescape(body))
}

fn unescape(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => res.push('\n'),
            Some('t') => res.push('\t'),
            Some('r') => res.push('\r'),
            Some('0') => res.push('\0'),
            Some(c @ ('\\' | '"' | '\'')) => res.push(c),
            Some('u') => {
                let code = chars.by_ref().skip(1).take_while(|&it| it != '}').collect::<String>();
                res.extend(u32::from_str_radix(&code, 16).ok().and_then(char::from_u32));
            }
            Some('\n') => {
                while chars.next_if(|it| it.is_whitespace()).is_some() {}
            }
            Some(other) => {
                res.push('\\');
                res.push(other);
            }
            None => res.push('\\'),
        }
    }
    res
}
