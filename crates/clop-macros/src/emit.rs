use std::fmt::Write;

use crate::ast::{self, Kind};

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

pub(crate) fn emit(clop: &ast::Clop) -> String {
    let mut buf = String::new();

    w!(buf, "impl clop::Clop for {} {{\n", clop.name);
    emit_register(&mut buf, clop);
    if clop.needs_finish() {
        blank_line(&mut buf);
        emit_finish(&mut buf, clop);
    }
    w!(buf, "}}\n");

    buf
}

fn emit_register(buf: &mut String, clop: &ast::Clop) {
    w!(
        buf,
        "    fn register<'a>(&'a mut self, p: &mut clop::Parser<'a>, scope: clop::ScopeId) -> clop::Result<()> {{\n"
    );
    for field in &clop.fields {
        let (name, tag, usage) = (field.name(), &field.tag, &field.usage);
        let default = match &field.default {
            Some(it) => format!("Some({it:?})"),
            None => "None".to_string(),
        };
        match &field.kind {
            Kind::Value => w!(
                buf,
                "        p.option(scope, {name:?}, {tag:?}, &mut self.{}, {usage:?}, {default})?;\n",
                field.ident
            ),
            Kind::Callback(_) | Kind::Meta => w!(
                buf,
                "        p.option(scope, {name:?}, {tag:?}, clop::Slot::callback(), {usage:?}, {default})?;\n"
            ),
            Kind::Subcommand => {
                w!(buf, "        let child = p.subcommand(scope, {name:?}, {tag:?}, {usage:?})?;\n");
                w!(buf, "        clop::Clop::register(&mut self.{}, p, child)?;\n", field.ident);
            }
            Kind::Flatten => {
                w!(buf, "        clop::Clop::register(&mut self.{}, p, scope)?;\n", field.ident)
            }
        }
    }
    w!(buf, "        Ok(())\n");
    w!(buf, "    }}\n");
}

fn emit_finish(buf: &mut String, clop: &ast::Clop) {
    w!(buf, "    fn finish(&mut self, outcome: &clop::Outcome, scope: clop::ScopeId) {{\n");
    for field in &clop.fields {
        let name = field.name();
        match &field.kind {
            Kind::Callback(method) => {
                w!(buf, "        for value in outcome.callback_values(scope, {name:?}) {{\n");
                w!(buf, "            self.{method}(value);\n");
                w!(buf, "        }}\n");
            }
            Kind::Subcommand => {
                w!(buf, "        if let Some(child) = outcome.invoked(scope, {name:?}) {{\n");
                w!(buf, "            clop::Clop::finish(&mut self.{}, outcome, child);\n", field.ident);
                w!(buf, "        }}\n");
            }
            Kind::Flatten => {
                w!(buf, "        clop::Clop::finish(&mut self.{}, outcome, scope);\n", field.ident)
            }
            Kind::Value | Kind::Meta => (),
        }
    }
    if clop.sub_main {
        w!(buf, "        if outcome.is_invoked(scope) {{\n");
        w!(buf, "            clop::SubMain::sub_main(self);\n");
        w!(buf, "        }}\n");
    }
    w!(buf, "    }}\n");
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}
