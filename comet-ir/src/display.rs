//! Stable textual rendering of programs.
//!
//! The listing is used for snapshot tests and CLI previews, so it must only
//! depend on the program's contents and ordering.

use std::fmt::{self, Display, Formatter};

use crate::{Attribute, Intrinsic, MarkerDecl, Method, Program, Stmt, TypeDecl};

const INDENT: &str = "    ";

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "assembly {}", self.name)?;
        for marker in &self.markers {
            writeln!(f, "{marker}")?;
        }
        for decl in self.types.iter() {
            writeln!(f)?;
            write!(f, "{decl}")?;
        }
        Ok(())
    }
}

impl Display for MarkerDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.args.is_null() {
            write!(f, "[assembly: {}]", self.kind)
        } else {
            write!(f, "[assembly: {}({})]", self.kind, self.args)
        }
    }
}

impl Display for TypeDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.id)?;
        if let Some(base) = &self.base {
            write!(f, " : {base}")?;
        }
        if self.methods.is_empty() {
            return writeln!(f, ";");
        }
        writeln!(f, " {{")?;
        for (i, method) in self.methods.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write_method(f, method)?;
        }
        writeln!(f, "}}")
    }
}

fn write_method(f: &mut Formatter<'_>, method: &Method) -> fmt::Result {
    for tag in &method.tags {
        writeln!(f, "{INDENT}// @{tag}")?;
    }
    for attr in &method.attributes {
        writeln!(f, "{INDENT}{attr}")?;
    }
    writeln!(f, "{INDENT}void {}() {{", method.name)?;
    for stmt in &method.body {
        writeln!(f, "{INDENT}{INDENT}{stmt}")?;
    }
    writeln!(f, "{INDENT}}}")
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "[{}]", self.ty)
        } else {
            write!(f, "[{}({})]", self.ty, self.args.join(", "))
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expr(expr) => write!(f, "{expr};"),
            Stmt::Return(None) => write!(f, "return;"),
            Stmt::Return(Some(value)) => write!(f, "return {value};"),
            Stmt::Intrinsic(intrinsic) => write!(f, "{intrinsic};"),
        }
    }
}

impl Display for Intrinsic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Intrinsic::DebuggerBreak => write!(f, "System.Diagnostics.Debugger.Break()"),
        }
    }
}
