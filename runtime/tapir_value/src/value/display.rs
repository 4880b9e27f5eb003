//! Rendering values through a symbol table.
//!
//! Two forms: the print form (`1`, `hello`, `{ 1 x }`) and the inspect form
//! (`[integer: 1]`, `[string: hello]`) used for diagnostics.

use std::fmt;

use tapir_ir::StringLookup;

use super::{BlockMode, Value};

/// Display adapter returned by [`Value::display`] and [`Value::inspect`].
pub struct ValueDisplay<'a, L: StringLookup + ?Sized> {
    value: &'a Value,
    symbols: &'a L,
    inspect: bool,
}

impl Value {
    /// Print form of the value.
    pub fn display<'a, L: StringLookup + ?Sized>(&'a self, symbols: &'a L) -> ValueDisplay<'a, L> {
        ValueDisplay {
            value: self,
            symbols,
            inspect: false,
        }
    }

    /// Inspect form of the value, tagged with its kind.
    pub fn inspect<'a, L: StringLookup + ?Sized>(&'a self, symbols: &'a L) -> ValueDisplay<'a, L> {
        ValueDisplay {
            value: self,
            symbols,
            inspect: true,
        }
    }
}

impl<L: StringLookup + ?Sized> ValueDisplay<'_, L> {
    fn write_block(&self, f: &mut fmt::Formatter<'_>, mode: BlockMode, cells: &[Value]) -> fmt::Result {
        let (open, close) = match mode {
            BlockMode::Data => ("{", "}"),
            BlockMode::Collect => ("[", "]"),
            BlockMode::Exec => ("(", ")"),
        };
        f.write_str(open)?;
        for cell in cells {
            write!(f, " {}", cell.display(self.symbols))?;
        }
        if !cells.is_empty() {
            f.write_str(" ")?;
        }
        f.write_str(close)
    }

    fn write_plain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = |s| self.symbols.lookup(s);
        match self.value {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Str(s) | Value::Email(s) => f.write_str(s),
            Value::Void => f.write_str("_"),
            Value::Uri(uri) => write!(f, "{}://{}", sym(uri.scheme()), uri.path()),
            Value::Block(block) => self.write_block(f, block.mode(), &block.snapshot()),
            Value::Word(s) => f.write_str(sym(*s)),
            Value::SetWord(s) => write!(f, "{}:", sym(*s)),
            Value::ModWord(s) => write!(f, "::{}", sym(*s)),
            Value::GetWord(s) => write!(f, "?{}", sym(*s)),
            Value::OpWord(s) => write!(f, ".{}", sym(*s)),
            Value::PipeWord(s) => write!(f, "|{}", sym(*s)),
            Value::GenWord(s) => write!(f, "~{}", sym(*s)),
            Value::TagWord(s) => write!(f, "'{}", sym(*s)),
            Value::Path(segments) => {
                for (i, s) in segments.iter().enumerate() {
                    if i > 0 {
                        f.write_str("/")?;
                    }
                    f.write_str(sym(*s))?;
                }
                Ok(())
            }
            Value::Comma => f.write_str(","),
            Value::Native(op) => write!(f, "native {}/{}", op.name(), op.arity()),
            Value::Function(func) => write!(f, "function/{}", func.arity()),
            Value::Curried(c) => write!(f, "curried/{}", c.remaining()),
            Value::Handle(h) => write!(f, "handle of {}", sym(h.kind())),
            Value::Context(ctx) => write!(f, "context of {} bindings", ctx.len()),
            Value::Error(e) => write!(f, "{}", &**e),
        }
    }
}

impl<L: StringLookup + ?Sized> fmt::Display for ValueDisplay<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.inspect {
            return self.write_plain(f);
        }
        let tag = match self.value {
            Value::Handle(h) => self.symbols.lookup(h.kind()),
            other => other.type_name(),
        };
        write!(f, "[{tag}: ")?;
        self.write_plain(f)?;
        f.write_str("]")
    }
}
