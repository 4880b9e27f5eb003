//! Kind symbols used by receiver-qualified dispatch.

use tapir_ir::{Symbol, SymbolTable};

use super::Value;

/// Pre-interned kind names.
///
/// Built once per interpreter so `of()` is a plain match with no hashing.
#[derive(Clone, Copy, Debug)]
pub struct KindNames {
    pub integer: Symbol,
    pub decimal: Symbol,
    pub boolean: Symbol,
    pub string: Symbol,
    pub void: Symbol,
    pub uri: Symbol,
    pub email: Symbol,
    pub block: Symbol,
    pub word: Symbol,
    pub setword: Symbol,
    pub modword: Symbol,
    pub getword: Symbol,
    pub opword: Symbol,
    pub pipeword: Symbol,
    pub genword: Symbol,
    pub tagword: Symbol,
    pub path: Symbol,
    pub comma: Symbol,
    pub native: Symbol,
    pub function: Symbol,
    pub curried: Symbol,
    pub context: Symbol,
    pub error: Symbol,
}

impl KindNames {
    pub fn new(symbols: &SymbolTable) -> Self {
        Self {
            integer: symbols.intern("integer"),
            decimal: symbols.intern("decimal"),
            boolean: symbols.intern("boolean"),
            string: symbols.intern("string"),
            void: symbols.intern("void"),
            uri: symbols.intern("uri"),
            email: symbols.intern("email"),
            block: symbols.intern("block"),
            word: symbols.intern("word"),
            setword: symbols.intern("setword"),
            modword: symbols.intern("modword"),
            getword: symbols.intern("getword"),
            opword: symbols.intern("opword"),
            pipeword: symbols.intern("pipeword"),
            genword: symbols.intern("genword"),
            tagword: symbols.intern("tagword"),
            path: symbols.intern("path"),
            comma: symbols.intern("comma"),
            native: symbols.intern("native"),
            function: symbols.intern("function"),
            curried: symbols.intern("curried"),
            context: symbols.intern("context"),
            error: symbols.intern("error"),
        }
    }

    /// Kind symbol of a value.
    ///
    /// Handles report the kind they were created with; contexts created with
    /// a kind report it, otherwise `context`. URIs report `<scheme>-schema`
    /// so `file://` and `https://` values dispatch to different methods.
    pub fn of(&self, value: &Value) -> Symbol {
        match value {
            Value::Integer(_) => self.integer,
            Value::Decimal(_) => self.decimal,
            Value::Boolean(_) => self.boolean,
            Value::Str(_) => self.string,
            Value::Void => self.void,
            Value::Uri(uri) => uri.kind(),
            Value::Email(_) => self.email,
            Value::Block(_) => self.block,
            Value::Word(_) => self.word,
            Value::SetWord(_) => self.setword,
            Value::ModWord(_) => self.modword,
            Value::GetWord(_) => self.getword,
            Value::OpWord(_) => self.opword,
            Value::PipeWord(_) => self.pipeword,
            Value::GenWord(_) => self.genword,
            Value::TagWord(_) => self.tagword,
            Value::Path(_) => self.path,
            Value::Comma => self.comma,
            Value::Native(_) => self.native,
            Value::Function(_) => self.function,
            Value::Curried(_) => self.curried,
            Value::Handle(handle) => handle.kind(),
            Value::Context(ctx) => ctx.kind().unwrap_or(self.context),
            Value::Error(_) => self.error,
        }
    }
}
