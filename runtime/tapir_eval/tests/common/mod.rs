//! Shared test utilities for evaluator tests.
//!
//! - `read` - a whitespace-separated tape reader, so tests can write
//!   `"1 .add 2 |mul 3"` instead of building cells by hand
//! - `NATIVES` - a small native library (arithmetic, callbacks, a `widget`
//!   handle kind) registered by `runtime()`

use tapir_eval::{
    fill_args, Args, Block, BlockMode, ControlFlags, ErrorKind, ErrorValue, Executor, FunctionValue, Interpreter,
    InterpreterBuilder, NativeEntry, SharedSymbols, SymbolTable, Value,
};

/// Read `src` as an exec block.
///
/// Tokens are separated by whitespace; brackets must stand alone.
/// `{ }` is a data block, `[ ]` a collect block, `( )` an exec block.
pub fn read(symbols: &SymbolTable, src: &str) -> Block {
    let mut tokens = src.split_whitespace();
    let cells = read_cells(symbols, &mut tokens, None);
    Block::new(BlockMode::Exec, cells)
}

fn read_cells<'a>(
    symbols: &SymbolTable,
    tokens: &mut impl Iterator<Item = &'a str>,
    close: Option<&str>,
) -> Vec<Value> {
    let mut cells = Vec::new();
    while let Some(token) = tokens.next() {
        if Some(token) == close {
            return cells;
        }
        let cell = match token {
            "{" => Value::block(BlockMode::Data, read_cells(symbols, tokens, Some("}"))),
            "[" => Value::block(BlockMode::Collect, read_cells(symbols, tokens, Some("]"))),
            "(" => Value::block(BlockMode::Exec, read_cells(symbols, tokens, Some(")"))),
            _ => read_token(symbols, token),
        };
        cells.push(cell);
    }
    assert!(close.is_none(), "unclosed block, expected {close:?}");
    cells
}

fn read_token(symbols: &SymbolTable, token: &str) -> Value {
    if let Ok(n) = token.parse::<i64>() {
        return Value::int(n);
    }
    if token.starts_with(|c: char| c.is_ascii_digit()) {
        if let Ok(d) = token.parse::<f64>() {
            return Value::decimal(d);
        }
    }
    if let Some(text) = token.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        return Value::string(text);
    }
    if let Some((scheme, path)) = token.split_once("://") {
        return Value::uri(symbols, scheme, path);
    }
    match token {
        "," => return Value::Comma,
        "_" => return Value::Void,
        "true" => return Value::boolean(true),
        "false" => return Value::boolean(false),
        _ => {}
    }
    if let Some(name) = token.strip_prefix("::") {
        return Value::ModWord(symbols.intern(name));
    }
    if let Some(name) = token.strip_suffix(':') {
        return Value::SetWord(symbols.intern(name));
    }
    let (prefix, name) = token.split_at(1);
    match prefix {
        "?" => Value::GetWord(symbols.intern(name)),
        "." => Value::OpWord(symbols.intern(name)),
        "|" => Value::PipeWord(symbols.intern(name)),
        "~" => Value::GenWord(symbols.intern(name)),
        "'" => Value::TagWord(symbols.intern(name)),
        _ if token.contains('/') && !token.contains("//") => {
            let segments: Vec<_> = token.split('/').map(|s| symbols.intern(s)).collect();
            Value::path(&segments)
        }
        _ => Value::Word(symbols.intern(token)),
    }
}

// -- Natives --

fn int_args(
    exec: &mut dyn Executor,
    name: &str,
    a: &Value,
    b: &Value,
) -> Result<(i64, i64), Value> {
    match (a, b) {
        (Value::Integer(a), Value::Integer(b)) => Ok((*a, *b)),
        _ => Err(exec.fail(ErrorKind::Argument, &format!("{name} expects two integers"))),
    }
}

fn add(exec: &mut dyn Executor, args: Args) -> Value {
    int_args(exec, "add", &args[0], &args[1]).map_or_else(|e| e, |(a, b)| Value::int(a + b))
}

fn sub(exec: &mut dyn Executor, args: Args) -> Value {
    int_args(exec, "sub", &args[0], &args[1]).map_or_else(|e| e, |(a, b)| Value::int(a - b))
}

fn mul(exec: &mut dyn Executor, args: Args) -> Value {
    int_args(exec, "mul", &args[0], &args[1]).map_or_else(|e| e, |(a, b)| Value::int(a * b))
}

fn inc(exec: &mut dyn Executor, args: Args) -> Value {
    match args[0] {
        Value::Integer(n) => Value::int(n + 1),
        _ => exec.fail(ErrorKind::Argument, "inc expects an integer"),
    }
}

/// Collects its three arguments in order.
fn triple(_: &mut dyn Executor, args: Args) -> Value {
    let [a, b, c, ..] = args;
    Value::data_block(vec![a, b, c])
}

fn refuse(exec: &mut dyn Executor, _: Args) -> Value {
    exec.fail(ErrorKind::Failure, "refused")
}

fn boom(exec: &mut dyn Executor, _: Args) -> Value {
    exec.raise(ErrorValue::new(ErrorKind::Custom, "boom").with_status(500))
}

fn ret(exec: &mut dyn Executor, args: Args) -> Value {
    let [value, ..] = args;
    exec.request_return(value)
}

/// `apply f x` calls `f` with `x` through the fast path.
fn apply(exec: &mut dyn Executor, args: Args) -> Value {
    let [f, x, ..] = args;
    exec.call_value(&f, fill_args([x]))
}

/// `failed? f x` calls `f` with `x` and reports whether that call failed.
fn failed(exec: &mut dyn Executor, args: Args) -> Value {
    let [f, x, ..] = args;
    exec.call_value(&f, fill_args([x]));
    Value::boolean(exec.flags().contains(ControlFlags::FAILURE))
}

/// `do blk` evaluates a block according to its mode.
fn do_block(exec: &mut dyn Executor, args: Args) -> Value {
    match &args[0] {
        Value::Block(block) => exec.eval_block(block),
        _ => exec.fail(ErrorKind::Argument, "do expects a block"),
    }
}

/// `scoped blk` runs a block as code in a fresh child context.
fn scoped(exec: &mut dyn Executor, args: Args) -> Value {
    match &args[0] {
        Value::Block(block) => {
            let ctx = exec.context().child();
            exec.eval_block_in(block, ctx)
        }
        _ => exec.fail(ErrorKind::Argument, "scoped expects a block"),
    }
}

/// `with value blk` runs a block as code starting from `value`.
fn with(exec: &mut dyn Executor, args: Args) -> Value {
    let [value, block, ..] = args;
    match block {
        Value::Block(block) => exec.eval_block_inj(&block, value),
        _ => exec.fail(ErrorKind::Argument, "with expects a block"),
    }
}

/// `fn { params } { body }` builds a function closed over the current
/// context.
fn make_fn(exec: &mut dyn Executor, args: Args) -> Value {
    let (Value::Block(params), Value::Block(body)) = (&args[0], &args[1]) else {
        return exec.fail(ErrorKind::Argument, "fn expects two blocks");
    };
    let params: Option<Vec<_>> = params
        .snapshot()
        .iter()
        .map(|v| match v {
            Value::Word(sym) => Some(*sym),
            _ => None,
        })
        .collect();
    let Some(params) = params else {
        return exec.fail(ErrorKind::Argument, "fn parameters must be words");
    };
    let ctx = exec.context().clone();
    Value::function(FunctionValue::new(&params, body.clone()).with_context(ctx))
}

/// A foreign resource.
#[derive(Debug)]
pub struct Widget {
    pub size: i64,
}

fn new_widget(exec: &mut dyn Executor, args: Args) -> Value {
    match args[0] {
        Value::Integer(size) => {
            let kind = exec.symbols().intern("widget");
            Value::handle(kind, Widget { size })
        }
        _ => exec.fail(ErrorKind::Argument, "new-widget expects a size"),
    }
}

fn widget_size(exec: &mut dyn Executor, args: Args) -> Value {
    match args[0].as_handle().and_then(|h| h.downcast_ref::<Widget>()) {
        Some(widget) => Value::int(widget.size),
        None => exec.fail(ErrorKind::Argument, "not a widget"),
    }
}

fn widget_scale(exec: &mut dyn Executor, args: Args) -> Value {
    let size = args[0].as_handle().and_then(|h| h.downcast_ref::<Widget>()).map(|w| w.size);
    match (size, &args[1]) {
        (Some(size), Value::Integer(by)) => Value::int(size * by),
        _ => exec.fail(ErrorKind::Argument, "scale expects a widget and a factor"),
    }
}

fn integer_double(_: &mut dyn Executor, args: Args) -> Value {
    match args[0] {
        Value::Integer(n) => Value::int(n * 2),
        _ => Value::Void,
    }
}

fn string_length(_: &mut dyn Executor, args: Args) -> Value {
    args[0]
        .as_str()
        .map_or(Value::Void, |s| Value::int(i64::try_from(s.len()).unwrap_or(i64::MAX)))
}

fn https_host(_: &mut dyn Executor, args: Args) -> Value {
    match &args[0] {
        Value::Uri(uri) => Value::string(uri.path().split('/').next().unwrap_or_default()),
        _ => Value::Void,
    }
}

pub const NATIVES: &[NativeEntry] = &[
    NativeEntry::new("add", 2, add).pure(),
    NativeEntry::new("sub", 2, sub).pure(),
    NativeEntry::new("mul", 2, mul).pure(),
    NativeEntry::new("inc", 1, inc).pure(),
    NativeEntry::new("triple", 3, triple).pure(),
    NativeEntry::new("refuse", 1, refuse),
    NativeEntry::new("boom", 0, boom),
    NativeEntry::new("ret", 1, ret),
    NativeEntry::new("apply", 2, apply),
    NativeEntry::new("failed?", 2, failed),
    NativeEntry::new("do", 1, do_block),
    NativeEntry::new("scoped", 1, scoped),
    NativeEntry::new("with", 2, with),
    NativeEntry::new("fn", 2, make_fn).doc("Builds a function from a parameter and a body block."),
    NativeEntry::new("new-widget", 1, new_widget),
    NativeEntry::new("widget//size?", 1, widget_size).pure(),
    NativeEntry::new("widget//scale", 2, widget_scale).pure(),
    NativeEntry::new("integer//double", 1, integer_double).pure(),
    NativeEntry::new("string//length", 1, string_length).pure(),
    NativeEntry::new("https-schema//host", 1, https_host).pure(),
];

/// Register the test natives into the interpreter's context.
pub fn install(interp: &Interpreter) {
    interp
        .context()
        .register(interp.symbols(), NATIVES)
        .unwrap_or_else(|e| panic!("registration failed: {e}"));
}

/// An interpreter with the test natives installed.
pub fn runtime() -> Interpreter {
    runtime_with(Interpreter::builder(SharedSymbols::new()))
}

/// Finish `builder` and install the test natives.
pub fn runtime_with(builder: InterpreterBuilder) -> Interpreter {
    let interp = builder.build();
    install(&interp);
    interp
}

/// Read and evaluate `src` in a fresh runtime.
pub fn eval_src(src: &str) -> (Interpreter, Value) {
    let mut interp = runtime();
    let block = read(interp.symbols(), src);
    let value = interp.eval(&block);
    (interp, value)
}
