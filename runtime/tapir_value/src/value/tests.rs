use super::*;
use crate::Context;
use pretty_assertions::assert_eq;

#[test]
fn test_scalar_equality() {
    assert_eq!(Value::int(3), Value::int(3));
    assert_ne!(Value::int(3), Value::decimal(3.0));
    assert_eq!(Value::decimal(f64::NAN), Value::decimal(f64::NAN));
    assert_eq!(Value::string("a"), Value::from("a"));
    assert_ne!(Value::string("a"), Value::email("a"));
    assert_eq!(Value::Void, Value::default());
}

#[test]
fn test_reference_equality_respects_flavour() {
    let symbols = SymbolTable::new();
    let x = symbols.intern("x");
    assert_eq!(Value::Word(x), Value::Word(x));
    assert_ne!(Value::Word(x), Value::SetWord(x));
    assert_eq!(Value::Word(x).reference_symbol(), Some(x));
    assert_eq!(Value::path(&[x, x]), Value::path(&[x, x]));
}

#[test]
fn test_block_equality_is_structural() {
    let a = Value::data_block(vec![Value::int(1), Value::string("b")]);
    let b = Value::data_block(vec![Value::int(1), Value::string("b")]);
    let c = Value::exec_block(vec![Value::int(1), Value::string("b")]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_contexts_compare_by_identity() {
    let a = Context::root();
    assert_eq!(Value::Context(a.clone()), Value::Context(a));
    assert_ne!(Value::Context(Context::root()), Value::Context(Context::root()));
}

#[test]
fn test_type_names_and_predicates() {
    let symbols = SymbolTable::new();
    assert_eq!(Value::int(1).type_name(), "integer");
    assert_eq!(Value::collect_block(vec![]).type_name(), "block");
    assert_eq!(Value::Comma.type_name(), "comma");
    assert!(Value::int(1).is_literal());
    assert!(!Value::Word(symbols.intern("x")).is_literal());
    assert!(Value::Void.is_void());
    assert!(Value::error_msg(ErrorKind::Custom, "boom").is_error());
    assert_eq!(Value::int(4).as_int(), Some(4));
    assert_eq!(Value::string("s").as_str(), Some("s"));
}

#[test]
fn test_kind_names_of_builtin_and_handle() {
    let symbols = SymbolTable::new();
    let kinds = KindNames::new(&symbols);
    let widget = symbols.intern("widget");
    assert_eq!(kinds.of(&Value::int(1)), kinds.integer);
    assert_eq!(kinds.of(&Value::data_block(vec![])), kinds.block);
    assert_eq!(kinds.of(&Value::handle(widget, ())), widget);
    assert_eq!(
        kinds.of(&Value::Context(Context::root().child_with_kind(widget))),
        widget
    );
    assert_eq!(kinds.of(&Value::Context(Context::root())), kinds.context);
}

#[test]
fn test_uri_kind_follows_scheme() {
    let symbols = SymbolTable::new();
    let kinds = KindNames::new(&symbols);
    let uri = Value::uri(&symbols, "file", "data.txt");
    assert_eq!(symbols.lookup(kinds.of(&uri)), "file-schema");
    assert_eq!(uri.display(&symbols).to_string(), "file://data.txt");
}

#[test]
fn test_display_forms() {
    let symbols = SymbolTable::new();
    let x = symbols.intern("x");
    let block = Value::data_block(vec![
        Value::int(1),
        Value::Word(x),
        Value::SetWord(x),
        Value::OpWord(x),
        Value::PipeWord(x),
        Value::string("s"),
    ]);
    assert_eq!(block.display(&symbols).to_string(), "{ 1 x x: .x |x s }");
    assert_eq!(Value::exec_block(vec![]).display(&symbols).to_string(), "()");
    assert_eq!(
        Value::collect_block(vec![Value::int(2)])
            .display(&symbols)
            .to_string(),
        "[ 2 ]"
    );
}

#[test]
fn test_inspect_form() {
    let symbols = SymbolTable::new();
    assert_eq!(Value::int(5).inspect(&symbols).to_string(), "[integer: 5]");
    let widget = symbols.intern("widget");
    assert_eq!(
        Value::handle(widget, 0u8).inspect(&symbols).to_string(),
        "[widget: handle of widget]"
    );
}

#[test]
fn test_error_display_includes_status() {
    let symbols = SymbolTable::new();
    let err = Value::error(ErrorValue::new(ErrorKind::Custom, "boom").with_status(500));
    assert_eq!(err.display(&symbols).to_string(), "error: boom (500)");
    let plain = Value::error_msg(ErrorKind::Failure, "refused");
    assert_eq!(plain.display(&symbols).to_string(), "failure: refused");
}
