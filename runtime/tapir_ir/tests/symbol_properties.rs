//! Property tests for the symbol table bijection.

use proptest::prelude::*;
use tapir_ir::SymbolTable;

proptest! {
    #[test]
    fn intern_then_lookup_round_trips(names in prop::collection::vec("[a-z?!-]{0,12}", 1..40)) {
        let symbols = SymbolTable::new();
        for name in &names {
            let sym = symbols.intern(name);
            prop_assert_eq!(symbols.lookup(sym), name.as_str());
        }
    }

    #[test]
    fn distinct_names_get_distinct_symbols(a in "[a-z]{1,10}", b in "[a-z]{1,10}") {
        let symbols = SymbolTable::new();
        let sa = symbols.intern(&a);
        let sb = symbols.intern(&b);
        prop_assert_eq!(sa == sb, a == b);
    }
}
