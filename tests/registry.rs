use std::collections::HashSet;

use reckon::{
    error::RegistryError,
    interpreter::evaluator::function::core::BUILTIN_FUNCTIONS,
    options::ParseOptions,
    registry::{Category, SymbolEntry, SymbolRegistry, SymbolValue},
};

#[test]
fn every_function_entry_has_an_implementation() {
    let registry = SymbolRegistry::new();
    let functions: Vec<&SymbolEntry> = registry.entries()
                                               .filter(|e| e.category == Category::Function)
                                               .collect();

    assert_eq!(functions.len(), BUILTIN_FUNCTIONS.len());
    for entry in functions {
        assert!(BUILTIN_FUNCTIONS.contains(&entry.name.as_str()),
                "{} has no builtin rule",
                entry.name);
    }
}

#[test]
fn aliases_are_unique_across_the_registry() {
    let registry = SymbolRegistry::new();
    let mut seen = HashSet::new();
    for entry in registry.entries() {
        assert_eq!(entry.aliases[0], entry.name);
        for alias in &entry.aliases {
            assert!(seen.insert(alias.clone()), "alias {alias} is declared twice");
        }
    }
}

#[test]
fn aliases_resolve_to_their_entry() {
    let registry = SymbolRegistry::new();
    assert_eq!(registry.lookup("choose").unwrap().name, "binomial");
    assert_eq!(registry.lookup("metres").unwrap().name, "m");
    assert_eq!(registry.lookup("φ").unwrap().name, "golden");
    assert!(registry.lookup("Pi").is_none());
}

#[test]
fn case_folding_prefers_an_exact_match() {
    let registry = SymbolRegistry::new();
    let options = ParseOptions { case_sensitive: false,
                                 ..ParseOptions::default() };

    assert_eq!(registry.resolve("l", &options).unwrap().name, "L");
    assert_eq!(registry.resolve("N", &options).unwrap().name, "N");
    assert_eq!(registry.resolve("SQRT", &options).unwrap().name, "sqrt");
    assert!(registry.resolve("SQRT", &ParseOptions::default()).is_none());
}

#[test]
fn unknowns_and_hidden_entries_are_not_listed() {
    let registry = SymbolRegistry::new();
    let listed: Vec<&str> = registry.list_known_visible().map(|e| e.name.as_str()).collect();

    assert!(listed.contains(&"pi"));
    assert!(listed.contains(&"m"));
    assert!(!listed.contains(&"x"));
    assert!(!listed.contains(&"undefined"));
    assert_eq!(registry.lookup("undefined").unwrap().value, SymbolValue::Undefined);
}

#[test]
fn define_rejects_bad_names() {
    let mut registry = SymbolRegistry::new();

    let duplicate = SymbolEntry::expression("rate", &["r", "r"], "1", "");
    assert!(matches!(registry.define(duplicate), Err(RegistryError::NameCollision { .. })));

    let spaced = SymbolEntry::expression("a b", &[], "1", "");
    assert!(matches!(registry.define(spaced), Err(RegistryError::InvalidName { .. })));

    let alias_taken = SymbolEntry::expression("speed", &["c"], "1", "");
    match registry.define(alias_taken) {
        Err(RegistryError::NameCollision { name, existing }) => {
            assert_eq!(name, "c");
            assert_eq!(existing, "c");
        },
        other => panic!("expected a collision, got {other:?}"),
    }

    assert!(registry.lookup("speed").is_none());
}

#[test]
fn batches_are_all_or_nothing() {
    let mut registry = SymbolRegistry::new();
    let before = registry.len();

    let within_batch = r#"[{"name": "a", "value": "1"}, {"name": "a", "value": "2"}]"#;
    assert!(matches!(registry.define_from(within_batch),
                     Err(RegistryError::NameCollision { .. })));
    assert_eq!(registry.len(), before);

    let bad_reference = r#"[{"name": "a", "value": "1"}, {"name": "b", "value": "qq + 1"}]"#;
    match registry.define_from(bad_reference) {
        Err(RegistryError::InvalidValue { name, .. }) => assert_eq!(name, "b"),
        other => panic!("expected an invalid value, got {other:?}"),
    }
    assert_eq!(registry.len(), before);
    assert!(registry.lookup("a").is_none());
}

#[test]
fn later_definitions_may_be_referenced_earlier() {
    let mut registry = SymbolRegistry::new();
    let defined = registry.define_from(r#"[{"name": "total", "value": "2 part"}, {"name": "part", "value": "5"}]"#)
                          .unwrap();
    assert_eq!(defined, 2);

    let user: Vec<&str> = registry.user_entries().map(|e| e.name.as_str()).collect();
    assert_eq!(user, ["total", "part"]);
    assert!(registry.user_entries().all(|e| !e.builtin));
}

#[test]
fn reset_keeps_the_builtins() {
    let mut registry = SymbolRegistry::new();
    let builtins = registry.len();
    registry.define_from(r#"[{"name": "k", "value": "1", "aliases": ["kk"]}]"#)
            .unwrap();
    assert_eq!(registry.len(), builtins + 1);

    registry.reset();
    assert_eq!(registry.len(), builtins);
    assert!(registry.lookup("kk").is_none());
    assert!(registry.lookup("pi").is_some());

    registry.define_from(r#"[{"name": "kk", "value": "2"}]"#).unwrap();
    assert_eq!(registry.lookup("kk").unwrap().name, "kk");
}

#[test]
fn replacing_user_entries_preserves_them_on_failure() {
    let mut registry = SymbolRegistry::new();
    registry.define_from(r#"[{"name": "k", "value": "1"}]"#).unwrap();

    assert!(registry.replace_user_entries(r#"[{"name": "pi", "value": "3"}]"#).is_err());
    assert!(registry.lookup("k").is_some());

    assert_eq!(registry.replace_user_entries(r#"[{"name": "j", "value": "2"}]"#).unwrap(), 1);
    assert!(registry.lookup("k").is_none());
    assert!(registry.lookup("j").is_some());
}

#[test]
fn serialization_keeps_aliases_and_descriptions() {
    let mut registry = SymbolRegistry::new();
    registry.define_from(r#"[{"name": "rate", "value": "3/100", "aliases": ["r"], "description": "Interest"}]"#)
            .unwrap();

    assert_eq!(registry.serialize_user(),
               r#"[{"name":"rate","value":"3/100","aliases":["r"],"description":"Interest"}]"#);
    assert_eq!(SymbolRegistry::new().serialize_user(), "[]");
}
