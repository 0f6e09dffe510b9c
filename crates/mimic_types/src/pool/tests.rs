use super::*;

use pretty_assertions::assert_eq;

#[test]
fn builtins_at_fixed_indices() {
    let pool = Pool::new();

    assert!(matches!(pool.get(Idx::INT), Some(TypeData::Int)));
    assert!(matches!(pool.get(Idx::FLOAT), Some(TypeData::Float)));
    assert!(matches!(pool.get(Idx::BOOL), Some(TypeData::Bool)));
    assert!(matches!(pool.get(Idx::CHAR), Some(TypeData::Char)));
    assert!(matches!(pool.get(Idx::BYTE), Some(TypeData::Byte)));
    assert!(matches!(pool.get(Idx::UNIT), Some(TypeData::Unit)));
    assert!(matches!(pool.get(Idx::STR), Some(TypeData::Str)));
    assert!(matches!(pool.get(Idx::TYPE), Some(TypeData::Type)));
    assert!(matches!(pool.get(Idx::OBJECT), Some(TypeData::Object)));
    assert_eq!(pool.len(), Idx::BUILTIN_COUNT as usize);
}

#[test]
fn unknown_index_is_an_error() {
    let pool = Pool::new();
    let bogus = Idx::from_raw(500);

    assert!(!pool.contains(bogus));
    assert_eq!(pool.try_get(bogus).unwrap_err(), TypeError::UnknownType(bogus));
    assert_eq!(
        pool.define_record("Bad", &[("x", bogus)]).unwrap_err(),
        TypeError::UnknownType(bogus)
    );
}

#[test]
fn records_are_nominal() {
    let pool = Pool::new();
    let a = pool.define_record("Point", &[("x", Idx::INT)]).unwrap();
    let b = pool.define_record("Point", &[("x", Idx::INT)]).unwrap();

    assert_ne!(a, b);
    assert_eq!(pool.name(a), "Point");
}

#[test]
fn arrays_are_interned() {
    let pool = Pool::new();
    let a = pool.array(Idx::INT, 1).unwrap();
    let b = pool.array(Idx::INT, 1).unwrap();
    let c = pool.array(Idx::INT, 2).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(pool.name(a), "int[]");
    assert_eq!(pool.name(c), "int[,]");
    assert_eq!(pool.array(Idx::INT, 0).unwrap_err(), TypeError::ZeroRank);
}

#[test]
fn class_chain_is_base_first() {
    let pool = Pool::new();
    let animal = pool
        .define_class(ClassBuilder::new("Animal").field("name", Idx::STR))
        .unwrap();
    let dog = pool
        .define_class(ClassBuilder::new("Dog").extends(animal).field("age", Idx::INT))
        .unwrap();

    let chain: Vec<Idx> = pool.class_chain(dog).unwrap().iter().map(|(idx, _)| *idx).collect();
    assert_eq!(chain, vec![animal, dog]);
    assert!(pool.class_chain(Idx::OBJECT).unwrap().is_empty());

    let names: Vec<String> = pool
        .slot_layout(dog)
        .unwrap()
        .iter()
        .map(|field| field.name.to_string())
        .collect();
    assert_eq!(names, vec!["name".to_owned(), "age".to_owned()]);
}

#[test]
fn subclass_field_shadows_base() {
    let pool = Pool::new();
    let base = pool
        .define_class(ClassBuilder::new("Base").field("id", Idx::INT))
        .unwrap();
    let derived = pool
        .define_class(ClassBuilder::new("Derived").extends(base).field("id", Idx::STR))
        .unwrap();

    assert_eq!(pool.field_index(base, "id"), Some(0));
    assert_eq!(pool.field_index(derived, "id"), Some(1));
    assert_eq!(pool.field_index(derived, "missing"), None);
}

#[test]
fn self_referential_class() {
    let pool = Pool::new();
    let node = pool.declare_class("Node");
    pool.complete_class(
        node,
        ClassBuilder::new("Node")
            .field("value", Idx::INT)
            .field("next", node),
    )
    .unwrap();

    let layout = pool.slot_layout(node).unwrap();
    assert_eq!(layout[1].ty, node);
    assert_eq!(
        pool.complete_class(node, ClassBuilder::new("Node")).unwrap_err(),
        TypeError::NotForward("Node".to_owned())
    );
}

#[test]
fn forward_class_has_no_layout() {
    let pool = Pool::new();
    let pending = pool.declare_class("Pending");

    assert!(matches!(
        pool.slot_layout(pending),
        Err(TypeError::KindMismatch { expected: "completed class", .. })
    ));
    assert!(matches!(
        pool.define_class(ClassBuilder::new("Child").extends(pending)),
        Err(TypeError::IncompleteBase { .. })
    ));
}

#[test]
fn record_is_not_a_base() {
    let pool = Pool::new();
    let rec = pool.define_record("Pair", &[("a", Idx::INT)]).unwrap();

    assert_eq!(
        pool.define_class(ClassBuilder::new("Bad").extends(rec)).unwrap_err(),
        TypeError::InvalidBase {
            name: "Bad".to_owned(),
            base: "Pair".to_owned(),
        }
    );
}

#[test]
fn immutability_is_inherited() {
    let pool = Pool::new();
    let frozen = pool
        .define_class(ClassBuilder::new("Frozen").immutable())
        .unwrap();
    let child = pool
        .define_class(ClassBuilder::new("Child").extends(frozen))
        .unwrap();
    let plain = pool.define_class(ClassBuilder::new("Plain")).unwrap();

    assert!(pool.flags(frozen).is_immutable());
    assert!(pool.flags(child).is_immutable());
    assert!(!pool.flags(plain).is_immutable());
    assert!(pool.flags(Idx::INT).is_empty());
}

#[test]
fn subclass_relation() {
    let pool = Pool::new();
    let base = pool.define_class(ClassBuilder::new("Base")).unwrap();
    let derived = pool
        .define_class(ClassBuilder::new("Derived").extends(base))
        .unwrap();

    assert!(pool.is_subclass(derived, base));
    assert!(pool.is_subclass(derived, derived));
    assert!(pool.is_subclass(derived, Idx::OBJECT));
    assert!(!pool.is_subclass(base, derived));
    assert!(!pool.is_subclass(Idx::INT, Idx::OBJECT));
}
