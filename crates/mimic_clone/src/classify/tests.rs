use pretty_assertions::assert_eq;

use mimic_types::ClassBuilder;

use super::*;

#[test]
fn builtins() {
    let pool = Pool::new();
    let classifier = Classifier::new(&pool);

    for idx in [Idx::INT, Idx::FLOAT, Idx::BOOL, Idx::CHAR, Idx::BYTE, Idx::UNIT] {
        assert_eq!(classifier.classify(idx).unwrap(), Shape::Atomic);
    }
    assert_eq!(classifier.classify(Idx::STR).unwrap(), Shape::OpaqueLeaf);
    assert_eq!(classifier.classify(Idx::TYPE).unwrap(), Shape::OpaqueLeaf);
    assert_eq!(classifier.classify(Idx::OBJECT).unwrap(), Shape::ReferenceAggregate);
    assert_eq!(classifier.memoized(), 0);
}

#[test]
fn records_by_field_closure() {
    let pool = Pool::new();
    let classifier = Classifier::new(&pool);
    let point = pool
        .define_record("Point", &[("x", Idx::INT), ("y", Idx::INT)])
        .unwrap();
    let segment = pool
        .define_record("Segment", &[("a", point), ("b", point)])
        .unwrap();
    let label = pool
        .define_record("Label", &[("at", point), ("text", Idx::STR)])
        .unwrap();

    assert_eq!(classifier.classify(point).unwrap(), Shape::Atomic);
    assert_eq!(classifier.classify(segment).unwrap(), Shape::Atomic);
    assert_eq!(classifier.classify(label).unwrap(), Shape::ValueAggregate);
}

#[test]
fn classes() {
    let pool = Pool::new();
    let classifier = Classifier::new(&pool);
    let plain = pool
        .define_class(ClassBuilder::new("Plain").field("n", Idx::INT))
        .unwrap();
    let frozen = pool
        .define_class(ClassBuilder::new("Frozen").immutable())
        .unwrap();
    let frozen_child = pool
        .define_class(ClassBuilder::new("FrozenChild").extends(frozen))
        .unwrap();

    assert_eq!(classifier.classify(plain).unwrap(), Shape::ReferenceAggregate);
    assert_eq!(classifier.classify(frozen).unwrap(), Shape::OpaqueLeaf);
    assert_eq!(classifier.classify(frozen_child).unwrap(), Shape::OpaqueLeaf);
}

#[test]
fn arrays_by_rank() {
    let pool = Pool::new();
    let classifier = Classifier::new(&pool);
    let ints = pool.array(Idx::INT, 1).unwrap();
    let grid = pool.array(Idx::INT, 2).unwrap();

    assert_eq!(classifier.classify(ints).unwrap(), Shape::Array);
    assert_eq!(
        classifier.classify(grid).unwrap_err(),
        CloneError::UnsupportedShape {
            ty: grid,
            type_name: "int[,]".to_owned(),
            reason: UnsupportedReason::MultiDimensionalArray { rank: 2 },
        }
    );
}

#[test]
fn failures_are_not_memoized() {
    let pool = Pool::new();
    let classifier = Classifier::new(&pool);
    let grid = pool.array(Idx::INT, 3).unwrap();
    let pending = pool.declare_class("Pending");

    assert!(classifier.classify(grid).is_err());
    assert!(classifier.classify(grid).is_err());
    assert!(matches!(
        classifier.classify(pending),
        Err(CloneError::UnsupportedShape {
            reason: UnsupportedReason::IncompleteClass,
            ..
        })
    ));
    assert_eq!(classifier.memoized(), 0);
}

#[test]
fn unsupported_field_poisons_record() {
    let pool = Pool::new();
    let classifier = Classifier::new(&pool);
    let grid = pool.array(Idx::FLOAT, 2).unwrap();
    let holder = pool.define_record("Holder", &[("cells", grid)]).unwrap();

    assert!(matches!(
        classifier.classify(holder),
        Err(CloneError::UnsupportedShape { ty, .. }) if ty == grid
    ));
}

#[test]
fn unknown_type() {
    let pool = Pool::new();
    let classifier = Classifier::new(&pool);
    let bogus = Idx::from_raw(9_999);

    assert_eq!(classifier.classify(bogus).unwrap_err(), CloneError::UnknownType(bogus));
}

#[test]
fn leaf_shapes() {
    assert!(Shape::Atomic.is_leaf());
    assert!(Shape::OpaqueLeaf.is_leaf());
    assert!(!Shape::Array.is_leaf());
    assert!(!Shape::ReferenceAggregate.is_leaf());
}
