use pretty_assertions::assert_eq;

use mimic_types::{ClassBuilder, RecordValue};

use super::*;

fn names(slots: &[SlotDesc]) -> Vec<String> {
    slots.iter().map(|slot| slot.name.to_string()).collect()
}

#[test]
fn record_fields_in_order() {
    let pool = Pool::new();
    let point = pool
        .define_record("Point", &[("x", Idx::INT), ("y", Idx::FLOAT)])
        .unwrap();

    let slots = enumerate(&pool, point).unwrap();
    assert_eq!(names(&slots), vec!["x", "y"]);
    assert_eq!(slots[1].ty, Idx::FLOAT);
    assert_eq!(slots[1].index, 1);
    assert_eq!(slots[1].declaring, point);
}

#[test]
fn class_includes_inherited_slots_base_first() {
    let pool = Pool::new();
    let base = pool
        .define_class(ClassBuilder::new("Base").field("secret", Idx::INT))
        .unwrap();
    let mid = pool
        .define_class(ClassBuilder::new("Mid").extends(base).field("a", Idx::STR))
        .unwrap();
    let leaf = pool
        .define_class(ClassBuilder::new("Leaf").extends(mid).field("b", Idx::BOOL))
        .unwrap();

    let slots = enumerate(&pool, leaf).unwrap();
    assert_eq!(names(&slots), vec!["secret", "a", "b"]);
    let declaring: Vec<Idx> = slots.iter().map(|slot| slot.declaring).collect();
    assert_eq!(declaring, vec![base, mid, leaf]);
    let indices: Vec<usize> = slots.iter().map(|slot| slot.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn universal_base_has_no_slots() {
    let pool = Pool::new();
    assert!(enumerate(&pool, Idx::OBJECT).unwrap().is_empty());
    assert!(enumerate(&pool, Idx::INT).unwrap().is_empty());
    assert!(enumerate(&pool, Idx::STR).unwrap().is_empty());
}

#[test]
fn array_has_synthetic_element_slot() {
    let pool = Pool::new();
    let strs = pool.array(Idx::STR, 1).unwrap();

    let slots = enumerate(&pool, strs).unwrap();
    assert_eq!(slots.len(), 1);
    assert!(slots[0].is_element());
    assert_eq!(slots[0].ty, Idx::STR);
}

#[test]
fn forward_class_is_unsupported() {
    let pool = Pool::new();
    let pending = pool.declare_class("Pending");

    assert!(matches!(
        enumerate(&pool, pending),
        Err(CloneError::UnsupportedShape {
            reason: UnsupportedReason::IncompleteClass,
            ..
        })
    ));
}

#[test]
fn accessor_pair_reads_and_writes() {
    let pool = Pool::new();
    let point = pool
        .define_record("Point", &[("x", Idx::INT), ("y", Idx::INT)])
        .unwrap();
    let slots = enumerate(&pool, point).unwrap();
    let src = RecordValue::new(&pool, point, vec![Value::Int(3), Value::Int(4)]).unwrap();
    let mut dst = RecordValue::zeroed(&pool, point).unwrap();

    for slot in &slots {
        let value = slot.read(&src).unwrap();
        assert!(slot.write(&mut dst, value));
    }
    assert_eq!(dst, src);
}
