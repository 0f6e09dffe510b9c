//! Property-based tests for deep duplication.
//!
//! Random atomic values must come back equal, and random arrays of records
//! must come back as distinct, structurally equal storage whose elements
//! mutate independently of the original.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use mimic_clone::{Engine, EngineConfig};
use mimic_types::{ArrayRef, ClassBuilder, Idx, ObjectRef, Pool, RecordValue, Value};
use proptest::prelude::*;

// -- Value Strategies --

fn atomic_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<f64>().prop_map(Value::Float),
        any::<bool>().prop_map(Value::Bool),
        any::<char>().prop_map(Value::Char),
        any::<u8>().prop_map(Value::Byte),
        Just(Value::Unit),
        "[a-z ]{0,12}".prop_map(|s| Value::string(&s)),
    ]
}

proptest! {
    #[test]
    fn atomic_values_clone_equal(value in atomic_strategy()) {
        let pool = Pool::new();
        let engine = Engine::new(&pool, EngineConfig::default());

        let copy = engine.clone_any(&value).unwrap();
        prop_assert_eq!(copy, value);
    }

    #[test]
    fn int_arrays_clone_independently(elems in prop::collection::vec(any::<i64>(), 0..64)) {
        let pool = Pool::new();
        let engine = Engine::new(&pool, EngineConfig::default());
        let ints = pool.array(Idx::INT, 1).unwrap();
        let original = ArrayRef::new(&pool, ints, elems.iter().copied().map(Value::Int).collect())
            .unwrap();

        let copy = engine.clone_typed(&original).unwrap();
        prop_assert_eq!(copy.len(), elems.len());
        prop_assert!(!copy.ptr_eq(&original));
        prop_assert_eq!(&copy, &original);

        if !elems.is_empty() {
            copy.set(0, Value::Int(elems[0].wrapping_add(1)));
            prop_assert_eq!(original.get(0), Some(Value::Int(elems[0])));
        }
    }

    #[test]
    fn object_arrays_clone_deeply(
        cells in prop::collection::vec((any::<i64>(), "[a-z]{0,8}"), 1..24),
    ) {
        let pool = Pool::new();
        let engine = Engine::new(&pool, EngineConfig::default());
        let cell = pool
            .define_class(ClassBuilder::new("Cell").field("n", Idx::INT).field("label", Idx::STR))
            .unwrap();
        let cells_ty = pool.array(cell, 1).unwrap();
        let objects: Vec<ObjectRef> = cells
            .iter()
            .map(|(n, label)| {
                let object = ObjectRef::new(&pool, cell).unwrap();
                object.set(0, Value::Int(*n));
                object.set(1, Value::string(label));
                object
            })
            .collect();
        let original = ArrayRef::new(
            &pool,
            cells_ty,
            objects.iter().cloned().map(Value::Object).collect(),
        )
        .unwrap();

        let copy = engine.clone_typed(&original).unwrap();
        prop_assert_eq!(&copy, &original);
        for (i, object) in objects.iter().enumerate() {
            let dup = copy.get(i).unwrap();
            prop_assert!(!dup.same_instance(&Value::Object(object.clone())));
            dup.as_object().unwrap().set(0, Value::Int(0));
        }
        for (object, (n, _)) in objects.iter().zip(&cells) {
            prop_assert_eq!(object.get(0), Some(Value::Int(*n)));
        }
        prop_assert_eq!(engine.cache().len(), 2);
    }

    #[test]
    fn records_with_strings_clone_equal(n in any::<i64>(), text in "[a-z]{0,16}") {
        let pool = Pool::new();
        let engine = Engine::new(&pool, EngineConfig::default());
        let tagged = pool.define_record("Tagged", &[("n", Idx::INT), ("text", Idx::STR)]).unwrap();
        let original = RecordValue::new(&pool, tagged, vec![Value::Int(n), Value::string(&text)])
            .unwrap();

        let copy = engine.clone_typed(&original).unwrap();
        prop_assert_eq!(copy, original);
    }
}
