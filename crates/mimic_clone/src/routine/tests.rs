use pretty_assertions::assert_eq;

use mimic_types::{ClassBuilder, Pool};

use super::*;
use crate::EngineConfig;

#[test]
fn plan_kinds() {
    let pool = Pool::new();
    let classifier = Classifier::new(&pool);
    let ints = pool.array(Idx::INT, 1).unwrap();
    let label = pool
        .define_record("Label", &[("n", Idx::INT), ("text", Idx::STR)])
        .unwrap();
    let node = pool
        .define_class(ClassBuilder::new("Node").field("n", Idx::INT))
        .unwrap();

    let plan = |ty| Routine::generate(&classifier, ty).unwrap().plan;
    assert!(matches!(plan(Idx::INT), Plan::BitCopy));
    assert!(matches!(plan(Idx::STR), Plan::Share));
    assert!(matches!(plan(Idx::OBJECT), Plan::EmptyRoot));
    assert!(matches!(
        plan(ints),
        Plan::Array {
            elem: Idx::INT,
            copy: SlotCopy::Bits
        }
    ));
    assert!(matches!(plan(label), Plan::Record { .. }));
    assert!(matches!(plan(node), Plan::Object { .. }));
}

#[test]
fn slot_copy_strategies() {
    let pool = Pool::new();
    let classifier = Classifier::new(&pool);
    let inner = pool
        .define_class(ClassBuilder::new("Inner").field("n", Idx::INT))
        .unwrap();
    let outer = pool
        .define_class(
            ClassBuilder::new("Outer")
                .field("count", Idx::INT)
                .field("name", Idx::STR)
                .field("child", inner),
        )
        .unwrap();

    let routine = Routine::generate(&classifier, outer).unwrap();
    let Plan::Object { template, slots } = routine.plan() else {
        panic!("expected an object plan, got {:?}", routine.plan());
    };
    let copies: Vec<SlotCopy> = slots.iter().map(|plan| plan.copy).collect();
    assert_eq!(copies, vec![SlotCopy::Bits, SlotCopy::Share, SlotCopy::Dispatch]);
    assert_eq!(&**template, &[Value::Int(0), Value::Null, Value::Null]);
    assert_eq!(routine.target(), outer);
    assert_eq!(routine.shape(), Shape::ReferenceAggregate);
}

#[test]
fn unsupported_slot_fails_generation_even_when_unused() {
    let pool = Pool::new();
    let classifier = Classifier::new(&pool);
    let grid = pool.array(Idx::INT, 2).unwrap();
    let holder = pool
        .define_class(ClassBuilder::new("Holder").field("cells", grid))
        .unwrap();

    assert!(matches!(
        Routine::generate(&classifier, holder),
        Err(CloneError::UnsupportedShape { ty, .. }) if ty == grid
    ));
}

#[test]
fn invoke_rejects_other_types() {
    let pool = Pool::new();
    let engine = Engine::new(&pool, EngineConfig::default());
    let routine = Routine::generate(engine.classifier(), Idx::INT).unwrap();

    assert_eq!(
        routine.invoke(&engine, &Value::Bool(true), 0).unwrap_err(),
        CloneError::ContractViolation {
            expected: "int".to_owned(),
            found: "bool".to_owned(),
        }
    );
    assert_eq!(routine.invoke(&engine, &Value::Int(7), 0).unwrap(), Value::Int(7));
}

#[test]
fn invoke_detects_slot_arity_mismatch() {
    let pool = Pool::new();
    let engine = Engine::new(&pool, EngineConfig::default());
    let pair = pool
        .define_class(
            ClassBuilder::new("Pair")
                .field("a", Idx::INT)
                .field("b", Idx::INT),
        )
        .unwrap();
    let routine = Routine::generate(engine.classifier(), pair).unwrap();
    let malformed = ObjectRef::allocate_raw(pair, vec![Value::Int(1)].into_boxed_slice());

    assert!(matches!(
        routine.invoke(&engine, &Value::Object(malformed), 0),
        Err(CloneError::ContractViolation { .. })
    ));
}

#[test]
fn inline_values_hold_no_heap_storage() {
    let pool = Pool::new();
    let pt = pool
        .define_record("Point", &[("x", Idx::INT), ("y", Idx::INT)])
        .unwrap();
    let node = pool
        .define_class(ClassBuilder::new("Node").field("n", Idx::INT))
        .unwrap();
    let plain = Value::Record(
        RecordValue::new(&pool, pt, vec![Value::Int(1), Value::string("s")]).unwrap(),
    );
    let holding = Value::Record(
        RecordValue::new(
            &pool,
            pt,
            vec![Value::Object(ObjectRef::new(&pool, node).unwrap()), Value::Int(2)],
        )
        .unwrap(),
    );

    assert!(is_inline(&Value::Int(3)));
    assert!(is_inline(&plain));
    assert!(!is_inline(&holding));
}

#[test]
fn bit_copy_of_record_dispatches_stray_objects() {
    let pool = Pool::new();
    let engine = Engine::new(&pool, EngineConfig::default());
    let pt = pool
        .define_record("Point", &[("x", Idx::INT), ("y", Idx::INT)])
        .unwrap();
    let node = pool
        .define_class(ClassBuilder::new("Node").field("n", Idx::INT))
        .unwrap();
    let stray = Value::Object(ObjectRef::new(&pool, node).unwrap());
    let original = Value::Record(
        RecordValue::new(&pool, pt, vec![stray.clone(), Value::Int(2)]).unwrap(),
    );
    let routine = Routine::generate(engine.classifier(), pt).unwrap();
    assert!(matches!(routine.plan(), Plan::BitCopy));

    let copy = routine.invoke(&engine, &original, 0).unwrap();
    assert_eq!(copy, original);
    let field = copy.as_record().unwrap().field(0).unwrap();
    assert!(!field.same_instance(&stray));
    assert!(engine.cache().contains(node));
}
