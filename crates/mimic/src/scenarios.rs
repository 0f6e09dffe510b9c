//! Demo scenarios.
//!
//! Each scenario defines its own types in the global pool and duplicates
//! values through `deep_clone` / `deep_clone_any` only.

use std::fmt;

use mimic_clone::{deep_clone, deep_clone_any, CloneError, Engine};
use mimic_types::{ArrayRef, ClassBuilder, Idx, ObjectRef, Pool, RecordValue, TypeError, Value};

/// A scenario failed in a way the demo did not expect.
#[derive(Debug)]
pub enum ScenarioError {
    Type(TypeError),
    Clone(CloneError),
    Check(String),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Type(err) => write!(f, "type definition failed: {err}"),
            ScenarioError::Clone(err) => write!(f, "duplication failed: {err}"),
            ScenarioError::Check(msg) => write!(f, "check failed: {msg}"),
        }
    }
}

impl From<TypeError> for ScenarioError {
    fn from(err: TypeError) -> Self {
        ScenarioError::Type(err)
    }
}

impl From<CloneError> for ScenarioError {
    fn from(err: CloneError) -> Self {
        ScenarioError::Clone(err)
    }
}

type Outcome = Result<(), ScenarioError>;

pub struct Scenario {
    pub name: &'static str,
    pub summary: &'static str,
    pub run: fn(&'static Pool) -> Outcome,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "integer",
        summary: "clone an integer",
        run: integer,
    },
    Scenario {
        name: "point",
        summary: "clone a record and mutate the copy",
        run: point,
    },
    Scenario {
        name: "points",
        summary: "clone an array of records",
        run: points,
    },
    Scenario {
        name: "null",
        summary: "clone a null reference",
        run: null,
    },
    Scenario {
        name: "threads",
        summary: "8 threads clone 100 instances of a fresh class",
        run: threads,
    },
    Scenario {
        name: "grid",
        summary: "clone a two-dimensional array (fails)",
        run: grid,
    },
    Scenario {
        name: "graph",
        summary: "clone an object graph with inheritance and shared strings",
        run: graph,
    },
];

pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|scenario| scenario.name == name)
}

fn check(ok: bool, msg: &str) -> Outcome {
    if ok {
        Ok(())
    } else {
        Err(ScenarioError::Check(msg.to_owned()))
    }
}

fn point_type(pool: &Pool) -> Result<Idx, TypeError> {
    pool.define_record("Point", &[("x", Idx::INT), ("y", Idx::INT)])
}

fn point_value(pool: &Pool, ty: Idx, x: i64, y: i64) -> Result<RecordValue, TypeError> {
    RecordValue::new(pool, ty, vec![Value::Int(x), Value::Int(y)])
}

fn integer(_pool: &'static Pool) -> Outcome {
    let copy = deep_clone(&42i64)?;
    println!("  clone(42) = {copy}");
    check(copy == 42, "integer changed")
}

fn point(pool: &'static Pool) -> Outcome {
    let ty = point_type(pool)?;
    let original = point_value(pool, ty, 3, 4)?;
    let mut copy = deep_clone(&original)?;
    copy.set(pool, "x", Value::Int(10));

    let original = Value::Record(original);
    println!("  original = {}", original.display(pool));
    println!("  copy     = {}", Value::Record(copy).display(pool));
    check(
        original.as_record().and_then(|r| r.get(pool, "x")) == Some(&Value::Int(3)),
        "original point was modified",
    )
}

fn points(pool: &'static Pool) -> Outcome {
    let ty = point_type(pool)?;
    let array_ty = pool.array(ty, 1)?;
    let elems = (1..=3)
        .map(|n| point_value(pool, ty, n, n).map(Value::Record))
        .collect::<Result<Vec<_>, _>>()?;
    let original = Value::Array(ArrayRef::new(pool, array_ty, elems)?);

    let copy = deep_clone_any(&original)?;
    println!("  clone = {}", copy.display(pool));
    check(
        copy == original && !copy.same_instance(&original),
        "array copy is not a distinct equal instance",
    )
}

fn null(_pool: &'static Pool) -> Outcome {
    let typed = deep_clone(&None::<ObjectRef>)?;
    let untyped = deep_clone_any(&Value::Null)?;
    println!("  clone(null) = {}", if typed.is_none() { "null" } else { "?" });
    check(typed.is_none() && untyped.is_null(), "null did not stay null")
}

fn threads(pool: &'static Pool) -> Outcome {
    let fresh = pool.define_class(
        ClassBuilder::new("Fresh")
            .field("id", Idx::INT)
            .field("tag", Idx::STR),
    )?;

    let outcomes: Vec<Result<bool, ScenarioError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8i64)
            .map(|t| {
                scope.spawn(move || -> Result<bool, ScenarioError> {
                    let mut ok = true;
                    for i in (0..100).filter(|i| i % 8 == t) {
                        let original = ObjectRef::new(pool, fresh)?;
                        original.set(0, Value::Int(i));
                        original.set(1, Value::string("fresh"));
                        let copy = deep_clone(&original)?;
                        ok &= copy == original && !copy.ptr_eq(&original);
                    }
                    Ok(ok)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(ScenarioError::Check("worker panicked".to_owned())))
            })
            .collect()
    });

    for outcome in outcomes {
        check(outcome?, "a concurrent copy differed from its original")?;
    }
    let cached = Engine::global().cache().contains(fresh);
    println!("  100 copies ok, routine cached once: {cached}");
    check(cached, "routine for Fresh was not cached")
}

fn grid(pool: &'static Pool) -> Outcome {
    let grid_ty = pool.array(Idx::INT, 2)?;
    let value = Value::Array(ArrayRef::zeroed(pool, grid_ty, &[2, 2])?);
    match deep_clone_any(&value) {
        Err(err @ CloneError::UnsupportedShape { .. }) => {
            println!("  rejected: {err}");
            Ok(())
        }
        Err(err) => Err(err.into()),
        Ok(_) => Err(ScenarioError::Check("2-D array was duplicated".to_owned())),
    }
}

fn graph(pool: &'static Pool) -> Outcome {
    let person = pool.declare_class("Person");
    pool.complete_class(
        person,
        ClassBuilder::new("Person")
            .field("name", Idx::STR)
            .field("friend", person),
    )?;
    let employee = pool.define_class(
        ClassBuilder::new("Employee")
            .extends(person)
            .field("salary", Idx::INT),
    )?;

    let alice = ObjectRef::new(pool, person)?;
    alice.set_field(pool, "name", Value::string("Alice"));
    let bob = ObjectRef::new(pool, employee)?;
    bob.set_field(pool, "name", Value::string("Bob"));
    bob.set_field(pool, "salary", Value::Int(100));
    alice.set_field(pool, "friend", Value::Object(bob));

    let original = Value::Object(alice);
    let copy = deep_clone_any(&original)?;
    println!("  original = {}", original.display(pool));
    println!("  copy     = {}", copy.display(pool));

    let friend_of = |value: &Value| {
        value
            .as_object()
            .and_then(|object| object.get_field(pool, "friend"))
            .unwrap_or_default()
    };
    let name_of = |value: &Value| {
        value
            .as_object()
            .and_then(|object| object.get_field(pool, "name"))
            .unwrap_or_default()
    };
    let copied_friend = friend_of(&copy);
    check(
        copied_friend.as_object().map(ObjectRef::ty) == Some(employee),
        "friend lost its runtime type",
    )?;
    check(
        !copied_friend.same_instance(&friend_of(&original)),
        "friend was shared",
    )?;
    check(
        name_of(&copy).same_instance(&name_of(&original)),
        "strings should be shared",
    )
}
