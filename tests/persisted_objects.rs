//! Persisted Object Tests
//!
//! Objects backed by a database:
//! - positional creation and arity checks
//! - commit publishes, cancel discards
//! - results are live and ordered by insertion
//! - `add` converts in place and follows links, cycles included
//! - a failed `add` leaves the whole graph standalone
//! - objects from a cancelled transaction are invalid handles
//! - objects outlive their database only as invalid handles

mod common;

use aeroproxy::store::{CommitId, TxError};
use aeroproxy::{AccessorError, Database, DatabaseConfig, Object, ObjectType, Value};
use common::{IntObject, NodeObject};

// =============================================================================
// Long Values
// =============================================================================

#[test]
fn test_long_type() {
    let long_number: i64 = 17179869184;
    let int_number: i64 = 2147483647;
    let negative_long_number: i64 = -17179869184;
    let updated_long_number: i64 = 8589934592;

    let db = Database::in_memory();

    db.begin_write().unwrap();
    db.create::<IntObject>(vec![long_number.into()]).unwrap();
    db.create::<IntObject>(vec![int_number.into()]).unwrap();
    db.create::<IntObject>(vec![negative_long_number.into()]).unwrap();
    db.commit_write().unwrap();

    let objects = db.objects::<IntObject>().unwrap();
    assert_eq!(objects.len(), 3, "3 rows expected");
    assert_eq!(objects.get(0).unwrap().int_col().unwrap(), long_number);
    assert_eq!(objects.get(1).unwrap().int_col().unwrap(), int_number);
    assert_eq!(objects.get(2).unwrap().int_col().unwrap(), negative_long_number);

    db.begin_write().unwrap();
    objects.get(0).unwrap().set_int_col(updated_long_number).unwrap();
    db.commit_write().unwrap();

    assert_eq!(objects.get(0).unwrap().int_col().unwrap(), updated_long_number);
}

// =============================================================================
// Creation Tests
// =============================================================================

#[test]
fn test_create_arity_mismatch() {
    let db = Database::in_memory();
    db.begin_write().unwrap();

    let err = db.create::<IntObject>(vec![]).unwrap_err();
    assert_eq!(
        err,
        AccessorError::ArityMismatch {
            class_name: "IntObject".into(),
            expected: 1,
            actual: 0,
        }
    );

    let err = db
        .create::<IntObject>(vec![1i64.into(), 2i64.into()])
        .unwrap_err();
    assert_eq!(err.code(), "AERO_ARITY_MISMATCH");
    assert_eq!(db.objects::<IntObject>().unwrap().len(), 0);
}

#[test]
fn test_create_coerces_values() {
    let db = Database::in_memory();
    db.begin_write().unwrap();

    let err = db.create::<IntObject>(vec!["1".into()]).unwrap_err();
    assert_eq!(err.code(), "AERO_TYPE_MISMATCH");

    let object = db.create::<IntObject>(vec![Value::from(5i8)]).unwrap();
    assert_eq!(object.int_col().unwrap(), 5);
}

#[test]
fn test_create_dynamic_matches_typed() {
    let db = Database::in_memory();
    // Registers the class
    IntObject::new().unwrap();

    let object = db
        .write(|db| db.create_dynamic("IntObject", vec![42i64.into()]))
        .unwrap();
    assert_eq!(object.class_name(), "IntObject");

    let typed = db.objects::<IntObject>().unwrap().first().unwrap();
    assert_eq!(typed.int_col().unwrap(), 42);
    assert!(typed.as_object().same_object(&object));

    let dynamic = db.dynamic_objects("IntObject").unwrap();
    assert_eq!(dynamic.len(), 1);
    assert_eq!(dynamic.first().unwrap().get("intCol").unwrap(), Value::Int(42));
}

// =============================================================================
// Transaction Tests
// =============================================================================

#[test]
fn test_cancel_discards_inserts_and_writes() {
    let db = Database::in_memory();
    let object = db
        .write(|db| db.create::<IntObject>(vec![1i64.into()]))
        .unwrap();

    db.begin_write().unwrap();
    object.set_int_col(2).unwrap();
    db.create::<IntObject>(vec![3i64.into()]).unwrap();
    assert_eq!(object.int_col().unwrap(), 2);
    assert_eq!(db.objects::<IntObject>().unwrap().len(), 2);
    db.cancel_write().unwrap();

    assert_eq!(object.int_col().unwrap(), 1);
    assert_eq!(db.objects::<IntObject>().unwrap().len(), 1);
    assert_eq!(db.commit_id().unwrap(), Some(CommitId::new(1)));
}

#[test]
fn test_cancelled_object_never_aliases_later_row() {
    let db = Database::in_memory();

    db.begin_write().unwrap();
    let discarded = db.create::<IntObject>(vec![1i64.into()]).unwrap();
    db.cancel_write().unwrap();

    assert!(discarded.as_object().is_persisted());
    assert!(!discarded.as_object().is_valid());

    let kept = db
        .write(|db| db.create::<IntObject>(vec![99i64.into()]))
        .unwrap();

    assert!(!discarded.as_object().is_valid());
    assert_eq!(
        discarded.int_col().unwrap_err(),
        AccessorError::Tx(TxError::Invalidated)
    );
    assert!(!discarded.as_object().same_object(kept.as_object()));

    db.begin_write().unwrap();
    assert_eq!(
        discarded.set_int_col(5).unwrap_err(),
        AccessorError::Tx(TxError::Invalidated)
    );
    db.commit_write().unwrap();
    assert_eq!(kept.int_col().unwrap(), 99);
}

#[test]
fn test_objects_from_failed_write_are_invalid() {
    let db = Database::in_memory();
    let mut created = Vec::new();

    let err = db
        .write(|db| {
            created.push(db.create::<IntObject>(vec![1i64.into()])?);
            created.push(db.create::<IntObject>(vec![2i64.into()])?);
            db.create::<IntObject>(vec![]).map(|_| ())
        })
        .unwrap_err();
    assert_eq!(err.code(), "AERO_ARITY_MISMATCH");

    db.write(|db| db.create::<IntObject>(vec![7i64.into()]))
        .unwrap();

    for object in &created {
        assert!(!object.as_object().is_valid());
        assert_eq!(
            object.as_object().get("intCol").unwrap_err(),
            AccessorError::Tx(TxError::Invalidated)
        );
    }
    assert_eq!(db.objects::<IntObject>().unwrap().len(), 1);
}

#[test]
fn test_committed_objects_survive_later_cancel() {
    let db = Database::in_memory();
    let object = db
        .write(|db| db.create::<IntObject>(vec![1i64.into()]))
        .unwrap();

    db.begin_write().unwrap();
    db.create::<IntObject>(vec![2i64.into()]).unwrap();
    db.cancel_write().unwrap();

    assert!(object.as_object().is_valid());
    assert_eq!(object.int_col().unwrap(), 1);
}

#[test]
fn test_single_write_transaction() {
    let db = Database::in_memory();
    db.begin_write().unwrap();

    let err = db.begin_write().unwrap_err();
    assert_eq!(err, TxError::WriteInProgress);

    let err = db.write(|_| Ok(())).unwrap_err();
    assert_eq!(err, AccessorError::Tx(TxError::WriteInProgress));
}

#[test]
fn test_commit_without_transaction() {
    let db = Database::in_memory();
    assert_eq!(db.commit_write().unwrap_err(), TxError::NoWriteTransaction);
}

#[test]
fn test_commit_ids_increase() {
    let db = Database::in_memory();
    assert!(db.commit_id().unwrap().is_none());

    for expected in 1..=3 {
        db.begin_write().unwrap();
        db.create::<IntObject>(vec![Value::Int(expected)]).unwrap();
        let commit_id = db.commit_write().unwrap();
        assert_eq!(commit_id.value(), expected as u64);
    }
    assert_eq!(db.commit_id().unwrap(), Some(CommitId::new(3)));
}

#[test]
fn test_read_only_database_rejects_writes() {
    let config = DatabaseConfig::from_json(r#"{"identifier":"archive","read_only":true}"#).unwrap();
    let db = Database::open(config).unwrap();

    let err = db.begin_write().unwrap_err();
    assert_eq!(err, TxError::ReadOnly("archive".into()));
}

// =============================================================================
// Results Tests
// =============================================================================

#[test]
fn test_results_are_live() {
    let db = Database::in_memory();
    let objects = db.objects::<IntObject>().unwrap();
    assert!(objects.is_empty());
    assert!(objects.first().is_none());

    db.write(|db| {
        for i in 0..4i64 {
            db.create::<IntObject>(vec![i.into()])?;
        }
        Ok(())
    })
    .unwrap();

    assert_eq!(objects.len(), 4);
    assert_eq!(objects.last().unwrap().int_col().unwrap(), 3);
    assert!(objects.get(4).is_none());

    let values: Vec<i64> = objects.iter().map(|o| o.int_col().unwrap()).collect();
    assert_eq!(values, vec![0, 1, 2, 3]);
}

#[test]
fn test_databases_are_isolated() {
    let first = Database::in_memory();
    let second = Database::in_memory();

    first
        .write(|db| db.create::<IntObject>(vec![1i64.into()]))
        .unwrap();

    assert_eq!(first.objects::<IntObject>().unwrap().len(), 1);
    assert_eq!(second.objects::<IntObject>().unwrap().len(), 0);
}

// =============================================================================
// Add Tests
// =============================================================================

#[test]
fn test_add_requires_transaction() {
    let db = Database::in_memory();
    let object = IntObject::new().unwrap();

    let err = db.add(object.as_object()).unwrap_err();
    assert_eq!(err, AccessorError::NotInTransaction);
    assert!(!object.as_object().is_persisted());
}

#[test]
fn test_add_keeps_values_and_identity() {
    let db = Database::in_memory();
    let object = IntObject::new().unwrap();
    object.set_int_col(99).unwrap();
    let alias = object.clone();

    db.write(|db| db.add(object.as_object())).unwrap();

    assert!(alias.as_object().is_persisted());
    assert_eq!(alias.int_col().unwrap(), 99);
    assert_eq!(object.int_col().unwrap(), 99);
    assert!(alias.as_object().same_object(object.as_object()));
}

#[test]
fn test_add_follows_links_and_cycles() {
    let db = Database::in_memory();
    let a = NodeObject::new().unwrap();
    let b = NodeObject::new().unwrap();
    a.set_label("a".into()).unwrap();
    b.set_label("b".into()).unwrap();
    a.set_next(Some(b.clone())).unwrap();
    b.set_next(Some(a.clone())).unwrap();

    db.write(|db| db.add(a.as_object())).unwrap();

    assert!(b.as_object().is_persisted());
    assert_eq!(db.objects::<NodeObject>().unwrap().len(), 2);

    let from_a = a.next().unwrap().unwrap();
    assert_eq!(from_a.label().unwrap(), "b");
    let back = from_a.next().unwrap().unwrap();
    assert!(back.as_object().same_object(a.as_object()));
}

#[test]
fn test_self_link() {
    let db = Database::in_memory();
    let node = NodeObject::new().unwrap();
    node.set_next(Some(node.clone())).unwrap();

    db.write(|db| db.add(node.as_object())).unwrap();

    assert_eq!(db.objects::<NodeObject>().unwrap().len(), 1);
    let next = node.next().unwrap().unwrap();
    assert!(next.as_object().same_object(node.as_object()));
}

#[test]
fn test_link_across_databases_rejected() {
    let first = Database::in_memory();
    let second = Database::in_memory();

    let foreign = first
        .write(|db| db.create::<NodeObject>(vec!["foreign".into(), Value::Object(None)]))
        .unwrap();
    let local = second
        .write(|db| db.create::<NodeObject>(vec!["local".into(), Value::Object(None)]))
        .unwrap();

    let err = second
        .write(|_| local.set_next(Some(foreign.clone())))
        .unwrap_err();
    assert_eq!(err.code(), "AERO_TX_FOREIGN_OBJECT");
    assert!(local.next().unwrap().is_none());
}

#[test]
fn test_failed_add_leaves_graph_standalone() {
    let first = Database::in_memory();
    let second = Database::in_memory();

    let foreign = first
        .write(|db| db.create::<NodeObject>(vec!["foreign".into(), Value::Object(None)]))
        .unwrap();
    let owner = NodeObject::new().unwrap();
    let middle = NodeObject::new().unwrap();
    owner.set_next(Some(middle.clone())).unwrap();
    middle.set_next(Some(foreign.clone())).unwrap();

    let err = second.write(|db| db.add(owner.as_object())).unwrap_err();
    assert_eq!(err.code(), "AERO_TX_FOREIGN_OBJECT");

    assert!(!owner.as_object().is_persisted());
    assert!(!middle.as_object().is_persisted());
    let next = owner.next().unwrap().unwrap();
    assert!(next.as_object().same_object(middle.as_object()));
    assert_eq!(second.objects::<NodeObject>().unwrap().len(), 0);
}

#[test]
fn test_add_with_discarded_target_rejected() {
    let db = Database::in_memory();

    db.begin_write().unwrap();
    let discarded = db
        .create::<NodeObject>(vec!["gone".into(), Value::Object(None)])
        .unwrap();
    db.cancel_write().unwrap();

    let owner = NodeObject::new().unwrap();
    owner.set_next(Some(discarded)).unwrap();

    let err = db.write(|db| db.add(owner.as_object())).unwrap_err();
    assert_eq!(err, AccessorError::Tx(TxError::Invalidated));
    assert!(!owner.as_object().is_persisted());
    assert_eq!(db.objects::<NodeObject>().unwrap().len(), 0);
}

// =============================================================================
// Lifetime Tests
// =============================================================================

#[test]
fn test_objects_invalidated_when_database_dropped() {
    let db = Database::in_memory();
    let clone = db.clone();
    let object = db
        .write(|db| db.create::<IntObject>(vec![1i64.into()]))
        .unwrap();

    drop(db);
    assert!(object.as_object().is_valid());
    assert_eq!(object.int_col().unwrap(), 1);

    drop(clone);
    assert!(!object.as_object().is_valid());
    assert_eq!(
        object.int_col().unwrap_err(),
        AccessorError::Tx(TxError::Invalidated)
    );
}

#[test]
fn test_standalone_objects_always_valid() {
    // Registers the class
    IntObject::new().unwrap();

    let object = Object::dynamic("IntObject").unwrap();
    assert!(object.is_valid());
    assert!(!object.is_persisted());
    assert_eq!(object.get("intCol").unwrap(), Value::Int(0));
}
