use rusqlite::Connection;

use opdir::cluster::projects::DEFAULT_PROJECT;
use opdir::cluster::{NO_NODE, OperationType};
use opdir::storage::migrations::SCHEMA_VERSION;

use super::fixture::DiskFixture;

const NODE_A: &str = "10.0.0.1";
const NODE_B: &str = "10.0.0.2";

/// Raw view of the tables, bypassing the directory accessors.
pub struct DbStateChecker<'a> {
    db: &'a Connection,
}

impl<'a> DbStateChecker<'a> {
    pub fn new(db: &'a Connection) -> Self {
        Self { db }
    }

    pub fn operation_count(&self) -> i64 {
        self.db
            .query_row("SELECT COUNT(*) FROM operations", [], |r| r.get(0))
            .unwrap_or(0)
    }

    pub fn operation_exists(&self, uuid: &str) -> bool {
        self.db
            .query_row("SELECT 1 FROM operations WHERE uuid = ?", [uuid], |_| {
                Ok(true)
            })
            .unwrap_or(false)
    }

    pub fn project_id_of(&self, uuid: &str) -> Option<i64> {
        self.db
            .query_row(
                "SELECT project_id FROM operations WHERE uuid = ?",
                [uuid],
                |r| r.get(0),
            )
            .unwrap_or(None)
    }

    pub fn log_full_state(&self) {
        println!("\n[DB FULL STATE]");
        println!("  Operations: {}", self.operation_count());

        if let Ok(mut stmt) = self
            .db
            .prepare("SELECT id, uuid, node_id, type, project_id FROM operations ORDER BY id")
        {
            if let Ok(rows) = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, Option<i64>>(4)?,
                ))
            }) {
                for row in rows.flatten() {
                    println!("    - {row:?}");
                }
            }
        }
    }
}

#[test]
fn operations_survive_reopen() {
    let fx = DiskFixture::with_nodes(&[NODE_A]);
    fx.on(NODE_A, |tx| {
        tx.create_operation(DEFAULT_PROJECT, "persisted", OperationType::BackupCreate)
    })
    .unwrap();

    let reopened = fx.reopen();
    assert_eq!(reopened.schema_version(), SCHEMA_VERSION);

    let checker = DbStateChecker::new(reopened.conn());
    checker.log_full_state();
    assert!(checker.operation_exists("persisted"));

    let op = reopened
        .transaction(NO_NODE, |tx| tx.get_operation_by_uuid("persisted"))
        .unwrap();
    assert_eq!(op.node_address, NODE_A);
}

#[test]
fn failed_unit_of_work_leaves_no_rows() {
    let fx = DiskFixture::with_nodes(&[NODE_A]);

    let err = fx
        .on(NODE_A, |tx| {
            tx.create_operation("", "first", OperationType::InstanceStop)?;
            tx.remove_operation("absent")
        })
        .unwrap_err();
    assert!(err.is_not_found());

    let checker = DbStateChecker::new(fx.db.conn());
    assert_eq!(checker.operation_count(), 0);
}

#[test]
fn global_operation_stores_null_project() {
    let fx = DiskFixture::with_nodes(&[NODE_A]);
    fx.on(NODE_A, |tx| {
        tx.create_operation("", "global", OperationType::ImagesUpdate)?;
        tx.create_operation(DEFAULT_PROJECT, "scoped", OperationType::ImagesUpdate)
    })
    .unwrap();

    let default_id = fx
        .db
        .transaction(NO_NODE, |tx| tx.get_project_id(DEFAULT_PROJECT))
        .unwrap();

    let checker = DbStateChecker::new(fx.db.conn());
    assert_eq!(checker.project_id_of("global"), None);
    assert_eq!(checker.project_id_of("scoped"), Some(default_id));
}

#[test]
fn committed_rows_visible_to_second_handle() {
    let fx = DiskFixture::with_nodes(&[NODE_A, NODE_B]);
    let other = fx.reopen();

    fx.on(NODE_B, |tx| {
        tx.create_operation("", "shared", OperationType::VolumeMove)
    })
    .unwrap();

    let node_b = fx.node_id(NODE_B);
    let seen = other
        .transaction(node_b, |tx| tx.local_operation_uuids())
        .unwrap();
    assert_eq!(seen, ["shared"]);
}

#[test]
fn deleting_node_row_cascades_to_operations() {
    let fx = DiskFixture::with_nodes(&[NODE_A, NODE_B]);
    fx.on(NODE_B, |tx| {
        tx.create_operation("", "doomed", OperationType::InstanceMigrate)
    })
    .unwrap();

    fx.db
        .conn()
        .execute("DELETE FROM nodes WHERE address = ?1", [NODE_B])
        .unwrap();

    let checker = DbStateChecker::new(fx.db.conn());
    assert!(!checker.operation_exists("doomed"));
}

#[test]
fn duplicate_uuid_rejected_by_schema() {
    let fx = DiskFixture::with_nodes(&[NODE_A]);
    fx.on(NODE_A, |tx| {
        tx.create_operation("", "unique", OperationType::ConsoleShow)
    })
    .unwrap();

    let node_a = fx.node_id(NODE_A);
    let result = fx.db.conn().execute(
        "INSERT INTO operations (uuid, node_id, type) VALUES ('unique', ?1, 0)",
        [node_a],
    );
    assert!(result.is_err());

    // The rejected insert left exactly one row behind.
    fx.on(NODE_A, |tx| tx.remove_operation("unique")).unwrap();
    assert_eq!(DbStateChecker::new(fx.db.conn()).operation_count(), 0);
}
