//! Named content root bindings
//!
//! A root binding maps a stable identifier to its node and the parent it was
//! registered under. Re-registering the same identifier under the same parent
//! resolves the existing node; a different parent is a contract violation.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use cascade_types::prelude::*;

fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

pub(crate) async fn register(
	db: &SqlitePool,
	name: &str,
	guid: Uuid,
	parent: Option<NodeRef>,
) -> CsResult<NodeRef> {
	let existing = sqlx::query("SELECT node_id, parent_id FROM roots WHERE guid = ?")
		.bind(guid.to_string())
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if let Some(row) = existing {
		let bound_parent = row.get::<Option<u32>, _>("parent_id").map(NodeRef);
		if bound_parent == parent {
			return Ok(NodeRef(row.get("node_id")));
		}
		return Err(Error::Conflict(format!(
			"root '{}' ({}) is already bound under a different parent",
			name, guid
		)));
	}

	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	let result = sqlx::query(
		"INSERT INTO nodes (parent_id, type, name, guid, properties, data, created_at)
		VALUES (?, 'ContentRoot', ?, ?, '{}', 'null', ?)",
	)
	.bind(parent.map(|p| p.0))
	.bind(name)
	.bind(guid.to_string())
	.bind(Timestamp::now().0)
	.execute(&mut *tx)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	let node = NodeRef(u32::try_from(result.last_insert_rowid()).unwrap_or(0));

	sqlx::query("INSERT INTO roots (guid, node_id, parent_id) VALUES (?, ?, ?)")
		.bind(guid.to_string())
		.bind(node.0)
		.bind(parent.map(|p| p.0))
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	debug!(root = %name, node = %node, "registered content root");
	Ok(node)
}

// vim: ts=4
