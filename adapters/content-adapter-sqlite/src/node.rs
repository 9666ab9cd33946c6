//! Content node storage
//!
//! Properties and the typed data payload are stored as JSON text columns; the
//! host's content serialization is otherwise untouched.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;
use uuid::Uuid;

use cascade_types::prelude::*;

fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

fn node_from_row(row: &SqliteRow) -> ContentNode {
	let guid: Option<String> = row.get("guid");
	let properties: Option<String> = row.get("properties");
	let data: Option<String> = row.get("data");

	ContentNode {
		node_ref: NodeRef(row.get("node_id")),
		parent: row.get::<Option<u32>, _>("parent_id").map(NodeRef),
		type_name: row.get::<String, _>("type").into(),
		name: row.get::<String, _>("name").into(),
		guid: guid.and_then(|g| Uuid::parse_str(&g).ok()),
		properties: properties
			.and_then(|p| serde_json::from_str(&p).ok())
			.unwrap_or_default(),
		data: data
			.and_then(|d| serde_json::from_str(&d).ok())
			.unwrap_or(serde_json::Value::Null),
		created_at: Timestamp(row.get("created_at")),
	}
}

/// Read a single node by reference
pub(crate) async fn read(db: &SqlitePool, node: NodeRef) -> CsResult<ContentNode> {
	let row = sqlx::query("SELECT * FROM nodes WHERE node_id = ?")
		.bind(node.0)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	row.map(|r| node_from_row(&r)).ok_or(Error::NotFound)
}

/// Direct children, stable order
pub(crate) async fn children(db: &SqlitePool, parent: NodeRef) -> CsResult<Vec<ContentNode>> {
	let rows = sqlx::query("SELECT * FROM nodes WHERE parent_id = ? ORDER BY node_id")
		.bind(parent.0)
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(rows.iter().map(node_from_row).collect())
}

/// Find a direct child by stable identifier
pub(crate) async fn find_by_guid(
	db: &SqlitePool,
	parent: NodeRef,
	guid: Uuid,
) -> CsResult<Option<ContentNode>> {
	let row = sqlx::query("SELECT * FROM nodes WHERE parent_id = ? AND guid = ?")
		.bind(parent.0)
		.bind(guid.to_string())
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(row.map(|r| node_from_row(&r)))
}

/// Insert a new node, returns the allocated reference
pub(crate) async fn create(db: &SqlitePool, node: &ContentNode) -> CsResult<NodeRef> {
	let properties = serde_json::to_string(&node.properties)?;
	let data = node.data.to_string();

	let result = sqlx::query(
		"INSERT INTO nodes (parent_id, type, name, guid, properties, data, created_at)
		VALUES (?, ?, ?, ?, ?, ?, ?)",
	)
	.bind(node.parent.map(|p| p.0))
	.bind(node.type_name.as_ref())
	.bind(node.name.as_ref())
	.bind(node.guid.map(|g| g.to_string()))
	.bind(properties)
	.bind(data)
	.bind(node.created_at.0)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	Ok(NodeRef(u32::try_from(result.last_insert_rowid()).unwrap_or(0)))
}

/// Overwrite an existing node
pub(crate) async fn update(db: &SqlitePool, node: &ContentNode) -> CsResult<()> {
	let properties = serde_json::to_string(&node.properties)?;
	let data = node.data.to_string();

	let result = sqlx::query(
		"UPDATE nodes SET parent_id = ?, type = ?, name = ?, guid = ?, properties = ?, data = ?
		WHERE node_id = ?",
	)
	.bind(node.parent.map(|p| p.0))
	.bind(node.type_name.as_ref())
	.bind(node.name.as_ref())
	.bind(node.guid.map(|g| g.to_string()))
	.bind(properties)
	.bind(data)
	.bind(node.node_ref.0)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	if result.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

/// Parent chain nearest-first, excluding the node itself
pub(crate) async fn ancestors(db: &SqlitePool, node: NodeRef) -> CsResult<Vec<NodeRef>> {
	let mut current = parent_of(db, node).await?.ok_or(Error::NotFound)?;
	let mut chain = Vec::new();
	let mut seen: HashSet<NodeRef> = HashSet::from([node]);

	while let Some(parent) = current {
		if !seen.insert(parent) {
			warn!(node = %parent, "cycle in parent chain, stopping ancestor walk");
			break;
		}
		chain.push(parent);
		current = match parent_of(db, parent).await? {
			Some(next) => next,
			// Ancestor row vanished mid-walk, treat the chain as ended
			None => break,
		};
	}
	Ok(chain)
}

/// Some(parent column) when the node exists, None when it does not
async fn parent_of(db: &SqlitePool, node: NodeRef) -> CsResult<Option<Option<NodeRef>>> {
	let row = sqlx::query("SELECT parent_id FROM nodes WHERE node_id = ?")
		.bind(node.0)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(row.map(|r| r.get::<Option<u32>, _>("parent_id").map(NodeRef)))
}

// vim: ts=4
