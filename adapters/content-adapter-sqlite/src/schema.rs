//! Database schema initialization
//!
//! Creates the node and root-binding tables on first open.

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Content nodes
	//***************
	// AUTOINCREMENT keeps rowids >= 1, so 0 stays free as the unsaved sentinel
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS nodes (
		node_id integer PRIMARY KEY AUTOINCREMENT,
		parent_id integer,
		type text NOT NULL,
		name text NOT NULL,
		guid text,
		properties json,
		data json,
		created_at integer NOT NULL
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_nodes_parent ON nodes(parent_id)")
		.execute(&mut *tx)
		.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_nodes_guid ON nodes(guid)")
		.execute(&mut *tx)
		.await?;

	// Named content roots
	//*********************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS roots (
		guid text NOT NULL,
		node_id integer NOT NULL,
		parent_id integer,
		PRIMARY KEY(guid)
	)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;
	Ok(())
}

// vim: ts=4
