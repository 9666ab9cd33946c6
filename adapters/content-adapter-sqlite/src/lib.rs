//! SQLite-backed content adapter
//!
//! Reference [`ContentAdapter`] implementation for hosts without a content
//! store of their own. Nodes and root bindings live in two tables; the schema
//! is bootstrapped on open.

#![forbid(unsafe_code)]

use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::path::Path;
use uuid::Uuid;

use cascade_types::content_adapter::ContentAdapter;
use cascade_types::prelude::*;

mod node;
mod root;
mod schema;

#[derive(Debug)]
pub struct ContentAdapterSqlite {
	db: SqlitePool,
}

impl ContentAdapterSqlite {
	pub async fn new(db_file: &Path) -> CsResult<Self> {
		let opts = SqliteConnectOptions::new().filename(db_file).create_if_missing(true);
		let db = SqlitePool::connect_with(opts)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.map_err(|_| Error::DbError)?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.map_err(|_| Error::DbError)?;

		Ok(Self { db })
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.db
	}
}

#[async_trait]
impl ContentAdapter for ContentAdapterSqlite {
	async fn register_root(
		&self,
		name: &str,
		guid: Uuid,
		parent: Option<NodeRef>,
	) -> CsResult<NodeRef> {
		root::register(&self.db, name, guid, parent).await
	}

	async fn read_node(&self, node: NodeRef) -> CsResult<ContentNode> {
		node::read(&self.db, node).await
	}

	async fn children(&self, parent: NodeRef) -> CsResult<Vec<ContentNode>> {
		node::children(&self.db, parent).await
	}

	async fn find_by_guid(&self, parent: NodeRef, guid: Uuid) -> CsResult<Option<ContentNode>> {
		node::find_by_guid(&self.db, parent, guid).await
	}

	async fn save(&self, node: &ContentNode) -> CsResult<NodeRef> {
		if node.node_ref.is_new() {
			node::create(&self.db, node).await
		} else {
			node::update(&self.db, node).await?;
			Ok(node.node_ref)
		}
	}

	async fn ancestors(&self, node: NodeRef) -> CsResult<Vec<NodeRef>> {
		node::ancestors(&self.db, node).await
	}
}

// vim: ts=4
