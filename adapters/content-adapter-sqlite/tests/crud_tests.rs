//! SQLite adapter CRUD and root-binding tests

use cascade_content_adapter_sqlite::ContentAdapterSqlite;
use cascade_types::content_adapter::ContentAdapter;
use cascade_types::error::Error;
use cascade_types::types::{ContentNode, NodeRef, PropertyValue};
use tempfile::TempDir;
use uuid::Uuid;

async fn create_test_adapter() -> (ContentAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = ContentAdapterSqlite::new(&temp_dir.path().join("content.db"))
		.await
		.expect("Failed to create adapter");
	(adapter, temp_dir)
}

#[tokio::test]
async fn test_save_and_read_round_trip() {
	let (adapter, _temp) = create_test_adapter().await;

	let mut node = ContentNode::new(None, "Page", "Start");
	node.guid = Some(Uuid::new_v4());
	node.properties.insert("Theme".into(), PropertyValue::Reference(NodeRef(4)));
	node.properties.insert("Visible".into(), PropertyValue::Bool(true));
	node.properties.insert("Order".into(), PropertyValue::Int(4));
	node.data = serde_json::json!({ "title": "Start" });

	let node_ref = adapter.save(&node).await.expect("Should save node");
	assert!(!node_ref.is_new());

	let loaded = adapter.read_node(node_ref).await.expect("Should read node back");
	assert_eq!(loaded.type_name.as_ref(), "Page");
	assert_eq!(loaded.name.as_ref(), "Start");
	assert_eq!(loaded.guid, node.guid);
	assert_eq!(loaded.data, node.data);

	// References survive storage distinct from plain integers
	assert_eq!(loaded.reference("Theme"), Some(NodeRef(4)));
	assert_eq!(loaded.property("Order"), Some(&PropertyValue::Int(4)));
	assert_eq!(loaded.reference("Order"), None);
}

#[tokio::test]
async fn test_update_existing_node() {
	let (adapter, _temp) = create_test_adapter().await;

	let node_ref = adapter.save(&ContentNode::new(None, "Page", "Start")).await.unwrap();
	let mut updated = adapter.read_node(node_ref).await.unwrap();
	updated.name = "Renamed".into();
	updated.data = serde_json::json!({ "title": "Renamed" });

	assert_eq!(adapter.save(&updated).await.unwrap(), node_ref);

	let loaded = adapter.read_node(node_ref).await.unwrap();
	assert_eq!(loaded.name.as_ref(), "Renamed");
	assert_eq!(loaded.data, serde_json::json!({ "title": "Renamed" }));
}

#[tokio::test]
async fn test_update_missing_node_fails() {
	let (adapter, _temp) = create_test_adapter().await;

	let mut node = ContentNode::new(None, "Page", "Ghost");
	node.node_ref = NodeRef(42);
	assert!(matches!(adapter.save(&node).await, Err(Error::NotFound)));
	assert!(matches!(adapter.read_node(NodeRef(42)).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_children_and_find_by_guid() {
	let (adapter, _temp) = create_test_adapter().await;

	let root = adapter.save(&ContentNode::new(None, "ContentRoot", "Root")).await.unwrap();

	let guid = Uuid::new_v4();
	let mut theme = ContentNode::new(Some(root), "ThemeSettings", "Theme");
	theme.guid = Some(guid);
	let theme_ref = adapter.save(&theme).await.unwrap();
	let page_ref = adapter.save(&ContentNode::new(Some(root), "Page", "Start")).await.unwrap();

	let children = adapter.children(root).await.unwrap();
	assert_eq!(
		children.iter().map(|c| c.node_ref).collect::<Vec<_>>(),
		vec![theme_ref, page_ref]
	);

	let found = adapter.find_by_guid(root, guid).await.unwrap();
	assert_eq!(found.map(|n| n.node_ref), Some(theme_ref));
	assert!(adapter.find_by_guid(root, Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_register_root_is_idempotent() {
	let (adapter, _temp) = create_test_adapter().await;
	let guid = Uuid::new_v4();

	let first = adapter.register_root("Settings", guid, None).await.unwrap();
	let second = adapter.register_root("Settings", guid, None).await.unwrap();
	assert_eq!(first, second);

	let node = adapter.read_node(first).await.unwrap();
	assert_eq!(node.name.as_ref(), "Settings");
	assert_eq!(node.guid, Some(guid));
}

#[tokio::test]
async fn test_register_root_conflicting_parent_fails() {
	let (adapter, _temp) = create_test_adapter().await;
	let guid = Uuid::new_v4();

	adapter.register_root("Settings", guid, None).await.unwrap();
	let other = adapter.save(&ContentNode::new(None, "Page", "Start")).await.unwrap();

	let err = adapter.register_root("Settings", guid, Some(other)).await;
	assert!(matches!(err, Err(Error::Conflict(_))));
}

#[tokio::test]
async fn test_ancestors_nearest_first() {
	let (adapter, _temp) = create_test_adapter().await;

	let root = adapter.save(&ContentNode::new(None, "ContentRoot", "Root")).await.unwrap();
	let section = adapter.save(&ContentNode::new(Some(root), "Section", "Articles")).await.unwrap();
	let page = adapter.save(&ContentNode::new(Some(section), "Page", "Post")).await.unwrap();

	assert_eq!(adapter.ancestors(page).await.unwrap(), vec![section, root]);
	assert_eq!(adapter.ancestors(root).await.unwrap(), Vec::<NodeRef>::new());
	assert!(matches!(adapter.ancestors(NodeRef(99)).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_data_survives_reopen() {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let db_file = temp_dir.path().join("content.db");
	let guid = Uuid::new_v4();

	let node_ref = {
		let adapter = ContentAdapterSqlite::new(&db_file).await.unwrap();
		let root = adapter.register_root("Settings", guid, None).await.unwrap();
		adapter.save(&ContentNode::new(Some(root), "ThemeSettings", "Theme")).await.unwrap()
	};

	let adapter = ContentAdapterSqlite::new(&db_file).await.unwrap();
	let loaded = adapter.read_node(node_ref).await.expect("Node should survive reopen");
	assert_eq!(loaded.name.as_ref(), "Theme");
	// Binding survives too
	let root = adapter.register_root("Settings", guid, None).await.unwrap();
	assert_eq!(loaded.parent, Some(root));
}

// vim: ts=4
