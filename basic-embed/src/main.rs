//! Minimal embedding example
//!
//! Declares two settings models, provisions them through the resolver, attaches
//! a section-level theme override, and pushes one publish event through the
//! listener. Set `DB_DIR` to persist the content tree in SQLite instead of
//! process memory.

use std::{env, path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::{Uuid, uuid};

use cascade_content_adapter_memory::ContentAdapterMem;
use cascade_content_adapter_sqlite::ContentAdapterSqlite;
use cascade_core::events::{ContentEvent, spawn_publish_listener};
use cascade_core::registry::{SettingsModel, SettingsRegistry};
use cascade_core::service::SettingsService;
use cascade_types::content_adapter::ContentAdapter;
use cascade_types::error::CsResult;
use cascade_types::types::{ContentNode, PropertyValue};

const THEME_GUID: Uuid = uuid!("4f8a2c61-9d3e-4b70-a5c8-1e6f0b9d7a22");
const CONTACT_GUID: Uuid = uuid!("c05d8e3f-7a14-4c92-b6e0-9f2a5d8c1b47");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ThemeSettings {
	site_title: String,
	color_scheme: String,
}

impl SettingsModel for ThemeSettings {
	const KIND: &'static str = "ThemeSettings";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ContactSettings {
	email: String,
	phone: String,
}

impl SettingsModel for ContactSettings {
	const KIND: &'static str = "ContactSettings";
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> CsResult<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let adapter: Arc<dyn ContentAdapter> = match env::var("DB_DIR") {
		Ok(dir) => {
			Arc::new(ContentAdapterSqlite::new(&PathBuf::from(dir).join("content.db")).await?)
		}
		Err(_) => Arc::new(ContentAdapterMem::new()),
	};

	let mut registry = SettingsRegistry::new();
	registry.register_model::<ThemeSettings>("Theme settings", THEME_GUID)?;
	registry.register_model::<ContactSettings>("Contact settings", CONTACT_GUID)?;

	let service = Arc::new(SettingsService::new(Arc::new(registry.freeze()), adapter.clone()));
	service.init().await?;

	// A small content tree with a section-level theme override
	let start = adapter.save(&ContentNode::new(None, "Page", "Start")).await?;
	let section = adapter.save(&ContentNode::new(Some(start), "Page", "Campaigns")).await?;
	let page = adapter.save(&ContentNode::new(Some(section), "Page", "Summer")).await?;

	let mut override_node = ContentNode::new(Some(section), ThemeSettings::KIND, "Campaign theme");
	override_node.data = serde_json::to_value(ThemeSettings {
		site_title: "Campaigns".into(),
		color_scheme: "dark".into(),
	})?;
	let override_ref = adapter.save(&override_node).await?;

	let mut section_node = adapter.read_node(section).await?;
	section_node
		.properties
		.insert(ThemeSettings::KIND.into(), PropertyValue::Reference(override_ref));
	adapter.save(&section_node).await?;

	let global: ThemeSettings = service.get();
	info!(title = %global.site_title, scheme = %global.color_scheme, "global theme");

	let scoped: ThemeSettings = service.get_for(Some(page)).await;
	info!(title = %scoped.site_title, scheme = %scoped.color_scheme, "theme resolved for page");

	// Host publish events keep the global singletons current
	let (events, rx) = flume::unbounded();
	let listener = spawn_publish_listener(service.clone(), rx);

	let snapshot = service.global_settings();
	if let Some(node) = snapshot.get(ContactSettings::KIND) {
		let mut node = node.clone();
		node.data = serde_json::to_value(ContactSettings {
			email: "hello@example.com".into(),
			phone: "+1 555 0100".into(),
		})?;
		let _ = events.send(ContentEvent::Published(node));
	}
	drop(events);
	let _ = listener.await;

	let contact: ContactSettings = service.get();
	info!(email = %contact.email, phone = %contact.phone, "contact after publish");

	Ok(())
}

// vim: ts=4
