//! Reserved settings roots
//!
//! Two anchor nodes are provisioned in the host's content tree: one holding the
//! global singleton instances, one holding per-site override folders. Both are
//! bound to fixed stable identifiers so repeated initialization resolves the
//! same nodes instead of creating new ones.

use uuid::{Uuid, uuid};

use crate::prelude::*;

pub const GLOBAL_SETTINGS_ROOT_GUID: Uuid = uuid!("f2c8e3a1-6b0d-4f27-9a3e-5d1c7b9e0a44");
pub const SITE_SETTINGS_ROOT_GUID: Uuid = uuid!("8d54a9c0-2e71-4b3f-b6d8-0f4a1c6e92b7");

pub const GLOBAL_SETTINGS_ROOT_NAME: &str = "Global Settings Root";
pub const SITE_SETTINGS_ROOT_NAME: &str = "Site Settings Root";

/// Content type assigned to provisioned settings folders
pub const SETTINGS_FOLDER_TYPE: &str = "SettingsFolder";

/// Resolved anchor nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsRoots {
	pub global: NodeRef,
	pub site: NodeRef,
}

/// Register both anchors. Registration conflicts (an identifier already bound
/// under a different parent) are fatal: logged here and re-raised to the caller.
pub async fn ensure_roots(adapter: &dyn ContentAdapter) -> CsResult<SettingsRoots> {
	let global = adapter
		.register_root(GLOBAL_SETTINGS_ROOT_NAME, GLOBAL_SETTINGS_ROOT_GUID, None)
		.await
		.inspect_err(|err| error!(error = %err, "failed to register global settings root"))?;
	let site = adapter
		.register_root(SITE_SETTINGS_ROOT_NAME, SITE_SETTINGS_ROOT_GUID, None)
		.await
		.inspect_err(|err| error!(error = %err, "failed to register site settings root"))?;

	debug!(global = %global, site = %site, "settings roots resolved");
	Ok(SettingsRoots { global, site })
}

/// Resolve or create the override folder for a named site under the site
/// settings root. Idempotent by name.
pub async fn site_folder(
	adapter: &dyn ContentAdapter,
	roots: SettingsRoots,
	site_name: &str,
) -> CsResult<NodeRef> {
	if site_name.is_empty() {
		return Err(Error::ValidationError("Site name must not be empty".into()));
	}

	let children = adapter.children(roots.site).await?;
	if let Some(existing) = children.into_iter().find(|child| child.name.as_ref() == site_name) {
		return Ok(existing.node_ref);
	}

	let folder = ContentNode::new(Some(roots.site), SETTINGS_FOLDER_TYPE, site_name);
	let node_ref = adapter.save(&folder).await?;
	info!(site = %site_name, node = %node_ref, "provisioned site settings folder");
	Ok(node_ref)
}

// vim: ts=4
