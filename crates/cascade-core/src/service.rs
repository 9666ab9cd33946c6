//! Settings service: singleton provisioning and scoped resolution
//!
//! The service owns one shared mutable resource, the global settings map. All
//! public reads take the read lock, the single runtime writer (`update`) takes
//! the write lock, and no guard is ever held across an `await`.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::prelude::*;
use crate::registry::{FrozenSettingsRegistry, SettingsModel};
use crate::roots::{self, SettingsRoots};

pub struct SettingsService {
	registry: Arc<FrozenSettingsRegistry>,
	adapter: Arc<dyn ContentAdapter>,
	global: RwLock<HashMap<Box<str>, ContentNode>>,
	roots: OnceLock<SettingsRoots>,
}

impl SettingsService {
	pub fn new(registry: Arc<FrozenSettingsRegistry>, adapter: Arc<dyn ContentAdapter>) -> Self {
		Self { registry, adapter, global: RwLock::new(HashMap::new()), roots: OnceLock::new() }
	}

	/// Establish the reserved roots and provision one singleton instance per
	/// registered kind, deduplicated by stable identifier.
	///
	/// Idempotent: a second call resolves the same roots and finds every
	/// instance already present. Failures are fatal to the caller and never
	/// retried here.
	pub async fn init(&self) -> CsResult<()> {
		let roots = match self.roots.get() {
			Some(roots) => *roots,
			None => {
				let resolved = roots::ensure_roots(self.adapter.as_ref()).await?;
				*self.roots.get_or_init(|| resolved)
			}
		};

		let mut loaded: HashMap<Box<str>, ContentNode> = HashMap::new();
		for def in self.registry.list() {
			let node = match self.adapter.find_by_guid(roots.global, def.guid).await? {
				Some(node) => node,
				None => {
					let mut node =
						ContentNode::new(Some(roots.global), &def.kind, &def.display_name);
					node.guid = Some(def.guid);
					node.data = (def.default_data)();
					let node_ref = self
						.adapter
						.save(&node)
						.await
						.inspect_err(|err| {
							error!(kind = %def.kind, error = %err, "failed to provision settings instance");
						})?;
					node.node_ref = node_ref;
					info!(kind = %def.kind, node = %node_ref, "provisioned global settings instance");
					node
				}
			};
			loaded.insert(def.kind.clone(), node);
		}

		let mut global = self.global.write();
		*global = loaded;
		info!(kinds = global.len(), "settings resolver initialized");
		Ok(())
	}

	/// Global lookup. Returns the stored singleton decoded into `T`, or
	/// `T::default()` when the entry is absent or fails to decode. Never raises.
	pub fn get<T: SettingsModel>(&self) -> T {
		if self.registry.get(T::KIND).is_none() {
			// Almost certainly a programming error; loud but non-fatal.
			warn!(kind = T::KIND, "settings lookup for unregistered kind");
			return T::default();
		}

		let global = self.global.read();
		match global.get(T::KIND) {
			Some(node) => match node.decode() {
				Ok(value) => value,
				Err(err) => {
					warn!(kind = T::KIND, error = %err, "stored settings instance failed to decode");
					T::default()
				}
			},
			None => {
				debug!(kind = T::KIND, "no global settings instance, returning default");
				T::default()
			}
		}
	}

	/// Contextual lookup: the node's own override first, then each ancestor
	/// nearest-first, then the global singleton. `None` returns the default
	/// immediately without traversal. Unloadable nodes and dangling references
	/// are skipped, not errors.
	pub async fn get_for<T: SettingsModel>(&self, node: Option<NodeRef>) -> T {
		let Some(start) = node else {
			return T::default();
		};

		let property: Box<str> = self
			.registry
			.get(T::KIND)
			.map(|def| def.property.clone())
			.unwrap_or_else(|| T::KIND.into());

		if let Some(value) = self.local_override::<T>(start, &property).await {
			return value;
		}

		let ancestors = match self.adapter.ancestors(start).await {
			Ok(list) => list,
			Err(err) => {
				debug!(node = %start, error = %err, "ancestor enumeration failed");
				Vec::new()
			}
		};
		for ancestor in ancestors {
			if let Some(value) = self.local_override::<T>(ancestor, &property).await {
				return value;
			}
		}

		self.get::<T>()
	}

	/// Override attached directly to `node_ref`, if any.
	async fn local_override<T: SettingsModel>(
		&self,
		node_ref: NodeRef,
		property: &str,
	) -> Option<T> {
		let node = match self.adapter.read_node(node_ref).await {
			Ok(node) => node,
			Err(err) => {
				debug!(node = %node_ref, error = %err, "skipping unloadable node");
				return None;
			}
		};
		let target = node.reference(property)?;
		let instance = match self.adapter.read_node(target).await {
			Ok(instance) => instance,
			Err(err) => {
				debug!(node = %target, error = %err, "skipping dangling settings reference");
				return None;
			}
		};
		if instance.type_name.as_ref() != T::KIND {
			debug!(node = %target, kind = %instance.type_name, "referenced node has wrong kind");
			return None;
		}
		match instance.decode() {
			Ok(value) => Some(value),
			Err(err) => {
				warn!(kind = T::KIND, node = %target, error = %err, "settings instance failed to decode");
				None
			}
		}
	}

	/// Replace the stored singleton for the node's kind. The only runtime
	/// mutation path, invoked on host publish/save events. Updates for kinds
	/// outside the map's fixed key domain are ignored.
	pub fn update(&self, node: ContentNode) {
		let mut global = self.global.write();
		match global.get_mut(node.type_name.as_ref()) {
			Some(slot) => {
				info!(kind = %node.type_name, node = %node.node_ref, "global settings instance updated");
				*slot = node;
			}
			None => {
				debug!(kind = %node.type_name, "ignoring update for untracked kind");
			}
		}
	}

	/// Snapshot of the global settings map, for diagnostics and host UI.
	pub fn global_settings(&self) -> HashMap<Box<str>, ContentNode> {
		self.global.read().clone()
	}

	/// Anchor nodes, once `init` has run.
	pub fn roots(&self) -> Option<SettingsRoots> {
		self.roots.get().copied()
	}

	pub fn registry(&self) -> &Arc<FrozenSettingsRegistry> {
		&self.registry
	}
}

// vim: ts=4
