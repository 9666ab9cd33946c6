//! In-memory content adapter
//!
//! Reference implementation of [`ContentAdapter`] over a lock-guarded node
//! table. Backs the core resolver tests and the `basic-embed` demo; also usable
//! by hosts that keep their content tree in process memory.

#![forbid(unsafe_code)]

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use cascade_types::content_adapter::ContentAdapter;
use cascade_types::prelude::*;

/// Content type assigned to registered root nodes
pub const ROOT_TYPE: &str = "ContentRoot";

#[derive(Debug)]
struct RootBinding {
	node: NodeRef,
	parent: Option<NodeRef>,
}

#[derive(Debug, Default)]
struct Store {
	nodes: HashMap<NodeRef, ContentNode>,
	roots: HashMap<Uuid, RootBinding>,
	next: u32,
}

impl Store {
	fn allocate(&mut self) -> NodeRef {
		self.next += 1;
		NodeRef(self.next)
	}

	fn insert(&mut self, mut node: ContentNode) -> NodeRef {
		let node_ref = self.allocate();
		node.node_ref = node_ref;
		self.nodes.insert(node_ref, node);
		node_ref
	}
}

#[derive(Debug, Default)]
pub struct ContentAdapterMem {
	store: RwLock<Store>,
}

impl ContentAdapterMem {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a node synchronously. Handy when building fixture trees.
	pub fn insert(&self, node: ContentNode) -> NodeRef {
		self.store.write().insert(node)
	}

	pub fn len(&self) -> usize {
		self.store.read().nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.store.read().nodes.is_empty()
	}
}

#[async_trait]
impl ContentAdapter for ContentAdapterMem {
	async fn register_root(
		&self,
		name: &str,
		guid: Uuid,
		parent: Option<NodeRef>,
	) -> CsResult<NodeRef> {
		let mut store = self.store.write();
		if let Some(binding) = store.roots.get(&guid) {
			if binding.parent == parent {
				return Ok(binding.node);
			}
			return Err(Error::Conflict(format!(
				"root '{}' ({}) is already bound under a different parent",
				name, guid
			)));
		}

		let mut node = ContentNode::new(parent, ROOT_TYPE, name);
		node.guid = Some(guid);
		let node_ref = store.insert(node);
		store.roots.insert(guid, RootBinding { node: node_ref, parent });
		debug!(root = %name, node = %node_ref, "registered content root");
		Ok(node_ref)
	}

	async fn read_node(&self, node: NodeRef) -> CsResult<ContentNode> {
		self.store.read().nodes.get(&node).cloned().ok_or(Error::NotFound)
	}

	async fn children(&self, parent: NodeRef) -> CsResult<Vec<ContentNode>> {
		let store = self.store.read();
		let mut children: Vec<ContentNode> =
			store.nodes.values().filter(|node| node.parent == Some(parent)).cloned().collect();
		children.sort_by_key(|node| node.node_ref);
		Ok(children)
	}

	async fn find_by_guid(&self, parent: NodeRef, guid: Uuid) -> CsResult<Option<ContentNode>> {
		let store = self.store.read();
		Ok(store
			.nodes
			.values()
			.find(|node| node.parent == Some(parent) && node.guid == Some(guid))
			.cloned())
	}

	async fn save(&self, node: &ContentNode) -> CsResult<NodeRef> {
		let mut store = self.store.write();
		if node.node_ref.is_new() {
			return Ok(store.insert(node.clone()));
		}
		match store.nodes.get_mut(&node.node_ref) {
			Some(slot) => {
				*slot = node.clone();
				Ok(node.node_ref)
			}
			None => Err(Error::NotFound),
		}
	}

	async fn ancestors(&self, node: NodeRef) -> CsResult<Vec<NodeRef>> {
		let store = self.store.read();
		let mut chain = Vec::new();
		let mut seen: HashSet<NodeRef> = HashSet::from([node]);
		let mut current = store.nodes.get(&node).ok_or(Error::NotFound)?.parent;
		while let Some(parent) = current {
			if !seen.insert(parent) {
				warn!(node = %parent, "cycle in parent chain, stopping ancestor walk");
				break;
			}
			chain.push(parent);
			current = store.nodes.get(&parent).and_then(|n| n.parent);
		}
		Ok(chain)
	}
}

// vim: ts=4
