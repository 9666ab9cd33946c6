//! Content adapter trait
//!
//! The resolver owns no storage. Everything it reads or writes goes through
//! this trait, implemented by the embedding host (or by one of the reference
//! adapters under `adapters/`).

use async_trait::async_trait;
use std::fmt::Debug;
use uuid::Uuid;

use crate::prelude::*;

#[async_trait]
pub trait ContentAdapter: Debug + Send + Sync {
	/// Resolve or create a named content root bound to a stable identifier.
	///
	/// Re-registration with the same identifier returns the existing node
	/// unchanged. Registration with an identifier already bound under a
	/// *different* parent is a contract violation and fails with
	/// [`Error::Conflict`].
	async fn register_root(
		&self,
		name: &str,
		guid: Uuid,
		parent: Option<NodeRef>,
	) -> CsResult<NodeRef>;

	/// Read a node by reference. [`Error::NotFound`] when missing.
	async fn read_node(&self, node: NodeRef) -> CsResult<ContentNode>;

	/// Direct children of a node.
	async fn children(&self, parent: NodeRef) -> CsResult<Vec<ContentNode>>;

	/// Find a direct child by its stable identifier.
	async fn find_by_guid(&self, parent: NodeRef, guid: Uuid) -> CsResult<Option<ContentNode>>;

	/// Create (`node_ref == NodeRef::NEW`) or update a node.
	/// Returns the definitive reference.
	async fn save(&self, node: &ContentNode) -> CsResult<NodeRef>;

	/// Ancestor references nearest-first, excluding the node itself.
	async fn ancestors(&self, node: NodeRef) -> CsResult<Vec<NodeRef>>;
}

// vim: ts=4
