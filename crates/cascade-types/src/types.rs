//! Core content-tree types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::CsResult;

/// Opaque content reference assigned by the content adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef(pub u32);

impl NodeRef {
	/// Sentinel for a node that has not been persisted yet. Adapters allocate
	/// real references starting at 1.
	pub const NEW: NodeRef = NodeRef(0);

	pub fn is_new(self) -> bool {
		self == Self::NEW
	}
}

impl std::fmt::Display for NodeRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Self {
		Self(chrono::Utc::now().timestamp())
	}
}

/// A typed property on a content node.
///
/// References must stay distinguishable from plain integers after a storage
/// round trip, so the enum keeps serde's external tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
	Bool(bool),
	Int(i64),
	Text(Box<str>),
	Reference(NodeRef),
	Json(serde_json::Value),
}

impl PropertyValue {
	/// An empty property counts as absent during settings resolution.
	pub fn is_empty(&self) -> bool {
		match self {
			PropertyValue::Text(s) => s.is_empty(),
			PropertyValue::Reference(node) => node.is_new(),
			PropertyValue::Json(value) => value.is_null(),
			_ => false,
		}
	}

	pub fn as_reference(&self) -> Option<NodeRef> {
		match self {
			PropertyValue::Reference(node) if !node.is_new() => Some(*node),
			_ => None,
		}
	}
}

/// A node in the host's content tree.
///
/// Settings instances are ordinary content nodes: their typed payload lives in
/// `data`, their stable identity (used to deduplicate provisioning across
/// restarts) in `guid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
	#[serde(rename = "id")]
	pub node_ref: NodeRef,
	pub parent: Option<NodeRef>,
	#[serde(rename = "type")]
	pub type_name: Box<str>,
	pub name: Box<str>,
	pub guid: Option<Uuid>,
	pub properties: HashMap<Box<str>, PropertyValue>,
	pub data: serde_json::Value,
	#[serde(rename = "createdAt")]
	pub created_at: Timestamp,
}

impl ContentNode {
	/// Create an unpersisted node. The adapter assigns the real reference on save.
	pub fn new(parent: Option<NodeRef>, type_name: &str, name: &str) -> Self {
		Self {
			node_ref: NodeRef::NEW,
			parent,
			type_name: type_name.into(),
			name: name.into(),
			guid: None,
			properties: HashMap::new(),
			data: serde_json::Value::Null,
			created_at: Timestamp::now(),
		}
	}

	pub fn property(&self, name: &str) -> Option<&PropertyValue> {
		self.properties.get(name)
	}

	/// Non-empty reference property, or None.
	pub fn reference(&self, name: &str) -> Option<NodeRef> {
		self.properties.get(name).and_then(PropertyValue::as_reference)
	}

	/// Decode the typed payload.
	pub fn decode<T: serde::de::DeserializeOwned>(&self) -> CsResult<T> {
		Ok(serde_json::from_value(self.data.clone())?)
	}
}


// vim: ts=4
