//! Settings model registry
//!
//! Each settings kind is registered explicitly at startup with its stable
//! identifier, display name, and default-value constructor. The mutable
//! registry is frozen before the service is built; the frozen registry's key
//! domain never changes afterwards.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use uuid::Uuid;

use crate::prelude::*;

/// A typed settings model declared by the embedding application.
///
/// `KIND` is the content-type identifier of the model's instances and, unless
/// overridden in the definition, the name of the reference property that
/// attaches a local override to a content node.
pub trait SettingsModel: Default + Serialize + DeserializeOwned + Send + Sync + 'static {
	const KIND: &'static str;
}

/// Type alias for the default-payload constructor of a settings kind
pub type DefaultData = Box<dyn Fn() -> serde_json::Value + Send + Sync>;

/// Definition of one settings kind.
pub struct SettingsDefinition {
	/// Content-type identifier; registry key
	pub kind: Box<str>,

	/// Display name assigned to the provisioned singleton instance
	pub display_name: Box<str>,

	/// Stable identifier used to deduplicate provisioning across restarts
	pub guid: Uuid,

	/// Name of the reference property carrying local overrides.
	/// Defaults to `kind`.
	pub property: Box<str>,

	/// Constructor for the payload of a freshly provisioned instance
	pub default_data: DefaultData,
}

impl Debug for SettingsDefinition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingsDefinition")
			.field("kind", &self.kind)
			.field("display_name", &self.display_name)
			.field("guid", &self.guid)
			.field("property", &self.property)
			.finish()
	}
}

impl SettingsDefinition {
	/// Create a builder for constructing a SettingsDefinition
	pub fn builder(kind: impl Into<String>) -> SettingsDefinitionBuilder {
		SettingsDefinitionBuilder::new(kind)
	}
}

/// Builder for SettingsDefinition with fluent API
pub struct SettingsDefinitionBuilder {
	kind: String,
	display_name: Option<String>,
	guid: Option<Uuid>,
	property: Option<String>,
	default_data: Option<DefaultData>,
}

impl SettingsDefinitionBuilder {
	pub fn new(kind: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			display_name: None,
			guid: None,
			property: None,
			default_data: None,
		}
	}

	/// Set the display name (required)
	pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
		self.display_name = Some(display_name.into());
		self
	}

	/// Set the stable identifier (required)
	pub fn guid(mut self, guid: Uuid) -> Self {
		self.guid = Some(guid);
		self
	}

	/// Override the reference property name (defaults to the kind identifier)
	pub fn property(mut self, property: impl Into<String>) -> Self {
		self.property = Some(property.into());
		self
	}

	/// Set the default-payload constructor
	pub fn default_data<F>(mut self, f: F) -> Self
	where
		F: Fn() -> serde_json::Value + Send + Sync + 'static,
	{
		self.default_data = Some(Box::new(f));
		self
	}

	/// Build the SettingsDefinition
	pub fn build(self) -> CsResult<SettingsDefinition> {
		if self.kind.is_empty() {
			return Err(Error::ConfigError("Settings kind must not be empty".into()));
		}
		let display_name = self
			.display_name
			.ok_or_else(|| Error::ConfigError("Settings display name is required".into()))?;
		let guid = self
			.guid
			.ok_or_else(|| Error::ConfigError("Settings stable identifier is required".into()))?;

		let property = self.property.unwrap_or_else(|| self.kind.clone());
		let default_data = self
			.default_data
			.unwrap_or_else(|| Box::new(|| serde_json::Value::Object(serde_json::Map::new())));

		Ok(SettingsDefinition {
			kind: self.kind.into(),
			display_name: display_name.into(),
			guid,
			property: property.into(),
			default_data,
		})
	}
}

/// Mutable registry used during app initialization
pub struct SettingsRegistry {
	definitions: HashMap<Box<str>, SettingsDefinition>,
	guids: HashSet<Uuid>,
}

impl SettingsRegistry {
	pub fn new() -> Self {
		Self { definitions: HashMap::new(), guids: HashSet::new() }
	}

	/// Register a new settings definition
	pub fn register(&mut self, def: SettingsDefinition) -> CsResult<()> {
		if self.definitions.contains_key(&def.kind) {
			return Err(Error::ConfigError(format!(
				"Settings kind '{}' is already registered",
				def.kind
			)));
		}
		if !self.guids.insert(def.guid) {
			return Err(Error::ConfigError(format!(
				"Stable identifier {} is already registered",
				def.guid
			)));
		}

		debug!(kind = %def.kind, guid = %def.guid, "registering settings kind");
		self.definitions.insert(def.kind.clone(), def);
		Ok(())
	}

	/// Register a typed settings model with its declared display name and
	/// stable identifier. The default payload is the model's `Default` value.
	pub fn register_model<T: SettingsModel>(
		&mut self,
		display_name: impl Into<String>,
		guid: Uuid,
	) -> CsResult<()> {
		let def = SettingsDefinition::builder(T::KIND)
			.display_name(display_name)
			.guid(guid)
			.default_data(|| {
				serde_json::to_value(T::default()).unwrap_or(serde_json::Value::Null)
			})
			.build()?;
		self.register(def)
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenSettingsRegistry {
		info!(kinds = self.definitions.len(), "freezing settings registry");
		FrozenSettingsRegistry { definitions: self.definitions }
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

impl Default for SettingsRegistry {
	fn default() -> Self {
		Self::new()
	}
}

/// Immutable registry held by the service for its lifetime
pub struct FrozenSettingsRegistry {
	definitions: HashMap<Box<str>, SettingsDefinition>,
}

impl FrozenSettingsRegistry {
	/// Get a settings definition by kind
	pub fn get(&self, kind: &str) -> Option<&SettingsDefinition> {
		self.definitions.get(kind)
	}

	/// List all registered definitions
	pub fn list(&self) -> impl Iterator<Item = &SettingsDefinition> {
		self.definitions.values()
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde::Deserialize;

	#[derive(Debug, Default, Serialize, Deserialize)]
	struct Sample {
		label: String,
	}

	impl SettingsModel for Sample {
		const KIND: &'static str = "Sample";
	}

	fn sample_def(kind: &str, guid: Uuid) -> SettingsDefinition {
		SettingsDefinition::builder(kind)
			.display_name(kind)
			.guid(guid)
			.build()
			.unwrap()
	}

	#[test]
	fn test_property_defaults_to_kind() {
		let def = sample_def("Theme", Uuid::new_v4());
		assert_eq!(def.property.as_ref(), "Theme");

		let def = SettingsDefinition::builder("Theme")
			.display_name("Theme")
			.guid(Uuid::new_v4())
			.property("SiteTheme")
			.build()
			.unwrap();
		assert_eq!(def.property.as_ref(), "SiteTheme");
	}

	#[test]
	fn test_builder_requires_display_name_and_guid() {
		assert!(SettingsDefinition::builder("Theme").guid(Uuid::new_v4()).build().is_err());
		assert!(SettingsDefinition::builder("Theme").display_name("Theme").build().is_err());
		assert!(SettingsDefinition::builder("").display_name("x").guid(Uuid::new_v4()).build().is_err());
	}

	#[test]
	fn test_duplicate_kind_rejected() {
		let mut registry = SettingsRegistry::new();
		registry.register(sample_def("Theme", Uuid::new_v4())).unwrap();
		let err = registry.register(sample_def("Theme", Uuid::new_v4()));
		assert!(matches!(err, Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_duplicate_guid_rejected() {
		let guid = Uuid::new_v4();
		let mut registry = SettingsRegistry::new();
		registry.register(sample_def("Theme", guid)).unwrap();
		let err = registry.register(sample_def("Contact", guid));
		assert!(matches!(err, Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_register_model_uses_default_payload() {
		let mut registry = SettingsRegistry::new();
		registry.register_model::<Sample>("Sample settings", Uuid::new_v4()).unwrap();
		let frozen = registry.freeze();
		let def = frozen.get("Sample").unwrap();
		assert_eq!(def.display_name.as_ref(), "Sample settings");
		assert_eq!((def.default_data)(), serde_json::json!({ "label": "" }));
	}
}

// vim: ts=4
