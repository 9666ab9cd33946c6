//! Core settings resolver for the Cascade subsystem.
//!
//! Hosts declare typed settings models, register them in a [`SettingsRegistry`],
//! freeze it, and hand the frozen registry plus a content adapter to
//! [`SettingsService`]. The service provisions one singleton instance per model
//! under a reserved content root, resolves the nearest applicable instance for
//! any content node, and keeps the global singletons current from host publish
//! events.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod events;
pub mod prelude;
pub mod registry;
pub mod roots;
pub mod service;

pub use registry::{
	FrozenSettingsRegistry, SettingsDefinition, SettingsDefinitionBuilder, SettingsModel,
	SettingsRegistry,
};
pub use roots::SettingsRoots;
pub use service::SettingsService;

// vim: ts=4
