//! Shared types, adapter traits, and core utilities for the Cascade settings
//! subsystem.
//!
//! This crate contains the foundational types shared between the core resolver
//! and all content-adapter implementations. Keeping them in a separate crate
//! lets adapter crates compile in parallel with the resolver.

pub mod content_adapter;
pub mod error;
pub mod prelude;
pub mod types;

// vim: ts=4
