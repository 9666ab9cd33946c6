pub use cascade_types::content_adapter::ContentAdapter;
pub use cascade_types::prelude::*;

// vim: ts=4
