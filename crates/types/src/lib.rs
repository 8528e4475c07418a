//! Shared value types for Meridian data choices.
//!
//! These types are consumed by the engine (choice resolution, batch loading) and the
//! CLI. They carry no behavior that reaches outside the process: categories are
//! matched locally, selections are merged locally, and resolved values are plain data.

pub mod category;
pub mod data;
pub mod error;
pub mod selection;

pub use category::{DataCategory, any_applicable};
pub use data::Data;
pub use error::ResolveError;
pub use selection::{DataSelection, RequestProperties, merge_request_properties};

/// Request property carrying the identifier of whoever asked for the data.
pub const PROP_REQUESTER: &str = "prop.requester";

/// Choice property controlling whether a choice is offered to end users.
pub const PROP_FOR_USER: &str = "forUser";
