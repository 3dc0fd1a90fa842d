//! User domain module.
//!
//! Profile and entitlement models carried inside the session record, plus
//! normalization of the raw access-menu payload the login endpoint returns.

mod model;
mod transform;

// Re-export public API
pub use model::{AccessMenu, Menu, Spot, User};
pub use transform::{RawAccessMenu, RawActions, RawMenu, RawSpot, normalize_access_menu};
