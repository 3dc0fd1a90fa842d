//! User profile and entitlement models.

use serde::{Deserialize, Serialize};

/// Profile and entitlement data for the logged-in user.
///
/// Serialized in camelCase to match the login endpoint's payload and the
/// persisted session layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: String,
    pub role_id: String,
    pub user_code: String,
    pub access_code: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub access_menu: Vec<AccessMenu>,
}

/// One authorized work area, granting the right to create reports against
/// the spots it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessMenu {
    pub menu: Menu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub spots: Vec<Spot>,
}

/// A physical location reports can be created against.
///
/// Invariant: within one menu, `spots` holds at most one entry per id, and
/// `action` is deduplicated (see [`super::normalize_access_menu`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub action: Vec<String>,
}
