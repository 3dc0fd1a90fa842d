//! Normalization of raw access-menu payloads.
//!
//! The login endpoint may repeat a spot id within one menu, each occurrence
//! carrying a single action or a list of actions. Normalization merges
//! duplicate spots and deduplicates their action lists, preserving
//! first-seen order on both.

use std::collections::HashMap;

use serde::Deserialize;

use super::model::{AccessMenu, Menu, Spot};

/// Raw `action` field: the endpoint sends either one action or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawActions {
    One(String),
    Many(Vec<String>),
}

impl RawActions {
    fn into_vec(self) -> Vec<String> {
        match self {
            RawActions::One(action) => vec![action],
            RawActions::Many(actions) => actions,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpot {
    pub id: String,
    pub name: String,
    pub action: RawActions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMenu {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub spots: Vec<RawSpot>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccessMenu {
    pub menu: RawMenu,
}

/// Normalizes the raw access-menu payload into the domain model.
///
/// Raw spot entries sharing an id within one menu are merged into a single
/// [`Spot`] whose `action` list is the deduplicated union of the raw
/// entries' actions.
pub fn normalize_access_menu(raw: Vec<RawAccessMenu>) -> Vec<AccessMenu> {
    raw.into_iter()
        .map(|entry| {
            let RawMenu { id, name, spots } = entry.menu;

            let mut merged: Vec<Spot> = Vec::new();
            let mut index: HashMap<String, usize> = HashMap::new();

            for raw_spot in spots {
                match index.get(&raw_spot.id) {
                    Some(&at) => {
                        let spot = &mut merged[at];
                        for action in raw_spot.action.into_vec() {
                            if !spot.action.contains(&action) {
                                spot.action.push(action);
                            }
                        }
                    }
                    None => {
                        let mut actions: Vec<String> = Vec::new();
                        for action in raw_spot.action.into_vec() {
                            if !actions.contains(&action) {
                                actions.push(action);
                            }
                        }
                        index.insert(raw_spot.id.clone(), merged.len());
                        merged.push(Spot {
                            id: raw_spot.id,
                            name: raw_spot.name,
                            action: actions,
                        });
                    }
                }
            }

            AccessMenu {
                menu: Menu {
                    id,
                    name,
                    spots: merged,
                },
            }
        })
        .collect()
}
