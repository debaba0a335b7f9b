//! Canonical pre-assembled item trees ("presets"): a weapon with its
//! attachments, substituted for a bare template when rewards materialize.
//!
//! A preset is a rooted arena of nodes with parent links by index; cloning it
//! deep-copies the arena with fresh identities and rewires the links by id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ItemRecord;

/// One node of a preset tree. `parent` indexes into the owning record's
/// `items`; the root (index 0) has none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresetNode {
    pub template_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    /// Mount point on the parent (e.g. "mod_magazine").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
}

/// A fixed composite item definition keyed by its root template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresetRecord {
    pub id: String,
    pub name: String,
    /// The canonical preset handed out for a template; at most one per
    /// template is expected to carry this flag.
    #[serde(default)]
    pub encyclopedia: bool,
    /// Arena of nodes, root first.
    pub items: Vec<PresetNode>,
}

impl PresetRecord {
    pub fn new(id: &str, name: &str, root_template: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            encyclopedia: false,
            items: vec![PresetNode {
                template_id: root_template.to_string(),
                parent: None,
                slot: None,
            }],
        }
    }

    pub fn encyclopedia(mut self) -> Self {
        self.encyclopedia = true;
        self
    }

    pub fn with_part(mut self, template_id: &str, parent: usize, slot: &str) -> Self {
        self.items.push(PresetNode {
            template_id: template_id.to_string(),
            parent: Some(parent),
            slot: Some(slot.to_string()),
        });
        self
    }

    pub fn root_template(&self) -> Option<&str> {
        self.items.first().map(|node| node.template_id.as_str())
    }

    /// Deep-copy the arena into inventory records with fresh identities,
    /// root first. `count` lands on the root stack; parts are single units.
    pub fn clone_tree(&self, count: u32, found_in_raid: bool) -> Vec<ItemRecord> {
        let ids: Vec<String> = self
            .items
            .iter()
            .map(|_| Uuid::new_v4().to_string())
            .collect();

        self.items
            .iter()
            .enumerate()
            .map(|(index, node)| ItemRecord {
                id: ids[index].clone(),
                template_id: node.template_id.clone(),
                parent_id: node.parent.and_then(|p| ids.get(p).cloned()),
                slot_id: node.slot.clone(),
                count: if index == 0 { count } else { 1 },
                found_in_raid,
            })
            .collect()
    }
}
