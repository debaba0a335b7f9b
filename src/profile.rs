//! The owned player-profile aggregate every operation mutates.
//!
//! Operations receive the profile by mutable reference; nothing here reaches
//! for ambient globals. Serialized access across requests is the store's job
//! (see `storage::ProfileStore::with_profile`).

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{
    AreaState, AreaType, Bonus, ItemRecord, ProductionState, PROFILE_SCHEMA_VERSION,
};

/// Persistent per-player state owned exclusively by that player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    /// Flat stash arena; composite items link to parents by id.
    pub stash: Vec<ItemRecord>,
    pub areas: HashMap<AreaType, AreaState>,
    /// Running or collectible jobs, keyed by recipe id.
    pub productions: HashMap<String, ProductionState>,
    /// Bonuses accumulated from completed area stages.
    pub bonuses: Vec<Bonus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl Profile {
    /// Fresh profile with every area seeded at level 0.
    pub fn new(id: &str) -> Self {
        let now = Utc::now();
        let areas = AreaType::ALL
            .iter()
            .map(|&area_type| (area_type, AreaState::new(area_type)))
            .collect();
        Self {
            id: id.to_string(),
            stash: Vec::new(),
            areas,
            productions: HashMap::new(),
            bonuses: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: PROFILE_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn area_by_type(&self, area_type: AreaType) -> Option<&AreaState> {
        self.areas.get(&area_type)
    }

    pub fn area_by_type_mut(&mut self, area_type: AreaType) -> Option<&mut AreaState> {
        self.areas.get_mut(&area_type)
    }

    pub fn production_by_id(&self, recipe_id: &str) -> Option<&ProductionState> {
        self.productions.get(recipe_id)
    }

    /// Delete a production entry, returning it if one existed.
    pub fn remove_production_by_id(&mut self, recipe_id: &str) -> Option<ProductionState> {
        self.productions.remove(recipe_id)
    }

    /// Apply a completed-stage bonus to the profile's derived state.
    /// Returns false when the bonus is not applicable; callers log and move on.
    pub fn apply_bonus(&mut self, bonus: &Bonus) -> bool {
        debug!("profile {}: applying bonus {:?}", self.id, bonus);
        self.bonuses.push(bonus.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductionState;

    #[test]
    fn new_profile_seeds_all_areas_at_level_zero() {
        let profile = Profile::new("p1");
        assert_eq!(profile.areas.len(), AreaType::ALL.len());
        assert!(profile.areas.values().all(|a| a.level == 0));
        assert!(profile.stash.is_empty());
        assert!(profile.productions.is_empty());
    }

    #[test]
    fn production_lookup_and_removal() {
        let mut profile = Profile::new("p1");
        profile.productions.insert(
            "water".to_string(),
            ProductionState::started("water", 600, 1_000),
        );

        assert!(profile.production_by_id("water").is_some());
        let removed = profile.remove_production_by_id("water");
        assert!(removed.is_some());
        assert!(profile.production_by_id("water").is_none());
        assert!(profile.remove_production_by_id("water").is_none());
    }

    #[test]
    fn apply_bonus_records_it() {
        let mut profile = Profile::new("p1");
        assert!(profile.apply_bonus(&Bonus::valued(crate::types::BonusType::StashRows, 2)));
        assert_eq!(profile.bonuses.len(), 1);
    }
}
