//! Loot-box reward resolution.
//!
//! Resolution happens exactly once, when the job starts; the resolved set is
//! persisted into the production entry so collection never re-rolls.

use log::debug;
use rand::Rng;
use uuid::Uuid;

use crate::types::{ProductItem, RewardPool, ScavcaseRecipe};

/// Resolve a recipe's reward table into concrete products. Pure over the
/// supplied RNG: the same seed yields the same set.
pub fn generate_rewards(recipe: &ScavcaseRecipe, rng: &mut impl Rng) -> Vec<ProductItem> {
    let mut picks: Vec<(String, u32)> = Vec::new();

    for pool in &recipe.reward_table.pools {
        let rolls = roll_count(pool, rng);
        debug!(
            "scavcase {}: pool {} rolled {} rewards",
            recipe.id, pool.name, rolls
        );
        for _ in 0..rolls {
            if let Some(template_id) = pick_weighted(pool, rng) {
                match picks.iter_mut().find(|(tpl, _)| tpl == &template_id) {
                    Some((_, count)) => *count += 1,
                    None => picks.push((template_id, 1)),
                }
            }
        }
    }

    picks
        .into_iter()
        .map(|(template_id, count)| ProductItem {
            id: Uuid::new_v4().to_string(),
            template_id,
            count,
        })
        .collect()
}

fn roll_count(pool: &RewardPool, rng: &mut impl Rng) -> u32 {
    if pool.min_count >= pool.max_count {
        return pool.min_count;
    }
    rng.gen_range(pool.min_count..=pool.max_count)
}

/// Weighted choice over the pool's entries; `None` only for an empty pool.
fn pick_weighted(pool: &RewardPool, rng: &mut impl Rng) -> Option<String> {
    let total: u32 = pool.entries.iter().map(|entry| entry.weight).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.gen_range(0..total);
    for entry in &pool.entries {
        if roll < entry.weight {
            return Some(entry.template_id.clone());
        }
        roll -= entry.weight;
    }
    None
}
