//! Stash item capability: lookups, removal with stack splits, creation of
//! bare instances and whole composite trees, and the shared all-or-nothing
//! consumption helper used by upgrades and production starts.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{HideoutError, ItemShortfall};
use crate::profile::Profile;
use crate::types::{ItemRecord, ItemRef};

/// How multi-item consumption treats a partial failure.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConsumePolicy {
    /// Verify every removal is satisfiable before committing any of them.
    /// On shortfall nothing is consumed.
    #[default]
    Atomic,
    /// Historical behavior: attempt every removal regardless of earlier
    /// failures, and do not roll back the ones that succeeded.
    Legacy,
}

/// Structural changes produced by removing a quantity of one item.
/// A partial take splits the stack (`changed`); a full take deletes the
/// record and any children (`removed`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalOutcome {
    pub changed: Vec<ItemRecord>,
    pub removed: Vec<ItemRecord>,
}

pub fn find_item<'a>(profile: &'a Profile, item_id: &str) -> Option<&'a ItemRecord> {
    profile.stash.iter().find(|item| item.id == item_id)
}

/// Ids of `root_id` plus every transitive child in the stash arena.
fn collect_subtree_ids(profile: &Profile, root_id: &str) -> Vec<String> {
    let mut ids = vec![root_id.to_string()];
    let mut cursor = 0;
    while cursor < ids.len() {
        let parent = ids[cursor].clone();
        for item in &profile.stash {
            if item.parent_id.as_deref() == Some(parent.as_str()) {
                ids.push(item.id.clone());
            }
        }
        cursor += 1;
    }
    ids
}

/// Remove `count` units of the referenced item. Reports stack splits
/// separately from full removals. Fails without mutating when the item is
/// missing or the stack is short.
pub fn remove_item(
    profile: &mut Profile,
    item_id: &str,
    count: u32,
) -> Result<RemovalOutcome, ItemShortfall> {
    let Some(index) = profile.stash.iter().position(|i| i.id == item_id) else {
        return Err(ItemShortfall {
            item_id: item_id.to_string(),
            requested: count,
            available: 0,
        });
    };

    let available = profile.stash[index].count;
    if available < count {
        return Err(ItemShortfall {
            item_id: item_id.to_string(),
            requested: count,
            available,
        });
    }

    let mut outcome = RemovalOutcome::default();
    if available == count {
        // Full take: the record and its children leave the stash.
        let doomed = collect_subtree_ids(profile, item_id);
        let mut kept = Vec::with_capacity(profile.stash.len());
        for record in profile.stash.drain(..) {
            if doomed.contains(&record.id) {
                outcome.removed.push(record);
            } else {
                kept.push(record);
            }
        }
        profile.stash = kept;
    } else {
        let item = &mut profile.stash[index];
        item.count -= count;
        outcome.changed.push(item.clone());
    }
    Ok(outcome)
}

/// Create one bare stack in the stash and return it.
pub fn add_item(
    profile: &mut Profile,
    template_id: &str,
    count: u32,
    found_in_raid: bool,
) -> ItemRecord {
    let item = ItemRecord::bare(template_id, count, found_in_raid);
    profile.stash.push(item.clone());
    item
}

/// Insert a prepared composite tree (root plus children, fresh identities,
/// parent links already wired). Returns every record added.
pub fn add_item_tree(profile: &mut Profile, items: Vec<ItemRecord>) -> Vec<ItemRecord> {
    profile.stash.extend(items.iter().cloned());
    items
}

/// Consume every listed input under the given policy.
///
/// Returns the accumulated `(changed, removed)` records on full success. On
/// shortfall returns `InsufficientItems`; under `Legacy` the successful
/// removals stay gone, under `Atomic` the stash is untouched.
pub fn consume_items(
    profile: &mut Profile,
    items: &[ItemRef],
    policy: ConsumePolicy,
) -> Result<(Vec<ItemRecord>, Vec<ItemRecord>), HideoutError> {
    if policy == ConsumePolicy::Atomic {
        // Verify against the cumulative ask per id, so a request listing the
        // same stack twice cannot pass the check and fail mid-commit.
        let mut totals: Vec<(&str, u32)> = Vec::new();
        for request in items {
            match totals.iter_mut().find(|(id, _)| *id == request.id) {
                Some((_, total)) => *total += request.count,
                None => totals.push((request.id.as_str(), request.count)),
            }
        }
        let shortfalls: Vec<ItemShortfall> = totals
            .iter()
            .filter_map(|&(id, requested)| {
                let available = find_item(profile, id).map_or(0, |i| i.count);
                if available < requested {
                    Some(ItemShortfall {
                        item_id: id.to_string(),
                        requested,
                        available,
                    })
                } else {
                    None
                }
            })
            .collect();
        if !shortfalls.is_empty() {
            return Err(HideoutError::InsufficientItems { shortfalls });
        }
    }

    let mut changed = Vec::new();
    let mut removed = Vec::new();
    let mut shortfalls = Vec::new();
    for request in items {
        match remove_item(profile, &request.id, request.count) {
            Ok(outcome) => {
                changed.extend(outcome.changed);
                removed.extend(outcome.removed);
            }
            Err(shortfall) => {
                debug!(
                    "consume: {} of item {} unavailable ({} in stash)",
                    shortfall.requested, shortfall.item_id, shortfall.available
                );
                shortfalls.push(shortfall);
            }
        }
    }

    if shortfalls.is_empty() {
        Ok((changed, removed))
    } else {
        Err(HideoutError::InsufficientItems { shortfalls })
    }
}
