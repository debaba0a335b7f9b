//! Area upgrade lifecycle: begin/complete construction, on/off toggling, and
//! slot item placement.
//!
//! Time-based completion is evaluated lazily against stored absolute
//! timestamps; nothing here schedules anything. Callers pass `now` (epoch
//! seconds) wherever a timer is stamped or checked.

use log::{debug, warn};
use std::collections::BTreeMap;

use crate::errors::HideoutError;
use crate::inventory::{self, ConsumePolicy};
use crate::ledger::TransactionLedger;
use crate::profile::Profile;
use crate::templates::TemplateDb;
use crate::types::{AreaState, AreaType, ItemRef, ItemSnapshot, SlotSnapshot};

/// True when a running construction has reached its completion time.
pub fn is_construction_complete(state: &AreaState, now: i64) -> bool {
    state.constructing && now >= state.complete_time
}

/// Begin upgrading an area to the next level, consuming the listed inputs.
///
/// The level bump itself is deferred to [`complete_upgrade`]; this only takes
/// the items and arms the timer. Zero-duration stages arm no timer.
pub fn start_upgrade(
    db: &TemplateDb,
    profile: &mut Profile,
    area_type: AreaType,
    items: &[ItemRef],
    now: i64,
    policy: ConsumePolicy,
) -> Result<TransactionLedger, HideoutError> {
    let template = db
        .area_by_type(area_type)
        .ok_or(HideoutError::UnknownAreaTemplate(area_type))?;
    let state = profile
        .area_by_type(area_type)
        .ok_or(HideoutError::UnknownArea(area_type))?;

    if state.constructing {
        return Err(HideoutError::UpgradeInProgress(area_type));
    }
    let next_level = state.level + 1;
    let stage = template.stage(next_level).ok_or(HideoutError::StageUndefined {
        area_type,
        level: next_level,
    })?;
    let construction_time = stage.construction_time;

    let mut ledger = TransactionLedger::new();
    let (changed, removed) = inventory::consume_items(profile, items, policy)?;
    ledger.record_changed(changed);
    ledger.record_removed(removed);

    if construction_time > 0 {
        // Level is untouched until the matching complete step.
        let state = profile
            .area_by_type_mut(area_type)
            .ok_or(HideoutError::UnknownArea(area_type))?;
        state.complete_time = now + construction_time;
        state.constructing = true;
    }
    debug!(
        "profile {}: area {:?} upgrading to level {} ({}s)",
        profile.id, area_type, next_level, construction_time
    );
    profile.touch();
    Ok(ledger)
}

/// Apply a finished upgrade: bump the level one step, clear the timer, and
/// grant the stage bonuses.
///
/// Unlike the historical behavior this re-verifies the timer instead of
/// trusting the caller: a still-running construction fails with
/// `ConstructionPending`.
pub fn complete_upgrade(
    db: &TemplateDb,
    profile: &mut Profile,
    area_type: AreaType,
    now: i64,
) -> Result<(), HideoutError> {
    let template = db
        .area_by_type(area_type)
        .ok_or(HideoutError::UnknownAreaTemplate(area_type))?;
    let state = profile
        .area_by_type(area_type)
        .ok_or(HideoutError::UnknownArea(area_type))?;

    let next_level = state.level + 1;
    let stage = template.stage(next_level).ok_or(HideoutError::StageUndefined {
        area_type,
        level: next_level,
    })?;

    if state.constructing && now < state.complete_time {
        return Err(HideoutError::ConstructionPending {
            area_type,
            ready_at: state.complete_time,
        });
    }

    let bonuses = stage.bonuses.clone();
    let state = profile
        .area_by_type_mut(area_type)
        .ok_or(HideoutError::UnknownArea(area_type))?;
    state.level = next_level;
    state.complete_time = 0;
    state.constructing = false;

    for bonus in &bonuses {
        if !profile.apply_bonus(bonus) {
            warn!(
                "profile {}: bonus {:?} for area {:?} level {} did not apply",
                profile.id, bonus, area_type, next_level
            );
        }
    }
    profile.touch();
    Ok(())
}

/// Switch an area on or off. No side effects beyond the flag.
pub fn toggle_area(
    profile: &mut Profile,
    area_type: AreaType,
    enabled: bool,
) -> Result<(), HideoutError> {
    let state = profile
        .area_by_type_mut(area_type)
        .ok_or(HideoutError::UnknownArea(area_type))?;
    state.active = enabled;
    Ok(())
}

/// Relocate inventory items into area mount slots, one per position.
///
/// Slot storage and stash storage are disjoint: the stash record is removed
/// and only its snapshot lives in the slot.
pub fn add_item_to_area_slot(
    profile: &mut Profile,
    area_type: AreaType,
    items: &BTreeMap<u32, ItemRef>,
) -> Result<TransactionLedger, HideoutError> {
    if profile.area_by_type(area_type).is_none() {
        return Err(HideoutError::UnknownArea(area_type));
    }

    let mut ledger = TransactionLedger::new();
    for (&position, item_ref) in items {
        let item = inventory::find_item(profile, &item_ref.id)
            .cloned()
            .ok_or_else(|| HideoutError::UnknownItem(item_ref.id.clone()))?;
        let snapshot = ItemSnapshot {
            id: item.id.clone(),
            template_id: item.template_id.clone(),
            count: item.count,
            found_in_raid: item.found_in_raid,
        };

        let outcome = inventory::remove_item(profile, &item.id, item.count)
            .map_err(|shortfall| HideoutError::InsufficientItems {
                shortfalls: vec![shortfall],
            })?;
        ledger.record_removed(outcome.removed);

        let state = profile
            .area_by_type_mut(area_type)
            .ok_or(HideoutError::UnknownArea(area_type))?;
        state.slots.insert(
            position,
            SlotSnapshot {
                items: vec![snapshot],
            },
        );
    }
    profile.touch();
    Ok(ledger)
}

/// Re-materialize slot contents back into the stash as bare instances and
/// clear the slots.
pub fn take_item_from_area_slot(
    profile: &mut Profile,
    area_type: AreaType,
    slots: &[u32],
) -> Result<TransactionLedger, HideoutError> {
    if profile.area_by_type(area_type).is_none() {
        return Err(HideoutError::UnknownArea(area_type));
    }

    let mut ledger = TransactionLedger::new();
    for &slot in slots {
        let Some(snapshot) = profile
            .area_by_type_mut(area_type)
            .and_then(|state| state.slots.remove(&slot))
        else {
            debug!(
                "profile {}: area {:?} slot {} already empty",
                profile.id, area_type, slot
            );
            continue;
        };
        for entry in snapshot.items {
            let created =
                inventory::add_item(profile, &entry.template_id, entry.count.max(1), false);
            ledger.record_created([created]);
        }
    }
    profile.touch();
    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AreaTemplate, Bonus, BonusType, ItemRecord, ItemRequirement, Stage};

    fn workbench_db() -> TemplateDb {
        let mut db = TemplateDb::new();
        db.insert_area(
            AreaTemplate::new(AreaType::Workbench)
                .with_stage(Stage {
                    construction_time: 300,
                    requirements: vec![ItemRequirement {
                        template_id: "bolts".into(),
                        count: 5,
                    }],
                    bonuses: vec![Bonus::named(BonusType::UnlockCraft, "gunsmithing")],
                })
                .with_stage(Stage {
                    construction_time: 0,
                    requirements: Vec::new(),
                    bonuses: Vec::new(),
                }),
        );
        db
    }

    fn profile_with_bolts(count: u32) -> (Profile, String) {
        let mut profile = Profile::new("tester");
        let item = ItemRecord::bare("bolts", count, false);
        let id = item.id.clone();
        profile.stash.push(item);
        (profile, id)
    }

    #[test]
    fn start_upgrade_consumes_and_arms_timer() {
        let db = workbench_db();
        let (mut profile, bolts) = profile_with_bolts(5);

        let ledger = start_upgrade(
            &db,
            &mut profile,
            AreaType::Workbench,
            &[ItemRef::new(&bolts, 5)],
            1_000,
            ConsumePolicy::Atomic,
        )
        .expect("upgrade starts");

        assert_eq!(ledger.del.len(), 1);
        let state = profile.area_by_type(AreaType::Workbench).unwrap();
        assert!(state.constructing);
        assert_eq!(state.complete_time, 1_300);
        assert_eq!(state.level, 0, "level bump deferred to complete");
    }

    #[test]
    fn start_upgrade_shortfall_leaves_timer_unset() {
        let db = workbench_db();
        let (mut profile, bolts) = profile_with_bolts(3);

        let err = start_upgrade(
            &db,
            &mut profile,
            AreaType::Workbench,
            &[ItemRef::new(&bolts, 5)],
            1_000,
            ConsumePolicy::Atomic,
        )
        .unwrap_err();
        assert!(matches!(err, HideoutError::InsufficientItems { .. }));

        let state = profile.area_by_type(AreaType::Workbench).unwrap();
        assert!(!state.constructing);
        assert_eq!(state.complete_time, 0);
        // Atomic policy: nothing consumed either.
        assert_eq!(profile.stash[0].count, 3);
    }

    #[test]
    fn start_upgrade_legacy_shortfall_keeps_partial_consumption() {
        let db = {
            let mut db = TemplateDb::new();
            db.insert_area(AreaTemplate::new(AreaType::Workbench).with_stage(Stage {
                construction_time: 300,
                requirements: Vec::new(),
                bonuses: Vec::new(),
            }));
            db
        };
        let mut profile = Profile::new("tester");
        let bolts = ItemRecord::bare("bolts", 5, false);
        let bolts_id = bolts.id.clone();
        profile.stash.push(bolts);

        let err = start_upgrade(
            &db,
            &mut profile,
            AreaType::Workbench,
            &[ItemRef::new(&bolts_id, 5), ItemRef::new("ghost", 1)],
            1_000,
            ConsumePolicy::Legacy,
        )
        .unwrap_err();
        assert!(matches!(err, HideoutError::InsufficientItems { .. }));

        // State untouched, but the bolts are gone. Known historical behavior.
        let state = profile.area_by_type(AreaType::Workbench).unwrap();
        assert!(!state.constructing);
        assert!(profile.stash.is_empty());
    }

    #[test]
    fn start_upgrade_rejects_unknown_template_and_levels() {
        let db = workbench_db();
        let mut profile = Profile::new("tester");

        let err =
            start_upgrade(&db, &mut profile, AreaType::Vents, &[], 0, ConsumePolicy::Atomic)
                .unwrap_err();
        assert!(matches!(err, HideoutError::UnknownAreaTemplate(AreaType::Vents)));

        // Burn through both defined stages, then the next start must fail.
        profile.area_by_type_mut(AreaType::Workbench).unwrap().level = 2;
        let err = start_upgrade(
            &db,
            &mut profile,
            AreaType::Workbench,
            &[],
            0,
            ConsumePolicy::Atomic,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            HideoutError::StageUndefined {
                area_type: AreaType::Workbench,
                level: 3
            }
        ));
    }

    #[test]
    fn start_upgrade_rejects_double_start() {
        let db = workbench_db();
        let (mut profile, bolts) = profile_with_bolts(5);
        start_upgrade(
            &db,
            &mut profile,
            AreaType::Workbench,
            &[ItemRef::new(&bolts, 5)],
            1_000,
            ConsumePolicy::Atomic,
        )
        .expect("first start");

        let err = start_upgrade(
            &db,
            &mut profile,
            AreaType::Workbench,
            &[],
            1_100,
            ConsumePolicy::Atomic,
        )
        .unwrap_err();
        assert!(matches!(err, HideoutError::UpgradeInProgress(AreaType::Workbench)));
    }

    #[test]
    fn complete_upgrade_bumps_exactly_one_level() {
        let db = workbench_db();
        let (mut profile, bolts) = profile_with_bolts(5);
        start_upgrade(
            &db,
            &mut profile,
            AreaType::Workbench,
            &[ItemRef::new(&bolts, 5)],
            1_000,
            ConsumePolicy::Atomic,
        )
        .expect("start");

        complete_upgrade(&db, &mut profile, AreaType::Workbench, 1_300).expect("complete");

        let state = profile.area_by_type(AreaType::Workbench).unwrap();
        assert_eq!(state.level, 1);
        assert!(!state.constructing);
        assert_eq!(state.complete_time, 0);
        assert_eq!(profile.bonuses.len(), 1);
    }

    #[test]
    fn complete_upgrade_rejects_early_completion() {
        let db = workbench_db();
        let (mut profile, bolts) = profile_with_bolts(5);
        start_upgrade(
            &db,
            &mut profile,
            AreaType::Workbench,
            &[ItemRef::new(&bolts, 5)],
            1_000,
            ConsumePolicy::Atomic,
        )
        .expect("start");

        let err = complete_upgrade(&db, &mut profile, AreaType::Workbench, 1_299).unwrap_err();
        assert!(matches!(
            err,
            HideoutError::ConstructionPending { ready_at: 1_300, .. }
        ));
        assert_eq!(profile.area_by_type(AreaType::Workbench).unwrap().level, 0);
    }

    #[test]
    fn instant_stage_completes_without_timer() {
        let db = workbench_db();
        let (mut profile, bolts) = profile_with_bolts(5);
        start_upgrade(
            &db,
            &mut profile,
            AreaType::Workbench,
            &[ItemRef::new(&bolts, 5)],
            1_000,
            ConsumePolicy::Atomic,
        )
        .expect("start level 1");
        complete_upgrade(&db, &mut profile, AreaType::Workbench, 1_300).expect("complete level 1");

        // Stage 2 is instant: no timer armed, complete applies immediately.
        start_upgrade(
            &db,
            &mut profile,
            AreaType::Workbench,
            &[],
            2_000,
            ConsumePolicy::Atomic,
        )
        .expect("start level 2");
        let state = profile.area_by_type(AreaType::Workbench).unwrap();
        assert!(!state.constructing);
        assert_eq!(state.complete_time, 0);

        complete_upgrade(&db, &mut profile, AreaType::Workbench, 2_000).expect("complete level 2");
        assert_eq!(profile.area_by_type(AreaType::Workbench).unwrap().level, 2);
    }

    #[test]
    fn toggle_reflects_last_call() {
        let mut profile = Profile::new("tester");
        toggle_area(&mut profile, AreaType::Generator, false).expect("off");
        assert!(!profile.area_by_type(AreaType::Generator).unwrap().active);
        toggle_area(&mut profile, AreaType::Generator, true).expect("on");
        assert!(profile.area_by_type(AreaType::Generator).unwrap().active);
    }

    #[test]
    fn slot_roundtrip_relocates_item() {
        let mut profile = Profile::new("tester");
        let filter = ItemRecord::bare("water_filter", 1, true);
        let filter_id = filter.id.clone();
        profile.stash.push(filter);

        let mut placements = BTreeMap::new();
        placements.insert(0u32, ItemRef::new(&filter_id, 1));
        let ledger =
            add_item_to_area_slot(&mut profile, AreaType::WaterCollector, &placements)
                .expect("slot add");

        assert_eq!(ledger.del.len(), 1);
        assert_eq!(ledger.del[0].id, filter_id);
        assert!(profile.stash.is_empty(), "relocation, not duplication");
        let state = profile.area_by_type(AreaType::WaterCollector).unwrap();
        assert_eq!(state.slots.get(&0).map(|s| s.items.len()), Some(1));

        let ledger = take_item_from_area_slot(&mut profile, AreaType::WaterCollector, &[0])
            .expect("slot take");
        assert_eq!(ledger.new.len(), 1);
        assert_eq!(ledger.new[0].template_id, "water_filter");
        // Fresh identity, bare instance.
        assert_ne!(ledger.new[0].id, filter_id);
        let state = profile.area_by_type(AreaType::WaterCollector).unwrap();
        assert!(state.slots.is_empty());
    }

    #[test]
    fn slot_take_on_empty_slot_is_quiet() {
        let mut profile = Profile::new("tester");
        let ledger = take_item_from_area_slot(&mut profile, AreaType::Generator, &[3])
            .expect("no-op take");
        assert!(ledger.is_empty());
    }

    #[test]
    fn slot_ops_require_known_area() {
        let mut profile = Profile::new("tester");
        profile.areas.remove(&AreaType::Heating);
        let err = take_item_from_area_slot(&mut profile, AreaType::Heating, &[0]).unwrap_err();
        assert!(matches!(err, HideoutError::UnknownArea(AreaType::Heating)));
    }

    #[test]
    fn construction_completion_check() {
        let mut state = AreaState::new(AreaType::Lavatory);
        assert!(!is_construction_complete(&state, 10_000));
        state.constructing = true;
        state.complete_time = 10_000;
        assert!(!is_construction_complete(&state, 9_999));
        assert!(is_construction_complete(&state, 10_000));
    }
}
