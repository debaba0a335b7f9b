//! Crafting job lifecycle: start single, continuous, and scavcase jobs;
//! collect finished output.
//!
//! A production entry exists only while a job is running or awaiting
//! collection; collection always deletes it. Readiness is a lazy wall-clock
//! comparison ([`is_production_ready`]) that callers evaluate before
//! collecting; collection itself never gates on time.

use log::{debug, warn};
use rand::Rng;
use uuid::Uuid;

use crate::errors::{HideoutError, ItemShortfall};
use crate::inventory::{self, ConsumePolicy};
use crate::ledger::TransactionLedger;
use crate::profile::Profile;
use crate::scavcase;
use crate::templates::TemplateDb;
use crate::types::{ItemRef, ProductItem, ProductionState};

/// True when a job's duration has elapsed.
pub fn is_production_ready(state: &ProductionState, now: i64) -> bool {
    now >= state.start_timestamp + state.production_time
}

/// Start a one-shot crafting job: consume the inputs, resolve the output
/// up front, and insert the job entry.
pub fn start_single_production(
    db: &TemplateDb,
    profile: &mut Profile,
    recipe_id: &str,
    items: &[ItemRef],
    now: i64,
    policy: ConsumePolicy,
) -> Result<TransactionLedger, HideoutError> {
    let recipe = db
        .recipe_by_id(recipe_id)
        .ok_or_else(|| HideoutError::UnknownRecipe(recipe_id.to_string()))?;
    if profile.production_by_id(recipe_id).is_some() {
        return Err(HideoutError::ProductionInProgress(recipe_id.to_string()));
    }

    let production_time = recipe.production_time;
    let product = ProductItem {
        id: Uuid::new_v4().to_string(),
        template_id: recipe.end_product.clone(),
        count: recipe.count.max(1),
    };

    let mut ledger = TransactionLedger::new();
    let (changed, removed) = inventory::consume_items(profile, items, policy)?;
    ledger.record_changed(changed);
    ledger.record_removed(removed);

    profile.productions.insert(
        recipe_id.to_string(),
        ProductionState::started(recipe_id, production_time, now).with_products(vec![product]),
    );
    debug!(
        "profile {}: production {} started ({}s)",
        profile.id, recipe_id, production_time
    );
    profile.touch();
    Ok(ledger)
}

/// Start a continuous (repeating) job. Inputs are consumed incrementally
/// outside this crate, so no items are taken here and no products are
/// resolved until collection.
pub fn start_continuous_production(
    db: &TemplateDb,
    profile: &mut Profile,
    recipe_id: &str,
    now: i64,
) -> Result<(), HideoutError> {
    let recipe = db
        .recipe_by_id(recipe_id)
        .ok_or_else(|| HideoutError::UnknownRecipe(recipe_id.to_string()))?;
    if profile.production_by_id(recipe_id).is_some() {
        return Err(HideoutError::ProductionInProgress(recipe_id.to_string()));
    }

    profile.productions.insert(
        recipe_id.to_string(),
        ProductionState::started(recipe_id, recipe.production_time, now),
    );
    profile.touch();
    Ok(())
}

/// Start a scavcase job: take the single payment input, roll the reward
/// table exactly once, and persist the resolved products so collection never
/// re-rolls.
pub fn start_scavcase_production(
    db: &TemplateDb,
    profile: &mut Profile,
    recipe_id: &str,
    items: &[ItemRef],
    now: i64,
    rng: &mut impl Rng,
) -> Result<TransactionLedger, HideoutError> {
    let recipe = db
        .scavcase_by_id(recipe_id)
        .ok_or_else(|| HideoutError::UnknownRecipe(recipe_id.to_string()))?;
    if profile.production_by_id(recipe_id).is_some() {
        return Err(HideoutError::ProductionInProgress(recipe_id.to_string()));
    }

    // One payment stack, one removal call.
    let Some(payment) = items.first() else {
        let shortfalls = recipe
            .requirements
            .first()
            .map(|req| {
                vec![ItemShortfall {
                    item_id: req.template_id.clone(),
                    requested: req.count,
                    available: 0,
                }]
            })
            .unwrap_or_default();
        return Err(HideoutError::InsufficientItems { shortfalls });
    };

    let mut ledger = TransactionLedger::new();
    let outcome = inventory::remove_item(profile, &payment.id, payment.count).map_err(
        |shortfall| HideoutError::InsufficientItems {
            shortfalls: vec![shortfall],
        },
    )?;
    ledger.record_changed(outcome.changed);
    ledger.record_removed(outcome.removed);

    let products = scavcase::generate_rewards(recipe, rng);
    debug!(
        "profile {}: scavcase {} rolled {} product stacks",
        profile.id,
        recipe_id,
        products.len()
    );
    profile.productions.insert(
        recipe_id.to_string(),
        ProductionState::started(recipe_id, recipe.production_time, now).with_products(products),
    );
    profile.touch();
    Ok(ledger)
}

/// Collect a finished job's output into the stash and delete the entry.
///
/// At-most-once per job: the entry is deleted regardless of how product
/// materialization goes. An absent entry is a quiet no-op, and an entry with
/// no resolvable products (a stale continuous job) is cleaned up and
/// reported as empty rather than failed.
pub fn take_production(
    db: &TemplateDb,
    profile: &mut Profile,
    recipe_id: &str,
) -> Result<TransactionLedger, HideoutError> {
    let mut ledger = TransactionLedger::new();
    let Some(state) = profile.production_by_id(recipe_id) else {
        debug!(
            "profile {}: take on absent production {}",
            profile.id, recipe_id
        );
        return Ok(ledger);
    };

    let Some(products) = state.products.clone() else {
        warn!(
            "profile {}: production {} has no products; dropping remnant entry",
            profile.id, recipe_id
        );
        profile.remove_production_by_id(recipe_id);
        return Ok(ledger);
    };

    for product in products {
        let count = product.count.max(1);
        if let Some(preset) = db.encyclopedia_preset(&product.template_id) {
            let tree = preset.clone_tree(count, true);
            let created = inventory::add_item_tree(profile, tree);
            ledger.record_created(created);
        } else {
            let created = inventory::add_item(profile, &product.template_id, count, true);
            ledger.record_created([created]);
        }
    }

    profile.remove_production_by_id(recipe_id);
    profile.touch();
    Ok(ledger)
}
