//! Read-only template repositories and their JSON seed loaders.
//!
//! Templates live in `data/seeds/*.json` so operators can tune areas,
//! recipes, and reward tables without recompiling. All historical field-name
//! variants are normalized here, at load time; use sites see one schema.

use log::info;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::errors::HideoutError;
use crate::presets::PresetRecord;
use crate::types::{AreaTemplate, AreaType, ProductionRecipe, ScavcaseRecipe};

/// Shared, immutable template data. Safe to share across profiles without
/// locking; it outlives any single request.
#[derive(Debug, Clone, Default)]
pub struct TemplateDb {
    areas: HashMap<AreaType, AreaTemplate>,
    recipes: HashMap<String, ProductionRecipe>,
    scavcase: HashMap<String, ScavcaseRecipe>,
    /// Presets keyed by their root template id.
    presets: HashMap<String, Vec<PresetRecord>>,
}

impl TemplateDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every seed file under `dir` (areas.json, recipes.json,
    /// scavcase.json, presets.json). Missing files are skipped so partial
    /// deployments and targeted tests stay easy.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, HideoutError> {
        let dir = dir.as_ref();
        let mut db = Self::new();

        let areas_path = dir.join("areas.json");
        if areas_path.exists() {
            for template in load_area_templates_from_json(&areas_path)? {
                db.insert_area(template);
            }
        }
        let recipes_path = dir.join("recipes.json");
        if recipes_path.exists() {
            for recipe in load_production_recipes_from_json(&recipes_path)? {
                db.insert_recipe(recipe);
            }
        }
        let scavcase_path = dir.join("scavcase.json");
        if scavcase_path.exists() {
            for recipe in load_scavcase_recipes_from_json(&scavcase_path)? {
                db.insert_scavcase(recipe);
            }
        }
        let presets_path = dir.join("presets.json");
        if presets_path.exists() {
            for preset in load_presets_from_json(&presets_path)? {
                db.insert_preset(preset);
            }
        }

        info!(
            "template db loaded: {} areas, {} recipes, {} scavcase, {} preset roots",
            db.areas.len(),
            db.recipes.len(),
            db.scavcase.len(),
            db.presets.len()
        );
        Ok(db)
    }

    pub fn insert_area(&mut self, template: AreaTemplate) {
        self.areas.insert(template.area_type, template);
    }

    pub fn insert_recipe(&mut self, recipe: ProductionRecipe) {
        self.recipes.insert(recipe.id.clone(), recipe);
    }

    pub fn insert_scavcase(&mut self, recipe: ScavcaseRecipe) {
        self.scavcase.insert(recipe.id.clone(), recipe);
    }

    pub fn insert_preset(&mut self, preset: PresetRecord) {
        if let Some(root) = preset.root_template() {
            self.presets
                .entry(root.to_string())
                .or_default()
                .push(preset);
        }
    }

    pub fn area_by_type(&self, area_type: AreaType) -> Option<&AreaTemplate> {
        self.areas.get(&area_type)
    }

    pub fn recipe_by_id(&self, recipe_id: &str) -> Option<&ProductionRecipe> {
        self.recipes.get(recipe_id)
    }

    pub fn scavcase_by_id(&self, recipe_id: &str) -> Option<&ScavcaseRecipe> {
        self.scavcase.get(recipe_id)
    }

    pub fn has_preset(&self, template_id: &str) -> bool {
        self.presets.contains_key(template_id)
    }

    pub fn presets_for_template(&self, template_id: &str) -> &[PresetRecord] {
        self.presets
            .get(template_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The canonical preset handed out when rewards reference `template_id`.
    pub fn encyclopedia_preset(&self, template_id: &str) -> Option<&PresetRecord> {
        self.presets_for_template(template_id)
            .iter()
            .find(|preset| preset.encyclopedia)
    }
}

fn parse_seed<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, HideoutError> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| {
        HideoutError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to parse {}: {}", path.display(), e),
        ))
    })
}

/// Load area templates from areas.json.
pub fn load_area_templates_from_json<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<AreaTemplate>, HideoutError> {
    parse_seed(path.as_ref())
}

/// Load production recipes from recipes.json.
pub fn load_production_recipes_from_json<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<ProductionRecipe>, HideoutError> {
    parse_seed(path.as_ref())
}

/// Load scavcase recipes from scavcase.json.
pub fn load_scavcase_recipes_from_json<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<ScavcaseRecipe>, HideoutError> {
    parse_seed(path.as_ref())
}

/// Load presets from presets.json.
pub fn load_presets_from_json<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<PresetRecord>, HideoutError> {
    parse_seed(path.as_ref())
}
