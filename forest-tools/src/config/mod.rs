//! Configuration des commandes
//!
//! Ordre de résolution: valeurs par défaut, fichier JSON (`--config`),
//! variables d'environnement (éventuellement chargées depuis `.env`), options CLI.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use forestgeo::{SpatialClusterer, DEFAULT_CATEGORY, DEFAULT_THRESHOLD_KM};

/// Seuil de regroupement (km)
pub const ENV_THRESHOLD_KM: &str = "FOREST_THRESHOLD_KM";
/// Catégorie des features sans `description`
pub const ENV_DEFAULT_CATEGORY: &str = "FOREST_DEFAULT_CATEGORY";
/// Sortie de `categorize-proximity`
pub const ENV_PROXIMITY_OUTPUT: &str = "FOREST_PROXIMITY_OUTPUT";
/// Sortie de `by-district`
pub const ENV_ADMINISTRATIVE_OUTPUT: &str = "FOREST_ADMINISTRATIVE_OUTPUT";

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Distance maximale (km, exclue) entre un Point et l'ancre de son groupe
    pub threshold_km: f64,

    /// Catégorie des features sans `description`
    pub default_category: String,

    /// Répertoire de sortie par défaut de `categorize-proximity`
    pub proximity_output: PathBuf,

    /// Répertoire de sortie par défaut de `by-district`
    pub administrative_output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold_km: DEFAULT_THRESHOLD_KM,
            default_category: DEFAULT_CATEGORY.to_string(),
            proximity_output: PathBuf::from("./FST/categorized_proximity"),
            administrative_output: PathBuf::from("./FST"),
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Fichier optionnel, puis environnement, puis validation
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applique les surcharges d'environnement fournies par `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_THRESHOLD_KM) {
            self.threshold_km = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: '{}'", ENV_THRESHOLD_KM, raw))?;
        }
        if let Some(category) = lookup(ENV_DEFAULT_CATEGORY).filter(|c| !c.is_empty()) {
            self.default_category = category;
        }
        if let Some(dir) = lookup(ENV_PROXIMITY_OUTPUT).filter(|d| !d.is_empty()) {
            self.proximity_output = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_ADMINISTRATIVE_OUTPUT).filter(|d| !d.is_empty()) {
            self.administrative_output = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Remplace le seuil (option CLI)
    pub fn with_threshold(mut self, threshold_km: Option<f64>) -> Result<Self> {
        if let Some(threshold_km) = threshold_km {
            self.threshold_km = threshold_km;
            self.validate()?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold_km.is_finite() || self.threshold_km <= 0.0 {
            bail!(
                "Threshold must be a positive number of kilometres, got: {}",
                self.threshold_km
            );
        }
        if self.default_category.is_empty() {
            bail!("Default category must not be empty");
        }
        Ok(())
    }

    /// Regroupeur configuré
    pub fn clusterer(&self) -> SpatialClusterer {
        SpatialClusterer::new(self.threshold_km).with_default_category(&self.default_category)
    }
}
