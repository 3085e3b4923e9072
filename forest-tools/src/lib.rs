//! # forest-tools
//!
//! Outils en ligne de commande pour les couches GeoJSON de couvert forestier.
//!
//! ## Features
//!
//! - Regroupement par type de forêt et proximité (un fichier par groupe)
//! - Découpage, fusion et nettoyage de fichiers GeoJSON / JSON
//! - Rangement par district ou par province / district / division DS
//! - Rapport d'exécution (console et JSON)
//!
//! ## Usage CLI
//!
//! ```bash
//! # Regroupement par proximité (seuil 5 km par défaut)
//! forest-tools categorize-proximity ./FST/uncategorized ./FST/categorized_proximity
//!
//! # Découpage en 4 parties
//! forest-tools split ./forest.geojson 4
//!
//! # Fusion récursive
//! forest-tools combine ./FST/categorized ./all.geojson --recursive
//! ```

pub mod cli;
pub mod config;
pub mod report;

pub use config::Config;
pub use report::{RunReport, RunStatus};
