//! Regroupement par proximité des features d'une FeatureCollection
//!
//! Un seul passage, dans l'ordre d'entrée :
//! - les Points rejoignent le **premier** groupe (ordre de création) de leur catégorie
//!   dont l'ancre est à moins de `threshold_km`, sinon ouvrent un nouveau groupe ;
//! - l'ancre d'un groupe est son premier Point et ne bouge jamais ;
//! - chaque MultiPolygon forme son propre groupe, sans calcul de distance ;
//! - les autres géométries sont ignorées (warning) sans toucher aux catégories.

use std::collections::HashMap;

use geo::Point;
use geojson::Feature;
use tracing::{debug, warn};

use crate::distance::haversine_km;
use crate::feature::{category_of, GeometryKind, DEFAULT_CATEGORY};
use crate::naming::safe_file_name;

/// Seuil de proximité par défaut (km)
pub const DEFAULT_THRESHOLD_KM: f64 = 5.0;

/// Groupe de features proches d'une même ancre
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Coordonnées du premier Point du groupe (None pour un MultiPolygon isolé)
    anchor: Option<Point<f64>>,
    features: Vec<Feature>,
}

impl Group {
    fn anchored(anchor: Point<f64>, feature: Feature) -> Self {
        Self {
            anchor: Some(anchor),
            features: vec![feature],
        }
    }

    fn singleton(feature: Feature) -> Self {
        Self {
            anchor: None,
            features: vec![feature],
        }
    }

    pub fn anchor(&self) -> Option<Point<f64>> {
        self.anchor
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }
}

/// Groupes d'une catégorie (valeur de `description`), dans l'ordre de création
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    name: String,
    groups: Vec<Group>,
}

impl Category {
    fn new(name: String) -> Self {
        Self {
            name,
            groups: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Ajoute un Point au premier groupe dont l'ancre est strictement sous le seuil
    fn push_point(&mut self, point: Point<f64>, feature: Feature, threshold_km: f64) {
        let target = self.groups.iter_mut().find(|group| {
            group
                .anchor
                .map_or(false, |anchor| haversine_km(point, anchor) < threshold_km)
        });

        match target {
            Some(group) => group.features.push(feature),
            None => self.groups.push(Group::anchored(point, feature)),
        }
    }
}

/// Résultat d'un regroupement: catégories dans l'ordre de première apparition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    categories: Vec<Category>,
    index: HashMap<String, usize>,
    dropped: usize,
}

impl Partition {
    fn category_mut(&mut self, name: String) -> &mut Category {
        let idx = match self.index.get(&name) {
            Some(&idx) => idx,
            None => {
                self.categories.push(Category::new(name.clone()));
                self.index.insert(name, self.categories.len() - 1);
                self.categories.len() - 1
            }
        };
        &mut self.categories[idx]
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.index.get(name).map(|&idx| &self.categories[idx])
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Nombre de groupes, toutes catégories confondues
    pub fn group_count(&self) -> usize {
        self.categories.iter().map(|c| c.groups.len()).sum()
    }

    /// Nombre de features regroupées
    pub fn feature_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| c.groups.iter())
            .map(Group::len)
            .sum()
    }

    /// Nombre de features ignorées (géométrie non gérée)
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Consomme la partition en `(nom de fichier sans extension, features)`,
    /// nommés `{catégorie}_group_{n}` avec n à partir de 1
    pub fn into_named_groups(self) -> Vec<(String, Vec<Feature>)> {
        self.categories
            .into_iter()
            .flat_map(|category| {
                let name = category.name;
                category
                    .groups
                    .into_iter()
                    .enumerate()
                    .map(move |(idx, group)| (group_file_stem(&name, idx), group.features))
            })
            .collect()
    }
}

/// Nom de fichier d'un groupe (index 0-based en entrée, 1-based dans le nom)
///
/// Les séparateurs de chemin d'une catégorie sont remplacés par `_`.
pub fn group_file_stem(category: &str, idx: usize) -> String {
    format!("{}_group_{}", safe_file_name(category), idx + 1)
}

/// Regroupeur par proximité et type de forêt
#[derive(Debug, Clone)]
pub struct SpatialClusterer {
    threshold_km: f64,
    default_category: String,
}

impl Default for SpatialClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_KM)
    }
}

impl SpatialClusterer {
    pub fn new(threshold_km: f64) -> Self {
        Self {
            threshold_km,
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Remplace la catégorie des features sans `description`
    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        self
    }

    pub fn threshold_km(&self) -> f64 {
        self.threshold_km
    }

    /// Construit la partition en un seul passage
    pub fn cluster<I>(&self, features: I) -> Partition
    where
        I: IntoIterator<Item = Feature>,
    {
        let mut partition = Partition::default();

        for feature in features {
            match GeometryKind::of(&feature) {
                GeometryKind::Point(point) => {
                    let name = category_of(&feature, &self.default_category);
                    partition
                        .category_mut(name)
                        .push_point(point, feature, self.threshold_km);
                }
                GeometryKind::MultiPolygon => {
                    let name = category_of(&feature, &self.default_category);
                    partition
                        .category_mut(name)
                        .groups
                        .push(Group::singleton(feature));
                }
                GeometryKind::Unsupported(kind) => {
                    warn!(geometry = %kind, "Skipping feature with unsupported geometry type");
                    partition.dropped += 1;
                }
            }
        }

        debug!(
            categories = partition.categories.len(),
            groups = partition.group_count(),
            dropped = partition.dropped,
            "Clustering done"
        );

        partition
    }
}

/// Regroupe `features` avec le seuil donné et la catégorie par défaut
pub fn cluster<I>(features: I, threshold_km: f64) -> Partition
where
    I: IntoIterator<Item = Feature>,
{
    SpatialClusterer::new(threshold_km).cluster(features)
}
