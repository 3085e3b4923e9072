//! Répartition par découpage administratif
//!
//! Deux usages :
//! - les features forestières, rangées par district puis type de forêt ;
//! - les fichiers de divisions GND, rangés par province / district / division DS
//!   d'après la première feature de chaque fichier.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection};

use crate::feature::{category_of, property_str};
use crate::naming::{capitalize, safe_file_name};

/// Répertoire des features complètes (district, gfcode, objectid)
pub const CATEGORIZED_DIR: &str = "categorized";
/// Répertoire des features incomplètes
pub const UNCATEGORIZED_DIR: &str = "uncategorized";

/// Fichier à produire, chemin relatif à la racine de sortie
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub features: Vec<Feature>,
}

impl PlannedFile {
    fn new(path: PathBuf, features: Vec<Feature>) -> Self {
        Self { path, features }
    }
}

/// Plan d'écriture d'une répartition par district
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistrictPlan {
    /// Fichiers dans l'ordre d'écriture: individuels, puis combinés par type, puis par district
    pub files: Vec<PlannedFile>,
    pub categorized: usize,
    pub uncategorized: usize,
}

/// "Gall" (quelle que soit la casse) désigne le district de Galle
pub fn normalize_district(district: &str) -> String {
    let trimmed = district.trim();
    if trimmed.eq_ignore_ascii_case("gall") {
        "Galle".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Répartit les features par district et type de forêt
pub fn partition_by_district(
    collection: &FeatureCollection,
    default_category: &str,
) -> DistrictPlan {
    let mut plan = DistrictPlan::default();

    // (district, type) et district, dans l'ordre de première apparition
    let mut by_type: Vec<((String, String), Vec<Feature>)> = Vec::new();
    let mut by_type_index: HashMap<(String, String), usize> = HashMap::new();
    let mut by_district: Vec<(String, Vec<Feature>)> = Vec::new();
    let mut by_district_index: HashMap<String, usize> = HashMap::new();

    for feature in &collection.features {
        let district = property_str(feature, "district").map(|d| normalize_district(&d));
        let gfcode = property_str(feature, "gfcode");
        let objectid = property_str(feature, "objectid");

        let (Some(district), Some(gfcode), Some(objectid)) = (district, &gfcode, &objectid) else {
            let name = format!(
                "FST_{}_{}.geojson",
                gfcode.as_deref().unwrap_or("noGFCode"),
                objectid.as_deref().unwrap_or("noID")
            );
            plan.files.push(PlannedFile::new(
                Path::new(UNCATEGORIZED_DIR).join(safe_file_name(&name)),
                vec![feature.clone()],
            ));
            plan.uncategorized += 1;
            continue;
        };

        let description = category_of(feature, default_category);
        let type_dir = type_dir(&district, &description);
        let name = format!("FST_{}_{}_{}.geojson", district, gfcode, objectid);
        plan.files.push(PlannedFile::new(
            type_dir.join(safe_file_name(&name)),
            vec![feature.clone()],
        ));
        plan.categorized += 1;

        let key = (district.clone(), description);
        let idx = *by_type_index.entry(key.clone()).or_insert_with(|| {
            by_type.push((key, Vec::new()));
            by_type.len() - 1
        });
        by_type[idx].1.push(feature.clone());

        let idx = *by_district_index.entry(district.clone()).or_insert_with(|| {
            by_district.push((district, Vec::new()));
            by_district.len() - 1
        });
        by_district[idx].1.push(feature.clone());
    }

    for ((district, description), features) in by_type {
        let name = format!("FST_{}_{}_combined.geojson", district, description);
        plan.files.push(PlannedFile::new(
            type_dir(&district, &description).join(safe_file_name(&name)),
            features,
        ));
    }

    for (district, features) in by_district {
        let name = format!("FST_{}_combined.geojson", district);
        plan.files.push(PlannedFile::new(
            district_dir(&district).join(safe_file_name(&name)),
            features,
        ));
    }

    plan
}

fn district_dir(district: &str) -> PathBuf {
    Path::new(CATEGORIZED_DIR).join(safe_file_name(district))
}

fn type_dir(district: &str, description: &str) -> PathBuf {
    district_dir(district).join(safe_file_name(description))
}

/// Rattachement administratif d'un fichier de divisions GND
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdminPath {
    pub province: String,
    pub district: String,
    pub ds_division: String,
}

impl AdminPath {
    /// Lit province / district / division DS sur la première feature (noms capitalisés)
    pub fn of(collection: &FeatureCollection) -> Self {
        let first = collection.features.first();
        let read = |key: &str, default: &str| {
            let value = first
                .and_then(|f| property_str(f, key))
                .unwrap_or_else(|| default.to_string());
            safe_file_name(&capitalize(&value))
        };

        Self {
            province: read("province_name", "unknown_province"),
            district: read("district_name", "unknown_district"),
            ds_division: read("ds_division_name", "unknown_ds_division"),
        }
    }

    /// `{province}/{district}`
    pub fn district_dir(&self) -> PathBuf {
        Path::new(&self.province).join(&self.district)
    }

    /// `{province}/{district}/{ds_division}`
    pub fn division_dir(&self) -> PathBuf {
        self.district_dir().join(&self.ds_division)
    }
}

/// Fichiers combinés à produire après rangement
///
/// Retourne `(chemin relatif, fichiers sources)`: un fichier par division DS
/// (`{province}/{district}/{division}_combined.geojson`) puis un par district
/// (`{province}/{district}/{district}_combined.geojson`).
pub fn combined_targets(moved: &[(AdminPath, PathBuf)]) -> Vec<(PathBuf, Vec<PathBuf>)> {
    let mut divisions: Vec<(PathBuf, Vec<PathBuf>)> = Vec::new();
    let mut districts: Vec<(PathBuf, Vec<PathBuf>)> = Vec::new();

    for (admin, file) in moved {
        let division_target = admin
            .district_dir()
            .join(format!("{}_combined.geojson", admin.ds_division));
        push_grouped(&mut divisions, division_target, file);

        let district_target = admin
            .district_dir()
            .join(format!("{}_combined.geojson", admin.district));
        push_grouped(&mut districts, district_target, file);
    }

    divisions.extend(districts);
    divisions
}

fn push_grouped(groups: &mut Vec<(PathBuf, Vec<PathBuf>)>, target: PathBuf, file: &Path) {
    match groups.iter_mut().find(|(t, _)| *t == target) {
        Some((_, files)) => files.push(file.to_path_buf()),
        None => groups.push((target, vec![file.to_path_buf()])),
    }
}
