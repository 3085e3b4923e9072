//! Lecture et écriture des fichiers GeoJSON / JSON

use std::fs;
use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;
use walkdir::WalkDir;

use crate::feature::{feature_from_json, GEOMETRY_KEY};
use crate::ForestGeoError;

/// Fichiers trouvés dans un répertoire
#[derive(Debug, Default)]
pub struct GeoJsonListing {
    /// Fichiers `*.geojson`, triés par nom
    pub files: Vec<PathBuf>,
    /// Autres fichiers rencontrés
    pub skipped: Vec<PathBuf>,
}

/// Vrai si le chemin a l'extension `.geojson`
pub fn is_geojson(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "geojson")
}

/// Liste les fichiers GeoJSON d'un répertoire (récursivement ou non)
pub fn list_geojson(dir: &Path, recursive: bool) -> Result<GeoJsonListing, ForestGeoError> {
    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut listing = GeoJsonListing::default();
    for entry in walker {
        let entry = entry.map_err(|e| ForestGeoError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if is_geojson(&path) {
            listing.files.push(path);
        } else {
            listing.skipped.push(path);
        }
    }

    Ok(listing)
}

/// Lit une FeatureCollection complète depuis un fichier
pub fn read_collection(path: &Path) -> Result<FeatureCollection, ForestGeoError> {
    let content = fs::read_to_string(path)?;
    parse_collection(path, &content)
}

/// Parse une FeatureCollection; `path` ne sert qu'aux messages d'erreur.
///
/// L'enveloppe doit être valide; chaque feature est lue séparément, si bien
/// qu'une géométrie non reconnue ne rejette pas tout le fichier.
pub fn parse_collection(path: &Path, content: &str) -> Result<FeatureCollection, ForestGeoError> {
    let value: JsonValue = serde_json::from_str(content)
        .map_err(|e| ForestGeoError::invalid_collection(path, e.to_string()))?;

    let JsonValue::Object(mut envelope) = value else {
        return Err(ForestGeoError::invalid_collection(path, "expected a JSON object"));
    };
    let features = envelope.insert("features".to_string(), JsonValue::Array(Vec::new()));
    let Some(JsonValue::Array(items)) = features else {
        return Err(ForestGeoError::invalid_collection(path, "'features' should be an array"));
    };

    let mut collection = FeatureCollection::try_from(envelope)
        .map_err(|e| ForestGeoError::invalid_collection(path, e.to_string()))?;

    collection.features = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            feature_from_json(item).map_err(|e| {
                ForestGeoError::invalid_collection(path, format!("feature #{}: {}", idx, e))
            })
        })
        .collect::<Result<_, _>>()?;

    let unreadable = collection
        .features
        .iter()
        .filter(|f| {
            f.foreign_members
                .as_ref()
                .map_or(false, |m| f.geometry.is_none() && m.contains_key(GEOMETRY_KEY))
        })
        .count();
    if unreadable > 0 {
        debug!(path = %path.display(), unreadable, "Unrecognized geometries kept as raw JSON");
    }

    Ok(collection)
}

/// Lit un document JSON quelconque
pub fn read_json(path: &Path) -> Result<JsonValue, ForestGeoError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// FeatureCollection sans bbox ni membres étrangers
pub fn feature_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// FeatureCollection reprenant les membres de premier niveau (`bbox`, `name`,
/// `crs`...) d'une collection source
pub fn feature_collection_like(
    features: Vec<Feature>,
    source: &FeatureCollection,
) -> FeatureCollection {
    FeatureCollection {
        bbox: source.bbox.clone(),
        features,
        foreign_members: source.foreign_members.clone(),
    }
}

/// Écrit une FeatureCollection (JSON indenté de 2 espaces), en créant les répertoires parents
pub fn write_collection(path: &Path, collection: &FeatureCollection) -> Result<(), ForestGeoError> {
    // Passer par `Value`: une géométrie brute des membres étrangers remplace
    // alors le `geometry: null` au lieu de dupliquer la clé
    let value = serde_json::to_value(collection)?;
    write_json(path, &value)
}

/// Écrit une valeur sérialisable en JSON indenté, en créant les répertoires parents
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ForestGeoError> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ForestGeoError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, json).map_err(|source| ForestGeoError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "File saved");
    Ok(())
}
