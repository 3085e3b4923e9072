//! Nettoyage et extraction des propriétés de features

use geojson::{FeatureCollection, JsonObject};
use serde_json::Value as JsonValue;

/// Clé d'identifiant des features forestières
pub const OBJECT_ID_KEY: &str = "objectid";

/// Supprime les clés listées et les propriétés `null` de chaque feature
///
/// Retourne le nombre de propriétés supprimées.
pub fn strip_properties<S: AsRef<str>>(collection: &mut FeatureCollection, keys: &[S]) -> usize {
    let mut removed = 0;

    for properties in collection
        .features
        .iter_mut()
        .filter_map(|f| f.properties.as_mut())
    {
        let before = properties.len();
        for key in keys {
            properties.remove(key.as_ref());
        }
        properties.retain(|_, value| !value.is_null());
        removed += before - properties.len();
    }

    removed
}

/// Table `objectid -> propriétés` pour les features qui ont un `objectid`
///
/// En cas de doublon, la dernière feature l'emporte (à sa position d'origine).
pub fn extract_properties(collection: &FeatureCollection) -> JsonObject {
    let mut table = JsonObject::new();

    for properties in collection
        .features
        .iter()
        .filter_map(|f| f.properties.as_ref())
    {
        let Some(id) = properties.get(OBJECT_ID_KEY).and_then(object_id_text) else {
            continue;
        };
        table.insert(id, JsonValue::Object(properties.clone()));
    }

    table
}

/// Texte d'un identifiant; seul `null` est écarté (`0` reste un identifiant)
fn object_id_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
