//! Fusion de fichiers: concaténation de FeatureCollections et union de tables JSON

use geojson::{FeatureCollection, JsonObject};
use serde_json::Value as JsonValue;

use crate::io::feature_collection;

/// Concatène les features de plusieurs collections, dans l'ordre
pub fn combine<I>(collections: I) -> FeatureCollection
where
    I: IntoIterator<Item = FeatureCollection>,
{
    let features = collections
        .into_iter()
        .flat_map(|fc| fc.features)
        .collect();
    feature_collection(features)
}

/// Union de deux tables `clé -> objet`
///
/// Les clés de `first` viennent d'abord, puis les nouvelles clés de `second`.
/// Pour une clé commune, les champs sont fusionnés à plat, `second` l'emportant.
/// Une entrée qui n'est pas un objet compte comme un objet vide.
pub fn merge_keyed(first: &JsonObject, second: &JsonObject) -> JsonObject {
    let mut merged = JsonObject::new();

    for key in first.keys().chain(second.keys()) {
        if merged.contains_key(key) {
            continue;
        }

        let mut entry = JsonObject::new();
        for source in [first.get(key), second.get(key)] {
            if let Some(JsonValue::Object(fields)) = source {
                for (field, value) in fields {
                    entry.insert(field.clone(), value.clone());
                }
            }
        }
        merged.insert(key.clone(), JsonValue::Object(entry));
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::Feature;
    use serde_json::json;

    fn obj(value: JsonValue) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn with_ids(ids: &[u64]) -> FeatureCollection {
        feature_collection(
            ids.iter()
                .map(|id| Feature {
                    bbox: None,
                    geometry: None,
                    id: None,
                    properties: Some(obj(json!({ "objectid": id }))),
                    foreign_members: None,
                })
                .collect(),
        )
    }

    #[test]
    fn test_combine_keeps_order() {
        let combined = combine(vec![with_ids(&[1, 2]), with_ids(&[]), with_ids(&[3])]);
        let ids: Vec<_> = combined
            .features
            .iter()
            .map(|f| f.property("objectid").unwrap().as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_merge_keyed() {
        let a = obj(json!({
            "1": { "name": "Sinharaja", "district": "Galle" },
            "2": { "name": "Knuckles" }
        }));
        let b = obj(json!({
            "2": { "district": "Kandy" },
            "1": { "district": "Ratnapura" },
            "3": { "name": "Wilpattu" }
        }));

        let merged = merge_keyed(&a, &b);

        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["1", "2", "3"]);
        assert_eq!(
            merged["1"],
            json!({ "name": "Sinharaja", "district": "Ratnapura" })
        );
        assert_eq!(merged["2"], json!({ "name": "Knuckles", "district": "Kandy" }));
        assert_eq!(merged["3"], json!({ "name": "Wilpattu" }));
    }

    #[test]
    fn test_merge_keyed_non_object_entries() {
        let a = obj(json!({ "1": 42 }));
        let b = obj(json!({ "1": { "name": "x" }, "2": null }));

        let merged = merge_keyed(&a, &b);
        assert_eq!(merged["1"], json!({ "name": "x" }));
        assert_eq!(merged["2"], json!({}));
    }
}
