//! Simplification des tables de divisions Grama Niladhari (GND)
//!
//! Les noms cinghalais et tamouls dispersés dans plusieurs colonnes sont
//! dédoublonnés (2 variantes au plus), les colonnes administratives renommées.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::feature::truthy_text;
use crate::ForestGeoError;

/// Nombre maximal de variantes conservées par langue
pub const MAX_NAME_VARIANTS: usize = 2;

const SINHALA_NAME_KEYS: [&str; 4] = ["name_tl_si", "gnd_name", "gnd_n", "snme_s1"];
const TAMIL_NAME_KEYS: [&str; 2] = ["snme_t1", "snme_t2"];

/// Coordonnées d'origine, recopiées telles quelles
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Coordinates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<JsonValue>,
}

/// Entrée simplifiée
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimplifiedEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<JsonValue>,
    #[serde(rename = "sinhalaNames")]
    pub sinhala_names: Vec<String>,
    #[serde(rename = "tamilNames")]
    pub tamil_names: Vec<String>,
    pub coordinates: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dsd: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gnd_no: Option<JsonValue>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<JsonValue>,
}

/// Statistiques de complétude
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifyStats {
    pub total_entries: usize,
    pub complete_entries: usize,
    pub missing_sinhala_names: usize,
    pub missing_tamil_names: usize,
    pub missing_coordinates: usize,
    pub missing_administrative_data: usize,
}

/// Simplifie un tableau d'entrées, ou les valeurs d'un objet
pub fn simplify_gazetteer(
    data: &JsonValue,
) -> Result<(Vec<SimplifiedEntry>, SimplifyStats), ForestGeoError> {
    let entries: Vec<&JsonValue> = match data {
        JsonValue::Array(items) => items.iter().collect(),
        JsonValue::Object(map) => map.values().collect(),
        _ => {
            return Err(ForestGeoError::invalid_argument(
                "unexpected JSON format: expected an array or an object",
            ))
        }
    };

    let mut stats = SimplifyStats::default();
    let cleaned = entries
        .into_iter()
        .map(|entry| simplify_entry(entry, &mut stats))
        .collect();

    Ok((cleaned, stats))
}

fn simplify_entry(entry: &JsonValue, stats: &mut SimplifyStats) -> SimplifiedEntry {
    stats.total_entries += 1;

    // Une clé présente reste dans la sortie, même à null
    let field = |key: &str| entry.get(key).cloned();
    let present = |key: &str| entry.get(key).and_then(truthy_text).is_some();

    let sinhala = unique_names(entry, &SINHALA_NAME_KEYS);
    let tamil = unique_names(entry, &TAMIL_NAME_KEYS);

    let mut complete = true;

    if sinhala.is_empty() {
        stats.missing_sinhala_names += 1;
        complete = false;
    }
    if tamil.is_empty() {
        stats.missing_tamil_names += 1;
        complete = false;
    }
    if !present("x_coordina") || !present("y_coordina") {
        stats.missing_coordinates += 1;
        complete = false;
    }
    if ["province_n", "district_n", "dsd_n", "type"]
        .iter()
        .any(|key| !present(*key))
    {
        stats.missing_administrative_data += 1;
        complete = false;
    }
    if complete {
        stats.complete_entries += 1;
    }

    SimplifiedEntry {
        unique_id: field("unique_id"),
        sinhala_names: sinhala.into_iter().take(MAX_NAME_VARIANTS).collect(),
        tamil_names: tamil.into_iter().take(MAX_NAME_VARIANTS).collect(),
        coordinates: Coordinates {
            x: field("x_coordina"),
            y: field("y_coordina"),
        },
        province: field("province_n"),
        district: field("district_n"),
        dsd: field("dsd_n"),
        gnd_no: field("gnd_no"),
        kind: field("type"),
    }
}

/// Noms non vides, rognés et dédoublonnés, dans l'ordre des colonnes
fn unique_names(entry: &JsonValue, keys: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for key in keys {
        let Some(name) = entry.get(*key).and_then(truthy_text) else {
            continue;
        };
        let name = name.trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_entry() -> JsonValue {
        json!({
            "unique_id": "GN-001",
            "name_tl_si": " ගාල්ල ",
            "gnd_name": "ගාල්ල",
            "gnd_n": "මහමෝදර",
            "snme_s1": "කොටුව",
            "snme_t1": "காலி",
            "snme_t2": "",
            "x_coordina": 80.21,
            "y_coordina": 6.03,
            "province_n": "Southern",
            "district_n": "Galle",
            "dsd_n": "Four Gravets",
            "gnd_no": "101",
            "type": "GND"
        })
    }

    #[test]
    fn test_simplify_complete_entry() {
        let (cleaned, stats) = simplify_gazetteer(&json!([complete_entry()])).unwrap();

        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.complete_entries, 1);
        let entry = &cleaned[0];
        assert_eq!(entry.sinhala_names, vec!["ගාල්ල", "මහමෝදර"]);
        assert_eq!(entry.tamil_names, vec!["காலி"]);
        assert_eq!(entry.district, Some(json!("Galle")));

        let out = serde_json::to_value(entry).unwrap();
        assert_eq!(out["sinhalaNames"], json!(["ගාල්ල", "මහමෝදර"]));
        assert_eq!(out["coordinates"], json!({ "x": 80.21, "y": 6.03 }));
        assert_eq!(out["type"], json!("GND"));
    }

    #[test]
    fn test_simplify_counts_missing_fields() {
        let data = json!({
            "a": complete_entry(),
            "b": { "unique_id": "GN-002", "x_coordina": 80.0, "y_coordina": 0, "province_n": "Western" }
        });

        let (cleaned, stats) = simplify_gazetteer(&data).unwrap();

        assert_eq!(cleaned.len(), 2);
        assert_eq!(
            stats,
            SimplifyStats {
                total_entries: 2,
                complete_entries: 1,
                missing_sinhala_names: 1,
                missing_tamil_names: 1,
                missing_coordinates: 1,
                missing_administrative_data: 1,
            }
        );
        let out = serde_json::to_value(&cleaned[1]).unwrap();
        assert!(out.get("district").is_none());
        assert_eq!(out["sinhalaNames"], json!([]));
    }

    #[test]
    fn test_simplify_keeps_null_fields() {
        let data = json!([{ "unique_id": "GN-003", "province_n": null, "x_coordina": null }]);

        let (cleaned, stats) = simplify_gazetteer(&data).unwrap();

        assert_eq!(cleaned[0].province, Some(JsonValue::Null));
        assert_eq!(stats.missing_administrative_data, 1);
        let out = serde_json::to_value(&cleaned[0]).unwrap();
        assert_eq!(out["province"], JsonValue::Null);
        assert!(out.as_object().unwrap().contains_key("province"));
        assert_eq!(out["coordinates"], json!({ "x": null }));
        assert!(out.get("district").is_none());
    }

    #[test]
    fn test_simplify_rejects_scalar() {
        assert!(simplify_gazetteer(&json!("nope")).is_err());
    }
}
