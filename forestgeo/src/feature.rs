//! Modèle de feature: géométrie fermée et lecture des propriétés

use geo::Point;
use geojson::{Feature, Geometry, JsonObject, Value};
use serde_json::Value as JsonValue;

/// Catégorie attribuée aux features sans `description` exploitable
pub const DEFAULT_CATEGORY: &str = "noForestType";

/// Propriété qui porte le type de forêt
pub const CATEGORY_KEY: &str = "description";

/// Membre GeoJSON de la géométrie; une géométrie non reconnue y reste brute
pub const GEOMETRY_KEY: &str = "geometry";

/// Géométrie d'une feature, réduite aux deux cas réellement traités
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryKind {
    /// Point (longitude, latitude) en degrés
    Point(Point<f64>),
    /// MultiPolygon, jamais regroupé par distance
    MultiPolygon,
    /// Tout le reste, avec le nom du type GeoJSON (ou "null")
    Unsupported(String),
}

impl GeometryKind {
    /// Classe la géométrie d'une feature
    pub fn of(feature: &Feature) -> Self {
        let Some(ref geometry) = feature.geometry else {
            return Self::Unsupported(raw_geometry_type(feature).unwrap_or("null").to_string());
        };

        match &geometry.value {
            Value::Point(coords) if coords.len() >= 2 => {
                Self::Point(Point::new(coords[0], coords[1]))
            }
            Value::MultiPolygon(_) => Self::MultiPolygon,
            other => Self::Unsupported(type_name(other).to_string()),
        }
    }
}

/// Type déclaré d'une géométrie conservée brute
fn raw_geometry_type(feature: &Feature) -> Option<&str> {
    let raw = feature.foreign_members.as_ref()?.get(GEOMETRY_KEY)?;
    Some(raw.get("type").and_then(JsonValue::as_str).unwrap_or("unknown"))
}

/// Construit une feature depuis son JSON, sans échouer sur la géométrie.
///
/// Une géométrie que `geojson` refuse (type inconnu comme `Circle`, Point à une
/// seule coordonnée...) est gardée telle quelle dans les membres étrangers, sous
/// [`GEOMETRY_KEY`]: la feature est alors classée [`GeometryKind::Unsupported`]
/// et ré-écrite à l'identique. Seule une feature mal formée hors géométrie
/// (pas un objet, `type` différent de `Feature`, `properties` invalide) est une erreur.
pub fn feature_from_json(value: JsonValue) -> Result<Feature, geojson::Error> {
    let JsonValue::Object(mut object) = value else {
        return Feature::try_from(value);
    };

    let raw = object.insert(GEOMETRY_KEY.to_string(), JsonValue::Null);
    let mut feature = Feature::try_from(object)?;

    match raw {
        None | Some(JsonValue::Null) => {}
        Some(raw) => match Geometry::try_from(raw.clone()) {
            Ok(geometry) => feature.geometry = Some(geometry),
            Err(_) => {
                feature
                    .foreign_members
                    .get_or_insert_with(JsonObject::new)
                    .insert(GEOMETRY_KEY.to_string(), raw);
            }
        },
    }

    Ok(feature)
}

/// Nom GeoJSON d'une géométrie
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Texte d'une valeur JSON « vraie » (ni null, ni false, ni 0, ni chaîne vide)
pub fn truthy_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null | JsonValue::Bool(false) => None,
        JsonValue::Bool(true) => Some("true".to_string()),
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) if n.as_f64() == Some(0.0) => None,
        JsonValue::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Valeur brute d'une propriété
pub fn property<'a>(feature: &'a Feature, key: &str) -> Option<&'a JsonValue> {
    feature.properties.as_ref()?.get(key)
}

/// Propriété texte, rognée et non vide
pub fn property_str(feature: &Feature, key: &str) -> Option<String> {
    let text = truthy_text(property(feature, key)?)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Catégorie d'une feature: sa `description`, ou `default` si absente ou vide
pub fn category_of(feature: &Feature, default: &str) -> String {
    property(feature, CATEGORY_KEY)
        .and_then(truthy_text)
        .unwrap_or_else(|| default.to_string())
}
