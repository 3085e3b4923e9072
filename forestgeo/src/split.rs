//! Découpage d'une FeatureCollection en parties de taille égale

use std::path::{Path, PathBuf};

use geojson::FeatureCollection;

use crate::io::feature_collection_like;
use crate::ForestGeoError;

/// Découpe `collection` en exactement `parts` collections
///
/// Chaque partie contient `ceil(n / parts)` features, la dernière ce qui reste
/// (les parties finales peuvent être vides). Les membres de premier niveau de la
/// source (`bbox`, `name`, `crs`...) sont recopiés dans chaque partie.
pub fn split(
    collection: &FeatureCollection,
    parts: usize,
) -> Result<Vec<FeatureCollection>, ForestGeoError> {
    if parts == 0 {
        return Err(ForestGeoError::invalid_argument(
            "number of parts must be greater than 0",
        ));
    }

    let total = collection.features.len();
    let per_part = total.div_ceil(parts);

    Ok((0..parts)
        .map(|i| {
            let start = (i * per_part).min(total);
            let end = ((i + 1) * per_part).min(total);
            feature_collection_like(collection.features[start..end].to_vec(), collection)
        })
        .collect())
}

/// Chemin de la partie `idx` (0-based): `{input}_part{idx + 1}.geojson`
pub fn part_path(input: &Path, idx: usize) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(format!("_part{}.geojson", idx + 1));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::feature_collection;
    use geojson::Feature;
    use serde_json::json;

    fn numbered(n: usize) -> FeatureCollection {
        feature_collection(
            (0..n)
                .map(|i| Feature {
                    bbox: None,
                    geometry: None,
                    id: None,
                    properties: json!({ "objectid": i }).as_object().cloned(),
                    foreign_members: None,
                })
                .collect(),
        )
    }

    #[test]
    fn test_split_even() {
        let parts = split(&numbered(10), 2).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].features.len(), 5);
        assert_eq!(parts[1].features.len(), 5);
    }

    #[test]
    fn test_split_uneven_uses_ceiling() {
        let sizes: Vec<usize> = split(&numbered(10), 3)
            .unwrap()
            .iter()
            .map(|p| p.features.len())
            .collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn test_split_more_parts_than_features() {
        let sizes: Vec<usize> = split(&numbered(2), 4)
            .unwrap()
            .iter()
            .map(|p| p.features.len())
            .collect();
        assert_eq!(sizes, vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_split_preserves_order_and_members() {
        let mut source = numbered(5);
        source.foreign_members = json!({ "name": "forest" }).as_object().cloned();
        source.bbox = Some(vec![79.5, 5.9, 81.9, 9.8]);

        let parts = split(&source, 2).unwrap();
        let ids: Vec<_> = parts
            .iter()
            .flat_map(|p| p.features.iter())
            .map(|f| f.property("objectid").unwrap().as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(parts[1].foreign_members, source.foreign_members);
        assert_eq!(parts[0].bbox, source.bbox);
        assert_eq!(parts[1].bbox, source.bbox);
    }

    #[test]
    fn test_split_zero_parts() {
        assert!(split(&numbered(3), 0).is_err());
    }

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("data/forest.geojson"), 0),
            PathBuf::from("data/forest.geojson_part1.geojson")
        );
    }
}
