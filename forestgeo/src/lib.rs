//! # forestgeo
//!
//! Traitements par lots des couches GeoJSON de couvert forestier et de découpage administratif.
//!
//! ## Features
//!
//! - Regroupement par proximité (haversine, premier groupe à moins du seuil, ancre fixe)
//! - Découpage, fusion, nettoyage et extraction des propriétés
//! - Rangement par district forestier ou par province / district / division DS
//! - Types `geojson` et `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forestgeo::{io, SpatialClusterer};
//! use std::path::Path;
//!
//! let collection = io::read_collection(Path::new("forest.geojson"))?;
//! let partition = SpatialClusterer::new(5.0).cluster(collection.features);
//!
//! for (name, features) in partition.into_named_groups() {
//!     println!("{}: {} features", name, features.len());
//! }
//! ```

pub mod administrative;
pub mod cluster;
pub mod distance;
pub mod error;
pub mod feature;
pub mod gazetteer;
pub mod io;
pub mod layout;
pub mod merge;
pub mod naming;
pub mod properties;
pub mod split;

pub use cluster::{cluster, Category, Group, Partition, SpatialClusterer, DEFAULT_THRESHOLD_KM};
pub use distance::haversine_km;
pub use error::ForestGeoError;
pub use feature::{category_of, GeometryKind, DEFAULT_CATEGORY};
