//! Types d'erreurs pour le crate forestgeo

use std::path::PathBuf;

use thiserror::Error;

/// Erreurs pouvant survenir lors de la lecture, transformation ou écriture GeoJSON
#[derive(Debug, Error)]
pub enum ForestGeoError {
    /// Erreur d'I/O générique
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON illisible
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Le fichier n'est pas une FeatureCollection exploitable
    #[error("Invalid FeatureCollection in {}: {reason}", path.display())]
    InvalidCollection { path: PathBuf, reason: String },

    /// Argument invalide (seuil, nombre de parties, format d'entrée...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Échec d'écriture d'un fichier de sortie
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ForestGeoError {
    /// Crée une erreur de collection invalide avec contexte
    pub fn invalid_collection(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidCollection {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur d'argument invalide
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }
}
