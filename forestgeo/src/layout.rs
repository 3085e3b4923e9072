//! Opérations sur l'arborescence des fichiers (déplacement, copie en minuscules)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::ForestGeoError;

/// Bilan d'une copie
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
    pub failed: usize,
}

/// Déplace `file` dans `dir` (créé si besoin) en gardant son nom
pub fn move_into(file: &Path, dir: &Path) -> Result<PathBuf, ForestGeoError> {
    let name = file.file_name().ok_or_else(|| {
        ForestGeoError::invalid_argument(format!("not a file path: {}", file.display()))
    })?;
    fs::create_dir_all(dir)?;
    let target = dir.join(name);
    fs::rename(file, &target)?;
    debug!(from = %file.display(), to = %target.display(), "File moved");
    Ok(target)
}

/// Copie récursivement `src` dans `dest` en passant tous les noms en minuscules
///
/// Les échecs par entrée sont journalisés et comptés, la copie continue.
pub fn copy_lowercase(src: &Path, dest: &Path) -> Result<CopyStats, ForestGeoError> {
    if !src.is_dir() {
        return Err(ForestGeoError::invalid_argument(format!(
            "source directory not found: {}",
            src.display()
        )));
    }
    fs::create_dir_all(dest)?;

    let mut stats = CopyStats::default();
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error reading entry: {}", e);
                stats.failed += 1;
                continue;
            }
        };

        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(lowercase_path(relative));

        let result = if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map(|_| stats.dirs += 1)
        } else {
            fs::copy(entry.path(), &target).map(|_| stats.files += 1)
        };

        match result {
            Ok(()) => debug!(from = %entry.path().display(), to = %target.display(), "Copied"),
            Err(e) => {
                warn!("Error copying {}: {}", entry.path().display(), e);
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}

fn lowercase_path(path: &Path) -> PathBuf {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_lowercase() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("V1").join("Galle")).unwrap();
        fs::write(src.path().join("V1").join("Galle").join("FST_A.GeoJSON"), "{}").unwrap();
        fs::write(src.path().join("README.TXT"), "x").unwrap();

        let out = dest.path().join("v1_updated");
        let stats = copy_lowercase(src.path(), &out).unwrap();

        assert_eq!(stats.files, 2);
        assert_eq!(stats.dirs, 2);
        assert_eq!(stats.failed, 0);
        assert!(out.join("v1").join("galle").join("fst_a.geojson").is_file());
        assert!(out.join("readme.txt").is_file());
    }

    #[test]
    fn test_copy_lowercase_missing_source() {
        let dest = tempfile::tempdir().unwrap();
        assert!(copy_lowercase(Path::new("/nonexistent/v1"), dest.path()).is_err());
    }

    #[test]
    fn test_move_into() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.geojson");
        fs::write(&file, "{}").unwrap();

        let target = move_into(&file, &dir.path().join("complete")).unwrap();

        assert!(!file.exists());
        assert_eq!(target, dir.path().join("complete").join("a.geojson"));
        assert!(target.is_file());
    }
}
