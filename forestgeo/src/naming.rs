//! Conventions de nommage des fichiers et répertoires produits

use std::sync::OnceLock;

use regex::Regex;

/// Remplace les séparateurs de chemin pour qu'une valeur tienne dans un seul composant
pub fn safe_file_name(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

/// Première lettre en majuscule, le reste en minuscules
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Nom de fichier complet: `{lettres}_{chiffres}_{chiffres}.geojson`
pub fn is_complete_name(file_name: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^[a-zA-Z]+_[0-9]+_[0-9]+\.geojson$").expect("valid file name pattern")
        })
        .is_match(file_name)
}
