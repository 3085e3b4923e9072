//! Définition et implémentation des commandes CLI
//!
//! Une sous-commande par traitement:
//! - `categorize-proximity`: regroupement par type de forêt et proximité
//! - `split` / `combine` / `merge-json`: découpage et fusion de fichiers
//! - `remove-keys` / `extract-properties` / `simplify`: nettoyage des propriétés
//! - `by-district` / `organize` / `validate-names` / `lowercase-copy`: rangement

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use geojson::FeatureCollection;
use rayon::prelude::*;
use tracing::{error, info, warn};

use forestgeo::administrative::{
    combined_targets, partition_by_district, AdminPath, UNCATEGORIZED_DIR,
};
use forestgeo::io::{
    feature_collection, list_geojson, read_collection, read_json, write_collection, write_json,
};
use forestgeo::layout::{copy_lowercase, move_into};
use forestgeo::naming::is_complete_name;
use forestgeo::{gazetteer, merge, properties, split};

use crate::config::Config;
use crate::report::RunReport;

/// Répertoire des noms de fichiers conformes
pub const COMPLETE_DIR: &str = "complete";
/// Répertoire des noms de fichiers non conformes
pub const INCOMPLETE_DIR: &str = "incomplete";

#[derive(Subcommand)]
pub enum Commands {
    /// Group point features by forest type and proximity, one file per group
    CategorizeProximity {
        /// Directory containing the GeoJSON files to categorize
        input_dir: Option<PathBuf>,

        /// Output directory (défaut : ./FST/categorized_proximity)
        output_dir: Option<PathBuf>,

        /// Maximum distance (km, exclusive) between a point and its group anchor
        #[arg(long)]
        threshold_km: Option<f64>,
    },

    /// Split a FeatureCollection into N parts of equal size
    Split {
        /// GeoJSON file to split
        input: PathBuf,

        /// Number of parts
        parts: usize,
    },

    /// Concatenate every GeoJSON file of a directory into one FeatureCollection
    Combine {
        /// Directory containing the GeoJSON files
        input_dir: PathBuf,

        /// Output GeoJSON file
        output: PathBuf,

        /// Include subdirectories
        #[arg(long)]
        recursive: bool,
    },

    /// Merge two keyed JSON tables (union of keys, fields of the second file win)
    MergeJson {
        first: PathBuf,
        second: PathBuf,
    },

    /// Remove property keys (and null properties) from every GeoJSON file of a directory
    RemoveKeys {
        /// Directory containing the GeoJSON files; results go to `<DIR>_update`
        input_dir: PathBuf,

        /// Property keys to remove
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Extract an `objectid -> properties` table from a GeoJSON file
    ExtractProperties { input: PathBuf },

    /// Simplify a GND gazetteer JSON file and print completeness statistics
    Simplify { input: PathBuf },

    /// Split forest features by district and forest type
    ByDistrict {
        /// GeoJSON file to split
        input: PathBuf,

        /// Output root (défaut : ./FST)
        output_dir: Option<PathBuf>,
    },

    /// Move GND GeoJSON files into province/district/DS division folders and combine them
    Organize { input_dir: PathBuf },

    /// Move GeoJSON files into `complete/` or `incomplete/` according to their name
    ValidateNames { dir: PathBuf },

    /// Copy a directory tree with every file and directory name lower-cased
    LowercaseCopy { src: PathBuf, dest: PathBuf },
}

impl Commands {
    /// Nom de la sous-commande, pour le rapport
    pub fn name(&self) -> &'static str {
        match self {
            Commands::CategorizeProximity { .. } => "categorize-proximity",
            Commands::Split { .. } => "split",
            Commands::Combine { .. } => "combine",
            Commands::MergeJson { .. } => "merge-json",
            Commands::RemoveKeys { .. } => "remove-keys",
            Commands::ExtractProperties { .. } => "extract-properties",
            Commands::Simplify { .. } => "simplify",
            Commands::ByDistrict { .. } => "by-district",
            Commands::Organize { .. } => "organize",
            Commands::ValidateNames { .. } => "validate-names",
            Commands::LowercaseCopy { .. } => "lowercase-copy",
        }
    }
}

/// Exécute une sous-commande
pub fn run(command: Commands, config: &Config, report: &mut RunReport) -> Result<()> {
    match command {
        Commands::CategorizeProximity {
            input_dir,
            output_dir,
            threshold_km,
        } => {
            let Some(input_dir) = input_dir else {
                bail!("Please provide an input directory with GeoJSON files.");
            };
            let config = config.clone().with_threshold(threshold_km)?;
            let output_dir = output_dir.unwrap_or_else(|| config.proximity_output.clone());
            cmd_categorize_proximity(&input_dir, &output_dir, &config, report)
        }
        Commands::Split { input, parts } => cmd_split(&input, parts, report),
        Commands::Combine {
            input_dir,
            output,
            recursive,
        } => cmd_combine(&input_dir, &output, recursive, report),
        Commands::MergeJson { first, second } => {
            let output = merged_json_path(&first);
            cmd_merge_json(&first, &second, &output, report)
        }
        Commands::RemoveKeys { input_dir, keys } => {
            let output_dir = update_dir(&input_dir);
            cmd_remove_keys(&input_dir, &keys, &output_dir, report)
        }
        Commands::ExtractProperties { input } => {
            let output = properties_path(&input);
            cmd_extract_properties(&input, &output, report)
        }
        Commands::Simplify { input } => {
            let output = simplified_path(&input);
            cmd_simplify(&input, &output, report)
        }
        Commands::ByDistrict { input, output_dir } => {
            let output_dir = output_dir.unwrap_or_else(|| config.administrative_output.clone());
            cmd_by_district(&input, &output_dir, config, report)
        }
        Commands::Organize { input_dir } => cmd_organize(&input_dir, report),
        Commands::ValidateNames { dir } => cmd_validate_names(&dir, report),
        Commands::LowercaseCopy { src, dest } => cmd_lowercase_copy(&src, &dest, report),
    }
}

/// Regroupe chaque fichier GeoJSON de `input_dir` et écrit un fichier par groupe
pub fn cmd_categorize_proximity(
    input_dir: &Path,
    output_dir: &Path,
    config: &Config,
    report: &mut RunReport,
) -> Result<()> {
    info!(
        input = %input_dir.display(),
        output = %output_dir.display(),
        threshold_km = config.threshold_km,
        "Starting proximity categorization"
    );

    let listing = list_geojson(input_dir, false)
        .with_context(|| format!("Error reading files in {}", input_dir.display()))?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create {}", output_dir.display()))?;

    for skipped in &listing.skipped {
        warn!("Skipping non-GeoJSON file: {}", skipped.display());
        report.record_skipped();
    }

    let clusterer = config.clusterer();

    for file in &listing.files {
        let collection = match read_collection(file) {
            Ok(collection) => collection,
            Err(e) => {
                error!("Error reading or processing {}: {}", file.display(), e);
                report.record_input_failure(file, e.to_string());
                continue;
            }
        };

        info!("Processing file: {}", file.display());
        report.record_input(collection.features.len());

        let partition = clusterer.cluster(collection.features);
        report.record_dropped(partition.dropped());

        for (name, features) in partition.into_named_groups() {
            let path = output_dir.join(format!("{}.geojson", name));
            write_reported(&path, &feature_collection(features), report);
        }

        info!("Processed file: {}", file.display());
    }

    println!(
        "Proximity-based categorization complete: {} files, {} groups written to {}",
        listing.files.len(),
        report.outputs_written,
        output_dir.display()
    );

    Ok(())
}

/// Découpe un fichier en `parts` fichiers `{input}_part{n}.geojson`
pub fn cmd_split(input: &Path, parts: usize, report: &mut RunReport) -> Result<()> {
    let collection = read_collection(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    report.record_input(collection.features.len());

    let chunks = split::split(&collection, parts)?;
    for (idx, chunk) in chunks.iter().enumerate() {
        let path = split::part_path(input, idx);
        if write_reported(&path, chunk, report) {
            println!(
                "Created file: {} with {} features.",
                path.display(),
                chunk.features.len()
            );
        }
    }

    Ok(())
}

/// Concatène les FeatureCollections d'un répertoire dans `output`
pub fn cmd_combine(
    input_dir: &Path,
    output: &Path,
    recursive: bool,
    report: &mut RunReport,
) -> Result<()> {
    if !input_dir.is_dir() {
        bail!("Directory \"{}\" not found.", input_dir.display());
    }

    let listing = list_geojson(input_dir, recursive)?;
    if listing.files.is_empty() {
        bail!(
            "No GeoJSON files found in {}{}",
            input_dir.display(),
            if recursive { " (or its subdirectories)" } else { "" }
        );
    }

    let collections = read_all(&listing.files, report);
    let combined = merge::combine(collections);
    let count = combined.features.len();

    write_collection(output, &combined)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    report.record_output(count);
    println!("Combined GeoJSON written to: {}", output.display());

    Ok(())
}

/// Fusionne deux tables JSON indexées par clé
pub fn cmd_merge_json(
    first: &Path,
    second: &Path,
    output: &Path,
    report: &mut RunReport,
) -> Result<()> {
    let a = read_json_object(first)?;
    report.record_input(a.len());
    let b = read_json_object(second)?;
    report.record_input(b.len());

    let merged = merge::merge_keyed(&a, &b);
    let count = merged.len();
    write_json(output, &merged).with_context(|| format!("Failed to write {}", output.display()))?;
    report.record_output(count);
    println!("Combined file written to {}", output.display());

    Ok(())
}

/// Supprime des clés de propriétés dans chaque fichier de `input_dir`
pub fn cmd_remove_keys(
    input_dir: &Path,
    keys: &[String],
    output_dir: &Path,
    report: &mut RunReport,
) -> Result<()> {
    if keys.is_empty() {
        bail!("At least one property key to remove is required");
    }

    let listing = list_geojson(input_dir, false)
        .with_context(|| format!("Error reading files in {}", input_dir.display()))?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create {}", output_dir.display()))?;

    for file in &listing.files {
        let mut collection = match read_collection(file) {
            Ok(collection) => collection,
            Err(e) => {
                error!("Error reading {}: {}", file.display(), e);
                report.record_input_failure(file, e.to_string());
                continue;
            }
        };
        report.record_input(collection.features.len());

        let removed = properties::strip_properties(&mut collection, keys);
        let Some(name) = file.file_name() else {
            continue;
        };
        if write_reported(&output_dir.join(name), &collection, report) {
            info!(removed, "Processed: {}", file.display());
        }
    }

    Ok(())
}

/// Extrait la table `objectid -> propriétés`
pub fn cmd_extract_properties(input: &Path, output: &Path, report: &mut RunReport) -> Result<()> {
    let collection = read_collection(input)
        .with_context(|| format!("Error parsing GeoJSON {}", input.display()))?;
    report.record_input(collection.features.len());

    let table = properties::extract_properties(&collection);
    let count = table.len();
    write_json(output, &table).with_context(|| format!("Failed to write {}", output.display()))?;
    report.record_output(count);
    println!("Properties successfully extracted to {}", output.display());

    Ok(())
}

/// Simplifie une table GND et affiche les statistiques de complétude
pub fn cmd_simplify(input: &Path, output: &Path, report: &mut RunReport) -> Result<()> {
    let data = read_json(input)
        .with_context(|| format!("Error parsing JSON file {}", input.display()))?;
    let (cleaned, stats) = gazetteer::simplify_gazetteer(&data)?;
    report.record_input(stats.total_entries);

    write_json(output, &cleaned).with_context(|| format!("Failed to write {}", output.display()))?;
    report.record_output(cleaned.len());

    println!("Simplified data written to {}", output.display());
    println!("--- Data Stats ---");
    println!("Total Entries: {}", stats.total_entries);
    println!("Complete Entries: {}", stats.complete_entries);
    println!("Missing Sinhala Names: {}", stats.missing_sinhala_names);
    println!("Missing Tamil Names: {}", stats.missing_tamil_names);
    println!("Missing Coordinates: {}", stats.missing_coordinates);
    println!(
        "Missing Administrative Data: {}",
        stats.missing_administrative_data
    );

    Ok(())
}

/// Range les features forestières par district et type de forêt
pub fn cmd_by_district(
    input: &Path,
    output_dir: &Path,
    config: &Config,
    report: &mut RunReport,
) -> Result<()> {
    let collection = read_collection(input)
        .with_context(|| format!("Error reading or processing file {}", input.display()))?;
    report.record_input(collection.features.len());

    let plan = partition_by_district(&collection, &config.default_category);
    info!(
        categorized = plan.categorized,
        uncategorized = plan.uncategorized,
        "Features partitioned by district"
    );

    for planned in plan.files {
        let path = output_dir.join(&planned.path);
        write_reported(&path, &feature_collection(planned.features), report);
    }

    println!("GeoJSON splitting and combining complete.");
    Ok(())
}

/// Range les fichiers GND par province / district / division DS puis les combine
pub fn cmd_organize(input_dir: &Path, report: &mut RunReport) -> Result<()> {
    let listing = list_geojson(input_dir, false)
        .with_context(|| format!("Error processing files in {}", input_dir.display()))?;
    let uncategorized = input_dir.join(UNCATEGORIZED_DIR);
    std::fs::create_dir_all(&uncategorized)?;

    for skipped in &listing.skipped {
        warn!("Skipping non-GeoJSON file: {}", skipped.display());
        report.record_skipped();
    }

    let mut moved: Vec<(AdminPath, PathBuf)> = Vec::new();
    let mut loaded: HashMap<PathBuf, FeatureCollection> = HashMap::new();
    for file in &listing.files {
        let collection = match read_collection(file) {
            Ok(collection) => collection,
            Err(e) => {
                error!("Error reading or parsing file {}: {}", file.display(), e);
                report.record_input_failure(file, e.to_string());
                if let Err(e) = move_into(file, &uncategorized) {
                    error!("Error moving {} to uncategorized: {}", file.display(), e);
                }
                continue;
            }
        };
        report.record_input(collection.features.len());

        let admin = AdminPath::of(&collection);
        let target_dir = input_dir.join(admin.division_dir());
        match move_into(file, &target_dir) {
            Ok(new_path) => {
                info!("Moved file {} to {}", file.display(), target_dir.display());
                moved.push((admin, new_path.clone()));
                loaded.insert(new_path, collection);
            }
            Err(e) => {
                error!("Error moving {}: {}", file.display(), e);
                report.record_output_failure(file, e.to_string());
            }
        }
    }

    for (target, sources) in combined_targets(&moved) {
        let combined = merge::combine(sources.iter().filter_map(|s| loaded.get(s).cloned()));
        let path = input_dir.join(&target);
        if write_reported(&path, &combined, report) {
            info!("Created combined file: {}", path.display());
        }
    }

    println!("Organization and combination of GeoJSON files complete.");
    Ok(())
}

/// Trie les fichiers GeoJSON selon la conformité de leur nom
pub fn cmd_validate_names(dir: &Path, report: &mut RunReport) -> Result<()> {
    let listing = list_geojson(dir, false)
        .with_context(|| format!("Error reading directory {}", dir.display()))?;
    let complete = dir.join(COMPLETE_DIR);
    let incomplete = dir.join(INCOMPLETE_DIR);
    std::fs::create_dir_all(&complete)?;
    std::fs::create_dir_all(&incomplete)?;

    for file in &listing.files {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let target = if is_complete_name(name) {
            &complete
        } else {
            &incomplete
        };

        match move_into(file, target) {
            Ok(_) => report.record_output(0),
            Err(e) => {
                error!("Error moving file to {}: {}", target.display(), e);
                report.record_output_failure(file, e.to_string());
            }
        }
    }

    Ok(())
}

/// Copie une arborescence en minuscules
pub fn cmd_lowercase_copy(src: &Path, dest: &Path, report: &mut RunReport) -> Result<()> {
    let stats = copy_lowercase(src, dest)?;
    report.outputs_written += stats.files;
    report.outputs_failed += stats.failed;
    println!(
        "Copied {} files and {} directories to {} ({} failed)",
        stats.files,
        stats.dirs,
        dest.display(),
        stats.failed
    );
    Ok(())
}

/// Lit des collections en parallèle (ordre conservé); les échecs sont journalisés et ignorés
fn read_all(files: &[PathBuf], report: &mut RunReport) -> Vec<FeatureCollection> {
    let results: Vec<_> = files.par_iter().map(|f| read_collection(f)).collect();

    let mut collections = Vec::with_capacity(results.len());
    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(collection) => {
                report.record_input(collection.features.len());
                collections.push(collection);
            }
            Err(e) => {
                warn!("File {} is not a valid FeatureCollection: {}", file.display(), e);
                report.record_input_failure(file, e.to_string());
            }
        }
    }
    collections
}

/// Écrit une collection; un échec est journalisé et compté, sans interrompre le lot
fn write_reported(path: &Path, collection: &FeatureCollection, report: &mut RunReport) -> bool {
    match write_collection(path, collection) {
        Ok(()) => {
            info!("File saved: {}", path.display());
            report.record_output(collection.features.len());
            true
        }
        Err(e) => {
            error!("Error writing file {}: {}", path.display(), e);
            report.record_output_failure(path, e.to_string());
            false
        }
    }
}

fn read_json_object(path: &Path) -> Result<geojson::JsonObject> {
    match read_json(path).with_context(|| format!("Failed to read {}", path.display()))? {
        serde_json::Value::Object(map) => Ok(map),
        _ => bail!("{} does not contain a JSON object", path.display()),
    }
}

/// Nom de fichier sans l'extension donnée (ou sans extension du tout)
fn basename_without(path: &Path, extension: &str) -> String {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    name.strip_suffix(extension).unwrap_or(name).to_string()
}

/// `{basename(first) sans .json}_combined.json`, dans le répertoire courant
pub fn merged_json_path(first: &Path) -> PathBuf {
    PathBuf::from(format!("{}_combined.json", basename_without(first, ".json")))
}

/// `{basename(input) sans .geojson}_properties.json`, dans le répertoire courant
pub fn properties_path(input: &Path) -> PathBuf {
    PathBuf::from(format!(
        "{}_properties.json",
        basename_without(input, ".geojson")
    ))
}

/// `{input sans .json}_simplified.json`, à côté du fichier d'entrée
pub fn simplified_path(input: &Path) -> PathBuf {
    let name = format!("{}_simplified.json", basename_without(input, ".json"));
    input.with_file_name(name)
}

/// `{input_dir}_update`
pub fn update_dir(input_dir: &Path) -> PathBuf {
    let mut name = input_dir.components().as_path().as_os_str().to_owned();
    name.push("_update");
    PathBuf::from(name)
}
