//! Rapport d'exécution avec graceful degradation
//!
//! Les échecs par fichier sont collectés ici au lieu d'interrompre le lot.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

/// Nombre d'erreurs affichées sur la console
const DISPLAYED_ERRORS: usize = 20;

/// Nombre maximal d'erreurs conservées dans le rapport
pub const MAX_STORED_ERRORS: usize = 1000;

/// Statut global de l'exécution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Tout a été traité sans erreur
    Success,
    /// Des fichiers ont échoué, d'autres ont abouti
    PartialSuccess,
    /// Rien n'a abouti
    Failed,
}

/// Erreur rattachée à un fichier
#[derive(Debug, Clone, Serialize)]
pub struct RunError {
    /// Fichier concerné
    pub file: String,
    /// Message d'erreur
    pub message: String,
}

/// Rapport complet d'une commande
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Nom de la sous-commande
    pub command: String,
    /// Durée d'exécution
    pub duration_secs: f64,
    /// Statut global
    pub status: RunStatus,

    // Entrées
    pub files_processed: usize,
    pub files_failed: usize,
    pub files_skipped: usize,
    pub features_read: usize,
    /// Features écartées (géométrie non gérée)
    pub features_dropped: usize,

    // Sorties
    pub outputs_written: usize,
    pub outputs_failed: usize,
    pub features_written: usize,

    /// Nombre total d'erreurs
    pub error_count: usize,
    /// Premières erreurs (au plus [`MAX_STORED_ERRORS`])
    pub errors: Vec<RunError>,
}

impl RunReport {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            duration_secs: 0.0,
            status: RunStatus::Success,
            files_processed: 0,
            files_failed: 0,
            files_skipped: 0,
            features_read: 0,
            features_dropped: 0,
            outputs_written: 0,
            outputs_failed: 0,
            features_written: 0,
            error_count: 0,
            errors: Vec::new(),
        }
    }

    /// Enregistre un fichier d'entrée lu avec succès
    pub fn record_input(&mut self, features: usize) {
        self.files_processed += 1;
        self.features_read += features;
    }

    /// Enregistre un fichier d'entrée en échec
    pub fn record_input_failure(&mut self, file: &Path, message: impl Into<String>) {
        self.files_processed += 1;
        self.files_failed += 1;
        self.push_error(file, message);
    }

    /// Enregistre un fichier ignoré (extension non GeoJSON)
    pub fn record_skipped(&mut self) {
        self.files_skipped += 1;
    }

    /// Enregistre des features écartées
    pub fn record_dropped(&mut self, count: usize) {
        self.features_dropped += count;
    }

    /// Enregistre un fichier de sortie écrit
    pub fn record_output(&mut self, features: usize) {
        self.outputs_written += 1;
        self.features_written += features;
    }

    /// Enregistre un fichier de sortie en échec
    pub fn record_output_failure(&mut self, file: &Path, message: impl Into<String>) {
        self.outputs_failed += 1;
        self.push_error(file, message);
    }

    fn push_error(&mut self, file: &Path, message: impl Into<String>) {
        self.error_count += 1;
        if self.errors.len() < MAX_STORED_ERRORS {
            self.errors.push(RunError {
                file: file.display().to_string(),
                message: message.into(),
            });
        }
    }

    /// Définit la durée d'exécution
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        let has_errors = self.error_count > 0;
        let has_success = self.outputs_written > 0 || self.files_processed > self.files_failed;

        self.status = if !has_errors {
            RunStatus::Success
        } else if has_success {
            RunStatus::PartialSuccess
        } else {
            RunStatus::Failed
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("REPORT - {}", self.command);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Inputs: {} processed, {} failed, {} skipped",
            self.files_processed, self.files_failed, self.files_skipped
        );
        println!(
            "Features: {} read, {} written, {} dropped",
            self.features_read, self.features_written, self.features_dropped
        );
        println!(
            "Outputs: {} written, {} failed",
            self.outputs_written, self.outputs_failed
        );

        if self.error_count > 0 {
            println!("\n--- ERRORS ({}) ---", self.error_count);
            for e in self.errors.iter().take(DISPLAYED_ERRORS) {
                println!("  [{}] {}", e.file, e.message);
            }
            if self.error_count > DISPLAYED_ERRORS {
                println!("  ... and {} more", self.error_count - DISPLAYED_ERRORS);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} inputs, {} outputs, {} features written, {} errors",
            self.command,
            self.files_processed,
            self.outputs_written,
            self.features_written,
            self.error_count
        )
    }
}
