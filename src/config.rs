use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Consulta";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/Consulta/ on all platforms (user-visible by design)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Consulta")
}

/// Get the face template directory
pub fn templates_dir() -> PathBuf {
    app_data_dir().join("face_templates")
}

/// Get the default encounter record store path
pub fn records_path() -> PathBuf {
    app_data_dir().join("records.json")
}

/// Workflow engine tunables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Character budget for the naive transcript-truncation summary.
    pub note_summary_chars: usize,
    /// Snippets requested per guideline retrieval query.
    pub retrieval_top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            note_summary_chars: 250,
            retrieval_top_k: 3,
        }
    }
}

/// Biometric engine tunables.
#[derive(Debug, Clone)]
pub struct BiometricConfig {
    /// Side length of the square normalized template grid.
    pub template_size: u32,
    /// Mean-squared-difference match threshold on [0,1] intensities.
    pub match_threshold: f32,
}

impl Default for BiometricConfig {
    fn default() -> Self {
        Self {
            template_size: 100,
            match_threshold: 0.25,
        }
    }
}
