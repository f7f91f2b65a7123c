//! Whisper model registry and on-disk path resolution.
//!
//! [`WHISPER_MODELS`] lists the standard multilingual GGML checkpoints.
//! `SttConfig::model` names one of them by id (default `"small"`).

use std::path::PathBuf;

use crate::config::AppPaths;

/// Model id used when the configured one is unknown.
pub const DEFAULT_MODEL_ID: &str = "small";

/// Static metadata for one GGML model file.
#[derive(Debug)]
pub struct ModelInfo {
    /// Identifier used in `SttConfig::model`.
    pub id: &'static str,
    pub display_name: &'static str,
    /// File name under the models directory.
    pub file_name: &'static str,
    pub file_size_mb: u64,
    pub ram_required_mb: u64,
}

const SOURCE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

pub const WHISPER_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "tiny",
        display_name: "Whisper Tiny",
        file_name: "ggml-tiny.bin",
        file_size_mb: 75,
        ram_required_mb: 390,
    },
    ModelInfo {
        id: "base",
        display_name: "Whisper Base",
        file_name: "ggml-base.bin",
        file_size_mb: 142,
        ram_required_mb: 500,
    },
    ModelInfo {
        id: "small",
        display_name: "Whisper Small [Recommended]",
        file_name: "ggml-small.bin",
        file_size_mb: 466,
        ram_required_mb: 1_000,
    },
    ModelInfo {
        id: "medium",
        display_name: "Whisper Medium",
        file_name: "ggml-medium.bin",
        file_size_mb: 1_500,
        ram_required_mb: 2_600,
    },
    ModelInfo {
        id: "large",
        display_name: "Whisper Large-v3",
        file_name: "ggml-large-v3.bin",
        file_size_mb: 3_100,
        ram_required_mb: 4_700,
    },
];

impl ModelInfo {
    /// Direct download URL for the GGML file.
    pub fn download_url(&self) -> String {
        format!("{SOURCE_URL}/{}", self.file_name)
    }
}

/// Find a model by id.
pub fn find_model_by_id(id: &str) -> Option<&'static ModelInfo> {
    WHISPER_MODELS.iter().find(|m| m.id == id.trim())
}

/// Like [`find_model_by_id`] but falls back to [`DEFAULT_MODEL_ID`] with a
/// warning.
pub fn resolve_model(id: &str) -> &'static ModelInfo {
    find_model_by_id(id).unwrap_or_else(|| {
        log::warn!("unknown Whisper model {id:?}; using {DEFAULT_MODEL_ID:?}");
        &WHISPER_MODELS[2]
    })
}

// ---------------------------------------------------------------------------
// ModelPaths
// ---------------------------------------------------------------------------

/// Resolves model file locations under the application's models directory.
///
/// ```rust,no_run
/// use interview_coach::config::AppPaths;
/// use interview_coach::stt::{resolve_model, ModelPaths};
///
/// let paths = ModelPaths::from_app_paths(&AppPaths::new());
/// let model = resolve_model("small");
/// if !paths.is_available(model) {
///     eprintln!("download {} to {}", model.download_url(), paths.model_path(model).display());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub models_dir: PathBuf,
}

impl ModelPaths {
    pub fn from_app_paths(app_paths: &AppPaths) -> Self {
        Self {
            models_dir: app_paths.models_dir.clone(),
        }
    }

    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    pub fn model_path(&self, model: &ModelInfo) -> PathBuf {
        self.models_dir.join(model.file_name)
    }

    pub fn is_available(&self, model: &ModelInfo) -> bool {
        self.model_path(model).exists()
    }

    /// Models whose files are present on disk.
    pub fn list_local_models(&self) -> Vec<&'static ModelInfo> {
        WHISPER_MODELS
            .iter()
            .filter(|m| self.is_available(m))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_ids_are_unique() {
        let mut ids: Vec<_> = WHISPER_MODELS.iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), WHISPER_MODELS.len());
    }

    #[test]
    fn default_model_is_small() {
        assert_eq!(resolve_model(DEFAULT_MODEL_ID).file_name, "ggml-small.bin");
    }

    #[test]
    fn unknown_id_falls_back_to_default() {
        assert!(find_model_by_id("huge").is_none());
        assert_eq!(resolve_model("huge").id, DEFAULT_MODEL_ID);
    }

    #[test]
    fn download_url_ends_with_file_name() {
        let m = find_model_by_id("tiny").unwrap();
        assert!(m.download_url().ends_with("/ggml-tiny.bin"));
    }

    #[test]
    fn model_paths_join_file_name() {
        let mp = ModelPaths::new("/models");
        let p = mp.model_path(resolve_model("medium"));
        assert!(p.ends_with("ggml-medium.bin"));
        assert!(!mp.is_available(resolve_model("medium")));
    }

    #[test]
    fn list_local_models_finds_present_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ggml-base.bin"), b"stub").unwrap();
        let local = ModelPaths::new(dir.path()).list_local_models();
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].id, "base");
    }
}
