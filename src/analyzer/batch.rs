// Parallel analysis of independent files
//
// Every file gets its own AstAnalyzer, and with it its own parser session.
// Nothing is shared between files and no cross-file linking happens.

use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::{AnalysisResults, AstAnalyzer};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::utils::paths::display_path;

/// Outcome of analyzing one file in a batch
///
/// - path: file path exactly as requested
/// - hash: blake3 hex digest of the file content (empty if the read failed)
/// - results: extracted records (None on failure)
/// - error: failure reason (None on success)
#[derive(Debug, Clone, Serialize)]
pub struct BatchFileResult {
    pub path: PathBuf,
    pub hash: String,
    pub results: Option<AnalysisResults>,
    pub error: Option<String>,
}

impl BatchFileResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Analyze files in parallel using Rayon's work-stealing pool
///
/// Output order matches input order. A failed file does not fail the batch;
/// check [`BatchFileResult::error`] for each entry.
pub fn analyze_files(paths: &[PathBuf], config: &AnalyzerConfig) -> Vec<BatchFileResult> {
    paths
        .par_iter()
        .map(|path| analyze_one(path, config))
        .collect()
}

fn analyze_one(path: &Path, config: &AnalyzerConfig) -> BatchFileResult {
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(source) => {
            let error = AnalyzerError::Read {
                path: path.to_path_buf(),
                source,
            };
            return failure(path, String::new(), error);
        }
    };
    let hash = blake3::hash(&content).to_hex().to_string();
    let filename = display_path(path, config.workspace_root.as_deref());

    let mut analyzer = AstAnalyzer::with_config(config.clone());
    match analyzer.parse_source(filename, content) {
        Ok(()) => BatchFileResult {
            path: path.to_path_buf(),
            hash,
            results: Some(analyzer.results()),
            error: None,
        },
        Err(e) => failure(path, hash, e),
    }
}

fn failure(path: &Path, hash: String, error: AnalyzerError) -> BatchFileResult {
    warn!("Skipping {}: {}", path.display(), error);
    BatchFileResult {
        path: path.to_path_buf(),
        hash,
        results: None,
        error: Some(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.cc");
        let missing = temp_dir.path().join("missing.cc");
        let second = temp_dir.path().join("second.cc");
        fs::write(&first, "int one() { return 1; }").unwrap();
        fs::write(&second, "int a; int b;").unwrap();

        let paths = vec![first.clone(), missing.clone(), second.clone()];
        let results = analyze_files(&paths, &AnalyzerConfig::default());

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].path, first);
        assert_eq!(results[1].path, missing);
        assert_eq!(results[2].path, second);

        assert!(results[0].is_success());
        assert_eq!(results[0].results.as_ref().unwrap().functions.len(), 1);

        assert!(!results[1].is_success());
        assert!(results[1].results.is_none());
        assert!(results[1].hash.is_empty());

        assert_eq!(results[2].results.as_ref().unwrap().variables.len(), 2);
    }

    #[test]
    fn test_batch_survives_deeply_nested_expression() {
        let temp_dir = TempDir::new().unwrap();
        let long = temp_dir.path().join("long.cc");
        let small = temp_dir.path().join("small.cc");
        fs::write(&long, format!("int v = {};", vec!["1"; 20_000].join(" + "))).unwrap();
        fs::write(&small, "int w;").unwrap();

        let results = analyze_files(&[long, small], &AnalyzerConfig::default());

        assert!(results.iter().all(|result| result.is_success()));
        assert_eq!(results[0].results.as_ref().unwrap().variables.len(), 1);
        assert_eq!(results[1].results.as_ref().unwrap().variables[0].name, "w");
    }

    #[test]
    fn test_batch_hash_tracks_content() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.cc");
        let b = temp_dir.path().join("b.cc");
        fs::write(&a, "int x;").unwrap();
        fs::write(&b, "int x;").unwrap();

        let results = analyze_files(&[a, b], &AnalyzerConfig::default());

        assert_eq!(results[0].hash.len(), 64); // Blake3 hex is 64 chars
        assert_eq!(results[0].hash, results[1].hash);
    }

    #[test]
    fn test_batch_uses_workspace_relative_filenames() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("src")).unwrap();
        let file = temp_dir.path().join("src/main.cc");
        fs::write(&file, "int x;").unwrap();

        let config = AnalyzerConfig {
            workspace_root: Some(temp_dir.path().to_path_buf()),
            ..AnalyzerConfig::default()
        };
        let results = analyze_files(&[file], &config);
        let analysis = results[0].results.as_ref().unwrap();

        assert_eq!(analysis.filename, "src/main.cc");
        assert_eq!(analysis.variables[0].location.to_string(), "src/main.cc:1:5");
    }
}
