// Utilities Module
//
// Helpers shared by the analyzer library and the `ast_parser` binary.

/// File utilities
pub mod file_utils {
    use crate::language::SourceLanguage;
    use std::path::{Path, PathBuf};
    use walkdir::WalkDir;

    /// Check if a file has a C or C++ source extension
    pub fn is_supported_file(path: &Path) -> bool {
        SourceLanguage::from_path(path).is_some()
    }

    /// Expand a file or directory argument into the source files it names
    ///
    /// A file is returned as-is, whatever its extension. A directory is walked
    /// recursively and only recognised C/C++ sources are kept, sorted so the
    /// output order does not depend on the filesystem.
    pub fn collect_source_files(root: &Path) -> Vec<PathBuf> {
        if !root.is_dir() {
            return vec![root.to_path_buf()];
        }

        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_supported_file(path))
            .collect();
        files.sort();
        files
    }
}

/// Path conversion utilities (absolute ↔ relative Unix-style)
pub mod paths;
