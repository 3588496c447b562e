// Path display utilities
//
// Location filenames are either the path exactly as the caller passed it, or,
// when a workspace root is configured, the path relative to that root with
// Unix-style separators so records compare equal across platforms.

use anyhow::{Context, Result};
use std::path::{Path, MAIN_SEPARATOR};

/// Convert a path to a relative Unix-style path (with `/` separators)
///
/// Strips the workspace root prefix and converts all path separators to `/`.
///
/// # Errors
/// Fails when the file is not inside `workspace_root` or is not valid UTF-8.
///
/// # Examples
/// ```
/// use ast_analyzer::utils::paths::to_relative_unix_style;
/// use std::path::Path;
///
/// let rel = to_relative_unix_style(
///     Path::new("/home/me/project/src/main.cc"),
///     Path::new("/home/me/project"),
/// )
/// .unwrap();
/// assert_eq!(rel, "src/main.cc");
/// ```
pub fn to_relative_unix_style(path: &Path, workspace_root: &Path) -> Result<String> {
    // Canonicalize both sides when possible so symlinked roots still match;
    // fall back to the paths as given when either does not exist
    let (path_to_use, root_to_use) = match (path.canonicalize(), workspace_root.canonicalize()) {
        (Ok(canonical_path), Ok(canonical_root)) => (canonical_path, canonical_root),
        _ => (path.to_path_buf(), workspace_root.to_path_buf()),
    };

    #[cfg(windows)]
    fn strip_unc_prefix(path: &Path) -> std::path::PathBuf {
        let path_str = path.to_string_lossy();
        match path_str.strip_prefix(r"\\?\") {
            Some(stripped) => std::path::PathBuf::from(stripped),
            None => path.to_path_buf(),
        }
    }

    #[cfg(not(windows))]
    fn strip_unc_prefix(path: &Path) -> std::path::PathBuf {
        path.to_path_buf()
    }

    let normalized_path = strip_unc_prefix(&path_to_use);
    let normalized_root = strip_unc_prefix(&root_to_use);

    let relative = normalized_path
        .strip_prefix(&normalized_root)
        .with_context(|| {
            format!(
                "File path '{}' is not within workspace root '{}'",
                normalized_path.display(),
                normalized_root.display()
            )
        })?;

    let path_str = relative.to_str().context("Path contains invalid UTF-8")?;

    let unix_style = if MAIN_SEPARATOR == '\\' {
        path_str.replace('\\', "/")
    } else {
        path_str.to_string()
    };

    Ok(unix_style)
}

/// Render a path for display in a `Location`
///
/// Relative to `workspace_root` when one is given and the path lies inside
/// it, otherwise the path as given.
pub fn display_path(path: &Path, workspace_root: Option<&Path>) -> String {
    workspace_root
        .and_then(|root| to_relative_unix_style(path, root).ok())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_linux_absolute_to_relative() {
        let workspace = PathBuf::from("/home/dev/code2sql");
        let absolute = PathBuf::from("/home/dev/code2sql/src/ast_analyzer/ast_analyzer.cc");

        let result = to_relative_unix_style(&absolute, &workspace).unwrap();

        assert_eq!(result, "src/ast_analyzer/ast_analyzer.cc");
        assert_eq!(result.matches('/').count(), 2);
    }

    #[test]
    fn test_spaces_in_paths() {
        let workspace = PathBuf::from("/home/dev/my projects/code2sql");
        let absolute = PathBuf::from("/home/dev/my projects/code2sql/src/my file.cc");

        let result = to_relative_unix_style(&absolute, &workspace).unwrap();

        assert_eq!(result, "src/my file.cc");
    }

    #[test]
    fn test_root_level_file() {
        let workspace = PathBuf::from("/home/dev/code2sql");
        let absolute = PathBuf::from("/home/dev/code2sql/main.cc");

        let result = to_relative_unix_style(&absolute, &workspace).unwrap();

        assert_eq!(result, "main.cc");
        assert!(!result.contains('/'), "Root-level file has no separators");
    }

    #[test]
    fn test_file_outside_workspace_rejected() {
        let workspace = PathBuf::from("/home/dev/code2sql");
        let outside_file = PathBuf::from("/etc/passwd");

        let result = to_relative_unix_style(&outside_file, &workspace);

        assert!(result.is_err(), "Should reject files outside workspace");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("not within workspace"));
    }

    #[test]
    fn test_display_path_falls_back_to_given_path() {
        let outside = PathBuf::from("/etc/hosts.cc");
        let root = PathBuf::from("/home/dev/code2sql");

        assert_eq!(display_path(&outside, Some(root.as_path())), "/etc/hosts.cc");
        assert_eq!(display_path(Path::new("a/b.cc"), None), "a/b.cc");
        assert_eq!(
            display_path(Path::new("/home/dev/code2sql/a/b.cc"), Some(root.as_path())),
            "a/b.cc"
        );
    }
}
