//! Opening, saving and exporting documents
//!
//! Text files are read directly. Anything else is a binary container and
//! goes through the toolchain's import step.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::toolchain::Toolchain;

/// Default archive name offered by the archive export prompt
pub const ARCHIVE_DEFAULT_NAME: &str = "Patch_PC.rkv";

/// Extension of plain text documents
pub const TEXT_EXTENSION: &str = "txt";

/// Extension of compiled config files
pub const COMPILED_EXTENSION: &str = "bni";

/// Name shown in the mode line for a document path
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn is_text_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == TEXT_EXTENSION)
}

/// Read the lines of a document.
///
/// A path that does not exist yields an empty document, so new files can
/// be started by name.
pub fn read_document(toolchain: &dyn Toolchain, path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        info!(path = %path.display(), "new document");
        return Ok(Vec::new());
    }

    if is_text_path(path) {
        let contents = fs::read_to_string(path)?;
        info!(path = %path.display(), "read text document");
        Ok(contents
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect())
    } else {
        let lines = toolchain.import(path)?;
        info!(path = %path.display(), lines = lines.len(), "imported document");
        Ok(lines)
    }
}

/// Path a text save actually writes to: `.txt` is appended when missing
pub fn text_save_path(path: &Path) -> PathBuf {
    if path.to_string_lossy().ends_with(".txt") {
        path.to_path_buf()
    } else {
        let mut target = path.as_os_str().to_os_string();
        target.push(".txt");
        PathBuf::from(target)
    }
}

/// Default target for a compiled export.
///
/// Compiled configs usually start with their own file name on the first
/// line; otherwise the document name gets the compiled extension.
pub fn default_export_name(lines: &[String], doc_name: &str) -> String {
    let first = lines.first().map(|line| line.trim()).unwrap_or("");
    if let Some(name) = first.rsplit(&['/', '\\'][..]).next().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if doc_name.ends_with(&format!(".{COMPILED_EXTENSION}")) {
        doc_name.to_string()
    } else {
        format!("{doc_name}.{COMPILED_EXTENSION}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;

    struct ImportOnly;

    impl Toolchain for ImportOnly {
        fn import(&self, path: &Path) -> Result<Vec<String>> {
            Ok(vec![format!("imported {}", document_name(path))])
        }

        fn compile(&self, _lines: &[String], _output: &Path) -> Result<PathBuf> {
            Err(EditorError::NotConfigured("compile"))
        }

        fn repack(&self, _intermediate: &Path, _archive: &Path) -> Result<()> {
            Err(EditorError::NotConfigured("repack"))
        }
    }

    #[test]
    fn test_text_document_read_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.txt");
        fs::write(&path, "name Unit\r\nHealth 5\r\n").unwrap();

        let lines = read_document(&ImportOnly, &path).unwrap();
        assert_eq!(lines, vec!["name Unit", "Health 5"]);
    }

    #[test]
    fn test_binary_document_is_imported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.ini");
        fs::write(&path, [0u8, 1, 2]).unwrap();

        let lines = read_document(&ImportOnly, &path).unwrap();
        assert_eq!(lines, vec!["imported unit.ini"]);
    }

    #[test]
    fn test_missing_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let lines = read_document(&ImportOnly, &dir.path().join("new.ini")).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_text_save_path() {
        assert_eq!(text_save_path(Path::new("a/unit.txt")), PathBuf::from("a/unit.txt"));
        assert_eq!(text_save_path(Path::new("a/unit.ini")), PathBuf::from("a/unit.ini.txt"));
        assert_eq!(text_save_path(Path::new("unit")), PathBuf::from("unit.txt"));
    }

    #[test]
    fn test_default_export_name() {
        let lines = vec!["C:\\game\\data\\unit.bni".to_string(), "Health 5".to_string()];
        assert_eq!(default_export_name(&lines, "unit.txt"), "unit.bni");

        let lines = vec!["data/level.bni".to_string()];
        assert_eq!(default_export_name(&lines, "x"), "level.bni");

        assert_eq!(default_export_name(&[], "unit.txt"), "unit.txt.bni");
        assert_eq!(default_export_name(&["  ".to_string()], "unit.bni"), "unit.bni");
    }

    #[test]
    fn test_document_name() {
        assert_eq!(document_name(Path::new("/a/b/unit.ini")), "unit.ini");
    }
}
