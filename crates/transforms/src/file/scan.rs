use crate::error::FileError;
use model::core::utils::extension_lowercase;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Expands a user selection into a flat, ordered list of files.
///
/// Files are kept as given, even with a foreign extension, so the transform
/// can report them as skipped. A directory contributes its direct children
/// whose extension matches one of `extensions` (case-insensitive), sorted by
/// name. Duplicates keep their first position.
pub fn expand_inputs(paths: &[PathBuf], extensions: &[&str]) -> Result<Vec<PathBuf>, FileError> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut children = scan_dir(path, extensions)?;
            children.sort();
            debug!(dir = %path.display(), found = children.len(), "Scanned folder");
            for child in children {
                if seen.insert(child.clone()) {
                    files.push(child);
                }
            }
        } else if path.is_file() {
            if seen.insert(path.clone()) {
                files.push(path.clone());
            }
        } else {
            return Err(FileError::NotFound(path.display().to_string()));
        }
    }

    Ok(files)
}

fn scan_dir(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, FileError> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = extension_lowercase(&path)
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(&ext)));
        if matches {
            out.push(path);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn folder_contributes_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PDF", "a.pdf", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let files = expand_inputs(&[dir.path().to_path_buf()], &["pdf"]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.PDF"]);
    }

    #[test]
    fn explicit_files_are_kept_in_order_without_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.mov");
        fs::write(&a, b"x").unwrap();
        fs::write(&b, b"x").unwrap();

        let files = expand_inputs(&[b.clone(), a.clone(), b.clone()], &["mov"]).unwrap();
        assert_eq!(files, vec![b, a]);
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = expand_inputs(&[dir.path().join("missing.mov")], &["mov"]);
        assert!(matches!(result, Err(FileError::NotFound(_))));
    }
}
