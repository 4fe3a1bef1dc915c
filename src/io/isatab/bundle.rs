//! Discovery of the files that make up an ISA-Tab bundle.

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of investigation file names.
pub const INVESTIGATION_PREFIX: &str = "i_";
/// Prefix of study table file names.
pub const STUDY_PREFIX: &str = "s_";
/// Prefix of assay table file names.
pub const ASSAY_PREFIX: &str = "a_";
/// Extension shared by all bundle members.
pub const TABLE_EXTENSION: &str = ".txt";

/// An ISA-Tab bundle on disk: one directory with exactly one investigation
/// file and the study and assay tables it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularBundle {
    root: PathBuf,
    investigation: PathBuf,
    members: Vec<PathBuf>,
}

impl TabularBundle {
    /// Opens the bundle rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if `root` cannot be listed and [`Error::Parse`]
    /// if it does not contain exactly one `i_*.txt` file.
    pub fn open(root: &Path) -> Result<Self> {
        let mut investigations = Vec::new();
        let mut members = Vec::new();

        for name in list_files(root)? {
            if is_member(&name, INVESTIGATION_PREFIX) {
                investigations.push(root.join(&name));
            } else if is_member(&name, STUDY_PREFIX) || is_member(&name, ASSAY_PREFIX) {
                members.push(root.join(&name));
            }
        }

        let investigation = match investigations.len() {
            1 => investigations.remove(0),
            0 => {
                return Err(Error::parse(
                    root.display().to_string(),
                    None,
                    "no investigation file (i_*.txt) found",
                ));
            },
            n => {
                return Err(Error::parse(
                    root.display().to_string(),
                    None,
                    format!("expected one investigation file, found {n}"),
                ));
            },
        };

        Ok(Self {
            root: root.to_path_buf(),
            investigation,
            members,
        })
    }

    /// Returns the bundle directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the investigation file path.
    #[must_use]
    pub fn investigation(&self) -> &Path {
        &self.investigation
    }

    /// Returns every `s_*.txt` and `a_*.txt` file found in the directory,
    /// sorted by name.
    #[must_use]
    pub fn members(&self) -> &[PathBuf] {
        &self.members
    }

    /// Resolves a study or assay file named by the investigation file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the name is unsafe or the file is missing.
    pub fn table_path(&self, name: &str) -> Result<PathBuf> {
        let investigation = file_name(&self.investigation);
        if !is_safe_filename(name) {
            return Err(Error::parse(
                investigation,
                None,
                format!("unsafe table file name '{name}'"),
            ));
        }
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(Error::parse(
                investigation,
                None,
                format!("referenced file '{name}' is missing"),
            ));
        }
        Ok(path)
    }
}

/// Lists the regular files of `dir`, sorted by name.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory cannot be read.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io("read_bundle_dir", dir, &e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io("read_bundle_dir", dir, &e))?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Returns true if `name` looks like a bundle member with `prefix`.
#[must_use]
pub fn is_member(name: &str, prefix: &str) -> bool {
    name.starts_with(prefix) && name.ends_with(TABLE_EXTENSION) && name.len() > prefix.len()
}

/// Returns true if `name` is a plain file name that stays inside the bundle.
#[must_use]
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && !name.starts_with('.')
}

/// Returns the final component of `path` for use in messages.
#[must_use]
pub fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("s_study.txt", true ; "plain")]
    #[test_case("a_assay one.txt", true ; "with space")]
    #[test_case("", false ; "empty")]
    #[test_case("..", false ; "parent")]
    #[test_case("../s_x.txt", false ; "traversal")]
    #[test_case("sub/a_x.txt", false ; "nested")]
    #[test_case("a\\b.txt", false ; "backslash")]
    #[test_case(".isaconv-stage", false ; "hidden")]
    fn test_is_safe_filename(name: &str, expected: bool) {
        assert_eq!(is_safe_filename(name), expected);
    }

    #[test]
    fn test_open_requires_single_investigation() {
        let dir = tempfile::tempdir().unwrap();
        let err = TabularBundle::open(dir.path()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Parse);

        fs::write(dir.path().join("i_one.txt"), "").unwrap();
        fs::write(dir.path().join("s_one.txt"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let bundle = TabularBundle::open(dir.path()).unwrap();
        assert_eq!(file_name(bundle.investigation()), "i_one.txt");
        assert_eq!(bundle.members().len(), 1);

        fs::write(dir.path().join("i_two.txt"), "").unwrap();
        assert!(TabularBundle::open(dir.path()).is_err());
    }

    #[test]
    fn test_table_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("i_inv.txt"), "").unwrap();
        let bundle = TabularBundle::open(dir.path()).unwrap();

        let err = bundle.table_path("s_missing.txt").unwrap_err();
        assert!(err.to_string().contains("s_missing.txt"));
        assert!(bundle.table_path("../etc").is_err());
    }

    #[test]
    fn test_open_missing_root_is_io_error() {
        let err = TabularBundle::open(Path::new("/definitely/not/here")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
    }
}
