//! Raw measurement files kept verbatim alongside the processed data.

use std::fs;
use std::path::Path;

use crate::error::AppError;

/// A file or directory tree loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawData {
    File { name: String, bytes: Vec<u8> },
    Directory { name: String, children: Vec<RawData> },
}

impl RawData {
    /// Load `path` recursively. Directory children are ordered directories
    /// first, then files, each group sorted by name.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::io(format!("'{}' has no file name.", path.display())))?;

        if path.is_file() {
            let bytes = fs::read(path)
                .map_err(|e| AppError::io(format!("Failed to read '{}': {e}", path.display())))?;
            return Ok(Self::File { name, bytes });
        }

        let entries = fs::read_dir(path)
            .map_err(|e| AppError::io(format!("Failed to read directory '{}': {e}", path.display())))?;
        let mut children = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| AppError::io(format!("Failed to read directory '{}': {e}", path.display())))?;
            children.push(Self::load(&entry.path())?);
        }
        sort_children(&mut children);
        Ok(Self::Directory { name, children })
    }

    /// Write this node into `parent` (creating `parent` if needed).
    pub fn save_to(&self, parent: &Path) -> Result<(), AppError> {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", parent.display())))?;
        let path = parent.join(self.name());
        match self {
            Self::File { bytes, .. } => fs::write(&path, bytes)
                .map_err(|e| AppError::io(format!("Failed to write '{}': {e}", path.display()))),
            Self::Directory { children, .. } => {
                fs::create_dir_all(&path)
                    .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", path.display())))?;
                children.iter().try_for_each(|c| c.save_to(&path))
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Directory { name, .. } => name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    /// Children of a directory; empty for files.
    pub fn children(&self) -> &[RawData] {
        match self {
            Self::Directory { children, .. } => children,
            Self::File { .. } => &[],
        }
    }

    /// Child directories, in stored order.
    pub fn directories(&self) -> impl Iterator<Item = &RawData> {
        self.children().iter().filter(|c| c.is_dir())
    }

    /// Child files, in stored order.
    pub fn files(&self) -> impl Iterator<Item = &RawData> {
        self.children().iter().filter(|c| !c.is_dir())
    }

    /// Child file whose name ends with `suffix`.
    ///
    /// Suffixes nest (`-b.csv` also matches `-a-b.csv`), so the shortest
    /// matching name wins.
    pub fn file_with_suffix(&self, suffix: &str) -> Result<&RawData, AppError> {
        self.files()
            .filter(|f| f.name().ends_with(suffix))
            .min_by_key(|f| f.name().len())
            .ok_or_else(|| {
                AppError::missing_file(format!("No '*{suffix}' file in '{}'.", self.name()))
            })
    }

    /// File contents as UTF-8 text, without a leading BOM.
    pub fn text(&self) -> Result<&str, AppError> {
        let Self::File { name, bytes } = self else {
            return Err(AppError::format(format!("'{}' is a directory, not a file.", self.name())));
        };
        let text = std::str::from_utf8(bytes)
            .map_err(|e| AppError::format(format!("'{name}' is not valid UTF-8: {e}")))?;
        Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
    }

    /// Total number of files in the tree.
    pub fn file_count(&self) -> usize {
        match self {
            Self::File { .. } => 1,
            Self::Directory { children, .. } => children.iter().map(Self::file_count).sum(),
        }
    }
}

pub(crate) fn sort_children(children: &mut [RawData]) {
    children.sort_by(|a, b| b.is_dir().cmp(&a.is_dir()).then_with(|| a.name().cmp(b.name())));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_orders_directories_first() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("sample");
        fs::create_dir_all(root.join("b-dir")).unwrap();
        fs::create_dir_all(root.join("a-dir")).unwrap();
        fs::write(root.join("a.txt"), b"x").unwrap();
        fs::write(root.join("b-dir").join("f.csv"), "\u{feff}0,1\n").unwrap();

        let raw = RawData::load(&root).unwrap();
        let names: Vec<&str> = raw.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a-dir", "b-dir", "a.txt"]);
        assert_eq!(raw.file_count(), 2);

        let b = raw.directories().nth(1).unwrap();
        assert_eq!(raw.file_with_suffix(".txt").unwrap().name(), "a.txt");
        assert_eq!(b.file_with_suffix(".csv").unwrap().text().unwrap(), "0,1\n");
        assert_eq!(
            b.file_with_suffix("-b.csv").unwrap_err().kind(),
            crate::error::ErrorKind::MissingFile
        );
    }

    #[test]
    fn save_round_trip() {
        let tree = RawData::Directory {
            name: "m".into(),
            children: vec![
                RawData::Directory {
                    name: "500nm".into(),
                    children: vec![RawData::File { name: "x.csv".into(), bytes: b"1,2\n".to_vec() }],
                },
                RawData::File { name: "notes.txt".into(), bytes: b"hi".to_vec() },
            ],
        };
        let tmp = tempfile::tempdir().unwrap();
        tree.save_to(tmp.path()).unwrap();
        assert_eq!(RawData::load(&tmp.path().join("m")).unwrap(), tree);
    }

    #[test]
    fn text_rejects_binary() {
        let f = RawData::File { name: "bin".into(), bytes: vec![0xff, 0xfe, 0x00] };
        assert!(f.text().is_err());
    }
}
