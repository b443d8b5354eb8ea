use crate::config::DiscoveryConfig;
use crate::error::{Result, TextMergeError};
use crate::scanner::file_filter::FileFilter;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFile {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub filename: String,
    pub size: u64,
}

impl TextFile {
    pub fn new(path: PathBuf, relative_path: PathBuf, size: u64) -> Self {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            path,
            relative_path,
            filename,
            size,
        }
    }

    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }
}

pub struct FileDiscovery {
    filter: FileFilter,
    max_depth: usize,
    sort: bool,
}

impl FileDiscovery {
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        Ok(Self {
            filter: FileFilter::new(config)?,
            max_depth: config.max_depth,
            sort: config.sort,
        })
    }

    /// Never select `path`, even when its name matches the pattern.
    pub fn with_excluded_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.filter.exclude_path(path);
        self
    }

    pub fn discover<P: AsRef<Path>>(&self, root: P) -> Result<Vec<TextFile>> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(TextMergeError::InvalidPath {
                path: format!("{} does not exist", root_path.display()),
            });
        }

        if !root_path.is_dir() {
            return Err(TextMergeError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut files = Vec::new();

        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(self.max_depth)
            .follow_links(false);

        for entry in walker {
            let entry = entry?;

            if !is_regular_file(&entry) {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(root_path)
                .map(Path::to_path_buf)
                .map_err(|_| TextMergeError::InvalidPath {
                    path: format!(
                        "Cannot calculate relative path for {} from root {}",
                        entry.path().display(),
                        root_path.display()
                    ),
                })?;

            if !self.filter.is_selected(entry.path(), &relative_path) {
                tracing::trace!(path = %entry.path().display(), "skipped");
                continue;
            }

            let size = std::fs::metadata(entry.path())
                .map_err(|e| TextMergeError::read(entry.path(), e))?
                .len();

            files.push(TextFile::new(entry.path().to_path_buf(), relative_path, size));
        }

        if self.sort {
            files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        }

        tracing::debug!(
            root = %root_path.display(),
            pattern = self.filter.pattern(),
            count = files.len(),
            "discovered files"
        );

        Ok(files)
    }
}

// Symlinks are accepted when they point at a regular file.
fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(files: &[TextFile]) -> Vec<String> {
        files.iter().map(|f| f.display_path()).collect()
    }

    #[test]
    fn test_text_file_creation() {
        let file = TextFile::new(
            PathBuf::from("/data/notes.txt"),
            PathBuf::from("notes.txt"),
            12,
        );
        assert_eq!(file.filename, "notes.txt");
        assert_eq!(file.size, 12);
        assert_eq!(file.display_path(), "notes.txt");
    }

    #[test]
    fn test_discovers_matching_files_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("b.txt"), "B").unwrap();
        fs::write(root.join("a.txt"), "A").unwrap();
        fs::write(root.join("c.md"), "C").unwrap();
        fs::write(root.join(".hidden.txt"), "H").unwrap();

        let discovery = FileDiscovery::new(&DiscoveryConfig::default()).unwrap();
        let files = discovery.discover(root).unwrap();

        assert_eq!(names(&files), vec!["a.txt", "b.txt"]);
        assert_eq!(files[0].size, 1);
    }

    #[test]
    fn test_directories_are_not_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("folder.txt")).unwrap();
        fs::write(root.join("real.txt"), "x").unwrap();

        let discovery = FileDiscovery::new(&DiscoveryConfig::default()).unwrap();
        let files = discovery.discover(root).unwrap();

        assert_eq!(names(&files), vec!["real.txt"]);
    }

    #[test]
    fn test_depth_limit() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("top.txt"), "top").unwrap();
        fs::write(root.join("nested").join("deep.txt"), "deep").unwrap();

        let discovery = FileDiscovery::new(&DiscoveryConfig::default()).unwrap();
        assert_eq!(names(&discovery.discover(root).unwrap()), vec!["top.txt"]);

        let config = DiscoveryConfig {
            max_depth: 2,
            ..DiscoveryConfig::default()
        };
        let discovery = FileDiscovery::new(&config).unwrap();
        let files = discovery.discover(root).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files
            .iter()
            .any(|f| f.relative_path == Path::new("nested").join("deep.txt")));
    }

    #[test]
    fn test_excluded_output_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.txt"), "A").unwrap();
        fs::write(root.join("negative_text.txt"), "A\n").unwrap();

        let discovery = FileDiscovery::new(&DiscoveryConfig::default())
            .unwrap()
            .with_excluded_path(root.join("negative_text.txt"));
        let files = discovery.discover(root).unwrap();

        assert_eq!(names(&files), vec!["a.txt"]);
    }

    #[test]
    fn test_unsorted_discovery_finds_same_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for name in ["c.txt", "a.txt", "b.txt"] {
            fs::write(root.join(name), name).unwrap();
        }

        let config = DiscoveryConfig {
            sort: false,
            ..DiscoveryConfig::default()
        };
        let discovery = FileDiscovery::new(&config).unwrap();
        let mut found = names(&discovery.discover(root).unwrap());
        found.sort();

        assert_eq!(found, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_to_files_are_included() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let elsewhere = TempDir::new().unwrap();
        let target = elsewhere.path().join("target.txt");
        fs::write(&target, "linked").unwrap();
        fs::create_dir(elsewhere.path().join("dir.txt")).unwrap();

        fs::write(root.join("a.txt"), "A").unwrap();
        symlink(&target, root.join("link.txt")).unwrap();
        symlink(elsewhere.path().join("dir.txt"), root.join("dirlink.txt")).unwrap();
        symlink(elsewhere.path().join("gone.txt"), root.join("dangling.txt")).unwrap();

        let discovery = FileDiscovery::new(&DiscoveryConfig::default()).unwrap();
        let files = discovery.discover(root).unwrap();

        assert_eq!(names(&files), vec!["a.txt", "link.txt"]);
        assert_eq!(files[1].size, 6);
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let discovery = FileDiscovery::new(&DiscoveryConfig::default()).unwrap();
        assert!(discovery.discover(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let discovery = FileDiscovery::new(&DiscoveryConfig::default()).unwrap();
        let result = discovery.discover(temp_dir.path().join("absent"));
        assert!(matches!(result, Err(TextMergeError::InvalidPath { .. })));
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");
        fs::write(&file, "A").unwrap();

        let discovery = FileDiscovery::new(&DiscoveryConfig::default()).unwrap();
        assert!(matches!(
            discovery.discover(&file),
            Err(TextMergeError::InvalidPath { .. })
        ));
    }
}
