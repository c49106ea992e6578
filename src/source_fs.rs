//! Filesystem source: polls a local directory tree.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::PathBuf;
use tracing::warn;
use walkdir::WalkDir;

use crate::config::FilesystemSourceConfig;
use crate::fingerprint::fingerprint;
use crate::source::FileSource;

/// A directory polled for files. Filenames are paths relative to `root`,
/// with `/` separators.
pub struct FilesystemSource {
    name: String,
    root: PathBuf,
    follow_symlinks: bool,
    include_set: GlobSet,
    exclude_set: GlobSet,
}

impl FilesystemSource {
    pub fn new(name: &str, config: &FilesystemSourceConfig) -> Result<Self> {
        let include_set = build_globset(&config.include_globs)?;

        let mut default_excludes = vec!["**/.git/**".to_string()];
        default_excludes.extend(config.exclude_globs.clone());
        let exclude_set = build_globset(&default_excludes)?;

        Ok(Self {
            name: name.to_string(),
            root: config.root.clone(),
            follow_symlinks: config.follow_symlinks,
            include_set,
            exclude_set,
        })
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let path = self.root.join(filename);
        if !path.starts_with(&self.root) || filename.split('/').any(|part| part == "..") {
            bail!("Refusing path outside source root: {}", filename);
        }
        Ok(path)
    }
}

#[async_trait]
impl FileSource for FilesystemSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_all_files(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            bail!("Source root does not exist: {}", self.root.display());
        }

        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root).follow_links(self.follow_symlinks);
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            // Only list names that map back to the same path
            let parts: Option<Vec<&str>> =
                relative.components().map(|c| c.as_os_str().to_str()).collect();
            let rel_str = match parts {
                Some(parts) => parts.join("/"),
                None => {
                    warn!(
                        source = %self.name,
                        path = %path.display(),
                        "skipping file with non UTF-8 name"
                    );
                    continue;
                }
            };

            if self.exclude_set.is_match(&rel_str) {
                continue;
            }
            if !self.include_set.is_match(&rel_str) {
                continue;
            }

            files.push(rel_str);
        }

        // Sort for deterministic ordering
        files.sort();

        Ok(files)
    }

    async fn get_fingerprint(&self, filename: &str) -> Result<String> {
        let content = self.get_file_content(filename).await?;
        Ok(fingerprint(&content))
    }

    async fn get_file_content(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.resolve(filename)?;
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }

    async fn check(&self) -> Result<()> {
        if !self.root.is_dir() {
            bail!("root is not a directory: {}", self.root.display());
        }
        Ok(())
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn source_for(root: &std::path::Path, include: &[&str], exclude: &[&str]) -> FilesystemSource {
        let config = FilesystemSourceConfig {
            source_id: 1,
            root: root.to_path_buf(),
            include_globs: include.iter().map(|s| s.to_string()).collect(),
            exclude_globs: exclude.iter().map(|s| s.to_string()).collect(),
            follow_symlinks: false,
        };
        FilesystemSource::new("test", &config).unwrap()
    }

    #[tokio::test]
    async fn test_lists_sorted_relative_paths() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("2024/01")).unwrap();
        fs::write(tmp.path().join("b.csv"), "b").unwrap();
        fs::write(tmp.path().join("a.csv"), "a").unwrap();
        fs::write(tmp.path().join("2024/01/c.csv"), "c").unwrap();
        fs::write(tmp.path().join("notes.txt"), "skip").unwrap();

        let source = source_for(tmp.path(), &["**/*.csv"], &[]);
        let files = source.get_all_files().await.unwrap();
        assert_eq!(files, vec!["2024/01/c.csv", "a.csv", "b.csv"]);
    }

    #[tokio::test]
    async fn test_exclude_globs() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("archive")).unwrap();
        fs::write(tmp.path().join("keep.csv"), "k").unwrap();
        fs::write(tmp.path().join("archive/old.csv"), "o").unwrap();

        let source = source_for(tmp.path(), &["**/*"], &["archive/**"]);
        assert_eq!(source.get_all_files().await.unwrap(), vec!["keep.csv"]);
    }

    #[tokio::test]
    async fn test_fingerprint_matches_content() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("x.csv"), "1,2,3\n").unwrap();

        let source = source_for(tmp.path(), &["**/*"], &[]);
        let content = source.get_file_content("x.csv").await.unwrap();
        assert_eq!(content, b"1,2,3\n");
        assert_eq!(
            source.get_fingerprint("x.csv").await.unwrap(),
            fingerprint(&content)
        );
    }

    #[tokio::test]
    async fn test_missing_root() {
        let tmp = TempDir::new().unwrap();
        let source = source_for(&tmp.path().join("absent"), &["**/*"], &[]);
        assert!(source.get_all_files().await.is_err());
        assert!(source.check().await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let bad = OsStr::from_bytes(b"a\xffbad.csv");
        if fs::write(tmp.path().join(bad), "x").is_err() {
            // Filesystem refuses non UTF-8 names; nothing to check
            return;
        }
        fs::write(tmp.path().join("z.csv"), "z").unwrap();

        let source = source_for(tmp.path(), &["**/*.csv"], &[]);
        let files = source.get_all_files().await.unwrap();
        assert_eq!(files, vec!["z.csv"]);
        for name in &files {
            source.get_file_content(name).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_rejects_parent_traversal() {
        let tmp = TempDir::new().unwrap();
        let source = source_for(tmp.path(), &["**/*"], &[]);
        assert!(source.get_file_content("../etc/passwd").await.is_err());
    }
}
