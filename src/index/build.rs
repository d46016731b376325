//! Line-oriented corpus loading
//!
//! Walks files and directories, reads every text file in parallel and
//! indexes each line as one string of a [`GeneralizedSuffixTree`]. The
//! identifier of a line is its position in [`Corpus::records`].

use crate::index::tree::GeneralizedSuffixTree;
use crate::index::types::StringId;
use crate::utils::progress;
use crate::utils::{fold_case, is_binary, split_lines};
use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use memmap2::Mmap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Options for turning files into indexed lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Fold ASCII case of lines and patterns (default: false)
    pub case_insensitive: bool,
    /// Leave whitespace-only lines out of the index (default: true)
    pub skip_blank_lines: bool,
    /// Lines longer than this many bytes are skipped (default: 4096)
    pub max_line_len: usize,
    /// Files larger than this are skipped (bytes, default: 10MB)
    pub max_file_size: u64,
    /// Descend into hidden files and directories (default: false)
    pub hidden: bool,
    /// Only index files matching one of these globs (default: all files)
    pub globs: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            skip_blank_lines: true,
            max_line_len: 4096,
            max_file_size: 10 * 1024 * 1024, // 10MB
            hidden: false,
            globs: Vec::new(),
        }
    }
}

impl CorpusConfig {
    /// Read a JSON config; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    fn glob_set(&self) -> Result<Option<GlobSet>> {
        if self.globs.is_empty() {
            return Ok(None);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.globs {
            builder.add(Glob::new(pattern).with_context(|| format!("Invalid glob: {}", pattern))?);
        }
        Ok(Some(builder.build()?))
    }

    /// Apply the configured case folding
    pub fn normalize<'s>(&self, s: &'s str) -> Cow<'s, str> {
        if self.case_insensitive {
            Cow::Owned(fold_case(s))
        } else {
            Cow::Borrowed(s)
        }
    }
}

/// One indexed line
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub path: PathBuf,
    /// 1-based
    pub line_number: u32,
    pub content: String,
}

/// A line matching a search, with the byte range of the first occurrence
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    pub id: StringId,
    pub path: &'a Path,
    pub line_number: u32,
    pub content: &'a str,
    pub match_start: usize,
    pub match_end: usize,
}

/// Indexed lines of a set of files
#[derive(Debug)]
pub struct Corpus {
    pub tree: GeneralizedSuffixTree,
    pub records: Vec<Record>,
    pub config: CorpusConfig,
    pub file_count: usize,
    /// Binary, oversized or unreadable files
    pub skipped_files: usize,
    /// Lines over `max_line_len`
    pub skipped_lines: usize,
}

impl Corpus {
    /// Lines containing `pattern`, in file order
    pub fn search(&self, pattern: &str) -> Vec<SearchHit<'_>> {
        let needle = self.config.normalize(pattern);
        let Some(ids) = self.tree.find(&needle) else {
            return Vec::new();
        };
        ids.iter().map(|id| self.hit(id, &needle)).collect()
    }

    fn hit(&self, id: StringId, needle: &str) -> SearchHit<'_> {
        let record = &self.records[id as usize];
        let haystack = self.config.normalize(&record.content);
        let found = haystack.find(needle);
        debug_assert!(found.is_some(), "record {id} is labeled for {needle:?} but does not contain it");
        let match_start = found.unwrap_or(0);
        SearchHit {
            id,
            path: &record.path,
            line_number: record.line_number,
            content: &record.content,
            match_start,
            match_end: match_start + needle.len(),
        }
    }
}

/// Lines read from one file, before indexing
struct LoadedFile {
    path: PathBuf,
    lines: Vec<(u32, String)>,
    skipped_lines: usize,
}

/// Walk `paths`, read every text file and index its lines
pub fn build_corpus(paths: &[PathBuf], config: &CorpusConfig, show_progress: bool) -> Result<Corpus> {
    let files = collect_files(paths, config)?;
    debug!(files = files.len(), "collected files");

    let skipped_files = AtomicUsize::new(0);
    let loaded: Vec<LoadedFile> = files
        .par_iter()
        .filter_map(|path| match load_file(path, config) {
            Ok(Some(file)) => Some(file),
            Ok(None) => {
                skipped_files.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                skipped_files.fetch_add(1, Ordering::Relaxed);
                None
            }
        })
        .collect();

    let total_lines: usize = loaded.iter().map(|f| f.lines.len()).sum();
    if total_lines > StringId::MAX as usize {
        bail!("Corpus has {} lines, more than the {} identifiers available", total_lines, StringId::MAX);
    }

    let pb = progress::bar(total_lines as u64, show_progress, "Indexing lines...");
    let mut tree = GeneralizedSuffixTree::new();
    let mut records = Vec::with_capacity(total_lines);
    let mut skipped_lines = 0;
    let file_count = loaded.len();

    // Single writer: lines go into the tree one at a time, in file order
    for file in loaded {
        skipped_lines += file.skipped_lines;
        let line_count = file.lines.len() as u64;
        for (line_number, content) in file.lines {
            let id = records.len() as StringId;
            tree.insert(&config.normalize(&content), id);
            records.push(Record {
                path: file.path.clone(),
                line_number,
                content,
            });
        }
        pb.inc(line_count);
    }
    pb.finish_and_clear();

    info!(
        files = file_count,
        lines = records.len(),
        nodes = tree.stats().node_count,
        "corpus indexed"
    );

    Ok(Corpus {
        tree,
        records,
        config: config.clone(),
        file_count,
        skipped_files: skipped_files.into_inner(),
        skipped_lines,
    })
}

/// Expand `paths` into a sorted list of files, honouring ignore files and globs
fn collect_files(paths: &[PathBuf], config: &CorpusConfig) -> Result<Vec<PathBuf>> {
    let Some((first, rest)) = paths.split_first() else {
        return Ok(Vec::new());
    };
    for path in paths {
        if !path.exists() {
            bail!("Path not found: {}", path.display());
        }
    }

    let globs = config.glob_set()?;
    let mut builder = WalkBuilder::new(first);
    for path in rest {
        builder.add(path);
    }
    builder
        .hidden(!config.hidden)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(|entry| entry.file_name() != ".git");

    let mut files: Vec<PathBuf> = builder
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| globs.as_ref().is_none_or(|set| set.is_match(path)))
        .collect();

    files.sort();
    files.dedup();
    Ok(files)
}

/// Read one file's lines; `Ok(None)` when the file is skipped by policy
fn load_file(path: &Path, config: &CorpusConfig) -> Result<Option<LoadedFile>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let size = file.metadata()?.len();
    if size > config.max_file_size {
        debug!(path = %path.display(), size, "skipping large file");
        return Ok(None);
    }

    let mut loaded = LoadedFile {
        path: path.to_path_buf(),
        lines: Vec::new(),
        skipped_lines: 0,
    };
    if size == 0 {
        return Ok(Some(loaded));
    }

    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map {}", path.display()))?;
    if is_binary(&mmap) {
        debug!(path = %path.display(), "skipping binary file");
        return Ok(None);
    }

    for (line_number, bytes) in split_lines(&mmap) {
        if bytes.len() > config.max_line_len {
            loaded.skipped_lines += 1;
            continue;
        }
        let line = String::from_utf8_lossy(bytes);
        if config.skip_blank_lines && line.trim().is_empty() {
            continue;
        }
        loaded.lines.push((line_number, line.into_owned()));
    }

    Ok(Some(loaded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Fresh scratch directory for one test
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("gstree_build_tests")
            .join(format!("{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn quiet_build(paths: &[PathBuf], config: &CorpusConfig) -> Corpus {
        build_corpus(paths, config, false).unwrap()
    }

    #[test]
    fn test_lines_become_records() {
        let dir = scratch_dir("records");
        fs::write(dir.join("a.txt"), "banana\n\nbano\r\nba\n").unwrap();

        let corpus = quiet_build(&[dir.clone()], &CorpusConfig::default());
        assert_eq!(corpus.file_count, 1);
        assert_eq!(corpus.records.len(), 3);
        assert_eq!(corpus.records[1].content, "bano");
        assert_eq!(corpus.records[1].line_number, 3);

        let hits = corpus.search("ban");
        let lines: Vec<u32> = hits.iter().map(|h| h.line_number).collect();
        assert_eq!(lines, vec![1, 3]);
        assert_eq!((hits[0].match_start, hits[0].match_end), (0, 3));
    }

    #[test]
    fn test_case_insensitive_search() {
        let dir = scratch_dir("case");
        fs::write(dir.join("names.txt"), "Bethesda\nSavannahGA\n").unwrap();

        let config = CorpusConfig {
            case_insensitive: true,
            ..Default::default()
        };
        let corpus = quiet_build(&[dir.clone()], &config);
        let hits = corpus.search("SAVANNAH");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "SavannahGA");

        let sensitive = quiet_build(&[dir], &CorpusConfig::default());
        assert!(sensitive.search("SAVANNAH").is_empty());
    }

    #[test]
    fn test_match_offsets_point_into_original_line() {
        let dir = scratch_dir("offsets");
        fs::write(dir.join("places.txt"), "SofSavannahAtFerguson\nnothing here\n").unwrap();

        let config = CorpusConfig {
            case_insensitive: true,
            ..Default::default()
        };
        let corpus = quiet_build(&[dir], &config);
        let hits = corpus.search("savannah");
        assert_eq!(hits.len(), 1);
        let hit = &hits[0];
        assert_eq!((hit.match_start, hit.match_end), (3, 11));
        assert_eq!(&hit.content[hit.match_start..hit.match_end], "Savannah");
    }

    #[test]
    fn test_skips_binary_and_long_lines() {
        let dir = scratch_dir("skips");
        fs::write(dir.join("blob.bin"), b"abc\x00def").unwrap();
        fs::write(dir.join("text.txt"), format!("short\n{}\n", "x".repeat(50))).unwrap();

        let config = CorpusConfig {
            max_line_len: 10,
            ..Default::default()
        };
        let corpus = quiet_build(&[dir], &config);
        assert_eq!(corpus.file_count, 1);
        assert_eq!(corpus.skipped_files, 1);
        assert_eq!(corpus.skipped_lines, 1);
        assert!(corpus.search("abc").is_empty());
        assert_eq!(corpus.search("hor").len(), 1);
    }

    #[test]
    fn test_glob_filter() {
        let dir = scratch_dir("globs");
        fs::write(dir.join("keep.txt"), "needle\n").unwrap();
        fs::write(dir.join("drop.log"), "needle\n").unwrap();

        let config = CorpusConfig {
            globs: vec!["*.txt".to_string()],
            ..Default::default()
        };
        let corpus = quiet_build(&[dir], &config);
        let hits = corpus.search("needle");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].path.ends_with("keep.txt"));
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let missing = std::env::temp_dir().join("gstree_definitely_missing_dir");
        assert!(build_corpus(&[missing], &CorpusConfig::default(), false).is_err());
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let dir = scratch_dir("config");
        let path = dir.join("gstree.json");
        fs::write(&path, r#"{ "case_insensitive": true }"#).unwrap();

        let config = CorpusConfig::load(&path).unwrap();
        assert!(config.case_insensitive);
        assert!(config.skip_blank_lines);
        assert_eq!(config.max_line_len, 4096);
    }
}
