//! Catalog of practice items, backed by a local `documents.json` file.
//!
//! Each item names a piece and optionally points at a sheet-music PDF, a
//! backing audio track, tags, and a start page. Symbolic path prefixes (for
//! catalogs shared between machines) are expanded through the file's `paths`
//! table. Saves keep three rotating backup generations and go through a
//! temporary file so a crash can never truncate the primary mid-write.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CATALOG_FILE_NAME: &str = "documents.json";
const HOME_SUBDIR: &str = ".music-practice";
const BACKUP_GENERATIONS: usize = 3;

/// One raw catalog record, as persisted under `items`.
///
/// `name` is mandatory; a file carrying a record without one is rejected
/// during deserialization. Earlier revisions of the entry editor wrote empty
/// strings for blank path fields, so empty strings normalize to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_num: Option<usize>,
}

impl EntryRecord {
    /// Drop empty path strings and lowercase/dedupe tags.
    fn normalized(mut self) -> Self {
        self.pdf = self.pdf.filter(|p| !p.trim().is_empty());
        self.audio = self.audio.filter(|a| !a.trim().is_empty());
        let tags: BTreeSet<String> = self
            .tags
            .iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();
        self.tags = tags.into_iter().collect();
        self
    }
}

/// Display-ready view of a record, derived on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub code: String,
    pub display_name: String,
    pub has_audio: bool,
    pub has_pdf: bool,
    pub tags: Vec<String>,
    pub start_page: Option<usize>,
}

/// Linear-scan predicate over derived entries. A non-empty tag list matches
/// entries carrying any of the listed tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub audio: Option<bool>,
    pub pdf: Option<bool>,
    pub tags: Vec<String>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if !self.tags.is_empty()
            && !self
                .tags
                .iter()
                .any(|tag| entry.tags.iter().any(|t| t == tag))
        {
            return false;
        }
        if let Some(want) = self.audio {
            if want != entry.has_audio {
                return false;
            }
        }
        if let Some(want) = self.pdf {
            if want != entry.has_pdf {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: BTreeMap<String, EntryRecord>,
    #[serde(default)]
    paths: BTreeMap<String, String>,
}

/// The loaded catalog plus the location it persists to.
#[derive(Debug)]
pub struct Catalog {
    file: CatalogFile,
    source_path: PathBuf,
}

impl Catalog {
    /// Search the candidate directories for the catalog file and load the
    /// first hit. Not finding one is fatal for the application.
    pub fn load() -> Result<Self> {
        let mut candidates = vec![PathBuf::from(".")];
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(HOME_SUBDIR));
        }

        for dir in &candidates {
            let path = dir.join(CATALOG_FILE_NAME);
            if path.is_file() {
                return Self::load_from(&path);
            }
        }
        bail!("Cannot find catalog file {CATALOG_FILE_NAME} in any candidate directory");
    }

    /// Load and validate the catalog at a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Reading catalog file {}", path.display()))?;
        let mut file: CatalogFile = serde_json::from_str(&data)
            .with_context(|| format!("Parsing catalog file {}", path.display()))?;
        file.items = file
            .items
            .into_iter()
            .map(|(code, record)| (code, record.normalized()))
            .collect();
        info!(
            path = %path.display(),
            items = file.items.len(),
            "Loaded catalog"
        );
        Ok(Self {
            file,
            source_path: path.to_path_buf(),
        })
    }

    /// All entries in display order (ascending by display name).
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let mut entries: Vec<CatalogEntry> = self
            .file
            .items
            .iter()
            .map(|(code, record)| derive_entry(code, record))
            .collect();
        entries.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.code.cmp(&b.code))
        });
        entries
    }

    /// Distinct tags across the whole catalog, sorted.
    pub fn distinct_tags(&self) -> Vec<String> {
        let tags: BTreeSet<String> = self
            .file
            .items
            .values()
            .flat_map(|record| record.tags.iter().cloned())
            .collect();
        tags.into_iter().collect()
    }

    pub fn record(&self, code: &str) -> Option<&EntryRecord> {
        self.file.items.get(code)
    }

    /// Expand symbolic path prefixes.
    ///
    /// Policy: one left-to-right pass over the input; at every position the
    /// longest matching key from the `paths` table wins; replacement text is
    /// emitted verbatim and never rescanned. The result does not depend on
    /// the order of the table.
    pub fn expand_path(&self, path: &str) -> String {
        let mut keys: Vec<&String> = self.file.paths.keys().filter(|k| !k.is_empty()).collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut out = String::with_capacity(path.len());
        let mut rest = path;
        'scan: while !rest.is_empty() {
            for key in &keys {
                if let Some(tail) = rest.strip_prefix(key.as_str()) {
                    out.push_str(&self.file.paths[*key]);
                    rest = tail;
                    continue 'scan;
                }
            }
            let Some(ch) = rest.chars().next() else {
                break;
            };
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
        if out != path {
            debug!(original = path, expanded = %out, "Expanded symbolic path");
        }
        out
    }

    /// Replace-or-insert the record under `code`, then persist the whole
    /// catalog with backup rotation.
    pub fn update_entry(&mut self, code: &str, record: EntryRecord) -> Result<()> {
        self.file.items.insert(code.to_string(), record.normalized());
        self.save()?;
        info!(code, "Catalog entry updated");
        Ok(())
    }

    /// Serialize to a sibling temp file, rotate backups, then rename the temp
    /// file over the primary. The new payload is fully on disk before any
    /// destructive step.
    fn save(&self) -> Result<()> {
        let payload =
            serde_json::to_string_pretty(&self.file).context("Serializing catalog")?;
        let tmp = append_suffix(&self.source_path, ".tmp");
        fs::write(&tmp, payload)
            .with_context(|| format!("Writing catalog temp file {}", tmp.display()))?;
        rotate_backups(&self.source_path)?;
        fs::rename(&tmp, &self.source_path)
            .with_context(|| format!("Replacing catalog file {}", self.source_path.display()))?;
        debug!(path = %self.source_path.display(), "Catalog saved");
        Ok(())
    }
}

fn derive_entry(code: &str, record: &EntryRecord) -> CatalogEntry {
    let has_audio = record.audio.is_some();
    let has_pdf = record.pdf.is_some();
    let suffix = match (has_audio, has_pdf) {
        (true, false) => " (audio only)",
        (false, true) => " (pdf only)",
        _ => "",
    };
    CatalogEntry {
        code: code.to_string(),
        display_name: format!("{}{}", record.name, suffix),
        has_audio,
        has_pdf,
        tags: record.tags.clone(),
        start_page: record.page_num,
    }
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = OsString::from(path.as_os_str());
    os.push(suffix);
    PathBuf::from(os)
}

/// Shift `.bak1`..`.bak3` one generation down, dropping the oldest, then move
/// the primary into the `.bak1` slot.
fn rotate_backups(primary: &Path) -> Result<()> {
    let oldest = append_suffix(primary, &format!(".bak{BACKUP_GENERATIONS}"));
    if oldest.exists() {
        fs::remove_file(&oldest)
            .with_context(|| format!("Dropping oldest backup {}", oldest.display()))?;
    }
    for generation in (1..BACKUP_GENERATIONS).rev() {
        let from = append_suffix(primary, &format!(".bak{generation}"));
        let to = append_suffix(primary, &format!(".bak{}", generation + 1));
        if from.exists() {
            fs::rename(&from, &to)
                .with_context(|| format!("Rotating backup {}", from.display()))?;
        }
    }
    if primary.exists() {
        let first = append_suffix(primary, ".bak1");
        fs::rename(primary, &first)
            .with_context(|| format!("Backing up {}", primary.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "items": {
            "greensleeves": {
                "name": "Greensleeves",
                "pdf": "$SHEETS/greensleeves.pdf",
                "audio": "$TRACKS/greensleeves.mp3",
                "tags": ["Alto", "alto", " Tenor "],
                "page_num": 2
            },
            "wild_rover": {
                "name": "Wild Rover",
                "audio": "$TRACKS/wild_rover.mp3"
            },
            "aria": {
                "name": "Aria",
                "pdf": "$SHEETS/aria.pdf",
                "audio": ""
            }
        },
        "paths": {
            "$SHEETS": "/mnt/library/sheets",
            "$TRACKS": "/mnt/library/tracks"
        },
        "tools": { "pdf": "evince" }
    }"#;

    fn write_catalog(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(CATALOG_FILE_NAME);
        fs::write(&path, contents).expect("write catalog");
        path
    }

    fn sample_catalog(dir: &TempDir) -> Catalog {
        let path = write_catalog(dir, SAMPLE);
        Catalog::load_from(&path).expect("load catalog")
    }

    fn record_named(name: &str) -> EntryRecord {
        EntryRecord {
            name: name.to_string(),
            pdf: None,
            audio: Some("$TRACKS/x.mp3".to_string()),
            tags: vec!["tenor".to_string()],
            page_num: None,
        }
    }

    #[test]
    fn entries_are_sorted_with_only_suffixes() {
        let dir = TempDir::new().expect("tempdir");
        let catalog = sample_catalog(&dir);
        let entries = catalog.entries();
        let names: Vec<&str> = entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Aria (pdf only)", "Greensleeves", "Wild Rover (audio only)"]
        );
    }

    #[test]
    fn empty_path_strings_are_absent() {
        let dir = TempDir::new().expect("tempdir");
        let catalog = sample_catalog(&dir);
        let aria = catalog.record("aria").expect("aria");
        assert_eq!(aria.audio, None);
        assert!(aria.pdf.is_some());
    }

    #[test]
    fn tags_lowercase_and_dedupe() {
        let dir = TempDir::new().expect("tempdir");
        let catalog = sample_catalog(&dir);
        let record = catalog.record("greensleeves").expect("record");
        assert_eq!(record.tags, vec!["alto".to_string(), "tenor".to_string()]);
    }

    #[test]
    fn record_without_name_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_catalog(&dir, r#"{ "items": { "x": { "pdf": "a.pdf" } } }"#);
        assert!(Catalog::load_from(&path).is_err());
    }

    #[test]
    fn audio_only_filter_matches_exactly() {
        let dir = TempDir::new().expect("tempdir");
        let catalog = sample_catalog(&dir);
        let filter = EntryFilter {
            audio: Some(true),
            pdf: Some(false),
            tags: Vec::new(),
        };
        let matched: Vec<String> = catalog
            .entries()
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .map(|entry| entry.code)
            .collect();
        assert_eq!(matched, vec!["wild_rover".to_string()]);
    }

    #[test]
    fn tag_filter_matches_any_listed_tag() {
        let dir = TempDir::new().expect("tempdir");
        let catalog = sample_catalog(&dir);
        let filter = EntryFilter {
            audio: None,
            pdf: None,
            tags: vec!["tenor".to_string(), "bass".to_string()],
        };
        let matched: Vec<String> = catalog
            .entries()
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .map(|entry| entry.code)
            .collect();
        assert_eq!(matched, vec!["greensleeves".to_string()]);
    }

    #[test]
    fn expand_path_prefers_longest_key() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_catalog(
            &dir,
            r#"{
                "items": {},
                "paths": { "$M": "/short", "$MUSIC": "/mnt/music" }
            }"#,
        );
        let catalog = Catalog::load_from(&path).expect("load");
        assert_eq!(
            catalog.expand_path("$MUSIC/tune.pdf"),
            "/mnt/music/tune.pdf"
        );
        assert_eq!(catalog.expand_path("$M/tune.pdf"), "/short/tune.pdf");
    }

    #[test]
    fn expand_path_never_rescans_replacements() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_catalog(
            &dir,
            r#"{
                "items": {},
                "paths": { "$A": "$B/nested", "$B": "/real" }
            }"#,
        );
        let catalog = Catalog::load_from(&path).expect("load");
        assert_eq!(catalog.expand_path("$A/tune.pdf"), "$B/nested/tune.pdf");
    }

    #[test]
    fn update_entry_round_trips() {
        let dir = TempDir::new().expect("tempdir");
        let mut catalog = sample_catalog(&dir);
        let record = EntryRecord {
            name: "New Tune".to_string(),
            pdf: Some("$SHEETS/new.pdf".to_string()),
            audio: Some("".to_string()),
            tags: vec!["Bass".to_string()],
            page_num: Some(4),
        };
        catalog.update_entry("new_tune", record).expect("update");

        let reloaded = Catalog::load_from(dir.path().join(CATALOG_FILE_NAME).as_path())
            .expect("reload");
        let record = reloaded.record("new_tune").expect("saved record");
        assert_eq!(record.name, "New Tune");
        assert_eq!(record.pdf.as_deref(), Some("$SHEETS/new.pdf"));
        assert_eq!(record.audio, None);
        assert_eq!(record.tags, vec!["bass".to_string()]);
        assert_eq!(record.page_num, Some(4));
    }

    #[test]
    fn four_saves_keep_three_backup_generations() {
        let dir = TempDir::new().expect("tempdir");
        let mut catalog = sample_catalog(&dir);
        for version in 1..=4 {
            catalog
                .update_entry("versioned", record_named(&format!("v{version}")))
                .expect("save");
        }

        let primary = dir.path().join(CATALOG_FILE_NAME);
        let version_at = |path: &Path| -> String {
            Catalog::load_from(path)
                .expect("load generation")
                .record("versioned")
                .map(|record| record.name.clone())
                .unwrap_or_default()
        };

        assert_eq!(version_at(&primary), "v4");
        assert_eq!(version_at(&append_suffix(&primary, ".bak1")), "v3");
        assert_eq!(version_at(&append_suffix(&primary, ".bak2")), "v2");
        assert_eq!(version_at(&append_suffix(&primary, ".bak3")), "v1");
        assert!(!append_suffix(&primary, ".bak4").exists());
        assert!(!append_suffix(&primary, ".tmp").exists());
    }

    #[test]
    fn first_backup_generation_holds_pre_save_state() {
        let dir = TempDir::new().expect("tempdir");
        let mut catalog = sample_catalog(&dir);
        catalog
            .update_entry("versioned", record_named("v1"))
            .expect("save");

        let bak1 = append_suffix(&dir.path().join(CATALOG_FILE_NAME), ".bak1");
        let before = Catalog::load_from(&bak1).expect("backup");
        assert!(before.record("versioned").is_none());
    }
}
