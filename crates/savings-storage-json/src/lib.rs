use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use savings_core::{CoreError, CoreResult, KeyValueStore};
use tracing::{debug, info, warn};

const DOCUMENT_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed key-value store: one JSON document per key plus rolling backups.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

/// A backup copy of a stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    pub key: String,
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: PathBuf, backups_dir: PathBuf) -> CoreResult<Self> {
        Self::with_retention(data_dir, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(
        data_dir: PathBuf,
        backups_dir: PathBuf,
        retention: usize,
    ) -> CoreResult<Self> {
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            data_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn document_path(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", canonical_name(key), DOCUMENT_EXTENSION))
    }

    pub fn backup_path(&self, key: &str, backup: &str) -> PathBuf {
        self.backup_dir(key).join(backup)
    }

    /// Backups of `key`, newest first.
    pub fn list_backups(&self, key: &str) -> CoreResult<Vec<BackupInfo>> {
        let dir = self.backup_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(key);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
                entries.push(BackupInfo {
                    key: slug.clone(),
                    id: file_name.to_string(),
                    created_at: parse_backup_stamp(&slug, file_name).map(|(stamp, _)| stamp),
                    size_bytes,
                    path: path.clone(),
                });
            }
        }
        entries.sort_by_key(|info| Reverse(parse_backup_stamp(&slug, &info.id)));
        Ok(entries)
    }

    /// Copies a backup over the live document and returns its contents.
    pub fn restore_backup(&self, key: &str, backup_id: &str) -> CoreResult<String> {
        let source = self.backup_path(key, backup_id);
        if !source.exists() {
            return Err(CoreError::Persistence(format!(
                "backup `{backup_id}` not found"
            )));
        }
        let contents = fs::read_to_string(&source)?;
        let target = self.document_path(key);
        let tmp = tmp_path(&target);
        write_atomic(&tmp, &contents)?;
        fs::rename(&tmp, &target)?;
        info!(key, backup = backup_id, "restored document from backup");
        Ok(contents)
    }

    pub fn delete_backup(&self, key: &str, backup_id: &str) -> CoreResult<()> {
        let path = self.backup_path(key, backup_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn backup_dir(&self, key: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(key))
    }

    fn backup_existing_file(&self, key: &str, path: &Path) -> CoreResult<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(key);
        fs::create_dir_all(&dir)?;
        let slug = canonical_name(key);
        let stem = format!("{}_{}", slug, Utc::now().format(BACKUP_TIMESTAMP_FORMAT));
        // Several writes within one second share a stem; order them by sequence.
        let next_sequence = self
            .list_backups(key)?
            .iter()
            .filter(|info| info.id.starts_with(&stem))
            .filter_map(|info| parse_backup_stamp(&slug, &info.id).map(|(_, seq)| seq + 1))
            .max();
        let file_name = match next_sequence {
            Some(sequence) => format!("{stem}_{sequence}.{DOCUMENT_EXTENSION}"),
            None => format!("{stem}.{DOCUMENT_EXTENSION}"),
        };
        let backup_path = dir.join(file_name);
        fs::copy(path, &backup_path)?;
        debug!(key, backup = %backup_path.display(), "backed up previous document");
        self.prune_backups(key)
    }

    fn prune_backups(&self, key: &str) -> CoreResult<()> {
        for entry in self.list_backups(key)?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let path = self.document_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.backup_existing_file(key, &path)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(key, path = %path.display(), bytes = value.len(), "document written");
        Ok(())
    }
}

/// Lowercases a key and replaces anything outside `[a-z0-9]` with `_`.
pub fn canonical_name(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "document".into()
    } else {
        sanitized
    }
}

/// Extracts `(timestamp, sequence)` from `<slug>_<YYYYMMDD>_<HHMMSS>[_<n>].json`.
fn parse_backup_stamp(slug: &str, file_name: &str) -> Option<(DateTime<Utc>, u32)> {
    let trimmed = file_name
        .strip_suffix(&format!(".{DOCUMENT_EXTENSION}"))?
        .strip_prefix(&format!("{slug}_"))?;
    let mut segments = trimmed.split('_');
    let date = segments.next()?;
    let time = segments.next()?;
    let sequence = match segments.next() {
        Some(raw) => raw.parse().ok()?,
        None => 0,
    };
    if segments.next().is_some() || !is_digits(date, 8) || !is_digits(time, 6) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| (DateTime::from_naive_utc_and_offset(naive, Utc), sequence))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_replaces_separators() {
        assert_eq!(canonical_name("savings-goals"), "savings_goals");
        assert_eq!(canonical_name("  Mixed Case "), "mixed_case");
        assert_eq!(canonical_name("--"), "document");
    }

    #[test]
    fn parse_backup_stamp_orders_by_time_then_sequence() {
        let first = parse_backup_stamp("goals", "goals_20240301_120000.json").unwrap();
        let second = parse_backup_stamp("goals", "goals_20240301_120000_1.json").unwrap();
        let later = parse_backup_stamp("goals", "goals_20240301_120001.json").unwrap();
        assert!(first < second);
        assert!(second < later);
        assert!(parse_backup_stamp("goals", "goals_latest.json").is_none());
        assert!(parse_backup_stamp("goals", "other_20240301_120000.json").is_none());
    }

    #[test]
    fn tmp_path_appends_suffix() {
        let tmp = tmp_path(Path::new("/data/savings_goals.json"));
        assert_eq!(tmp, PathBuf::from("/data/savings_goals.json.tmp"));
    }
}
