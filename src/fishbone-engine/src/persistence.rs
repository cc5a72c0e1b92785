// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Session storage and downloadable analysis/report files.
//!
//! The session holds one JSON snapshot under [`SESSION_KEY`], rewritten after
//! every mutation and read back at startup. Storage failures are never fatal
//! to the caller: [`load_session`] falls back to an empty document and the
//! app logs failed saves and carries on.

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use fishbone_core::{Error, ErrorCode, ErrorKind, Result};

use crate::datamodel::AnalysisDocument;
use crate::json;
use crate::report;
use crate::store::validate_document;

pub const SESSION_KEY: &str = "fishbone-app-state";

fn lock_poisoned() -> Error {
    Error::new(
        ErrorKind::Storage,
        ErrorCode::Io,
        Some("lock poisoned".to_string()),
    )
}

/// Key-value string storage scoped to one user session.
pub trait SessionStorage: Send + Sync {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    fn is_available(&self) -> bool {
        true
    }
}

/// Storage that lives as long as the process.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut data = HashMap::new();
        data.insert(key.to_string(), value.to_string());
        Self {
            data: RwLock::new(data),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self.data.read().map_err(|_| lock_poisoned())?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.data.write().map_err(|_| lock_poisoned())?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut guard = self.data.write().map_err(|_| lock_poisoned())?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStorage")
            .field("entries", &count)
            .finish()
    }
}

/// Storage backed by a directory, one `<key>.json` file per key.
///
/// Writes go to `<key>.json.tmp` first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// The directory does not need to exist; it is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStorage for FileStorage {
    fn name(&self) -> &str {
        "FileStorage"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = write_atomic(&self.path_for(key), value)?;
        tracing::debug!(path = %path.display(), bytes = value.len(), "saved session");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        if !self.dir.exists() {
            return fs::create_dir_all(&self.dir).is_ok();
        }
        let probe = self.dir.join(".fishbone_test_write");
        if fs::write(&probe, b"test").is_ok() {
            let _ = fs::remove_file(&probe);
            return true;
        }
        false
    }
}

impl fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStorage")
            .field("dir", &self.dir)
            .finish()
    }
}

/// Writes `contents` to `path` through a temporary sibling and a rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }
    fs::rename(&tmp_path, path)?;

    Ok(path.to_path_buf())
}

pub fn save_session(storage: &dyn SessionStorage, doc: &AnalysisDocument) -> Result<()> {
    let json = json::to_session_json(doc)?;
    storage.set(SESSION_KEY, &json)
}

/// Reads the session snapshot. Missing fields keep their defaults; a
/// snapshot that can't be read or doesn't validate is ignored with a
/// warning and the empty document is returned instead.
pub fn load_session(storage: &dyn SessionStorage) -> AnalysisDocument {
    let saved = match storage.get(SESSION_KEY) {
        Ok(Some(saved)) => saved,
        Ok(None) => return AnalysisDocument::default(),
        Err(err) => {
            tracing::warn!(backend = storage.name(), error = %err, "failed to read session");
            return AnalysisDocument::default();
        }
    };

    match json::from_session_json(&saved).and_then(|doc| validate_document(&doc).map(|_| doc)) {
        Ok(doc) => {
            tracing::debug!(
                backend = storage.name(),
                causes = doc.causes.len(),
                "loaded session"
            );
            doc
        }
        Err(err) => {
            tracing::warn!(backend = storage.name(), error = %err, "ignoring unreadable session");
            AnalysisDocument::default()
        }
    }
}

pub fn clear_session(storage: &dyn SessionStorage) -> Result<()> {
    storage.remove(SESSION_KEY)
}

/// A file offered to the user for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub contents: String,
}

impl ExportedFile {
    /// Writes the file into `dir` under its own name.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        write_atomic(&dir.join(&self.file_name), &self.contents)
    }
}

pub fn export_analysis(doc: &AnalysisDocument, now: DateTime<Utc>) -> Result<ExportedFile> {
    Ok(ExportedFile {
        file_name: json::analysis_file_name(now.date_naive()),
        contents: json::to_analysis_file_json(doc, now)?,
    })
}

/// Parses and validates a saved analysis file. Anything wrong with it is
/// reported as [`ErrorCode::CorruptData`].
pub fn import_analysis(contents: &str) -> Result<AnalysisDocument> {
    let doc = json::from_analysis_file_json(contents)?;
    validate_document(&doc)?;
    Ok(doc)
}

pub fn export_report(doc: &AnalysisDocument, now: DateTime<Utc>) -> ExportedFile {
    let date = now.date_naive();
    ExportedFile {
        file_name: report::report_file_name(date),
        contents: report::generate_report(doc).to_markdown(date),
    }
}
