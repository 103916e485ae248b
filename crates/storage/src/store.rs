// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotating file store for SEL records

use crate::line::{format_line, record_id_of, LogEntry};
use chrono::{DateTime, Utc};
use sel_core::{
    check_sensor_path, Clock, EncodeError, EventRecord, RecordId, RecordIdAllocator,
};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T, StoreError>;
}

impl<T> IoContext<T> for Result<T, io::Error> {
    fn at(self, path: &Path) -> Result<T, StoreError> {
        self.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Error)]
pub enum AppendError {
    /// Rejected before an id was allocated
    #[error("record rejected: {0}")]
    Invalid(#[from] EncodeError),
    /// Failed after `id` was allocated; the id stays consumed
    #[error("failed to persist record {id}: {source}")]
    Write {
        id: RecordId,
        #[source]
        source: StoreError,
    },
}

/// Where and how the log files are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub dir: PathBuf,
    /// File name of the active log; rotated files append `.N`
    pub prefix: String,
    /// File whose mtime records the last clear
    pub erase_marker: PathBuf,
    /// Rotate once the active file reaches this size (0 disables rotation)
    pub max_file_bytes: u64,
    /// Total number of files kept, active file included
    pub max_files: usize,
}

impl StoreConfig {
    pub fn new(dir: impl Into<PathBuf>, erase_marker: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "ipmi_sel".to_string(),
            erase_marker: erase_marker.into(),
            max_file_bytes: 0,
            max_files: 1,
        }
    }

    pub fn active_file(&self) -> PathBuf {
        self.dir.join(&self.prefix)
    }

    fn rotated_file(&self, n: usize) -> PathBuf {
        self.dir.join(format!("{}.{n}", self.prefix))
    }

    /// Rotation index of a file name: 0 for the active file
    fn rotation_index(&self, name: &str) -> Option<usize> {
        let rest = name.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() {
            return Some(0);
        }
        rest.strip_prefix('.')?.parse::<usize>().ok().filter(|n| *n > 0)
    }
}

/// Summary of the stored log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub entries: usize,
    pub last_add: Option<DateTime<Utc>>,
    pub last_erase: Option<DateTime<Utc>>,
}

/// SEL records persisted as text lines across rotating files.
///
/// Owns the record id allocator; ids are recovered from the files at open.
pub struct LogStore<C: Clock> {
    config: StoreConfig,
    clock: C,
    allocator: RecordIdAllocator,
}

impl<C: Clock> LogStore<C> {
    /// Open the store, seeding the allocator from the highest persisted id
    pub fn open(config: StoreConfig, clock: C) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.dir).at(&config.dir)?;
        let mut store = Self {
            config,
            clock,
            allocator: RecordIdAllocator::new(),
        };
        let mut ids = Vec::new();
        for file in store.files()? {
            match read_lines(&file) {
                Ok(lines) => ids.extend(lines.iter().filter_map(|l| record_id_of(l))),
                Err(e) => tracing::warn!(file = %file.display(), error = %e, "unreadable log file"),
            }
        }
        store.allocator.initialize(ids);
        tracing::info!(
            dir = %store.config.dir.display(),
            last_id = ?store.allocator.last_issued(),
            "log store opened"
        );
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn allocator(&self) -> &RecordIdAllocator {
        &self.allocator
    }

    /// Log files ordered newest first: the active file, then `.1`, `.2`, ...
    pub fn files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let dir = &self.config.dir;
        let read_dir = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).at(dir),
        };
        let mut files = Vec::new();
        for entry in read_dir {
            let entry = entry.at(dir)?;
            let name = entry.file_name();
            if let Some(index) = name.to_str().and_then(|n| self.config.rotation_index(n)) {
                files.push((index, entry.path()));
            }
        }
        files.sort();
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }

    /// Persist a record under a freshly allocated id
    pub fn append(&mut self, record: &EventRecord) -> Result<RecordId, AppendError> {
        if let Some(path) = record.sensor_path() {
            check_sensor_path(path)?;
        }
        let id = self.allocator.allocate();
        let line = format_line(self.clock.now(), id, record);
        self.write_line(&line)
            .map_err(|source| AppendError::Write { id, source })?;
        tracing::debug!(%id, record_type = record.record_type, "record appended");
        Ok(id)
    }

    fn write_line(&mut self, line: &str) -> Result<(), StoreError> {
        self.rotate_if_needed()?;
        let path = self.config.active_file();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .at(&path)?;
        writeln!(file, "{line}").at(&path)?;
        file.sync_all().at(&path)
    }

    fn rotate_if_needed(&self) -> Result<(), StoreError> {
        if self.config.max_file_bytes == 0 {
            return Ok(());
        }
        let active = self.config.active_file();
        let size = match fs::metadata(&active) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e).at(&active),
        };
        if size < self.config.max_file_bytes {
            return Ok(());
        }

        let keep = self.config.max_files.saturating_sub(1);
        if keep == 0 {
            remove_if_exists(&active)?;
        } else {
            remove_if_exists(&self.config.rotated_file(keep))?;
            for n in (1..keep).rev() {
                let from = self.config.rotated_file(n);
                if from.exists() {
                    let to = self.config.rotated_file(n + 1);
                    fs::rename(&from, &to).at(&from)?;
                }
            }
            fs::rename(&active, self.config.rotated_file(1)).at(&active)?;
        }
        tracing::info!(file = %active.display(), size, "log rotated");
        Ok(())
    }

    /// Remove the record with `id` by rewriting the file that holds it.
    ///
    /// Returns false without touching anything when no file has the id.
    pub fn delete_record(&mut self, id: RecordId) -> Result<bool, StoreError> {
        for file in self.files()? {
            let lines = read_lines(&file).at(&file)?;
            if !lines.iter().any(|l| record_id_of(l) == Some(id)) {
                continue;
            }

            let modified = fs::metadata(&file).and_then(|m| m.modified()).at(&file)?;
            let tmp = self.temp_path(&file);
            {
                let mut out = File::create(&tmp).at(&tmp)?;
                for line in lines.iter().filter(|l| record_id_of(l) != Some(id)) {
                    writeln!(out, "{line}").at(&tmp)?;
                }
                out.sync_all().at(&tmp)?;
            }
            fs::rename(&tmp, &file).at(&file)?;
            set_modified(&file, modified)?;

            self.allocator.release(id);
            tracing::info!(%id, file = %file.display(), "record deleted");
            return Ok(true);
        }
        Ok(false)
    }

    fn temp_path(&self, file: &Path) -> PathBuf {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.config.dir.join(format!(".{name}.tmp"))
    }

    /// Mark the erase time, remove every log file and reset ids
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.touch_erase_marker()?;
        for file in self.files()? {
            remove_if_exists(&file)?;
        }
        self.allocator.reset_all();
        tracing::info!(dir = %self.config.dir.display(), "log cleared");
        Ok(())
    }

    fn touch_erase_marker(&self) -> Result<(), StoreError> {
        let marker = &self.config.erase_marker;
        if let Some(parent) = marker.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(marker)
            .at(marker)?;
        set_modified(marker, SystemTime::from(self.clock.now()))
    }

    /// All parsed entries, oldest first. Unparseable lines are skipped.
    pub fn entries(&self) -> Result<Vec<LogEntry>, StoreError> {
        let mut entries = Vec::new();
        for file in self.files()?.into_iter().rev() {
            for line in read_lines(&file).at(&file)? {
                match LogEntry::parse(&line) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => tracing::warn!(file = %file.display(), error = %e, "skipping log line"),
                }
            }
        }
        Ok(entries)
    }

    pub fn info(&self) -> Result<StoreInfo, StoreError> {
        let mut entries = 0;
        for file in self.files()? {
            entries += read_lines(&file)
                .at(&file)?
                .iter()
                .filter(|l| record_id_of(l).is_some())
                .count();
        }
        Ok(StoreInfo {
            entries,
            last_add: modified_time(&self.config.active_file())?,
            last_erase: modified_time(&self.config.erase_marker)?,
        })
    }
}

fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    reader
        .lines()
        .filter(|l| l.as_ref().map_or(true, |l| !l.trim().is_empty()))
        .collect()
}

fn remove_if_exists(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e).at(path),
        _ => Ok(()),
    }
}

fn set_modified(path: &Path, time: SystemTime) -> Result<(), StoreError> {
    let file = OpenOptions::new().write(true).open(path).at(path)?;
    file.set_modified(time).at(path)
}

fn modified_time(path: &Path) -> Result<Option<DateTime<Utc>>, StoreError> {
    match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(time) => Ok(Some(DateTime::<Utc>::from(time))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).at(path),
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
