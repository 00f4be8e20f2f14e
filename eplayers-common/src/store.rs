//! File-backed record store
//!
//! One [`RecordStore`] owns one row file. Reads parse the whole file on every
//! call. Writers (create/update/delete) are serialized through a mutex shared
//! by all clones of the store, and update/delete replace the file atomically
//! (temp file + rename) so readers never observe a half-written file.
//!
//! Two stores opened separately on the same path do not share the mutex;
//! open each file once and clone the handle.

use crate::models::Record;
use crate::row::{self, RawRow};
use crate::{Error, Result};
use std::io::SeekFrom;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// CRUD over a single row file for record type `R`
pub struct RecordStore<R> {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            write_lock: Arc::clone(&self.write_lock),
            _record: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for RecordStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").field("path", &self.path).finish()
    }
}

impl<R: Record> RecordStore<R> {
    /// Open the store, creating the containing folder and an empty file if missing
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        if fs::metadata(&path).await.is_err() {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await?;
            debug!("Created empty {} file {}", R::ENTITY, path.display());
        }

        Ok(Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
            _record: PhantomData,
        })
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row
    pub async fn create(&self, record: &R) -> Result<()> {
        let line = self.encode_record(record)?;

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .await?;

        // Keep the new row on its own line if the file was edited by hand
        let len = file.metadata().await?.len();
        let mut buf = Vec::with_capacity(line.len() + 1);
        if len > 0 {
            file.seek(SeekFrom::Start(len - 1)).await?;
            let mut last = [0u8; 1];
            file.read_exact(&mut last).await?;
            if last[0] != b'\n' {
                buf.push(b'\n');
            }
        }
        buf.extend_from_slice(&line);

        file.write_all(&buf).await?;
        file.flush().await?;

        debug!("Appended {} {} to {}", R::ENTITY, record.id(), self.path.display());
        Ok(())
    }

    /// All records in file order
    pub async fn read_all(&self) -> Result<Vec<R>> {
        let rows = self.read_rows().await?;
        rows.iter().map(|raw| self.decode_row(raw)).collect()
    }

    /// First record with `id`, if any
    pub async fn find(&self, id: i32) -> Result<Option<R>> {
        Ok(self.read_all().await?.into_iter().find(|r| r.id() == id))
    }

    /// Replace every row with the record's id by the record, moved to the end
    pub async fn update(&self, record: &R) -> Result<()> {
        let line = self.encode_record(record)?;
        let removed = self.rewrite_without(record.id(), Some(line)).await?;
        if removed == 0 {
            warn!(
                "Update of {} {} matched no rows; appended as new",
                R::ENTITY,
                record.id()
            );
        }
        Ok(())
    }

    /// Remove every row with `id`, returning how many were removed
    pub async fn delete(&self, id: i32) -> Result<usize> {
        self.rewrite_without(id, None).await
    }

    async fn read_rows(&self) -> Result<Vec<RawRow>> {
        let bytes = fs::read(&self.path).await?;
        row::decode(&bytes)
    }

    fn decode_row(&self, raw: &RawRow) -> Result<R> {
        let fields: Vec<&str> = raw.fields.iter().collect();
        if fields.len() != R::FIELDS.len() {
            return Err(self.malformed(
                raw,
                format!(
                    "expected {} fields, found {}",
                    R::FIELDS.len(),
                    fields.len()
                ),
            ));
        }
        R::from_fields(&fields).map_err(|reason| self.malformed(raw, reason))
    }

    fn malformed(&self, raw: &RawRow, reason: String) -> Error {
        Error::MalformedRow {
            path: self.path.clone(),
            line: raw.line,
            reason,
        }
    }

    fn encode_record(&self, record: &R) -> Result<Vec<u8>> {
        let fields = row::build_record(R::FIELDS, &record.to_fields())?;
        row::encode([&fields])
    }

    /// Rewrite-all: drop rows keyed by `id`, optionally append `replacement`
    async fn rewrite_without(&self, id: i32, replacement: Option<Vec<u8>>) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let rows = self.read_rows().await?;
        let total = rows.len();
        let kept: Vec<_> = rows
            .into_iter()
            .filter(|raw| !key_matches(raw, id))
            .map(|raw| raw.fields)
            .collect();
        let removed = total - kept.len();

        let mut content = row::encode(&kept)?;
        if let Some(line) = replacement {
            content.extend_from_slice(&line);
        }

        replace_file(&self.path, &content).await?;
        debug!(
            "Rewrote {} ({} {} row(s) with id {} removed)",
            self.path.display(),
            removed,
            R::ENTITY,
            id
        );
        Ok(removed)
    }
}

/// A row is keyed by `id` when its first field parses as `id`, the same way
/// `read_all` reads it (`01` and `+1` both match 1). Keys that do not parse
/// are compared as text, so unrelated malformed rows are kept.
fn key_matches(raw: &RawRow, id: i32) -> bool {
    match raw.key() {
        Some(key) => match key.parse::<i32>() {
            Ok(parsed) => parsed == id,
            Err(_) => key == id.to_string(),
        },
        None => false,
    }
}

/// Replace `target` with `content` through a sibling temp file and a rename.
/// On failure `target` is untouched and the temp file is removed.
async fn replace_file(target: &Path, content: &[u8]) -> Result<()> {
    let tmp = temp_path(target);

    let result: std::io::Result<()> = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(content).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, target).await
    }
    .await;

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
}
