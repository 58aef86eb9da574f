//! Disk-backed cache for binary attachments awaiting yEnc encoding.
//!
//! Ported from `pan/data/encode-cache.{h,cc}`. Shares the budget/eviction
//! shape of [`crate::article_cache::ArticleCache`] but supports
//! incremental `update`/`finalize` writes, since attachments are built up
//! piece by piece during compose.

use crate::article_cache::{percent_encode_filename, CacheError, CacheResult};
use crate::quark::Quark;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tracing::debug;

#[derive(Debug, Clone)]
struct MsgInfo {
    size: u64,
    date: SystemTime,
    finalized: bool,
}

pub trait EncodeCacheListener: Send + Sync {
    fn on_cache_added(&self, message_id: &Quark);
    fn on_cache_removed(&self, message_ids: &[Quark]);
}

pub struct EncodeCache {
    path: PathBuf,
    max_bytes: u64,
    current_bytes: u64,
    locks: HashMap<Quark, u32>,
    entries: HashMap<Quark, MsgInfo>,
    listeners: Mutex<Vec<Arc<dyn EncodeCacheListener>>>,
}

impl EncodeCache {
    pub fn new(path: impl Into<PathBuf>, max_megs: u64) -> CacheResult<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        Ok(EncodeCache {
            path,
            max_bytes: max_megs.saturating_mul(1024 * 1024),
            current_bytes: 0,
            locks: HashMap::new(),
            entries: HashMap::new(),
            listeners: Mutex::new(Vec::new()),
        })
    }

    pub fn add_listener(&self, listener: Arc<dyn EncodeCacheListener>) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn fire_added(&self, mid: &Quark) {
        for l in self.listeners.lock().unwrap().iter() {
            l.on_cache_added(mid);
        }
    }

    fn fire_removed(&self, mids: &[Quark]) {
        if mids.is_empty() {
            return;
        }
        for l in self.listeners.lock().unwrap().iter() {
            l.on_cache_removed(mids);
        }
    }

    pub fn contains(&self, message_id: &Quark) -> bool {
        self.entries.contains_key(message_id)
    }

    pub fn get_filename(&self, mid: &Quark) -> PathBuf {
        self.path.join(percent_encode_filename(mid.as_str()))
    }

    /// Reserve a (possibly empty) slot for `message_id`, creating an empty
    /// file so subsequent `update` calls can append to it.
    pub fn add(&mut self, message_id: &Quark) -> CacheResult<()> {
        let path = self.get_filename(message_id);
        if !path.exists() {
            std::fs::write(&path, [])?;
        }
        self.entries.insert(
            message_id.clone(),
            MsgInfo {
                size: 0,
                date: SystemTime::now(),
                finalized: false,
            },
        );
        self.fire_added(message_id);
        Ok(())
    }

    /// Append `data` to the entry's file, updating its size/budget
    /// accounting. Fails if `message_id` has already been finalized.
    pub fn update(&mut self, message_id: &Quark, data: &[u8]) -> CacheResult<()> {
        let finalized = self
            .entries
            .get(message_id)
            .map(|i| i.finalized)
            .unwrap_or(false);
        if finalized {
            return Err(CacheError::NotFound(format!(
                "{} already finalized",
                message_id.as_str()
            )));
        }
        if !self.entries.contains_key(message_id) {
            self.add(message_id)?;
        }
        let path = self.get_filename(message_id);
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new().append(true).open(&path)?;
        file.write_all(data)?;

        let info = self.entries.get_mut(message_id).unwrap();
        info.size += data.len() as u64;
        info.date = SystemTime::now();
        self.current_bytes += data.len() as u64;
        self.resize();
        Ok(())
    }

    pub fn finalize(&mut self, message_id: &Quark) {
        if let Some(info) = self.entries.get_mut(message_id) {
            info.finalized = true;
        }
    }

    pub fn get_data(&self, mid: &Quark) -> CacheResult<Vec<u8>> {
        if !self.entries.contains_key(mid) {
            return Err(CacheError::NotFound(mid.as_str().to_string()));
        }
        Ok(std::fs::read(self.get_filename(mid))?)
    }

    pub fn reserve(&mut self, mids: &[Quark]) {
        for mid in mids {
            *self.locks.entry(mid.clone()).or_insert(0) += 1;
        }
    }

    pub fn release(&mut self, mids: &[Quark]) {
        for mid in mids {
            if let Some(count) = self.locks.get_mut(mid) {
                *count -= 1;
                if *count == 0 {
                    self.locks.remove(mid);
                }
            }
        }
        self.resize();
    }

    fn is_locked(&self, mid: &Quark) -> bool {
        self.locks.get(mid).is_some_and(|&n| n > 0)
    }

    pub fn resize(&mut self) {
        if self.current_bytes <= self.max_bytes {
            return;
        }
        let mut by_age: Vec<(Quark, SystemTime)> = self
            .entries
            .iter()
            .filter(|(mid, info)| info.finalized && !self.is_locked(mid))
            .map(|(mid, info)| (mid.clone(), info.date))
            .collect();
        by_age.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let mut removed = Vec::new();
        for (mid, _) in by_age {
            if self.current_bytes <= self.max_bytes {
                break;
            }
            if let Some(info) = self.entries.remove(&mid) {
                let _ = std::fs::remove_file(self.get_filename(&mid));
                self.current_bytes = self.current_bytes.saturating_sub(info.size);
                debug!(message_id = %mid, "evicting finalized attachment from encode cache");
                removed.push(mid);
            }
        }
        self.fire_removed(&removed);
    }

    pub fn clear(&mut self) {
        let removed: Vec<Quark> = self.entries.keys().cloned().collect();
        for mid in &removed {
            let _ = std::fs::remove_file(self.get_filename(mid));
        }
        self.entries.clear();
        self.current_bytes = 0;
        self.fire_removed(&removed);
    }

    pub fn get_filenames(&self, mids: &[Quark]) -> Vec<PathBuf> {
        mids.iter()
            .filter(|m| self.entries.contains_key(*m))
            .map(|m| self.get_filename(m))
            .collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
