//! Disk-backed, Message-ID-keyed article cache with byte-budget eviction
//! and a reserve/release lock to pin multipart pieces in place while
//! they're being decoded.
//!
//! Ported from `pan/data/article-cache.{h,cc}`.

use crate::quark::Quark;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("article not cached: {0}")]
    NotFound(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Percent-encode a message-id into a filesystem-safe filename. Only
/// `[A-Za-z0-9._-]` pass through unescaped.
pub fn percent_encode_filename(message_id: &str) -> String {
    let mut out = String::with_capacity(message_id.len());
    for b in message_id.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

pub fn percent_decode_filename(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&name[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[derive(Debug, Clone)]
struct MsgInfo {
    size: u64,
    date: SystemTime,
}

pub trait ArticleCacheListener: Send + Sync {
    fn on_cache_added(&self, message_id: &Quark);
    fn on_cache_removed(&self, message_ids: &[Quark]);
}

pub struct ArticleCache {
    path: PathBuf,
    max_bytes: u64,
    current_bytes: u64,
    locks: HashMap<Quark, u32>,
    entries: HashMap<Quark, MsgInfo>,
    listeners: Mutex<Vec<Arc<dyn ArticleCacheListener>>>,
}

impl ArticleCache {
    pub fn new(path: impl Into<PathBuf>, max_megs: u64) -> CacheResult<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        Ok(ArticleCache {
            path,
            max_bytes: max_megs.saturating_mul(1024 * 1024),
            current_bytes: 0,
            locks: HashMap::new(),
            entries: HashMap::new(),
            listeners: Mutex::new(Vec::new()),
        })
    }

    pub fn add_listener(&self, listener: Arc<dyn ArticleCacheListener>) {
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

    fn filename(&self, message_id: &Quark) -> PathBuf {
        self.path.join(percent_encode_filename(message_id.as_str()))
    }

    /// Write `article` to disk under `message_id` and account its size in
    /// the byte budget. Resizes afterward if over budget.
    pub fn add(&mut self, message_id: &Quark, article: &[u8]) -> CacheResult<()> {
        let path = self.filename(message_id);
        std::fs::write(&path, article)?;
        let size = article.len() as u64;
        self.current_bytes += size;
        self.entries.insert(
            message_id.clone(),
            MsgInfo {
                size,
                date: SystemTime::now(),
            },
        );
        self.fire_added(message_id);
        self.resize();
        Ok(())
    }

    /// Pin `mids` so they survive eviction while multipart pieces are
    /// being held for decoding together.
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

    /// Evict oldest-first (ties broken by message-id) until under budget,
    /// skipping anything currently reserved.
    pub fn resize(&mut self) {
        if self.current_bytes <= self.max_bytes {
            return;
        }
        let mut by_age: Vec<(Quark, SystemTime)> = self
            .entries
            .iter()
            .filter(|(mid, _)| !self.is_locked(mid))
            .map(|(mid, info)| (mid.clone(), info.date))
            .collect();
        by_age.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let mut removed = Vec::new();
        for (mid, _) in by_age {
            if self.current_bytes <= self.max_bytes {
                break;
            }
            if let Some(info) = self.entries.remove(&mid) {
                let _ = std::fs::remove_file(self.filename(&mid));
                self.current_bytes = self.current_bytes.saturating_sub(info.size);
                debug!(message_id = %mid, "evicting article from cache to stay under byte budget");
                removed.push(mid);
            }
        }
        self.fire_removed(&removed);
    }

    pub fn clear(&mut self) {
        let removed: Vec<Quark> = self.entries.keys().cloned().collect();
        for mid in &removed {
            let _ = std::fs::remove_file(self.filename(mid));
        }
        self.entries.clear();
        self.current_bytes = 0;
        self.fire_removed(&removed);
    }

    pub fn get_filename(&self, mid: &Quark) -> Option<PathBuf> {
        self.entries.contains_key(mid).then(|| self.filename(mid))
    }

    pub fn get_filenames(&self, mids: &[Quark]) -> Vec<PathBuf> {
        mids.iter().filter_map(|m| self.get_filename(m)).collect()
    }

    pub fn read(&self, mid: &Quark) -> CacheResult<Vec<u8>> {
        let path = self
            .get_filename(mid)
            .ok_or_else(|| CacheError::NotFound(mid.as_str().to_string()))?;
        Ok(std::fs::read(path)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
