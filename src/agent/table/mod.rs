use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::prelude::*;

/// Bumped whenever evaluation semantics change, orphaning every older cache file.
pub const VERSION: u32 = 3;

/// The default maximum number of cached evaluations.
pub const DEFAULT_CAPACITY: usize = 4_000_000;

#[derive(Debug)]
/// Where a cache and the hash tables its keys depend on are persisted.
struct Location
{
    dir:     PathBuf,
    version: u32,
    hasher:  Arc<ZobristTable>,
}

impl Location
{
    fn cache_file(&self) -> PathBuf
    {
        self.dir.join(format!("{}.txt", self.version))
    }

    fn hasher_file(&self) -> PathBuf
    {
        self.dir.join(format!("{}.zobrist.txt", self.version))
    }
}

#[derive(Debug)]
/// A concurrent map from position fingerprints to evaluator scores.
///
/// Entries are not verified against the position that produced them, so two positions whose
/// fingerprints collide share a score. Fingerprints also leave out which unit is immune to the
/// pillbug and which one is stunned, so positions differing only in those share a score too, even
/// though both can change what the side to move may play.
pub struct TranspositionCache
{
    map:      DashMap<u64, i32>,
    hits:     AtomicU64,
    misses:   AtomicU64,
    capacity: usize,
    disabled: bool,
    location: Option<Location>,
    flushing: Mutex<()>,
}

impl Default for TranspositionCache
{
    fn default() -> Self
    {
        TranspositionCache::new(DEFAULT_CAPACITY)
    }
}

impl TranspositionCache
{
    /// Creates an empty cache that lives only in memory.
    pub fn new(capacity: usize) -> TranspositionCache
    {
        TranspositionCache {
            map: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            capacity,
            disabled: false,
            location: None,
            flushing: Mutex::new(()),
        }
    }

    /// Creates a cache that never stores anything and misses on every lookup.
    pub fn disabled() -> TranspositionCache
    {
        TranspositionCache {
            disabled: true,
            ..TranspositionCache::new(0)
        }
    }

    /// Opens the cache persisted under a directory for a version, along with the hash tables its keys need.
    ///
    /// Read failures are logged and yield an empty cache. Cached scores are only kept when the
    /// hash tables load too, since their fingerprints mean nothing under other tables.
    pub fn open(dir: &Path, version: u32, capacity: usize, seed: Option<u64>) -> (TranspositionCache, Arc<ZobristTable>)
    {
        let probe = Location {
            dir: dir.to_path_buf(),
            version,
            hasher: Arc::new(ZobristTable::new(seed)),
        };

        let (hasher, scores) = match ZobristTable::load(&probe.hasher_file(), seed)
        {
            | Ok(hasher) =>
            {
                let scores = read_scores(&probe.cache_file()).unwrap_or_else(|err| {
                    log::warn!("{}", err);
                    Vec::new()
                });
                (Arc::new(hasher), scores)
            }
            | Err(err) =>
            {
                log::info!("Starting from an empty cache: {}", err);
                (probe.hasher.clone(), Vec::new())
            }
        };

        let cache = TranspositionCache {
            location: Some(Location {
                hasher: hasher.clone(),
                ..probe
            }),
            ..TranspositionCache::new(capacity)
        };

        for (key, score) in scores.into_iter().take(capacity)
        {
            cache.map.insert(key, score);
        }
        log::info!("Loaded {} cached evaluations (version {}).", cache.len(), version);

        (cache, hasher)
    }

    /// Writes every entry and the hash tables to disk. In-memory and disabled caches do nothing.
    pub fn flush(&self) -> Result<()>
    {
        let Some(location) = self.location.as_ref().filter(|_| !self.disabled)
        else
        {
            return Ok(());
        };

        let _guard = self.flushing.lock();
        let base = Error::new(Kind::CacheIoError, format!("Could not flush the cache to {}.", location.dir.display()));

        fs::create_dir_all(&location.dir).map_err(|err| Error::from(err).chain(base.clone()))?;
        location.hasher.save(&location.hasher_file()).map_err(|err| err.chain(base.clone()))?;

        let mut contents = String::with_capacity(self.map.len() * 24);
        for entry in self.map.iter()
        {
            let _ = writeln!(contents, "{}={}", entry.key(), entry.value());
        }

        let path = location.cache_file();
        let temporary = path.with_extension("tmp");
        fs::write(&temporary, contents)
            .and_then(|_| fs::rename(&temporary, &path))
            .map_err(|err| Error::from(err).chain(base))?;

        log::info!(
            "Flushed {} cached evaluations ({} hits, {} misses).",
            self.len(),
            self.hits(),
            self.misses()
        );
        Ok(())
    }

    pub fn hits(&self) -> u64
    {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn is_disabled(&self) -> bool
    {
        self.disabled
    }

    pub fn is_empty(&self) -> bool
    {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize
    {
        self.map.len()
    }

    /// Finds the score stored for a fingerprint.
    pub fn lookup(&self, key: u64) -> Option<i32>
    {
        let found = if self.disabled { None } else { self.map.get(&key).map(|score| *score) };

        match found
        {
            | Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            | None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    pub fn misses(&self) -> u64
    {
        self.misses.load(Ordering::Relaxed)
    }

    /// Remembers the score of a fingerprint. Once full, only existing entries are updated.
    pub fn store(&self, key: u64, score: i32)
    {
        if self.disabled || (self.map.len() >= self.capacity && !self.map.contains_key(&key))
        {
            return;
        }
        self.map.insert(key, score);
    }
}

/// Reads `fingerprint=score` lines, skipping any that are malformed.
fn read_scores(path: &Path) -> Result<Vec<(u64, i32)>>
{
    let base = Error::new(Kind::CacheIoError, format!("Could not read cached evaluations from {}.", path.display()));
    let contents = fs::read_to_string(path).map_err(|err| Error::from(err).chain(base))?;

    let mut skipped = 0usize;
    let scores = contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = line
                .split_once('=')
                .and_then(|(key, score)| Some((key.trim().parse::<u64>().ok()?, score.trim().parse::<i32>().ok()?)));
            if parsed.is_none()
            {
                skipped += 1;
            }
            parsed
        })
        .collect();

    if skipped > 0
    {
        log::warn!("Skipped {} malformed lines in {}.", skipped, path.display());
    }
    Ok(scores)
}
