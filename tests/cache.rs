mod common;
use common::*;

#[cfg(test)]
mod cache
{
    use hive_explorer::prelude::*;

    use super::{templates::*, *};

    const VERSION: u32 = table::VERSION;

    #[test]
    fn flush_then_reload_keeps_every_score()
    {
        let _setup = setup::setup();
        let dir = tempfile::tempdir().expect("scratch directory");

        let entries = [(1u64, 17i32), (u64::MAX, i32::MIN), (42, i32::MAX), (7, i32::MIN + 1), (99, -5)];
        let (cache, hasher) = TranspositionCache::open(dir.path(), VERSION, 100, Some(1));
        assert!(cache.is_empty());
        for (key, score) in entries
        {
            cache.store(key, score);
        }
        let probe = hasher.unit(&unit(W, Class::Ant, 1), at(3, -1, -2), 1);
        cache.flush().expect("flush");

        let (reloaded, rehasher) = TranspositionCache::open(dir.path(), VERSION, 100, None);
        assert_eq!(reloaded.len(), entries.len());
        for (key, score) in entries
        {
            assert_eq!(reloaded.lookup(key), Some(score));
        }
        assert_eq!(rehasher.unit(&unit(W, Class::Ant, 1), at(3, -1, -2), 1), probe);
    }

    #[test]
    fn reloaded_tables_reproduce_fingerprints()
    {
        let _setup = setup::setup();
        let dir = tempfile::tempdir().expect("scratch directory");

        let (cache, hasher) = TranspositionCache::open(dir.path(), VERSION, 100, None);
        let mut state = GameState::new(GameOptions::default(), hasher);
        play_all(&mut state, &queenless_opening());
        cache.store(state.fingerprint(), 1234);
        cache.flush().expect("flush");

        let (reloaded, rehasher) = TranspositionCache::open(dir.path(), VERSION, 100, None);
        let mut replayed = GameState::new(GameOptions::default(), rehasher);
        play_all(&mut replayed, &queenless_opening());
        assert_eq!(reloaded.lookup(replayed.fingerprint()), Some(1234));
    }

    #[test]
    fn scores_are_dropped_without_their_tables()
    {
        let _setup = setup::setup();
        let dir = tempfile::tempdir().expect("scratch directory");

        let (cache, _) = TranspositionCache::open(dir.path(), VERSION, 100, None);
        cache.store(5, 5);
        cache.flush().expect("flush");

        std::fs::remove_file(dir.path().join(format!("{}.zobrist.txt", VERSION))).expect("remove tables");
        let (reloaded, _) = TranspositionCache::open(dir.path(), VERSION, 100, None);
        assert!(reloaded.is_empty());
        assert_eq!(reloaded.lookup(5), None);
    }

    #[test]
    fn other_versions_start_empty()
    {
        let _setup = setup::setup();
        let dir = tempfile::tempdir().expect("scratch directory");

        let (cache, _) = TranspositionCache::open(dir.path(), VERSION, 100, None);
        cache.store(5, 5);
        cache.flush().expect("flush");

        let (other, _) = TranspositionCache::open(dir.path(), VERSION + 1, 100, None);
        assert!(other.is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped()
    {
        let _setup = setup::setup();
        let dir = tempfile::tempdir().expect("scratch directory");

        let (cache, _) = TranspositionCache::open(dir.path(), VERSION, 100, None);
        cache.store(8, 80);
        cache.flush().expect("flush");

        let path = dir.path().join(format!("{}.txt", VERSION));
        let mut contents = std::fs::read_to_string(&path).expect("read cache");
        contents.push_str("garbage\n9=not-a-score\n10=100\n");
        std::fs::write(&path, contents).expect("write cache");

        let (reloaded, _) = TranspositionCache::open(dir.path(), VERSION, 100, None);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.lookup(8), Some(80));
        assert_eq!(reloaded.lookup(10), Some(100));
        assert_eq!(reloaded.lookup(9), None);
    }

    #[test]
    fn disabled_cache_always_misses()
    {
        let _setup = setup::setup();
        let cache = TranspositionCache::disabled();

        cache.store(1, 1);
        assert!(cache.is_disabled());
        assert_eq!(cache.lookup(1), None);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 0);
        assert!(cache.flush().is_ok());
    }

    #[test]
    fn in_memory_cache_writes_nothing()
    {
        let _setup = setup::setup();
        let cache = TranspositionCache::new(10);
        cache.store(1, 1);
        assert_eq!(cache.lookup(1), Some(1));
        assert_eq!(cache.hits(), 1);
        assert!(cache.flush().is_ok());
    }

    #[test]
    fn capacity_bounds_new_entries_only()
    {
        let _setup = setup::setup();
        let cache = TranspositionCache::new(2);

        cache.store(1, 10);
        cache.store(2, 20);
        cache.store(3, 30);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup(3), None);

        cache.store(2, 21);
        assert_eq!(cache.lookup(2), Some(21));
    }

    #[test]
    fn flush_reports_unwritable_directories()
    {
        let _setup = setup::setup();
        let dir = tempfile::tempdir().expect("scratch directory");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").expect("write blocker");

        let (cache, _) = TranspositionCache::open(&blocker.join("cache"), VERSION, 100, None);
        cache.store(1, 1);
        let result = cache.flush();
        assert_eq!(result.map_err(|err| err.kind), Err(Kind::CacheIoError));
    }
}
