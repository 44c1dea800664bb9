//! Owns the persistent engine state across a UCI session: the board, the
//! transposition table, tuning config, and the background search thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::config::EngineConfig;
use crate::moves::Move;
use crate::position::Position;
use crate::search::{SearchInfo, SearchLimits, Searcher};
use crate::tt::TranspositionTable;

/// Shared with the background search thread so `stop`/a new `go` can cut it
/// short without waiting for the current iteration to finish on its own.
pub struct Engine {
    pub position: Position,
    pub config: EngineConfig,
    tt: Arc<Mutex<TranspositionTable>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    last_info: Arc<Mutex<Option<SearchInfo>>>,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        let config = EngineConfig::default();
        let tt = TranspositionTable::with_size_mb(config.hash_mb);
        Engine {
            position: Position::startpos(),
            tt: Arc::new(Mutex::new(tt)),
            config,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
            last_info: Arc::new(Mutex::new(None)),
        }
    }

    pub fn new_game(&mut self) {
        self.stop_search();
        self.position = Position::startpos();
        self.tt.lock().clear();
    }

    pub fn set_hash_mb(&mut self, mb: usize) {
        self.config.set_hash_mb(mb);
        self.stop_search();
        self.tt = Arc::new(Mutex::new(TranspositionTable::with_size_mb(self.config.hash_mb)));
    }

    /// Blocks the calling thread until any in-flight search has stopped.
    pub fn stop_search(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.worker.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Starts a background search over a clone of the current position.
    /// `on_complete` runs on the worker thread once the search returns (used
    /// by the UCI loop to print `bestmove`).
    pub fn start_search(
        &mut self,
        limits: SearchLimits,
        budget_ms: u128,
        on_complete: impl FnOnce(Move, SearchInfo) + Send + 'static,
    ) {
        self.stop_search();
        self.stop.store(false, Ordering::Relaxed);

        let mut position = self.position.clone();
        let config = self.config.clone();
        let stop = self.stop.clone();
        let tt_handle = self.tt.clone();
        let last_info = self.last_info.clone();

        self.worker = Some(std::thread::spawn(move || {
            let mut tt = tt_handle.lock();
            let mut searcher = Searcher::new(&mut position, &mut tt, &config, stop);
            let info = searcher.run(&limits, budget_ms);
            drop(tt);
            *last_info.lock() = Some(info.clone());
            let best = info.pv.first().copied().unwrap_or(Move::NULL);
            on_complete(best, info);
        }));
    }

    #[must_use]
    pub fn last_info(&self) -> Option<SearchInfo> {
        self.last_info.lock().clone()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
