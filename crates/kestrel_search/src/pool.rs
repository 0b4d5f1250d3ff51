//! Lazy SMP: every worker searches the same root on its own thread and they
//! cooperate only through the shared transposition table. The main worker
//! reports progress and raises the stop flag for the rest once it is done.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use kestrel_core::{Position, SearchLimits, TimeControl};

use crate::history::HistoryTable;
use crate::info::SearchEvent;
use crate::thread::SearchThread;
use crate::tt::TranspositionTable;

/// Stack of a search thread. Every ply keeps a position copy and a move
/// picker on the stack.
const STACK_SIZE: usize = 32 << 20;

pub const MAX_THREADS: usize = 256;

pub struct Searcher {
    tt: Arc<TranspositionTable>,
    stop: Arc<AtomicBool>,
    threads: usize,
    /// Per-worker ordering statistics, kept between searches of one game.
    histories: Vec<HistoryTable>,
    handles: Vec<JoinHandle<HistoryTable>>,
}

impl Searcher {
    pub fn new(hash_mb: usize, threads: usize) -> Self {
        Self {
            tt: Arc::new(TranspositionTable::new(hash_mb)),
            stop: Arc::new(AtomicBool::new(false)),
            threads: threads.clamp(1, MAX_THREADS),
            histories: Vec::new(),
            handles: Vec::new(),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    pub fn set_threads(&mut self, threads: usize) {
        self.halt();
        self.threads = threads.clamp(1, MAX_THREADS);
        self.histories.truncate(self.threads);
    }

    /// Reallocate the table. A running search is stopped first.
    pub fn resize_tt(&mut self, mb: usize) {
        self.halt();
        match Arc::get_mut(&mut self.tt) {
            Some(tt) => tt.resize(mb),
            None => self.tt = Arc::new(TranspositionTable::new(mb)),
        }
    }

    /// Forget everything learned so far, as for a new game.
    pub fn clear(&mut self) {
        self.halt();
        self.tt.clear();
        self.histories.iter_mut().for_each(HistoryTable::clear);
    }

    pub fn clear_hash(&mut self) {
        self.halt();
        self.tt.clear();
    }

    /// Start searching `root` in the background. Progress and the final
    /// best move arrive on `events`. A search still running is stopped
    /// first and reports its own best move.
    pub fn start(
        &mut self,
        root: &Position,
        limits: SearchLimits,
        events: Sender<SearchEvent>,
    ) -> io::Result<()> {
        self.halt();
        self.stop.store(false, Ordering::SeqCst);

        let time = TimeControl::new(&limits, Arc::clone(&self.stop));
        let mut histories = std::mem::take(&mut self.histories);
        histories.resize_with(self.threads, HistoryTable::new);
        let mut events = Some(events);

        debug!(threads = self.threads, depth = limits.depth, "search started");

        for (id, history) in histories.into_iter().enumerate() {
            let mut worker = SearchThread::new(
                id,
                Arc::clone(&self.tt),
                time.clone(),
                limits.clone(),
                history,
            );
            if let Some(events) = events.take() {
                worker = worker.with_events(events);
            }

            let root = *root;
            let spawned = thread::Builder::new()
                .name(format!("search-{id}"))
                .stack_size(STACK_SIZE)
                .spawn(move || {
                    let result = worker.go(&root);
                    debug!(
                        thread = id,
                        depth = result.depth,
                        nodes = result.nodes,
                        "worker finished"
                    );
                    worker.into_history()
                });

            match spawned {
                Ok(handle) => self.handles.push(handle),
                Err(err) => {
                    self.halt();
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    /// Ask every worker to return as soon as possible. The main worker still
    /// reports its best move.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Stop any running search and join its workers.
    pub fn halt(&mut self) {
        self.stop();
        self.wait();
    }

    /// Block until every worker has returned.
    pub fn wait(&mut self) {
        for handle in self.handles.drain(..) {
            match handle.join() {
                Ok(history) => self.histories.push(history),
                Err(_) => warn!("search thread panicked"),
            }
        }
    }

    pub fn is_searching(&self) -> bool {
        self.handles.iter().any(|h| !h.is_finished())
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(TranspositionTable::DEFAULT_MB, 1)
    }
}

impl Drop for Searcher {
    fn drop(&mut self) {
        self.halt();
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod pool_tests;
