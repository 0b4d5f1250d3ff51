//! Lock-free transposition table shared by all search threads.
//!
//! Each slot is two `AtomicU64`s: the packed entry data and the position hash
//! XOR-ed with that data. A torn write (key from one store, data from
//! another) fails the XOR check on probe and reads as a miss, so no locking is
//! needed. Two different positions landing on the same slot with the same
//! full 64-bit hash are not detected.
//!
//! Data layout (64 bits):
//! `[age:6][bound:2][depth:8][eval:16][score:16][move:16]`

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use tracing::debug;

use crate::{MATE_BOUND, MAX_PLY};

/// Generations wrap after this many searches (six bits of age).
const AGE_LIMIT: u8 = 64;

/// Shallower non-exact results may not evict an entry of the same search
/// that is more than this many plies deeper.
const DEPTH_MARGIN: i32 = 4;

const MOVE_SHIFT: u32 = 0;
const SCORE_SHIFT: u32 = 16;
const EVAL_SHIFT: u32 = 32;
const DEPTH_SHIFT: u32 = 48;
const BOUND_SHIFT: u32 = 56;
const AGE_SHIFT: u32 = 58;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Fail-low: the true score is at most the stored one.
    Upper = 1,
    /// Fail-high: the true score is at least the stored one.
    Lower = 2,
    Exact = 3,
}

impl Bound {
    fn from_bits(bits: u8) -> Option<Bound> {
        match bits & 3 {
            1 => Some(Bound::Upper),
            2 => Some(Bound::Lower),
            3 => Some(Bound::Exact),
            _ => None,
        }
    }
}

/// Decoded table entry. `score` is relative to the probing node's root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    /// Packed best move, 0 when the node had none.
    pub best_move: u16,
    pub score: i32,
    pub eval: i32,
    pub bound: Bound,
    pub depth: u8,
    pub age: u8,
}

impl TtEntry {
    fn pack(&self) -> u64 {
        (self.best_move as u64) << MOVE_SHIFT
            | (self.score as i16 as u16 as u64) << SCORE_SHIFT
            | (self.eval as i16 as u16 as u64) << EVAL_SHIFT
            | (self.depth as u64) << DEPTH_SHIFT
            | (self.bound as u64) << BOUND_SHIFT
            | ((self.age % AGE_LIMIT) as u64) << AGE_SHIFT
    }

    fn unpack(data: u64) -> Option<TtEntry> {
        let bound = Bound::from_bits((data >> BOUND_SHIFT) as u8)?;
        Some(TtEntry {
            best_move: (data >> MOVE_SHIFT) as u16,
            score: (data >> SCORE_SHIFT) as u16 as i16 as i32,
            eval: (data >> EVAL_SHIFT) as u16 as i16 as i32,
            depth: (data >> DEPTH_SHIFT) as u8,
            bound,
            age: (data >> AGE_SHIFT) as u8,
        })
    }
}

#[derive(Default)]
struct Slot {
    key: AtomicU64,
    data: AtomicU64,
}

impl Slot {
    #[inline]
    fn load(&self) -> (u64, u64) {
        let data = self.data.load(Ordering::Relaxed);
        let key = self.key.load(Ordering::Relaxed) ^ data;
        (key, data)
    }
}

/// Convert a mate score from "distance from root" to "distance from this
/// node" before storing.
#[inline]
fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score + ply as i32
    } else if score <= -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

#[inline]
fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score - ply as i32
    } else if score <= -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

pub struct TranspositionTable {
    slots: Vec<Slot>,
    age: AtomicU8,
}

impl TranspositionTable {
    /// Default size in megabytes.
    pub const DEFAULT_MB: usize = 16;

    pub fn new(mb: usize) -> Self {
        let mut tt = Self {
            slots: Vec::new(),
            age: AtomicU8::new(0),
        };
        tt.resize(mb);
        tt
    }

    /// Reallocate for a `mb` megabyte budget. All entries are lost and the
    /// generation counter restarts.
    pub fn resize(&mut self, mb: usize) {
        let bytes = mb.max(1) << 20;
        let len = bytes / std::mem::size_of::<Slot>() - 2;
        self.slots = std::iter::repeat_with(Slot::default).take(len).collect();
        self.age.store(0, Ordering::Relaxed);
        debug!(mb, entries = len, "transposition table resized");
    }

    pub fn clear(&self) {
        for slot in &self.slots {
            slot.key.store(0, Ordering::Relaxed);
            slot.data.store(0, Ordering::Relaxed);
        }
        debug!("transposition table cleared");
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current search generation.
    pub fn age(&self) -> u8 {
        self.age.load(Ordering::Relaxed)
    }

    /// Advance the generation; called once per completed root search.
    pub fn age_up(&self) {
        let next = (self.age() + 1) % AGE_LIMIT;
        self.age.store(next, Ordering::Relaxed);
    }

    #[inline(always)]
    fn index(&self, hash: u64) -> usize {
        ((hash as u128 * self.slots.len() as u128) >> 64) as usize
    }

    /// Store a search result for the position with `hash`, searched at
    /// `ply` from the root. `best_move` is a packed move (0 for none).
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &self,
        hash: u64,
        best_move: u16,
        score: i32,
        eval: i32,
        bound: Bound,
        depth: i32,
        ply: usize,
    ) {
        let slot = &self.slots[self.index(hash)];
        let age = self.age();
        let depth = depth.clamp(0, u8::MAX as i32);

        // Keep a much deeper entry for the same position from this search
        if bound != Bound::Exact {
            let (key, data) = slot.load();
            if key == hash {
                if let Some(old) = TtEntry::unpack(data) {
                    if depth < old.depth as i32 - DEPTH_MARGIN && old.age == age {
                        return;
                    }
                }
            }
        }

        let entry = TtEntry {
            best_move,
            score: score_to_tt(score, ply),
            eval,
            bound,
            depth: depth as u8,
            age,
        };
        let data = entry.pack();
        slot.data.store(data, Ordering::Relaxed);
        slot.key.store(hash ^ data, Ordering::Relaxed);
    }

    /// Entry for `hash`, with mate scores re-based to `ply`. `None` when the
    /// slot holds another position (or a torn write).
    pub fn probe(&self, hash: u64, ply: usize) -> Option<TtEntry> {
        let (key, data) = self.slots[self.index(hash)].load();
        if key != hash {
            return None;
        }
        let mut entry = TtEntry::unpack(data)?;
        entry.score = score_from_tt(entry.score, ply.min(MAX_PLY));
        Some(entry)
    }

    /// Start pulling the slot for `hash` into cache.
    #[inline(always)]
    pub fn prefetch(&self, hash: u64) {
        #[cfg(target_arch = "x86_64")]
        {
            use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
            let ptr = &self.slots[self.index(hash)] as *const Slot as *const i8;
            // SAFETY: prefetch is a hint and never faults; the pointer is a
            // live element of `slots`.
            #[allow(unused_unsafe)]
            unsafe {
                _mm_prefetch(ptr, _MM_HINT_T0)
            };
        }
        #[cfg(not(target_arch = "x86_64"))]
        let _ = hash;
    }

    /// Permille of sampled slots in use.
    pub fn hashfull(&self) -> u32 {
        let len = self.slots.len();
        let sample = &self.slots[len.min(1)..len.min(1001)];
        let used = sample
            .iter()
            .filter(|slot| slot.data.load(Ordering::Relaxed) != 0)
            .count();
        (used * 1000 / sample.len().max(1)) as u32
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MB)
    }
}

#[cfg(test)]
#[path = "tt_tests.rs"]
mod tt_tests;
