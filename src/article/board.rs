//! Endless 12-slot matching board for article study.
//!
//! Cleared pairs are replaced from a reserve queue that recirculates the
//! whole dataset, so the board never runs dry while there is data.

use crate::models::ArticleWordRecord;
use crate::shuffle::{shuffle_in_place, shuffled};
use rand::Rng;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

pub const BOARD_SIZE: usize = 12;
pub const MATCH_CLEAR_DELAY: Duration = Duration::from_millis(400);
pub const ERROR_DELAY: Duration = Duration::from_millis(800);
/// Refill waits until at least two pairs of slots are free.
pub const REFILL_THRESHOLD: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileSide {
    Word,
    Translation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Unique per appearance, even when a word comes back.
    pub id: String,
    pub content: String,
    pub pair_key: String,
    pub side: TileSide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTap {
    /// Empty slot, slot being cleared, or an error pair is on show.
    Ignored,
    Selected,
    Deselected,
    /// Call [`InfiniteBoard::clear_match`] with both slots after `delay`.
    Matched {
        first: usize,
        second: usize,
        delay: Duration,
    },
    /// Call [`InfiniteBoard::clear_errors`] after `delay`.
    Mismatched {
        first: usize,
        second: usize,
        delay: Duration,
    },
}

#[derive(Debug)]
pub struct InfiniteBoard {
    data: Vec<ArticleWordRecord>,
    slots: Vec<Option<Tile>>,
    reserve: VecDeque<ArticleWordRecord>,
    selected: Option<usize>,
    error_slots: Vec<usize>,
    clearing: Vec<usize>,
    match_count: u32,
    serial: u64,
}

impl InfiniteBoard {
    pub fn new<R: Rng + ?Sized>(data: &[ArticleWordRecord], rng: &mut R) -> Self {
        let mut board = Self {
            data: data.to_vec(),
            slots: vec![None; BOARD_SIZE],
            reserve: VecDeque::new(),
            selected: None,
            error_slots: Vec::new(),
            clearing: Vec::new(),
            match_count: 0,
            serial: 0,
        };

        let mut placed_keys = HashSet::new();
        let mut tiles = Vec::with_capacity(BOARD_SIZE);
        for record in shuffled(data, rng) {
            if tiles.len() < BOARD_SIZE && placed_keys.insert(record.key()) {
                let pair = board.make_pair(&record);
                tiles.extend(pair);
            } else {
                board.reserve.push_back(record);
            }
        }

        for (slot, tile) in board.slots.iter_mut().zip(tiles) {
            *slot = Some(tile);
        }
        shuffle_in_place(&mut board.slots, rng);

        tracing::debug!(
            "Board dealt {} pairs, {} in reserve",
            placed_keys.len(),
            board.reserve.len()
        );
        board.refill(rng);
        board
    }

    pub fn slots(&self) -> &[Option<Tile>] {
        &self.slots
    }

    pub fn tile(&self, slot: usize) -> Option<&Tile> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_error(&self, slot: usize) -> bool {
        self.error_slots.contains(&slot)
    }

    pub fn is_clearing(&self, slot: usize) -> bool {
        self.clearing.contains(&slot)
    }

    pub fn match_count(&self) -> u32 {
        self.match_count
    }

    pub fn reserve_len(&self) -> usize {
        self.reserve.len()
    }

    pub fn empty_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    pub fn tap(&mut self, slot: usize) -> SlotTap {
        let Some(tile) = self.tile(slot) else {
            return SlotTap::Ignored;
        };
        if self.is_clearing(slot) || !self.error_slots.is_empty() {
            return SlotTap::Ignored;
        }

        let Some(first) = self.selected else {
            self.selected = Some(slot);
            return SlotTap::Selected;
        };
        if first == slot {
            self.selected = None;
            return SlotTap::Deselected;
        }

        let is_match = self.tile(first).is_some_and(|t| t.pair_key == tile.pair_key);
        if is_match {
            self.selected = None;
            self.clearing.extend([first, slot]);
            self.match_count += 1;
            SlotTap::Matched {
                first,
                second: slot,
                delay: MATCH_CLEAR_DELAY,
            }
        } else {
            self.error_slots = vec![first, slot];
            SlotTap::Mismatched {
                first,
                second: slot,
                delay: ERROR_DELAY,
            }
        }
    }

    /// Remove a matched pair and refill. Returns the number of pairs dealt.
    pub fn clear_match<R: Rng + ?Sized>(
        &mut self,
        first: usize,
        second: usize,
        rng: &mut R,
    ) -> usize {
        for slot in [first, second] {
            if let Some(pos) = self.clearing.iter().position(|s| *s == slot) {
                self.clearing.remove(pos);
                self.slots[slot] = None;
            }
        }
        self.refill(rng)
    }

    pub fn clear_errors(&mut self) {
        self.error_slots.clear();
        self.selected = None;
    }

    fn make_pair(&mut self, record: &ArticleWordRecord) -> [Tile; 2] {
        self.serial += 1;
        let key = record.key();
        [
            Tile {
                id: format!("w-{}-{}", key, self.serial),
                content: record.word.clone(),
                pair_key: key.clone(),
                side: TileSide::Word,
            },
            Tile {
                id: format!("t-{}-{}", key, self.serial),
                content: record.translation.clone(),
                pair_key: key,
                side: TileSide::Translation,
            },
        ]
    }

    fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut empty: Vec<usize> = (0..BOARD_SIZE).filter(|i| self.slots[*i].is_none()).collect();
        if empty.len() < REFILL_THRESHOLD {
            return 0;
        }
        let pairs_needed = empty.len() / 2;

        let on_board: HashSet<String> = self
            .slots
            .iter()
            .flatten()
            .map(|t| t.pair_key.clone())
            .collect();

        if self.reserve.len() < pairs_needed {
            let mut seen: HashSet<String> = self.reserve.iter().map(|r| r.key()).collect();
            seen.extend(on_board.iter().cloned());
            let candidates: Vec<ArticleWordRecord> = self
                .data
                .iter()
                .filter(|r| seen.insert(r.key()))
                .cloned()
                .collect();

            if !candidates.is_empty() {
                self.reserve.extend(shuffled(&candidates, rng));
            } else if on_board.is_empty() && !self.data.is_empty() {
                self.reserve = shuffled(&self.data, rng).into();
            }
        }

        let mut drawn_keys = HashSet::new();
        let mut drawn = Vec::with_capacity(pairs_needed);
        let mut kept = VecDeque::with_capacity(self.reserve.len());
        for record in self.reserve.drain(..) {
            let key = record.key();
            if drawn.len() < pairs_needed && !on_board.contains(&key) && drawn_keys.insert(key) {
                drawn.push(record);
            } else {
                kept.push_back(record);
            }
        }
        self.reserve = kept;

        if drawn.is_empty() {
            return 0;
        }

        let mut tiles = Vec::with_capacity(drawn.len() * 2);
        for record in &drawn {
            let pair = self.make_pair(record);
            tiles.extend(pair);
        }
        shuffle_in_place(&mut tiles, rng);
        shuffle_in_place(&mut empty, rng);
        for (slot, tile) in empty.into_iter().zip(tiles) {
            self.slots[slot] = Some(tile);
        }

        tracing::debug!(
            "Board refilled {} pairs, {} left in reserve",
            drawn.len(),
            self.reserve.len()
        );
        drawn.len()
    }
}
