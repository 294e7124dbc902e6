use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the week, 0 = Monday .. 4 = Friday. The grid never grows past 5 days (§1 Non-goals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Day(pub u8);

/// Teaching block within a day, 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Block(pub u8);

/// Linear index into the 25-cell weekly grid: `day * 5 + (block - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot(pub u8);

pub const DAYS_PER_WEEK: u8 = 5;
pub const BLOCKS_PER_DAY: u8 = 5;
pub const GRID_SIZE: usize = (DAYS_PER_WEEK as usize) * (BLOCKS_PER_DAY as usize);

impl Day {
    pub const NAMES: [&'static str; 5] = ["Mon", "Tues", "Wed", "Thurs", "Fri"];

    pub fn name(&self) -> &'static str {
        Self::NAMES.get(self.0 as usize).copied().unwrap_or("?")
    }

    pub fn all() -> impl Iterator<Item = Day> {
        (0..DAYS_PER_WEEK).map(Day)
    }

    pub fn from_name(name: &str) -> Option<Day> {
        Self::NAMES
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|i| Day(i as u8))
    }
}

impl Block {
    pub fn all() -> impl Iterator<Item = Block> {
        (1..=BLOCKS_PER_DAY).map(Block)
    }
}

impl Slot {
    pub fn new(day: Day, block: Block) -> Self {
        Slot(day.0 * BLOCKS_PER_DAY + (block.0 - 1))
    }

    pub fn day(&self) -> Day {
        Day(self.0 / BLOCKS_PER_DAY)
    }

    pub fn block(&self) -> Block {
        Block(self.0 % BLOCKS_PER_DAY + 1)
    }

    pub fn all() -> impl Iterator<Item = Slot> {
        (0..GRID_SIZE as u8).map(Slot)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} P{}", self.day(), self.block().0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_round_trips_through_day_block() {
        for day in Day::all() {
            for block in Block::all() {
                let slot = Slot::new(day, block);
                assert_eq!(slot.day(), day);
                assert_eq!(slot.block(), block);
            }
        }
    }

    #[test]
    fn slot_range_is_0_to_24() {
        let slots: Vec<u8> = Slot::all().map(|s| s.0).collect();
        assert_eq!(slots.len(), 25);
        assert_eq!(slots[0], 0);
        assert_eq!(slots[24], 24);
    }
}
