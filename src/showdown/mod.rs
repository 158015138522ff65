//! C7: the hand scorer. Classifies 5-card hands, enumerates the best 5 out
//! of up to 7, and scores them with the exact multiplier/adjustment table
//! from §4.5 so scores compare bit-identically across implementations.

pub mod native;
pub mod winners;

use core::cmp::Ordering;

use crate::domain::Card;

pub use native::{choose_best, score_five, ScoredHand};
pub use winners::resolve_winners;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

/// Canonical display sort: highvalue descending, suit descending as a
/// tiebreak. Purely cosmetic; scores are order-independent sums.
pub fn sort_desc_by_highvalue(cards: &mut [Card]) {
    cards.sort_by(|a, b| match b.highvalue.cmp(&a.highvalue) {
        Ordering::Equal => b.suit.cmp(&a.suit),
        o => o,
    });
}

/// The ten concrete rank windows tested by straight detection (§4.5); index
/// 9 is the ace-high window `{10,11,12,13,1}`.
const STRAIGHT_WINDOWS: [[u8; 5]; 10] = [
    [1, 2, 3, 4, 5],
    [2, 3, 4, 5, 6],
    [3, 4, 5, 6, 7],
    [4, 5, 6, 7, 8],
    [5, 6, 7, 8, 9],
    [6, 7, 8, 9, 10],
    [7, 8, 9, 10, 11],
    [8, 9, 10, 11, 12],
    [9, 10, 11, 12, 13],
    [10, 11, 12, 13, 1],
];

pub const LOW_ACE_WINDOW: usize = 0;
pub const ACE_HIGH_WINDOW: usize = 9;

/// Sort-free straight detection over a multiset of five `rank` values
/// (1..13, ace=1): tests equality against each window regardless of input
/// order, returns the matched window index.
pub fn detect_straight(ranks: &[u8; 5]) -> Option<usize> {
    let mut sorted = *ranks;
    sorted.sort_unstable();
    STRAIGHT_WINDOWS.iter().position(|window| {
        let mut w = *window;
        w.sort_unstable();
        w == sorted
    })
}
