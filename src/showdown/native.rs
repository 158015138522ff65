//! The classifier and scorer (§4.5). Operates on plain `domain::Card`
//! values; no field-element packing, just an `i64` score that compares
//! correctly across the whole category range.

use crate::domain::Card;

use super::{detect_straight, sort_desc_by_highvalue, HandCategory, ACE_HIGH_WINDOW, LOW_ACE_WINDOW};

#[derive(Clone, Debug, serde::Serialize)]
pub struct ScoredHand {
    pub cards: Vec<Card>,
    pub category: HandCategory,
    pub score: i64,
}

fn rank_histogram(cards: &[Card; 5]) -> [u8; 14] {
    let mut hist = [0u8; 14];
    for c in cards {
        hist[c.rank as usize] += 1;
    }
    hist
}

fn ranks_of_count(hist: &[u8; 14], count: u8) -> Vec<u8> {
    (1..=13u8).rev().filter(|&r| hist[r as usize] == count).collect()
}

/// Classify a fixed 5-card hand and compute its §4.5 score in one pass.
/// `handValue` is always the sum of the weighting field (`value` for a
/// low-ace straight/straight-flush, `highvalue` otherwise) across all five
/// cards, except High Card, whose handValue is the single highest card.
/// For the four "multiple of a kind" categories, `adjust = sumKicker *
/// (1 - multiplier)` cancels the kickers' multiplier scaling so they
/// contribute only their raw sum, per §9.
pub fn score_five(cards: [Card; 5]) -> ScoredHand {
    let hist = rank_histogram(&cards);
    let quads = ranks_of_count(&hist, 4);
    let trips = ranks_of_count(&hist, 3);
    let pairs = ranks_of_count(&hist, 2);

    let same_suit = cards[1..].iter().all(|c| c.suit == cards[0].suit);
    let ranks: [u8; 5] = core::array::from_fn(|i| cards[i].rank);
    let straight_window = detect_straight(&ranks);
    let low_ace = straight_window == Some(LOW_ACE_WINDOW);

    let weight = |c: &Card| if low_ace { c.value as i64 } else { c.highvalue as i64 };
    let full_sum: i64 = cards.iter().map(weight).sum();

    let (category, score) = if let (Some(window), true) = (straight_window, same_suit) {
        if window == ACE_HIGH_WINDOW {
            (HandCategory::RoyalFlush, full_sum * 1_000_000_000)
        } else {
            (HandCategory::StraightFlush, full_sum * 100_000_000)
        }
    } else if let Some(&quad_rank) = quads.first() {
        let mult = 10_000_000i64;
        let kicker_sum: i64 = cards
            .iter()
            .filter(|c| c.rank != quad_rank)
            .map(weight)
            .sum();
        let adjust = kicker_sum * (1 - mult);
        (HandCategory::FourOfAKind, full_sum * mult + adjust)
    } else if !trips.is_empty() && (trips.len() >= 2 || !pairs.is_empty()) {
        (HandCategory::FullHouse, full_sum * 1_000_000)
    } else if same_suit {
        (HandCategory::Flush, full_sum * 100_000)
    } else if straight_window.is_some() {
        (HandCategory::Straight, full_sum * 10_000)
    } else if let Some(&trip_rank) = trips.first() {
        let mult = 1_000i64;
        let kicker_sum: i64 = cards
            .iter()
            .filter(|c| c.rank != trip_rank)
            .map(weight)
            .sum();
        let adjust = kicker_sum * (1 - mult);
        (HandCategory::ThreeOfAKind, full_sum * mult + adjust)
    } else if pairs.len() >= 2 {
        let mult = 100i64;
        let paired: std::collections::HashSet<u8> = pairs.iter().copied().collect();
        let kicker_sum: i64 = cards
            .iter()
            .filter(|c| !paired.contains(&c.rank))
            .map(weight)
            .sum();
        let adjust = kicker_sum * (1 - mult);
        (HandCategory::TwoPair, full_sum * mult + adjust)
    } else if let Some(&pair_rank) = pairs.first() {
        let mult = 15i64;
        let kicker_sum: i64 = cards
            .iter()
            .filter(|c| c.rank != pair_rank)
            .map(weight)
            .sum();
        let adjust = kicker_sum * (1 - mult);
        (HandCategory::OnePair, full_sum * mult + adjust)
    } else {
        let high = cards.iter().map(weight).max().unwrap_or(0);
        (HandCategory::HighCard, high)
    };

    let mut sorted = cards.to_vec();
    sort_desc_by_highvalue(&mut sorted);
    ScoredHand {
        cards: sorted,
        category,
        score,
    }
}

fn five_index_windows(n: usize) -> Vec<[usize; 5]> {
    let mut out = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    for e in (d + 1)..n {
                        out.push([a, b, c, d, e]);
                    }
                }
            }
        }
    }
    out
}

/// Best 5-card hand out of `cards` (5, 6, or 7 cards — the private hole
/// cards plus the public board). Enumerates every 5-card combination
/// (C(7,5)=21 or C(6,5)=6; a 5-card input has exactly one) and keeps the
/// highest score.
pub fn choose_best(cards: &[Card]) -> ScoredHand {
    assert!(cards.len() >= 5, "need at least five cards to score a hand");
    five_index_windows(cards.len())
        .into_iter()
        .map(|idx| {
            let five: [Card; 5] = core::array::from_fn(|i| cards[idx[i]].clone());
            score_five(five)
        })
        .max_by_key(|h| h.score)
        .expect("at least one combination exists")
}
