//! Winner resolution (§4.5, steps 1-3): best-permutation scoring per
//! player, hole-card tiebreak, split-pot dedup.

use std::collections::HashMap;

use super::{choose_best, ScoredHand};
use crate::domain::{Card, PlayerId, Roster, WinnerEntry};

fn hole_tiebreak(hole: &[Card]) -> i64 {
    let mut weights: Vec<i64> = hole.iter().map(|c| c.highvalue as i64).collect();
    weights.sort_unstable();
    let min = weights.first().copied().unwrap_or(0);
    let max = weights.last().copied().unwrap_or(0);
    max * 10 + min
}

/// Score every non-folded player's best 7-card permutation, then resolve
/// the winner set per §4.5. Returns the per-player best hand (singleton
/// vec, matching the `PID -> [ScoredPermutation]` analysis-result shape)
/// alongside the deduplicated winner list. Folded players are excluded from
/// both maps entirely: a folded player's hole cards may have been verified
/// (they were still dealt and decrypted) but never compete for the pot.
pub fn resolve_winners(
    private_by_pid: &HashMap<PlayerId, Vec<Card>>,
    public: &[Card],
    roster: &Roster,
) -> (HashMap<PlayerId, Vec<ScoredHand>>, Vec<WinnerEntry>) {
    let mut hands: HashMap<PlayerId, Vec<ScoredHand>> = HashMap::new();
    let mut best_per_player: Vec<(PlayerId, ScoredHand)> = Vec::new();

    for (pid, hole) in private_by_pid {
        let has_folded = roster.get(pid).map(|p| p.has_folded).unwrap_or(false);
        if has_folded {
            continue;
        }
        let mut pool = hole.clone();
        pool.extend(public.iter().cloned());
        let best = choose_best(&pool);
        hands.insert(pid.clone(), vec![best.clone()]);
        best_per_player.push((pid.clone(), best));
    }

    if best_per_player.is_empty() {
        return (hands, Vec::new());
    }

    let top_score = best_per_player.iter().map(|(_, h)| h.score).max().unwrap();
    let mut candidates: Vec<&PlayerId> = best_per_player
        .iter()
        .filter(|(_, h)| h.score == top_score)
        .map(|(pid, _)| pid)
        .collect();

    if candidates.len() > 1 {
        let tiebreaks: HashMap<&PlayerId, i64> = candidates
            .iter()
            .map(|&pid| (pid, hole_tiebreak(&private_by_pid[pid])))
            .collect();
        let top_tiebreak = *tiebreaks.values().max().unwrap();
        candidates.retain(|pid| tiebreaks[pid] == top_tiebreak);
    }

    let mut seen = std::collections::HashSet::new();
    let winners = best_per_player
        .into_iter()
        .filter(|(pid, _)| candidates.contains(&pid) && seen.insert(pid.clone()))
        .map(|(player_id, hand)| WinnerEntry { player_id, hand })
        .collect();

    (hands, winners)
}
