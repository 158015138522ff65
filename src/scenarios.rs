//! End-to-end scenario tests (§8): each walks the Analyzer through the full
//! event sequence a real game layer would produce for one hand, using the
//! reference SRA primitive so the cryptography is genuine, not mocked.

use std::sync::Arc;
use std::time::Duration;

use crate::analyzer::Analyzer;
use crate::config::AnalyzerConfig;
use crate::crypto::sra::fixture_keypair;
use crate::crypto::CryptoPrimitive;
use crate::domain::{Keypair, Mapping, Suit};
use crate::error::AnalyzerError;
use crate::showdown::HandCategory;
use crate::test_support::{ciphertexts_for, deck_encryption_chain, deck_of_52, decrypt_all, idx_of, reference_crypto, three_player_roster};

const PIDS: [&str; 3] = ["p1", "p2", "p3"];

fn keypairs() -> [Keypair; 3] {
    [fixture_keypair(0), fixture_keypair(1), fixture_keypair(2)]
}

/// Record one player's select + every other player's partial decryption for
/// a set of card indices, finishing with the selecting player's own
/// (implicit) final decryption. `dealer_pid` both groups the deal list and
/// names who self-finalizes it (§9 self-decryption semantics).
async fn record_sub_deal(
    analyzer: &Analyzer,
    crypto: &dyn CryptoPrimitive,
    plain: &[Mapping],
    kps: &[Keypair; 3],
    dealer_pid: &str,
    card_indices: &[usize],
    private: bool,
) {
    let select_cards = ciphertexts_for(crypto, plain, kps, card_indices).await;
    analyzer
        .record_selection(dealer_pid, dealer_pid, select_cards.clone(), private)
        .await
        .unwrap();

    let mut current = select_cards;
    for (pid, kp) in PIDS.iter().zip(kps.iter()) {
        if *pid == dealer_pid {
            continue;
        }
        current = decrypt_all(crypto, &current, kp).await;
        analyzer
            .record_decryption(dealer_pid, *pid, current.clone(), private)
            .await
            .unwrap();
    }
}

async fn record_honest_deck(analyzer: &Analyzer, crypto: &dyn CryptoPrimitive, plain: &[Mapping], kps: &[Keypair; 3]) -> Vec<Vec<Mapping>> {
    let stages = deck_encryption_chain(crypto, plain, kps, 0xC0FFEE).await;
    analyzer.record_deck_generation("p1", plain.to_vec()).await.unwrap();
    analyzer.record_encryption("p1", stages[1].clone()).await.unwrap();
    analyzer.record_encryption("p2", stages[2].clone()).await.unwrap();
    analyzer.record_encryption("p3", stages[3].clone()).await.unwrap();
    stages
}

async fn commit_all_keychains(analyzer: &Analyzer, kps: &[Keypair; 3]) {
    for (pid, kp) in PIDS.iter().zip(kps.iter()) {
        analyzer
            .record_keychain(*pid, crate::domain::Keychain::new(vec![kp.clone()]))
            .await;
    }
}

fn analyzer_with_default_config() -> Analyzer {
    Analyzer::new(
        "p1",
        three_player_roster(),
        AnalyzerConfig::default(),
        Arc::new(reference_crypto()) as Arc<dyn CryptoPrimitive>,
    )
}

/// Deal/community layout shared by S1, S2, S3, S4, S6: eleven distinct
/// cards out of the 52, chosen so hand outcomes are easy to reason about by
/// hand rather than requiring a reference poker evaluator to cross-check.
struct Layout {
    p1_hole: [usize; 2],
    p2_hole: [usize; 2],
    p3_hole: [usize; 2],
    community: [usize; 5],
}

fn royal_flush_layout() -> Layout {
    Layout {
        p1_hole: [idx_of(Suit::Hearts, 10), idx_of(Suit::Hearts, 11)],
        p2_hole: [idx_of(Suit::Diamonds, 4), idx_of(Suit::Clubs, 5)],
        p3_hole: [idx_of(Suit::Spades, 6), idx_of(Suit::Diamonds, 7)],
        community: [
            idx_of(Suit::Hearts, 12),
            idx_of(Suit::Hearts, 13),
            idx_of(Suit::Hearts, 1),
            idx_of(Suit::Clubs, 2),
            idx_of(Suit::Diamonds, 3),
        ],
    }
}

async fn record_full_honest_hand(analyzer: &Analyzer, crypto: &dyn CryptoPrimitive, plain: &[Mapping], kps: &[Keypair; 3], layout: &Layout) {
    record_sub_deal(analyzer, crypto, plain, kps, "p1", &layout.p1_hole, true).await;
    record_sub_deal(analyzer, crypto, plain, kps, "p1", &layout.community, false).await;
    record_sub_deal(analyzer, crypto, plain, kps, "p2", &layout.p2_hole, true).await;
    record_sub_deal(analyzer, crypto, plain, kps, "p3", &layout.p3_hole, true).await;
}

#[tokio::test]
async fn s1_honest_three_player_showdown() {
    let crypto = reference_crypto();
    let kps = keypairs();
    let plain = deck_of_52();
    let analyzer = analyzer_with_default_config();

    record_honest_deck(&analyzer, &crypto, &plain, &kps).await;
    let layout = royal_flush_layout();
    record_full_honest_hand(&analyzer, &crypto, &plain, &kps, &layout).await;
    commit_all_keychains(&analyzer, &kps).await;

    let result = analyzer.analyze().await;

    assert!(result.error.is_none(), "unexpected error: {:?}", result.error);
    assert!(result.complete);
    assert_eq!(result.winners.len(), 1, "p1's royal flush should win outright");
    assert_eq!(result.winners[0].player_id, "p1");
    assert_eq!(result.winners[0].hand.category, HandCategory::RoyalFlush);
}

#[tokio::test]
async fn s2_dishonest_reencryption_is_detected() {
    let crypto = reference_crypto();
    let kps = keypairs();
    let plain = deck_of_52();
    let analyzer = analyzer_with_default_config();

    let stages = deck_encryption_chain(&crypto, &plain, &kps, 0xC0FFEE).await;
    analyzer.record_deck_generation("p1", plain.clone()).await.unwrap();
    analyzer.record_encryption("p1", stages[1].clone()).await.unwrap();

    let mut tampered_stage2 = stages[2].clone();
    // Every genuine modexp result is a residue below the reference modulus
    // (167), so this value can never collide with an honest stage.
    tampered_stage2[0] = Mapping::from("999999999");
    analyzer.record_encryption("p2", tampered_stage2).await.unwrap();
    analyzer.record_encryption("p3", stages[3].clone()).await.unwrap();

    commit_all_keychains(&analyzer, &kps).await;

    let result = analyzer.analyze().await;

    assert!(result.complete);
    match result.error {
        Some(AnalyzerError::DeckEncryptionMismatch { stage, offender }) => {
            assert_eq!(stage, 2);
            assert_eq!(offender, "p2");
        }
        other => panic!("expected DeckEncryptionMismatch{{stage:2}}, got {other:?}"),
    }
}

#[tokio::test]
async fn s3_double_spend_select_is_detected() {
    let crypto = reference_crypto();
    let kps = keypairs();
    let plain = deck_of_52();
    let analyzer = analyzer_with_default_config();

    record_honest_deck(&analyzer, &crypto, &plain, &kps).await;

    let p1_hole = [idx_of(Suit::Hearts, 10), idx_of(Suit::Hearts, 11)];
    record_sub_deal(&analyzer, &crypto, &plain, &kps, "p1", &p1_hole, true).await;

    // p2 "selects" a card p1 already drew (index overlap is the attack).
    let p2_hole = [idx_of(Suit::Hearts, 10), idx_of(Suit::Clubs, 5)];
    record_sub_deal(&analyzer, &crypto, &plain, &kps, "p2", &p2_hole, true).await;

    commit_all_keychains(&analyzer, &kps).await;

    let result = analyzer.analyze().await;

    assert!(result.complete);
    assert!(
        matches!(result.error, Some(AnalyzerError::SelectDuplicate { .. })),
        "expected SelectDuplicate, got {:?}",
        result.error
    );
}

#[tokio::test]
async fn s4_partial_decrypt_tamper_is_detected() {
    let crypto = reference_crypto();
    let kps = keypairs();
    let plain = deck_of_52();
    let analyzer = analyzer_with_default_config();

    record_honest_deck(&analyzer, &crypto, &plain, &kps).await;

    let p1_hole = [idx_of(Suit::Hearts, 10), idx_of(Suit::Hearts, 11)];
    let select_cards = ciphertexts_for(&crypto, &plain, &kps, &p1_hole).await;
    analyzer.record_selection("p1", "p1", select_cards.clone(), true).await.unwrap();

    let after_p2 = decrypt_all(&crypto, &select_cards, &kps[1]).await;
    analyzer.record_decryption("p1", "p2", after_p2.clone(), true).await.unwrap();

    // p3's claimed partial decryption does not match D_{k3}(after_p2).
    let mut tampered = decrypt_all(&crypto, &after_p2, &kps[2]).await;
    tampered[0] = Mapping::from("123456789");
    analyzer.record_decryption("p1", "p3", tampered, true).await.unwrap();

    commit_all_keychains(&analyzer, &kps).await;

    let result = analyzer.analyze().await;

    assert!(result.complete);
    match result.error {
        Some(AnalyzerError::IntermediateDecryptMismatch { offender, .. }) => {
            assert_eq!(offender, "p3");
        }
        other => panic!("expected IntermediateDecryptMismatch{{offender:p3}}, got {other:?}"),
    }
}

#[tokio::test]
async fn s5_keychain_timeout_fires_when_a_player_never_commits() {
    let plain = deck_of_52();
    let analyzer = Analyzer::new(
        "p1",
        three_player_roster(),
        AnalyzerConfig {
            keychain_commit_timeout: Duration::from_millis(30),
        },
        Arc::new(reference_crypto()) as Arc<dyn CryptoPrimitive>,
    );

    analyzer.record_deck_generation("p1", plain.clone()).await.unwrap();
    analyzer
        .record_keychain("p1", crate::domain::Keychain::new(vec![fixture_keypair(0)]))
        .await;
    analyzer
        .record_keychain("p2", crate::domain::Keychain::new(vec![fixture_keypair(1)]))
        .await;
    // p3 never submits a keychain.

    let result = analyzer.analyze().await;

    assert!(result.complete);
    assert!(matches!(result.error, Some(AnalyzerError::KeychainTimeout)));
    assert!(result.winners.is_empty());
}

#[tokio::test]
async fn s6_split_pot_identical_hands_through_the_board() {
    let crypto = reference_crypto();
    let kps = keypairs();
    let plain = deck_of_52();
    let analyzer = analyzer_with_default_config();

    record_honest_deck(&analyzer, &crypto, &plain, &kps).await;

    // Board alone is a king-high straight flush; neither player's hole cards
    // can extend it, and both hole-card pairs carry the same weight (2,3),
    // so the hole-card tiebreak ties too.
    let community = [
        idx_of(Suit::Clubs, 9),
        idx_of(Suit::Clubs, 10),
        idx_of(Suit::Clubs, 11),
        idx_of(Suit::Clubs, 12),
        idx_of(Suit::Clubs, 13),
    ];
    let p1_hole = [idx_of(Suit::Diamonds, 2), idx_of(Suit::Spades, 3)];
    let p2_hole = [idx_of(Suit::Hearts, 2), idx_of(Suit::Hearts, 3)];

    record_sub_deal(&analyzer, &crypto, &plain, &kps, "p1", &p1_hole, true).await;
    record_sub_deal(&analyzer, &crypto, &plain, &kps, "p1", &community, false).await;
    record_sub_deal(&analyzer, &crypto, &plain, &kps, "p2", &p2_hole, true).await;

    commit_all_keychains(&analyzer, &kps).await;

    let result = analyzer.analyze().await;

    assert!(result.error.is_none(), "unexpected error: {:?}", result.error);
    let mut ids: Vec<&str> = result.winners.iter().map(|w| w.player_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["p1", "p2"], "both players should split the pot");
    for winner in &result.winners {
        assert_eq!(winner.hand.category, HandCategory::StraightFlush);
    }
}
