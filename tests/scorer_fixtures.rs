use skat_hands::cards::{CardParseError, Suit};
use skat_hands::hand::{Hand, InvalidHand};
use skat_hands::scorer::{evaluate, jack_bonus, score, score_str};

fn hand(s: &str) -> Hand {
    s.parse().unwrap()
}

#[test]
fn hearts_heavy_hand_with_two_jacks() {
    // five trumps, two jacks, two aces, two tens, no diamonds
    assert_eq!(score_str("HQ,HA,H7,CT,ST,SK,SA,HJ,CJ,CK").unwrap(), 11.5);
}

#[test]
fn clubs_and_spades_tie_with_one_jack() {
    // three plain clubs and three plain spades: both suits reach a base of 7
    let v = evaluate(&hand("C8,CK,CQ,D9,DA,HK,S9,SJ,SQ,ST")).unwrap();
    assert_eq!(v.base, 7);
    assert_eq!(v.trump, Suit::Clubs);
    assert_eq!(v.score, 7.0);
}

#[test]
fn trump_ties_go_to_the_earlier_suit() {
    // two plain clubs and two plain spades
    let v = evaluate(&hand("C7,S7,H7,D7,CJ,SJ,HJ,DJ,CA,SA")).unwrap();
    assert_eq!(v.trump, Suit::Clubs);
    // spades and diamonds tie ahead of clubs and hearts
    let v = evaluate(&hand("C7,S7,S8,H7,D7,D8,CJ,SJ,HJ,DJ")).unwrap();
    assert_eq!(v.trump, Suit::Spades);
}

#[test]
fn diamonds_hand_with_two_low_jacks() {
    let v = evaluate(&hand("CQ,D7,D8,DJ,DK,H8,H9,S7,S8,SJ")).unwrap();
    assert_eq!(v.trump, Suit::Diamonds);
    assert_eq!(v.jack_bonus, 0.0);
    assert_eq!(v.score, 7.0);
}

#[test]
fn all_suits_no_jacks() {
    assert_eq!(score_str("C7_C8_CA_D9_DQ_DT_HK_HT_S9_SQ").unwrap(), 6.0);
}

#[test]
fn lower_three_jacks_and_a_missing_suit() {
    assert_eq!(score_str("CT_DJ_H7_H8_HA_HJ_HT_S7_S9_SJ").unwrap(), 14.0);
}

#[test]
fn grand_reading_beats_suit_reading() {
    let v = evaluate(&hand("C8_CJ_CT_D8_DA_HA_HJ_HT_SA_ST")).unwrap();
    assert!(v.prefers_grand());
    assert_eq!(v.score, 13.333);
}

#[test]
fn jack_ladder_every_rung() {
    let cases = [
        ("C7.C8.C9.CQ.CK.S7.S8.S9.H7.H8", 0.0),
        ("CJ.SJ.C7.S7.H7.D7.C8.S8.D8.H8", 0.5),
        ("SJ.HJ.DJ.C7.S7.H7.D7.C8.S8.D8", 0.5),
        ("CJ.SJ.HJ.C7.S7.H7.D7.C8.S8.D8", 1.5),
        ("CJ.SJ.HJ.DJ.C7.S7.H7.D7.C8.S8", 2.0),
    ];
    for (cards, bonus) in cases {
        let h = hand(cards);
        assert_eq!(jack_bonus(&h), bonus, "{cards}");
        assert_eq!(evaluate(&h).unwrap().jack_bonus, bonus, "{cards}");
    }
}

#[test]
fn too_short_and_too_long_hands() {
    assert_eq!(
        score_str("HA_DK_S7_DJ_H7_HJ_CA_SA_C9"),
        Err(InvalidHand::Length { expected: 10, found: 9 })
    );
    assert_eq!(
        score_str("HA_DK_S7_DJ_H7_HJ_CA_SA_C9_CT_S8"),
        Err(InvalidHand::Length { expected: 10, found: 11 })
    );
    assert_eq!(score(&hand("HA_DK_S7_DJ_H7")), Err(InvalidHand::Length { expected: 10, found: 5 }));
}

#[test]
fn wrong_separator() {
    assert!(matches!(score_str("HA DK S7 DJ H7 HJ CA SA C9 CT"), Err(InvalidHand::Format(_))));
    assert!(matches!(score_str("HA_DK_S7_DJ_H7 HJ_CA_SA_C9_CT"), Err(InvalidHand::Format(_))));
}

#[test]
fn invalid_suit_or_rank() {
    assert_eq!(
        score_str("HA_KK_S7_DJ_H7_HJ_CA_SA_C9_CT"),
        Err(InvalidHand::Charset(CardParseError::Suit('K')))
    );
    assert_eq!(
        score_str("HA_DD_S7_DJ_H7_HJ_CA_SA_C9_CT"),
        Err(InvalidHand::Charset(CardParseError::Rank('D')))
    );
}
