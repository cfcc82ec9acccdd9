use crate::cards::{Card, Rank, Suit};
use crate::hand::{Hand, InvalidHand, PLAYER_HAND_LEN};

const CJ: Card = Card::new(Suit::Clubs, Rank::Jack);
const SJ: Card = Card::new(Suit::Spades, Rank::Jack);
const HJ: Card = Card::new(Suit::Hearts, Rank::Jack);
const DJ: Card = Card::new(Suit::Diamonds, Rank::Jack);

/// Jack-combination bonus. Checked top to bottom; the first rung whose Jacks are all held wins.
const JACK_LADDER: [(&[Card], f64); 4] = [
    (&[CJ, SJ, HJ, DJ], 2.0),
    (&[CJ, SJ, HJ], 1.5),
    (&[CJ, SJ], 0.5),
    (&[SJ, HJ, DJ], 0.5),
];

const GRAND_FACTOR: f64 = 5.0 / 3.0;
const MISSING_SUIT_BONUS: f64 = 0.5;

/// Full breakdown of a hand's valuation. `score` is the value reported downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct Valuation {
    /// Suit giving the highest suit-path base; ties go to the earlier suit in C, S, H, D.
    pub trump: Suit,
    pub base: u8,
    pub jack_bonus: f64,
    pub missing_suits: u8,
    pub suit_path: f64,
    pub grand_path: f64,
    pub score: f64,
}

impl Valuation {
    /// True when the grand path beat the suit path.
    pub fn prefers_grand(&self) -> bool {
        self.grand_path > self.suit_path
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    suit: [u8; 4],
    jacks: u8,
    high: u8,
}

impl Tally {
    fn of(hand: &Hand) -> Self {
        let mut t = Tally::default();
        for card in hand.iter() {
            if card.is_jack() {
                t.jacks += 1;
            } else {
                t.suit[card.suit().index()] += 1;
            }
            if card.rank().is_high() {
                t.high += 1;
            }
        }
        t
    }

    fn suit_score(&self, suit: Suit) -> u8 {
        self.suit[suit.index()] + 2 * self.jacks + self.high
    }
}

/// Bonus for the Jacks held, per [`JACK_LADDER`].
pub fn jack_bonus(hand: &Hand) -> f64 {
    JACK_LADDER
        .iter()
        .find(|(jacks, _)| jacks.iter().all(|&j| hand.contains(j)))
        .map_or(0.0, |&(_, bonus)| bonus)
}

/// Value a ten-card hand, keeping the intermediate figures.
///
/// A hand is valued two ways and the better one wins. The suit path takes the best trump
/// suit, counting that suit's non-Jack cards once, every Jack twice and every Ace and Ten
/// once, then adds the Jack bonus and half a point per suit with no non-Jack card. The grand
/// path is `5/3` per Jack, Ace and Ten held.
///
/// ```
/// use skat_hands::scorer::score_str;
///
/// assert_eq!(score_str("HQ,HA,H7,CT,ST,SK,SA,HJ,CJ,CK").unwrap(), 11.5);
/// assert_eq!(score_str("C8,CJ,CT,D8,DA,HA,HJ,HT,SA,ST").unwrap(), 13.333);
/// ```
pub fn evaluate(hand: &Hand) -> Result<Valuation, InvalidHand> {
    if hand.len() != PLAYER_HAND_LEN {
        return Err(InvalidHand::Length { expected: PLAYER_HAND_LEN, found: hand.len() });
    }
    let tally = Tally::of(hand);

    let mut trump = Suit::Clubs;
    let mut base = tally.suit_score(trump);
    for suit in Suit::ALL {
        let s = tally.suit_score(suit);
        if s > base {
            trump = suit;
            base = s;
        }
    }
    let missing_suits = tally.suit.iter().filter(|&&n| n == 0).count() as u8;
    let jack_bonus = jack_bonus(hand);

    let suit_path = f64::from(base) + jack_bonus + f64::from(missing_suits) * MISSING_SUIT_BONUS;
    let grand_path = GRAND_FACTOR * f64::from(tally.jacks + tally.high);

    Ok(Valuation {
        trump,
        base,
        jack_bonus,
        missing_suits,
        suit_path,
        grand_path,
        score: round3(suit_path.max(grand_path)),
    })
}

/// The hand's bidding value, rounded to three decimals.
pub fn score(hand: &Hand) -> Result<f64, InvalidHand> {
    evaluate(hand).map(|v| v.score)
}

/// Parse a written-out hand (see [`crate::hand::parse_cards`]) and score it.
pub fn score_str(hand: &str) -> Result<f64, InvalidHand> {
    let hand: Hand = hand.parse()?;
    score(&hand)
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(s: &str) -> Hand {
        s.parse().unwrap()
    }

    #[test]
    fn ladder_all_four_jacks() {
        let h = hand("CJ.SJ.HJ.DJ.C7.S7.H7.D7.C8.S8");
        assert_eq!(jack_bonus(&h), 2.0);
        assert_eq!(score(&h).unwrap(), 12.0);
    }

    #[test]
    fn ladder_top_three_jacks() {
        let h = hand("CJ.SJ.HJ.C7.S7.H7.D7.C8.S8.D8");
        assert_eq!(jack_bonus(&h), 1.5);
        assert_eq!(score(&h).unwrap(), 9.5);
    }

    #[test]
    fn ladder_top_two_jacks() {
        let h = hand("CJ.SJ.C7.S7.H7.D7.C8.S8.D8.H8");
        assert_eq!(jack_bonus(&h), 0.5);
        assert_eq!(score(&h).unwrap(), 6.5);
    }

    #[test]
    fn ladder_top_two_jacks_with_diamonds_jack_stays_at_half() {
        let h = hand("CJ.SJ.DJ.C7.S7.H7.D7.C8.S8.D8");
        assert_eq!(jack_bonus(&h), 0.5);
    }

    #[test]
    fn ladder_lower_three_jacks() {
        let h = hand("SJ.HJ.DJ.C7.S7.H7.D7.C8.S8.D8");
        assert_eq!(jack_bonus(&h), 0.5);
        assert_eq!(score(&h).unwrap(), 8.5);
    }

    #[test]
    fn ladder_no_bonus() {
        assert_eq!(jack_bonus(&hand("CJ.HJ.DJ.C7.S7.H7.D7.C8.S8.D8")), 0.0);
        assert_eq!(jack_bonus(&hand("C7.C8.C9.CQ.CK.S7.S8.S9.H7.H8")), 0.0);
    }

    #[test]
    fn missing_suits_add_half_each() {
        let v = evaluate(&hand("C7.C8.C9.CQ.CK.S7.S8.S9.H7.H8")).unwrap();
        assert_eq!(v.missing_suits, 1);
        assert_eq!(v.trump, Suit::Clubs);
        assert_eq!(v.base, 5);
        assert_eq!(v.score, 5.5);
    }

    #[test]
    fn jack_only_suit_counts_as_missing() {
        let v = evaluate(&hand("CT.DJ.H7.H8.HA.HJ.HT.S7.S9.SJ")).unwrap();
        assert_eq!(v.trump, Suit::Hearts);
        assert_eq!(v.missing_suits, 1);
        assert_eq!(v.jack_bonus, 0.5);
        assert_eq!(v.score, 14.0);
    }

    #[test]
    fn grand_path_wins_when_larger() {
        let v = evaluate(&hand("C8.CJ.CT.D8.DA.HA.HJ.HT.SA.ST")).unwrap();
        assert_eq!(v.suit_path, 12.0);
        assert!(v.prefers_grand());
        assert_eq!(v.score, 13.333);
    }

    #[test]
    fn rejects_wrong_lengths() {
        let nine = hand("C7.C8.C9.CQ.CK.S7.S8.S9.H7");
        assert_eq!(score(&nine), Err(InvalidHand::Length { expected: 10, found: 9 }));
        let skat = hand("DA.C9");
        assert_eq!(score(&skat), Err(InvalidHand::Length { expected: 10, found: 2 }));
    }
}
