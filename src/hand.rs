use crate::cards::{Card, CardParseError};
use std::fmt;
use std::str::FromStr;

/// Cards dealt to each of the three players.
pub const PLAYER_HAND_LEN: usize = 10;
/// Cards left over in the skat.
pub const SKAT_LEN: usize = 2;
/// Separators accepted between card codes in a written-out hand.
pub const SEPARATORS: [char; 3] = ['.', ',', '_'];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidHand {
    #[error("expected {expected} cards, got {found}")]
    Length { expected: usize, found: usize },
    #[error("malformed hand near '{0}'")]
    Format(String),
    #[error("invalid card character: {0}")]
    Charset(CardParseError),
}

impl From<CardParseError> for InvalidHand {
    fn from(e: CardParseError) -> Self {
        match e {
            CardParseError::Format(token) => InvalidHand::Format(token),
            other => InvalidHand::Charset(other),
        }
    }
}

/// An ordered run of cards: a player's ten or the two-card skat.
///
/// Order is the order the cards were dealt in; [`Hand::sorted`] gives a canonical view.
///
/// ```
/// use skat_hands::hand::Hand;
///
/// let hand: Hand = "HQ,HA,H7,CT,ST,SK,SA,HJ,CJ,CK".parse().unwrap();
/// assert_eq!(hand.len(), 10);
/// assert_eq!(hand.to_string(), "HQ.HA.H7.CT.ST.SK.SA.HJ.CJ.CK");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Wrap cards without a length check.
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// A player hand: exactly ten cards.
    pub fn player(cards: Vec<Card>) -> Result<Self, InvalidHand> {
        Self::with_len(cards, PLAYER_HAND_LEN)
    }

    /// The skat: exactly two cards.
    pub fn skat(cards: Vec<Card>) -> Result<Self, InvalidHand> {
        Self::with_len(cards, SKAT_LEN)
    }

    fn with_len(cards: Vec<Card>, expected: usize) -> Result<Self, InvalidHand> {
        if cards.len() != expected {
            return Err(InvalidHand::Length { expected, found: cards.len() });
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Cards ordered by their two-character code (`CJ < CK < CT < DA`).
    pub fn sorted(&self) -> Hand {
        let mut cards = self.cards.clone();
        cards.sort_by_key(|c| c.code());
        Hand { cards }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

impl FromStr for Hand {
    type Err = InvalidHand;

    /// Parses any number of cards; the scorer enforces the ten-card length.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cards(s).map(Hand::new)
    }
}

/// Parse card codes joined by one of [`SEPARATORS`].
///
/// The separator is whatever follows the first code, and every later gap must use the same
/// character. Codes are exactly two characters; anything else is a format error.
///
/// ```
/// use skat_hands::hand::{parse_cards, InvalidHand};
///
/// assert_eq!(parse_cards("CJ_SJ_HA").unwrap().len(), 3);
/// assert!(matches!(parse_cards("CJ SJ HA"), Err(InvalidHand::Format(_))));
/// ```
pub fn parse_cards(input: &str) -> Result<Vec<Card>, InvalidHand> {
    let t = input.trim();
    if t.is_empty() {
        return Ok(Vec::new());
    }
    let sep = match t.chars().nth(2) {
        None => return Ok(vec![t.parse::<Card>()?]),
        Some(c) if SEPARATORS.contains(&c) => c,
        Some(_) => return Err(InvalidHand::Format(t.to_string())),
    };
    split_cards(t, sep)
}

/// Split on a known separator and parse every code.
pub(crate) fn split_cards(input: &str, sep: char) -> Result<Vec<Card>, InvalidHand> {
    input
        .split(sep)
        .map(|token| {
            if token.chars().count() != 2 {
                return Err(InvalidHand::Format(token.to_string()));
            }
            token.parse::<Card>().map_err(InvalidHand::from)
        })
        .collect()
}
