use crate::cards::{Card, Rank, Suit};
use crate::hand::{Hand, PLAYER_HAND_LEN, SKAT_LEN};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// Cards in a Skat deck.
pub const DECK_LEN: usize = 32;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("expected 32 cards, got {0}")]
    Count(usize),
    #[error("card dealt twice: {0}")]
    Duplicate(Card),
    #[error("not enough cards left to deal")]
    Exhausted,
}

/// The 32-card Skat deck (Seven through Ace in four suits).
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use skat_hands::deck::Deck;
    ///
    /// let deck = Deck::skat();
    /// assert_eq!(deck.len(), 32);
    /// ```
    pub fn skat() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&s| Rank::ALL.into_iter().map(move |r| Card::new(s, r)))
            .collect();
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
    }

    /// Draw one card from the top of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw `n` cards from the top of the deck.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).filter_map(|_| self.draw()).collect()
    }

    /// Deal three ten-card hands and the skat, in that order.
    pub fn deal(&mut self) -> Result<Deal, DeckError> {
        if self.cards.len() < DECK_LEN {
            return Err(DeckError::Exhausted);
        }
        let mut hand = || Hand::new(self.draw_n(PLAYER_HAND_LEN));
        let hands = [hand(), hand(), hand()];
        let skat = Hand::new(self.draw_n(SKAT_LEN));
        Ok(Deal { hands, skat })
    }
}

/// One game's deal: the three player hands and the skat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: [Hand; 3],
    pub skat: Hand,
}

impl Deal {
    /// All 32 cards in deal order: hands one to three, then the skat.
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.hands.iter().chain(std::iter::once(&self.skat)).flat_map(|h| h.iter())
    }

    /// Check that the deal uses every card of the deck exactly once.
    pub fn validate(&self) -> Result<(), DeckError> {
        validate_deck(self.cards())
    }
}

/// Check that `cards` is exactly the 32-card deck with no repeats.
pub fn validate_deck<I>(cards: I) -> Result<(), DeckError>
where
    I: IntoIterator<Item = Card>,
{
    let mut seen = HashSet::with_capacity(DECK_LEN);
    for card in cards {
        if !seen.insert(card) {
            return Err(DeckError::Duplicate(card));
        }
    }
    // Ranks and suits are closed enums, so 32 distinct cards is the whole deck.
    if seen.len() != DECK_LEN {
        return Err(DeckError::Count(seen.len()));
    }
    Ok(())
}
