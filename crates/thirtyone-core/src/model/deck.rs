use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck exhausted: draw pile and discard pile are both empty")]
    Exhausted,
}

/// Draw pile, discard pile and the single face-up discard shared by a table.
///
/// The top of the draw pile is the last element. When the draw pile runs dry
/// the discard pile is shuffled into a new draw pile; the face-up card never
/// takes part in that recycle.
#[derive(Debug, Clone)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    face_up: Card,
    rng: StdRng,
}

impl Deck {
    /// All 52 cards in suit-major order.
    pub fn standard_cards() -> Vec<Card> {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        cards
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        Self::shuffled(StdRng::seed_from_u64(seed))
    }

    pub fn shuffled(mut rng: StdRng) -> Self {
        let mut draw_pile = Self::standard_cards();
        draw_pile.shuffle(&mut rng);
        let face_up = draw_pile.pop().expect("standard deck is never empty");
        Self {
            draw_pile,
            discard_pile: Vec::new(),
            face_up,
            rng,
        }
    }

    /// Stacked deck for scenarios. The last card of `draw_pile` is drawn first.
    pub fn from_piles(
        draw_pile: Vec<Card>,
        discard_pile: Vec<Card>,
        face_up: Card,
        seed: u64,
    ) -> Self {
        Self {
            draw_pile,
            discard_pile,
            face_up,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn draw(&mut self) -> Result<Card, DeckError> {
        if self.draw_pile.is_empty() {
            self.recycle();
        }
        self.draw_pile.pop().ok_or(DeckError::Exhausted)
    }

    fn recycle(&mut self) {
        self.draw_pile = std::mem::take(&mut self.discard_pile);
        self.draw_pile.shuffle(&mut self.rng);
    }

    pub fn face_up(&self) -> Card {
        self.face_up
    }

    /// Hands out the face-up card, leaving `card` face up in its place.
    pub fn replace_face_up(&mut self, card: Card) -> Card {
        std::mem::replace(&mut self.face_up, card)
    }

    /// Buries the current face-up card in the discard pile and shows `card`.
    pub fn discard(&mut self, card: Card) {
        let buried = self.replace_face_up(card);
        self.discard_pile.push(buried);
    }

    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_pile_len(&self) -> usize {
        self.discard_pile.len()
    }

    /// Cards held by the deck: both piles plus the face-up card.
    pub fn card_count(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len() + 1
    }
}
