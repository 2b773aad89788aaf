use crate::MAX_SCORE;
use crate::model::card::Card;
use crate::model::deck::{Deck, DeckError};
use crate::model::hand::Hand;
use crate::policy::GreedyPolicy;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("seat {seat} was asked to act after its round ended")]
    Finished { seat: usize },
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// What a player did with their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    WentDown { value: u8 },
    TookFaceUp { taken: Card, dropped: Card, value: u8 },
    Drew { drawn: Card, dropped: Card, kept: bool, value: u8 },
}

#[derive(Debug, Clone)]
pub struct Player {
    seat: usize,
    hand: Hand,
    down: bool,
}

impl Player {
    pub fn new(seat: usize, hand: Hand) -> Self {
        Self {
            seat,
            hand,
            down: false,
        }
    }

    /// Deals three cards from the top of the deck, in draw order.
    pub fn deal(seat: usize, deck: &mut Deck) -> Result<Self, DeckError> {
        let cards = [deck.draw()?, deck.draw()?, deck.draw()?];
        Ok(Self::new(seat, Hand::new(cards)))
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    pub fn value(&self) -> u8 {
        self.hand.plain_value()
    }

    /// Down, or holding exactly 31.
    pub fn is_finished(&self) -> bool {
        self.down || self.value() == MAX_SCORE
    }

    /// Plays one turn against the shared deck.
    ///
    /// The hero knocks once its suited value reaches the threshold. Otherwise
    /// the face-up card is considered first, then a blind draw; whatever
    /// leaves the hand becomes the new face-up card.
    pub fn turn(
        &mut self,
        deck: &mut Deck,
        policy: &GreedyPolicy,
    ) -> Result<TurnOutcome, TurnError> {
        if self.is_finished() {
            return Err(TurnError::Finished { seat: self.seat });
        }

        let current = self.hand.suited_value().value;
        if policy.should_go_down(self.seat, current) {
            self.down = true;
            return Ok(TurnOutcome::WentDown { value: current });
        }

        let face_up = deck.face_up();
        let offer = self.hand.best_exchange(face_up);
        if policy.takes_face_up(self.seat, current, offer.value) {
            deck.replace_face_up(offer.discard);
            self.hand = offer.hand;
            return Ok(TurnOutcome::TookFaceUp {
                taken: face_up,
                dropped: offer.discard,
                value: offer.value,
            });
        }

        let drawn = deck.draw()?;
        let exchange = self.hand.best_exchange(drawn);
        if policy.keeps_draw(current, exchange.value) {
            self.hand = exchange.hand;
            deck.discard(exchange.discard);
            Ok(TurnOutcome::Drew {
                drawn,
                dropped: exchange.discard,
                kept: true,
                value: exchange.value,
            })
        } else {
            deck.discard(drawn);
            Ok(TurnOutcome::Drew {
                drawn,
                dropped: drawn,
                kept: false,
                value: current,
            })
        }
    }
}
