use crate::model::card::Card;
use crate::model::suit::Suit;
use core::fmt;

pub const HAND_SIZE: usize = 3;

/// Three cards in the order they were taken. Order is never normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hand {
    cards: [Card; HAND_SIZE],
}

/// Hand score together with the suit that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuitedValue {
    pub value: u8,
    pub suit: Suit,
}

/// Result of weighing a candidate card against the current hand.
///
/// `replaced` is `None` when the candidate should be passed over; `discard`
/// is then the candidate itself and `hand` the unchanged hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    pub value: u8,
    pub hand: Hand,
    pub discard: Card,
    pub replaced: Option<usize>,
}

impl Exchange {
    pub fn takes_candidate(&self) -> bool {
        self.replaced.is_some()
    }
}

impl Hand {
    pub const fn new(cards: [Card; HAND_SIZE]) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card; HAND_SIZE] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Standard score: the best same-suit total, or the best lone card.
    pub fn plain_value(&self) -> u8 {
        let [c1, c2, c3] = self.cards;
        let (v1, v2, v3) = (c1.points(), c2.points(), c3.points());

        if c1.suit == c2.suit && c1.suit == c3.suit {
            v1 + v2 + v3
        } else if c1.suit == c2.suit {
            (v1 + v2).max(v3)
        } else if c1.suit == c3.suit {
            (v1 + v3).max(v2)
        } else if c2.suit == c3.suit {
            (v2 + v3).max(v1)
        } else {
            v1.max(v2).max(v3)
        }
    }

    /// Same score as [`Hand::plain_value`], plus the suit behind it.
    ///
    /// A suited pair only wins when its total is strictly greater than the
    /// lone card; on equality the lone card and its suit are reported. With
    /// three different suits the first card holding the top points wins.
    pub fn suited_value(&self) -> SuitedValue {
        let [c1, c2, c3] = self.cards;

        if c1.suit == c2.suit {
            if c1.suit == c3.suit {
                return suited(c1.points() + c2.points() + c3.points(), c1.suit);
            }
            return pair_or_lone(c1, c2, c3);
        }
        if c1.suit == c3.suit {
            return pair_or_lone(c1, c3, c2);
        }
        if c2.suit == c3.suit {
            return pair_or_lone(c2, c3, c1);
        }

        let mut best = c1;
        for card in [c2, c3] {
            if card.points() > best.points() {
                best = card;
            }
        }
        suited(best.points(), best.suit)
    }

    /// The hand formed by dropping position `index` and putting `card` in front.
    pub fn with_replacement(&self, index: usize, card: Card) -> Hand {
        let mut cards = [card; HAND_SIZE];
        let mut slot = 1;
        for (position, kept) in self.cards.iter().enumerate() {
            if position != index {
                cards[slot] = *kept;
                slot += 1;
            }
        }
        Hand::new(cards)
    }

    /// Best use of `candidate`: try it in each position and keep the top
    /// plain value. A replacement that only matches the best value so far
    /// still wins when it throws away a lower-point card, and the first
    /// comparison is against the candidate itself as the discard.
    pub fn best_exchange(&self, candidate: Card) -> Exchange {
        let mut best = Exchange {
            value: self.plain_value(),
            hand: *self,
            discard: candidate,
            replaced: None,
        };

        for index in 0..HAND_SIZE {
            let trial = self.with_replacement(index, candidate);
            let trial_value = trial.plain_value();
            let trial_discard = self.cards[index];

            let improves = trial_value > best.value;
            let cheaper_discard =
                trial_value == best.value && trial_discard.points() < best.discard.points();

            if improves || cheaper_discard {
                best = Exchange {
                    value: trial_value,
                    hand: trial,
                    discard: trial_discard,
                    replaced: Some(index),
                };
            }
        }

        best
    }
}

fn suited(value: u8, suit: Suit) -> SuitedValue {
    SuitedValue { value, suit }
}

fn pair_or_lone(first: Card, second: Card, lone: Card) -> SuitedValue {
    let pair = first.points() + second.points();
    if pair > lone.points() {
        suited(pair, first.suit)
    } else {
        suited(lone.points(), lone.suit)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [c1, c2, c3] = self.cards;
        write!(f, "{c1} {c2} {c3}")
    }
}
