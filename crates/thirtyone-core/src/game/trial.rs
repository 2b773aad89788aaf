use crate::model::deck::{Deck, DeckError};
use crate::model::hand::{HAND_SIZE, Hand};
use crate::model::player::{Player, TurnError, TurnOutcome};
use crate::policy::GreedyPolicy;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrialError {
    #[error("turn failed: {0}")]
    Turn(#[from] TurnError),
    #[error("deal failed: {0}")]
    Deal(#[from] DeckError),
    #[error("card accounting broken: expected {expected} cards in play, found {found}")]
    CardCount { expected: usize, found: usize },
}

/// One player's final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatRecord {
    pub hand: Hand,
    pub value: u8,
}

/// Outcome of a completed trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    pub seed: u64,
    pub winner: usize,
    pub turns: usize,
    pub hero: usize,
    /// 1-based turn on which the hero went down, if it did.
    pub hero_down_turn: Option<usize>,
    pub hero_down_value: Option<u8>,
    pub players: Vec<SeatRecord>,
}

impl TrialRecord {
    pub fn hero_won(&self) -> bool {
        self.winner == self.hero
    }
}

/// A single round of 31: one deck, a ring of players, and the turn counter.
#[derive(Debug, Clone)]
pub struct Trial {
    seed: u64,
    deck: Deck,
    players: Vec<Player>,
    policy: GreedyPolicy,
    active: usize,
    turns: usize,
    hero_down: Option<(usize, u8)>,
    expected_cards: usize,
}

impl Trial {
    /// Shuffles a fresh deck from `seed` and deals three cards to each seat in order.
    pub fn deal(
        seed: u64,
        player_count: usize,
        policy: GreedyPolicy,
    ) -> Result<Self, TrialError> {
        let mut deck = Deck::shuffled_with_seed(seed);
        let players = (0..player_count)
            .map(|seat| Player::deal(seat, &mut deck))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_parts(seed, deck, players, policy))
    }

    /// Table assembled from an existing deck and hands; seat 0 acts first.
    pub fn from_parts(seed: u64, deck: Deck, players: Vec<Player>, policy: GreedyPolicy) -> Self {
        let expected_cards = deck.card_count() + players.len() * HAND_SIZE;
        Self {
            seed,
            deck,
            players,
            policy,
            active: 0,
            turns: 0,
            hero_down: None,
            expected_cards,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn active_seat(&self) -> usize {
        self.active
    }

    /// Cards in both piles, face up, and in every hand.
    pub fn cards_in_play(&self) -> usize {
        self.deck.card_count() + self.players.len() * HAND_SIZE
    }

    /// The round is over once the seat about to act has already finished.
    pub fn is_over(&self) -> bool {
        self.players
            .get(self.active)
            .is_none_or(|player| player.is_finished())
    }

    /// Plays the active seat's turn and passes play to the left.
    /// Returns `None` without acting when the round is over.
    pub fn step(&mut self) -> Result<Option<TurnOutcome>, TrialError> {
        if self.is_over() {
            return Ok(None);
        }

        let seat = self.active;
        let outcome = self.players[seat].turn(&mut self.deck, &self.policy)?;
        self.turns += 1;
        if let TurnOutcome::WentDown { value } = outcome {
            self.hero_down = Some((self.turns, value));
        }
        trace!(seat, turn = self.turns, ?outcome, "turn resolved");

        let found = self.cards_in_play();
        if found != self.expected_cards {
            return Err(TrialError::CardCount {
                expected: self.expected_cards,
                found,
            });
        }

        self.active = (seat + 1) % self.players.len();
        Ok(Some(outcome))
    }

    /// Runs turns until the round ends and scores the table.
    pub fn play_out(mut self) -> Result<TrialRecord, TrialError> {
        while self.step()?.is_some() {}
        let record = self.record();
        debug!(
            seed = record.seed,
            winner = record.winner,
            turns = record.turns,
            hero_down_turn = ?record.hero_down_turn,
            "trial complete"
        );
        Ok(record)
    }

    pub fn record(&self) -> TrialRecord {
        let players: Vec<SeatRecord> = self
            .players
            .iter()
            .map(|player| SeatRecord {
                hand: *player.hand(),
                value: player.value(),
            })
            .collect();
        let values: Vec<u8> = players.iter().map(|seat| seat.value).collect();

        TrialRecord {
            seed: self.seed,
            winner: winning_seat(&values),
            turns: self.turns,
            hero: self.policy.hero(),
            hero_down_turn: self.hero_down.map(|(turn, _)| turn),
            hero_down_value: self.hero_down.map(|(_, value)| value),
            players,
        }
    }
}

/// Seat with the strictly highest value; ties go to the lowest seat.
pub fn winning_seat(values: &[u8]) -> usize {
    let mut winner = 0;
    for (seat, value) in values.iter().enumerate().skip(1) {
        if *value > values[winner] {
            winner = seat;
        }
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::{Trial, winning_seat};
    use crate::model::card::Card;
    use crate::model::deck::{DECK_SIZE, Deck};
    use crate::model::hand::Hand;
    use crate::model::player::{Player, TurnOutcome};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::policy::GreedyPolicy;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn ties_go_to_the_lowest_seat() {
        assert_eq!(winning_seat(&[20, 25, 25]), 1);
        assert_eq!(winning_seat(&[18, 18, 18]), 0);
        assert_eq!(winning_seat(&[10, 12, 30]), 2);
    }

    #[test]
    fn deal_leaves_remaining_cards_in_draw_pile() {
        let trial = Trial::deal(11, 4, GreedyPolicy::new(0, 22)).expect("deal");
        assert_eq!(trial.players().len(), 4);
        assert_eq!(trial.deck().draw_pile_len(), DECK_SIZE - 1 - 4 * 3);
        assert_eq!(trial.cards_in_play(), DECK_SIZE);
        assert_eq!(trial.turns(), 0);
    }

    #[test]
    fn every_turn_conserves_cards() {
        for seed in 0..50 {
            let mut trial = Trial::deal(seed, 3, GreedyPolicy::new(0, 22)).expect("deal");
            while trial.step().expect("turn").is_some() {
                assert_eq!(trial.cards_in_play(), DECK_SIZE, "seed {seed}");
            }
        }
    }

    #[test]
    fn same_seed_replays_the_same_trial() {
        let policy = GreedyPolicy::new(1, 24);
        let a = Trial::deal(99, 3, policy).unwrap().play_out().unwrap();
        let b = Trial::deal(99, 3, policy).unwrap().play_out().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn going_down_gives_the_rest_of_the_ring_one_more_turn() {
        // Seat 0 is the hero and already holds 21; everyone else is weak.
        let hero = Hand::new([
            card(Rank::Ace, Suit::Spades),
            card(Rank::King, Suit::Spades),
            card(Rank::Two, Suit::Hearts),
        ]);
        let weak = |suit_a, suit_b, suit_c| {
            Hand::new([
                card(Rank::Two, suit_a),
                card(Rank::Three, suit_b),
                card(Rank::Four, suit_c),
            ])
        };
        let players = vec![
            Player::new(0, hero),
            Player::new(1, weak(Suit::Clubs, Suit::Diamonds, Suit::Hearts)),
            Player::new(2, weak(Suit::Diamonds, Suit::Clubs, Suit::Spades)),
        ];
        let draw = vec![
            card(Rank::Five, Suit::Clubs),
            card(Rank::Six, Suit::Clubs),
            card(Rank::Seven, Suit::Clubs),
        ];
        let deck = Deck::from_piles(draw, Vec::new(), card(Rank::Eight, Suit::Hearts), 0);
        let mut trial = Trial::from_parts(5, deck, players, GreedyPolicy::new(0, 21));

        assert_eq!(
            trial.step().unwrap(),
            Some(TurnOutcome::WentDown { value: 21 })
        );
        assert!(trial.step().unwrap().is_some());
        assert!(trial.step().unwrap().is_some());
        assert!(trial.is_over());
        assert_eq!(trial.step().unwrap(), None);

        let record = trial.record();
        assert_eq!(record.turns, 3);
        assert_eq!(record.hero_down_turn, Some(1));
        assert_eq!(record.hero_down_value, Some(21));
        assert_eq!(record.winner, 0);
        assert!(record.hero_won());
    }

    #[test]
    fn drawing_into_31_ends_the_round_when_play_returns() {
        // The hero never reaches its threshold; seat 1 completes spades on its first draw.
        let players = vec![
            Player::new(
                0,
                Hand::new([
                    card(Rank::Two, Suit::Clubs),
                    card(Rank::Three, Suit::Diamonds),
                    card(Rank::Four, Suit::Hearts),
                ]),
            ),
            Player::new(
                1,
                Hand::new([
                    card(Rank::Ace, Suit::Spades),
                    card(Rank::King, Suit::Spades),
                    card(Rank::Two, Suit::Hearts),
                ]),
            ),
            Player::new(
                2,
                Hand::new([
                    card(Rank::Five, Suit::Clubs),
                    card(Rank::Six, Suit::Diamonds),
                    card(Rank::Seven, Suit::Hearts),
                ]),
            ),
        ];
        // Popped from the end: 2D for seat 0, QS for seat 1, then 8C and 9C.
        let draw = vec![
            card(Rank::Nine, Suit::Clubs),
            card(Rank::Eight, Suit::Clubs),
            card(Rank::Queen, Suit::Spades),
            card(Rank::Two, Suit::Diamonds),
        ];
        let deck = Deck::from_piles(draw, Vec::new(), card(Rank::Three, Suit::Clubs), 0);
        let mut trial = Trial::from_parts(8, deck, players, GreedyPolicy::new(0, 30));

        assert!(trial.step().unwrap().is_some());
        assert_eq!(
            trial.step().unwrap(),
            Some(TurnOutcome::Drew {
                drawn: card(Rank::Queen, Suit::Spades),
                dropped: card(Rank::Two, Suit::Hearts),
                kept: true,
                value: 31,
            })
        );
        assert!(trial.players()[1].is_finished());
        assert!(!trial.players()[1].is_down());
        assert!(!trial.is_over());

        assert!(trial.step().unwrap().is_some());
        assert!(trial.step().unwrap().is_some());
        assert_eq!(trial.active_seat(), 1);
        assert!(trial.is_over());
        assert_eq!(trial.step().unwrap(), None);

        let record = trial.record();
        assert_eq!(record.turns, 4);
        assert_eq!(record.winner, 1);
        assert_eq!(record.players[1].value, 31);
        assert_eq!(record.hero_down_turn, None);
        assert!(!record.hero_won());
    }
}
