/// How much a face-up card must improve a hand before a non-committed player takes it.
pub const SWAP_DELTA: u8 = 3;

/// The greedy table policy: one hero with a go-down threshold, everyone else
/// plays to improve and never knocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyPolicy {
    hero: usize,
    threshold: u8,
}

impl GreedyPolicy {
    pub const fn new(hero: usize, threshold: u8) -> Self {
        Self { hero, threshold }
    }

    pub const fn hero(&self) -> usize {
        self.hero
    }

    pub const fn threshold(&self) -> u8 {
        self.threshold
    }

    pub const fn is_hero(&self, seat: usize) -> bool {
        seat == self.hero
    }

    pub const fn should_go_down(&self, seat: usize, suited_value: u8) -> bool {
        self.is_hero(seat) && suited_value >= self.threshold
    }

    /// Whether `seat` picks up the face-up card when it would lift the hand
    /// from `current` to `offered`.
    pub const fn takes_face_up(&self, seat: usize, current: u8, offered: u8) -> bool {
        if offered <= current {
            return false;
        }
        let clears_threshold = self.is_hero(seat) && offered > self.threshold;
        let big_gain = offered - current > SWAP_DELTA;
        clears_threshold || big_gain
    }

    /// Whether a blind draw worth `drawn` replaces a hand worth `current`.
    pub const fn keeps_draw(&self, current: u8, drawn: u8) -> bool {
        drawn > current
    }
}
