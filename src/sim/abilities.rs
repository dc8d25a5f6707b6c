//! Ability deck, hand, and timed buffs
//!
//! Abilities are fixed definitions (name, description, cost, effect) that
//! move between a deck and a four-card hand. Triggering one deducts its
//! cost from the spendable score, applies its effect to the simulation,
//! and cycles the card back into the deck. Timed effects live in the buff
//! registry as flags with absolute millisecond deadlines.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::rect::Rect;
use super::state::GameState;
use crate::consts::*;

/// Buff windows (ms)
pub const UNLIMITED_JUMPS_MS: u64 = 10_000;
pub const TRIPLE_JUMP_MS: u64 = 20_000;
pub const JUMP_BOOST_MS: u64 = 10_000;
pub const SPEED_BOOST_MS: u64 = 10_000;
pub const EXTRA_LIFE_MS: u64 = 60_000;
pub const ZERO_GRAVITY_MS: u64 = 15_000;
pub const EXTRA_POINTS_MS: u64 = 30_000;

/// Every ability effect in the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityKind {
    ResetCamera,
    UnlimitedJumps,
    TeleportTop,
    TripleJump,
    Bomb,
    TeleportNearest,
    JumpBoost,
    SpeedBoost,
    ExtraLife,
    ZeroGravity,
    InstantJump,
    ExtraPoints,
}

impl AbilityKind {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResetCamera => "Eyes of Lahan",
            Self::UnlimitedJumps => "Sine Terminus",
            Self::TeleportTop => "Summus's Throne",
            Self::TripleJump => "Jump of Trinus",
            Self::Bomb => "Leap of Potentia",
            Self::TeleportNearest => "Ultimum's Reach",
            Self::JumpBoost => "Levo's Boost",
            Self::SpeedBoost => "Celerita's Boost",
            Self::ExtraLife => "Life of Addo",
            Self::ZeroGravity => "Nil Gravitas",
            Self::InstantJump => "Saltus",
            Self::ExtraPoints => "Addo's Wealth",
        }
    }

    /// Display description
    pub fn description(&self) -> &'static str {
        match self {
            Self::ResetCamera => "Slows the camera speed down to its initial speed",
            Self::UnlimitedJumps => "Gives you unlimited jumps",
            Self::TeleportTop => "Teleports the player to the top platform",
            Self::TripleJump => "Allows the player to triple jump",
            Self::Bomb => "Sends the player flying up",
            Self::TeleportNearest => "Teleports the player to the nearest platform above them.",
            Self::JumpBoost => "Boosts the player's jump force",
            Self::SpeedBoost => "Boosts the player's speed",
            Self::ExtraLife => "Lets the player respawn when they die",
            Self::ZeroGravity => "Puts the player in zero gravity space.",
            Self::InstantJump => "Lets the player jump right now.",
            Self::ExtraPoints => "Doubles the points the player gains",
        }
    }

    /// Score deducted when triggered
    pub fn cost(&self) -> u32 {
        match self {
            Self::ResetCamera => 15,
            Self::UnlimitedJumps => 25,
            Self::TeleportTop => 20,
            Self::TripleJump => 20,
            Self::Bomb => 50,
            Self::TeleportNearest => 5,
            Self::JumpBoost => 15,
            Self::SpeedBoost => 15,
            Self::ExtraLife => 50,
            Self::ZeroGravity => 25,
            Self::InstantJump => 5,
            Self::ExtraPoints => 15,
        }
    }

    /// The full deck, one of each
    pub fn deck() -> Vec<AbilityKind> {
        vec![
            Self::ResetCamera,
            Self::UnlimitedJumps,
            Self::TeleportTop,
            Self::TripleJump,
            Self::Bomb,
            Self::TeleportNearest,
            Self::JumpBoost,
            Self::SpeedBoost,
            Self::ExtraLife,
            Self::ZeroGravity,
            Self::InstantJump,
            Self::ExtraPoints,
        ]
    }
}

/// One timed buff flag with an absolute expiry
#[derive(Debug, Clone, Copy, Default)]
pub struct BuffTimer {
    pub active: bool,
    pub until_ms: u64,
}

impl BuffTimer {
    pub fn start(&mut self, now_ms: u64, window_ms: u64) {
        self.active = true;
        self.until_ms = now_ms + window_ms;
    }

    /// True exactly once, on the tick an active timer passes its deadline
    pub fn expired(&mut self, now_ms: u64) -> bool {
        if self.active && now_ms >= self.until_ms {
            self.active = false;
            true
        } else {
            false
        }
    }
}

/// Registry of every timed buff, plus the extra-life counter
#[derive(Debug, Clone, Copy, Default)]
pub struct Buffs {
    pub unlimited_jumps: BuffTimer,
    pub triple_jump: BuffTimer,
    pub jump_boost: BuffTimer,
    pub speed_boost: BuffTimer,
    pub zero_gravity: BuffTimer,
    pub extra_points: BuffTimer,
    /// Shared window for every held extra life; once it closes the
    /// counter drops to zero regardless of how many remain
    pub extra_life: BuffTimer,
    pub extra_lives: u32,
}

impl Buffs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump budget granted by a landing
    #[inline]
    pub fn max_jumps(&self) -> u32 {
        if self.triple_jump.active {
            TRIPLE_JUMPS
        } else {
            BASE_JUMPS
        }
    }

    /// Upward speed a jump imparts right now
    #[inline]
    pub fn jump_force(&self) -> f32 {
        if self.jump_boost.active {
            JUMP_FORCE * BOOST_FACTOR
        } else {
            JUMP_FORCE
        }
    }

    /// Points a recycled platform is worth
    #[inline]
    pub fn platform_points(&self) -> u32 {
        if self.extra_points.active { 2 } else { 1 }
    }
}

/// Overlay bar the hand is laid out on
pub fn overlay_bar() -> Rect {
    let size = Vec2::new(VIEW_H / 9.0 * 7.0, VIEW_H / 9.0);
    Rect {
        pos: Vec2::new((VIEW_W - size.x) / 2.0, VIEW_H - 0.2 * VIEW_H),
        size,
    }
}

/// Card dimensions, derived from the bar width
pub fn card_size() -> Vec2 {
    let bar = overlay_bar();
    let w = (bar.size.x - CARD_MARGIN * (HAND_SIZE as f32 + 1.0)) / HAND_SIZE as f32;
    Vec2::new(w, w * 1.5)
}

/// Rest position of a hand slot
pub fn slot_position(slot: usize) -> Vec2 {
    let bar = overlay_bar();
    let card = card_size();
    Vec2::new(
        bar.left() + CARD_MARGIN * (slot as f32 + 1.0) + card.x * slot as f32,
        bar.top() - card.y / 2.0,
    )
}

/// Eased point-to-point slide over a fixed tick count
///
/// Velocity ramps up for the first fifth, cruises, then ramps down for
/// the last fifth, and the position snaps to the target at the end.
#[derive(Debug, Clone, Copy)]
struct Slide {
    full_speed: Vec2,
    accel: Vec2,
    accel_until: u32,
    decel_from: u32,
    elapsed: u32,
    total: u32,
    target: Vec2,
}

impl Slide {
    fn new(from: Vec2, to: Vec2, ticks: u32) -> Self {
        let full_speed = (to - from) / (ticks as f32 * 0.8);
        Self {
            full_speed,
            accel: full_speed / (ticks as f32 * 0.2),
            accel_until: ticks / 5,
            decel_from: ticks * 4 / 5,
            elapsed: 0,
            total: ticks,
            target: to,
        }
    }
}

/// A live hand card positioned for display
#[derive(Debug, Clone)]
pub struct AbilityCard {
    pub kind: AbilityKind,
    pub rect: Rect,
    /// Slot anchor the card returns to when idle
    pub rest: Vec2,
    pub vel: Vec2,
    pub selected: bool,
    /// Remaining ticks of the rejected-purchase flash
    pub invalid_flash: u32,
    slide: Option<Slide>,
}

impl AbilityCard {
    /// New cards enter from the bottom-center spawn point and slide to
    /// their slot
    pub fn new(kind: AbilityKind, rest: Vec2) -> Self {
        let spawn = Vec2::new(VIEW_W / 2.0, VIEW_H);
        Self {
            kind,
            rect: Rect {
                pos: spawn,
                size: card_size(),
            },
            rest,
            vel: Vec2::ZERO,
            selected: false,
            invalid_flash: 0,
            slide: Some(Slide::new(spawn, rest, CARD_SLIDE_TICKS)),
        }
    }

    /// Start the rejected flash
    pub fn invalidate(&mut self) {
        self.invalid_flash = INVALID_FLASH_TICKS;
    }

    /// Advance slide motion one tick
    ///
    /// An idle card off its anchor slides home; an idle selected card
    /// slides up to its lifted position, so the selection bobs.
    pub fn update(&mut self) {
        match &mut self.slide {
            Some(slide) if slide.elapsed < slide.total => {
                if slide.elapsed < slide.accel_until {
                    self.vel += slide.accel;
                } else if slide.elapsed >= slide.decel_from {
                    self.vel -= slide.accel;
                } else {
                    self.vel = slide.full_speed;
                }
                slide.elapsed += 1;
            }
            Some(slide) => {
                self.rect.pos = slide.target;
                self.vel = Vec2::ZERO;
                self.slide = None;
            }
            None => {}
        }
        if self.slide.is_none() && self.rect.pos != self.rest {
            self.slide = Some(Slide::new(self.rect.pos, self.rest, CARD_SLIDE_TICKS));
        }
        if self.slide.is_none() && self.selected {
            let lifted = Vec2::new(self.rect.pos.x, self.rest.y - SELECTED_CARD_LIFT);
            self.slide = Some(Slide::new(self.rect.pos, lifted, CARD_SLIDE_TICKS));
        }
        self.rect.pos += self.vel;
        self.invalid_flash = self.invalid_flash.saturating_sub(1);
    }
}

/// Deck, hand, and selection state
#[derive(Debug, Clone)]
pub struct Cards {
    /// Undealt ability definitions
    pub deck: Vec<AbilityKind>,
    /// Live cards, one per slot
    pub hand: Vec<AbilityCard>,
    /// Selected slot index
    pub selected: usize,
    pub overlay_open: bool,
}

impl Cards {
    pub fn new() -> Self {
        Self {
            deck: AbilityKind::deck(),
            hand: Vec::with_capacity(HAND_SIZE),
            selected: 0,
            overlay_open: false,
        }
    }

    /// Draw random deck entries until the hand is full
    pub fn fill_hand(&mut self, rng: &mut Pcg32) {
        while self.hand.len() < HAND_SIZE && !self.deck.is_empty() {
            let i = rng.random_range(0..self.deck.len());
            let kind = self.deck.remove(i);
            let slot = self.hand.len();
            self.hand.push(AbilityCard::new(kind, slot_position(slot)));
        }
    }

    /// Return the used card to the deck and draw a replacement into its
    /// slot (the returned card can be redrawn immediately)
    pub fn cycle_slot(&mut self, rng: &mut Pcg32, slot: usize) {
        let used = self.hand.remove(slot);
        self.deck.push(used.kind);
        let i = rng.random_range(0..self.deck.len());
        let kind = self.deck.remove(i);
        self.hand.insert(slot, AbilityCard::new(kind, slot_position(slot)));
    }

    /// Return the whole hand to the deck and deal a fresh one
    pub fn redeal(&mut self, rng: &mut Pcg32) {
        for card in self.hand.drain(..) {
            self.deck.push(card.kind);
        }
        self.fill_hand(rng);
    }

    pub fn select_prev(&mut self) {
        self.selected = if self.selected == 0 {
            self.hand.len().saturating_sub(1)
        } else {
            self.selected - 1
        };
    }

    pub fn select_next(&mut self) {
        self.selected = if self.selected + 1 >= self.hand.len() {
            0
        } else {
            self.selected + 1
        };
    }

    /// Rebuild every card at its slot with the entry slide (overlay open)
    pub fn reposition(&mut self) {
        for (i, card) in self.hand.iter_mut().enumerate() {
            *card = AbilityCard::new(card.kind, slot_position(i));
        }
    }

    /// Advance card motion and flashes; called only while the overlay
    /// is open
    pub fn update(&mut self) {
        for (i, card) in self.hand.iter_mut().enumerate() {
            card.selected = i == self.selected;
            card.update();
        }
    }
}

impl Default for Cards {
    fn default() -> Self {
        Self::new()
    }
}

/// Trigger the selected card against the current state
///
/// Rejected (invalid flash, no deduction) when the score is below the
/// card's cost or when a non-stackable boost is already running. On
/// success the cost is deducted, the effect applied, the card cycled,
/// and the overlay closes.
pub fn trigger_selected(state: &mut GameState, now_ms: u64) -> bool {
    let slot = state.cards.selected;
    let Some(card) = state.cards.hand.get_mut(slot) else {
        return false;
    };
    let kind = card.kind;
    let blocked = match kind {
        AbilityKind::JumpBoost => state.buffs.jump_boost.active,
        AbilityKind::SpeedBoost => state.buffs.speed_boost.active,
        _ => false,
    };
    if blocked || state.score < kind.cost() {
        card.invalidate();
        log::debug!("{} rejected (score {})", kind.name(), state.score);
        return false;
    }
    let burst_at = card.rect.pos;
    state.score -= kind.cost();
    apply(kind, state, now_ms);
    let gravity = state.player.gravity;
    state
        .particles
        .purchase_burst(&mut state.rng, burst_at, gravity);
    state.cards.cycle_slot(&mut state.rng, slot);
    state.cards.overlay_open = false;
    state.time_scale = 1.0;
    log::debug!("{} triggered for {}", kind.name(), kind.cost());
    true
}

/// Return the hand to the deck and redraw, for the reshuffle cost
///
/// Rejected with an invalid flash on the selected card when the score
/// is short.
pub fn reshuffle_hand(state: &mut GameState) -> bool {
    if state.score < RESHUFFLE_COST {
        let slot = state.cards.selected;
        if let Some(card) = state.cards.hand.get_mut(slot) {
            card.invalidate();
        }
        return false;
    }
    state.score -= RESHUFFLE_COST;
    state.cards.redeal(&mut state.rng);
    log::debug!("hand reshuffled");
    true
}

/// Apply one ability effect to the simulation
fn apply(kind: AbilityKind, state: &mut GameState, now_ms: u64) {
    match kind {
        AbilityKind::ResetCamera => {
            if !state.bomb_armed {
                state.camera.reset_to_initial();
            }
        }
        AbilityKind::UnlimitedJumps => {
            state
                .buffs
                .unlimited_jumps
                .start(now_ms, UNLIMITED_JUMPS_MS);
            state.player.jumps = BASE_JUMPS;
        }
        AbilityKind::TeleportTop => {
            if let Some(platform) = state.field.highest_on_screen() {
                let rect = platform.rect;
                state.player.rect.pos.x = rect.center_x() - PLAYER_W / 2.0;
                state.player.rect.pos.y = rect.top() - PLAYER_H;
            }
        }
        AbilityKind::TripleJump => {
            state.buffs.triple_jump.start(now_ms, TRIPLE_JUMP_MS);
            state.player.jumps = TRIPLE_JUMPS;
        }
        AbilityKind::Bomb => {
            state.player.vel.y = -BOMB_LAUNCH;
            state.player.jumps = 0;
            state.bomb_armed = true;
            state.camera.detonate();
            let at = Vec2::new(state.player.rect.center_x(), state.player.rect.bottom());
            let gravity = state.player.gravity;
            state.particles.bomb_blast(&mut state.rng, at, gravity);
        }
        AbilityKind::TeleportNearest => {
            if let Some(platform) = state.field.nearest_above(state.player.rect.top()) {
                let rect = platform.rect;
                state.player.rect.pos.x = rect.center_x() - PLAYER_W / 2.0;
                // Lands 5 units deep so the next contact pass grounds the player
                state.player.rect.pos.y = rect.top() - (PLAYER_H - 5.0);
            }
        }
        AbilityKind::JumpBoost => {
            state.buffs.jump_boost.start(now_ms, JUMP_BOOST_MS);
            state.player.jumps = BASE_JUMPS;
        }
        AbilityKind::SpeedBoost => {
            state.buffs.speed_boost.start(now_ms, SPEED_BOOST_MS);
            state.player.speed *= BOOST_FACTOR;
        }
        AbilityKind::ExtraLife => {
            state.buffs.extra_lives += 1;
            state.buffs.extra_life.start(now_ms, EXTRA_LIFE_MS);
        }
        AbilityKind::ZeroGravity => {
            state.buffs.zero_gravity.start(now_ms, ZERO_GRAVITY_MS);
            state.player.vel.y = -ZERO_G_DRIFT;
            // The bomb keeps camera control until it disarms
            if !state.bomb_armed {
                state.camera.lock(state.player.vel.y);
            }
        }
        AbilityKind::InstantJump => {
            state.player.vel.y = -INSTANT_JUMP_SPEED;
        }
        AbilityKind::ExtraPoints => {
            state.buffs.extra_points.start(now_ms, EXTRA_POINTS_MS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_buff_timer_expires_once() {
        let mut timer = BuffTimer::default();
        assert!(!timer.expired(0));

        timer.start(1_000, 500);
        assert!(timer.active);
        assert!(!timer.expired(1_499));
        assert!(timer.expired(1_500));
        assert!(!timer.active);
        assert!(!timer.expired(2_000));
    }

    #[test]
    fn test_deck_has_every_ability_once() {
        let deck = AbilityKind::deck();
        assert_eq!(deck.len(), 12);
        for kind in &deck {
            assert_eq!(deck.iter().filter(|k| *k == kind).count(), 1);
        }
    }

    #[test]
    fn test_fill_hand_draws_four() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut cards = Cards::new();
        cards.fill_hand(&mut rng);
        assert_eq!(cards.hand.len(), HAND_SIZE);
        assert_eq!(cards.deck.len(), 12 - HAND_SIZE);
        for (i, card) in cards.hand.iter().enumerate() {
            assert_eq!(card.rest, slot_position(i));
        }
    }

    #[test]
    fn test_cycle_slot_keeps_hand_full() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut cards = Cards::new();
        cards.fill_hand(&mut rng);
        cards.cycle_slot(&mut rng, 2);
        assert_eq!(cards.hand.len(), HAND_SIZE);
        assert_eq!(cards.deck.len(), 12 - HAND_SIZE);
        assert_eq!(cards.hand[2].rest, slot_position(2));
    }

    #[test]
    fn test_card_slide_reaches_slot() {
        let mut card = AbilityCard::new(AbilityKind::Bomb, slot_position(0));
        for _ in 0..=CARD_SLIDE_TICKS {
            card.update();
        }
        assert_eq!(card.rect.pos, slot_position(0));
        assert_eq!(card.vel, Vec2::ZERO);
    }

    #[test]
    fn test_selected_card_bobs() {
        let mut card = AbilityCard::new(AbilityKind::Bomb, slot_position(1));
        card.selected = true;
        for _ in 0..=CARD_SLIDE_TICKS {
            card.update();
        }
        assert_eq!(card.rect.pos, slot_position(1));

        // Lift slide starts the next tick
        for _ in 0..=CARD_SLIDE_TICKS {
            card.update();
        }
        assert_eq!(
            card.rect.pos.y,
            slot_position(1).y - SELECTED_CARD_LIFT
        );

        // From the lifted point it slides back home
        for _ in 0..=CARD_SLIDE_TICKS {
            card.update();
        }
        assert_eq!(card.rect.pos.y, slot_position(1).y);
    }

    #[test]
    fn test_trigger_deducts_exact_cost() {
        let mut state = GameState::new(11);
        state.score = 100;
        state.cards.overlay_open = true;
        state.time_scale = 0.0;
        let kind = state.cards.hand[0].kind;

        assert!(trigger_selected(&mut state, 0));
        assert_eq!(state.score, 100 - kind.cost());
        assert_eq!(state.cards.hand.len(), HAND_SIZE);
        assert!(!state.cards.overlay_open);
        assert_eq!(state.time_scale, 1.0);
    }

    #[test]
    fn test_trigger_rejected_without_score() {
        let mut state = GameState::new(11);
        state.cards.overlay_open = true;
        let kind = state.cards.hand[0].kind;

        assert!(!trigger_selected(&mut state, 0));
        assert_eq!(state.score, 0);
        assert_eq!(state.cards.hand[0].kind, kind);
        assert_eq!(state.cards.hand[0].invalid_flash, INVALID_FLASH_TICKS);
        assert!(state.cards.overlay_open);
    }

    #[test]
    fn test_boost_rejected_while_active() {
        let mut state = GameState::new(11);
        state.score = 100;
        state.cards.hand[0] = AbilityCard::new(AbilityKind::JumpBoost, slot_position(0));
        state.cards.selected = 0;

        assert!(trigger_selected(&mut state, 1_000));
        let deadline = state.buffs.jump_boost.until_ms;
        assert_eq!(deadline, 1_000 + JUMP_BOOST_MS);
        let score_after = state.score;

        // Second copy while the first is still running
        state.cards.hand[0] = AbilityCard::new(AbilityKind::JumpBoost, slot_position(0));
        assert!(!trigger_selected(&mut state, 2_000));
        assert_eq!(state.score, score_after);
        assert_eq!(state.buffs.jump_boost.until_ms, deadline);
        assert_eq!(state.cards.hand[0].invalid_flash, INVALID_FLASH_TICKS);
    }

    #[test]
    fn test_reshuffle_needs_minimum_score() {
        let mut state = GameState::new(11);
        state.score = RESHUFFLE_COST - 1;
        assert!(!reshuffle_hand(&mut state));
        assert_eq!(state.score, RESHUFFLE_COST - 1);
        assert!(state.cards.hand[state.cards.selected].invalid_flash > 0);

        state.score = RESHUFFLE_COST;
        assert!(reshuffle_hand(&mut state));
        assert_eq!(state.score, 0);
        assert_eq!(state.cards.hand.len(), HAND_SIZE);
        assert_eq!(state.cards.deck.len(), 12 - HAND_SIZE);
    }

    #[test]
    fn test_speed_boost_round_trip() {
        let mut state = GameState::new(11);
        let base = state.player.speed;
        apply(AbilityKind::SpeedBoost, &mut state, 0);
        assert_eq!(state.player.speed, base * BOOST_FACTOR);
        // Expiry reversal happens in the tick's buff pass
        assert!(state.buffs.speed_boost.expired(SPEED_BOOST_MS));
        state.player.speed /= BOOST_FACTOR;
        assert_eq!(state.player.speed, base);
    }

    #[test]
    fn test_slots_fit_on_bar() {
        let bar = overlay_bar();
        let card = card_size();
        for slot in 0..HAND_SIZE {
            let pos = slot_position(slot);
            assert!(pos.x >= bar.left());
            assert!(pos.x + card.x <= bar.right() + 0.001);
        }
    }
}
