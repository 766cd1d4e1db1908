//! One game from first wave to win or loss.
//!
//! The session owns every subsystem and a simulated clock. The front end
//! feeds it elapsed time; each periodic driver fires from its own
//! `Cadence`, and whatever the subsystems reported is dispatched to the
//! collaborators once the drivers have run.

use std::sync::mpsc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::bonus::{roll_reward, BonusManager, BonusReward};
use super::cadence::Cadence;
use super::formation::Formation;
use super::hooks::{Cue, GameEvent, Hooks, Outcome, Renderer, Sprite};
use super::level::{LevelState, Progress};
use super::player::{PlayerTeam, Steer};
use super::powerup::{PowerUp, TimedEffects};
use super::projectile::{Owner, Projectiles};
use crate::config::{GameConfig, GameType};
use crate::error::Result;

/// Shield blink half-period.
const BLINK_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Won,
    Lost,
    TornDown,
}

impl Phase {
    pub fn is_over(self) -> bool {
        !matches!(self, Phase::Playing)
    }
}

struct Drivers {
    projectile: Cadence,
    enemy_move: Cadence,
    player_hit: Cadence,
    bonus_roll: Cadence,
}

impl Drivers {
    fn stop(&mut self) {
        self.projectile.stop();
        self.enemy_move.stop();
        self.player_hit.stop();
        self.bonus_roll.stop();
    }
}

pub struct Session {
    game_type: GameType,
    level: LevelState,
    phase: Phase,
    now_ms: u64,
    score: u32,
    formation: Formation,
    player: PlayerTeam,
    projectiles: Projectiles,
    bonus: BonusManager,
    drivers: Drivers,
    rng: StdRng,
    inbox: mpsc::Receiver<GameEvent>,
    removals: Vec<(Sprite, bool)>,
}

impl Session {
    pub fn new(config: &GameConfig) -> Result<Self> {
        config.validate()?;
        let game_type = config.game_type()?;
        let level = LevelState::new(config.starting_level)?;
        let (w, h) = (config.canvas_width, config.canvas_height);
        let timing = &config.timing;
        let (outbox, inbox) = mpsc::channel();

        let mut formation = Formation::new(w, h, outbox.clone());
        formation.initialize(&level.plan()?)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::info!(
            tier = level.tier(),
            seed = ?config.seed,
            theme = %game_type,
            lives = config.lives,
            "session started"
        );
        Ok(Self {
            game_type,
            level,
            phase: Phase::Playing,
            now_ms: 0,
            score: 0,
            formation,
            player: PlayerTeam::new(w, h, config.lives, timing, outbox.clone()),
            projectiles: Projectiles::new(w, h, outbox.clone()),
            bonus: BonusManager::new(w, h, timing, outbox),
            drivers: Drivers {
                projectile: Cadence::new(timing.projectile_ms),
                enemy_move: Cadence::new(timing.enemy_move_ms),
                player_hit: Cadence::new(timing.player_hit_ms),
                bonus_roll: Cadence::new(timing.bonus_roll_ms),
            },
            rng,
            inbox,
            removals: Vec::new(),
        })
    }

    /// Advance the simulated clock by `dt_ms` and run whatever drivers
    /// came due, then hand the results to `hooks`.
    pub fn update(&mut self, dt_ms: u64, hooks: &mut Hooks<'_>) -> Result<()> {
        if self.phase == Phase::TornDown {
            return Ok(());
        }
        self.now_ms += dt_ms;

        for _ in 0..self.drivers.projectile.advance(dt_ms) {
            self.projectile_tick();
        }
        for _ in 0..self.drivers.enemy_move.advance(dt_ms) {
            let can_fire = self.phase == Phase::Playing;
            self.formation
                .advance(&mut self.rng, &mut self.projectiles, can_fire);
        }
        for _ in 0..self.drivers.player_hit.advance(dt_ms) {
            self.player.resolve_hits(&mut self.projectiles);
        }
        for _ in 0..self.drivers.bonus_roll.advance(dt_ms) {
            self.bonus.try_spawn(self.now_ms, &mut self.rng);
        }

        self.dispatch(hooks)
    }

    fn projectile_tick(&mut self) {
        let now = self.now_ms;
        let can_fire = self.phase == Phase::Playing;
        let target = self.player.target();

        self.player.tick(now);
        self.projectiles.tick();
        self.formation
            .attack_tick(now, target, &mut self.projectiles, &mut self.rng, can_fire);
        self.bonus
            .tick(now, target, &mut self.projectiles, &mut self.rng, can_fire);
        self.formation.resolve_hits(&mut self.projectiles);
        self.bonus.resolve_hit(&mut self.projectiles);
    }

    fn dispatch(&mut self, hooks: &mut Hooks<'_>) -> Result<()> {
        while let Ok(event) = self.inbox.try_recv() {
            match event {
                GameEvent::Cue(cue) => hooks.audio.play(cue, self.game_type),
                GameEvent::Scored(points) => {
                    self.score += points;
                    hooks.scores.add_score(points);
                }
                GameEvent::Removed { sprite, explode } => self.removals.push((sprite, explode)),
                GameEvent::FormationCleared => self.next_level(hooks)?,
                GameEvent::PlayerDefeated => self.finish(Outcome::Loss, hooks),
                GameEvent::BonusDestroyed => self.pay_bonus(),
                GameEvent::PowerUpExpired(kind) => {
                    tracing::trace!(?kind, "power-up expiry dispatched");
                }
            }
        }
        Ok(())
    }

    fn next_level(&mut self, hooks: &mut Hooks<'_>) -> Result<()> {
        if self.phase != Phase::Playing {
            return Ok(());
        }
        match self.level.advance() {
            Progress::Next(tier) => {
                tracing::info!(tier, score = self.score, "level advanced");
                self.projectiles.clear(Owner::Enemy);
                self.formation.initialize(&self.level.plan()?)?;
                hooks.audio.play(Cue::LevelUp, self.game_type);
                hooks.navigator.level_complete(tier);
            }
            Progress::Won => self.finish(Outcome::Win, hooks),
        }
        Ok(())
    }

    fn finish(&mut self, outcome: Outcome, hooks: &mut Hooks<'_>) {
        if self.phase != Phase::Playing {
            return;
        }
        self.phase = match outcome {
            Outcome::Win => Phase::Won,
            Outcome::Loss => Phase::Lost,
        };
        self.bonus.disable();
        self.formation.halt_attacks();
        hooks.audio.play(Cue::GameOver, self.game_type);
        hooks.navigator.game_over(outcome, self.score);
        tracing::info!(?outcome, score = self.score, tier = self.level.tier(), "game over");
    }

    fn pay_bonus(&mut self) {
        let reward = roll_reward(self.level.tier(), &mut self.rng);
        let placed = match reward {
            BonusReward::Clone => self.player.add_clone().is_some(),
            BonusReward::ExtraLife => false,
        };
        if !placed {
            self.player.add_life();
        }
        let power_up = PowerUp::random(&mut self.rng);
        self.player.apply_power_up(power_up, self.now_ms);
        tracing::debug!(?reward, placed, ?power_up, "bonus paid out");
    }

    pub fn steer(&mut self, direction: Steer) {
        if self.phase == Phase::Playing {
            self.player.steer(direction, self.now_ms);
        }
    }

    /// Returns the number of bullets fired.
    pub fn fire(&mut self) -> usize {
        if self.phase != Phase::Playing {
            return 0;
        }
        self.player.fire(self.now_ms, &mut self.projectiles)
    }

    /// Push the current frame to `renderer`: removals first, then every
    /// live entity.
    pub fn draw(&mut self, renderer: &mut dyn Renderer) {
        for (sprite, explode) in self.removals.drain(..) {
            renderer.remove(&sprite, explode);
        }
        let sprites = self
            .formation
            .sprites()
            .chain(self.player.sprites())
            .chain(self.bonus.sprite())
            .chain(self.projectiles.iter().map(|p| p.sprite()));
        for sprite in sprites {
            renderer.place(&sprite, sprite.bounds.left, sprite.bounds.top);
        }
        let visible = !self.player.is_shielded() || (self.now_ms / BLINK_MS) % 2 == 0;
        for ship in self.player.ships() {
            renderer.set_visible(ship.id, visible);
        }
    }

    /// Stop every driver. Later updates are no-ops.
    pub fn teardown(&mut self) {
        if self.phase == Phase::TornDown {
            return;
        }
        self.drivers.stop();
        self.bonus.disable();
        self.formation.halt_attacks();
        self.phase = Phase::TornDown;
        tracing::info!(score = self.score, "session torn down");
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.player.lives()
    }

    pub fn level(&self) -> u32 {
        self.level.tier()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn effects(&self) -> &TimedEffects {
        self.player.effects()
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn player(&self) -> &PlayerTeam {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerTeam {
        &mut self.player
    }

    pub fn projectiles(&self) -> &Projectiles {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut Projectiles {
        &mut self.projectiles
    }

    pub fn bonus(&self) -> &BonusManager {
        &self.bonus
    }

    pub fn drivers_running(&self) -> bool {
        let d = &self.drivers;
        d.projectile.is_running()
            || d.enemy_move.is_running()
            || d.player_hit.is_running()
            || d.bonus_roll.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::ScoreEntry;
    use crate::sim::geometry::Vec2;
    use crate::sim::hooks::{AudioCue, ScoreRecorder, SessionNavigator};
    use crate::sim::level::MAX_LEVEL;

    #[derive(Default)]
    struct Recorder {
        cues: Vec<Cue>,
        points: u32,
        outcomes: Vec<(Outcome, u32)>,
        levels: Vec<u32>,
    }

    impl AudioCue for Recorder {
        fn play(&mut self, cue: Cue, _variant: GameType) {
            self.cues.push(cue);
        }
    }

    impl ScoreRecorder for Recorder {
        fn add_score(&mut self, points: u32) {
            self.points += points;
        }
        fn top(&self, _n: usize) -> Vec<ScoreEntry> {
            Vec::new()
        }
        fn record(&mut self, _name: &str, _score: u32, _level: u32) {}
    }

    impl SessionNavigator for Recorder {
        fn game_over(&mut self, outcome: Outcome, final_score: u32) {
            self.outcomes.push((outcome, final_score));
        }
        fn level_complete(&mut self, level: u32) {
            self.levels.push(level);
        }
    }

    fn step(session: &mut Session, ms: u64, audio: &mut Recorder, rest: &mut Recorder) {
        let mut navigator = Recorder::default();
        let mut hooks = Hooks {
            audio,
            scores: rest,
            navigator: &mut navigator,
        };
        session.update(ms, &mut hooks).unwrap();
        rest.outcomes.extend(navigator.outcomes);
        rest.levels.extend(navigator.levels);
    }

    fn seeded(lives: u32) -> Session {
        let config = GameConfig {
            lives,
            seed: Some(42),
            ..GameConfig::default()
        };
        Session::new(&config).unwrap()
    }

    fn shoot_down_everything(session: &mut Session) {
        let centers: Vec<Vec2> = session
            .formation()
            .ships()
            .iter()
            .map(|s| s.body.center())
            .collect();
        for c in centers {
            session
                .projectiles_mut()
                .fire_player(Vec2::new(c.x, c.y + 6.0));
        }
    }

    #[test]
    fn clearing_a_wave_advances_the_level() {
        let mut session = seeded(3);
        let (mut audio, mut rest) = (Recorder::default(), Recorder::default());
        shoot_down_everything(&mut session);
        step(&mut session, 16, &mut audio, &mut rest);
        assert_eq!(session.level(), 2);
        assert_eq!(rest.levels, vec![2]);
        assert_eq!(session.formation().len(), 2 * 4 + 10);
        assert!(audio.cues.contains(&Cue::LevelUp));
        assert_eq!(session.score(), rest.points);
        assert!(session.score() > 0);
    }

    #[test]
    fn clearing_the_last_tier_wins_once() {
        let config = GameConfig {
            starting_level: 3,
            seed: Some(7),
            ..GameConfig::default()
        };
        let mut session = Session::new(&config).unwrap();
        let (mut audio, mut rest) = (Recorder::default(), Recorder::default());
        shoot_down_everything(&mut session);
        step(&mut session, 16, &mut audio, &mut rest);
        step(&mut session, 16, &mut audio, &mut rest);
        assert_eq!(session.phase(), Phase::Won);
        assert_eq!(rest.outcomes.len(), 1);
        assert_eq!(rest.outcomes[0].0, Outcome::Win);
        assert_eq!(session.level(), MAX_LEVEL);
        assert!(!session.bonus().is_enabled());
    }

    #[test]
    fn shooting_the_bonus_pays_a_life_and_a_power_up() {
        let mut session = seeded(3);
        let (mut audio, mut rest) = (Recorder::default(), Recorder::default());
        let mut rng = StdRng::seed_from_u64(17);
        assert!((0..1_000).any(|_| session.bonus.try_spawn(0, &mut rng)));
        for _ in 0..20 {
            session
                .bonus
                .tick(0, None, &mut session.projectiles, &mut rng, false);
        }
        let c = session.bonus().ship().unwrap().body.center();
        session
            .projectiles_mut()
            .fire_player(Vec2::new(c.x, c.y + 6.0));
        step(&mut session, 16, &mut audio, &mut rest);

        assert!(session.bonus().ship().is_none());
        assert!(audio.cues.contains(&Cue::PowerUp));
        assert_eq!(session.score(), 0);
        assert_eq!(session.player().ships().len(), 1);
        // Tier 1 always pays a life; an ExtraLife power-up adds a second.
        let timed = session.effects().iter().count();
        assert_eq!(session.lives() as usize + timed, 5);
    }

    #[test]
    fn bonus_clone_falls_back_to_a_life_on_a_full_roster() {
        let config = GameConfig {
            starting_level: 2,
            seed: Some(42),
            ..GameConfig::default()
        };
        let mut session = Session::new(&config).unwrap();
        for _ in 0..30 {
            if session.player().ships().len() > 1 {
                break;
            }
            session.pay_bonus();
        }
        assert_eq!(session.player().ships().len(), 2);

        while session.player_mut().add_clone().is_some() {}
        let roster = session.player().ships().len();
        let lives = session.lives();
        for _ in 0..20 {
            session.pay_bonus();
        }
        assert_eq!(session.player().ships().len(), roster);
        assert!(session.lives() >= lives + 20);
    }

    #[test]
    fn teardown_stops_every_driver() {
        let mut session = seeded(3);
        let (mut audio, mut rest) = (Recorder::default(), Recorder::default());
        step(&mut session, 100, &mut audio, &mut rest);
        session.teardown();
        assert!(!session.drivers_running());
        let before = session.now_ms();
        step(&mut session, 1_000, &mut audio, &mut rest);
        assert_eq!(session.now_ms(), before);
        assert_eq!(session.phase(), Phase::TornDown);
    }

    #[test]
    fn fire_goes_quiet_after_game_over() {
        let mut session = seeded(1);
        let (mut audio, mut rest) = (Recorder::default(), Recorder::default());
        let c = session.player().ships()[0].body.center();
        session
            .projectiles_mut()
            .fire_enemy(Vec2::new(c.x, c.y - 14.0));
        step(&mut session, 50, &mut audio, &mut rest);
        assert_eq!(session.phase(), Phase::Lost);
        assert_eq!(session.fire(), 0);
        for _ in 0..10 {
            step(&mut session, 50, &mut audio, &mut rest);
        }
        assert_eq!(rest.outcomes, vec![(Outcome::Loss, 0)]);
    }
}
