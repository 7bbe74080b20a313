//! Engine facade for a presentation/input layer
//!
//! Owns the game state and the seeded RNG. The presentation layer queues
//! intents between frames, calls [`Engine::tick`] once per frame and then
//! reads renderables, removals and status. It never mutates state directly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{
    ColorTag, Entity, EntityId, EntityKind, FormationError, GameState, TickInput, tick,
};

/// A live entity as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub size: Vec2,
    pub color: ColorTag,
}

/// HUD-facing summary of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub score: u64,
    pub lives: u8,
    pub fleets_destroyed: u32,
    pub is_game_over: bool,
}

/// Single-writer simulation engine
pub struct Engine {
    settings: Settings,
    state: GameState,
    rng: Pcg32,
    pending: TickInput,
    runs: u32,
}

impl Engine {
    /// Build the initial fleet and player: score 0, three lives, no fleets destroyed
    pub fn initialize(settings: Settings) -> Result<Self, FormationError> {
        let state = GameState::new(settings.seed, settings.screen())?;
        log::info!(
            "Engine initialized with seed {} ({}x{})",
            settings.seed,
            settings.screen_width,
            settings.screen_height
        );
        Ok(Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            state,
            pending: TickInput::default(),
            runs: 1,
        })
    }

    /// Queue intents to be consumed by the next tick
    pub fn queue_input(&mut self, input: TickInput) {
        self.pending.merge(&input);
    }

    /// Advance one frame with `input` plus anything queued since the last tick
    pub fn tick(&mut self, input: &TickInput) {
        let mut input = *input;
        input.merge(&std::mem::take(&mut self.pending));
        tick(&mut self.state, &input, &mut self.rng);
    }

    /// Start a new run with the same settings; the RNG stream continues
    pub fn reset(&mut self) -> Result<(), FormationError> {
        self.state = GameState::new(self.settings.seed, self.settings.screen())?;
        self.pending = TickInput::default();
        self.runs += 1;
        log::info!("Run {} started", self.runs);
        Ok(())
    }

    /// Every live entity: player, formation, divers, projectiles
    pub fn renderables(&self) -> Vec<Renderable> {
        let state = &self.state;
        let mut out = Vec::with_capacity(1 + state.enemy_count() + state.projectiles.len());

        out.push(Renderable {
            id: state.player.id,
            kind: EntityKind::Player,
            position: state.player.pos(),
            size: state.player.size(),
            color: ColorTag::Blue,
        });

        for enemy in state.formation.iter().chain(&state.divers) {
            out.push(Renderable {
                id: enemy.id,
                kind: enemy.kind(),
                position: enemy.pos(),
                size: enemy.size(),
                color: enemy.color,
            });
        }

        for projectile in &state.projectiles {
            out.push(Renderable {
                id: projectile.id,
                kind: projectile.kind(),
                position: projectile.pos(),
                size: projectile.size(),
                color: ColorTag::Red,
            });
        }

        out
    }

    /// Ids the presentation layer should detach after the latest tick
    pub fn removed_this_tick(&self) -> &[EntityId] {
        &self.state.removed
    }

    pub fn status(&self) -> Status {
        Status {
            score: self.state.score,
            lives: self.state.lives,
            fleets_destroyed: self.state.fleets_destroyed,
            is_game_over: self.state.is_game_over(),
        }
    }

    /// Read-only view of the full state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
