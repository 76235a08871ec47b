//! Player vitals, wave bookkeeping and pause state.

use zombie_survival_core::{PlayerConfig, WaveConfig};

/// Result of reporting a kill to the game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KillOutcome {
    /// No zombies were outstanding, so nothing was counted.
    Ignored,
    /// The kill was counted and the wave continues.
    Counted,
    /// The kill finished the current wave.
    WaveComplete,
}

/// Player health after a damage or heal request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthChange {
    /// Health removed (negative) or restored (positive) by the request.
    pub delta: f32,
    /// Health after the request.
    pub health: f32,
    /// Set only by the request that brought health to zero.
    pub game_over: bool,
}

/// Authoritative record of the player's vitals and wave progress.
#[derive(Clone, Debug)]
pub struct GameState {
    player: PlayerConfig,
    waves: WaveConfig,
    health: f32,
    stamina: f32,
    sprinting: bool,
    current_wave: u32,
    zombies_remaining: u32,
    kill_count: u32,
    game_over: bool,
    paused: bool,
}

impl GameState {
    /// Creates a fresh game before the first wave.
    #[must_use]
    pub fn new(player: PlayerConfig, waves: WaveConfig) -> Self {
        Self {
            health: player.max_health,
            stamina: player.max_stamina,
            player,
            waves,
            sprinting: false,
            current_wave: 0,
            zombies_remaining: 0,
            kill_count: 0,
            game_over: false,
            paused: false,
        }
    }

    /// Restores the state created by [`GameState::new`].
    pub fn reset(&mut self) {
        *self = Self::new(self.player.clone(), self.waves.clone());
    }

    /// Advances to the next wave and returns the number of zombies it needs.
    pub fn start_new_wave(&mut self) -> u32 {
        self.current_wave = self.current_wave.saturating_add(1);
        self.zombies_remaining = self.waves.zombies_in_wave(self.current_wave);
        self.zombies_remaining
    }

    /// Grows the current wave by one zombie.
    pub fn add_zombie(&mut self) {
        self.zombies_remaining = self.zombies_remaining.saturating_add(1);
    }

    /// Counts a kill against the current wave.
    pub fn kill_zombie(&mut self) -> KillOutcome {
        if self.zombies_remaining == 0 {
            return KillOutcome::Ignored;
        }
        self.zombies_remaining -= 1;
        self.kill_count = self.kill_count.saturating_add(1);
        if self.zombies_remaining == 0 {
            KillOutcome::WaveComplete
        } else {
            KillOutcome::Counted
        }
    }

    /// Removes health, clamping at zero. Reaching zero ends the game once.
    pub fn damage_player(&mut self, amount: f32) -> HealthChange {
        let amount = sanitise(amount);
        let before = self.health;
        self.health = (self.health - amount).clamp(0.0, self.player.max_health);
        let game_over = !self.game_over && self.health <= 0.0;
        if game_over {
            self.game_over = true;
            self.sprinting = false;
        }
        HealthChange {
            delta: self.health - before,
            health: self.health,
            game_over,
        }
    }

    /// Restores health up to the maximum. Ignored once the game is over.
    pub fn heal_player(&mut self, amount: f32) -> HealthChange {
        let before = self.health;
        if !self.game_over {
            self.health = (self.health + sanitise(amount)).clamp(0.0, self.player.max_health);
        }
        HealthChange {
            delta: self.health - before,
            health: self.health,
            game_over: false,
        }
    }

    /// Drains stamina while sprinting and regenerates it otherwise.
    pub fn update_stamina(&mut self, dt_seconds: f32) {
        let dt_seconds = sanitise(dt_seconds);
        if self.sprinting && self.stamina > 0.0 {
            self.stamina -= self.player.sprint_drain_per_second * dt_seconds;
        } else {
            self.stamina += self.player.stamina_regen_per_second * dt_seconds;
        }
        self.stamina = self.stamina.clamp(0.0, self.player.max_stamina);
        if self.stamina <= 0.0 {
            self.sprinting = false;
        }
    }

    /// Starts or stops sprinting. Returns whether the player is now sprinting.
    pub fn set_sprinting(&mut self, sprinting: bool) -> bool {
        self.sprinting = sprinting && self.can_sprint();
        self.sprinting
    }

    /// Pauses or resumes. Returns whether the flag actually changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        let changed = self.paused != paused;
        self.paused = paused;
        changed
    }

    /// Whether any stamina is left to sprint with.
    #[must_use]
    pub fn can_sprint(&self) -> bool {
        self.stamina > 0.0 && !self.game_over
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Current stamina.
    #[must_use]
    pub const fn stamina(&self) -> f32 {
        self.stamina
    }

    /// Health as a percentage of the maximum.
    #[must_use]
    pub fn health_percentage(&self) -> f32 {
        self.health / self.player.max_health * 100.0
    }

    /// Stamina as a percentage of the maximum.
    #[must_use]
    pub fn stamina_percentage(&self) -> f32 {
        self.stamina / self.player.max_stamina * 100.0
    }

    /// Whether the player is sprinting.
    #[must_use]
    pub const fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    /// One-based number of the current wave; zero before the first wave.
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.current_wave
    }

    /// Zombies that still have to die to finish the wave.
    #[must_use]
    pub const fn zombies_remaining(&self) -> u32 {
        self.zombies_remaining
    }

    /// Zombies killed since the game started.
    #[must_use]
    pub const fn kill_count(&self) -> u32 {
        self.kill_count
    }

    /// Whether the player died.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Whether the simulation is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }
}

fn sanitise(amount: f32) -> f32 {
    if amount.is_finite() {
        amount.max(0.0)
    } else {
        0.0
    }
}
