/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::EngineResult;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub bombs: BombConfig,
    pub player: PlayerConfig,
    pub enemies: EnemyConfig,
    pub powerups: PowerUpConfig,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: f32,
    pub destructible_chance: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BombConfig {
    pub fuse_ms: u64,
    pub chain_delay_ms: u64,
    pub start_range: u32,
    pub start_max_bombs: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    pub lives: u32,
    pub invincibility_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyConfig {
    pub count: usize,
    pub tick_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUpConfig {
    pub spawn_chance: f64,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    bombs: TomlBombs,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    enemies: TomlEnemies,
    #[serde(default)]
    powerups: TomlPowerUps,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_rows")]
    rows: usize,
    #[serde(default = "default_cols")]
    cols: usize,
    #[serde(default = "default_cell_size")]
    cell_size: f32,
    #[serde(default = "default_destructible_chance")]
    destructible_chance: f64,
}

#[derive(Deserialize, Debug)]
struct TomlBombs {
    #[serde(default = "default_fuse")]
    fuse_ms: u64,
    #[serde(default = "default_chain_delay")]
    chain_delay_ms: u64,
    #[serde(default = "default_start_range")]
    start_range: u32,
    #[serde(default = "default_start_max_bombs")]
    start_max_bombs: u32,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_lives")]
    lives: u32,
    #[serde(default = "default_invincibility")]
    invincibility_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlEnemies {
    #[serde(default = "default_enemy_count")]
    count: usize,
    #[serde(default = "default_enemy_tick")]
    tick_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlPowerUps {
    #[serde(default = "default_powerup_chance")]
    spawn_chance: f64,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
}

// ── Defaults ──

fn default_rows() -> usize { 13 }
fn default_cols() -> usize { 15 }
fn default_cell_size() -> f32 { 1.0 }
fn default_destructible_chance() -> f64 { 0.35 }
fn default_fuse() -> u64 { 2000 }
fn default_chain_delay() -> u64 { 100 }   // staggered cascade, not instantaneous
fn default_start_range() -> u32 { 1 }
fn default_start_max_bombs() -> u32 { 1 }
fn default_lives() -> u32 { 3 }
fn default_invincibility() -> u64 { 2000 }
fn default_enemy_count() -> usize { 5 }   // one of each kind
fn default_enemy_tick() -> u64 { 500 }
fn default_powerup_chance() -> f64 { 0.30 }

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid {
            rows: default_rows(),
            cols: default_cols(),
            cell_size: default_cell_size(),
            destructible_chance: default_destructible_chance(),
        }
    }
}

impl Default for TomlBombs {
    fn default() -> Self {
        TomlBombs {
            fuse_ms: default_fuse(),
            chain_delay_ms: default_chain_delay(),
            start_range: default_start_range(),
            start_max_bombs: default_start_max_bombs(),
        }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer {
            lives: default_lives(),
            invincibility_ms: default_invincibility(),
        }
    }
}

impl Default for TomlEnemies {
    fn default() -> Self {
        TomlEnemies {
            count: default_enemy_count(),
            tick_ms: default_enemy_tick(),
        }
    }
}

impl Default for TomlPowerUps {
    fn default() -> Self {
        TomlPowerUps { spawn_chance: default_powerup_chance() }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            grid: GridConfig {
                // Walls need an odd, at least 5x5 layout to leave a playable ring
                rows: t.grid.rows.max(5),
                cols: t.grid.cols.max(5),
                // Grid/world conversions divide by this
                cell_size: if t.grid.cell_size > 0.0 && t.grid.cell_size.is_finite() {
                    t.grid.cell_size
                } else {
                    default_cell_size()
                },
                destructible_chance: t.grid.destructible_chance.clamp(0.0, 1.0),
            },
            bombs: BombConfig {
                fuse_ms: t.bombs.fuse_ms,
                chain_delay_ms: t.bombs.chain_delay_ms,
                start_range: t.bombs.start_range,
                start_max_bombs: t.bombs.start_max_bombs.max(1),
            },
            player: PlayerConfig {
                lives: t.player.lives.max(1),
                invincibility_ms: t.player.invincibility_ms,
            },
            enemies: EnemyConfig {
                count: t.enemies.count,
                tick_ms: t.enemies.tick_ms.max(1),
            },
            powerups: PowerUpConfig {
                spawn_chance: t.powerups.spawn_chance.clamp(0.0, 1.0),
            },
            seed: t.general.seed,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        let cfg: TomlConfig = toml::from_str(text)?;
        Ok(cfg.into())
    }

    pub fn load_from(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or parse errors fall back to defaults.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() { continue; }
            match Self::load_from(&path) {
                Ok(cfg) => {
                    log::debug!("loaded {}", path.display());
                    return cfg;
                }
                Err(e) => {
                    log::warn!("could not use {}: {e}; using default settings", path.display());
                    return GameConfig::default();
                }
            }
        }
        GameConfig::default()
    }

    /// Same config with a fixed seed. Handy for reproducible sessions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    dirs
}
