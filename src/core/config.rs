//! Encounter configuration.
//!
//! Sessions are configured at startup with an `EncounterConfig`: the grid
//! layout plus the RNG seed. Configs are built in code with the `with_*`
//! builders or read from TOML:
//!
//! ```
//! use grid_tactics::core::EncounterConfig;
//!
//! let config = EncounterConfig::from_toml_str(r#"
//!     seed = 7
//!
//!     [grid]
//!     width = 12
//!     height = 8
//! "#).unwrap();
//!
//! assert_eq!(config.grid.width, 12);
//! assert_eq!(config.grid.cell_size, 1.0);
//! ```

use serde::{Deserialize, Serialize};

use super::error::Result;

/// Grid layout and world-space scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of cells along X.
    pub width: i32,

    /// Number of cells along Y.
    pub height: i32,

    /// World units per cell (1.0 = one 5 ft square).
    pub cell_size: f32,

    /// World units per elevation level.
    pub elevation_height: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            cell_size: 1.0,
            elevation_height: 1.0,
        }
    }
}

impl GridConfig {
    /// Create a grid config with default scale.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Set the world size of one cell.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the world height of one elevation level.
    #[must_use]
    pub fn with_elevation_height(mut self, elevation_height: f32) -> Self {
        self.elevation_height = elevation_height;
        self
    }
}

/// Complete encounter configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Seed for initiative and any other rolls.
    pub seed: u64,

    /// Grid layout.
    pub grid: GridConfig,
}

impl EncounterConfig {
    /// Create a config with the default 20x20 grid.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            grid: GridConfig::default(),
        }
    }

    /// Set the grid layout.
    #[must_use]
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Parse a config from TOML. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}
