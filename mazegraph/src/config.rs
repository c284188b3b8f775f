//! Solver configuration.
//!
//! Loaded from a JSON file (every field optional) and then overridden from the command line.

use std::{fmt::Display, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Result};
use crate::find::Algorithm;

/// Width of a maze cell in pixels
pub const CELL_SIZE: u32 = 16;
/// Stroke width of a wall, which is also where the first cell starts
pub const LINE_WIDTH: u32 = 2;

/// How the weight of a compressed corridor edge is computed
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeWeightMode {
    /// Number of cells walked between the two nodes
    #[default]
    HopCount,
    /// Every edge costs 1, i.e. count junction-to-junction moves. The Manhattan heuristic is
    /// not admissible under this mode.
    Uniform,
}

/// Pixel layout of the cells in the drawing
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub cell_size: u32,
    pub origin: u32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            origin: LINE_WIDTH,
        }
    }
}

impl Geometry {
    /// Pixel coordinate of the left (or top) edge of the cell at `index`
    pub fn edge(&self, index: usize) -> u32 {
        self.origin + index as u32 * self.cell_size
    }

    /// Pixel coordinate of the center line of the cell at `index`
    pub fn mid(&self, index: usize) -> u32 {
        self.edge(index) + self.cell_size / 2
    }

    /// Rejects layouts no cell can be placed on
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            let reason = "cell_size must be at least 1".to_string();
            return Err(MazeError::InvalidGeometry(reason));
        }
        Ok(())
    }

    /// Number of whole cells that fit before `extent`
    pub fn cells_within(&self, extent: u32) -> usize {
        (extent.saturating_sub(self.origin) / self.cell_size) as usize
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const RED: Color = Color::rgb(0xff, 0x33, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = MazeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| MazeError::InvalidColor(s.to_string()))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| MazeError::InvalidColor(s.to_string()))
        };
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = MazeError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub edge_weight_mode: EdgeWeightMode,
    /// Dump every cell and the full adjacency list to the debug log
    pub trace_enabled: bool,
    /// Keep a color per stroke instead of one color per cell
    pub per_direction_color: bool,
    pub geometry: Geometry,
    pub algorithms: Vec<Algorithm>,
    pub render_dead_ends: bool,
    pub wall_color: Color,
    pub solution_color: Color,
    pub dead_end_color: Color,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            edge_weight_mode: EdgeWeightMode::HopCount,
            trace_enabled: false,
            per_direction_color: true,
            geometry: Geometry::default(),
            algorithms: Algorithm::ALL.to_vec(),
            render_dead_ends: true,
            wall_color: Color::BLACK,
            solution_color: Color::RED,
            dead_end_color: Color::BLUE,
        }
    }
}

impl SolverConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.geometry.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_color_roundtrip() {
        assert_eq!(Color::RED.to_string(), "#ff3300");
        assert_eq!("#0000ff".parse::<Color>().unwrap(), Color::BLUE);
        assert!(matches!(
            "0000ff".parse::<Color>(),
            Err(MazeError::InvalidColor(_))
        ));
        assert!("#00zz00".parse::<Color>().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SolverConfig = serde_json::from_str(
            r##"{
                "edge_weight_mode": "uniform",
                "trace_enabled": true,
                "geometry": { "cell_size": 10 },
                "algorithms": ["a_star"],
                "dead_end_color": "#00ff00"
            }"##,
        )
        .unwrap();

        assert_eq!(config.edge_weight_mode, EdgeWeightMode::Uniform);
        assert!(config.trace_enabled);
        assert!(config.per_direction_color);
        assert_eq!(config.geometry.cell_size, 10);
        assert_eq!(config.geometry.origin, LINE_WIDTH);
        assert_eq!(config.algorithms, vec![Algorithm::AStar]);
        assert_eq!(config.dead_end_color, Color::rgb(0, 0xff, 0));
        assert_eq!(config.solution_color, Color::RED);
    }

    #[test]
    fn test_geometry() {
        let g = Geometry::default();
        assert_eq!(g.edge(0), 2);
        assert_eq!(g.edge(3), 50);
        assert_eq!(g.mid(0), 10);
        assert_eq!(g.cells_within(82), 5);
        assert_eq!(g.cells_within(1), 0);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_zero_cell_size_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "geometry": { "cell_size": 0 } }"#).unwrap();

        assert!(matches!(
            SolverConfig::load(&path),
            Err(MazeError::InvalidGeometry(_))
        ));
    }
}
