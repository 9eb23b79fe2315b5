//! Text boards and level loading.
//!
//! A level file is an ASCII grid followed by one `Enemy ...` record per
//! line. The grid becomes the `Board` resource that every strategy queries;
//! each record spawns one `Actor` entity.

use std::path::Path;

use bevy::prelude::*;
use micromegas_tracing::prelude::{info, span_scope, warn};
use thiserror::Error;

use crate::actor::{EnemyRecord, RecordError};
use crate::ai::search::StepCosts;
use crate::components::GridPosition;
use crate::grid::{CellKind, GridProvider};
use crate::resources::PursuitConfig;

pub struct BoardPlugin;

impl Plugin for BoardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_level);
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("board is empty")]
    Empty,
    #[error("unknown cell symbol '{symbol}' at ({x}, {y})")]
    UnknownSymbol { symbol: char, x: usize, y: usize },
    #[error("no player ('P') on the board")]
    MissingPlayer,
    #[error("second player at ({x}, {y})")]
    DuplicatePlayer { x: usize, y: usize },
    #[error("line {line}: {source}")]
    Record { line: usize, source: RecordError },
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error("failed to read level {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// An enemy record that breaks the placement rule: strictly inside the
/// board, off the outer ring, on plain ground.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("enemy at {0} is outside the board")]
    OutOfBounds(GridPosition),
    #[error("enemy at {0} sits on the board edge")]
    OnBorder(GridPosition),
    #[error("enemy at {0} is not on plain ground")]
    NotOnGround(GridPosition),
}

// ---------------------------------------------------------------------------
// Board resource
// ---------------------------------------------------------------------------

/// The static cells of a level plus the player's current cell.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
    player: GridPosition,
}

impl Board {
    /// Parse an ASCII grid. Short rows are padded with ground.
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let lines: Vec<&str> = text.lines().collect();
        Self::from_rows(&lines)
    }

    fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(BoardError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        let mut player = None;
        for (y, row) in rows.iter().enumerate() {
            let mut len = 0;
            for (x, symbol) in row.chars().enumerate() {
                let cell = if symbol == 'P' {
                    if player.is_some() {
                        return Err(BoardError::DuplicatePlayer { x, y });
                    }
                    player = Some(GridPosition::new(x as i32, y as i32));
                    CellKind::Ground
                } else {
                    CellKind::from_symbol(symbol)
                        .ok_or(BoardError::UnknownSymbol { symbol, x, y })?
                };
                cells.push(cell);
                len += 1;
            }
            cells.extend(std::iter::repeat_n(CellKind::Ground, width - len));
        }

        let player = player.ok_or(BoardError::MissingPlayer)?;
        Ok(Board {
            width,
            height,
            cells,
            player,
        })
    }

    pub fn set_player_position(&mut self, pos: GridPosition) {
        self.player = pos;
    }

    /// Whether `pos` is at least one cell away from every edge.
    pub fn is_interior(&self, pos: GridPosition) -> bool {
        pos.x >= 1
            && pos.y >= 1
            && (pos.x as usize) + 1 < self.width
            && (pos.y as usize) + 1 < self.height
    }
}

impl GridProvider for Board {
    fn cell_at(&self, pos: GridPosition) -> Option<CellKind> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells
            .get(pos.y as usize * self.width + pos.x as usize)
            .copied()
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn player_position(&self) -> GridPosition {
        self.player
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// A board plus the enemies that start on it.
#[derive(Debug, Clone)]
pub struct Level {
    pub board: Board,
    pub enemies: Vec<EnemyRecord>,
}

fn is_record(line: &str) -> bool {
    line.trim_start().starts_with("Enemy")
}

impl Level {
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let lines: Vec<&str> = text.lines().collect();
        let split = lines.iter().position(|l| is_record(l)).unwrap_or(lines.len());

        let mut grid = &lines[..split];
        while let Some((last, rest)) = grid.split_last() {
            if !last.is_empty() {
                break;
            }
            grid = rest;
        }
        let board = Board::from_rows(grid)?;

        let mut enemies: Vec<EnemyRecord> = Vec::new();
        for (offset, line) in lines[split..].iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record = line.parse::<EnemyRecord>().map_err(|source| BoardError::Record {
                line: split + offset + 1,
                source,
            })?;
            enemies.push(record);
        }

        Ok(Level { board, enemies })
    }

    /// Read, parse and validate a level file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BoardError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BoardError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let level = Self::parse(&text)?;
        level.validate()?;
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), PlacementError> {
        for record in &self.enemies {
            let pos = record.position;
            if !self.board.in_bounds(pos) {
                return Err(PlacementError::OutOfBounds(pos));
            }
            if !self.board.is_interior(pos) {
                return Err(PlacementError::OnBorder(pos));
            }
            if !self.board.is_plain_ground(pos) {
                return Err(PlacementError::NotOnGround(pos));
            }
        }
        Ok(())
    }

    /// Insert the board and spawn one actor per record.
    pub fn install(self, world: &mut World, costs: StepCosts) {
        info!(
            "installing level ({}x{}) with {} enemies",
            self.board.width,
            self.board.height,
            self.enemies.len()
        );
        world.insert_resource(self.board);
        for record in self.enemies {
            world.spawn(record.into_actor(costs));
        }
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Load the configured level unless a board was installed already.
fn load_level(world: &mut World) {
    span_scope!("level_load");
    if world.contains_resource::<Board>() {
        return;
    }
    let Some(config) = world.get_resource::<PursuitConfig>().cloned() else {
        return;
    };
    match Level::load(&config.level_file) {
        Ok(level) => level.install(world, config.step_costs),
        Err(e) => warn!("level {} not loaded: {}", config.level_file, e),
    }
}
