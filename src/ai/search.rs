//! A* over the board's plain-ground cells, 8-connected.
//!
//! Every query builds a fresh node arena indexed by `y * width + x`.
//! Parents are arena indices, so the whole search state is dropped in one
//! piece when the query returns.
//!
//! A relaxed node's combined cost is its heuristic plus the parent's
//! *combined* cost plus the step cost, so heuristic terms pile up along a
//! route. Routes found this way are walkable but not always the cheapest;
//! enemy movement depends on exactly this ordering.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use micromegas_tracing::prelude::*;
use serde::Deserialize;

use crate::components::{Displacement, GridPosition};
use crate::grid::{GridProvider, NEIGHBOR_OFFSETS};

/// Cost of one orthogonal and one diagonal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StepCosts {
    pub orthogonal: u32,
    pub diagonal: u32,
}

impl Default for StepCosts {
    fn default() -> Self {
        Self {
            orthogonal: 10,
            diagonal: 14,
        }
    }
}

impl StepCosts {
    fn of(&self, step: Displacement) -> u32 {
        if step.is_diagonal() {
            self.diagonal
        } else {
            self.orthogonal
        }
    }
}

/// Per-cell search record, alive for one query only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNode {
    pub position: GridPosition,
    /// Manhattan distance to the goal, in cells.
    pub heuristic: u32,
    /// Open-set ordering key: heuristic + parent's combined + step cost.
    /// Zero for the start node.
    pub combined: u32,
    /// Sum of step costs along the parent chain.
    pub accumulated: u32,
    /// Arena index of the predecessor on that route.
    pub parent: Option<usize>,
}

impl SearchNode {
    fn new(position: GridPosition, goal: GridPosition) -> Self {
        Self {
            position,
            heuristic: manhattan(&position, &goal),
            combined: 0,
            accumulated: 0,
            parent: None,
        }
    }
}

/// Manhattan distance heuristic.
pub fn manhattan(a: &GridPosition, b: &GridPosition) -> u32 {
    (a.x - b.x).unsigned_abs() + (a.y - b.y).unsigned_abs()
}

/// Reconstructed route from start (excluded) to goal (included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub steps: Vec<GridPosition>,
    pub cost: u32,
}

impl Path {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Offset of the first step, zero for an empty path.
    pub fn first_step(&self, start: GridPosition) -> Displacement {
        self.steps
            .first()
            .map_or(Displacement::ZERO, |next| start.displacement_to(*next))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: usize,
}

/// Node storage for a single query.
struct SearchArena {
    width: usize,
    nodes: Vec<Option<SearchNode>>,
    closed: Vec<bool>,
    opened: Vec<bool>,
    // (f, insertion sequence, node index); the sequence keeps ties FIFO.
    open: BinaryHeap<Reverse<(u32, u64, usize)>>,
    sequence: u64,
}

impl SearchArena {
    /// One node per plain-ground cell; every other cell stays `None`.
    fn build<G: GridProvider>(grid: &G, goal: GridPosition) -> Self {
        let (width, height) = (grid.width(), grid.height());
        let mut nodes = Vec::with_capacity(width * height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let pos = GridPosition::new(x, y);
                nodes.push(
                    grid.is_plain_ground(pos)
                        .then(|| SearchNode::new(pos, goal)),
                );
            }
        }
        Self {
            width,
            closed: vec![false; nodes.len()],
            opened: vec![false; nodes.len()],
            nodes,
            open: BinaryHeap::new(),
            sequence: 0,
        }
    }

    fn index_of<G: GridProvider>(&self, grid: &G, pos: GridPosition) -> Option<usize> {
        if !grid.in_bounds(pos) {
            return None;
        }
        let idx = pos.y as usize * self.width + pos.x as usize;
        self.nodes[idx].is_some().then_some(idx)
    }

    fn push(&mut self, idx: usize) {
        if let Some(node) = &self.nodes[idx] {
            self.opened[idx] = true;
            self.open.push(Reverse((node.combined, self.sequence, idx)));
            self.sequence += 1;
        }
    }

    /// Next open node with the lowest f. Entries superseded by a later
    /// relaxation are skipped.
    fn pop(&mut self) -> Option<usize> {
        while let Some(Reverse((f, _, idx))) = self.open.pop() {
            if self.closed[idx] {
                continue;
            }
            match &self.nodes[idx] {
                Some(node) if node.combined == f => return Some(idx),
                _ => continue,
            }
        }
        None
    }

    fn relax(&mut self, from: usize, to: usize, step_cost: u32) {
        if self.closed[to] {
            return;
        }
        let Some(parent) = self.nodes[from] else {
            return;
        };
        let Some(node) = self.nodes[to].as_mut() else {
            return;
        };
        let combined = node.heuristic + parent.combined + step_cost;
        if !self.opened[to] || combined < node.combined {
            node.combined = combined;
            node.accumulated = parent.accumulated + step_cost;
            node.parent = Some(from);
            self.push(to);
        }
    }

    fn reconstruct(&self, goal: usize) -> Path {
        let mut steps = Vec::new();
        let mut cursor = self.nodes[goal];
        let cost = cursor.map_or(0, |n| n.accumulated);
        while let Some(node) = cursor {
            let Some(parent) = node.parent else { break };
            steps.push(node.position);
            cursor = self.nodes[parent];
        }
        steps.reverse();
        Path { steps, cost }
    }
}

/// Shortest-path search from an actor to the player.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathfindingEngine {
    pub costs: StepCosts,
}

impl PathfindingEngine {
    pub fn new(costs: StepCosts) -> Self {
        Self { costs }
    }

    /// Route from `start` to `goal`, or `None` when the goal cannot be
    /// reached or either end is not plain ground.
    pub fn search<G: GridProvider>(
        &self,
        grid: &G,
        start: GridPosition,
        goal: GridPosition,
    ) -> (Option<Path>, SearchStats) {
        span_scope!("astar_search");
        let mut stats = SearchStats::default();
        let mut arena = SearchArena::build(grid, goal);

        let (Some(start_idx), Some(goal_idx)) =
            (arena.index_of(grid, start), arena.index_of(grid, goal))
        else {
            return (None, stats);
        };

        arena.push(start_idx);

        while let Some(current) = arena.pop() {
            arena.closed[current] = true;
            stats.expanded += 1;
            if current == goal_idx {
                imetric!("astar_expanded_nodes", "count", stats.expanded as u64);
                return (Some(arena.reconstruct(goal_idx)), stats);
            }

            let Some(here) = arena.nodes[current].map(|n| n.position) else {
                continue;
            };
            for offset in NEIGHBOR_OFFSETS {
                if let Some(next) = arena.index_of(grid, here + offset) {
                    arena.relax(current, next, self.costs.of(offset));
                }
            }
        }

        imetric!("astar_expanded_nodes", "count", stats.expanded as u64);
        debug!("no path from ({}, {}) to ({}, {})", start.x, start.y, goal.x, goal.y);
        (None, stats)
    }

    /// First displacement of the route from `start` to the player.
    /// `None` means no route exists and the caller must fall back.
    pub fn next_step<G: GridProvider>(&self, grid: &G, start: GridPosition) -> Option<Displacement> {
        let goal = grid.player_position();
        if start == goal {
            return Some(Displacement::ZERO);
        }
        let (path, _) = self.search(grid, start, goal);
        path.map(|p| p.first_step(start))
    }
}
