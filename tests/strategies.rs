use pathfinding::prelude::dijkstra;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pursuit::actor::Actor;
use pursuit::ai::chase;
use pursuit::ai::search::{PathfindingEngine, StepCosts};
use pursuit::ai::{MovementStrategy, PlannedMove};
use pursuit::components::{Direction, Displacement, GridPosition};
use pursuit::grid::{GridProvider, NEIGHBOR_OFFSETS};
use pursuit::plugins::board::Board;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate then commit, as the turn observer does.
fn take_turn(actor: &mut Actor, board: &Board) -> PlannedMove {
    let planned = actor.plan(board);
    let mv = if board.accepts(actor.position(), planned.displacement) {
        planned
    } else {
        planned.rejected()
    };
    actor.apply_move(&mv);
    mv
}

fn random_board(rng: &mut StdRng, width: usize, height: usize) -> (Board, GridPosition) {
    let mut rows: Vec<Vec<char>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let edge = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                    if edge || rng.gen_bool(0.3) { '#' } else { ' ' }
                })
                .collect()
        })
        .collect();
    let px = rng.gen_range(1..width - 1);
    let py = rng.gen_range(1..height - 1);
    rows[py][px] = 'P';
    let text: Vec<String> = rows.into_iter().map(|r| r.into_iter().collect()).collect();
    let board = Board::parse(&text.join("\n")).unwrap();

    let start = loop {
        let candidate = GridPosition::new(
            rng.gen_range(1..width as i32 - 1),
            rng.gen_range(1..height as i32 - 1),
        );
        if board.is_plain_ground(candidate) && candidate != board.player_position() {
            break candidate;
        }
    };
    (board, start)
}

fn oracle_cost(board: &Board, from: GridPosition, costs: StepCosts) -> Option<u32> {
    let goal = board.player_position();
    dijkstra(
        &from,
        |p| {
            let p = *p;
            NEIGHBOR_OFFSETS
                .iter()
                .map(move |d| (p + *d, *d))
                .filter(|(next, _)| board.is_plain_ground(*next))
                .map(|(next, d)| {
                    let cost = if d.is_diagonal() { costs.diagonal } else { costs.orthogonal };
                    (next, cost)
                })
                .collect::<Vec<_>>()
        },
        |p| *p == goal,
    )
    .map(|(_, cost)| cost)
}

// ---------------------------------------------------------------------------
// Shortest path
// ---------------------------------------------------------------------------

#[test]
fn shortest_path_first_step_leads_toward_the_player() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let costs = StepCosts::default();
    let mut reachable = 0;

    for _ in 0..200 {
        let (board, start) = random_board(&mut rng, 12, 9);
        let strategy = MovementStrategy::shortest_path();
        let step = strategy.plan(start, &board).displacement;

        match oracle_cost(&board, start, costs) {
            Some(total) => {
                reachable += 1;
                let next = start + step;
                assert!(step.is_single_step() && !step.is_zero());
                assert!(board.is_plain_ground(next), "stepped off ground at {next}");
                assert!(oracle_cost(&board, next, costs).is_some(), "dead end after {start}");

                let (path, _) = PathfindingEngine::new(costs).search(&board, start, board.player_position());
                let path = path.unwrap();
                assert!(path.cost >= total);
                let mut at = start;
                for cell in &path.steps {
                    assert!(at.displacement_to(*cell).is_single_step());
                    assert!(board.is_plain_ground(*cell));
                    at = *cell;
                }
                assert_eq!(at, board.player_position());
            }
            None => {
                assert_eq!(step, chase::greedy_step(start, &board));
            }
        }
    }
    assert!(reachable > 20, "seed produced too few reachable boards");
}

#[test]
fn shortest_path_keeps_the_piled_up_heuristic_route() {
    let board = Board::parse(
        "############\n\
         #  #  ## P #\n\
         # #    ##  #\n\
         ## # # #  ##\n\
         #     #    #\n\
         #   # #  # #\n\
         #  #   # # #\n\
         #   #   #  #\n\
         ############",
    )
    .unwrap();
    let start = GridPosition::new(1, 7);
    let costs = StepCosts::default();

    assert_eq!(oracle_cost(&board, start, costs), Some(116));
    let actor = Actor::new(start, MovementStrategy::shortest_path());
    assert_eq!(actor.compute_next_move(&board), Displacement::new(1, -1));
    let (path, _) = PathfindingEngine::new(costs).search(&board, start, board.player_position());
    assert_eq!(path.unwrap().cost, 118);
}

#[test]
fn open_five_by_five_goes_diagonal() {
    let board = Board::parse(".....\n.....\n.....\n.....\n....P").unwrap();
    let actor = Actor::new(GridPosition::new(0, 0), MovementStrategy::shortest_path());
    assert_eq!(actor.compute_next_move(&board), Displacement::new(1, 1));

    let (path, _) = PathfindingEngine::default().search(&board, GridPosition::new(0, 0), board.player_position());
    let path = path.unwrap();
    assert_eq!(path.len(), 4);
    assert_eq!(path.cost, 56);
}

#[test]
fn smart_enemy_catches_the_player() {
    let board = Board::parse("########\n#      #\n# ## # #\n#  #  P#\n########").unwrap();
    let mut actor = Actor::new(GridPosition::new(1, 1), MovementStrategy::shortest_path());
    for _ in 0..10 {
        take_turn(&mut actor, &board);
    }
    assert_eq!(actor.position(), board.player_position());
    assert!(actor.compute_next_move(&board).is_zero());
}

// ---------------------------------------------------------------------------
// Common properties
// ---------------------------------------------------------------------------

#[test]
fn enclosed_actors_never_move() {
    let board = Board::parse("#######\n#######\n### ###\n#######\n#P    #\n#######").unwrap();
    let at = GridPosition::new(3, 2);
    for strategy in [
        MovementStrategy::DirectChase,
        MovementStrategy::patrol(Direction::Down),
        MovementStrategy::wall_follow(Direction::Left),
        MovementStrategy::shortest_path(),
    ] {
        let mut actor = Actor::new(at, strategy);
        let facing = actor.strategy().facing();
        let mv = take_turn(&mut actor, &board);
        assert!(mv.displacement.is_zero());
        assert_eq!(actor.position(), at);
        assert_eq!(actor.strategy().facing(), facing);
    }
}

#[test]
fn planning_is_repeatable_on_random_boards() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let (board, start) = random_board(&mut rng, 10, 8);
        for facing in Direction::ALL {
            for strategy in [
                MovementStrategy::DirectChase,
                MovementStrategy::patrol(facing),
                MovementStrategy::wall_follow(facing),
                MovementStrategy::shortest_path(),
            ] {
                let actor = Actor::new(start, strategy);
                assert_eq!(actor.plan(&board), actor.plan(&board));
            }
        }
    }
}

#[test]
fn one_wide_column_turns_patrol_and_wall_follower_around() {
    let board = Board::parse("##.##\n##.##\n##.##\n##P##").unwrap();
    for strategy in [
        MovementStrategy::patrol(Direction::Up),
        MovementStrategy::wall_follow(Direction::Up),
    ] {
        let mut actor = Actor::new(GridPosition::new(2, 0), strategy);
        assert_eq!(actor.compute_next_move(&board), Displacement::new(0, 1));
        take_turn(&mut actor, &board);
        assert_eq!(actor.position(), GridPosition::new(2, 1));
        assert_eq!(actor.strategy().facing(), Some(Direction::Down));
    }
}

// ---------------------------------------------------------------------------
// Patrol
// ---------------------------------------------------------------------------

#[test]
fn patrol_bounces_between_walls() {
    let board = Board::parse("######\n#    #\n######\n#P   #\n######").unwrap();
    let mut actor = Actor::new(GridPosition::new(1, 1), MovementStrategy::patrol(Direction::Right));
    let xs: Vec<i32> = (0..8)
        .map(|_| {
            take_turn(&mut actor, &board);
            actor.position().x
        })
        .collect();
    // Reversal moves on the same turn it happens.
    assert_eq!(xs, vec![2, 3, 4, 3, 2, 1, 2, 3]);
}

// ---------------------------------------------------------------------------
// Wall follow
// ---------------------------------------------------------------------------

#[test]
fn wall_follower_circles_a_block_without_stalling() {
    let board = Board::parse("#######\n#     #\n# ### #\n# ### #\n#    P#\n#######").unwrap();
    let mut actor = Actor::new(GridPosition::new(1, 1), MovementStrategy::wall_follow(Direction::Right));
    let mut visited = std::collections::HashSet::new();
    let mut previous_zero = false;

    for turn in 0..32 {
        let mv = take_turn(&mut actor, &board);
        let zero = mv.displacement.is_zero();
        assert!(!(zero && previous_zero), "stalled twice in a row at turn {turn}");
        previous_zero = zero;
        assert!(board.is_plain_ground(actor.position()));
        visited.insert(actor.position());
    }
    // Every cell of the corridor around the block.
    assert_eq!(visited.len(), 14);
}
