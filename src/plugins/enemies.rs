//! Enemy turn: plan every actor against the same board, validate, commit.
//!
//! Planning happens in the `TurnAdvanced` observer and leaves a
//! `PendingMove` on each actor. `apply_pending_moves` commits them on the
//! next `Update`, so every plan of a turn sees the pre-turn positions.

use bevy::prelude::*;
use micromegas_tracing::prelude::{debug, span_fn, span_scope, warn};

use crate::actor::Actor;
use crate::components::PendingMove;
use crate::events::{EnemyMoveRejected, EnemyMoveScheduled, TurnAdvanced};
use crate::grid::GridProvider;
use crate::plugins::board::Board;
use crate::resources::TurnStats;

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TurnStats>();
        app.add_observer(plan_enemy_turn);
        app.add_systems(Update, apply_pending_moves);
    }
}

/// Plan and validate one move per actor.
#[span_fn]
fn plan_enemy_turn(
    _trigger: On<TurnAdvanced>,
    board: Option<Res<Board>>,
    actors: Query<(Entity, &Actor)>,
    mut stats: ResMut<TurnStats>,
    mut commands: Commands,
) {
    let _span = tracing::info_span!("enemy_turn").entered();
    let Some(board) = board else {
        warn!("turn advanced before a board was installed");
        return;
    };

    stats.turn += 1;
    stats.planned = 0;
    stats.moved = 0;
    stats.rejected = 0;

    for (entity, actor) in &actors {
        let from = actor.position();
        let planned = actor.plan(&*board);
        stats.planned += 1;

        let mv = if board.accepts(from, planned.displacement) {
            debug!("{} at {} plans {}", actor.identity_tag(), from, planned.displacement);
            commands.trigger(EnemyMoveScheduled {
                enemy: entity,
                from,
                displacement: planned.displacement,
            });
            planned
        } else {
            warn!(
                "{} at {} attempted illegal move {}",
                actor.identity_tag(),
                from,
                planned.displacement
            );
            stats.rejected += 1;
            commands.trigger(EnemyMoveRejected {
                enemy: entity,
                at: from,
                attempted: planned.displacement,
            });
            planned.rejected()
        };
        commands.entity(entity).insert(PendingMove(mv));
    }
}

/// Commit the moves planned this turn.
#[span_fn]
fn apply_pending_moves(
    mut commands: Commands,
    mut actors: Query<(Entity, &mut Actor, &PendingMove)>,
    mut stats: ResMut<TurnStats>,
) {
    for (entity, mut actor, pending) in &mut actors {
        actor.apply_move(&pending.0);
        if !pending.0.displacement.is_zero() {
            stats.moved += 1;
        }
        commands.entity(entity).remove::<PendingMove>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MovementStrategy;
    use crate::components::{Direction, Displacement, GridPosition};

    #[derive(Resource, Default)]
    struct Rejections(Vec<EnemyMoveRejected>);

    fn setup_app(board: &str) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(EnemyPlugin);
        app.insert_resource(Board::parse(board).unwrap());
        app.init_resource::<Rejections>();
        app.add_observer(|trigger: On<EnemyMoveRejected>, mut seen: ResMut<Rejections>| {
            seen.0.push(*trigger.event());
        });
        app
    }

    fn advance(app: &mut App) {
        app.world_mut().trigger(TurnAdvanced);
        app.update();
    }

    #[test]
    fn plans_then_commits_on_update() {
        let mut app = setup_app("#####\n#   #\n#  P#\n#####");
        let enemy = app
            .world_mut()
            .spawn(Actor::new(GridPosition::new(1, 1), MovementStrategy::DirectChase))
            .id();

        app.world_mut().trigger(TurnAdvanced);
        app.world_mut().flush();
        let pending = app.world().get::<PendingMove>(enemy).unwrap();
        assert_eq!(pending.0.displacement, Displacement::new(0, 1));
        // Not committed yet.
        assert_eq!(
            app.world().get::<Actor>(enemy).unwrap().position(),
            GridPosition::new(1, 1)
        );

        app.update();
        assert_eq!(
            app.world().get::<Actor>(enemy).unwrap().position(),
            GridPosition::new(1, 2)
        );
        assert!(app.world().get::<PendingMove>(enemy).is_none());
        assert_eq!(app.world().resource::<TurnStats>().moved, 1);
    }

    #[test]
    fn blocked_reversal_is_rejected_but_turns_around() {
        // Patrol walled in left and right: the bounce is refused, the new
        // heading is kept.
        let mut app = setup_app("#####\n##.##\n#P  #\n#####");
        let enemy = app
            .world_mut()
            .spawn(Actor::new(GridPosition::new(2, 1), MovementStrategy::patrol(Direction::Left)))
            .id();

        advance(&mut app);

        let actor = app.world().get::<Actor>(enemy).unwrap();
        assert_eq!(actor.position(), GridPosition::new(2, 1));
        assert_eq!(actor.strategy().facing(), Some(Direction::Right));
        let seen = &app.world().resource::<Rejections>().0;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].attempted, Displacement::new(1, 0));
        assert_eq!(app.world().resource::<TurnStats>().rejected, 1);
    }

    #[test]
    fn all_actors_plan_against_pre_turn_positions() {
        let mut app = setup_app("######\n#    #\n#    #\n#   P#\n######");
        let a = app
            .world_mut()
            .spawn(Actor::new(GridPosition::new(1, 1), MovementStrategy::DirectChase))
            .id();
        let b = app
            .world_mut()
            .spawn(Actor::new(GridPosition::new(1, 1), MovementStrategy::DirectChase))
            .id();

        advance(&mut app);

        let pa = app.world().get::<Actor>(a).unwrap().position();
        let pb = app.world().get::<Actor>(b).unwrap().position();
        assert_eq!(pa, pb);
        assert_eq!(pa, GridPosition::new(1, 2));
        assert_eq!(app.world().resource::<TurnStats>().planned, 2);
    }

    #[test]
    fn no_board_no_moves() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(EnemyPlugin);
        let enemy = app
            .world_mut()
            .spawn(Actor::new(GridPosition::new(1, 1), MovementStrategy::DirectChase))
            .id();
        advance(&mut app);
        assert_eq!(
            app.world().get::<Actor>(enemy).unwrap().position(),
            GridPosition::new(1, 1)
        );
        assert_eq!(app.world().resource::<TurnStats>().turn, 0);
    }
}
