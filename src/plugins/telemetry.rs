//! Turn-level telemetry: publishes the last turn's move counters.

use bevy::prelude::*;
use micromegas_tracing::prelude::{imetric, span_scope};

use crate::resources::TurnStats;

pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TurnStats>();
        app.add_systems(Last, turn_telemetry);
    }
}

fn turn_telemetry(stats: Res<TurnStats>) {
    if !stats.is_changed() {
        return;
    }
    span_scope!("turn_telemetry");
    imetric!("enemy_turn", "count", stats.turn);
    imetric!("enemy_moves_planned", "count", stats.planned);
    imetric!("enemy_moves_committed", "count", stats.moved);
    imetric!("enemy_moves_rejected", "count", stats.rejected);
}
