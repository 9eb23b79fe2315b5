pub mod actor;
pub mod ai;
pub mod components;
pub mod events;
pub mod grid;
pub mod plugins;
pub mod resources;
pub mod tracing_bridge;

use bevy::prelude::*;

use plugins::board::BoardPlugin;
use plugins::enemies::EnemyPlugin;
use plugins::telemetry::TelemetryPlugin;
use resources::{PursuitConfig, TurnStats};

pub struct PursuitPlugin;

impl Plugin for PursuitPlugin {
    fn build(&self, app: &mut App) {
        // Kept if the caller inserted one already.
        app.init_resource::<PursuitConfig>();
        app.init_resource::<TurnStats>();

        app.add_plugins(BoardPlugin);
        app.add_plugins(EnemyPlugin);
        app.add_plugins(TelemetryPlugin);
    }
}
