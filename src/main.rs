use bevy::prelude::*;
use bevy::tasks::{ComputeTaskPool, TaskPoolBuilder};
use micromegas_telemetry_sink::TelemetryGuardBuilder;
use micromegas_telemetry_sink::tracing_interop::TracingCaptureLayer;
use micromegas_tracing::dispatch::init_thread_stream;
use micromegas_tracing::levels::LevelFilter;
use micromegas_tracing::prelude::{error, info, warn};
use pursuit::actor::Actor;
use pursuit::events::TurnAdvanced;
use pursuit::plugins::board::Board;
use pursuit::resources::PursuitConfig;
use pursuit::tracing_bridge::MicromegasBridgeLayer;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

const DEFAULT_CONFIG: &str = "assets/config.json";

fn main() {
    // 1. Telemetry first. Spans need MICROMEGAS_ENABLE_CPU_TRACING=true;
    //    logs and metrics work regardless.
    let _telemetry_guard = TelemetryGuardBuilder::default()
        .with_install_tracing_capture(false)
        .build()
        .expect("failed to initialize telemetry");

    // 2. Route `tracing` spans (bevy schedules, enemy turns) into Micromegas.
    let log_layer = TracingCaptureLayer {
        max_level: LevelFilter::Info,
    };
    let subscriber = Registry::default()
        .with(MicromegasBridgeLayer)
        .with(log_layer);
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    // 3. Pool threads must register their Micromegas streams; set up before
    //    App::new() so TaskPoolPlugin reuses it.
    ComputeTaskPool::get_or_init(|| {
        TaskPoolBuilder::new()
            .on_thread_spawn(|| {
                init_thread_stream();
            })
            .on_thread_destroy(|| {
                micromegas_tracing::dispatch::flush_thread_buffer();
                micromegas_tracing::dispatch::unregister_thread_stream();
            })
            .build()
    });

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = match PursuitConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{e}; using default config");
            PursuitConfig::default()
        }
    };
    info!(
        "pursuit starting: level {}, {} turns",
        config.level_file, config.turns
    );
    let turns = config.turns;

    // 4. Headless app, stepped by hand one turn per update.
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(config);
    app.add_plugins(pursuit::PursuitPlugin);
    app.finish();
    app.cleanup();
    // Startup loads the level.
    app.update();

    if !app.world().contains_resource::<Board>() {
        error!("no level installed, nothing to simulate");
        return;
    }

    for turn in 1..=turns {
        app.world_mut().trigger(TurnAdvanced);
        app.update();

        let world = app.world_mut();
        let mut actors = world.query::<&Actor>();
        for actor in actors.iter(world) {
            info!("turn {turn}: {actor}");
        }
    }
}
