pub mod board;
pub mod enemies;
pub mod telemetry;
