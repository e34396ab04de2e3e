pub mod orchestrator;
pub mod server;
pub mod simulation;
