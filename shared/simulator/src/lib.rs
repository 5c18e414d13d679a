pub mod actor;
pub mod bullet;
pub mod collision;
pub mod color;
pub mod config;
pub mod debug;
pub mod error;
pub mod index_set;
pub mod rng;
pub mod scenario;
pub mod simulation;
pub mod snapshot;
pub mod turret;
