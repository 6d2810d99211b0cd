pub mod analytics;
pub mod click;
pub mod config;
pub mod debug;
pub mod difficulty;
pub mod ecs;
pub mod entity;
pub mod heatmap;
pub mod pattern;
pub mod powerup;
pub mod score;
pub mod session;
pub mod spawner;
pub mod steering;
pub mod util;
