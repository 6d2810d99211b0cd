pub mod behavior;
pub mod lifetime;
pub mod movement;
