pub mod ring;
pub mod timer;
