pub mod rand;
pub mod vector;
