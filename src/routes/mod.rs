pub mod health;
pub mod stats;
pub mod students;
