pub mod assignments;
pub mod distribution;
pub mod health;
