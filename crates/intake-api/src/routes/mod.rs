pub mod health;
pub mod workflow;
