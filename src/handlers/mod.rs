pub mod health;
pub mod schedule;
pub mod skill;
