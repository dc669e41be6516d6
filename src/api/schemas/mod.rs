pub mod cards;
pub mod health;
