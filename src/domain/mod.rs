pub mod card;
pub mod role;
