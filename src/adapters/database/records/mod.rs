pub mod card;

pub use card::CardRecord;
