pub mod account;
pub mod card;
pub mod deck;
pub mod history;
pub mod search;

pub use account::*;
pub use card::*;
pub use deck::*;
pub use history::*;
pub use search::*;
