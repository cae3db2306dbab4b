pub mod card_builder;
pub mod deck_writer;

pub use card_builder::CardBuilder;
pub use deck_writer::{
    write_deck,
    DeckFormat,
};
