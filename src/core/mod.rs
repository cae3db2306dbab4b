pub mod dedup;
pub mod errors;
pub mod models;
pub mod pipeline;

pub use errors::Book2AnkiError;
pub use models::{
    Card,
    Deck,
    Frequency,
    InputType,
    Sentence,
    SourceFile,
    Token,
};
