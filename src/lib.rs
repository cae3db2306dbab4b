pub mod anki;
pub mod core;
pub mod dictionary;
pub mod parser;
pub mod persistence;
pub mod segmentation;

pub use crate::core::{
    pipeline::{
        Pipeline,
        PipelineConfig,
    },
    Book2AnkiError,
    Card,
    Deck,
    Frequency,
};
