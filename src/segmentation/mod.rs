pub mod pos;

pub mod token_models;

pub mod tokenizer;
