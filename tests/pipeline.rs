mod common;

use std::fs;

use book2anki::{
    anki::DeckFormat,
    core::pipeline::{
        CardOrder,
        DeckShaping,
        Stage,
    },
    dictionary::frequency_loader::FrequencyDictionaryLoader,
    Book2AnkiError,
    Deck,
    Frequency,
    Pipeline,
};
use common::Fixture;

fn card_names(deck: &Deck) -> Vec<&str> {
    deck.cards.iter().map(|c| c.base_form.as_str()).collect()
}

#[test]
fn test_cats_and_dogs_walk_once() {
    let fixture = Fixture::new();
    let input = fixture.write_input("story.txt", "猫が歩く。犬が歩く。");
    let mut config = fixture.config(vec![input], fixture.path("deck.txt"));
    config.shaping = DeckShaping { order: CardOrder::Source, ..DeckShaping::default() };

    let mut pipeline = Pipeline::new(config);
    let summary = pipeline.run().unwrap();
    assert_eq!(pipeline.stage(), Stage::Done);

    assert_eq!(card_names(&summary.deck), vec!["猫", "歩く", "犬"]);
    assert!(summary.deck.cards.iter().all(|c| c.base_form != "。"));
    assert_eq!(summary.sentences, 2);
    assert_eq!(summary.tokens, 4);

    // First occurrence provides the context
    let walk = &summary.deck.cards[1];
    assert_eq!(walk.context, "猫が歩く。");
    assert_eq!(walk.sentence_count, 2);
}

#[test]
fn test_frequency_annotation_from_table() {
    let fixture = Fixture::new();
    let input = fixture.write_input("story.txt", "犬が歩いた。猫と鳥。");
    let config = fixture.config(vec![input], fixture.path("deck.txt"));

    let summary = Pipeline::new(config).run().unwrap();
    let table = FrequencyDictionaryLoader::new(&fixture.frequency_dict);
    let table = table.load().unwrap();

    for card in &summary.deck.cards {
        match table.rank(&card.base_form) {
            Some(rank) => assert_eq!(card.frequency, Frequency::Ranked(rank)),
            None => assert_eq!(card.frequency, Frequency::Unranked),
        }
    }

    // Frequency order: ranked ascending, then unranked in source order
    assert_eq!(card_names(&summary.deck), vec!["歩く", "猫", "犬", "鳥"]);
    let walk = &summary.deck.cards[0];
    assert_eq!(walk.readings, vec!["あるく"]);
    assert_eq!(walk.surface_form, "歩い");
    let dog = &summary.deck.cards[2];
    assert_eq!(dog.frequency, Frequency::Unranked);
    assert_eq!(dog.readings, vec!["いぬ"]);
}

#[test]
fn test_runs_are_byte_identical() {
    let fixture = Fixture::new();
    let input = fixture.write_input("story.txt", "猫が歩く。\n犬と鳥が歩いた。\n猫が静かだ。");

    let first = fixture.path("first.txt");
    let second = fixture.path("second.txt");
    Pipeline::new(fixture.config(vec![input.clone()], first.clone())).run().unwrap();
    Pipeline::new(fixture.config(vec![input], second.clone())).run().unwrap();

    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}

#[test]
fn test_dedup_across_files_and_srt() {
    let fixture = Fixture::new();
    let text = fixture.write_input("a.txt", "猫が歩く。");
    let srt = fixture.write_input(
        "b.srt",
        "1\n00:00:01,000 --> 00:00:02,000\n猫と犬。\n\n2\n00:00:03,000 --> 00:00:04,000\n犬が歩いた。\n",
    );
    let mut config = fixture.config(vec![text, srt], fixture.path("deck.json"));
    config.format = DeckFormat::Json;
    config.shaping.order = CardOrder::Source;

    let summary = Pipeline::new(config).run().unwrap();
    assert_eq!(card_names(&summary.deck), vec!["猫", "歩く", "犬"]);

    let written: Deck = serde_json::from_slice(&fs::read(fixture.path("deck.json")).unwrap()).unwrap();
    assert_eq!(written, summary.deck);
    assert_eq!(written.cards[2].context, "猫と犬。");
}

#[test]
fn test_min_rank_drops_common_words() {
    let fixture = Fixture::new();
    let input = fixture.write_input("story.txt", "猫が歩く。犬が歩く。");
    let mut config = fixture.config(vec![input], fixture.path("deck.txt"));
    config.shaping.min_rank = Some(1000);

    let summary = Pipeline::new(config).run().unwrap();
    assert_eq!(card_names(&summary.deck), vec!["猫", "犬"]);
}

#[test]
fn test_min_sentences_keeps_repeated_words() {
    let fixture = Fixture::new();
    let input = fixture.write_input("story.txt", "猫が歩く。犬が歩く。猫と犬。");
    let mut config = fixture.config(vec![input], fixture.path("deck.txt"));
    config.shaping.min_sentences = 2;
    config.shaping.order = CardOrder::Source;

    let summary = Pipeline::new(config).run().unwrap();
    assert_eq!(card_names(&summary.deck), vec!["猫", "歩く", "犬"]);

    let mut config = fixture.config(
        vec![fixture.write_input("short.txt", "猫が歩く。犬が歩く。")],
        fixture.path("short.txt.deck"),
    );
    config.shaping.min_sentences = 2;
    let summary = Pipeline::new(config).run().unwrap();
    assert_eq!(card_names(&summary.deck), vec!["歩く"]);
}

#[test]
fn test_missing_dictionary_writes_nothing() {
    let fixture = Fixture::new();
    let input = fixture.write_input("story.txt", "猫が歩く。");
    let output = fixture.path("deck.txt");
    let mut config = fixture.config(vec![input], output.clone());
    config.frequency_dict = fixture.path("missing.zip");

    let mut pipeline = Pipeline::new(config);
    let err = pipeline.run().unwrap_err();
    assert!(matches!(err, Book2AnkiError::Data { .. }));
    assert_eq!(pipeline.stage(), Stage::Failed);
    assert!(!output.exists());
}

#[test]
fn test_missing_input_aborts_run() {
    let fixture = Fixture::new();
    let good = fixture.write_input("a.txt", "猫が歩く。");
    let output = fixture.path("deck.txt");
    let config = fixture.config(vec![good, fixture.path("missing.txt")], output.clone());

    let err = Pipeline::new(config).run().unwrap_err();
    assert!(matches!(err, Book2AnkiError::Input { .. }));
    assert!(!output.exists());
}

#[test]
fn test_unwritable_output_leaves_no_file() {
    let fixture = Fixture::new();
    let input = fixture.write_input("story.txt", "猫が歩く。");
    let output = fixture.path("missing_dir").join("deck.txt");

    let mut pipeline = Pipeline::new(fixture.config(vec![input], output.clone()));
    let err = pipeline.run().unwrap_err();
    assert!(matches!(err, Book2AnkiError::Io { .. }));
    assert_eq!(pipeline.stage(), Stage::Failed);
    assert!(!output.exists());
}
