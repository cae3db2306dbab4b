#![allow(dead_code)]

use std::{
    fs::{
        self,
        File,
    },
    io::Write,
    path::{
        Path,
        PathBuf,
    },
};

use book2anki::{
    anki::DeckFormat,
    core::pipeline::DeckShaping,
    dictionary::token_dictionary::DictType,
    segmentation::pos::{
        PartOfSpeech,
        PosFilter,
    },
    PipelineConfig,
};
use tempfile::TempDir;
use vibrato::SystemDictionaryBuilder;
use zip::write::SimpleFileOptions;

const LEXICON: &str = include_str!("../fixtures/analyzer/lex.csv");
const MATRIX: &str = include_str!("../fixtures/analyzer/matrix.def");
const CHAR_DEF: &str = include_str!("../fixtures/analyzer/char.def");
const UNK_DEF: &str = include_str!("../fixtures/analyzer/unk.def");

pub const INDEX_JSON: &str =
    r#"{"title": "Test Frequency", "revision": "2024-10-13", "format": 3, "frequencyMode": "rank-based"}"#;

// 犬 and 鳥 are deliberately missing
pub const TERM_BANK: &str = r#"[
    ["猫", "freq", {"reading": "ねこ", "frequency": {"value": 1500, "displayValue": "1500"}}],
    ["歩く", "freq", {"reading": "あるく", "frequency": 700}],
    ["静か", "freq", {"reading": "しずか", "frequency": 2400}],
    ["が", "freq", 3]
]"#;

pub struct Fixture {
    pub dir: TempDir,
    pub system_dic: PathBuf,
    pub frequency_dict: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();

        let system_dic = dir.path().join("system.dic");
        let dict = SystemDictionaryBuilder::from_readers(
            LEXICON.as_bytes(),
            MATRIX.as_bytes(),
            CHAR_DEF.as_bytes(),
            UNK_DEF.as_bytes(),
        )
        .unwrap();
        dict.write(File::create(&system_dic).unwrap()).unwrap();

        let frequency_dict = dir.path().join("freq.zip");
        write_zip(
            &frequency_dict,
            &[("index.json", INDEX_JSON), ("term_meta_bank_1.json", TERM_BANK)],
        );

        Fixture { dir, system_dic, frequency_dict }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_input(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn config(&self, inputs: Vec<PathBuf>, output: PathBuf) -> PipelineConfig {
        PipelineConfig {
            inputs,
            output,
            frequency_dict: self.frequency_dict.clone(),
            system_dic: self.system_dic.clone(),
            dict_type: DictType::Ipadic,
            pos_filter: PosFilter::new([PartOfSpeech::Noun, PartOfSpeech::Verb]),
            deck_name: "Test".to_string(),
            format: DeckFormat::Anki,
            shaping: DeckShaping::default(),
        }
    }
}

pub fn write_zip(path: &Path, files: &[(&str, &str)]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, contents) in files {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}
