use std::{
    path::PathBuf,
    process::ExitCode,
};

use book2anki::{
    anki::DeckFormat,
    core::pipeline::{
        summary_table,
        CardOrder,
        DeckShaping,
    },
    dictionary::{
        frequency_loader::get_frequency_dict_dir,
        token_dictionary::DictType,
    },
    persistence::{
        default_settings_path,
        Settings,
    },
    segmentation::pos::{
        PartOfSpeech,
        PosFilter,
    },
    Book2AnkiError,
    Pipeline,
    PipelineConfig,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "book2anki", version)]
#[command(about = "Convert Japanese text and subtitle files into Anki cards", long_about = None)]
struct Cli {
    /// Text (.txt, .srt) files or folders containing them
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Deck file to write (.json for a JSON deck, anything else for Anki text import)
    #[arg(short, long)]
    output: PathBuf,

    /// Yomitan frequency dictionary (.zip, extracted folder, or flattened .json)
    #[arg(short, long, env = "BOOK2ANKI_FREQUENCY_DICT")]
    frequency_dict: Option<PathBuf>,

    /// Compiled vibrato dictionary (system.dic or system.dic.zst)
    #[arg(short = 'd', long, env = "BOOK2ANKI_SYSTEM_DIC")]
    system_dic: Option<PathBuf>,

    /// Feature layout of the analyzer dictionary
    #[arg(long)]
    dict_type: Option<DictType>,

    /// Parts of speech that produce cards (repeatable or comma separated)
    #[arg(short, long = "pos", value_delimiter = ',')]
    pos: Vec<PartOfSpeech>,

    /// Skip ranked words more common than this rank
    #[arg(long)]
    min_rank: Option<u32>,

    /// Skip ranked words rarer than this rank
    #[arg(long)]
    max_rank: Option<u32>,

    /// Skip words found in fewer sentences than this
    #[arg(short = 's', long)]
    min_sentences: Option<u32>,

    /// Card order: source or frequency
    #[arg(long)]
    order: Option<CardOrder>,

    /// Reverse the final card order
    #[arg(long, overrides_with = "no_reverse")]
    reverse: bool,

    /// Keep the card order even if the settings file asks for reverse
    #[arg(long, overrides_with = "reverse")]
    no_reverse: bool,

    #[arg(long)]
    deck_name: Option<String>,

    /// Deck format: anki or json (default: from the output extension)
    #[arg(long)]
    format: Option<DeckFormat>,

    /// Settings file (default: settings.json in the data directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Resolves an on/off flag pair, `None` when neither was given.
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn build_config(cli: Cli) -> Result<PipelineConfig, Book2AnkiError> {
    let settings_path = cli.config.clone().unwrap_or_else(default_settings_path);
    let settings = Settings::load(&settings_path)?;

    let dict_type = cli.dict_type.or(settings.dict_type).unwrap_or_default();
    let pos_filter = if cli.pos.is_empty() {
        settings.pos_filter.unwrap_or_default()
    } else {
        PosFilter::new(cli.pos)
    };
    let shaping = DeckShaping {
        min_rank: cli.min_rank.or(settings.min_rank),
        max_rank: cli.max_rank.or(settings.max_rank),
        min_sentences: cli.min_sentences.or(settings.min_sentences).unwrap_or(1),
        order: cli.order.or(settings.order).unwrap_or_default(),
        reverse: flag_pair(cli.reverse, cli.no_reverse).or(settings.reverse).unwrap_or(false),
    };

    let deck_name = cli
        .deck_name
        .or(settings.deck_name)
        .or_else(|| cli.output.file_stem().map(|stem| stem.to_string_lossy().to_string()))
        .unwrap_or_else(|| "book2anki".to_string());
    let format = cli.format.unwrap_or_else(|| DeckFormat::from_path(&cli.output));

    Ok(PipelineConfig {
        inputs: cli.inputs,
        frequency_dict: cli
            .frequency_dict
            .or(settings.frequency_dict)
            .unwrap_or_else(get_frequency_dict_dir),
        system_dic: cli.system_dic.or(settings.system_dic).unwrap_or_else(|| dict_type.default_path()),
        output: cli.output,
        dict_type,
        pos_filter,
        deck_name,
        format,
        shaping,
    })
}

fn run(cli: Cli) -> Result<(), Book2AnkiError> {
    let config = build_config(cli)?;
    let summary = Pipeline::new(config).run()?;

    print!("{}", summary_table(&summary.deck));
    println!("Sentences: {}, word tokens: {}", summary.sentences, summary.tokens);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.exit_code();
            let report = anyhow::Error::new(e).context("book2anki failed");
            eprintln!("Error: {:#}", report);
            ExitCode::from(code)
        }
    }
}
