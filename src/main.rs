use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::info;

use tokenfix::strip::{DEFAULT_FILES, DEFAULT_TEMPLATE};
use tokenfix::{Encoding, Result, Stripper, Token, Tokenizer};

const DEFAULT_TOKENS: [Token; 5] = [64659, 123310, 75584, 8138, 38271];

fn main() -> ExitCode {
    use Commands::*;
    let cli = Cli::parse();
    init_logger(cli.log.as_deref());
    let result = match cli.command {
        Strip(strip) => strip.invoke(),
        Decode(decode) => decode.invoke(),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser)]
#[clap(name = "tokenfix")]
#[clap(version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
    /// Log level, may be "off", "trace", "debug", "info" or "error".
    #[clap(long, global = true)]
    log: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove the retired template sentence from source files
    Strip(StripArgs),
    /// Decode token ids through a model's encoding scheme
    Decode(DecodeArgs),
}

#[derive(Args)]
struct StripArgs {
    /// Files to scan, in order.
    files: Vec<String>,
    /// Template sentence to remove; a leading comma and optional
    /// whitespace are implied.
    #[clap(long)]
    template: Option<String>,
}

impl StripArgs {
    fn invoke(self) -> Result<()> {
        let template = self.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        let files = if self.files.is_empty() {
            DEFAULT_FILES.iter().map(|f| f.to_string()).collect()
        } else {
            self.files
        };
        let stripper = Stripper::new(template)?;
        let removed = stripper.run(&files);
        info!("template fix complete, {removed} file(s) changed");
        Ok(())
    }
}

#[derive(Args)]
struct DecodeArgs {
    /// Token ids to decode.
    tokens: Vec<Token>,
    /// Model whose encoding scheme resolves the tokens.
    #[clap(short, long, default_value = "gpt-4")]
    model: String,
    /// Directory holding .tiktoken vocabulary files.
    #[clap(long, default_value = "assets")]
    vocab_dir: PathBuf,
}

impl DecodeArgs {
    fn invoke(self) -> Result<()> {
        let tokens = if self.tokens.is_empty() {
            DEFAULT_TOKENS.to_vec()
        } else {
            self.tokens
        };
        let encoding = Encoding::for_model(&self.model, &self.vocab_dir)?;
        let decoded = encoding.decode(&tokens)?;
        println!("Decoded text: {decoded}");
        Ok(())
    }
}

fn init_logger(log: Option<&str>) {
    use log::LevelFilter;
    use simple_logger::SimpleLogger;
    let log = log
        .and_then(|log| match log.to_lowercase().as_str() {
            "off" | "none" => Some(LevelFilter::Off),
            "trace" => Some(LevelFilter::Trace),
            "debug" => Some(LevelFilter::Debug),
            "info" => Some(LevelFilter::Info),
            "error" => Some(LevelFilter::Error),
            _ => None,
        })
        .unwrap_or(LevelFilter::Info);
    SimpleLogger::new().with_level(log).init().unwrap();
}
