//! stepper: command-line front end for the Stepper rotor cipher.
//!
//! Reads plain text from a `.txt` file or stdin and writes the result to a
//! `.txt` file or stdout.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use stepper::normalize::{normalize_key, unsupported_characters, PunctuationMode};
use stepper::{Stepper, StepperConfig};

/// Stepper: polyalphabetic rotor cipher for plain text
#[derive(Parser, Debug)]
#[command(name = "stepper", version)]
#[command(about = "Encrypt and decrypt plain text with the Stepper rotor cipher")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// JSON file with a custom rotor geometry
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt text; a short key is padded with random letters
    Encrypt {
        #[command(flatten)]
        files: IoArgs,

        /// Punctuation handling: keep, no-spaces or alnum
        #[arg(short, long, default_value_t = PunctuationMode::Keep)]
        mode: PunctuationMode,
    },
    /// Decrypt text produced by `encrypt`
    Decrypt {
        #[command(flatten)]
        files: IoArgs,
    },
}

#[derive(clap::Args, Debug)]
struct IoArgs {
    /// Input .txt file (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output .txt file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Cipher key
    #[arg(short, long, env = "STEPPER_KEY", hide_env_values = true)]
    key: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => StepperConfig::default(),
    };

    match args.command {
        Command::Encrypt { files, mode } => {
            let text = read_input(files.input.as_deref())?;

            let raw_key = Zeroizing::new(files.key.unwrap_or_default());
            let key = normalize_key(&raw_key, &config, &mut rand::thread_rng());
            if key.padded_by() > 0 {
                eprintln!("Key padded with {} random letters", key.padded_by());
            }
            let stepper = Stepper::with_config(config, key.as_str())?;
            let output = stepper.encrypt_str(&text, mode)?;
            warn_unsupported(&output, "ciphertext");

            write_output(files.output.as_deref(), &output)?;
            eprintln!("Key: {}", key.as_str());
        }
        Command::Decrypt { files } => {
            let text = read_input(files.input.as_deref())?;

            let Some(raw_key) = files.key.map(Zeroizing::new) else {
                bail!("decryption needs the key printed at encryption time");
            };
            let key = normalize_key(&raw_key, &config, &mut rand::thread_rng());
            if key.padded_by() > 0 {
                bail!(
                    "key has {} letters, decryption needs {}",
                    config.key_length() - key.padded_by(),
                    config.key_length()
                );
            }
            let stepper = Stepper::with_config(config, key.as_str())?;
            let output = stepper.decrypt_str(&text)?;
            warn_unsupported(&output, "plaintext");

            write_output(files.output.as_deref(), &output)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn load_config(path: &Path) -> Result<StepperConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            if !has_txt_extension(path) {
                bail!("input file {} must have a .txt extension", path.display());
            }
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            let path = with_txt_extension(path);
            fs::write(&path, text).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("writing stdout")?;
            stdout.flush().context("writing stdout")
        }
    }
}

fn has_txt_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "txt")
}

fn with_txt_extension(path: &Path) -> PathBuf {
    if has_txt_extension(path) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".txt");
        PathBuf::from(name)
    }
}

/// Warns about every unsupported character of the produced `text` and
/// returns the reported positions.
fn warn_unsupported(text: &str, kind: &'static str) -> Vec<(usize, char)> {
    let found = unsupported_characters(text);
    for &(position, ch) in &found {
        tracing::warn!(
            position,
            codepoint = ch as u32,
            "unsupported character in the {}",
            kind
        );
    }
    found
}
