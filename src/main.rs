//! readaloud command-line front end
//!
//! A thin terminal consumer of the library: reads text from a file or
//! stdin, speaks it and prints each word as its highlight event arrives.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use crossbeam_channel::RecvTimeoutError;
use log::{error, info};
use readaloud::io::{export_text_file, read_text_file};
use readaloud::text::{clean_text, preprocess_text, tokenize_sentences};
use readaloud::{HighlightEvent, HighlightMode, ReadAloudError, SettingsStore, SpeechController};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "readaloud", version, about = "Read text aloud with word highlighting")]
struct Cli {
    /// Write debug logs to readaloud.log
    #[arg(short, long, global = true)]
    debug: bool,

    /// Settings file (defaults to the per-user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a text file aloud ("-" or nothing for stdin)
    Read {
        file: Option<PathBuf>,

        #[command(flatten)]
        voice: VoiceArgs,
    },

    /// Speak the given words
    Say {
        #[arg(required = true)]
        text: Vec<String>,

        #[command(flatten)]
        voice: VoiceArgs,
    },

    /// Print a file after cleanup
    Clean {
        file: PathBuf,

        /// Only collapse whitespace and drop URLs
        #[arg(long)]
        light: bool,
    },

    /// Print a file one sentence per line
    Sentences { file: PathBuf },

    /// Clean a file and write the result to another file
    Export {
        input: PathBuf,
        output: PathBuf,

        /// Export the text unchanged (only trimmed)
        #[arg(long)]
        raw: bool,
    },

    /// List the voices of the speech engine
    Voices,

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(clap::Args, Debug)]
struct VoiceArgs {
    /// Speaking rate in words per minute
    #[arg(short, long)]
    rate: Option<u32>,

    /// Volume from 0.0 to 1.0
    #[arg(short, long)]
    volume: Option<f32>,

    /// Voice id (see `readaloud voices`)
    #[arg(long)]
    voice: Option<String>,

    /// Clean each line before speaking
    #[arg(long)]
    clean: bool,

    /// Highlight whole lines instead of words
    #[arg(long)]
    line: bool,
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Print all settings
    Show,
    /// Print one setting
    Get { key: String },
    /// Change one setting (VALUE is parsed as JSON, else taken as a string)
    Set { key: String, value: String },
    /// Restore the defaults
    Reset,
    /// Print the settings file location
    Path,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Debug mode logs everything to readaloud.log; otherwise only errors go to stderr
fn init_logging(debug_mode: bool) {
    if debug_mode {
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("readaloud.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open readaloud.log for debug logging: {}", e);
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "readaloud version {} starting (debug mode, logging to readaloud.log)",
            readaloud::VERSION
        );
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let store = match cli.settings {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::default_location(),
    };

    match cli.command {
        Command::Read { file, voice } => {
            let text = match file {
                Some(path) if path != Path::new("-") => read_text_file(&path)?,
                _ => {
                    let mut text = String::new();
                    io::stdin()
                        .read_to_string(&mut text)
                        .context("Failed to read stdin")?;
                    text
                }
            };
            read_aloud(&store, &text, &voice)
        }
        Command::Say { text, voice } => read_aloud(&store, &text.join(" "), &voice),
        Command::Clean { file, light } => {
            let text = read_text_file(&file)?;
            let cleaned = if light {
                clean_text(&text)
            } else {
                preprocess_text(&text)
            };
            println!("{}", cleaned);
            Ok(())
        }
        Command::Sentences { file } => {
            let text = read_text_file(&file)?;
            for sentence in tokenize_sentences(&text) {
                println!("{}", sentence);
            }
            Ok(())
        }
        Command::Export { input, output, raw } => {
            let text = read_text_file(&input)?;
            let content = if raw { text } else { preprocess_text(&text) };
            match export_text_file(&output, &content) {
                Ok(()) => {
                    println!("File saved successfully to: {}", output.display());
                    Ok(())
                }
                Err(ReadAloudError::NothingToExport) => {
                    eprintln!("Warning: No text to export.");
                    Ok(())
                }
                Err(e) => Err(e).context("Failed to export file"),
            }
        }
        Command::Voices => {
            let controller = SpeechController::new();
            if !controller.has_engine() {
                bail!("No speech engine available");
            }
            for voice in controller.voices() {
                match voice.language {
                    Some(lang) => println!("{}\t{}\t{}", voice.id, voice.name, lang),
                    None => println!("{}\t{}", voice.id, voice.name),
                }
            }
            Ok(())
        }
        Command::Settings { action } => settings_command(&store, action),
    }
}

fn settings_command(store: &SettingsStore, action: SettingsAction) -> anyhow::Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = store.load();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Get { key } => match store.get(&key) {
            Some(value) => println!("{}", value),
            None => bail!("Unknown setting: {}", key),
        },
        SettingsAction::Set { key, value } => {
            let value = serde_json::from_str(&value)
                .unwrap_or_else(|_| serde_json::Value::String(value));
            store.update(&key, value)?;
            println!("Settings saved to {}", store.path().display());
        }
        SettingsAction::Reset => {
            store.reset();
            println!("Settings reset to defaults");
        }
        SettingsAction::Path => println!("{}", store.path().display()),
    }
    Ok(())
}

/// Clean each line on its own so line structure survives for highlighting
fn clean_lines(text: &str) -> String {
    text.lines()
        .map(preprocess_text)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn read_aloud(store: &SettingsStore, text: &str, args: &VoiceArgs) -> anyhow::Result<()> {
    let text = if args.clean {
        clean_lines(text)
    } else {
        text.to_string()
    };

    if text.trim().is_empty() {
        eprintln!("Warning: Nothing to read.");
        return Ok(());
    }

    let settings = store.load();
    let controller = SpeechController::new();
    if !controller.has_engine() {
        bail!("No speech engine available");
    }

    let mode = if args.line {
        HighlightMode::Line
    } else {
        settings.highlight_mode
    };
    controller.set_highlight_mode(mode);

    if let Some(rate) = args.rate {
        controller.set_rate(rate);
    }
    if let Some(volume) = args.volume {
        controller.set_volume(volume);
    }
    if let Some(voice) = &args.voice {
        controller.set_voice(voice);
    }

    let events = controller.highlight_events();
    controller.speak(&text);

    let lines: Vec<&str> = text.split('\n').collect();
    let mut printer = HighlightPrinter::new(mode, &lines);

    loop {
        match events.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => printer.show(&event)?,
            Err(RecvTimeoutError::Timeout) if controller.is_busy() => {}
            Err(_) => break,
        }
    }
    for event in events.try_iter() {
        printer.show(&event)?;
    }
    printer.finish()?;

    Ok(())
}

/// Prints highlight events to the terminal as they arrive
///
/// Word mode redraws the current line with the spoken word in reverse
/// video; line mode prints each line as it is reached.
struct HighlightPrinter<'a> {
    mode: HighlightMode,
    lines: &'a [&'a str],
    current_line: Option<usize>,
    line_words: Vec<String>,
    out: io::Stdout,
}

impl<'a> HighlightPrinter<'a> {
    fn new(mode: HighlightMode, lines: &'a [&'a str]) -> Self {
        Self {
            mode,
            lines,
            current_line: None,
            line_words: Vec::new(),
            out: io::stdout(),
        }
    }

    fn show(&mut self, event: &HighlightEvent) -> io::Result<()> {
        let mut out = self.out.lock();

        match self.mode {
            HighlightMode::Word => {
                if self.current_line.is_some_and(|line| line != event.line_index) {
                    writeln!(out)?;
                    self.line_words.clear();
                }

                write!(out, "\r\x1b[2K")?;
                for word in &self.line_words {
                    write!(out, "{} ", word)?;
                }
                write!(out, "\x1b[7m{}\x1b[0m", event.word)?;
                self.line_words.push(event.word.clone());
            }
            HighlightMode::Line => {
                let line = self.lines.get(event.line_index).copied().unwrap_or("");
                writeln!(out, "\x1b[7m{}\x1b[0m", line.trim_end())?;
            }
        }

        self.current_line = Some(event.line_index);
        out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.mode == HighlightMode::Word && self.current_line.is_some() {
            writeln!(self.out.lock())?;
        }
        Ok(())
    }
}
