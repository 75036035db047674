use clap::{Parser, Subcommand};
use kakikomi::config::load_settings;
use kakikomi::recording::{RecordingLedger, RewriteContext, rewrite, write_source};
use kakikomi::text::extract_literal;
use kakikomi::verify::{CallSite, InlineSnapshotVerifier, Lines, VerifyOptions};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Record inline snapshots into test source files
#[derive(Parser)]
#[command(name = "kakikomi")]
#[command(version)]
#[command(about = "Record inline snapshots into test source files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a payload as the literal of the call at LINE
    Rewrite {
        /// Source file containing the call
        file: PathBuf,

        /// 1-based line of the call
        #[arg(long)]
        line: usize,

        /// File holding the payload (default: stdin)
        #[arg(long)]
        payload: Option<PathBuf>,
    },
    /// Compare a payload with the literal at LINE, recording it when requested
    Verify {
        /// Source file containing the call
        file: PathBuf,

        /// 1-based line of the call
        #[arg(long)]
        line: usize,

        /// Name used in messages and attachment file names
        #[arg(long, default_value = "snapshot")]
        test_name: String,

        /// Rewrite the literal on mismatch instead of failing
        #[arg(long)]
        record: bool,

        /// File holding the payload (default: stdin)
        #[arg(long)]
        payload: Option<PathBuf>,
    },
}

fn read_payload(payload: Option<&Path>) -> std::io::Result<String> {
    match payload {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn exit_with_error(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Rewrite {
            file,
            line,
            payload,
        } => {
            let payload = read_payload(payload.as_deref()).unwrap_or_else(|e| exit_with_error(e));
            let source = std::fs::read_to_string(&file).unwrap_or_else(|e| exit_with_error(e));

            let mut ledger = RecordingLedger::new();
            let context = RewriteContext::new(source, payload.trim(), file.clone(), line);
            let rewritten = rewrite(&mut ledger, &context).unwrap_or_else(|e| exit_with_error(e));

            match ledger.recordings(&file).last() {
                Some(recording) => {
                    write_source(&file, &rewritten.source_code)
                        .unwrap_or_else(|e| exit_with_error(e));
                    eprintln!(
                        "Rewrote {}:{} ({:+} lines)",
                        file.display(),
                        line,
                        recording.difference
                    );
                }
                None => {
                    eprintln!(
                        "No closing delimiter after {}:{}; file left unchanged",
                        file.display(),
                        line
                    );
                }
            }
        }
        Commands::Verify {
            file,
            line,
            test_name,
            record,
            payload,
        } => {
            let outcome = load_settings(std::env::current_dir().ok().as_deref());
            outcome.log_events();
            let settings = outcome.settings;

            let payload = read_payload(payload.as_deref()).unwrap_or_else(|e| exit_with_error(e));
            let source = std::fs::read_to_string(&file).unwrap_or_else(|e| exit_with_error(e));
            let reference = extract_literal(&source, line).unwrap_or_default();

            let options = VerifyOptions {
                record: record || settings.record,
                ..VerifyOptions::from(&settings)
            };
            let site = CallSite::new(file, test_name, line);
            let mut verifier = InlineSnapshotVerifier::from_settings(&settings);

            let result = verifier
                .verify_async(
                    || Ok::<_, std::convert::Infallible>(payload),
                    &Lines,
                    options,
                    &site,
                    &reference,
                )
                .await;

            match result {
                None => eprintln!("Snapshot matches"),
                Some(message) => {
                    println!("{}", message);
                    std::process::exit(1);
                }
            }
        }
    }
}
