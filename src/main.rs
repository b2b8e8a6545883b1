//! CLI tool to tokenize and parse one `who` source file.

use std::fs;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;
use who_frontend::{diagnostic, dump_ast, dump_tokens, parse_with, tokenize_with};

/// Run the `who` front end over a single translation unit.
#[derive(Debug, Parser)]
#[command(name = "who", version, about, long_about = None)]
struct Cli {
    /// Source file to process
    path: String,

    /// Print the token stream to stdout
    #[arg(long)]
    dump_tokens: bool,

    /// Print the syntax tree to stdout
    #[arg(long)]
    dump_ast: bool,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let source = match fs::read_to_string(&cli.path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read file '{}': {e}", cli.path);
            return ExitCode::FAILURE;
        }
    };

    let sink = diagnostic::global();

    let Ok(tokens) = tokenize_with(&cli.path, &source, sink) else {
        return ExitCode::FAILURE;
    };
    if cli.dump_tokens {
        print!("{}", dump_tokens(&tokens));
    }

    let Ok(root) = parse_with(&tokens, sink) else {
        return ExitCode::FAILURE;
    };
    if cli.dump_ast {
        print!("{}", dump_ast(&root));
    }

    sink.drain();
    let declarations = root
        .as_translation_unit()
        .map_or(0, |unit| unit.children.len());
    eprintln!(
        "{}: ok ({} token(s), {declarations} declaration(s))",
        cli.path,
        tokens.len()
    );
    ExitCode::SUCCESS
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "who_frontend=warn",
        1 => "who_frontend=debug",
        _ => "who_frontend=trace",
    }
}
