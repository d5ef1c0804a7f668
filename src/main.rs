use std::env;
use std::io::{self, BufRead};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use shalias::{ConfigError, Session, Settings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn print_help() {
    println!("shalias v{} - shell alias expansion", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("  shalias                  Read lines from stdin and expand them");
    println!("  shalias --config         Show the settings file path");
    println!("  shalias --settings       Show the effective settings");
    println!("  shalias --version        Show the version");
    println!("  shalias --help           Show this help");
    println!();
    println!("BUILTINS (one per input line):");
    println!("  alias                    List all aliases");
    println!("  alias <name>             Show one alias");
    println!("  alias <name>=<value>     Define an alias");
    println!("  alias <name> <value>     Define an alias");
    println!("  unalias <name>...        Remove aliases");
    println!("  complete [prefix]        List alias names starting with prefix");
    println!();
    println!("Any other line is printed with its aliases expanded.");
    println!("Prefix a word with '\\' to keep it from being expanded.");
    println!();
    println!("EXAMPLES:");
    println!("  printf 'alias ll=ls -la\\nll /tmp\\n' | shalias");
    println!("  RUST_LOG=debug shalias < script.sh");
}

fn load_settings() -> Result<Settings> {
    match Settings::default_path() {
        Ok(path) => Settings::load(&path).context("Failed to load settings"),
        Err(ConfigError::MissingHome(_)) => Ok(Settings::default()),
        Err(e) => Err(e.into()),
    }
}

fn run_stdin() -> Result<ExitCode> {
    let mut session = Session::new(load_settings()?);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let mut failed = false;
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        if !session.run_line(&line, &mut out, &mut err)? {
            failed = true;
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    let Some(option) = args.get(1) else {
        return run_stdin();
    };
    if args.len() > 2 {
        bail!("{} does not accept options", option);
    }

    match option.as_str() {
        "--help" | "-h" => print_help(),
        "--version" | "-V" => println!("shalias v{}", env!("CARGO_PKG_VERSION")),
        "--config" => println!("{}", Settings::default_path()?.display()),
        "--settings" => {
            let settings = load_settings()?;
            let json = serde_json::to_string_pretty(&settings)
                .context("Failed to serialize settings")?;
            println!("{}", json);
        }
        other => bail!("Unknown option: {}", other),
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only expanded lines.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
