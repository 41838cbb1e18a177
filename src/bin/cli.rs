//! flatsql - CLI Client

use std::env;
use std::io;

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use flatsql::{Config, Session};

/// Print welcome banner
fn print_banner() {
    println!("=== flatsql ===");
    println!("Type help; or quit;");
}

/// Build the configuration from `--config` and `--data-dir`
fn parse_args() -> anyhow::Result<Config> {
    let args: Vec<String> = env::args().collect();
    let mut config = Config::new();
    let mut data_dir = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                let path = args.get(i + 1).context("--config needs a file")?;
                config = Config::load(path)
                    .with_context(|| format!("loading config from {}", path))?;
                i += 1;
            }
            "--data-dir" | "-d" => {
                data_dir = Some(args.get(i + 1).context("--data-dir needs a directory")?);
                i += 1;
            }
            other => anyhow::bail!("unknown argument {}", other),
        }
        i += 1;
    }

    // The flag wins over the config file
    if let Some(dir) = data_dir {
        config = config.data_dir(dir);
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = parse_args()?;
    let mut session = Session::new(config).context("opening data directory")?;
    let mut editor = DefaultEditor::new().context("starting line editor")?;

    print_banner();

    // Ctrl-C and Ctrl-D both end the session
    let lines = std::iter::from_fn(|| match editor.readline(">> ") {
        Ok(line) => {
            if !line.trim().is_empty() {
                let _ = editor.add_history_entry(line.as_str());
            }
            Some(Ok(line))
        }
        Err(ReadlineError::Eof | ReadlineError::Interrupted) => None,
        Err(e) => Some(Err(io::Error::new(io::ErrorKind::Other, e))),
    });
    session.run(lines, io::stdout())?;

    Ok(())
}
