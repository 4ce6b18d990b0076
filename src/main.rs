use std::io::{BufRead, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use zcalc::calculator::{Calculator, KEYPAD, Key, copy_display, scan_keys};
use zcalc::config::{Config, default_config_path};

/// A keypad calculator for the terminal.
///
/// Keys are given as keypad labels (`7 + 3 =`, `2√9=`, `5x²=`) or ASCII
/// aliases (`*`, `/`, `^2`, `sqrt`, `~` for +/-, `<` for backspace, `c` for AC).
#[derive(Parser, Debug)]
#[command(name = "zcalc", version, about)]
struct Cli {
    /// Keys to press. Reads lines of keys from stdin when omitted.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    keys: Vec<String>,

    /// Print the display after every key press.
    #[arg(long)]
    steps: bool,

    /// Copy the final display to the clipboard.
    #[arg(long)]
    copy: bool,

    /// Print the keypad layout and exit.
    #[arg(long)]
    keypad: bool,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,

    /// Path to the config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.keypad {
        print_keypad();
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    if cli.print_config {
        print!("{}", config.to_toml().context("Failed to render config")?);
        return Ok(());
    }

    let mut calculator = config.calculator();

    if cli.keys.is_empty() {
        run_interactive(&mut calculator, cli.steps)?;
    } else {
        let keys = scan_keys(&cli.keys.join(" ")).context("Invalid key input")?;
        press_keys(&mut calculator, &keys, cli.steps);
        println!("{}", calculator.display());
    }

    if cli.copy {
        copy_display(&calculator).context("Failed to copy result")?;
        info!(display = calculator.display(), "Copied display to clipboard");
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    match default_config_path() {
        Some(path) => load_default_config(&path),
        None => Ok(Config::default()),
    }
}

/// Load the config at the default location; a missing file means defaults.
fn load_default_config(path: &Path) -> Result<Config> {
    Config::load_or_default(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

fn press_keys(calculator: &mut Calculator, keys: &[Key], steps: bool) {
    for &key in keys {
        let display = calculator.press(key);
        if steps {
            println!("{:>4} -> {}", key.label(), display);
        }
    }
}

/// Read lines of keys from stdin, printing the display after each line.
fn run_interactive(calculator: &mut Calculator, steps: bool) -> Result<()> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        println!("{}", calculator.display());
    }

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let trimmed = line.trim();
        if matches!(trimmed, "quit" | "exit") {
            break;
        }

        match scan_keys(trimmed) {
            Ok(keys) => {
                press_keys(calculator, &keys, steps);
                println!("{}", calculator.display());
            }
            Err(err) => eprintln!("{err}"),
        }
    }

    Ok(())
}

fn print_keypad() {
    for row in KEYPAD {
        let line: String = row.iter().map(|key| format!("[{:^5}]", key.label())).collect();
        println!("{line}");
    }
}
