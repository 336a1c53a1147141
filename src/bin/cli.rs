//! EmberKV CLI
//!
//! Command-line interface for inspecting and editing an EmberKV store file.

use clap::{Parser, Subcommand, ValueEnum};
use emberkv::{Accumulated, Key, Store};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// EmberKV CLI
#[derive(Parser, Debug)]
#[command(name = "emberkv")]
#[command(about = "CLI for EmberKV single-file key-value stores")]
#[command(version)]
struct Args {
    /// Store file (`~` is expanded)
    #[arg(short, long, default_value = "./emberkv.json")]
    file: String,

    /// How to interpret KEY arguments
    #[arg(short = 't', long, value_enum, default_value_t = KeyType::Text)]
    key_type: KeyType,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KeyType {
    Text,
    Int,
    Float,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair (VALUE is parsed as JSON, else stored as a string)
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Remove a key
    Rm {
        /// The key to remove
        key: String,
    },

    /// Append an item to a key's sequence
    Append {
        key: String,
        item: String,
    },

    /// Add a number to a number, or concatenate a string to a string
    Add {
        key: String,
        delta: String,
    },

    /// List all keys
    Keys,

    /// List all values
    Values,

    /// Print the number of keys
    Count,
}

fn parse_key(raw: &str, key_type: KeyType) -> Result<Key, String> {
    match key_type {
        KeyType::Text => Ok(Key::from(raw)),
        KeyType::Int => raw
            .parse::<i64>()
            .map(Key::from)
            .map_err(|e| format!("invalid integer key {:?}: {}", raw, e)),
        KeyType::Float => raw
            .parse::<f64>()
            .map(Key::from)
            .map_err(|e| format!("invalid float key {:?}: {}", raw, e)),
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open_path(&args.file, true)?;
    let key = |raw: &str| parse_key(raw, args.key_type);

    match &args.command {
        Commands::Get { key: raw } => match store.get(key(raw)?)? {
            Some(value) => println!("{}", value),
            None => println!("(not found)"),
        },
        Commands::Set { key: raw, value } => {
            store.set(key(raw)?, parse_value(value))?;
            println!("OK");
        }
        Commands::Rm { key: raw } => match store.remove(key(raw)?)? {
            Some((_, value)) => println!("{}", value),
            None => println!("(not found)"),
        },
        Commands::Append { key: raw, item } => match store.append(key(raw)?, parse_value(item))? {
            Some((_, sequence)) => println!("{}", Value::Array(sequence)),
            None => println!("(not found)"),
        },
        Commands::Add { key: raw, delta } => match store.accumulate(key(raw)?, parse_value(delta))? {
            Accumulated::Updated(value) => println!("{}", value),
            Accumulated::NotFound => println!("(not found)"),
            Accumulated::NotApplicable => println!("(not applicable)"),
        },
        Commands::Keys => {
            for key in store.all_keys() {
                println!("{}", key);
            }
        }
        Commands::Values => {
            for value in store.all_values() {
                println!("{}", value);
            }
        }
        Commands::Count => println!("{}", store.count()),
    }

    store.close()?;
    Ok(())
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,emberkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("EmberKV CLI v{}", emberkv::VERSION);
    tracing::debug!("Store file: {}", args.file);

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
