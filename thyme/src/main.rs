//! Thyme CLI
//!
//! Host-side tooling around the runtime: browse the metadata registry,
//! run its consistency check, and try the random array methods.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use thyme::config::{LogFormat, RuntimeConfig};
use thyme::introspect::{self, CallableInfo, Registry};
use thyme::util::find_similar_name;
use thyme::{Interpreter, Result, ThymeError, TypeTag, Value};

#[derive(Parser)]
#[command(name = "thyme", version, about = "Thyme - template runtime tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Set log output format (overrides the config file)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Describe a builtin (`pick`), a method (`array.take`) or a type (`string`)
    Describe {
        name: String,
        /// Print the metadata record as JSON
        #[arg(long)]
        json: bool,
    },
    /// List builtins grouped by category
    Builtins {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List the methods of a type
    Methods {
        /// Type name, e.g. `array`
        type_name: String,
    },
    /// Check the metadata registry against the executable tables
    Check,
    /// Apply a random array method to a JSON array
    Random {
        #[arg(value_enum)]
        op: RandomOp,
        /// JSON array, e.g. '[1, 2, 3]'
        array: String,
        /// Count for `pick` and `take`
        n: Option<i64>,
        /// Seed overriding the config file
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RandomOp {
    Shuffle,
    Pick,
    Take,
}

impl RandomOp {
    fn method(self) -> &'static str {
        match self {
            RandomOp::Shuffle => "shuffle",
            RandomOp::Pick => "pick",
            RandomOp::Take => "take",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match RuntimeConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    };
    setup_logging(
        cli.verbose,
        &config.log.level,
        cli.log_format.unwrap_or(config.log.format),
    );

    let result = match cli.command {
        Command::Describe { name, json } => describe(&name, json),
        Command::Builtins { category, json } => list_builtins(category.as_deref(), json),
        Command::Methods { type_name } => list_methods(&type_name),
        Command::Check => check_registry(),
        Command::Random {
            op,
            array,
            n,
            seed,
        } => random(&config, op, &array, n, seed),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn setup_logging(verbose: u8, default_level: &str, log_format: LogFormat) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true);

    match log_format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(formatter)
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(formatter.json())
                .with(filter)
                .init();
        }
    }
}

fn checked_registry() -> Result<Registry> {
    Ok(Registry::load()?)
}

fn unknown_name(kind: &str, name: &str, candidates: Vec<&str>) -> ThymeError {
    let hint = find_similar_name(name, candidates)
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default();
    ThymeError::input(format!("unknown {kind} '{name}'{hint}"))
}

fn describe(name: &str, json: bool) -> Result<()> {
    let registry = checked_registry()?;
    if let Some(info) = registry.describe(name) {
        if json {
            println!("{}", serde_json::to_string_pretty(info)?);
        } else {
            println!("{}", info.describe_line());
        }
        return Ok(());
    }

    if let Some(tag) = TypeTag::from_name(name) {
        if json {
            println!("{}", serde_json::to_string_pretty(registry.methods_of(tag))?);
        } else {
            println!("{}", introspect::describe_type(tag));
        }
        return Ok(());
    }

    let mut candidates: Vec<&str> = registry.keys().collect();
    candidates.extend(TypeTag::ALL.iter().map(|tag| tag.name()));
    Err(unknown_name("builtin, method or type", name, candidates))
}

fn list_builtins(category: Option<&str>, json: bool) -> Result<()> {
    let registry = checked_registry()?;
    let categories = registry.categories();
    if let Some(wanted) = category
        && !categories.contains(&wanted)
    {
        return Err(unknown_name("category", wanted, categories));
    }

    let selected: Vec<&CallableInfo> = registry
        .builtins()
        .iter()
        .filter(|info| category.is_none_or(|wanted| info.category == wanted))
        .collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    for cat in categories {
        let mut group = selected.iter().filter(|info| info.category == cat).peekable();
        if group.peek().is_none() {
            continue;
        }
        println!("{cat}:");
        for info in group {
            println!("  {}", info.describe_line());
        }
    }
    Ok(())
}

fn list_methods(type_name: &str) -> Result<()> {
    let registry = checked_registry()?;
    let tag = TypeTag::from_name(type_name).ok_or_else(|| {
        unknown_name("type", type_name, TypeTag::ALL.iter().map(|tag| tag.name()).collect())
    })?;
    for info in registry.methods_of(tag) {
        println!(".{}", info.describe_line());
    }
    Ok(())
}

fn check_registry() -> Result<()> {
    let registry = checked_registry()?;
    println!(
        "✓ {} records, {} builtins, {} types consistent",
        registry.len(),
        registry.builtins().len(),
        TypeTag::ALL.len()
    );
    Ok(())
}

fn random(
    config: &RuntimeConfig,
    op: RandomOp,
    array: &str,
    n: Option<i64>,
    seed: Option<u64>,
) -> Result<()> {
    let json: serde_json::Value = serde_json::from_str(array)?;
    if !json.is_array() {
        return Err(ThymeError::input("expected a JSON array"));
    }
    let receiver = Value::from_json(&json);

    let mut config = config.clone();
    if seed.is_some() {
        config.seed = seed;
    }
    let mut interp = Interpreter::from_config(&config);
    let args: Vec<Value> = n.map(Value::Int).into_iter().collect();
    let result = interp.call_method(&receiver, op.method(), &args)?;
    println!("{}", result.repr());
    Ok(())
}
