use std::env;
use std::io::{self, Read};

use abicodec::codec::ItemPool;
use abicodec::config::{self, OutputFormat};
use abicodec::modules::toolkit::{self, decode::resolve_target, ToolResult};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "abicodec",
    version,
    about = "abicodec: Ethereum contract ABI encoding and decoding"
)]
struct Args {
    /// Output format (overrides the config file)
    #[arg(long, value_enum, global = true)]
    output: Option<Format>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Words,
    Hex,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Words => OutputFormat::Words,
            Format::Hex => OutputFormat::Hex,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode arguments (e.g. `encode "store(uint256)" 42`)
    Encode {
        /// Function signature, or with --params a type list like "(uint64,string)"
        signature: Option<String>,

        /// Argument values, one per parameter
        args: Vec<String>,

        /// Encode bare parameters without a selector
        #[arg(long)]
        params: bool,

        /// Encode an item given as JSON ("-" reads stdin)
        #[arg(long, conflicts_with_all = ["signature", "params"])]
        json: Option<String>,
    },

    /// Decode hex data (e.g. `decode "(uint256,string[])" 0x..`)
    Decode {
        /// Solidity type, function signature, or Contract.function
        target: String,

        /// Hex-encoded input ("-" reads stdin)
        data: String,

        /// Skip a leading 4-byte selector
        #[arg(long)]
        calldata: bool,
    },

    /// Show the schema derived from a type or function
    Schema {
        /// Solidity type, function signature, or Contract.function
        target: String,
    },
}

fn main() -> Result<()> {
    let filter = env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = config::load();
    let format = args.output.map(OutputFormat::from).unwrap_or(config.output);
    debug!(?format, pool_capacity = config.pool_capacity, "loaded config");

    let result = run(args.command, &config, format)?;
    println!("{}", result.render(format));
    Ok(())
}

fn run(command: Command, config: &config::Config, format: OutputFormat) -> Result<ToolResult> {
    match command {
        Command::Encode {
            json: Some(json), ..
        } => toolkit::encode::encode_json(&read_arg(json)?, format),
        Command::Encode {
            signature,
            args,
            params,
            json: None,
        } => {
            let signature = signature.context("missing function signature or --json")?;
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            if params {
                toolkit::encode::encode_params(&signature, &args, format)
            } else {
                toolkit::encode::encode_call(&signature, &args, format)
            }
        }
        Command::Decode {
            target,
            data,
            calldata,
        } => {
            let target = resolve_target(&target, &config.abi_roots())?;
            let pool = ItemPool::with_capacity(config.pool_capacity);
            toolkit::decode::decode(&target, &read_arg(data)?, calldata, &pool)
        }
        Command::Schema { target } => toolkit::schema::describe(&target, &config.abi_roots()),
    }
}

/// Use the argument as-is, or read stdin when it is "-"
fn read_arg(value: String) -> Result<String> {
    if value != "-" {
        return Ok(value);
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("read stdin")?;
    Ok(buf)
}
