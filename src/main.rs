// SPDX-License-Identifier: MIT
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hexview::buffer::shared;
use hexview::inspect::hex_dump;
use hexview::{BufferWindow, ByteBuffer, Config, Endianness, StringScanner, StructCodec, ValueSet};

const DUMP_WIDTH: usize = 16;

#[derive(Parser)]
#[command(name = "hexview", about = "Inspect and decode binary files")]
struct Cli {
    /// File to open
    file: PathBuf,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show every integer interpretation of the bytes at an offset
    Inspect {
        #[arg(long, value_parser = parse_offset, default_value = "0")]
        offset: usize,

        #[arg(long)]
        little_endian: bool,
    },
    /// List printable ASCII runs
    Strings {
        #[arg(long)]
        min_length: Option<usize>,
    },
    /// Decode a record with a struct format string
    Struct {
        #[arg(long)]
        format: String,

        /// Comma-separated field names
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        #[arg(long, value_parser = parse_offset, default_value = "0")]
        offset: usize,
    },
    /// Hex dump a range
    Dump {
        #[arg(long, value_parser = parse_offset, default_value = "0")]
        offset: usize,

        #[arg(long, value_parser = parse_offset)]
        length: Option<usize>,
    },
}

/// Decimal or `0x`-prefixed hex
fn parse_offset(s: &str) -> Result<usize, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid offset '{}': {}", s, e))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = Config::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    let buffer = ByteBuffer::open_with_config(&cli.file, config.buffer)
        .with_context(|| format!("failed to open {}", cli.file.display()))?;
    info!(path = %cli.file.display(), len = buffer.len(), "file loaded");

    match cli.command {
        Command::Inspect {
            offset,
            little_endian,
        } => {
            let end = buffer.len().min(offset.saturating_add(8));
            let bytes = buffer.read_range(offset, end)?;
            let endian = if little_endian {
                Endianness::Little
            } else {
                Endianness::Big
            };
            for (label, value) in ValueSet::decode(bytes, endian).rows() {
                println!("{:>4}  {}", label, value);
            }
        }
        Command::Strings { min_length } => {
            let mut scan = config.scan;
            if let Some(min_length) = min_length {
                scan.min_length = min_length;
            }
            let mut scanner = StringScanner::new(scan);
            scanner.submit_buffer(&buffer)?;
            if let Some(result) = scanner.next_result().await {
                for (offset, text) in result.texts() {
                    println!("{:08x}  {}", offset, text);
                }
            }
        }
        Command::Struct {
            format,
            fields,
            offset,
        } => {
            let names = if fields.is_empty() { None } else { Some(fields) };
            let codec = StructCodec::compile(&format, names)?;
            let window = BufferWindow::from_offset(shared(buffer), offset)?;
            let record = codec.attach(window)?;

            let json = if codec.field_names().is_some() {
                serde_json::to_string_pretty(&record.to_named_fields()?)?
            } else {
                serde_json::to_string_pretty(&record.to_positional()?)?
            };
            println!("{}", json);
        }
        Command::Dump { offset, length } => {
            let end = match length {
                Some(length) => offset.saturating_add(length),
                None => buffer.len(),
            };
            let bytes = buffer.read_range(offset, end)?;
            print!("{}", hex_dump(bytes, offset, DUMP_WIDTH));
        }
    }

    Ok(())
}
