use std::{fmt::Debug, process::ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use sui_bcs::{
    ByteReader, DecoderConfig, Deserializable, DeserializationError, Deserializer, TrailingBytes,
    U256,
    sui::{Argument, CallArg, Command, ObjectArg, ProgrammableTransaction, SuiAddress, TypeTag},
    uleb128,
};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logging filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "sui-bcs", version, about = "Inspect BCS-encoded Sui values")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Decodes hex-encoded bytes as the given type and prints the result.
    Decode {
        #[arg(value_enum)]
        ty: DecodeType,
        /// Input bytes in hex, with or without a `0x` prefix.
        hex: String,
        /// Warn about bytes left after the value instead of failing.
        #[arg(long)]
        allow_trailing: bool,
    },
    /// Prints the ULEB128 encoding of a number in hex.
    Uleb128 { value: u64 },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DecodeType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Uleb128,
    String,
    Address,
    Argument,
    ObjectArg,
    CallArg,
    TypeTag,
    Command,
    ProgrammableTransaction,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("failed to decode input: {0}")]
    Decode(#[from] DeserializationError),
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        },
        Err(err) => {
            tracing::debug!(?err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        },
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: CliCommand) -> Result<String, CliError> {
    match command {
        CliCommand::Decode { ty, hex, allow_trailing } => {
            let bytes = hex::decode(hex.trim().trim_start_matches("0x"))?;
            let policy = if allow_trailing { TrailingBytes::Warn } else { TrailingBytes::Reject };
            let config = DecoderConfig::default().with_trailing_bytes(policy);
            tracing::debug!(?ty, len = bytes.len(), "decoding input");
            Ok(decode_as(ty, &bytes, &config)?)
        },
        CliCommand::Uleb128 { value } => {
            let mut buf = [0u8; uleb128::MAX_ENCODED_LEN];
            let len = uleb128::encode(value, &mut buf);
            Ok(hex::encode(&buf[..len]))
        },
    }
}

fn decode_as(
    ty: DecodeType,
    bytes: &[u8],
    config: &DecoderConfig,
) -> Result<String, DeserializationError> {
    match ty {
        DecodeType::Bool => render::<bool>(bytes, config),
        DecodeType::U8 => render::<u8>(bytes, config),
        DecodeType::U16 => render::<u16>(bytes, config),
        DecodeType::U32 => render::<u32>(bytes, config),
        DecodeType::U64 => render::<u64>(bytes, config),
        DecodeType::U128 => render::<u128>(bytes, config),
        DecodeType::U256 => render::<U256>(bytes, config),
        DecodeType::Uleb128 => {
            let mut source = Deserializer::new(bytes);
            let value = source.read_uleb128_u64()?;
            config.trailing_bytes.check(source.remaining_bytes())?;
            Ok(value.to_string())
        },
        DecodeType::String => render::<String>(bytes, config),
        DecodeType::Address => render::<SuiAddress>(bytes, config),
        DecodeType::Argument => render::<Argument>(bytes, config),
        DecodeType::ObjectArg => render::<ObjectArg>(bytes, config),
        DecodeType::CallArg => render::<CallArg>(bytes, config),
        DecodeType::TypeTag => render::<TypeTag>(bytes, config),
        DecodeType::Command => render::<Command>(bytes, config),
        DecodeType::ProgrammableTransaction => {
            render::<ProgrammableTransaction>(bytes, config)
        },
    }
}

fn render<T: Deserializable + Debug>(
    bytes: &[u8],
    config: &DecoderConfig,
) -> Result<String, DeserializationError> {
    T::read_from_bytes_with_config(bytes, config).map(|value| format!("{value:#?}"))
}
