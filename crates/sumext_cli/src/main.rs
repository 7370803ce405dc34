//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `sumext_core` linkage without a Python interpreter.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `sumext_cli [A B]`

use log::info;
use std::process::ExitCode;
use sumext_core::LoggingConfig;

const USAGE_EXIT_CODE: u8 = 2;

fn main() -> ExitCode {
    let logging = LoggingConfig::from_env().and_then(|config| match config {
        Some(config) => config.apply(),
        None => Ok(()),
    });
    if let Err(err) = logging {
        eprintln!("warning: logging disabled: {err}");
    }

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let (a, b) = match parse_operands(&args) {
        Ok(operands) => operands,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("usage: sumext_cli [A B]");
            return ExitCode::from(USAGE_EXIT_CODE);
        }
    };

    let total = sumext_core::sum(a, b);
    info!("event=cli_sum module=cli status=ok");
    println!("sumext_core version={}", sumext_core::core_version());
    println!("sum({a}, {b})={total}");
    ExitCode::SUCCESS
}

fn parse_operands(args: &[String]) -> Result<(i64, i64), String> {
    match args {
        [] => Ok((2, 3)),
        [a, b] => Ok((parse_operand(a)?, parse_operand(b)?)),
        other => Err(format!("expected 0 or 2 operands, got {}", other.len())),
    }
}

fn parse_operand(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|err| format!("`{raw}` is not a 64-bit integer: {err}"))
}
