// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command arguments and their conversion into requests

pub mod bus;
pub mod record;

use std::str::FromStr;

use anyhow::{Context, Result};
use sel_core::EncodeError;

/// Parse a `0x`-prefixed hex or decimal integer
fn parse_int(s: &str) -> Result<u64> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).with_context(|| format!("invalid hex: {s}")),
        None => s
            .parse::<u64>()
            .with_context(|| format!("invalid number: {s}")),
    }
}

pub fn parse_u8(s: &str) -> Result<u8> {
    u8::try_from(parse_int(s)?).with_context(|| format!("{s} does not fit in a byte"))
}

pub fn parse_u16(s: &str) -> Result<u16> {
    u16::try_from(parse_int(s)?).with_context(|| format!("{s} does not fit in 16 bits"))
}

/// Bytes given on the command line as a hex string, e.g. `01ffff`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexData(pub Vec<u8>);

impl FromStr for HexData {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        sel_core::hex_decode(s).map(HexData)
    }
}

/// Read a JSON argument, or a file when prefixed with `@` (`@-` for stdin)
fn read_json_arg(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some("-") => std::io::read_to_string(std::io::stdin()).context("reading stdin"),
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}")),
        None => Ok(arg.to_string()),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
