// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record commands: add, add-oem, delete

use super::{parse_u16, parse_u8, HexData};

#[derive(clap::Args)]
pub struct AddArgs {
    /// Journal message for the record
    pub message: String,

    /// Object path of the sensor the record is raised against
    #[arg(long)]
    pub sensor_path: String,

    /// Event data as hex, at most 3 bytes (e.g. 01ffff)
    #[arg(long)]
    pub data: Option<HexData>,

    /// Record a deassertion instead of an assertion
    #[arg(long)]
    pub deassert: bool,

    /// Generator id (hex with 0x prefix, or decimal)
    #[arg(long, value_parser = parse_u16, default_value = "0x20")]
    pub generator_id: u16,
}

#[derive(clap::Args)]
pub struct AddOemArgs {
    /// Journal message for the record
    pub message: String,

    /// OEM data as hex, at most 13 bytes
    #[arg(long)]
    pub data: Option<HexData>,

    /// OEM record type
    #[arg(long, value_parser = parse_u8, default_value = "0xe0")]
    pub record_type: u8,
}

#[derive(clap::Args)]
pub struct DeleteArgs {
    /// Record id to delete
    #[arg(value_parser = parse_u16)]
    pub id: u16,
}
