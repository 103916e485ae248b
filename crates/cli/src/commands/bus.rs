// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus commands: publish a signal, populate the object registry

use anyhow::{Context, Result};
use sel_adapters::IpmiResponse;
use sel_core::{PropertyMap, Signal};

use super::{parse_u8, read_json_arg, HexData};

#[derive(clap::Args)]
pub struct PublishArgs {
    /// Signal as JSON, `@file`, or `@-` for stdin
    ///
    /// e.g. {"sender":":1.3","path":"/xyz/...","interface":"...","member":"...",
    /// "args":[{"type":"str","value":"CPU0"}]}
    pub signal: String,
}

impl PublishArgs {
    pub fn signal(&self) -> Result<Signal> {
        let json = read_json_arg(&self.signal)?;
        serde_json::from_str(&json).context("invalid signal JSON")
    }
}

#[derive(clap::Args)]
pub struct SetPropertiesArgs {
    /// Object path
    pub path: String,

    /// Interface the properties belong to
    pub interface: String,

    /// Properties as a JSON object of typed values, `@file`, or `@-`
    ///
    /// e.g. {"MaxValue":{"type":"double","value":255.0}}
    pub properties: String,
}

impl SetPropertiesArgs {
    pub fn properties(&self) -> Result<PropertyMap> {
        let json = read_json_arg(&self.properties)?;
        serde_json::from_str(&json).context("invalid properties JSON")
    }
}

#[derive(clap::Args)]
pub struct SetIpmiResponseArgs {
    #[arg(long, value_parser = parse_u8)]
    pub netfn: u8,

    #[arg(long, value_parser = parse_u8)]
    pub cmd: u8,

    #[arg(long, value_parser = parse_u8, default_value = "0")]
    pub lun: u8,

    /// Completion code
    #[arg(long, value_parser = parse_u8, default_value = "0")]
    pub cc: u8,

    /// Response data as hex
    #[arg(long)]
    pub data: Option<HexData>,
}

impl SetIpmiResponseArgs {
    pub fn response(self) -> IpmiResponse {
        IpmiResponse {
            netfn: self.netfn,
            lun: self.lun,
            cmd: self.cmd,
            cc: self.cc,
            data: self.data.unwrap_or_default().0,
        }
    }
}
