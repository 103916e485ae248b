// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! selctl - System Event Log management client

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{bus, record};
use sel_daemon::Config;

use crate::client::DaemonClient;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "selctl", version, about = "System Event Log management client")]
struct Cli {
    /// Daemon config file, used to locate the socket and daemon log
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Daemon socket (overrides config and SEL_SOCKET_PATH)
    #[arg(long, global = true)]
    socket: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a system event record
    Add(record::AddArgs),
    /// Add an OEM record
    AddOem(record::AddOemArgs),
    /// Delete every record
    Clear,
    /// Delete one record
    Delete(record::DeleteArgs),
    /// Show entry count and last add/erase times
    Info,
    /// List stored records, oldest first
    List,
    /// Deliver a bus signal to the event monitors
    Publish(bus::PublishArgs),
    /// Set properties the monitors read back from the bus
    SetProperties(bus::SetPropertiesArgs),
    /// Set the reply to an IPMI command
    SetIpmiResponse(bus::SetIpmiResponseArgs),
    /// Show daemon status
    Status,
    /// Stop the daemon
    Shutdown,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(socket) = cli.socket {
        config.socket_path = socket;
    }
    let client = DaemonClient::connect(&config)?;

    match cli.command {
        Commands::Add(args) => {
            let id = client
                .add(
                    args.message,
                    args.sensor_path,
                    args.data.unwrap_or_default().0,
                    !args.deassert,
                    args.generator_id,
                )
                .await?;
            report_added(id);
        }

        Commands::AddOem(args) => {
            let id = client
                .add_oem(args.message, args.data.unwrap_or_default().0, args.record_type)
                .await?;
            report_added(id);
        }

        Commands::Clear => {
            client.clear().await?;
            println!("Cleared all records");
        }

        Commands::Delete(args) => match client.delete(args.id).await? {
            Some(id) => println!("Deleted record {}", id),
            None => anyhow::bail!("record {} not found", args.id),
        },

        Commands::Info => output::print_info(&client.info().await?, format),

        Commands::List => output::print_entries(&client.entries().await?, format),

        Commands::Publish(args) => {
            let published = client.publish(args.signal()?).await?;
            output::print_published(&published, format);
        }

        Commands::SetProperties(args) => {
            let properties = args.properties()?;
            client
                .set_properties(args.path, args.interface, properties)
                .await?;
            println!("Properties set");
        }

        Commands::SetIpmiResponse(args) => {
            client.set_ipmi_response(args.response()).await?;
            println!("IPMI response set");
        }

        Commands::Status => output::print_status(&client.status().await?, format),

        Commands::Shutdown => {
            client.shutdown().await?;
            println!("Daemon stopping");
        }
    }

    Ok(())
}

fn report_added(id: u16) {
    if id == 0 {
        println!("Record forwarded");
    } else {
        println!("Added record {}", id);
    }
}
