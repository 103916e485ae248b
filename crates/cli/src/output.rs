// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use chrono::{DateTime, SecondsFormat, Utc};
use clap::ValueEnum;
use sel_core::hex_encode;
use sel_storage::{LogEntry, StoreInfo};
use serde::Serialize;

use crate::client::{DaemonStatus, Published};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print `value` as JSON, or through `text` for the text format
pub fn print<T: Serialize>(value: &T, format: OutputFormat, text: impl FnOnce(&T)) {
    match format {
        OutputFormat::Text => text(value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

pub fn print_entries(entries: &[LogEntry], format: OutputFormat) {
    print(&entries, format, |entries| {
        if entries.is_empty() {
            println!("No records");
            return;
        }
        println!(
            "{:<6} {:<26} {:<5} {:<28} {:<5} {:<6} SENSOR",
            "ID", "TIMESTAMP", "TYPE", "DATA", "GEN", "DIR"
        );
        for entry in entries.iter() {
            let direction = match entry.assert {
                Some(true) => "assert",
                Some(false) => "deasrt",
                None => "-",
            };
            println!(
                "{:<6} {:<26} {:<5} {:<28} {:<5} {:<6} {}",
                entry.id.0,
                format_time(Some(entry.timestamp)),
                format!("{:02x}", entry.record_type),
                hex_encode(&entry.data),
                entry
                    .generator_id
                    .map_or_else(|| "-".to_string(), |g| format!("{g:x}")),
                direction,
                entry.sensor_path.as_deref().unwrap_or("-")
            );
        }
    });
}

pub fn print_info(info: &StoreInfo, format: OutputFormat) {
    print(info, format, |info| {
        println!("Entries:    {}", info.entries);
        println!("Last add:   {}", format_time(info.last_add));
        println!("Last erase: {}", format_time(info.last_erase));
    });
}

pub fn print_status(status: &DaemonStatus, format: OutputFormat) {
    print(status, format, |status| {
        println!("Status: running");
        println!("Uptime: {}s", status.uptime_secs);
        println!("Sink: {}", status.sink);
        println!("Monitors: {}", status.monitors.join(", "));
        println!("Asserted: {}", status.asserted);
    });
}

pub fn print_published(published: &Published, format: OutputFormat) {
    print(published, format, |published| {
        println!("Delivered to {} subscription(s)", published.delivered);
        for id in &published.records {
            println!("Stored record {}", id);
        }
    });
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(
        || "-".to_string(),
        |t| t.to_rfc3339_opts(SecondsFormat::Micros, true),
    )
}
