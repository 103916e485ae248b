// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, signal handling, shutdown.

use std::fs::File;
use std::time::Instant;

use fs2::FileExt;
use sel_adapters::{
    JournalSink, LoggingServiceSink, ObjectRegistry, SelSink, TracedBusClient, TracedLogSink,
};
use sel_core::{RecordId, Signal, SignalBus, SignalReceiver, SystemClock};
use sel_daemon::config::{Config, SinkConfig};
use sel_engine::{Monitors, SelRuntime};
use sel_storage::{LogStore, StoreError};
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

/// Record pipeline with concrete adapter types (wrapped with tracing)
pub type DaemonRuntime = SelRuntime<TracedLogSink<SelSink>, SystemClock>;

/// Bus client the monitors query back through
pub type DaemonBus = TracedBusClient<ObjectRegistry>;

/// Daemon state during operation
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub listener: UnixListener,
    pub runtime: DaemonRuntime,
    pub monitors: Monitors,
    /// Objects and IPMI replies the bus client answers from
    pub registry: ObjectRegistry,
    pub bus: DaemonBus,
    /// In-process signal routing to the monitors
    pub signals: SignalBus,
    pub signal_rx: SignalReceiver,
    pub start_time: Instant,
    pub shutdown_requested: bool,
}

impl DaemonState {
    /// Run a signal through the monitors and record their output.
    ///
    /// Returns the ids of stored records.
    pub async fn handle_signal(&mut self, signal: Signal) -> Vec<RecordId> {
        let outputs = self.monitors.dispatch(&signal, &self.bus).await;
        let mut ids = Vec::new();
        for output in outputs {
            match self.runtime.submit(output).await {
                Ok(Some(id)) if id != RecordId::UNASSIGNED => ids.push(id),
                Ok(_) => {}
                Err(e) => warn!(signal = %signal.name(), error = %e, "monitor output not recorded"),
            }
        }
        ids
    }

    /// Handle every signal already queued for the monitors
    pub async fn drain_signals(&mut self) -> Vec<RecordId> {
        let mut ids = Vec::new();
        while let Ok(signal) = self.signal_rx.try_recv() {
            ids.extend(self.handle_signal(signal).await);
        }
        ids
    }

    /// Shutdown the daemon gracefully
    pub fn shutdown(&mut self) {
        info!("Shutting down daemon...");

        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            }
        }

        let lock_path = self.config.lock_path();
        if lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        info!("Daemon shutdown complete");
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(std::path::PathBuf, std::io::Error),

    #[error("Daemon log path has no file name: {0}")]
    BadLogPath(std::path::PathBuf),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config).await {
        Ok(state) => Ok(state),
        Err(e) => {
            // Clean up any resources created before failure; a lock failure
            // means they belong to the running daemon
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Create the socket directory (lock lives next to the socket)
    if let Some(parent) = config.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // 2. Acquire lock file FIRST - prevents races
    let mut lock_file = File::create(config.lock_path())?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    use std::io::Write;
    writeln!(lock_file, "{}", std::process::id())?;

    // 3. Resolve the sink once and open the store it needs
    let sink = match &config.sink {
        SinkConfig::Journal { reload_unit } => {
            SelSink::Journal(JournalSink::new(reload_unit.clone()))
        }
        SinkConfig::LoggingService { url } => {
            SelSink::LoggingService(LoggingServiceSink::new(url.clone()))
        }
    };
    let store = if sink.persists_locally() {
        Some(LogStore::open(config.store_config(), SystemClock)?)
    } else {
        None
    };
    let runtime = SelRuntime::new(TracedLogSink::new(sink), store);

    // 4. Monitors and the signal bus feeding them
    let monitors = Monitors::new(&config.monitors);
    let signals = SignalBus::new();
    let signal_rx = signals.subscribe(monitors.subscription());
    let registry = ObjectRegistry::new();
    let bus = TracedBusClient::new(registry.clone());

    // 5. Remove stale socket and bind (LAST - only after all validation passes)
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    info!(
        monitors = ?monitors.enabled(),
        local_store = runtime.store().is_some(),
        "Daemon started"
    );

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        listener,
        runtime,
        monitors,
        registry,
        bus,
        signals,
        signal_rx,
        start_time: Instant::now(),
        shutdown_requested: false,
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    // Remove socket if we created it
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }

    // Remove PID/lock file
    let lock_path = config.lock_path();
    if lock_path.exists() {
        let _ = std::fs::remove_file(&lock_path);
    }
}
