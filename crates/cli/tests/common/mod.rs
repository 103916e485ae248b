// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use assert_cmd::Command;
use sel_daemon::protocol::{self, Request, Response, DEFAULT_TIMEOUT};
use tempfile::TempDir;

/// A stand-in daemon that records requests and answers from a script
pub struct FakeDaemon {
    dir: TempDir,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl FakeDaemon {
    pub fn start(respond: impl Fn(&Request) -> Response + Send + 'static) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let socket = dir.path().join("seld.sock");
        let listener =
            std::os::unix::net::UnixListener::bind(&socket).expect("Failed to bind socket");
        listener
            .set_nonblocking(true)
            .expect("Failed to set nonblocking");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build runtime");
            runtime.block_on(async move {
                let listener = tokio::net::UnixListener::from_std(listener)
                    .expect("Failed to adopt listener");
                while let Ok((stream, _)) = listener.accept().await {
                    let (mut reader, mut writer) = stream.into_split();
                    let Ok(request) = protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await
                    else {
                        continue;
                    };
                    let response = respond(&request);
                    seen.lock().expect("poisoned").push(request);
                    let _ = protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await;
                }
            });
        });

        Self { dir, requests }
    }

    pub fn socket(&self) -> PathBuf {
        self.dir.path().join("seld.sock")
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// `selctl` pointed at this daemon
    pub fn selctl(&self) -> Command {
        let mut cmd = Command::cargo_bin("selctl").expect("selctl binary");
        cmd.env_remove("SEL_SOCKET_PATH")
            .env_remove("SEL_STATE_DIR")
            .arg("--socket")
            .arg(self.socket());
        cmd
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().expect("poisoned").clone()
    }
}
