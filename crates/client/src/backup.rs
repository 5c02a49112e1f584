//! Backup create and restore.
//!
//! Both operations are started with a POST and then report progress through
//! a status endpoint. With `with_wait_for_completion(true)` the call polls
//! that endpoint until the backup reaches `SUCCESS` or `FAILED`.

use crate::error::{ClientError, Result};
use crate::transport::{Method, Transport};
use crate::wait::{wait_for_completion, CancelSignal, Terminal};
use nearql_core::config::{BACKUPS_PATH, BACKUP_TERMINAL_STATUSES};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BackupStatus {
    Started,
    Transferring,
    Transferred,
    Success,
    Failed,
}

impl BackupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BackupStatus::Started => "STARTED",
            BackupStatus::Transferring => "TRANSFERRING",
            BackupStatus::Transferred => "TRANSFERRED",
            BackupStatus::Success => "SUCCESS",
            BackupStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(self) -> bool {
        BACKUP_TERMINAL_STATUSES.contains(&self.as_str())
    }
}

/// Body of every backup create/restore/status response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackupResponse {
    pub id: String,
    #[serde(default)]
    pub backend: String,
    #[serde(default)]
    pub path: Option<String>,
    pub status: BackupStatus,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
}

impl Terminal for BackupResponse {
    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Entry point for backup operations, bound to one REST transport.
#[derive(Clone)]
pub struct Backup {
    transport: Arc<dyn Transport>,
    poll_interval: Duration,
}

impl Backup {
    pub fn new(transport: Arc<dyn Transport>, poll_interval: Duration) -> Self {
        Self {
            transport,
            poll_interval,
        }
    }

    pub fn creator(&self) -> BackupCreator {
        BackupCreator {
            op: BackupOp::new(self),
        }
    }

    pub fn restorer(&self) -> BackupRestorer {
        BackupRestorer {
            op: BackupOp::new(self),
        }
    }
}

/// State shared by create and restore.
struct BackupOp {
    transport: Arc<dyn Transport>,
    poll_interval: Duration,
    backend: String,
    backup_id: String,
    include: Vec<String>,
    exclude: Vec<String>,
    wait: bool,
    cancel: Option<CancelSignal>,
}

impl BackupOp {
    fn new(backup: &Backup) -> Self {
        Self {
            transport: backup.transport.clone(),
            poll_interval: backup.poll_interval,
            backend: String::new(),
            backup_id: String::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            wait: false,
            cancel: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.backend.is_empty() {
            return Err(ClientError::InvalidConfig("backup backend is required".into()));
        }
        if self.backup_id.is_empty() {
            return Err(ClientError::InvalidConfig("backup id is required".into()));
        }
        Ok(())
    }

    fn base_path(&self) -> String {
        format!("{}/{}", BACKUPS_PATH, self.backend)
    }

    fn backup_path(&self) -> String {
        format!("{}/{}", self.base_path(), self.backup_id)
    }

    async fn start(&self, path: &str, body: serde_json::Value) -> Result<BackupResponse> {
        let resp = self
            .transport
            .send_request(path, Method::Post, &[], Some(serde_json::to_vec(&body)?))
            .await?;
        let started: BackupResponse = resp.json(&[200])?;
        tracing::info!(
            "Backup '{}' on '{}' is {}",
            started.id,
            self.backend,
            started.status.as_str()
        );
        Ok(started)
    }

    async fn finish(&self, started: BackupResponse, status_path: &str) -> Result<BackupResponse> {
        if !self.wait || started.is_terminal() {
            return Ok(started);
        }
        let transport = self.transport.as_ref();
        wait_for_completion(
            || fetch_status(transport, status_path),
            self.poll_interval,
            self.cancel.clone(),
        )
        .await
    }
}

async fn fetch_status(transport: &dyn Transport, path: &str) -> Result<BackupResponse> {
    transport
        .send_request(path, Method::Get, &[], None)
        .await?
        .json(&[200])
}

macro_rules! backup_setters {
    () => {
        pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
            self.op.backend = backend.into();
            self
        }

        pub fn with_backup_id(mut self, id: impl Into<String>) -> Self {
            self.op.backup_id = id.into();
            self
        }

        pub fn with_include_classes<I, S>(mut self, classes: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.op.include = classes.into_iter().map(Into::into).collect();
            self
        }

        pub fn with_exclude_classes<I, S>(mut self, classes: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.op.exclude = classes.into_iter().map(Into::into).collect();
            self
        }

        /// Poll the status endpoint until the operation is terminal.
        pub fn with_wait_for_completion(mut self, wait: bool) -> Self {
            self.op.wait = wait;
            self
        }

        pub fn with_poll_interval(mut self, interval: Duration) -> Self {
            self.op.poll_interval = interval;
            self
        }

        pub fn with_cancel_signal(mut self, signal: CancelSignal) -> Self {
            self.op.cancel = Some(signal);
            self
        }
    };
}

pub struct BackupCreator {
    op: BackupOp,
}

impl BackupCreator {
    backup_setters!();

    /// `POST /backups/{backend}`, then optionally wait.
    pub async fn run(self) -> Result<BackupResponse> {
        self.op.validate()?;
        let body = json!({
            "id": self.op.backup_id,
            "include": self.op.include,
            "exclude": self.op.exclude,
        });
        let started = self.op.start(&self.op.base_path(), body).await?;
        self.op.finish(started, &self.op.backup_path()).await
    }

    /// `GET /backups/{backend}/{id}`
    pub async fn status(&self) -> Result<BackupResponse> {
        self.op.validate()?;
        fetch_status(self.op.transport.as_ref(), &self.op.backup_path()).await
    }
}

pub struct BackupRestorer {
    op: BackupOp,
}

impl BackupRestorer {
    backup_setters!();

    fn restore_path(&self) -> String {
        format!("{}/restore", self.op.backup_path())
    }

    /// `POST /backups/{backend}/{id}/restore`, then optionally wait.
    pub async fn run(self) -> Result<BackupResponse> {
        self.op.validate()?;
        let body = json!({
            "include": self.op.include,
            "exclude": self.op.exclude,
        });
        let path = self.restore_path();
        let started = self.op.start(&path, body).await?;
        self.op.finish(started, &path).await
    }

    /// `GET /backups/{backend}/{id}/restore`
    pub async fn status(&self) -> Result<BackupResponse> {
        self.op.validate()?;
        fetch_status(self.op.transport.as_ref(), &self.restore_path()).await
    }
}
