use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use file_rotate::{ContentLimit, FileRotate, compression::Compression, suffix::AppendCount};
use serde::Serialize;
use thiserror::Error;

use crate::alert::NotificationPayload;
use crate::config::Config;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write notification log: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait NotificationSink {
    async fn deliver(&mut self, payload: &NotificationPayload) -> Result<(), SinkError>;
}

/// Emits each payload as a structured tracing event.
#[derive(Debug, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    async fn deliver(&mut self, payload: &NotificationPayload) -> Result<(), SinkError> {
        tracing::info!(
            target: "notifications",
            action_group = payload.action_group.as_str(),
            cluster_uuid = payload.cluster_uuid.as_str(),
            cluster_name = payload.cluster_name.as_str(),
            cluster_health = payload.cluster_health.as_str(),
            state = payload.state.as_str(),
            message = payload.internal_short_message.as_str(),
            "alert_notification"
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct NotificationRecord<'a> {
    delivered_at_utc: String,
    #[serde(flatten)]
    payload: &'a NotificationPayload,
}

/// Appends one JSON line per payload, rotating by size.
pub struct JsonlNotificationSink {
    writer: FileRotate<AppendCount>,
}

impl JsonlNotificationSink {
    pub fn open(
        path: impl AsRef<Path>,
        max_file_size_bytes: u64,
        max_files: u16,
    ) -> Result<Self, SinkError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let max_bytes = usize::try_from(max_file_size_bytes).unwrap_or(usize::MAX);
        let writer = FileRotate::new(
            path,
            AppendCount::new(max_files as usize),
            ContentLimit::BytesSurpassed(max_bytes),
            Compression::None,
            None,
        );
        Ok(Self { writer })
    }
}

impl NotificationSink for JsonlNotificationSink {
    async fn deliver(&mut self, payload: &NotificationPayload) -> Result<(), SinkError> {
        let record = NotificationRecord {
            delivered_at_utc: Utc::now().to_rfc3339(),
            payload,
        };
        // one write per record so rotation never splits a line
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Log sink always, rotating file sink when `notification_log.enabled`.
pub struct ConfiguredSinks {
    log: LogNotificationSink,
    file: Option<JsonlNotificationSink>,
}

impl ConfiguredSinks {
    pub fn from_config(config: &Config) -> Result<Self, SinkError> {
        let file = if config.notification_log.enabled {
            Some(JsonlNotificationSink::open(
                &config.notification_log.path,
                config.notification_log.max_file_size_bytes,
                config.notification_log.max_files,
            )?)
        } else {
            None
        };

        Ok(Self {
            log: LogNotificationSink,
            file,
        })
    }
}

impl NotificationSink for ConfiguredSinks {
    async fn deliver(&mut self, payload: &NotificationPayload) -> Result<(), SinkError> {
        self.log.deliver(payload).await?;
        if let Some(file) = self.file.as_mut() {
            file.deliver(payload).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct CollectingSink {
    pub(crate) delivered: Vec<NotificationPayload>,
}

#[cfg(test)]
impl NotificationSink for CollectingSink {
    async fn deliver(&mut self, payload: &NotificationPayload) -> Result<(), SinkError> {
        self.delivered.push(payload.clone());
        Ok(())
    }
}
