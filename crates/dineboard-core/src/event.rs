//! Export progress bus using tokio::broadcast
//!
//! The pipeline publishes milestones; the CLI progress bar subscribes.

use std::path::PathBuf;
use tokio::sync::broadcast;

/// Export milestones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    FetchStarted,
    FetchCompleted,
    Assembled,
    Serialized,
}

impl ExportStage {
    /// Fixed progress percentage reached at this milestone
    pub fn percent(&self) -> u8 {
        match self {
            ExportStage::FetchStarted => 10,
            ExportStage::FetchCompleted => 40,
            ExportStage::Assembled => 60,
            ExportStage::Serialized => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportStage::FetchStarted => "Fetching report data",
            ExportStage::FetchCompleted => "Data received",
            ExportStage::Assembled => "Report assembled",
            ExportStage::Serialized => "File written",
        }
    }
}

/// Events emitted during one export run
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    /// A milestone was reached
    Progress { percent: u8, stage: ExportStage },
    /// The file is on disk
    Completed { path: PathBuf },
    /// The export was aborted; emitted at most once per run
    Failed { message: String },
}

/// Broadcast bus for export events
///
/// Multi-consumer; publishing with no subscriber is a no-op.
pub struct ProgressBus {
    sender: broadcast::Sender<ExportEvent>,
}

impl ProgressBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (64 events)
    pub fn default_capacity() -> Self {
        Self::new(64)
    }

    pub fn publish(&self, event: ExportEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn stage(&self, stage: ExportStage) {
        self.publish(ExportEvent::Progress {
            percent: stage.percent(),
            stage,
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExportEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ProgressBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for ProgressBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
