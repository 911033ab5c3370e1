mod provider;
mod service;
mod sink;

pub use provider::{
    ActiveSignalSource, ClusterIdentitySource, MonitorError, SignalSource, SimulatedClusterSource,
    SnapshotSignalSource,
};
pub use service::{TickError, TickReport, run_tick_at};
pub use sink::{
    ConfiguredSinks, JsonlNotificationSink, LogNotificationSink, NotificationSink, SinkError,
};
