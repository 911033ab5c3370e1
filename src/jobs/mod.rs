use crate::app_context::AppContext;
use crate::monitor::SinkError;

mod monitor;

pub fn start_background_jobs(app_context: AppContext) -> Result<(), SinkError> {
    monitor::start_monitor_job(app_context)
}
