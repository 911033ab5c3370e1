use chrono::Utc;
use tokio::time::{Duration, sleep};

use crate::app_context::AppContext;
use crate::monitor::{ActiveSignalSource, ConfiguredSinks, SinkError, run_tick_at};

pub(super) fn start_monitor_job(app_context: AppContext) -> Result<(), SinkError> {
    let mut sinks = ConfiguredSinks::from_config(&app_context.config)?;
    let mut source = ActiveSignalSource::from_config(&app_context.config);
    if app_context.config.simulation.enabled {
        log::warn!(
            "simulation_mode_enabled clusters={} source=monitor_provider",
            app_context.config.simulation.clusters.len()
        );
    }

    tokio::spawn(async move {
        let settings = app_context.config.monitor.clone();
        let mut previous_tick = None;

        loop {
            let now = Utc::now();

            if let Some(previous) = previous_tick {
                let elapsed_secs = now.signed_duration_since(previous).num_seconds().max(0);
                let threshold_secs = delay_threshold_secs(settings.interval_secs);
                if elapsed_secs > threshold_secs {
                    log::warn!(
                        "monitor_loop_delayed elapsed_secs={} threshold_secs={}",
                        elapsed_secs,
                        threshold_secs
                    );
                }
            }

            previous_tick = Some(now);

            if let Err(error) = run_tick_at(
                &app_context.evaluator,
                &settings,
                &mut source,
                app_context.state_store.as_ref(),
                &mut sinks,
                now.timestamp_millis(),
            )
            .await
            {
                log::warn!("alert_tick_skipped error={}", error);
            }

            sleep(Duration::from_secs(settings.interval_secs)).await;
        }
    });

    Ok(())
}

fn delay_threshold_secs(interval_secs: u64) -> i64 {
    i64::try_from(interval_secs.saturating_mul(2)).unwrap_or(i64::MAX)
}
