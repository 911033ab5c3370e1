mod core;

pub use core::{TickError, TickReport, run_tick_at};
