//! PID design by dominant-pole placement

mod damping;
mod pid;

pub use damping::{damping_ratio, overshoot_from_damping};
pub use pid::{solve_design, DesignResult, DesignSpec, Gain, PidGains};
