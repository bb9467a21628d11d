mod engine;
pub mod locale;
mod solver;
mod types;
mod view;

pub use engine::{
    ANNUAL_RETURN, PASSIVE_RATE, future_value, horizon_months, monthly_rate, months_until,
    run_projection, validate_ages,
};
pub use solver::{required_contribution, target_capital};
pub use types::{InputRecord, ProjectionError, ProjectionInput, ProjectionResult};
pub use view::{ProjectionView, render_projection};
