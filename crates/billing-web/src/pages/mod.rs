//! Page Components

mod plans;

pub use plans::PlanPage;
