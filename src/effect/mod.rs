//! Шейдерный эффект: решение о применении к окну и жизненный цикл привязок.

pub mod binding;
pub mod controller;
pub mod eligibility;

pub use controller::{BindingController, ControllerOptions};
pub use eligibility::should_apply;
