// src/services/mod.rs

pub mod assignment;
pub mod cost_cache;
pub mod cost_policy;
pub mod revenue_plan;
pub mod summary;

pub use assignment::ProjectAssignmentService;
pub use cost_cache::CostPolicyCache;
pub use cost_policy::CostPolicyService;
pub use revenue_plan::RevenuePlanService;
pub use summary::{MonthlyRevenueSummaryManager, MonthlyRevenueSummaryService};
