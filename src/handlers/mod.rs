// src/handlers/mod.rs

pub mod assignment;
pub mod cost_policy;
pub mod general;
pub mod revenue_plan;
pub mod summary;
