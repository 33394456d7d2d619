//! Project staffing and monthly revenue aggregation.
//!
//! Domain values live in [`models`], storage seams in [`repositories`] and the
//! aggregation engine in [`services::summary`]. The HTTP layer in [`handlers`]
//! and [`routes`] is a thin adapter over the services.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
