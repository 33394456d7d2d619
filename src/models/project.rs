// src/models/project.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Period;

/// The part of a project the staffing engine needs: identity and the period
/// every assignment must fit inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub period: Period,
}

impl Project {
    pub fn new(id: Uuid, code: impl Into<String>, name: impl Into<String>, period: Period) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            period,
        }
    }
}
