//! Employee profile types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile row carrying the employee's branch assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub user_id: Uuid,
    pub full_name: String,
    /// `None` until an administrator assigns the employee to a branch
    pub branch_id: Option<Uuid>,
}
