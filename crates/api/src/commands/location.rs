use pharmaclock_core::{permission_status_message, work_location_message, ClockError};

use crate::context::AppContext;

/// Report permission state and where the device is relative to the branch.
pub async fn locate(ctx: &AppContext) -> Result<String, ClockError> {
    ctx.controller.load().await?;
    let location = ctx.location();

    let permission = location.check_permission_status().await;
    let branch = ctx.controller.branch_location().await?;
    let check = location
        .check_work_location(branch.latitude, branch.longitude, branch.allowed_radius_meters)
        .await?;

    Ok(format!("{}\n{}", permission_status_message(permission), work_location_message(&check)))
}
