//! Geolocation from a configured or flag-supplied fix
//!
//! Terminal deployments have no sensor; the position comes from
//! configuration and the permission flow is modelled on a browser's: a
//! `Prompt` state asks the operator once, ahead of the fix, and remembers
//! the answer.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use pharmaclock_common::{Clock, SystemClock};
use pharmaclock_core::{
    ConfirmationPort, ConfirmationRequest, GeolocationProvider, PermissionCapability,
    PermissionIntrospection, PositionErrorCode, PositionFailure, PositionOptions,
};
use pharmaclock_domain::{Coordinates, GeoPoint, LocationConfig, PermissionState, Result};
use tracing::{debug, info};

pub struct FixedGeolocationProvider {
    fix: Option<GeoPoint>,
    accuracy_meters: Option<f64>,
    permission: Mutex<PermissionState>,
    confirmer: Option<Arc<dyn ConfirmationPort>>,
    clock: Arc<dyn Clock>,
}

impl FixedGeolocationProvider {
    pub fn new(fix: Option<GeoPoint>, accuracy_meters: Option<f64>, permission: PermissionState) -> Self {
        Self {
            fix,
            accuracy_meters,
            permission: Mutex::new(permission),
            confirmer: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn from_config(config: &LocationConfig) -> Self {
        Self::new(config.fixed_point(), config.accuracy_meters, config.permission)
    }

    /// Operator to ask while permission is still `Prompt`; without one a
    /// prompt is treated as refused.
    pub fn with_confirmer(mut self, confirmer: Arc<dyn ConfirmationPort>) -> Self {
        self.confirmer = Some(confirmer);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn permission_state(&self) -> PermissionState {
        *self.permission.lock()
    }

    /// Capability handed to the location service; `introspection = false`
    /// models a platform with no permission query.
    pub fn permission_capability(self: &Arc<Self>, introspection: bool) -> PermissionCapability {
        if introspection {
            PermissionCapability::Introspectable(Arc::clone(self) as Arc<dyn PermissionIntrospection>)
        } else {
            PermissionCapability::Unavailable
        }
    }

    async fn resolve_prompt(&self) -> PermissionState {
        let granted = match &self.confirmer {
            Some(confirmer) => confirmer.confirm(&ConfirmationRequest::GrantLocationAccess).await,
            None => false,
        };
        let state = if granted { PermissionState::Granted } else { PermissionState::Denied };
        *self.permission.lock() = state;
        info!(permission = %state, "location permission answered");
        state
    }
}

#[async_trait]
impl GeolocationProvider for FixedGeolocationProvider {
    fn is_available(&self) -> bool {
        true
    }

    async fn request_permission(&self) -> PermissionState {
        match self.permission_state() {
            PermissionState::Prompt => self.resolve_prompt().await,
            other => other,
        }
    }

    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> std::result::Result<Coordinates, PositionFailure> {
        // An unanswered prompt is not a grant.
        if self.permission_state() != PermissionState::Granted {
            return Err(PositionFailure::new(
                PositionErrorCode::PermissionDenied,
                "location permission denied",
            ));
        }

        let Some(point) = self.fix else {
            return Err(PositionFailure::new(
                PositionErrorCode::PositionUnavailable,
                "no position configured",
            ));
        };

        debug!(%point, max_age_secs = options.maximum_age.as_secs(), "serving configured position");
        Ok(Coordinates {
            latitude: point.latitude,
            longitude: point.longitude,
            accuracy_meters: self.accuracy_meters,
            captured_at: self.clock.now(),
        })
    }
}

#[async_trait]
impl PermissionIntrospection for FixedGeolocationProvider {
    async fn query(&self) -> Result<PermissionState> {
        Ok(self.permission_state())
    }
}
