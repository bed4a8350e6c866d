//! Application context - dependency injection container

use std::sync::Arc;

use pharmaclock_core::{
    ClockController, ConfirmationPort, LocationService, LocationSettings, PermissionCapability,
    RefreshPolicy,
};
use pharmaclock_domain::{Config, Result};
use pharmaclock_infra::{
    FixedGeolocationProvider, RestBranchLocationStore, RestBreakStore, RestClient,
    RestEmployeeDirectory, RestTimeEntryStore, UnsupportedGeolocation,
};
use tracing::{info, warn};

/// Application context - holds the configured controller and its services
pub struct AppContext {
    pub config: Config,
    pub controller: Arc<ClockController>,
}

impl AppContext {
    /// Wire the REST store, the configured geolocation source and the
    /// confirmation adapter into a controller for the configured employee.
    ///
    /// A terminal with no configured position has no geolocation at all.
    ///
    /// # Errors
    /// Returns `PharmaClockError::Config` when the store client cannot be
    /// built from the configuration.
    pub fn new(config: Config, confirmer: Arc<dyn ConfirmationPort>) -> Result<Self> {
        let client = RestClient::new(&config.store)?;

        let location = match config.location.fixed_point() {
            Some(_) => {
                let geolocation = Arc::new(
                    FixedGeolocationProvider::from_config(&config.location)
                        .with_confirmer(Arc::clone(&confirmer)),
                );
                let permissions =
                    geolocation.permission_capability(config.location.permission_introspection);
                LocationService::new(geolocation, permissions)
            }
            None => {
                warn!("no position configured, geolocation unsupported on this terminal");
                LocationService::new(Arc::new(UnsupportedGeolocation), PermissionCapability::Unavailable)
            }
        }
        .with_settings(LocationSettings::from(&config.location));

        let controller = ClockController::builder(
            config.employee.user_id,
            location,
            Arc::new(RestTimeEntryStore::new(client.clone())),
            Arc::new(RestBranchLocationStore::new(client.clone())),
            Arc::new(RestEmployeeDirectory::new(client.clone())),
            confirmer,
        )
        .with_break_store(Arc::new(RestBreakStore::new(client)))
        .with_refresh_policy(RefreshPolicy::from(&config.refresh))
        .build();

        info!(user_id = %config.employee.user_id, "application context ready");
        Ok(Self::from_parts(config, controller))
    }

    /// Context around an already built controller
    pub fn from_parts(config: Config, controller: ClockController) -> Self {
        Self { config, controller: Arc::new(controller) }
    }

    pub fn location(&self) -> &LocationService {
        self.controller.location_service()
    }
}
