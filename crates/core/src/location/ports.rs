//! Port interfaces for device geolocation
//!
//! These traits define the boundaries between core business logic
//! and the platform's location capability.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pharmaclock_domain::{Coordinates, PermissionState, Result};

/// Options passed with every position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    /// Oldest cached fix the platform may return; zero forces a fresh fix
    pub maximum_age: Duration,
    pub timeout: Duration,
}

/// Raw failure codes a platform reports for a position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

/// A failed position request as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionFailure {
    pub code: PositionErrorCode,
    /// Platform diagnostic, for logs only
    pub detail: String,
}

impl PositionFailure {
    pub fn new(code: PositionErrorCode, detail: impl Into<String>) -> Self {
        Self { code, detail: detail.into() }
    }
}

/// Trait for the device's "get current position" capability
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Whether the runtime exposes geolocation at all
    fn is_available(&self) -> bool;

    /// Settle any pending permission prompt before a fix is requested.
    ///
    /// Runs outside the fix timeout, so an operator may take as long as
    /// they need to answer. Providers without a separate prompt report
    /// `Granted` and let `current_position` surface a refusal.
    async fn request_permission(&self) -> PermissionState {
        PermissionState::Granted
    }

    /// Request a single position fix
    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> std::result::Result<Coordinates, PositionFailure>;
}

/// Trait for querying permission state without prompting
#[async_trait]
pub trait PermissionIntrospection: Send + Sync {
    async fn query(&self) -> Result<PermissionState>;
}

/// Whether the platform can report permission state ahead of a request
#[derive(Clone, Default)]
pub enum PermissionCapability {
    Introspectable(Arc<dyn PermissionIntrospection>),
    #[default]
    Unavailable,
}

impl std::fmt::Debug for PermissionCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Introspectable(_) => f.write_str("Introspectable"),
            Self::Unavailable => f.write_str("Unavailable"),
        }
    }
}
