//! Scripted device collaborators: geolocation, permission query, human
//! confirmation.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use pharmaclock_core::{
    ConfirmationPort, ConfirmationRequest, GeolocationProvider, PermissionIntrospection,
    PositionErrorCode, PositionFailure, PositionOptions,
};
use pharmaclock_domain::{Coordinates, GeoPoint, PermissionState, Result as DomainResult};

/// Geolocation provider answering every request with the same scripted
/// result, recording the options it was called with.
pub struct ScriptedGeolocation {
    available: bool,
    hang: AtomicBool,
    result: Mutex<Result<Coordinates, PositionFailure>>,
    requests: Mutex<Vec<PositionOptions>>,
}

impl ScriptedGeolocation {
    pub fn at(point: GeoPoint, accuracy_meters: Option<f64>) -> Self {
        Self {
            available: true,
            hang: AtomicBool::new(false),
            result: Mutex::new(Ok(Coordinates {
                latitude: point.latitude,
                longitude: point.longitude,
                accuracy_meters,
                captured_at: Utc::now(),
            })),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(code: PositionErrorCode) -> Self {
        let provider = Self::at(GeoPoint::ZERO, None);
        provider.fail_with(code);
        provider
    }

    pub fn unsupported() -> Self {
        Self { available: false, ..Self::at(GeoPoint::ZERO, None) }
    }

    /// Never answer; only the caller's timeout ends the request.
    pub fn hanging() -> Self {
        let provider = Self::at(GeoPoint::ZERO, None);
        provider.hang.store(true, Ordering::SeqCst);
        provider
    }

    pub fn fail_with(&self, code: PositionErrorCode) {
        *self.result.lock() = Err(PositionFailure::new(code, format!("scripted {code:?}")));
    }

    pub fn requests(&self) -> Vec<PositionOptions> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl GeolocationProvider for ScriptedGeolocation {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<Coordinates, PositionFailure> {
        self.requests.lock().push(options);
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.result.lock().clone()
    }
}

/// Permission query reporting a fixed state.
pub struct StaticPermission(pub PermissionState);

#[async_trait]
impl PermissionIntrospection for StaticPermission {
    async fn query(&self) -> DomainResult<PermissionState> {
        Ok(self.0)
    }
}

/// Confirmation port answering from a script, then with a default.
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<bool>>,
    default_answer: bool,
    asked: Mutex<Vec<ConfirmationRequest>>,
}

impl ScriptedConfirmer {
    pub fn always(answer: bool) -> Self {
        Self { answers: Mutex::new(VecDeque::new()), default_answer: answer, asked: Mutex::new(Vec::new()) }
    }

    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self { answers: Mutex::new(answers.into_iter().collect()), ..Self::always(false) }
    }

    pub fn asked(&self) -> Vec<ConfirmationRequest> {
        self.asked.lock().clone()
    }
}

#[async_trait]
impl ConfirmationPort for ScriptedConfirmer {
    async fn confirm(&self, request: &ConfirmationRequest) -> bool {
        self.asked.lock().push(request.clone());
        self.answers.lock().pop_front().unwrap_or(self.default_answer)
    }
}
