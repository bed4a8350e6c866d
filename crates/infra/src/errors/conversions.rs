//! Conversions from external infrastructure errors into domain errors.

use pharmaclock_domain::PharmaClockError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PharmaClockError);

impl From<InfraError> for PharmaClockError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PharmaClockError> for InfraError {
    fn from(value: PharmaClockError) -> Self {
        InfraError(value)
    }
}

trait IntoPharmaClockError {
    fn into_pharmaclock(self) -> PharmaClockError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PharmaClockError */
/* -------------------------------------------------------------------------- */

impl IntoPharmaClockError for HttpError {
    fn into_pharmaclock(self) -> PharmaClockError {
        if self.is_timeout() {
            return PharmaClockError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return PharmaClockError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return PharmaClockError::Internal(format!("unexpected response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => PharmaClockError::Auth(message),
                404 => PharmaClockError::NotFound(message),
                400..=499 => PharmaClockError::InvalidInput(message),
                _ => PharmaClockError::Network(message),
            };
        }

        PharmaClockError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_pharmaclock())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → PharmaClockError */
/* -------------------------------------------------------------------------- */

impl IntoPharmaClockError for JsonError {
    fn into_pharmaclock(self) -> PharmaClockError {
        if self.is_data() || self.is_syntax() || self.is_eof() {
            PharmaClockError::Internal(format!("malformed store payload: {self}"))
        } else {
            PharmaClockError::Internal(self.to_string())
        }
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_pharmaclock())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → PharmaClockError */
/* -------------------------------------------------------------------------- */

impl IntoPharmaClockError for UrlError {
    fn into_pharmaclock(self) -> PharmaClockError {
        PharmaClockError::Config(format!("invalid store url: {self}"))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        InfraError(value.into_pharmaclock())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
