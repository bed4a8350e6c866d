use async_trait::async_trait;
use pharmaclock_core::{GeolocationProvider, PositionErrorCode, PositionFailure, PositionOptions};
use pharmaclock_domain::Coordinates;

/// Runtime with no geolocation capability at all
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedGeolocation;

#[async_trait]
impl GeolocationProvider for UnsupportedGeolocation {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> Result<Coordinates, PositionFailure> {
        Err(PositionFailure::new(
            PositionErrorCode::PositionUnavailable,
            "geolocation is not supported on this device",
        ))
    }
}
