// Adapters layer: concrete geolocation sources behind the GeolocationProvider port.

pub mod chain;
pub mod device;
pub mod ip_lookup;

pub use chain::FallbackChain;
pub use device::{DevicePositionProvider, PositionReporter};
pub use ip_lookup::IpLookupProvider;
