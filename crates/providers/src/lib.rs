//! Outbound HTTP clients for the payment gateway and the geocoder.
//!
//! Each provider sits behind an object-safe trait so the API layer can hold
//! it as `Arc<dyn …>` and tests can substitute an in-process fake.

pub mod geocoder;
pub mod paystack;

use std::time::Duration;

pub use geocoder::{GeocodeError, GeocodeQuery, Geocoder, NominatimGeocoder};
pub use paystack::{
    GatewayError, InitializeRequest, PaymentGateway, PaymentSession, PaystackClient, PaystackEvent,
    Transaction,
};

/// Timeout applied to every outbound provider request.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);
