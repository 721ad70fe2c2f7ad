//! In-memory implementations of the Fleetlink service contracts.
//!
//! Backed by concurrent maps; suitable for tests and single-process
//! deployments. The stores enforce the same identity invariants a real
//! database would: device and profile names are unique per tenant, and
//! a device is always saved together with its credentials.

pub mod credentials;
pub mod device_store;
pub mod error;
pub mod profile_store;

pub use credentials::CredentialsFormatter;
pub use device_store::InMemoryDeviceStore;
pub use error::Error;
pub use profile_store::InMemoryProfileStore;
