//! A client for the Govee Platform API V1, covering device discovery
//! and device state queries.
//!
//! ```rust,no_run
//! # async fn example() -> govee_api::Result<()> {
//! let client = govee_api::GoveeApiClient::from_env()?;
//! for device in client.list_devices().await? {
//!     if let Some(state) = client.get_device_state(&device).await? {
//!         for cap in &state.capabilities {
//!             println!("{device}: {} = {:?}", cap.instance, cap.value());
//!         }
//!     }
//! }
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod platform_api;
pub mod transport;
pub mod version_info;

pub use config::{ClientConfig, GoveeApiArguments};
pub use error::{GoveeApiError, Result, DAILY_REQUEST_LIMIT};
pub use model::{
    Capability, CapabilityKind, CapabilityState, DataType, DeviceInfo, DeviceType, Parameter,
    StateValue,
};
pub use platform_api::GoveeApiClient;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
