use crate::config::{opt_env_var, ClientConfig, API_KEY_ENV_VAR};
use crate::error::{GoveeApiError, Result};
use crate::model::DeviceInfo;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::version_info::user_agent;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

// This file implements the Govee Platform API V1 as described at:
// <https://developer.govee.com/reference/get-you-devices>
//
// It is NOT the same thing as the older, but confusingly versioned
// with a higher number, Govee HTTP API v2 that is described at
// <https://govee.readme.io/reference/getlightdeviceinfo>

pub const DEVICES_ENDPOINT: &str = "user/devices";
pub const DEVICE_STATE_ENDPOINT: &str = "device/state";
// Not yet used by any operation here
pub const DEVICE_CONTROL_ENDPOINT: &str = "device/control";
pub const DEVICE_SCENES_ENDPOINT: &str = "device/scenes";

const API_KEY_HEADER: &str = "Govee-API-Key";

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{path}", base_url.trim_end_matches('/'))
}

#[derive(Clone)]
pub struct GoveeApiClient {
    key: String,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl GoveeApiClient {
    pub fn new<K: Into<String>>(key: K) -> Result<Self> {
        Self::with_config(key, ClientConfig::default())
    }

    pub fn with_config<K: Into<String>>(key: K, config: ClientConfig) -> Result<Self> {
        let key = validate_key(key.into())?;
        let base_url = validate_base_url(config.base_url.clone())?;
        let transport = Arc::new(ReqwestTransport::new(config)?);
        Ok(Self {
            key,
            base_url,
            transport,
        })
    }

    pub fn with_transport<K: Into<String>, U: Into<String>>(
        key: K,
        base_url: U,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        Ok(Self {
            key: validate_key(key.into())?,
            base_url: validate_base_url(base_url.into())?,
            transport,
        })
    }

    /// Construct a client using the key from `$GOVEE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let key = opt_env_var(API_KEY_ENV_VAR)?.ok_or_else(|| {
            GoveeApiError::Configuration(format!("${API_KEY_ENV_VAR} is not set"))
        })?;
        Self::new(key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        let url = endpoint(&self.base_url, DEVICES_ENDPOINT);
        let resp: GetDevicesResponse = self
            .request_with_json_response(Method::GET, url, None::<&()>)
            .await?;
        Ok(resp.data)
    }

    pub async fn get_device_by_id<I: AsRef<str>>(&self, id: I) -> Result<DeviceInfo> {
        let id = id.as_ref();
        let devices = self.list_devices().await?;
        devices
            .into_iter()
            .find(|d| d.device == id)
            .ok_or_else(|| GoveeApiError::InvalidDevice(format!("device {id} not found")))
    }

    /// Returns the current state of each of the device's capabilities.
    /// `None` means that the server had no state to report.
    pub async fn get_device_state(&self, device: &DeviceInfo) -> Result<Option<DeviceInfo>> {
        if device.sku.is_empty() || device.device.is_empty() {
            return Err(GoveeApiError::InvalidDevice(format!(
                "both sku and device id are required, have sku={:?} device={:?}",
                device.sku, device.device
            )));
        }

        let url = endpoint(&self.base_url, DEVICE_STATE_ENDPOINT);
        let request = GetDeviceStateRequest::new(&device.sku, &device.device);

        let resp: GetDeviceStateResponse = self
            .request_with_json_response(Method::POST, url, Some(&request))
            .await?;

        if resp.payload.is_none() {
            log::debug!("no state reported for {device}: {}", resp.status.message);
        }
        Ok(resp.payload)
    }

    /// Release idle pooled connections held by the transport.
    /// The client remains usable afterwards.
    pub fn close(&self) {
        self.transport.close();
    }

    async fn request_with_json_response<B: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> Result<R> {
        let body = match body {
            Some(body) => Some(
                serde_json::to_vec(body)
                    .map_err(|err| GoveeApiError::Decode(format!("encoding {url}: {err}")))?,
            ),
            None => None,
        };

        let request = HttpRequest {
            method,
            url,
            headers: vec![
                (API_KEY_HEADER, self.key.clone()),
                ("Content-Type", "application/json".to_string()),
                ("User-Agent", user_agent()),
            ],
            body,
        };

        log::debug!("{} {}", request.method, request.url);
        let url = request.url.clone();
        let response = self.transport.send(request).await?;
        let body = http_response_body(&url, response)?;
        from_json(&body).map_err(|err| match err {
            GoveeApiError::Decode(msg) => {
                GoveeApiError::Decode(format!("parsing {url} response: {msg}"))
            }
            err => err,
        })
    }
}

fn validate_key(key: String) -> Result<String> {
    if key.is_empty() {
        return Err(GoveeApiError::Configuration(
            "missing Govee API Key".to_string(),
        ));
    }
    Ok(key)
}

fn validate_base_url(base_url: String) -> Result<String> {
    reqwest::Url::parse(&base_url)
        .map_err(|err| GoveeApiError::Configuration(format!("base url {base_url:?}: {err}")))?;
    Ok(base_url)
}

/// Classifies the response status; the body of an error response
/// is not consulted.
pub fn http_response_body(url: &str, response: HttpResponse) -> Result<Vec<u8>> {
    log::trace!(
        "{url} status {}, {} bytes",
        response.status.as_u16(),
        response.body.len()
    );
    match GoveeApiError::from_status(response.status) {
        None => Ok(response.body),
        Some(err) => {
            log::warn!("request {url} failed: {err}");
            Err(err)
        }
    }
}

pub fn from_json<T: serde::de::DeserializeOwned, S: AsRef<[u8]>>(text: S) -> Result<T> {
    let text = text.as_ref();
    serde_json_path_to_error::from_slice(text).map_err(|err| {
        GoveeApiError::Decode(format!("{err}. Input: {}", String::from_utf8_lossy(text)))
    })
}

/// The status block common to every response envelope
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ApiResponseStatus {
    #[serde(default, rename = "requestId")]
    pub request_id: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default, rename = "msg")]
    pub message: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GetDevicesResponse {
    #[serde(flatten)]
    pub status: ApiResponseStatus,
    #[serde(default)]
    pub data: Vec<DeviceInfo>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GetDeviceStateResponse {
    #[serde(flatten)]
    pub status: ApiResponseStatus,
    #[serde(default)]
    pub payload: Option<DeviceInfo>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GetDeviceStateRequest {
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub payload: GetDeviceStateRequestPayload,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GetDeviceStateRequestPayload {
    pub sku: String,
    pub device: String,
}

impl GetDeviceStateRequest {
    pub fn new(sku: &str, device: &str) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            payload: GetDeviceStateRequestPayload {
                sku: sku.to_string(),
                device: device.to_string(),
            },
        }
    }
}
