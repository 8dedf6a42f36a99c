//! Devices, capabilities and their state as described by the
//! Govee Platform API V1 JSON schema.
//! <https://developer.govee.com/reference/get-you-devices>
//!
//! Unknown fields are ignored and missing optional fields decode
//! to their empty values, as the schema varies between device models.
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub device: String,
    #[serde(default, rename = "deviceName", skip_serializing_if = "String::is_empty")]
    pub device_name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

impl DeviceInfo {
    pub fn new<S: Into<String>, D: Into<String>>(sku: S, device: D) -> Self {
        Self {
            sku: sku.into(),
            device: device.into(),
            device_name: String::new(),
            device_type: None,
            capabilities: vec![],
        }
    }

    pub fn capability_by_instance(&self, instance: &str) -> Option<&Capability> {
        self.capabilities.iter().find(|c| c.instance == instance)
    }

    pub fn capability(&self, kind: CapabilityKind, instance: &str) -> Option<&Capability> {
        self.capabilities
            .iter()
            .find(|c| c.kind == kind && c.instance == instance)
    }

    pub fn supports_rgb(&self) -> bool {
        self.capability_by_instance("colorRgb").is_some()
    }

    pub fn supports_brightness(&self) -> bool {
        self.capability_by_instance("brightness").is_some()
    }

    pub fn get_color_temperature_range(&self) -> Option<(i64, i64)> {
        let cap = self.capability_by_instance("colorTemperatureK")?;
        let range = cap.parameters.as_ref()?.range.as_ref()?;
        Some((range.min, range.max))
    }
}

impl std::fmt::Display for DeviceInfo {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.device_name.is_empty() {
            write!(fmt, "{} ({})", self.device, self.sku)
        } else {
            write!(fmt, "{} {} ({})", self.device_name, self.device, self.sku)
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    #[serde(rename = "devices.types.light")]
    Light,
    #[serde(rename = "devices.types.air_purifier")]
    AirPurifier,
    #[serde(rename = "devices.types.thermometer")]
    Thermometer,
    #[serde(rename = "devices.types.socket")]
    Socket,
    #[serde(rename = "devices.types.sensor")]
    Sensor,
    #[serde(rename = "devices.types.heater")]
    Heater,
    #[serde(rename = "devices.types.humidifier")]
    Humidifier,
    #[serde(rename = "devices.types.dehumidifier")]
    Dehumidifier,
    #[serde(rename = "devices.types.ice_maker")]
    IceMaker,
    #[serde(rename = "devices.types.aroma_diffuser")]
    AromaDiffuser,
    #[serde(rename = "devices.types.box")]
    Box,
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CapabilityKind {
    /// powerSwitch
    #[serde(rename = "devices.capabilities.on_off")]
    OnOff,
    /// oscillationToggle, nightlightToggle, gradientToggle and friends
    #[serde(rename = "devices.capabilities.toggle")]
    Toggle,
    /// brightness, humidity, volume and so on
    #[serde(rename = "devices.capabilities.range")]
    Range,
    /// nightlightScene, presetScene, gearMode, fanSpeed
    #[serde(rename = "devices.capabilities.mode")]
    Mode,
    /// colorRgb, colorTemperatureK
    #[serde(rename = "devices.capabilities.color_setting")]
    ColorSetting,
    #[serde(rename = "devices.capabilities.segment_color_setting")]
    SegmentColorSetting,
    #[serde(rename = "devices.capabilities.music_setting")]
    MusicSetting,
    /// The options for these are not static; they are fetched
    /// per device from `device/scenes`.
    #[serde(rename = "devices.capabilities.dynamic_scene")]
    DynamicScene,
    // Both spellings have been observed in the wild
    #[serde(
        rename = "devices.capabilities.work_mode",
        alias = "device.capabilities.work_mode"
    )]
    WorkMode,
    #[serde(
        rename = "devices.capabilities.temperature_setting",
        alias = "device.capabilities.temperature_setting"
    )]
    TemperatureSetting,
    #[serde(other)]
    #[default]
    Other,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    #[serde(rename = "ENUM")]
    Enum,
    #[serde(rename = "INTEGER")]
    Integer,
    #[serde(rename = "STRUCT")]
    Struct,
    #[serde(rename = "Array", alias = "ARRAY")]
    Array,
    #[serde(other)]
    #[default]
    Other,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Capability {
    #[serde(default, rename = "type")]
    pub kind: CapabilityKind,
    #[serde(default)]
    pub instance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<CapabilityState>,
}

impl Capability {
    /// Returns the integer value of the named ENUM option
    pub fn enum_parameter_by_name(&self, name: &str) -> Option<i64> {
        let params = self.parameters.as_ref()?;
        if params.data_type != DataType::Enum {
            return None;
        }
        params
            .options
            .iter()
            .find(|opt| opt.name == name)
            .and_then(|opt| opt.value.as_i64())
    }

    pub fn value(&self) -> Option<&StateValue> {
        self.state.as_ref()?.value.as_ref()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Parameter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, rename = "dataType")]
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<EnumOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<IntegerRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<StructField>,

    // The remainder only appear for Array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ArraySize>,
    #[serde(
        default,
        rename = "elementRange",
        skip_serializing_if = "Option::is_none"
    )]
    pub element_range: Option<ArraySize>,
    #[serde(
        default,
        rename = "elementType",
        skip_serializing_if = "Option::is_none"
    )]
    pub element_type: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StructField {
    #[serde(default, rename = "fieldName")]
    pub field_name: String,
    #[serde(default, rename = "dataType")]
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<EnumOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<IntegerRange>,
    #[serde(
        default,
        rename = "defaultValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<StateValue>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EnumOption {
    #[serde(default)]
    pub name: String,
    /// Usually an integer, but scene options carry an object
    #[serde(default)]
    pub value: StateValue,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct IntegerRange {
    pub min: i64,
    pub max: i64,
    pub precision: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ArraySize {
    pub min: i64,
    pub max: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct CapabilityState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<StateValue>,
}

/// The current value of a capability. Its shape depends on the
/// `dataType` of the capability's parameters, but that mapping is
/// only documented, so any JSON shape is accepted.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(untagged)]
pub enum StateValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<StateValue>),
    Map(BTreeMap<String, StateValue>),
}

impl StateValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[StateValue]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, StateValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl std::fmt::Display for StateValue {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(fmt, "{s}"),
            other => write!(fmt, "{}", JsonValue::from(other.clone())),
        }
    }
}

impl From<JsonValue> for StateValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(a) => Self::List(a.into_iter().map(Into::into).collect()),
            JsonValue::Object(o) => {
                Self::Map(o.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<StateValue> for JsonValue {
    fn from(value: StateValue) -> Self {
        match value {
            StateValue::Null => JsonValue::Null,
            StateValue::Bool(b) => JsonValue::Bool(b),
            StateValue::Integer(i) => JsonValue::from(i),
            // NaN and infinities have no JSON representation
            StateValue::Float(f) => JsonValue::from(f),
            StateValue::String(s) => JsonValue::String(s),
            StateValue::List(l) => JsonValue::Array(l.into_iter().map(Into::into).collect()),
            StateValue::Map(m) => {
                JsonValue::Object(m.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<bool> for StateValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for StateValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<&str> for StateValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn state_value_shapes() {
        let v: StateValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, StateValue::Bool(true));
        let v: StateValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, StateValue::Integer(42));
        let v: StateValue = serde_json::from_str("21.5").unwrap();
        assert_eq!(v, StateValue::Float(21.5));
        let v: StateValue = serde_json::from_str("\"on\"").unwrap();
        assert_eq!(v.as_str(), Some("on"));
        let v: StateValue = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(
            v,
            StateValue::List(vec![StateValue::Integer(1), StateValue::Integer(2)])
        );
    }

    #[test]
    fn nested_struct_value_is_preserved() {
        let text = r#"{"workMode":2,"modeValue":{"speed":1,"auto":true,"tag":null},"rgb":[1,2.5]}"#;
        let v: StateValue = serde_json::from_str(text).unwrap();

        let map = v.as_map().unwrap();
        assert_eq!(map["workMode"].as_i64(), Some(2));
        let mode = map["modeValue"].as_map().unwrap();
        assert_eq!(mode["auto"].as_bool(), Some(true));
        assert_eq!(mode["tag"], StateValue::Null);

        let encoded = serde_json::to_value(&v).unwrap();
        let original: JsonValue = serde_json::from_str(text).unwrap();
        assert_eq!(encoded, original);
        assert_eq!(StateValue::from(original), v);
    }

    #[test]
    fn unknown_tags_decode_to_other() {
        let t: DeviceType = serde_json::from_str("\"devices.types.robot\"").unwrap();
        assert_eq!(t, DeviceType::Other);
        let k: CapabilityKind =
            serde_json::from_str("\"devices.capabilities.online\"").unwrap();
        assert_eq!(k, CapabilityKind::Other);
        let k: CapabilityKind =
            serde_json::from_str("\"device.capabilities.work_mode\"").unwrap();
        assert_eq!(k, CapabilityKind::WorkMode);
        let d: DataType = serde_json::from_str("\"ARRAY\"").unwrap();
        assert_eq!(d, DataType::Array);
    }

    #[test]
    fn missing_optional_fields() {
        let device: DeviceInfo =
            serde_json::from_str(r#"{"sku":"H6160","device":"d1","extra":1}"#).unwrap();
        assert_eq!(device.device_name, "");
        assert_eq!(device.device_type, None);
        assert!(device.capabilities.is_empty());

        let cap: Capability = serde_json::from_str(
            r#"{"type":"devices.capabilities.range","instance":"brightness",
                "parameters":{"dataType":"INTEGER"}}"#,
        )
        .unwrap();
        let params = cap.parameters.as_ref().unwrap();
        assert!(params.options.is_empty());
        assert_eq!(params.range, None);
        assert_eq!(cap.value(), None);
    }

    #[test]
    fn short_parameters_decode_to_zero_values() {
        let device: DeviceInfo = serde_json::from_str(
            r#"{
            "sku": "H6160",
            "device": "d1",
            "capabilities": [
                {
                    "type": "devices.capabilities.range",
                    "instance": "brightness",
                    "parameters": {"unit": "unit.percent"}
                },
                {
                    "type": "devices.capabilities.range",
                    "instance": "volume",
                    "parameters": {"dataType": "INTEGER", "range": {"min": 0, "precision": 1}}
                },
                {
                    "type": "devices.capabilities.music_setting",
                    "parameters": {"dataType": "STRUCT", "fields": [{"required": true}]}
                }
            ]
        }"#,
        )
        .unwrap();

        let brightness = device.capabilities[0].parameters.as_ref().unwrap();
        assert_eq!(brightness.unit.as_deref(), Some("unit.percent"));
        assert_eq!(brightness.data_type, DataType::Other);

        let volume = device.capabilities[1].parameters.as_ref().unwrap();
        assert_eq!(
            volume.range,
            Some(IntegerRange {
                min: 0,
                max: 0,
                precision: 1
            })
        );

        let music = &device.capabilities[2];
        assert_eq!(music.instance, "");
        let field = &music.parameters.as_ref().unwrap().fields[0];
        assert_eq!(field.field_name, "");
        assert_eq!(field.data_type, DataType::Other);
        assert!(field.required);

        let cap: Capability = serde_json::from_str(r#"{"instance": "online"}"#).unwrap();
        assert_eq!(cap.kind, CapabilityKind::Other);
        assert_eq!(StateValue::default(), StateValue::Null);
    }

    #[test]
    fn helpers() {
        let device: DeviceInfo = serde_json::from_str(
            r#"{
            "sku": "H6160",
            "device": "AA:BB:CC:DD:EE:FF:11:22",
            "deviceName": "Strip",
            "type": "devices.types.light",
            "capabilities": [
                {
                    "type": "devices.capabilities.on_off",
                    "instance": "powerSwitch",
                    "parameters": {
                        "dataType": "ENUM",
                        "options": [{"name": "on", "value": 1}, {"name": "off", "value": 0}]
                    }
                },
                {
                    "type": "devices.capabilities.color_setting",
                    "instance": "colorTemperatureK",
                    "parameters": {
                        "dataType": "INTEGER",
                        "range": {"min": 2000, "max": 9000, "precision": 1}
                    }
                }
            ]
        }"#,
        )
        .unwrap();

        assert_eq!(device.device_type, Some(DeviceType::Light));
        assert_eq!(device.get_color_temperature_range(), Some((2000, 9000)));
        assert!(!device.supports_rgb());
        assert!(!device.supports_brightness());

        let power = device
            .capability(CapabilityKind::OnOff, "powerSwitch")
            .unwrap();
        assert_eq!(power.enum_parameter_by_name("on"), Some(1));
        assert_eq!(power.enum_parameter_by_name("off"), Some(0));
        assert_eq!(power.enum_parameter_by_name("dim"), None);
        assert!(device
            .capability(CapabilityKind::Toggle, "powerSwitch")
            .is_none());

        assert_eq!(
            device.to_string(),
            "Strip AA:BB:CC:DD:EE:FF:11:22 (H6160)"
        );
    }
}
