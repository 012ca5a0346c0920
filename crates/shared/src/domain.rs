use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ReadingId);
id_newtype!(EventId);

/// Actuators wired to the board, addressed by their LED channel number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    Light,
    Fan,
    AirConditioner,
}

impl Device {
    pub const ALL: [Device; 3] = [Device::Light, Device::Fan, Device::AirConditioner];

    pub fn from_number(number: i32) -> Option<Self> {
        match number {
            1 => Some(Self::Light),
            2 => Some(Self::Fan),
            3 => Some(Self::AirConditioner),
            _ => None,
        }
    }

    pub fn number(self) -> i32 {
        match self {
            Self::Light => 1,
            Self::Fan => 2,
            Self::AirConditioner => 3,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Fan => "Fan",
            Self::AirConditioner => "Air conditioner",
        }
    }
}

/// One row of `/api/sensor-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub id: ReadingId,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub light_level: Option<i64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<i64>,
}

/// One row of `/api/led-events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceEvent {
    pub id: EventId,
    #[serde(default)]
    pub led_number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub state_on: Option<bool>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl DeviceEvent {
    pub fn device(&self) -> Option<Device> {
        self.led_number.and_then(Device::from_number)
    }

    /// Older backends only send the `"ON"`/`"OFF"` string.
    pub fn is_on(&self) -> Option<bool> {
        self.state_on.or_else(|| {
            self.state
                .as_deref()
                .map(|state| state.eq_ignore_ascii_case("on"))
        })
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
