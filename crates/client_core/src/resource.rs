//! Per-resource list configuration: endpoint, recognized filters, defaults.

use shared::domain::Device;

use crate::query::ListQuery;

pub const SEARCH_FILTER: &str = "search";
pub const SEARCH_TYPE_FILTER: &str = "searchType";
pub const DEVICE_FILTER: &str = "deviceFilter";
pub const TIME_FILTER: &str = "timeFilter";

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const PAGE_SIZE_CHOICES: [u32; 4] = [10, 20, 50, 100];

pub const SENSOR_DATA_PATH: &str = "/api/sensor-data";
pub const LED_EVENTS_PATH: &str = "/api/led-events";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResource {
    name: &'static str,
    base_path: &'static str,
    filter_keys: Vec<&'static str>,
    defaults: ListQuery,
}

impl ListResource {
    pub fn new(
        name: &'static str,
        base_path: &'static str,
        filter_keys: Vec<&'static str>,
        defaults: ListQuery,
    ) -> Self {
        Self {
            name,
            base_path,
            filter_keys,
            defaults,
        }
    }

    pub fn sensor_readings() -> Self {
        Self::new(
            "sensor readings",
            SENSOR_DATA_PATH,
            vec![SEARCH_FILTER, SEARCH_TYPE_FILTER, TIME_FILTER],
            ListQuery::new(DEFAULT_PAGE_SIZE)
                .with_filter(SEARCH_TYPE_FILTER, SearchType::AutoDetect.as_param()),
        )
    }

    pub fn device_events() -> Self {
        Self::new(
            "device events",
            LED_EVENTS_PATH,
            vec![SEARCH_FILTER, DEVICE_FILTER, TIME_FILTER],
            ListQuery::new(DEFAULT_PAGE_SIZE)
                .with_filter(DEVICE_FILTER, DeviceFilter::All.as_param()),
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn base_path(&self) -> &'static str {
        self.base_path
    }

    pub fn endpoint_path(&self) -> String {
        format!("{}/paginated", self.base_path)
    }

    pub fn filter_keys(&self) -> &[&'static str] {
        &self.filter_keys
    }

    pub fn recognizes(&self, name: &str) -> bool {
        self.filter_keys.contains(&name)
    }

    pub fn default_query(&self) -> ListQuery {
        self.defaults.clone()
    }

    /// Default value of one filter, if the resource defines one.
    pub fn default_filter(&self, name: &str) -> Option<&str> {
        self.defaults.filter(name)
    }

    /// Whether `value` is one the backend understands for `name`. Only the
    /// enumerated filters are checked; free-text filters accept anything.
    pub fn accepts(&self, name: &str, value: &str) -> bool {
        if !self.recognizes(name) {
            return false;
        }
        match name {
            SEARCH_TYPE_FILTER => SearchType::from_param(value).is_some(),
            DEVICE_FILTER => DeviceFilter::from_param(value).is_some(),
            _ => true,
        }
    }
}

/// Which column a sensor search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    AutoDetect,
    Id,
    Temperature,
    Humidity,
    LightLevel,
}

impl SearchType {
    pub const ALL: [SearchType; 5] = [
        SearchType::AutoDetect,
        SearchType::Id,
        SearchType::Temperature,
        SearchType::Humidity,
        SearchType::LightLevel,
    ];

    pub fn as_param(self) -> &'static str {
        match self {
            Self::AutoDetect => "Auto Detect",
            Self::Id => "ID",
            Self::Temperature => "Temperature (°C)",
            Self::Humidity => "Humidity (%)",
            Self::LightLevel => "Light Level",
        }
    }

    pub fn from_param(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_param() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AutoDetect => "auto",
            Self::Id => "id",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::LightLevel => "light level",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFilter {
    All,
    Only(Device),
}

impl DeviceFilter {
    pub fn as_param(self) -> String {
        match self {
            Self::All => "all".to_string(),
            Self::Only(device) => device.number().to_string(),
        }
    }

    pub fn from_param(value: &str) -> Option<Self> {
        if value == "all" {
            return Some(Self::All);
        }
        value
            .parse::<i32>()
            .ok()
            .and_then(Device::from_number)
            .map(Self::Only)
    }
}

/// Shape of a free-text time filter, as the backend interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilterKind {
    /// `d/m/yyyy - d/m/yyyy`
    DateRange,
    /// `d/m/yyyy`
    Date,
    /// `hh:mm` or `hh:mm:ss`
    Time,
    Other,
}

impl TimeFilterKind {
    pub fn classify(value: &str) -> Self {
        let value = value.trim();
        if is_date(value) {
            return Self::Date;
        }
        if let Some((from, to)) = value.split_once('-') {
            if is_date(from.trim()) && is_date(to.trim()) {
                return Self::DateRange;
            }
        }
        if is_time(value) {
            return Self::Time;
        }
        Self::Other
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DateRange => "date range",
            Self::Date => "date",
            Self::Time | Self::Other => "time",
        }
    }
}

fn digits(part: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
}

fn is_date(value: &str) -> bool {
    let parts: Vec<&str> = value.split('/').collect();
    matches!(parts.as_slice(), [d, m, y] if digits(d, 1, 2) && digits(m, 1, 2) && digits(y, 4, 4))
}

fn is_time(value: &str) -> bool {
    let parts: Vec<&str> = value.split(':').collect();
    match parts.as_slice() {
        [h, m] => digits(h, 1, 2) && digits(m, 2, 2),
        [h, m, s] => digits(h, 1, 2) && digits(m, 2, 2) && digits(s, 2, 2),
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/resource_tests.rs"]
mod tests;
