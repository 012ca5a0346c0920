//! Row view-models and summary copy for list tables.
//!
//! Rendering layers consume [`RowView`]s instead of formatting rows
//! themselves, so the formatting rules stay testable without any markup.

use chrono::NaiveDateTime;
use shared::domain::{DeviceEvent, SensorReading};

use crate::{
    page::ListPage,
    query::ListQuery,
    resource::{
        DeviceFilter, ListResource, SearchType, TimeFilterKind, DEVICE_FILTER, SEARCH_FILTER,
        SEARCH_TYPE_FILTER, TIME_FILTER,
    },
};

pub const MISSING: &str = "N/A";
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S %d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Muted,
    Normal,
    Highlight,
    On,
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Plain,
        }
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn missing() -> Self {
        Self::toned(MISSING, Tone::Muted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<Cell>,
}

/// Maps one backend row to the cells of a table row.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn to_row(&self) -> RowView;
}

pub fn format_timestamp(value: Option<NaiveDateTime>) -> Cell {
    match value {
        Some(at) => Cell::toned(at.format(TIMESTAMP_FORMAT).to_string(), Tone::Muted),
        None => Cell::missing(),
    }
}

impl TableRow for SensorReading {
    fn headers() -> &'static [&'static str] {
        &["ID", "Temperature", "Humidity", "Light", "Time"]
    }

    fn to_row(&self) -> RowView {
        let temperature = match self.temperature {
            Some(t) if (20.0..=30.0).contains(&t) => Cell::toned(format!("{t}°C"), Tone::Normal),
            Some(t) => Cell::plain(format!("{t}°C")),
            None => Cell::missing(),
        };
        let humidity = self
            .humidity
            .map(|h| Cell::plain(format!("{h}%")))
            .unwrap_or_else(Cell::missing);
        let light = match self.light_level {
            Some(l) if l > 80 => Cell::toned(format!("{l} units"), Tone::Highlight),
            Some(l) => Cell::plain(format!("{l} units")),
            None => Cell::missing(),
        };

        RowView {
            id: self.id.to_string(),
            cells: vec![
                Cell::plain(self.id.to_string()),
                temperature,
                humidity,
                light,
                format_timestamp(self.created_at),
            ],
        }
    }
}

impl TableRow for DeviceEvent {
    fn headers() -> &'static [&'static str] {
        &["ID", "Device", "Action", "Time"]
    }

    fn to_row(&self) -> RowView {
        let device = self
            .device()
            .map(|device| Cell::plain(device.display_name()))
            .unwrap_or_else(Cell::missing);
        let action = match self.is_on() {
            Some(true) => Cell::toned("On", Tone::On),
            Some(false) => Cell::toned("Off", Tone::Off),
            None => Cell::missing(),
        };

        RowView {
            id: self.id.to_string(),
            cells: vec![
                Cell::plain(self.id.to_string()),
                device,
                action,
                format_timestamp(self.created_at),
            ],
        }
    }
}

pub fn rows<T: TableRow>(page: &ListPage<T>) -> Vec<RowView> {
    page.items.iter().map(TableRow::to_row).collect()
}

/// Human-readable descriptions of every filter that differs from the
/// resource default, in the resource's filter order.
pub fn active_filters(query: &ListQuery, resource: &ListResource) -> Vec<String> {
    resource
        .filter_keys()
        .iter()
        .filter_map(|key| {
            let value = query.filter(key)?;
            if resource.default_filter(key) == Some(value) {
                return None;
            }
            Some(describe_filter(key, value))
        })
        .collect()
}

fn describe_filter(key: &str, value: &str) -> String {
    match key {
        SEARCH_FILTER => format!("search \"{value}\""),
        SEARCH_TYPE_FILTER => match SearchType::from_param(value) {
            Some(kind) => format!("type {}", kind.label()),
            None => format!("type {value}"),
        },
        DEVICE_FILTER => match DeviceFilter::from_param(value) {
            Some(DeviceFilter::Only(device)) => format!("device {}", device.display_name()),
            _ => format!("device {value}"),
        },
        TIME_FILTER => format!("{} \"{value}\"", TimeFilterKind::classify(value).label()),
        other => format!("{other} \"{value}\""),
    }
}

/// `"Showing 11-20 of 57 results (search \"25\")"`.
pub fn range_text<T>(page: &ListPage<T>, query: &ListQuery, resource: &ListResource) -> String {
    let Some((start, end)) = page.item_range() else {
        if page.total_items > 0 {
            return format!("Showing 0 of {} results", page.total_items);
        }
        return "Showing 0 results".to_string();
    };
    let mut text = format!("Showing {start}-{end} of {} results", page.total_items);
    let filters = active_filters(query, resource);
    if !filters.is_empty() {
        text.push_str(&format!(" ({})", filters.join(", ")));
    }
    text
}

/// Message for a table with no rows. Filters combine with AND.
pub fn empty_message<T>(
    page: &ListPage<T>,
    query: &ListQuery,
    resource: &ListResource,
) -> String {
    if page.total_items > 0 {
        return format!(
            "Page {} is past the end; {} {} span {} pages",
            u64::from(page.current_page) + 1,
            page.total_items,
            resource.name(),
            page.total_pages
        );
    }
    let filters = active_filters(query, resource);
    if filters.is_empty() {
        format!("No {} recorded yet", resource.name())
    } else {
        format!("No {} match {}", resource.name(), filters.join(" and "))
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
