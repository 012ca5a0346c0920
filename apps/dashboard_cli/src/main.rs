use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client_core::{
    build_http_client,
    resource::{DEVICE_FILTER, SEARCH_FILTER, SEARCH_TYPE_FILTER, TIME_FILTER},
    view::{empty_message, range_text, rows, TableRow},
    DeviceControlClient, HttpListSource, ListError, ListEvent, ListResource, LoadOutcome,
    MemoryHistory, PagedListController,
};
use serde::de::DeserializeOwned;
use shared::domain::{Device, DeviceEvent, SensorReading};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, Settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Browse IoT sensor history and switch devices")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides `server_url` from the config file and environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Page through sensor readings.
    Sensors {
        #[command(flatten)]
        list: ListArgs,
        /// Column the search term applies to, e.g. "Temperature (°C)".
        #[arg(long)]
        search_type: Option<String>,
    },
    /// Page through device on/off events.
    Events {
        #[command(flatten)]
        list: ListArgs,
        /// Device number (1-3) or "all".
        #[arg(long)]
        device: Option<String>,
    },
    /// Switch a device on or off.
    Control {
        /// Device number: 1 light, 2 fan, 3 air conditioner.
        device: i32,
        state: Switch,
        #[arg(long)]
        json: bool,
    },
    /// Show the newest sensor reading and each device's current state.
    Status,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Starting browser query string, e.g. "page=2&size=25".
    #[arg(long, default_value = "")]
    url_query: String,
    /// 1-based page to jump to after the first load.
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    size: Option<u32>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    time_filter: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Switch {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config)?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        settings.request_timeout_ms = timeout_ms;
    }
    debug!(?settings, "settings loaded");

    match cli.command {
        Command::Sensors { list, search_type } => {
            let extra = search_type.map(|v| (SEARCH_TYPE_FILTER, v));
            let resource = ListResource::sensor_readings();
            browse::<SensorReading>(&settings, resource, "/sensor-data", list, extra).await
        }
        Command::Events { list, device } => {
            let extra = device.map(|v| (DEVICE_FILTER, v));
            let resource = ListResource::device_events();
            browse::<DeviceEvent>(&settings, resource, "/action-history", list, extra).await
        }
        Command::Control {
            device,
            state,
            json,
        } => control(&settings, device, matches!(state, Switch::On), json).await,
        Command::Status => status(&settings).await,
    }
}

async fn browse<T>(
    settings: &Settings,
    resource: ListResource,
    route: &str,
    args: ListArgs,
    extra_filter: Option<(&'static str, String)>,
) -> Result<()>
where
    T: TableRow + DeserializeOwned + Clone + Send + Sync + 'static,
{
    let http = build_http_client(settings.request_timeout())
        .context("failed to build HTTP client")?;
    let source = HttpListSource::<T>::new(http, &settings.server_url, &resource);
    let history = Arc::new(MemoryHistory::new(route, &args.url_query));
    let controller =
        PagedListController::new(resource.clone(), Arc::new(source), history.clone());

    let mut events = controller.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let ListEvent::Loading(query) = event {
                debug!(page = query.page(), size = query.page_size(), "loading");
            }
        }
    });

    let defaults = resource
        .default_query()
        .with_page_size(settings.default_page_size);
    controller.initialize(defaults);
    report(controller.load().await)?;

    let filters = [
        args.search.map(|v| (SEARCH_FILTER, v)),
        args.time_filter.map(|v| (TIME_FILTER, v)),
        extra_filter,
    ];
    for (name, value) in filters.into_iter().flatten() {
        report(controller.set_filter(name, &value).await)?;
    }
    if let Some(size) = args.size {
        report(controller.set_page_size(size).await)?;
    }
    if let Some(page) = args.page {
        let outcome = report(controller.go_to_page(page.saturating_sub(1)).await)?;
        if matches!(outcome, LoadOutcome::Ignored) {
            warn!(page, "page is out of range; staying on the current page");
        }
    }

    let Some(page) = controller.last_page() else {
        return Ok(());
    };
    let query = controller.current_query();

    for line in render::table(T::headers(), &rows(&page)) {
        println!("{line}");
    }
    if page.is_empty() {
        println!("{}", empty_message(&page, &query, &resource));
    } else {
        println!("{}", range_text(&page, &query, &resource));
    }
    if let Some(window) = controller.window(settings.page_window) {
        if window.total > 1 {
            println!("{}", render::control_strip(&window.controls()));
        }
    }
    println!("{}", history.current_url());
    Ok(())
}

fn report<T>(result: Result<LoadOutcome<T>, ListError>) -> Result<LoadOutcome<T>> {
    result.map_err(user_facing)
}

fn user_facing(err: ListError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

fn device_client(settings: &Settings) -> Result<DeviceControlClient> {
    let http = build_http_client(settings.request_timeout())
        .context("failed to build HTTP client")?;
    Ok(DeviceControlClient::new(http, settings.server_url.clone()))
}

async fn status(settings: &Settings) -> Result<()> {
    let client = device_client(settings)?;

    match client.latest_reading().await.map_err(user_facing)? {
        Some(reading) => {
            let row = reading.to_row();
            for line in render::table(SensorReading::headers(), &[row]) {
                println!("{line}");
            }
        }
        None => println!("No sensor readings recorded yet"),
    }

    for device in Device::ALL {
        let state = match client.state(device).await.map_err(user_facing)? {
            Some(true) => "on",
            Some(false) => "off",
            None => "unknown",
        };
        println!("{}: {state}", device.display_name());
    }
    Ok(())
}

async fn control(settings: &Settings, number: i32, on: bool, json: bool) -> Result<()> {
    let device = Device::from_number(number)
        .ok_or_else(|| anyhow!("unknown device {number}; expected 1, 2 or 3"))?;
    let client = device_client(settings)?;

    let reply = client
        .set_state(device, on)
        .await
        .map_err(user_facing)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!(
            "{} {}: {}",
            device.display_name(),
            if reply.state { "on" } else { "off" },
            reply.message.as_deref().unwrap_or("command sent")
        );
    }
    Ok(())
}
