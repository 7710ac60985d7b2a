//! Example: listing the devices in a location
//!
//! Loads settings the same way applications do (settings file, then
//! `SMARTTHINGS_*` environment overrides) and walks the paged device list.
//!
//! # Setup
//!
//! With a personal access token:
//!
//! ```bash
//! export SMARTTHINGS_TOKEN=<token>
//! cargo run -p smartthings-infra --example list_devices
//! ```
//!
//! With OAuth credentials that refresh on 401, point
//! `SMARTTHINGS_CREDENTIALS` at a JSON file holding `client_id`,
//! `client_secret`, `refresh_token` and `auth_token`.

#![allow(clippy::print_stdout)]

use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;
use smartthings_core::Endpoint;
use smartthings_domain::{HttpParams, ParamValue};
use smartthings_infra::{config, EndpointClientBuilder, FileTokenStore};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Device {
    device_id: String,
    label: Option<String>,
    name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartthings_core=debug,smartthings_infra=debug".into()),
        )
        .init();

    let settings = config::load().context("failed to load settings")?;
    let mut builder = EndpointClientBuilder::new("devices").settings(settings);

    if let Ok(path) = std::env::var("SMARTTHINGS_CREDENTIALS") {
        let store = Arc::new(FileTokenStore::new(&path));
        let token = store
            .auth_token()
            .await?
            .context("credential file has no auth_token; obtain one before running")?;
        builder = builder.refresh_token(token, store);
    } else {
        let token = std::env::var("SMARTTHINGS_TOKEN")
            .context("set SMARTTHINGS_TOKEN or SMARTTHINGS_CREDENTIALS")?;
        builder = builder.bearer_token(token);
    }

    let endpoint = Endpoint::new(builder.build()?);

    let mut params = HttpParams::new();
    if let Ok(location_id) = endpoint.location_id(None) {
        params.insert("locationId".to_string(), ParamValue::from(location_id));
    }

    let mut devices = endpoint.client().paginate::<Device>(None, Some(&params), None).await?;
    let mut count = 0_usize;
    while let Some(device) = devices.next().await? {
        let display = device.label.or(device.name).unwrap_or_default();
        println!("{}  {display}", device.device_id);
        count += 1;
    }

    println!("\n{count} device(s)");
    Ok(())
}
