//! Apply the built-in quirks to a device description and print its entities.
//!
//! ```text
//! cargo run -p dpmap-quirks --example quirk_demo -- tests/fixtures/kt_f3goccgfj6qino4c.json
//! ```
//!
//! Set `DPMAP_LOG_JSON=true` for JSON logs and `RUST_LOG` to adjust levels.

use dpmap_core::{AnyWrapper, Device, DeviceWrapper, WarningCache};
use dpmap_quirks::builtin_quirks;
use serde_json::json;

fn init_tracing() {
    let json_logging = std::env::var("DPMAP_LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("dpmap_core=debug,dpmap_quirks=debug")
    });

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: quirk_demo <device.json>")?;
    let mut device = Device::from_json_file(&path)?;
    let warnings = WarningCache::new();

    let quirk = builtin_quirks()
        .into_iter()
        .find(|quirk| quirk.matches(&device));
    match &quirk {
        Some(quirk) => {
            let inserted = quirk.patch_device(&mut device);
            println!("Matched quirk, {} metadata entries inserted", inserted);
        }
        None => println!("No quirk for {}/{}", device.category, device.product_id),
    }

    // Every status DP through the generic wrapper
    let mut codes: Vec<&String> = device.status.keys().collect();
    codes.sort();
    for code in codes {
        let Some(wrapper) = AnyWrapper::find_dpcode(&device, code) else {
            println!("{:<20} (no metadata)", code);
            continue;
        };
        let value = wrapper.read_device_status(&device, &warnings);
        let summary = json!({
            "wrapper": wrapper.kind_name(),
            "value": value.map(|v| v.to_string()),
            "unit": wrapper.native_unit(),
            "writable": wrapper.is_writable(),
        });
        println!("{:<20} {}", code, summary);
    }

    if let Some(quirk) = quirk {
        for climate in &quirk.climate_definitions {
            let target = climate.target_temperature.call(&device);
            let current = climate.current_temperature.call(&device);
            println!(
                "climate {}: target={:?} current={:?}",
                climate.key(),
                target.and_then(|w| w.read_device_status(&device, &warnings)),
                current.and_then(|w| w.read_device_status(&device, &warnings)),
            );
        }
        for sensor in &quirk.sensor_definitions {
            let value = sensor
                .wrapper
                .call(&device)
                .and_then(|w| w.read_device_status(&device, &warnings));
            println!("sensor {}: {:?}", sensor.key(), value);
        }
    }

    Ok(())
}
