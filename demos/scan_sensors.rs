//! Example: Discovering sensor registers on a DRIFT controller
//!
//! Run with: cargo run --example scan_sensors -- <host> [port]
//!
//! This example demonstrates:
//! - Connecting and performing the key-fragment handshake
//! - Sweeping the full 8-bit ID space in ascending order
//! - Collecting and printing the registers that answered

use drift_plc::utils::format_value;
use drift_plc::{Client, ClientConfig};
use std::env;

fn main() -> drift_plc::Result<()> {
    let mut args = env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port = args.next().and_then(|p| p.parse().ok());

    // =========================================================================
    // Connect to the controller
    // =========================================================================

    let mut config = ClientConfig::new(host);
    if let Some(port) = port {
        config = config.with_port(port);
    }
    println!("connecting to {}:{} ...", config.host, config.port);

    let mut client = Client::connect(config)?;
    println!("handshake complete, session fragment {}", client.fragment());

    // =========================================================================
    // Sweep all candidate IDs
    // =========================================================================

    println!("\n=== Scanning sensor IDs 0..=255 ===\n");

    let mut readings = Vec::new();
    for id in 0..=255u8 {
        // A None is simply "no sensor at this ID", not a failure.
        if let Some(reading) = client.read_sensor(id)? {
            println!("sensor {:3}: {}", id, format_value(reading.value));
            readings.push(reading);
        }
    }

    // =========================================================================
    // Summary
    // =========================================================================

    println!("\n{} sensors present:", readings.len());
    let ids: Vec<u8> = readings.iter().map(|r| r.id).collect();
    println!("{ids:?}");

    client.close();
    Ok(())
}
