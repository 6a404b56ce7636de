//! Example: Probing which sensor registers accept writes
//!
//! Run with: cargo run --example probe_writable -- <host> [port]
//!
//! Each probe issues a real WriteSensor with value 1; on a register that
//! permits writes, the value persists on the controller. The probe stops at
//! the first writable ID found.

use drift_plc::{Client, ClientConfig};
use std::env;

// IDs that answered a read sweep; candidates for the write probe.
const CANDIDATE_IDS: [u8; 9] = [1, 5, 16, 25, 42, 57, 82, 107, 151];

fn main() -> drift_plc::Result<()> {
    let mut args = env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port = args.next().and_then(|p| p.parse().ok());

    let mut config = ClientConfig::new(host);
    if let Some(port) = port {
        config = config.with_port(port);
    }
    println!("connecting to {}:{} ...", config.host, config.port);

    let mut client = Client::connect(config)?;
    println!("handshake complete, session fragment {}", client.fragment());

    println!("\n=== Probing write permission ===\n");

    for id in CANDIDATE_IDS {
        if client.is_writable(id)? {
            println!("sensor {id}: writable");
            println!("\nfirst writable sensor: {id}");
            client.close();
            return Ok(());
        }
        println!("sensor {id}: not writable");
    }

    println!("\nno writable sensor among the candidates");
    client.close();
    Ok(())
}
