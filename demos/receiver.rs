//! Print every OSC message arriving on a UDP port.
//!
//! ```text
//! cargo run --example receiver -- 0.0.0.0:39539
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use oscwire::{Server, ServerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let addr: SocketAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| format!("0.0.0.0:{}", oscwire::DEFAULT_PORT))
        .parse()?;

    let server = Server::bind(ServerConfig::with_bind_addr(addr))?;
    println!("Listening for OSC on {}", server.local_addr());

    loop {
        while let Some(message) = server.dequeue() {
            println!("{message}");
        }
        std::thread::sleep(Duration::from_millis(16));
    }
}
