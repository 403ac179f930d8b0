use std::error::Error;
use std::thread;

use tracing::{error, info, warn};
use tundev::{Device, EventMonitor, Tun, TunConfig};

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = TunConfig::default();
    let tun = Tun::create_with(&config)?;
    tun.configure(&config)?;
    info!(name = tun.name(), "tun device ready");

    match EventMonitor::create() {
        Ok(monitor) => {
            thread::spawn(move || watch(monitor));
        }
        Err(e) => warn!("interface events unavailable: {}", e),
    }

    dump(&tun)?;
    Ok(())
}

fn watch(monitor: EventMonitor) {
    loop {
        match monitor.wait_address_change() {
            Ok(event) => info!(%event, "interface address changed"),
            Err(e) => {
                error!("event monitor stopped: {}", e);
                return;
            }
        }
    }
}

/// Logs every packet the kernel routes into the device.
fn dump<D: Device>(device: &D) -> std::io::Result<()> {
    let mut buf = [0u8; 1504];
    loop {
        let n = device.recv(&mut buf)?;
        if n == 0 {
            continue;
        }
        info!(len = n, version = buf[0] >> 4, "packet from kernel");
    }
}
