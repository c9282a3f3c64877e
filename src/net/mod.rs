// Connectivity probe - one bounded TCP attempt per run, result persisted as
// a single-character flag file the UI reads later

use std::fs;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::resource::ResourceError;

pub const DEFAULT_PROBE_HOST: &str = "google.com";
pub const DEFAULT_PROBE_PORT: u16 = 80;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(3000);

/// Attempts a single TCP connection with a bounded timeout. DNS failure,
/// refusal and timeout all collapse to `false` on purpose; the flag only
/// answers "is the network there", not "why not".
pub fn probe(host: &str, port: u16, timeout: Duration) -> bool {
    let addr = match (host, port).to_socket_addrs() {
        Ok(mut addrs) => match addrs.next() {
            Some(addr) => addr,
            None => {
                debug!(host, port, "no addresses resolved");
                return false;
            }
        },
        Err(e) => {
            debug!(host, port, error = %e, "resolution failed");
            return false;
        }
    };

    match TcpStream::connect_timeout(&addr, timeout) {
        Ok(_) => {
            info!(host, port, "connectivity probe succeeded");
            true
        }
        Err(e) => {
            info!(host, port, error = %e, "connectivity probe failed");
            false
        }
    }
}

/// Persists the probe result as exactly `"1"` or `"0"`, overwriting any
/// prior content. This write is the one startup I/O that is allowed to
/// abort the run if it fails.
pub fn write_flag(path: &Path, online: bool) -> Result<(), ResourceError> {
    fs::write(path, if online { "1" } else { "0" }).map_err(|source| ResourceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the flag back the way the UI does. Anything other than a clean
/// `"0"`/`"1"` means no usable flag.
pub fn read_flag(path: &Path) -> Option<bool> {
    match fs::read_to_string(path).ok()?.trim() {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}
