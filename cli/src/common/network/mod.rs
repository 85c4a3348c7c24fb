//! # Network Utilities Module (`common::network`)
//!
//! File: cli/src/common/network/mod.rs
//!
//! ## Overview
//!
//! Small network discovery helpers used when starting the chat server:
//! - `find_available_port`: binds the requested port, optionally stepping to
//!   the next ones if it is taken
//! - `local_ip`: best-effort detection of a LAN address, so the startup
//!   banner can print a URL reachable from other machines
//!
use crate::core::error::Result;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::net::{TcpListener, UdpSocket};
use tracing::{debug, info, warn};

/// Documentation-range address, used only to pick the outbound interface.
const ROUTE_TARGET_ADDR: (Ipv4Addr, u16) = (Ipv4Addr::new(192, 0, 2, 1), 9);

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port` on `host`, then the following ports, up to
/// `max_attempts` ports in total. With `max_attempts == 1` only the requested
/// port is tried, which is what a platform-assigned `PORT` needs.
///
/// ## Returns
///
/// * `Result<SocketAddr>`: The first address that could be bound.
///
/// ## Errors
///
/// Returns an error if none of the tried ports could be bound.
pub async fn find_available_port(
    host: IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(host, current_port);

        match TcpListener::bind(addr).await {
            Ok(listener) => {
                // Only probing; the server binds again right after.
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, successfully bound to available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}).",
                    attempt + 1,
                    current_port,
                    host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} port(s).",
        host,
        start_port,
        max_attempts
    )
}

/// # Local IP Address (`local_ip`)
///
/// Returns the address of the interface the OS would route outbound traffic
/// through, or `None` if there is no such route or it is a loopback or
/// unspecified address. Connecting a UDP socket only selects the route; no
/// packet is sent.
pub async fn local_ip() -> Option<IpAddr> {
    let socket = match UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await {
        Ok(socket) => socket,
        Err(e) => {
            warn!("Could not open a UDP socket for IP detection: {}", e);
            return None;
        }
    };
    if let Err(e) = socket.connect(ROUTE_TARGET_ADDR).await {
        debug!("No outbound route for local IP detection: {}", e);
        return None;
    }
    match socket.local_addr() {
        Ok(addr) if !addr.ip().is_loopback() && !addr.ip().is_unspecified() => {
            info!("Found local IP: {}", addr.ip());
            Some(addr.ip())
        }
        Ok(addr) => {
            debug!("Routed through {}, not a network address", addr.ip());
            None
        }
        Err(e) => {
            warn!("Could not read local socket address: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_available_port_start_is_free() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        // Let the OS pick a free port, release it, then ask for it.
        let probe = TcpListener::bind(SocketAddr::new(host, 0)).await?;
        let start_port = probe.local_addr()?.port();
        drop(probe);

        let addr = find_available_port(host, start_port, 1).await?;

        assert_eq!(addr.port(), start_port);
        assert_eq!(addr.ip(), host);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_port_start_occupied() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let listener = TcpListener::bind(SocketAddr::new(host, 0)).await?;
        let start_port = listener.local_addr()?.port();

        let addr = find_available_port(host, start_port, 5).await?;

        assert!(addr.port() > start_port);
        assert!(addr.port() < start_port.saturating_add(5));
        Ok(())
    }

    #[tokio::test]
    async fn test_single_attempt_fails_when_occupied() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let listener = TcpListener::bind(SocketAddr::new(host, 0)).await?;
        let port = listener.local_addr()?.port();

        let result = find_available_port(host, port, 1).await;

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Could not find an available port"));
        Ok(())
    }

    #[tokio::test]
    async fn test_local_ip_is_a_network_address() {
        // Sandboxes may have no route at all; only check what is returned.
        if let Some(ip) = local_ip().await {
            assert!(!ip.is_loopback());
            assert!(!ip.is_unspecified());
        }
    }
}
