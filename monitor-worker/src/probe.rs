use std::future::Future;
use std::io;
use std::net::IpAddr;
use std::time::Duration;

use monitor_core::{ProbeOutcome, ReplyStatus};
use surge_ping::{Client as PingClient, Config as PingConfig, ICMP, PingIdentifier, PingSequence, SurgeError};
use thiserror::Error;
use tracing::debug;

/// Echo timeout applied to every probe; not configurable.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const PAYLOAD: [u8; 32] = [0; 32];

/// A single reachability check against one host.
///
/// Probes never fail: anything that goes wrong while probing is reported as
/// `ProbeOutcome::Fault` so the caller can move on to the next host.
pub trait Prober: Send + Sync {
    fn probe(&self, host: &str) -> impl Future<Output = ProbeOutcome> + Send;
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to resolve host {host}: {source}")]
    Resolution {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("resolving host {0} timed out")]
    ResolutionTimeout(String),

    #[error("no address found for host {0}")]
    NoAddress(String),

    #[error("failed to open ICMP socket: {0}")]
    Socket(#[source] io::Error),

    #[error("ICMP error: {0}")]
    Icmp(#[from] SurgeError),
}

/// ICMP echo prober, one echo request per probe.
#[derive(Debug, Clone)]
pub struct IcmpProber {
    timeout: Duration,
}

impl Default for IcmpProber {
    fn default() -> Self {
        Self::new()
    }
}

impl IcmpProber {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    async fn try_probe(&self, host: &str) -> Result<ReplyStatus, ProbeError> {
        let ip = resolve(host, self.timeout).await?;

        let config = match ip {
            IpAddr::V4(_) => PingConfig::default(),
            IpAddr::V6(_) => PingConfig::builder().kind(ICMP::V6).build(),
        };
        let client = PingClient::new(&config).map_err(ProbeError::Socket)?;

        let mut pinger = client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(self.timeout);

        match pinger.ping(PingSequence(0), &PAYLOAD).await {
            Ok((_, rtt)) => {
                debug!(%host, %ip, rtt_ms = rtt.as_secs_f64() * 1000.0, "echo reply");
                Ok(ReplyStatus::Success)
            }
            Err(e) => classify(e),
        }
    }
}

impl Prober for IcmpProber {
    async fn probe(&self, host: &str) -> ProbeOutcome {
        match self.try_probe(host).await {
            Ok(status) => ProbeOutcome::Reply(status),
            Err(e) => ProbeOutcome::Fault(e.to_string()),
        }
    }
}

/// Maps a failed echo onto a reply classification. Errors that say nothing
/// about the destination are faults of the probe itself.
fn classify(err: SurgeError) -> Result<ReplyStatus, ProbeError> {
    match err {
        SurgeError::Timeout { .. } => Ok(ReplyStatus::TimedOut),
        SurgeError::IOError(e) => match e.kind() {
            io::ErrorKind::HostUnreachable => Ok(ReplyStatus::DestinationHostUnreachable),
            io::ErrorKind::NetworkUnreachable => Ok(ReplyStatus::DestinationNetworkUnreachable),
            _ => Err(ProbeError::Icmp(SurgeError::IOError(e))),
        },
        SurgeError::MalformedPacket(_) | SurgeError::EchoRequestPacket => Ok(ReplyStatus::Unknown),
        other => Err(ProbeError::Icmp(other)),
    }
}

async fn resolve(host: &str, timeout: Duration) -> Result<IpAddr, ProbeError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let mut addrs = match tokio::time::timeout(timeout, tokio::net::lookup_host((host, 0))).await {
        Ok(Ok(addrs)) => addrs,
        Ok(Err(source)) => {
            return Err(ProbeError::Resolution {
                host: host.to_string(),
                source,
            });
        }
        Err(_) => return Err(ProbeError::ResolutionTimeout(host.to_string())),
    };

    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| ProbeError::NoAddress(host.to_string()))
}
