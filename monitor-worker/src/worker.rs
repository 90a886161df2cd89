use chrono::Local;
use monitor_core::{LogSink, ProbeResult, ServiceConfiguration, Severity};

use crate::probe::Prober;
use crate::shutdown::Shutdown;

/// Layout of lifecycle timestamps, local time with UTC offset.
const LIFECYCLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Sweeps the configured hosts one after another, logging one result per
/// host, and sleeps between sweeps until shutdown is requested.
pub struct Worker<P, S> {
    config: ServiceConfiguration,
    prober: P,
    sink: S,
}

impl<P: Prober, S: LogSink> Worker<P, S> {
    pub fn new(config: ServiceConfiguration, prober: P, sink: S) -> Self {
        Self {
            config,
            prober,
            sink,
        }
    }

    pub async fn run(&self, mut shutdown: Shutdown) {
        self.sink.log(Severity::Info, &format!("Service started at: {}", now()));

        let interval = self.config.interval();

        while !shutdown.is_triggered() {
            self.sweep(&shutdown).await;

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown.wait() => {}
            }
        }

        self.sink.log(Severity::Info, &format!("Service stopped at: {}", now()));
    }

    async fn sweep(&self, shutdown: &Shutdown) {
        self.sink.log(Severity::Info, &format!("Worker running at: {}", now()));

        for host in &self.config.hosts {
            // An in-flight probe finishes, but no new one starts after shutdown.
            if shutdown.is_triggered() {
                break;
            }
            self.check_host(host).await;
        }
    }

    /// Probes one host and logs the result; returns it for callers that
    /// want to inspect it.
    pub async fn check_host(&self, host: &str) -> ProbeResult {
        self.sink.log(
            Severity::Info,
            &format!("Checking availability of host {}", host),
        );

        let started = Local::now();
        let outcome = self.prober.probe(host).await;
        let result = ProbeResult::new(started, host, outcome);

        match result.to_json() {
            Ok(json) => self.sink.log(result.severity(), &json),
            Err(e) => self.sink.log(
                Severity::Error,
                &format!("Failed to serialize result for host {}: {}", host, e),
            ),
        }

        result
    }
}

fn now() -> String {
    Local::now().format(LIFECYCLE_TIME_FORMAT).to_string()
}
