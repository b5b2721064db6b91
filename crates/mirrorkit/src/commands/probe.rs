//! `probe`: average HEAD latency to each mirror of a tool.
//!
//! Requests are sequential. A failed attempt is discarded; a mirror with no
//! successful attempt is unreachable. The fastest reachable mirror is
//! highlighted.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use mirrorkit_registry::{Registry, ToolDefinition};
use serde::Serialize;
use tracing::{debug, warn};

use super::Context;
use crate::cli::CliError;

/// Latency under which a mirror is marked fast, in milliseconds
pub const FAST_THRESHOLD_MS: u64 = 200;

/// Attempts, per-request timeout and pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Requests per mirror
    pub attempts: u32,
    /// Per-request timeout
    pub timeout: Duration,
    /// Pause between attempts to the same mirror
    pub pause: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout: Duration::from_secs(5),
            pause: Duration::from_millis(100),
        }
    }
}

impl ProbeSettings {
    /// One attempt with a 500 ms timeout
    #[must_use]
    pub const fn quick() -> Self {
        Self {
            attempts: 1,
            timeout: Duration::from_millis(500),
            pause: Duration::ZERO,
        }
    }
}

/// One timed request to a URL.
pub trait LatencyProbe {
    /// Time a single request to `url`.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure when the request does not
    /// complete.
    fn measure(&self, url: &str) -> Result<Duration, String>;
}

/// [`LatencyProbe`] issuing HTTP `HEAD` requests.
#[derive(Debug)]
pub struct HttpHeadProbe {
    client: reqwest::blocking::Client,
}

impl HttpHeadProbe {
    /// Build a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Fails when the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, CliError> {
        // Fails only when a provider is already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mirrorkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CliError::other(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl LatencyProbe for HttpHeadProbe {
    fn measure(&self, url: &str) -> Result<Duration, String> {
        let start = Instant::now();
        self.client
            .head(url)
            .send()
            .map_err(|e| e.to_string())?;
        // Any HTTP response proves the mirror is reachable.
        Ok(start.elapsed())
    }
}

/// Probe outcome for one mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorLatency {
    /// Mirror key
    pub mirror: String,
    /// Mirror display name
    pub name: String,
    /// URL that was probed
    pub url: String,
    /// Average over successful attempts; `None` when every attempt failed
    pub average_ms: Option<u64>,
    /// Successful attempts
    pub successes: u32,
    /// Attempts made
    pub attempts: u32,
}

impl MirrorLatency {
    /// Reachable and under [`FAST_THRESHOLD_MS`]
    #[must_use]
    pub fn is_fast(&self) -> bool {
        self.average_ms.is_some_and(|ms| ms < FAST_THRESHOLD_MS)
    }
}

/// Result of probing every mirror of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    /// Tool key
    pub tool: String,
    /// One entry per mirror, in registry order
    pub mirrors: Vec<MirrorLatency>,
    /// Key of the fastest reachable mirror
    pub fastest: Option<String>,
}

fn probe_mirror(
    probe: &dyn LatencyProbe,
    url: &str,
    settings: &ProbeSettings,
) -> (Option<u64>, u32) {
    let mut total = Duration::ZERO;
    let mut successes = 0u32;
    for attempt in 0..settings.attempts {
        if attempt > 0 && !settings.pause.is_zero() {
            std::thread::sleep(settings.pause);
        }
        match probe.measure(url) {
            Ok(elapsed) => {
                debug!(url, attempt, elapsed_ms = elapsed.as_millis(), "Probe succeeded");
                total += elapsed;
                successes += 1;
            }
            Err(e) => debug!(url, attempt, error = %e, "Probe failed"),
        }
    }
    let average = (successes > 0).then(|| {
        u64::try_from((total / successes).as_millis()).unwrap_or(u64::MAX)
    });
    (average, successes)
}

/// Probe every mirror of `tool` in registry order.
#[must_use]
pub fn probe_tool(
    tool: &ToolDefinition,
    probe: &dyn LatencyProbe,
    settings: &ProbeSettings,
) -> ProbeReport {
    let mut mirrors = Vec::with_capacity(tool.mirrors().len());
    for (key, mirror) in tool.mirrors() {
        let url = match mirror.test_url() {
            Ok(url) => url,
            Err(e) => {
                warn!(tool = tool.key(), mirror = %key, error = %e, "No usable probe URL");
                mirrors.push(MirrorLatency {
                    mirror: key.clone(),
                    name: mirror.name.clone(),
                    url: mirror.url.clone(),
                    average_ms: None,
                    successes: 0,
                    attempts: 0,
                });
                continue;
            }
        };
        let (average_ms, successes) = probe_mirror(probe, &url, settings);
        mirrors.push(MirrorLatency {
            mirror: key.clone(),
            name: mirror.name.clone(),
            url,
            average_ms,
            successes,
            attempts: settings.attempts,
        });
    }

    // Ties keep the earlier mirror.
    let fastest = mirrors
        .iter()
        .filter_map(|m| m.average_ms.map(|ms| (ms, m)))
        .min_by_key(|(ms, _)| *ms)
        .map(|(_, m)| m.mirror.clone());

    ProbeReport {
        tool: tool.key().to_string(),
        mirrors,
        fastest,
    }
}

/// Text table of a probe report
#[must_use]
pub fn format_report(report: &ProbeReport, settings: &ProbeSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Latency for {} ({} attempt(s), {} ms timeout)",
        report.tool,
        settings.attempts,
        settings.timeout.as_millis()
    );
    for m in &report.mirrors {
        let _ = write!(out, "  {:<12} {:<20} ", m.mirror, m.name);
        match m.average_ms {
            Some(ms) => {
                let _ = write!(out, "{ms:>6} ms");
                if report.fastest.as_deref() == Some(m.mirror.as_str()) {
                    out.push_str("  fastest");
                } else if m.is_fast() {
                    out.push_str("  fast");
                }
            }
            None => out.push_str("unreachable"),
        }
        out.push('\n');
    }
    out
}

/// Probe the mirrors of `tool` and print the result.
///
/// # Errors
///
/// Unknown tool keys are configuration errors. Unreachable mirrors are not
/// errors.
pub fn execute(
    registry: &Registry,
    tool: &str,
    probe: &dyn LatencyProbe,
    settings: &ProbeSettings,
    ctx: &Context,
) -> Result<(), CliError> {
    let tool = registry.tool(tool)?;
    let report = probe_tool(tool, probe, settings);
    if report.fastest.is_none() {
        warn!(tool = tool.key(), "No mirror responded");
    }
    ctx.emit(&report, &format_report(&report, settings))
}
