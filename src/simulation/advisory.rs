//! Signal timing advisory: external service boundary and fallback policy
//!
//! The advisory service is the only slow or unreliable dependency in the
//! simulation, so it sits behind a bounded-latency client: requests run on a
//! dedicated worker thread, the caller waits at most the configured timeout,
//! and every failure mode (timeout, transport error, unusable content)
//! collapses into the deterministic fallback plan. Failures are absorbed and
//! logged as warnings, never propagated; the next tick's request is the only
//! retry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::warn;

use super::config::SignalTiming;
use super::signal::TimingPlan;

/// Traffic state shipped to the advisory service
#[derive(Debug, Clone)]
pub struct AdvisoryRequest {
    /// Un-crossed vehicles per direction
    pub waiting: [u32; 4],
    /// Crossings per tick over the trailing window, per direction
    pub flow_rates: [f32; 4],
    /// Congestion estimate per direction, each in [0, 1]
    pub congestion: [f32; 4],
    /// Simulated hour of day, 0-23
    pub hour_of_day: u8,
}

/// An external timing advisor
///
/// Implementations return free-form text from which the client extracts
/// per-direction waiting estimates; the transport behind them is opaque.
pub trait AdvisoryService: Send {
    fn recommend(&mut self, request: &AdvisoryRequest) -> Result<String>;
}

impl<F> AdvisoryService for F
where
    F: FnMut(&AdvisoryRequest) -> Result<String> + Send,
{
    fn recommend(&mut self, request: &AdvisoryRequest) -> Result<String> {
        self(request)
    }
}

/// Deterministic in-process advisor that recommends timings straight from
/// the reported queue lengths; stands in when no external service is wired up
#[derive(Debug, Default)]
pub struct LocalQueueAdvisor;

impl AdvisoryService for LocalQueueAdvisor {
    fn recommend(&mut self, request: &AdvisoryRequest) -> Result<String> {
        let w = request.waiting;
        Ok(format!("{} {} {} {}", w[0], w[1], w[2], w[3]))
    }
}

/// Extract the four per-direction waiting estimates from a free-form
/// advisory response
///
/// Whitespace-separated tokens that parse as non-negative integers are taken
/// in order. All four positions must be present; a short or empty extraction
/// fails the whole response (there is no per-direction partial fallback).
pub fn parse_waiting_counts(response: &str) -> Result<[u32; 4]> {
    let tokens: Vec<u32> = response
        .split_whitespace()
        .filter_map(|token| token.parse().ok())
        .take(4)
        .collect();

    if tokens.len() < 4 {
        bail!(
            "expected 4 numeric tokens in advisory response, found {}",
            tokens.len()
        );
    }

    Ok([tokens[0], tokens[1], tokens[2], tokens[3]])
}

type Job = (u64, AdvisoryRequest);
type Reply = (u64, Result<String>);

/// Bounded-latency wrapper around an [`AdvisoryService`]
///
/// Each request is stamped with a sequence number published through a shared
/// counter. The worker skips jobs that have already been superseded, and the
/// caller discards replies whose stamp is not the current request, so a
/// timed-out result that arrives late is dropped rather than applied to the
/// wrong tick.
pub struct AdvisoryClient {
    job_tx: Sender<Job>,
    reply_rx: Receiver<Reply>,
    current_seq: Arc<AtomicU64>,
    next_seq: u64,
    timeout: Duration,
}

impl AdvisoryClient {
    /// Spawn the worker thread driving `service`
    pub fn new<S>(mut service: S, timeout: Duration) -> Self
    where
        S: AdvisoryService + 'static,
    {
        let (job_tx, job_rx) = unbounded::<Job>();
        let (reply_tx, reply_rx) = unbounded::<Reply>();
        let current_seq = Arc::new(AtomicU64::new(0));
        let worker_seq = current_seq.clone();

        std::thread::spawn(move || {
            while let Ok((seq, request)) = job_rx.recv() {
                // A newer request supersedes this one; skip the slow call.
                if seq != worker_seq.load(Ordering::Relaxed) {
                    continue;
                }
                let reply = service.recommend(&request);
                if reply_tx.send((seq, reply)).is_err() {
                    break;
                }
            }
        });

        Self {
            job_tx,
            reply_rx,
            current_seq,
            next_seq: 0,
            timeout,
        }
    }

    /// Request a timing plan for the given traffic state
    ///
    /// Never fails: timeout, transport failure, a disconnected worker, and
    /// unusable response content all return the fallback plan.
    pub fn request_plan(&mut self, request: &AdvisoryRequest, timing: &SignalTiming) -> TimingPlan {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.current_seq.store(seq, Ordering::Relaxed);

        if self.job_tx.send((seq, request.clone())).is_err() {
            warn!("advisory worker is gone; using fallback timing");
            return TimingPlan::fallback(timing);
        }

        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.reply_rx.recv_timeout(remaining) {
                // Reply to an already timed-out request; discard it.
                Ok((reply_seq, _)) if reply_seq != seq => continue,
                Ok((_, Ok(response))) => {
                    return match parse_waiting_counts(&response) {
                        Ok(counts) => TimingPlan::from_waiting_counts(counts, timing),
                        Err(err) => {
                            warn!("unusable advisory response: {err}");
                            TimingPlan::fallback(timing)
                        }
                    };
                }
                Ok((_, Err(err))) => {
                    warn!("advisory request failed: {err:#}");
                    return TimingPlan::fallback(timing);
                }
                Err(_) => {
                    warn!(
                        "no advisory response within {:?}; using fallback timing",
                        self.timeout
                    );
                    return TimingPlan::fallback(timing);
                }
            }
        }
    }
}
