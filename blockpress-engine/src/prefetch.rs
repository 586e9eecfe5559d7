//! Prefetch orchestrator. Runs every node's enrich function before render.
//!
//! One pass walks the tree in canonical order, schedules an enrichment task
//! per node whose block declares an enricher, and waits for all of them to
//! settle. Concurrency is capped by a semaphore so a large page cannot fan out
//! into hundreds of simultaneous backend calls. Each call has its own
//! deadline; a failure, timeout or panic is recorded against that node only.

use crate::error::{EngineError, EngineResult, PrefetchError};
use blockpress_locale::{LocaleRequest, resolve_fields};
use blockpress_model::{ContentTree, ValueStore};
use blockpress_registry::{BlockRegistry, RenderContext};
use futures::FutureExt;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Node id → enrichment data for one render pass. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentResults {
    data: HashMap<String, Value>,
    failures: HashMap<String, PrefetchError>,
}

impl EnrichmentResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data produced for a node; `None` if it has no enricher or it failed.
    pub fn get(&self, node_id: &str) -> Option<&Value> {
        self.data.get(node_id)
    }

    pub fn failure(&self, node_id: &str) -> Option<&PrefetchError> {
        self.failures.get(node_id)
    }

    pub fn is_failed(&self, node_id: &str) -> bool {
        self.failures.contains_key(node_id)
    }

    pub fn succeeded(&self) -> usize {
        self.data.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &PrefetchError> {
        self.failures.values()
    }

    pub fn insert(&mut self, node_id: impl Into<String>, data: Value) {
        self.data.insert(node_id.into(), data);
    }

    pub fn record_failure(&mut self, error: PrefetchError) {
        self.failures.insert(error.node_id().to_string(), error);
    }
}

#[derive(Clone)]
struct Job {
    node_id: String,
    block_type: String,
}

/// Schedules enrichment with bounded concurrency.
#[derive(Debug, Clone)]
pub struct PrefetchOrchestrator {
    registry: Arc<BlockRegistry>,
    max_in_flight: usize,
    timeout: Duration,
}

impl PrefetchOrchestrator {
    /// `max_in_flight` below 1 is raised to 1.
    pub fn new(registry: Arc<BlockRegistry>, max_in_flight: usize, timeout: Duration) -> Self {
        Self {
            registry,
            max_in_flight: max_in_flight.max(1),
            timeout,
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs one prefetch pass to completion.
    pub async fn enrich(
        &self,
        tree: &ContentTree,
        values: &ValueStore,
        locale: &LocaleRequest,
        ctx: &RenderContext,
    ) -> EnrichmentResults {
        // A token nobody holds cannot fire.
        self.enrich_cancellable(tree, values, locale, ctx, &CancellationToken::new())
            .await
            .unwrap_or_default()
    }

    /// Runs one prefetch pass, aborting in-flight calls if `cancel` fires.
    ///
    /// Returns only after every scheduled call has settled, or with
    /// [`EngineError::Cancelled`]; results that would arrive after
    /// cancellation are discarded.
    pub async fn enrich_cancellable(
        &self,
        tree: &ContentTree,
        values: &ValueStore,
        locale: &LocaleRequest,
        ctx: &RenderContext,
        cancel: &CancellationToken,
    ) -> EngineResult<EnrichmentResults> {
        let started = Instant::now();
        let ctx = Arc::new(ctx.clone());
        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        let mut tasks = JoinSet::new();
        let mut jobs: HashMap<Id, Job> = HashMap::new();
        let mut scheduled = HashSet::new();

        for visit in tree.traverse() {
            let node = visit.node;
            if !scheduled.insert(node.id.as_str()) {
                warn!(node_id = %node.id, "node id repeated in tree, enrichment skipped");
                continue;
            }
            let def = self.registry.lookup(&node.block_type);
            let Some(enricher) = def.enricher().cloned() else {
                continue;
            };

            let mut raw = values.values_for(&node.id);
            def.schema().apply_defaults(&mut raw);
            let resolved = resolve_fields(&raw, def.schema(), locale);

            let job = Job {
                node_id: node.id.clone(),
                block_type: node.block_type.clone(),
            };
            let permits = Arc::clone(&permits);
            let ctx = Arc::clone(&ctx);
            let timeout = self.timeout;

            let task_job = job.clone();
            let handle = tasks.spawn(async move {
                let job = task_job;
                // The semaphore is never closed, so this only waits.
                let _permit = permits.acquire_owned().await.ok();
                debug!(node_id = %job.node_id, block_type = %job.block_type, "enrichment started");

                let call = AssertUnwindSafe(enricher.enrich(&resolved, &ctx)).catch_unwind();
                match tokio::time::timeout(timeout, call).await {
                    Ok(Ok(Ok(data))) => Ok(data),
                    Ok(Ok(Err(source))) => Err(PrefetchError::Failed {
                        node_id: job.node_id.clone(),
                        block_type: job.block_type.clone(),
                        source,
                    }),
                    Ok(Err(_)) => Err(PrefetchError::Panicked {
                        node_id: job.node_id.clone(),
                        block_type: job.block_type.clone(),
                    }),
                    Err(_) => Err(PrefetchError::TimedOut {
                        node_id: job.node_id.clone(),
                        block_type: job.block_type.clone(),
                        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    }),
                }
            });
            jobs.insert(handle.id(), job);
        }

        let scheduled_count = tasks.len();
        let mut results = EnrichmentResults::new();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tasks.abort_all();
                    info!(pending = tasks.len(), "prefetch cancelled");
                    return Err(EngineError::Cancelled);
                }
                next = tasks.join_next_with_id() => match next {
                    None => break,
                    Some(Ok((id, Ok(data)))) => {
                        if let Some(job) = jobs.remove(&id) {
                            debug!(node_id = %job.node_id, "enrichment settled");
                            results.insert(job.node_id, data);
                        }
                    }
                    Some(Ok((id, Err(error)))) => {
                        jobs.remove(&id);
                        warn!(node_id = %error.node_id(), %error, "prefetch error");
                        results.record_failure(error);
                    }
                    Some(Err(e)) => {
                        let Some(job) = jobs.remove(&e.id()) else {
                            warn!(error = %e, "untracked enrichment task did not complete");
                            continue;
                        };
                        let error = if e.is_panic() {
                            PrefetchError::Panicked {
                                node_id: job.node_id,
                                block_type: job.block_type,
                            }
                        } else {
                            PrefetchError::Aborted {
                                node_id: job.node_id,
                                block_type: job.block_type,
                            }
                        };
                        warn!(node_id = %error.node_id(), %error, "prefetch error");
                        results.record_failure(error);
                    }
                },
            }
        }

        info!(
            nodes = scheduled.len(),
            enrichments = scheduled_count,
            succeeded = results.succeeded(),
            failed = results.failed(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "prefetch pass complete"
        );
        Ok(results)
    }
}
