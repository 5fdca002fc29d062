//! EngineRuntime: the worker pool and the periodic sweep.
//!
//! Synchronous engine calls run on tokio's blocking pool, gated by a
//! semaphore of `runtime.worker_count` permits. The sweep runs on its own
//! task every `runtime.sweep_interval_secs` until shutdown; a sweep that has
//! started always runs to completion.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use vigil_core::errors::{VigilError, VigilResult};
use vigil_core::models::{Intervention, InterventionAction, InterventionOutcome, MemoryEntity};

use crate::engine::VigilEngine;
use crate::memory::MemoryEvaluation;
use crate::scoring::ScoreOutcome;

pub struct EngineRuntime {
    engine: Arc<VigilEngine>,
    workers: Arc<Semaphore>,
    shutdown: CancellationToken,
    sweeper: Option<JoinHandle<()>>,
}

impl EngineRuntime {
    /// Start the sweep loop on the current tokio runtime.
    pub fn start(engine: Arc<VigilEngine>) -> Self {
        let runtime = &engine.config().runtime;
        let workers = Arc::new(Semaphore::new(runtime.worker_count));
        let period = Duration::from_secs(runtime.sweep_interval_secs);
        let shutdown = CancellationToken::new();
        let sweeper = tokio::spawn(sweep_loop(Arc::clone(&engine), period, shutdown.clone()));
        info!(
            workers = runtime.worker_count,
            sweep_interval_secs = runtime.sweep_interval_secs,
            "engine runtime started"
        );
        Self {
            engine,
            workers,
            shutdown,
            sweeper: Some(sweeper),
        }
    }

    pub fn engine(&self) -> &Arc<VigilEngine> {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.sweeper.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Run a synchronous engine call on a worker.
    pub async fn run<T, F>(&self, f: F) -> VigilResult<T>
    where
        F: FnOnce(&VigilEngine) -> VigilResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let _permit = Arc::clone(&self.workers)
            .acquire_owned()
            .await
            .map_err(|_| VigilError::Concurrency("worker pool closed".to_string()))?;
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || f(&engine))
            .await
            .map_err(|e| VigilError::Concurrency(format!("worker task failed: {e}")))?
    }

    pub async fn submit_assessment(
        &self,
        subject_id: impl Into<String>,
        responses: BTreeMap<String, u8>,
    ) -> VigilResult<ScoreOutcome> {
        let subject_id = subject_id.into();
        self.run(move |e| e.submit_assessment(&subject_id, responses))
            .await
    }

    pub async fn submit_signals(
        &self,
        subject_id: impl Into<String>,
        features: BTreeMap<String, f64>,
    ) -> VigilResult<ScoreOutcome> {
        let subject_id = subject_id.into();
        self.run(move |e| e.submit_signals(&subject_id, features))
            .await
    }

    pub async fn upsert_memory(&self, entity: MemoryEntity) -> VigilResult<MemoryEntity> {
        self.run(move |e| e.upsert_memory(entity)).await
    }

    pub async fn evaluate_memory(
        &self,
        subject_id: impl Into<String>,
        memory_id: impl Into<String>,
    ) -> VigilResult<MemoryEvaluation> {
        let (subject_id, memory_id) = (subject_id.into(), memory_id.into());
        self.run(move |e| e.evaluate_memory(&subject_id, &memory_id))
            .await
    }

    pub async fn acknowledge(
        &self,
        intervention_id: impl Into<String>,
        action: InterventionAction,
        outcome: Option<InterventionOutcome>,
    ) -> VigilResult<Intervention> {
        let intervention_id = intervention_id.into();
        self.run(move |e| e.acknowledge(&intervention_id, action, outcome))
            .await
    }

    /// Stop the sweep loop, waiting for a running sweep to finish.
    pub async fn shutdown(mut self) -> VigilResult<()> {
        self.shutdown.cancel();
        if let Some(handle) = self.sweeper.take() {
            handle
                .await
                .map_err(|e| VigilError::Concurrency(format!("sweep task failed: {e}")))?;
        }
        info!("engine runtime stopped");
        Ok(())
    }
}

impl Drop for EngineRuntime {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn sweep_loop(engine: Arc<VigilEngine>, period: Duration, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) = engine.sweep_once().await {
                    warn!(error = %e, "sweep failed");
                }
            }
        }
    }
    debug!("sweep loop exited");
}
