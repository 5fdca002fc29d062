//! VigilEngine: owns the subsystems, builds them from config, rebuilds
//! in-memory state from storage.

use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::info;

use vigil_core::clock::{days_saturating, saturating_sub};
use vigil_core::models::{Intervention, InterventionDueEvent, ScorePoint, Subject};
use vigil_core::traits::{IDecayStrategy, IDeliveryChannel, IScoreModel, IVigilStorage};
use vigil_core::{Clock, SystemClock, VigilConfig, VigilResult};
use vigil_decay::DecayPredictor;
use vigil_graph::{GraphSnapshot, MemoryGraphStore};
use vigil_interventions::{InterventionPlanner, InterventionScheduler, Proposal};
use vigil_observability::tracing_setup::events;
use vigil_observability::MetricsCollector;
use vigil_scoring::{ScoreAggregator, WeightedMeanModel};
use vigil_storage::StorageEngine;
use vigil_trends::TrendTracker;

/// Options for [`VigilEngine::open`].
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Path to the SQLite database. If None, uses in-memory.
    pub db_path: Option<PathBuf>,
    /// TOML configuration string. If None, uses defaults.
    pub config_toml: Option<String>,
}

pub struct VigilEngine {
    pub(crate) config: VigilConfig,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) storage: Arc<dyn IVigilStorage>,
    pub(crate) channel: Arc<dyn IDeliveryChannel>,
    pub(crate) subjects: DashMap<String, Subject>,
    pub(crate) aggregator: ScoreAggregator,
    pub(crate) score_model: Arc<dyn IScoreModel>,
    pub(crate) decay: DecayPredictor,
    pub(crate) graphs: MemoryGraphStore,
    pub(crate) scheduler: InterventionScheduler,
    pub(crate) planner: InterventionPlanner,
    pub(crate) trends: TrendTracker,
    pub(crate) events: broadcast::Sender<InterventionDueEvent>,
    pub(crate) metrics: Mutex<MetricsCollector>,
    pub(crate) sweeps: AtomicU64,
}

impl VigilEngine {
    /// Build an engine over existing storage. Nothing is read from storage
    /// until [`hydrate`](Self::hydrate).
    pub fn new(
        config: VigilConfig,
        storage: Arc<dyn IVigilStorage>,
        channel: Arc<dyn IDeliveryChannel>,
    ) -> VigilResult<Self> {
        config.validate()?;
        let aggregator = ScoreAggregator::from_config(&config.scoring)?;
        let (events, _) = broadcast::channel(config.runtime.event_buffer);
        Ok(Self {
            clock: Arc::new(SystemClock),
            storage,
            channel,
            subjects: DashMap::new(),
            aggregator,
            score_model: Arc::new(WeightedMeanModel::default()),
            decay: DecayPredictor::from_config(&config.decay),
            graphs: MemoryGraphStore::new(),
            scheduler: InterventionScheduler::new(&config.scheduler),
            planner: InterventionPlanner::from_config(&config.scheduler, &config.decay),
            trends: TrendTracker::new(&config.trends),
            events,
            metrics: Mutex::new(MetricsCollector::new()),
            sweeps: AtomicU64::new(0),
            config,
        })
    }

    /// Parse config, open SQLite storage (file or in-memory), and hydrate.
    pub fn open(opts: EngineOptions, channel: Arc<dyn IDeliveryChannel>) -> VigilResult<Self> {
        let config = match &opts.config_toml {
            Some(toml_str) => VigilConfig::from_toml(toml_str)?,
            None => VigilConfig::default(),
        };
        let storage = match &opts.db_path {
            Some(path) => StorageEngine::open_with_config(path, &config.storage)?,
            None => StorageEngine::open_in_memory()?,
        };
        let engine = Self::new(config, Arc::new(storage), channel)?;
        engine.hydrate()?;
        Ok(engine)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the model used for raw signal scoring.
    pub fn with_score_model(mut self, model: Arc<dyn IScoreModel>) -> Self {
        self.score_model = model;
        self
    }

    pub fn with_decay_strategy(mut self, strategy: Arc<dyn IDecayStrategy>) -> Self {
        self.decay = DecayPredictor::new(strategy, &self.config.decay);
        self
    }

    pub fn config(&self) -> &VigilConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Receive an event each time an intervention is delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<InterventionDueEvent> {
        self.events.subscribe()
    }

    pub fn metrics(&self) -> MetricsCollector {
        match self.metrics.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Rebuild subjects, memory graphs, intervention books, and trend series
    /// (within the retention period) from storage.
    pub fn hydrate(&self) -> VigilResult<()> {
        let now = self.clock.now();
        let from = saturating_sub(now, days_saturating(self.config.trends.retention_days));
        let subjects = self.storage.list_subjects()?;
        let subject_count = subjects.len();
        let mut intervention_count = 0;

        for subject in subjects {
            if subject.has_memory_graph() {
                self.graphs.load(GraphSnapshot {
                    subject_id: subject.id.clone(),
                    entities: self.storage.list_memories(&subject.id)?,
                    relations: self.storage.list_relations(&subject.id)?,
                })?;
            }

            let stored = self.storage.list_interventions(&subject.id, None)?;
            intervention_count += stored.len();
            self.scheduler.load(stored)?;

            let points = self
                .storage
                .score_results(&subject.id, from, now)?
                .into_iter()
                .map(|s| ScorePoint {
                    at: s.created_at,
                    composite: s.composite,
                })
                .collect();
            self.trends.load(&subject.id, points);

            self.subjects.insert(subject.id.clone(), subject);
        }

        info!(
            subjects = subject_count,
            interventions = intervention_count,
            "engine hydrated from storage"
        );
        Ok(())
    }

    pub(crate) fn record_metrics(&self, f: impl FnOnce(&mut MetricsCollector)) {
        match self.metrics.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    /// Offer a candidate to its subject's book and persist the result in the
    /// same critical section. A storage failure leaves the book untouched.
    pub(crate) fn propose(
        &self,
        candidate: Intervention,
        now: DateTime<Utc>,
    ) -> VigilResult<Proposal> {
        let subject_id = candidate.subject_id.clone();
        let proposal = self.scheduler.transact(&subject_id, |book| {
            let proposal = book.propose(candidate, now);
            self.storage
                .upsert_interventions(std::slice::from_ref(proposal.intervention()))?;
            Ok(proposal)
        })?;
        self.note_proposal(&proposal);
        Ok(proposal)
    }

    pub(crate) fn note_proposal(&self, proposal: &Proposal) {
        let intervention = proposal.intervention();
        let scheduled_for = intervention.scheduled_for.to_rfc3339();
        if proposal.is_created() {
            events::intervention_scheduled(
                &intervention.subject_id,
                &intervention.id,
                intervention.intervention_type.as_str(),
                &scheduled_for,
            );
        } else {
            events::intervention_coalesced(&intervention.subject_id, &intervention.id, &scheduled_for);
        }
        self.record_metrics(|m| m.interventions.record_proposal(proposal.is_created()));
    }

    /// Write lifecycle changes the engine cannot undo (sweep results). A
    /// failure is logged and the in-memory state stays authoritative.
    pub(crate) fn persist_best_effort(&self, operation: &str, interventions: &[Intervention]) {
        if let Err(e) = self.storage.upsert_interventions(interventions) {
            events::storage_degraded(operation, &e.to_string());
        }
    }
}

impl std::fmt::Debug for VigilEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VigilEngine")
            .field("subjects", &self.subjects.len())
            .field("decay", &self.decay)
            .field("score_model", &self.score_model.name())
            .finish_non_exhaustive()
    }
}
