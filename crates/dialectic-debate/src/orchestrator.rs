//! Orchestrator - drives one debate against a response gateway
//!
//! The session lock is never held across a model call. Each attempt carries
//! the session epoch it started under; a reset bumps the epoch, and results
//! from an older epoch are dropped instead of touching the new state.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use dialectic_core::{
    DebateRecord, JudgeScenario, Judgement, Message, RecordedModels, Scenario, Side, Transcript,
};
use dialectic_llm::{ChatMessage, DebaterModels, LlmError, ResponseGateway};

use crate::config::DebateConfig;
use crate::error::DebateError;
use crate::generator::PromptGenerator;
use crate::prompts::{JudgeStyle, PromptSet};
use crate::rounds::{StructuredDebate, UnstructuredDebate};

/// Which debate transcript a pair of turns belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Structured,
    Unstructured,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Structured => "structured",
            Phase::Unstructured => "unstructured",
        }
    }
}

/// All state of one debate. Snapshots are plain clones.
#[derive(Debug, Clone)]
pub struct DebateSession {
    scenario: Scenario,
    models: DebaterModels,
    config: DebateConfig,
    baseline: Transcript,
    baseline_pending: HashSet<String>,
    structured: StructuredDebate,
    unstructured: UnstructuredDebate,
    judgement: Option<Judgement>,
    judging: bool,
    epoch: u64,
}

impl DebateSession {
    fn new(scenario: Scenario, models: DebaterModels, config: DebateConfig) -> Self {
        let mut structured = StructuredDebate::new(config);
        structured.set_models_assigned(models.debaters_assigned());
        Self {
            scenario,
            models,
            config,
            baseline: Transcript::new(),
            baseline_pending: HashSet::new(),
            structured,
            unstructured: UnstructuredDebate::new(config.unstructured_exchanges),
            judgement: None,
            judging: false,
            epoch: 0,
        }
    }

    /// Fresh state for `scenario`; in-flight work becomes stale
    fn reset(&mut self, scenario: Scenario) {
        let max_rounds = self.structured.max_rounds();
        let epoch = self.epoch + 1;
        *self = Self::new(scenario, self.models.clone(), self.config);
        self.structured.set_max_rounds(max_rounds);
        self.epoch = epoch;
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn models(&self) -> &DebaterModels {
        &self.models
    }

    pub fn baseline(&self) -> &Transcript {
        &self.baseline
    }

    pub fn structured(&self) -> &StructuredDebate {
        &self.structured
    }

    pub fn unstructured(&self) -> &UnstructuredDebate {
        &self.unstructured
    }

    pub fn judgement(&self) -> Option<&Judgement> {
        self.judgement.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.structured.is_generating()
            || self.unstructured.is_generating()
            || self.judging
            || !self.baseline_pending.is_empty()
    }

    /// Option text a model picked in its baseline answer
    pub fn baseline_answer(&self, model: &str) -> Option<&str> {
        let label = self.baseline.baseline_from(model)?.answer_label()?;
        self.scenario.answer_for_label(&label)
    }

    fn debater_model(&self, side: Side) -> &str {
        match side {
            Side::A => self.models.debater_a.trim(),
            Side::B => self.models.debater_b.trim(),
        }
    }

    fn transcript(&self, phase: Phase) -> &Transcript {
        match phase {
            Phase::Structured => self.structured.transcript(),
            Phase::Unstructured => self.unstructured.transcript(),
        }
    }

    fn pending_sides(&self, phase: Phase, round: u32) -> Vec<Side> {
        match phase {
            Phase::Structured => self.structured.pending_sides(round),
            Phase::Unstructured => self.unstructured.pending_sides(round),
        }
    }

    fn record(&mut self, phase: Phase, message: Message) {
        match phase {
            Phase::Structured => self.structured.record(message),
            Phase::Unstructured => self.unstructured.record(message),
        }
    }

    fn finish(&mut self, phase: Phase) {
        match phase {
            Phase::Structured => self.structured.finish(),
            Phase::Unstructured => self.unstructured.finish(),
        }
    }

    /// Self-describing dump of everything so far
    pub fn to_record(&self) -> DebateRecord {
        let mut record = DebateRecord::new(
            self.scenario.clone(),
            RecordedModels {
                debater_a: self.models.debater_a.clone(),
                debater_b: self.models.debater_b.clone(),
                judge: self.models.judge.clone(),
            },
        );
        record.baseline = self.baseline.clone();
        record.structured = self.structured.transcript().clone();
        record.unstructured = self.unstructured.transcript().clone();
        record.judgement = self.judgement.clone();
        record
    }
}

/// Drives baseline, structured, unstructured and judgment phases
pub struct DebateOrchestrator<G: ResponseGateway> {
    gateway: Arc<G>,
    generator: PromptGenerator,
    session: RwLock<DebateSession>,
}

impl<G: ResponseGateway> DebateOrchestrator<G> {
    /// Create an orchestrator with built-in prompts and limits
    pub fn new(gateway: Arc<G>, scenario: Scenario, models: DebaterModels) -> Result<Self, DebateError> {
        Self::with_config(gateway, scenario, models, DebateConfig::default(), PromptSet::default())
    }

    pub fn with_config(
        gateway: Arc<G>,
        scenario: Scenario,
        models: DebaterModels,
        config: DebateConfig,
        prompts: PromptSet,
    ) -> Result<Self, DebateError> {
        scenario.validate()?;
        Ok(Self {
            gateway,
            generator: PromptGenerator::new(prompts, &config),
            session: RwLock::new(DebateSession::new(scenario, models, config)),
        })
    }

    pub fn generator(&self) -> &PromptGenerator {
        &self.generator
    }

    /// Clone of the current state
    pub async fn snapshot(&self) -> DebateSession {
        self.session.read().await.clone()
    }

    pub async fn export(&self) -> DebateRecord {
        self.session.read().await.to_record()
    }

    /// Switch scenario. Everything is cleared and in-flight results are dropped.
    pub async fn set_scenario(&self, scenario: Scenario) -> Result<(), DebateError> {
        scenario.validate()?;
        let mut session = self.session.write().await;
        info!(scenario = %scenario.id, "Scenario selected");
        session.reset(scenario);
        Ok(())
    }

    /// Start the same scenario over
    pub async fn reset(&self) {
        let mut session = self.session.write().await;
        let scenario = session.scenario.clone();
        info!(scenario = %scenario.id, "Debate reset");
        session.reset(scenario);
    }

    /// Reassign role models; applies to subsequent generations
    pub async fn set_models(&self, models: DebaterModels) {
        let mut session = self.session.write().await;
        session.structured.set_models_assigned(models.debaters_assigned());
        session.models = models;
    }

    /// Change the structured round limit; returns the clamped value
    pub async fn set_max_rounds(&self, rounds: u32) -> u32 {
        self.session.write().await.structured.set_max_rounds(rounds)
    }

    /// Advance the current structured round without generating
    pub async fn next_round(&self) -> bool {
        self.session.write().await.structured.next_round()
    }

    pub async fn can_run_round(&self, round: u32) -> bool {
        self.session.read().await.structured.can_run_round(round)
    }

    // =========================================================================
    // Baseline
    // =========================================================================

    /// Ask one model the question without any debate.
    ///
    /// A model that already answered is not queried again; its stored
    /// response is returned.
    pub async fn fetch_baseline(&self, model: &str) -> Result<Message, DebateError> {
        let (epoch, prompt) = {
            let mut session = self.session.write().await;
            if let Some(existing) = session.baseline.baseline_from(model) {
                debug!(model, "Baseline already present");
                return Ok(existing.clone());
            }
            if session.baseline_pending.contains(model) {
                return Err(DebateError::Busy);
            }
            self.gateway
                .check_model(model)
                .map_err(|e| DebateError::from_gateway(model, e))?;
            session.baseline_pending.insert(model.to_string());
            (session.epoch, self.generator.baseline(&session.scenario))
        };
        debug!(phase = "baseline", model, prompt = ?prompt, "Generated prompt");

        let result = self.gateway.generate_response(model, prompt).await;

        let mut session = self.session.write().await;
        if session.epoch != epoch {
            return Err(self.discard_stale("baseline", model));
        }
        session.baseline_pending.remove(model);
        let raw = result.map_err(|e| self.generation_failed("baseline", model, e))?;
        debug!(phase = "baseline", model, response = %raw, "Received response");

        if let Some(existing) = session.baseline.baseline_from(model) {
            return Ok(existing.clone());
        }
        let message = Message::baseline(model, &raw);
        session.baseline.push(message.clone());
        Ok(message)
    }

    /// Baselines for every distinct assigned model, one after another.
    ///
    /// Models are independent: a failure for one does not stop the others.
    pub async fn fetch_all_baselines(&self) -> Vec<(String, Result<Message, DebateError>)> {
        let models: Vec<String> = {
            let session = self.session.read().await;
            session.models.unique().into_iter().map(String::from).collect()
        };
        let mut results = Vec::with_capacity(models.len());
        for model in models {
            let result = self.fetch_baseline(&model).await;
            results.push((model, result));
        }
        results
    }

    // =========================================================================
    // Structured debate
    // =========================================================================

    /// Run one structured round: A speaks, A's message is committed, then B
    /// speaks with A's round argument in view.
    ///
    /// After a partial failure, a retry only generates the side that is
    /// missing. Returns the messages produced by this call.
    pub async fn run_round(&self, round: u32) -> Result<Vec<Message>, DebateError> {
        let epoch = {
            let mut session = self.session.write().await;
            let sides = session.structured.pending_sides(round);
            session.structured.check_round(round).map_err(|b| b.into_error(round))?;
            for side in sides {
                let model = session.debater_model(side);
                self.gateway
                    .check_model(model)
                    .map_err(|e| DebateError::from_gateway(model, e))?;
            }
            session.structured.begin_round(round)?;
            session.epoch
        };
        info!(round, "Running round");

        let result = self.generate_pair(Phase::Structured, round, epoch).await;
        self.release(Phase::Structured, epoch).await;

        if result.is_ok() && self.session.read().await.structured.is_round_complete(round) {
            metrics::counter!("dialectic_rounds_completed_total").increment(1);
            info!(round, "Round complete");
        }
        result
    }

    /// Run whatever the current round is
    pub async fn run_current_round(&self) -> Result<Vec<Message>, DebateError> {
        let round = self.session.read().await.structured.current_round();
        self.run_round(round).await
    }

    /// Run rounds until the limit, advancing between them
    pub async fn run_all_rounds(&self) -> Result<Vec<Message>, DebateError> {
        let mut produced = Vec::new();
        loop {
            let (round, complete, finished) = {
                let session = self.session.read().await;
                let round = session.structured.current_round();
                (
                    round,
                    session.structured.is_round_complete(round),
                    session.structured.is_completed(),
                )
            };
            if finished {
                break;
            }
            if !complete {
                produced.extend(self.run_round(round).await?);
            }
            if !self.next_round().await {
                break;
            }
        }
        Ok(produced)
    }

    // =========================================================================
    // Unstructured debate
    // =========================================================================

    /// Run the next free-form A-then-B exchange
    pub async fn run_exchange(&self) -> Result<Vec<Message>, DebateError> {
        let (exchange, epoch) = {
            let mut session = self.session.write().await;
            if !session.models.debaters_assigned() {
                return Err(DebateError::MissingModel("debaters"));
            }
            for side in Side::ORDER {
                let model = session.debater_model(side);
                self.gateway
                    .check_model(model)
                    .map_err(|e| DebateError::from_gateway(model, e))?;
            }
            let exchange = session.unstructured.begin_exchange()?;
            (exchange, session.epoch)
        };
        info!(exchange, "Running unstructured exchange");

        let result = self.generate_pair(Phase::Unstructured, exchange, epoch).await;
        self.release(Phase::Unstructured, epoch).await;
        result
    }

    // =========================================================================
    // Judgment
    // =========================================================================

    /// Ask the judge model for a verdict on the structured transcript
    pub async fn judge(&self, style: JudgeStyle) -> Result<Judgement, DebateError> {
        let (epoch, model, prompt) = {
            let mut session = self.session.write().await;
            if session.judging {
                return Err(DebateError::Busy);
            }
            let model = session.models.judge.trim().to_string();
            if model.is_empty() {
                return Err(DebateError::MissingModel("judge"));
            }
            self.gateway
                .check_model(&model)
                .map_err(|e| DebateError::from_gateway(&model, e))?;
            let prompt = self.generator.judge(
                &JudgeScenario::from_scenario(&session.scenario),
                session.structured.transcript(),
                style,
            );
            session.judging = true;
            (session.epoch, model, prompt)
        };
        debug!(phase = "judgement", model = %model, prompt = ?prompt, "Generated prompt");

        let result = self.gateway.generate_response(&model, prompt).await;

        let mut session = self.session.write().await;
        if session.epoch != epoch {
            return Err(self.discard_stale("judgement", &model));
        }
        session.judging = false;
        let raw = result.map_err(|e| self.generation_failed("judgement", &model, e))?;
        debug!(phase = "judgement", model = %model, response = %raw, "Received response");

        let judgement = Judgement::from_model(&model, &raw);
        metrics::counter!("dialectic_judgements_total", "kind" => "model").increment(1);
        info!(model = %model, verdict = ?judgement.verdict, "Judgment recorded");
        session.judgement = Some(judgement.clone());
        Ok(judgement)
    }

    /// Record a human's judgment verbatim
    pub async fn record_human_judgment(&self, text: &str) -> Judgement {
        let judgement = Judgement::human(text);
        metrics::counter!("dialectic_judgements_total", "kind" => "human").increment(1);
        info!(verdict = ?judgement.verdict, "Human judgment recorded");
        self.session.write().await.judgement = Some(judgement.clone());
        judgement
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Generate the missing sides of one round, A strictly before B.
    ///
    /// Each prompt is built from the transcript as committed at that moment.
    async fn generate_pair(&self, phase: Phase, round: u32, epoch: u64) -> Result<Vec<Message>, DebateError> {
        let mut produced = Vec::new();
        for side in Side::ORDER {
            let (model, situation, prompt) = {
                let session = self.session.read().await;
                if session.epoch != epoch {
                    return Err(self.discard_stale(phase.as_str(), session.debater_model(side)));
                }
                if !session.pending_sides(phase, round).contains(&side) {
                    continue;
                }
                let transcript = session.transcript(phase);
                let prompt = match phase {
                    Phase::Structured => self.generator.debater(&session.scenario, transcript, side, round),
                    Phase::Unstructured => self.generator.unstructured(&session.scenario, transcript, side),
                };
                (
                    session.debater_model(side).to_string(),
                    session.scenario.situation.clone(),
                    prompt,
                )
            };
            debug!(phase = phase.as_str(), side = %side, round, model = %model, prompt = ?prompt, "Generated prompt");

            let raw = self.request(phase, &model, prompt).await?;
            debug!(phase = phase.as_str(), side = %side, round, model = %model, response = %raw, "Received response");

            let message = Message::debater(side, message_round(round), &model, &raw, &situation);
            let mut session = self.session.write().await;
            if session.epoch != epoch {
                return Err(self.discard_stale(phase.as_str(), &model));
            }
            session.record(phase, message.clone());
            produced.push(message);
        }
        Ok(produced)
    }

    async fn request(&self, phase: Phase, model: &str, prompt: Vec<ChatMessage>) -> Result<String, DebateError> {
        self.gateway
            .generate_response(model, prompt)
            .await
            .map_err(|e| self.generation_failed(phase.as_str(), model, e))
    }

    /// Clear the phase's in-flight flag unless the session moved on
    async fn release(&self, phase: Phase, epoch: u64) {
        let mut session = self.session.write().await;
        if session.epoch == epoch {
            session.finish(phase);
        }
    }

    fn generation_failed(&self, phase: &'static str, model: &str, source: LlmError) -> DebateError {
        metrics::counter!("dialectic_generation_failures_total", "phase" => phase).increment(1);
        warn!(phase, model, error = %source, "Generation failed");
        DebateError::from_gateway(model, source)
    }

    fn discard_stale(&self, phase: &'static str, model: &str) -> DebateError {
        metrics::counter!("dialectic_stale_results_total", "phase" => phase).increment(1);
        info!(phase, model, "Discarding result from a reset debate");
        DebateError::Superseded
    }
}

fn message_round(round: u32) -> i32 {
    i32::try_from(round).unwrap_or(i32::MAX)
}
