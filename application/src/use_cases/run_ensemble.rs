//! Run Ensemble use case
//!
//! Fans a query out to every requested model in parallel, scores and ranks
//! the replies, then serves either the single best response or a blended
//! composite of the top responses.
//!
//! Model failures are data, not errors: a timed-out or erroring model
//! becomes a failed candidate in the round report. The use case itself
//! only fails on bad input or cancellation.

use crate::config::EnsembleParams;
use crate::ports::exchange_log::{ExchangeEvent, ExchangeLogger, NoExchangeLogger};
use crate::ports::model_client::{ClientRegistry, ModelClient};
use crate::ports::progress::{EnsembleProgress, NoProgress};
use chorus_domain::{
    BlendDecision, CandidateError, CandidateResponse, CapabilityTable, EnsembleOutcome,
    EnsembleVerdict, NoValidResponse, Query, QueryCategory, Ranking, RankingOutcome,
    ResponseRanker, blend, decide, truncate_str,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during ensemble execution
#[derive(Error, Debug)]
pub enum RunEnsembleError {
    #[error("No models requested")]
    NoModels,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Cancelled")]
    Cancelled,
}

/// Input for the RunEnsemble use case
#[derive(Debug, Clone)]
pub struct RunEnsembleInput {
    /// The user's query
    pub query: String,
    /// Models to fan out to, in preference order
    pub models: Vec<String>,
    /// Overrides the category derived from the query text
    pub category_hint: Option<QueryCategory>,
}

impl RunEnsembleInput {
    pub fn new(query: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            query: query.into(),
            models,
            category_hint: None,
        }
    }

    pub fn with_category_hint(mut self, category: QueryCategory) -> Self {
        self.category_hint = Some(category);
        self
    }
}

/// Use case for running one ensemble round.
///
/// Flow:
/// 1. Validate input and build the [`Query`]
/// 2. Fan out to all requested models in parallel (per-call timeout)
/// 3. Rank the candidates
/// 4. Decide single vs blend and assemble the verdict
pub struct RunEnsembleUseCase {
    registry: Arc<ClientRegistry>,
    ranker: ResponseRanker,
    params: EnsembleParams,
    exchange_logger: Arc<dyn ExchangeLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl RunEnsembleUseCase {
    pub fn new(registry: Arc<ClientRegistry>, capabilities: Arc<CapabilityTable>) -> Self {
        Self {
            registry,
            ranker: ResponseRanker::new(capabilities),
            params: EnsembleParams::default(),
            exchange_logger: Arc::new(NoExchangeLogger),
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: EnsembleParams) -> Self {
        self.params = params;
        self
    }

    /// Replace the default ranker, e.g. to change the factual-override model
    pub fn with_ranker(mut self, ranker: ResponseRanker) -> Self {
        self.ranker = ranker;
        self
    }

    /// Create with an exchange logger.
    pub fn with_exchange_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.exchange_logger = logger;
        self
    }

    /// Cancelling the token aborts all in-flight model calls.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the round with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunEnsembleInput,
    ) -> Result<EnsembleOutcome, RunEnsembleError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the round with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunEnsembleInput,
        progress: &dyn EnsembleProgress,
    ) -> Result<EnsembleOutcome, RunEnsembleError> {
        if input.models.is_empty() {
            return Err(RunEnsembleError::NoModels);
        }
        let Some(query) = Query::try_new(input.query.as_str()) else {
            return Err(RunEnsembleError::InvalidQuery(
                "query text is empty".to_string(),
            ));
        };
        let query = match input.category_hint {
            Some(category) => query.with_category(category),
            None => query,
        };

        info!(
            "Starting ensemble of {} models: {}",
            input.models.len(),
            truncate_str(query.text(), 80)
        );
        self.exchange_logger.log(ExchangeEvent::new(
            "query_received",
            serde_json::json!({
                "query": query.text(),
                "category": query.category().to_string(),
                "complexity": query.complexity(),
                "models": input.models.clone(),
            }),
        ));

        progress.on_fanout_start(input.models.len());
        let candidates = self
            .collect_candidates(&input.models, query.text(), progress)
            .await?;

        for candidate in &candidates {
            self.exchange_logger.log(ExchangeEvent::new(
                "model_response",
                serde_json::json!({
                    "model": candidate.model,
                    "ok": candidate.is_valid(),
                    "latency_ms": candidate.latency_ms,
                }),
            ));
        }

        let ranking = match self.ranker.rank(&query, &candidates) {
            RankingOutcome::Ranked(ranking) => ranking,
            RankingOutcome::NoValidCandidates => {
                warn!("No model produced usable text");
                progress.on_ranking_complete(0);
                let report = NoValidResponse::from_candidates(&candidates);
                self.exchange_logger.log(ExchangeEvent::new(
                    "verdict",
                    serde_json::json!({
                        "answered": false,
                        "attempted": report.attempted.clone(),
                    }),
                ));
                return Ok(EnsembleOutcome::NoValidResponse(report));
            }
        };
        progress.on_ranking_complete(ranking.len());
        self.exchange_logger.log(ExchangeEvent::new(
            "ranking_complete",
            serde_json::json!({
                "entries": ranking
                    .entries()
                    .iter()
                    .map(|e| serde_json::json!({ "model": e.model, "score": e.score }))
                    .collect::<Vec<_>>(),
            }),
        ));

        let decision = decide(&query, ranking.len());
        debug!("Blend decision: {:?}", decision);
        progress.on_blend_decision(&decision);

        let verdict = assemble_verdict(decision, ranking, &candidates);
        info!(
            "Ensemble complete: {} candidate(s) ranked, blended={}",
            verdict.ranking.len(),
            verdict.blended
        );
        self.exchange_logger
            .log(ExchangeEvent::new("verdict", verdict.to_json()));

        Ok(EnsembleOutcome::Answer(verdict))
    }

    /// Query all requested models in parallel.
    ///
    /// Returns one candidate per requested model, in request order, so
    /// downstream ranking is deterministic regardless of completion order.
    async fn collect_candidates(
        &self,
        models: &[String],
        prompt: &str,
        progress: &dyn EnsembleProgress,
    ) -> Result<Vec<CandidateResponse>, RunEnsembleError> {
        let mut join_set = JoinSet::new();

        for model in models {
            let client = self.registry.get(model);
            let model = model.clone();
            let prompt = prompt.to_string();
            let timeout = self.params.per_call_timeout;

            join_set.spawn(async move { call_model(model, client, prompt, timeout).await });
        }

        let mut candidates = Vec::new();

        loop {
            let result = if let Some(ref token) = self.cancellation_token {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        join_set.abort_all();
                        return Err(RunEnsembleError::Cancelled);
                    }
                    result = join_set.join_next() => result,
                }
            } else {
                join_set.join_next().await
            };

            let Some(result) = result else {
                break; // All calls complete
            };

            match result {
                Ok(candidate) => {
                    if candidate.is_valid() {
                        debug!("Model {} responded", candidate.model);
                    } else if let Some(error) = candidate.error() {
                        warn!("Model {} failed: {}", candidate.model, error);
                    } else {
                        warn!("Model {} returned blank text", candidate.model);
                    }
                    progress.on_model_complete(&candidate.model, candidate.is_valid());
                    candidates.push(candidate);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        // Completion order is nondeterministic; restore request order
        candidates.sort_by_key(|c| {
            models
                .iter()
                .position(|m| *m == c.model)
                .unwrap_or(usize::MAX)
        });

        Ok(candidates)
    }
}

/// Turn the blend decision into the final verdict.
///
/// `blended` reflects what actually happened: a blend that degraded to the
/// top-ranked text verbatim is served as a single answer.
fn assemble_verdict(
    decision: BlendDecision,
    ranking: Ranking,
    candidates: &[CandidateResponse],
) -> EnsembleVerdict {
    let best_model = ranking
        .best()
        .map(|e| e.model.clone())
        .unwrap_or_default();
    let best_text = candidates
        .iter()
        .find(|c| c.model == best_model)
        .and_then(|c| c.text())
        .unwrap_or_default()
        .to_string();

    let (final_text, chosen_models, blended) = match decision.strategy() {
        Some(strategy) => {
            let composite = blend(strategy, &ranking, candidates);
            if composite.text.is_empty() {
                (best_text.clone(), vec![best_model.clone()], false)
            } else {
                let blended = composite.text != best_text;
                (composite.text, composite.contributors, blended)
            }
        }
        None => (best_text.clone(), vec![best_model.clone()], false),
    };

    EnsembleVerdict::new(
        final_text,
        chosen_models,
        blended,
        decision.strategy(),
        ranking.into_entries(),
    )
}

/// One model call: resolve the client, enforce the per-call timeout, and
/// fold every failure mode into the candidate itself.
async fn call_model(
    model: String,
    client: Option<Arc<dyn ModelClient>>,
    prompt: String,
    timeout: Option<Duration>,
) -> CandidateResponse {
    let Some(client) = client else {
        return CandidateResponse::failed(
            model,
            CandidateError::CallFailed("no client registered".to_string()),
        );
    };

    let started = Instant::now();
    let call = client.invoke(&prompt);
    let result = if let Some(timeout) = timeout {
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                return CandidateResponse::failed(model, CandidateError::Timeout)
                    .with_latency_ms(started.elapsed().as_millis() as u64);
            }
        }
    } else {
        call.await
    };
    let latency_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(text) if text.trim().is_empty() => {
            CandidateResponse::failed(model, CandidateError::EmptyResponse)
                .with_latency_ms(latency_ms)
        }
        Ok(text) => CandidateResponse::answered(model, text).with_latency_ms(latency_ms),
        Err(error) => {
            CandidateResponse::failed(model, CandidateError::CallFailed(error.to_string()))
                .with_latency_ms(latency_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::model_client::ModelCallError;
    use async_trait::async_trait;
    use chorus_domain::BlendStrategy;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockClient {
        name: String,
        script: Mutex<VecDeque<Result<String, ModelCallError>>>,
    }

    #[async_trait]
    impl ModelClient for MockClient {
        fn model_name(&self) -> &str {
            &self.name
        }

        async fn invoke(&self, _prompt: &str) -> Result<String, ModelCallError> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ModelCallError::Unavailable("script exhausted".into())))
        }
    }

    struct SlowClient {
        name: String,
        delay: Duration,
        reply: String,
    }

    #[async_trait]
    impl ModelClient for SlowClient {
        fn model_name(&self) -> &str {
            &self.name
        }

        async fn invoke(&self, _prompt: &str) -> Result<String, ModelCallError> {
            tokio::time::sleep(self.delay).await;
            Ok(self.reply.clone())
        }
    }

    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ExchangeLogger for RecordingLogger {
        fn log(&self, event: ExchangeEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    fn scripted(name: &str, script: Vec<Result<String, ModelCallError>>) -> Arc<dyn ModelClient> {
        Arc::new(MockClient {
            name: name.to_string(),
            script: Mutex::new(VecDeque::from(script)),
        })
    }

    fn answering(name: &str, text: &str) -> Arc<dyn ModelClient> {
        scripted(name, vec![Ok(text.to_string())])
    }

    fn slow(name: &str, delay: Duration, reply: &str) -> Arc<dyn ModelClient> {
        Arc::new(SlowClient {
            name: name.to_string(),
            delay,
            reply: reply.to_string(),
        })
    }

    fn registry_of(clients: Vec<Arc<dyn ModelClient>>) -> Arc<ClientRegistry> {
        let mut registry = ClientRegistry::new();
        for client in clients {
            registry.register(client);
        }
        Arc::new(registry)
    }

    fn use_case(registry: Arc<ClientRegistry>) -> RunEnsembleUseCase {
        RunEnsembleUseCase::new(registry, Arc::new(CapabilityTable::with_defaults()))
    }

    fn model_names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_factual_round_selects_designated_model() {
        let registry = registry_of(vec![
            answering("gpt-4o", "The capital of France is Paris."),
            answering("claude-3-opus", "Paris is the capital of France."),
            answering("mistral-large", "Paris."),
        ]);
        let use_case = use_case(registry);
        let input = RunEnsembleInput::new(
            "What is the capital of France?",
            model_names(&["gpt-4o", "claude-3-opus", "mistral-large"]),
        );

        let outcome = use_case.execute(input).await.unwrap();
        let verdict = outcome.verdict().unwrap();

        assert_eq!(verdict.ranking.len(), 3);
        assert_eq!(verdict.ranking[0].model, "gpt-4o");
        assert!((verdict.ranking[0].score - 1.0).abs() < 1e-9);
        assert!(!verdict.blended);
        assert_eq!(verdict.blend_strategy, None);
        assert_eq!(verdict.chosen_models, vec!["gpt-4o".to_string()]);
        assert_eq!(verdict.final_text, "The capital of France is Paris.");
    }

    #[tokio::test]
    async fn test_no_models_is_error() {
        let use_case = use_case(registry_of(vec![]));
        let input = RunEnsembleInput::new("What is the capital of France?", Vec::new());

        let result = use_case.execute(input).await;
        assert!(matches!(result.unwrap_err(), RunEnsembleError::NoModels));
    }

    #[tokio::test]
    async fn test_blank_query_is_error() {
        let use_case = use_case(registry_of(vec![answering("gpt-4o", "hello")]));
        let input = RunEnsembleInput::new("   ", model_names(&["gpt-4o"]));

        let result = use_case.execute(input).await;
        assert!(matches!(
            result.unwrap_err(),
            RunEnsembleError::InvalidQuery(_)
        ));
    }

    #[tokio::test]
    async fn test_all_failed_round_reports_every_attempt() {
        let registry = registry_of(vec![
            scripted(
                "gpt-4o",
                vec![Err(ModelCallError::Unavailable("down".into()))],
            ),
            scripted("claude-3-opus", vec![Ok("   ".to_string())]),
        ]);
        let use_case = use_case(registry);
        // ghost-model has no registered client
        let input = RunEnsembleInput::new(
            "What is the capital of France?",
            model_names(&["gpt-4o", "claude-3-opus", "ghost-model"]),
        );

        let outcome = use_case.execute(input).await.unwrap();
        assert!(!outcome.is_answer());

        let EnsembleOutcome::NoValidResponse(report) = outcome else {
            panic!("Expected NoValidResponse");
        };
        assert_eq!(
            report.attempted,
            model_names(&["gpt-4o", "claude-3-opus", "ghost-model"])
        );
        assert_eq!(report.failures.len(), 3);
        assert!(matches!(
            report.failures[0].error,
            CandidateError::CallFailed(_)
        ));
        assert_eq!(report.failures[1].error, CandidateError::EmptyResponse);
        assert!(matches!(
            report.failures[2].error,
            CandidateError::CallFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_timed_out_models_become_timeout_failures() {
        let registry = registry_of(vec![
            slow("gpt-4o", Duration::from_millis(300), "too late"),
            slow("claude-3-opus", Duration::from_millis(300), "too late"),
        ]);
        let use_case = use_case(registry)
            .with_params(EnsembleParams::default().with_per_call_timeout(Duration::from_millis(10)));
        let input = RunEnsembleInput::new(
            "What is the capital of France?",
            model_names(&["gpt-4o", "claude-3-opus"]),
        );

        let outcome = use_case.execute(input).await.unwrap();
        let EnsembleOutcome::NoValidResponse(report) = outcome else {
            panic!("Expected NoValidResponse");
        };
        assert_eq!(report.failures.len(), 2);
        assert!(
            report
                .failures
                .iter()
                .all(|f| f.error == CandidateError::Timeout)
        );
    }

    #[tokio::test]
    async fn test_slow_model_does_not_sink_the_round() {
        let registry = registry_of(vec![
            slow("local-sim", Duration::from_millis(300), "too late"),
            answering("gpt-4o", "The capital of France is Paris."),
        ]);
        let use_case = use_case(registry)
            .with_params(EnsembleParams::default().with_per_call_timeout(Duration::from_millis(50)));
        let input = RunEnsembleInput::new(
            "What is the capital of France?",
            model_names(&["local-sim", "gpt-4o"]),
        );

        let outcome = use_case.execute(input).await.unwrap();
        let verdict = outcome.verdict().unwrap();
        assert_eq!(verdict.ranking.len(), 1);
        assert_eq!(verdict.ranking[0].model, "gpt-4o");
    }

    #[tokio::test]
    async fn test_cancellation_aborts_the_round() {
        let registry = registry_of(vec![
            slow("gpt-4o", Duration::from_secs(10), "never"),
            slow("claude-3-opus", Duration::from_secs(10), "never"),
        ]);
        let token = CancellationToken::new();
        token.cancel();
        let use_case = use_case(registry).with_cancellation_token(token);
        let input = RunEnsembleInput::new(
            "What is the capital of France?",
            model_names(&["gpt-4o", "claude-3-opus"]),
        );

        let result = use_case.execute(input).await;
        assert!(matches!(result.unwrap_err(), RunEnsembleError::Cancelled));
    }

    #[tokio::test]
    async fn test_comparison_round_blends_multiple_models() {
        let registry = registry_of(vec![
            answering(
                "gpt-4o",
                "Rust and Go both target backend services. Rust is faster than Go at peak throughput. \
                 Go is simpler to learn whereas Rust demands ownership discipline. \
                 Overall the better choice depends on the team.",
            ),
            answering(
                "claude-3-opus",
                "Go compiles much faster compared to Rust in large builds.",
            ),
            answering(
                "mistral-large",
                "Deployment tooling is a strength on the other hand for Go.",
            ),
        ]);
        let use_case = use_case(registry);
        let input = RunEnsembleInput::new(
            "Compare rust and go for backend services",
            model_names(&["gpt-4o", "claude-3-opus", "mistral-large"]),
        );

        let outcome = use_case.execute(input).await.unwrap();
        let verdict = outcome.verdict().unwrap();

        assert!(verdict.blended);
        assert_eq!(verdict.blend_strategy, Some(BlendStrategy::Comparison));
        assert!(verdict.chosen_models.len() >= 2);
        assert!(verdict.final_text.contains("According to"));
    }

    #[tokio::test]
    async fn test_category_hint_disables_factual_override() {
        let clients = || {
            vec![
                answering("gpt-4o", "The capital of France is Paris."),
                answering("mistral-large", "Paris is the capital of France."),
            ]
        };
        let models = model_names(&["gpt-4o", "mistral-large"]);
        let query = "What is the capital of France?";

        let derived = use_case(registry_of(clients()))
            .execute(RunEnsembleInput::new(query, models.clone()))
            .await
            .unwrap();
        assert!(
            derived.verdict().unwrap().ranking[0]
                .has_reason(chorus_domain::FACTUAL_OVERRIDE_REASON)
        );

        let hinted = use_case(registry_of(clients()))
            .execute(
                RunEnsembleInput::new(query, models).with_category_hint(QueryCategory::General),
            )
            .await
            .unwrap();
        assert!(
            hinted
                .verdict()
                .unwrap()
                .ranking
                .iter()
                .all(|e| !e.has_reason(chorus_domain::FACTUAL_OVERRIDE_REASON))
        );
    }

    #[tokio::test]
    async fn test_candidates_come_back_in_request_order() {
        let text = "Water boils at one hundred degrees Celsius at sea level.";
        // model-a answers last but was requested first
        let registry = registry_of(vec![
            slow("model-a", Duration::from_millis(50), text),
            answering("model-b", text),
        ]);
        let use_case = use_case(registry);
        let input = RunEnsembleInput::new(
            "Tell me about boiling water",
            model_names(&["model-a", "model-b"]),
        );

        let outcome = use_case.execute(input).await.unwrap();
        let verdict = outcome.verdict().unwrap();

        // identical texts from interchangeable models: request order wins
        assert_eq!(verdict.ranking[0].model, "model-a");
        assert_eq!(verdict.ranking[1].model, "model-b");
        assert_eq!(verdict.chosen_models, vec!["model-a".to_string()]);
    }

    #[tokio::test]
    async fn test_unregistered_model_is_excluded_from_ranking() {
        let registry = registry_of(vec![answering("gpt-4o", "The capital of France is Paris.")]);
        let use_case = use_case(registry);
        let input = RunEnsembleInput::new(
            "What is the capital of France?",
            model_names(&["ghost-model", "gpt-4o"]),
        );

        let outcome = use_case.execute(input).await.unwrap();
        let verdict = outcome.verdict().unwrap();
        assert_eq!(verdict.ranking.len(), 1);
        assert_eq!(verdict.ranking[0].model, "gpt-4o");
    }

    #[tokio::test]
    async fn test_exchange_logger_sees_the_whole_round() {
        let logger = Arc::new(RecordingLogger {
            events: Mutex::new(Vec::new()),
        });
        let registry = registry_of(vec![
            answering("gpt-4o", "The capital of France is Paris."),
            answering("mistral-large", "Paris is the capital of France."),
        ]);
        let use_case = use_case(registry).with_exchange_logger(logger.clone());
        let input = RunEnsembleInput::new(
            "What is the capital of France?",
            model_names(&["gpt-4o", "mistral-large"]),
        );

        use_case.execute(input).await.unwrap();

        let events = logger.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "query_received",
                "model_response",
                "model_response",
                "ranking_complete",
                "verdict",
            ]
        );
    }

    #[tokio::test]
    async fn test_latency_is_recorded_on_candidates() {
        let candidate = call_model(
            "gpt-4o".to_string(),
            Some(answering("gpt-4o", "Paris.")),
            "capital?".to_string(),
            Some(Duration::from_secs(1)),
        )
        .await;

        assert!(candidate.is_valid());
        assert!(candidate.latency_ms.is_some());
    }
}
