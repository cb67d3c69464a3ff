//! The planning loop implementation.

use crate::extractor::parse_plan;
use crate::prompt::{PromptInput, build_prompt};
use crate::session::SessionState;
use chrono::Utc;
use sleuth_config::ResearchConfig;
use sleuth_core::error::{MemoryError, RoundError};
use sleuth_core::event::{DomainEvent, EventBus, RoundStage};
use sleuth_core::memory::{ConversationMemory, ExchangeRecord};
use sleuth_core::provider::{Provider, ProviderRequest};
use sleuth_core::research::{ResearchOutcome, ResearchResult};
use sleuth_core::tool::{Tool, ToolRegistry};
use sleuth_memory::InMemoryHistory;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Log at `info` when verbose, `debug` otherwise.
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!($($arg)+)
        } else {
            debug!($($arg)+)
        }
    };
}

/// Per-call knobs for [`ResearchAgent::research`].
#[derive(Debug, Clone, Copy)]
pub struct ResearchOptions {
    /// Hard cap on planning rounds
    pub max_iterations: u32,
    /// Promote per-round progress to `info` and round failures to `warn`
    pub verbose: bool,
}

impl ResearchOptions {
    pub fn new(max_iterations: u32) -> Self {
        Self {
            max_iterations,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for ResearchOptions {
    fn default() -> Self {
        Self::new(5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Running,
    Finished(ResearchOutcome),
}

/// What a successful round told the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundReport {
    /// New tools ran, or there is still no summary
    Continue,
    /// No new tools were requested and a summary is in place
    Settled,
}

/// The research agent: drives the model through plan-act-observe rounds.
pub struct ResearchAgent {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Max tokens per response
    max_tokens: Option<u32>,

    /// Tools the model may call; mutable between research calls
    tools: ToolRegistry,

    /// Past exchanges, for follow-up context
    memory: Arc<dyn ConversationMemory>,

    /// Event bus for domain events
    event_bus: Arc<EventBus>,

    /// Convergence threshold, history window and friends
    settings: ResearchConfig,
}

impl ResearchAgent {
    /// Create a new agent with in-memory history and default settings.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: ToolRegistry,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            memory: Arc::new(InMemoryHistory::new()),
            event_bus,
            settings: ResearchConfig::default(),
        }
    }

    /// Set the max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Use a different history backend.
    pub fn with_memory(mut self, memory: Arc<dyn ConversationMemory>) -> Self {
        self.memory = memory;
        self
    }

    /// Replace the loop settings.
    pub fn with_settings(mut self, settings: ResearchConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Set how many distinct tools must run before a summary is accepted.
    pub fn with_min_tools_for_convergence(mut self, min: usize) -> Self {
        self.settings.min_tools_for_convergence = min;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn settings(&self) -> &ResearchConfig {
        &self.settings
    }

    /// Make a tool available from the next research call on.
    pub fn add_tool(&mut self, name: impl Into<String>, tool: Arc<dyn Tool>) {
        let name = name.into();
        debug!(tool = %name, "Tool added");
        self.tools.register(name, tool);
    }

    /// Remove a tool. Unknown names are ignored.
    pub fn remove_tool(&mut self, name: &str) {
        debug!(tool = %name, "Tool removed");
        self.tools.unregister(name);
    }

    /// Forget all past exchanges.
    pub async fn clear_history(&self) -> Result<(), MemoryError> {
        self.memory.clear().await?;
        info!(backend = self.memory.name(), "Conversation history cleared");
        Ok(())
    }

    /// The most recent `n` exchanges, oldest first.
    pub async fn history(&self, n: usize) -> Result<Vec<ExchangeRecord>, MemoryError> {
        self.memory.recent(n).await
    }

    /// Research `query` and return the best answer found.
    ///
    /// Never fails: model, extraction and tool failures cost at most one
    /// round, and the result is returned whether the loop converged or ran
    /// out of iterations. The exchange is appended to the history.
    pub async fn research(&mut self, query: &str, options: ResearchOptions) -> ResearchResult {
        let session_id = uuid::Uuid::new_v4().to_string();
        let verbose = options.verbose;

        info!(
            session_id = %session_id,
            max_iterations = options.max_iterations,
            "Research started"
        );
        self.event_bus.publish(DomainEvent::ResearchStarted {
            session_id: session_id.clone(),
            query: query.to_string(),
            max_iterations: options.max_iterations,
            timestamp: Utc::now(),
        });

        let history = self.recall_history().await;
        let mut session = SessionState::new(query);
        let mut state = LoopState::Running;
        let mut iterations = 0;

        for iteration in 1..=options.max_iterations {
            iterations = iteration;
            progress!(verbose, session_id = %session_id, iteration, "Round started");
            self.event_bus.publish(DomainEvent::RoundStarted {
                session_id: session_id.clone(),
                iteration,
                timestamp: Utc::now(),
            });

            match self
                .run_round(&session_id, &history, &mut session, verbose)
                .await
            {
                Ok(RoundReport::Settled) => {
                    let used = session.tools_used().len();
                    if used >= self.settings.min_tools_for_convergence {
                        progress!(verbose, session_id = %session_id, iteration, "Research complete");
                        state = LoopState::Finished(ResearchOutcome::Converged);
                        break;
                    }
                    progress!(
                        verbose,
                        session_id = %session_id,
                        tools_used = used,
                        required = self.settings.min_tools_for_convergence,
                        "Need to call more tools before completing"
                    );
                }
                Ok(RoundReport::Continue) => {}
                Err(e) => self.report_round_failure(&session_id, iteration, &e, verbose),
            }
        }

        let outcome = match state {
            LoopState::Finished(outcome) => outcome,
            LoopState::Running => {
                progress!(verbose, session_id = %session_id, iterations, "Iteration limit reached");
                ResearchOutcome::Exhausted
            }
        };

        let result = session.into_result(iterations, outcome, &self.settings.fallback_summary);
        self.remember(&result).await;

        info!(
            session_id = %session_id,
            outcome = %outcome,
            iterations,
            tools = result.tools_used.len(),
            "Research finished"
        );
        self.event_bus.publish(DomainEvent::ResearchCompleted {
            session_id,
            outcome,
            iterations,
            tools_used: result.tools_used.clone(),
            timestamp: Utc::now(),
        });

        result
    }

    /// One plan-act-observe round.
    async fn run_round(
        &self,
        session_id: &str,
        history: &[ExchangeRecord],
        session: &mut SessionState,
        verbose: bool,
    ) -> Result<RoundReport, RoundError> {
        let available = self.tools.names();
        let prompt = build_prompt(&PromptInput {
            session,
            history,
            available_tools: &available,
            min_tools: self.settings.min_tools_for_convergence,
            summary_preview_chars: self.settings.summary_preview_chars,
        });

        let request = ProviderRequest {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            ..ProviderRequest::prompt(&self.model, prompt)
        };
        let response = self.provider.complete(request).await?;

        self.event_bus.publish(DomainEvent::ResponseGenerated {
            session_id: session_id.to_string(),
            model: response.model.clone(),
            tokens_used: response.usage.as_ref().map_or(0, |u| u.total_tokens),
            timestamp: Utc::now(),
        });

        let plan = parse_plan(response.text())?;

        let summary = plan
            .summary
            .clone()
            .unwrap_or_else(|| session.summary().to_string());
        let sources = plan
            .sources
            .clone()
            .unwrap_or_else(|| session.sources().to_vec());
        session.apply_plan(summary, sources);

        let mut ran_new_tool = false;
        for name in plan.requested_tools() {
            if session.has_used(name) {
                debug!(session_id = %session_id, tool = %name, "Tool already used, skipping");
                continue;
            }

            let tool = match self.tools.resolve(name) {
                Ok(tool) => tool,
                Err(_) => {
                    let err = RoundError::UnknownTool(name.clone());
                    debug!(session_id = %session_id, error = %err, "Ignoring tool request");
                    self.event_bus.publish(DomainEvent::UnknownToolRequested {
                        session_id: session_id.to_string(),
                        tool_name: name.clone(),
                        timestamp: Utc::now(),
                    });
                    continue;
                }
            };

            ran_new_tool = true;
            progress!(verbose, session_id = %session_id, tool = %name, "Calling tool");

            let start = Instant::now();
            let (text, success) = match tool.run(session.topic()).await {
                Ok(text) => (text, true),
                Err(source) => {
                    let text = source.to_string();
                    let err = RoundError::ToolInvocation {
                        tool: name.clone(),
                        source,
                    };
                    warn!(session_id = %session_id, error = %err, "Tool execution failed");
                    (text, false)
                }
            };
            let duration_ms = start.elapsed().as_millis() as u64;

            self.event_bus.publish(DomainEvent::ToolExecuted {
                session_id: session_id.to_string(),
                tool_name: name.clone(),
                success,
                duration_ms,
                timestamp: Utc::now(),
            });
            session.record_tool_result(name.clone(), text);
        }

        // Requests for tools that already ran this session do not count as new.
        if !ran_new_tool && !session.summary().is_empty() {
            Ok(RoundReport::Settled)
        } else {
            Ok(RoundReport::Continue)
        }
    }

    fn report_round_failure(&self, session_id: &str, iteration: u32, err: &RoundError, verbose: bool) {
        if verbose {
            warn!(session_id = %session_id, iteration, error = %err, "Round skipped");
        } else {
            debug!(session_id = %session_id, iteration, error = %err, "Round skipped");
        }

        self.event_bus.publish(DomainEvent::RoundFailed {
            session_id: session_id.to_string(),
            iteration,
            stage: err.stage().unwrap_or(RoundStage::Extraction),
            error_message: err.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Recent exchanges for the prompt. A failing backend means no context.
    async fn recall_history(&self) -> Vec<ExchangeRecord> {
        match self.memory.recent(self.settings.history_window).await {
            Ok(records) => {
                if !records.is_empty() {
                    debug!(count = records.len(), "Recalled previous exchanges");
                }
                records
            }
            Err(e) => {
                warn!("History recall failed: {e}");
                vec![]
            }
        }
    }

    async fn remember(&self, result: &ResearchResult) {
        let record = ExchangeRecord::new(&result.topic, &result.summary, result.sources.clone());
        if let Err(e) = self.memory.append(record).await {
            warn!("Failed to save exchange to history: {e}");
        }
    }
}
