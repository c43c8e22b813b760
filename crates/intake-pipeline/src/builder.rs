use anyhow::{anyhow, Result};
use intake_llm::ChatClient;
use intake_persist::ThreadStateStore;
use intake_types::{LLMConfig, PipelineConfig};
use std::sync::Arc;

use crate::composer::{LlmComposer, MessageComposer, TemplateComposer};
use crate::extractor::{FactExtractor, LlmSemanticService, SemanticService};
use crate::orchestrator::IntakeOrchestrator;

/// Builder for constructing an IntakeOrchestrator with optional collaborators
pub struct IntakeOrchestratorBuilder {
    store: Option<Arc<ThreadStateStore>>,
    semantic_service: Option<Arc<dyn SemanticService>>,
    composer: Option<Arc<dyn MessageComposer>>,
    chat: Option<(Arc<dyn ChatClient>, LLMConfig)>,
    config: PipelineConfig,
}

impl IntakeOrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            semantic_service: None,
            composer: None,
            chat: None,
            config: PipelineConfig::default(),
        }
    }

    /// Set the thread state store
    pub fn store(mut self, store: Arc<ThreadStateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the primary semantic extraction service
    pub fn semantic_service(mut self, service: Arc<dyn SemanticService>) -> Self {
        self.semantic_service = Some(service);
        self
    }

    /// Set the assistant message composer
    pub fn composer(mut self, composer: Arc<dyn MessageComposer>) -> Self {
        self.composer = Some(composer);
        self
    }

    /// Use a chat model for extraction and reply generation, unless those
    /// collaborators are set explicitly
    pub fn chat_client(mut self, client: Arc<dyn ChatClient>, llm_config: LLMConfig) -> Self {
        self.chat = Some((client, llm_config));
        self
    }

    /// Set the pipeline configuration
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the orchestrator
    pub fn build(self) -> Result<IntakeOrchestrator> {
        let store = self
            .store
            .ok_or_else(|| anyhow!("Thread state store is required"))?;
        if self.config.max_questions == 0 {
            return Err(anyhow!("max_questions must be at least 1"));
        }

        let timeout = self.config.extraction_timeout;
        let semantic_service = self.semantic_service.or_else(|| {
            self.chat.as_ref().map(|(client, llm_config)| {
                Arc::new(LlmSemanticService::new(Arc::clone(client), llm_config.clone()))
                    as Arc<dyn SemanticService>
            })
        });
        let composer = self
            .composer
            .or_else(|| {
                self.chat.map(|(client, llm_config)| {
                    Arc::new(LlmComposer::new(client, llm_config, timeout)) as Arc<dyn MessageComposer>
                })
            })
            .unwrap_or_else(|| Arc::new(TemplateComposer) as Arc<dyn MessageComposer>);

        let extractor = FactExtractor::new(semantic_service, timeout);

        tracing::info!(
            primary_extraction = extractor.has_primary(),
            max_questions = self.config.max_questions,
            backend = %store.backend_kind(),
            "Intake orchestrator ready"
        );

        Ok(IntakeOrchestrator::new(store, extractor, composer, self.config))
    }
}

impl Default for IntakeOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
