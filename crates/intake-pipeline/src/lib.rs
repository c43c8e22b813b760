pub mod builder;
pub mod composer;
pub mod context;
pub mod error;
pub mod extractor;
pub mod formatter;
pub mod locks;
pub mod orchestrator;
pub mod scheduler;

pub use builder::IntakeOrchestratorBuilder;
pub use composer::{LlmComposer, MessageComposer, TemplateComposer};
pub use context::extraction_input;
pub use error::IntakeError;
pub use extractor::{
    DegradedReason, Extraction, FactExtractor, LlmSemanticService, SemanticService,
};
pub use formatter::BriefFormatter;
pub use locks::ThreadLocks;
pub use orchestrator::{IntakeOrchestrator, RunPhase};
pub use scheduler::QuestionScheduler;
