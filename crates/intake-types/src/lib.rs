pub mod brief;
pub mod config;
pub mod conversation;
pub mod io;
pub mod question;
pub mod state;
pub mod summary;

pub use brief::Brief;
pub use config::{ContextPolicy, LLMConfig, PipelineConfig};
pub use conversation::{ConversationTurn, DocumentRef, Role};
pub use io::{IntakeOutput, IntakeRequest};
pub use question::QuestionItem;
pub use state::ThreadState;
pub use summary::{Summary, SummaryField, DEFAULT_PROJECT_TITLE};
