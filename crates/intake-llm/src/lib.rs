pub mod config;
pub mod openai;
pub mod traits;
pub mod types;

pub use config::{ClientFactory, OpenAIConfig};
pub use openai::OpenAIClient;
pub use traits::{
    ChatClient,
    ChatRequest, ChatResponse, ChatOptions,
    ResponseFormat, JsonSchemaFormat,
    TokenUsage,
};
pub use types::{Message, Content};
