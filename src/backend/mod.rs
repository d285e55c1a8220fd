//! Backend module - generation service contract and HTTP client

pub mod http_backend;
pub mod traits;

pub use http_backend::HttpGenerationClient;
pub use traits::{
    ContentBlock, GenerationClient, GenerationPayload, GenerationResponse, InputMessage,
    MessageContent, OutputBlock, Tool,
};
