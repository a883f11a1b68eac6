//! Chat-completion provider backends.

mod openai;

pub use openai::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT, OpenAiBackend, OpenAiBackendBuilder};
