mod error;
pub mod http;
mod llm;
pub mod speech;
mod summary;
pub mod tracing;

pub use error::SummarizeError;
pub use llm::gemini;
pub use llm::generator::TextGenerator;
pub use summary::{
    prompt, Decision, Persistence, SummaryOutcome, SummaryService, SummarySource,
};
