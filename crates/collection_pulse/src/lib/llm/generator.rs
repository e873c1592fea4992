use std::{
    fmt::{Debug, Display},
    future::Future,
};

/// A text generation backend with its system instruction already bound.
pub trait TextGenerator {
    type Error: Display + Debug + Send;

    /// Model identifier, used for logging only
    fn model(&self) -> &str;

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
