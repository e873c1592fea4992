use std::sync::{Arc, Mutex};

use collection_pulse::TextGenerator;

#[derive(Clone)]
pub struct MockGenerator {
    pub summary: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockGenerator {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            summary: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl TextGenerator for MockGenerator {
    type Error = anyhow::Error;

    fn model(&self) -> &str {
        "mock-gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(prompt.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.summary.clone())
    }
}
