use std::sync::{Arc, Mutex};

use collection_pulse::speech::{
    SynthesisRequest, Synthesizer, TranscribeResponse, Transcriber, TranscriptionRequest,
};

#[derive(Clone, Default)]
pub struct MockSpeech {
    pub audio: Vec<u8>,
    pub transcript: String,
    pub synthesized: Arc<Mutex<Vec<SynthesisRequest>>>,
    pub transcribed: Arc<Mutex<Vec<TranscriptionRequest>>>,
    pub fail_with: Option<String>,
}

impl MockSpeech {
    pub fn new(audio: &[u8], transcript: &str) -> Self {
        Self {
            audio: audio.to_vec(),
            transcript: transcript.to_string(),
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl Synthesizer for MockSpeech {
    type Error = anyhow::Error;

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, Self::Error> {
        self.synthesized.lock().unwrap().push(request.clone());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.audio.clone())
    }
}

impl Transcriber for MockSpeech {
    const TRANSCRIBER_MODEL: &'static str = "mock-stt";
    type Error = anyhow::Error;

    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscribeResponse, Self::Error> {
        self.transcribed.lock().unwrap().push(request);
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(TranscribeResponse {
            text: self.transcript.clone(),
        })
    }
}
