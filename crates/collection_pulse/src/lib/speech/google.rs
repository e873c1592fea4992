use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::speech::{
    AudioEncoding, AudioFormat, EncodingChoice, SynthesisRequest, Synthesizer, TranscribeResponse,
    Transcriber, TranscriptionRequest, VoiceGender,
};

/// Google Cloud Text-to-Speech and Speech-to-Text over their REST APIs,
/// authenticated with an API key.
#[derive(Debug, Clone)]
pub struct GoogleSpeechClient {
    client: Client,
    api_key: String,
    tts_base_url: String,
    stt_base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Invalid audio payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl GoogleSpeechClient {
    const OGG_OPUS_SAMPLE_RATE: u32 = 48_000;
    const PCM_SAMPLE_RATE: u32 = 16_000;

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            tts_base_url: "https://texttospeech.googleapis.com/v1".into(),
            stt_base_url: "https://speech.googleapis.com/v1".into(),
        }
    }

    async fn post_json<B, R>(&self, url: String, body: &B) -> Result<R, SpeechError>
    where
        B: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let resp = self
            .client
            .post(url)
            .query(&[("key", &self.api_key)])
            .json(body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(SpeechError::Api { status, message });
        }

        Ok(resp.json::<R>().await?)
    }
}

/// Wraps `text` in the SSML prosody used for every synthesis
pub fn to_ssml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }

    format!(
        r#"<speak><prosody rate="1.1" pitch="+2st" volume="+0dB">{escaped}</prosody></speak>"#
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeBody<'a> {
    input: SynthesisInput,
    voice: VoiceSelection<'a>,
    audio_config: SynthesisAudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput {
    ssml: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssml_gender: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisAudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f32,
    pitch: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

fn synthesize_body(request: &SynthesisRequest) -> SynthesizeBody<'_> {
    SynthesizeBody {
        input: SynthesisInput {
            ssml: to_ssml(&request.text),
        },
        voice: VoiceSelection {
            language_code: &request.language_code,
            name: request.voice_name(),
            ssml_gender: request.gender.map(|g| match g {
                VoiceGender::Male => "MALE",
                VoiceGender::Female => "FEMALE",
                VoiceGender::Neutral => "NEUTRAL",
            }),
        },
        audio_config: SynthesisAudioConfig {
            audio_encoding: match request.format {
                AudioFormat::OggOpus => "OGG_OPUS",
                AudioFormat::Mp3 => "MP3",
            },
            // prosody in the SSML carries the actual rate and pitch
            speaking_rate: 1.0,
            pitch: 0.0,
        },
    }
}

impl Synthesizer for GoogleSpeechClient {
    type Error = SpeechError;

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, Self::Error> {
        let body = synthesize_body(request);
        let response: SynthesizeResponse = self
            .post_json(format!("{}/text:synthesize", self.tts_base_url), &body)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to synthesize speech"))?;

        Ok(STANDARD.decode(response.audio_content)?)
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_rate_hertz: Option<u32>,
    language_code: String,
    enable_automatic_punctuation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_enhanced: Option<bool>,
}

#[derive(Debug, Serialize)]
struct RecognizeBody {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
}

impl RecognizeResponse {
    /// Best alternative of every result, space separated
    fn transcript(&self) -> String {
        let parts = self
            .results
            .iter()
            .filter_map(|r| r.alternatives.first())
            .map(|a| a.transcript.as_str())
            .collect::<Vec<_>>();

        parts.join(" ").trim().to_string()
    }
}

/// Recognition settings for the uploaded audio.
///
/// Compressed containers carry their own sample rate except Ogg Opus, which
/// the API requires explicitly; raw encodings default to 16 kHz.
fn recognition_config(request: &TranscriptionRequest, model: &'static str) -> RecognitionConfig {
    let base = RecognitionConfig {
        encoding: AudioEncoding::Unspecified.as_str(),
        sample_rate_hertz: None,
        language_code: request.language_code.clone(),
        enable_automatic_punctuation: true,
        model: None,
        use_enhanced: None,
    };

    let encoding = match request.encoding {
        EncodingChoice::Auto => {
            return RecognitionConfig {
                model: Some(model),
                use_enhanced: Some(true),
                ..base
            }
        }
        EncodingChoice::Explicit(encoding) => encoding,
    };

    match encoding {
        AudioEncoding::Unspecified => base,
        AudioEncoding::OggOpus => RecognitionConfig {
            encoding: encoding.as_str(),
            sample_rate_hertz: Some(
                request
                    .sample_rate
                    .unwrap_or(GoogleSpeechClient::OGG_OPUS_SAMPLE_RATE),
            ),
            model: Some(model),
            use_enhanced: Some(true),
            ..base
        },
        AudioEncoding::Mp3 => RecognitionConfig {
            encoding: encoding.as_str(),
            ..base
        },
        _ => RecognitionConfig {
            encoding: encoding.as_str(),
            sample_rate_hertz: Some(
                request
                    .sample_rate
                    .unwrap_or(GoogleSpeechClient::PCM_SAMPLE_RATE),
            ),
            ..base
        },
    }
}

impl Transcriber for GoogleSpeechClient {
    const TRANSCRIBER_MODEL: &'static str = "latest_long";
    type Error = SpeechError;

    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscribeResponse, Self::Error> {
        let body = RecognizeBody {
            config: recognition_config(&request, Self::TRANSCRIBER_MODEL),
            audio: RecognitionAudio {
                content: STANDARD.encode(&request.audio),
            },
        };

        tracing::info!(
            bytes = request.audio.len(),
            encoding = body.config.encoding,
            "Transcribing audio"
        );

        let response: RecognizeResponse = self
            .post_json(format!("{}/speech:recognize", self.stt_base_url), &body)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to transcribe audio"))?;

        Ok(TranscribeResponse {
            text: response.transcript(),
        })
    }
}
