//! Summary, text-to-speech and speech-to-text handlers

use axum::{
    extract::{rejection::PathRejection, Multipart, Path, Request, State},
    http::header,
    response::{IntoResponse, Response},
    Form, Json, RequestExt,
};
use collection_datastore::DataStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{error::ApiError, AppState, SpeechBackend};
use crate::{
    speech::{
        AudioFormat, EncodingChoice, SynthesisRequest, Synthesizer, Transcriber,
        TranscriptionRequest, VoiceGender,
    },
    TextGenerator,
};

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

/// Fields of the `/tts` form
#[derive(Debug, Default, Deserialize)]
pub struct TtsForm {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub voice_type: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

impl TtsForm {
    fn into_request(self) -> Result<SynthesisRequest, ApiError> {
        let text = self
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("Field 'text' is required"))?;

        Ok(SynthesisRequest {
            text,
            language_code: non_blank(self.lang)
                .unwrap_or_else(|| SynthesisRequest::DEFAULT_LANGUAGE.to_string()),
            voice: non_blank(self.voice),
            gender: self.voice_type.as_deref().and_then(VoiceGender::parse),
            format: self
                .format
                .as_deref()
                .map(AudioFormat::from_form_value)
                .unwrap_or(AudioFormat::OggOpus),
        })
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn summarize<D, G, S>(
    State(state): State<AppState<D, G, S>>,
    collection_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SummarizeResponse>, ApiError>
where
    D: DataStore + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    S: SpeechBackend,
{
    let Path(collection_id) = collection_id
        .map_err(|e| ApiError::bad_request(format!("Invalid collection id: {}", e.body_text())))?;

    let outcome = state.summaries.summarize(collection_id).await?;
    tracing::info!(
        %collection_id,
        source = ?outcome.source,
        persistence = ?outcome.persistence,
        "Summary served"
    );

    Ok(Json(SummarizeResponse {
        summary: outcome.summary,
    }))
}

pub async fn tts<D, G, S>(
    State(state): State<AppState<D, G, S>>,
    req: Request,
) -> Result<Response, ApiError>
where
    D: DataStore + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    S: SpeechBackend,
{
    let request = parse_tts_form(req).await?.into_request()?;
    tracing::info!(
        chars = request.text.chars().count(),
        lang = %request.language_code,
        format = ?request.format,
        "TTS request"
    );

    let audio = state
        .speech
        .synthesize(&request)
        .await
        .map_err(|e| ApiError::bad_gateway(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, request.format.content_type())], audio).into_response())
}

pub async fn stt<D, G, S>(
    State(state): State<AppState<D, G, S>>,
    multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ApiError>
where
    D: DataStore + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    S: SpeechBackend,
{
    let request = parse_stt_form(multipart).await?;
    tracing::info!(bytes = request.audio.len(), encoding = ?request.encoding, "STT request");

    let response = state
        .speech
        .transcribe(request)
        .await
        .map_err(|e| ApiError::bad_gateway(e.to_string()))?;

    Ok(Json(TranscriptionResponse {
        text: response.text,
    }))
}

/// Reads the TTS fields from either a multipart or an urlencoded body
async fn parse_tts_form(req: Request) -> Result<TtsForm, ApiError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if !content_type.starts_with("multipart/form-data") {
        let Form(form) = req
            .extract::<Form<TtsForm>, _>()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid form payload: {e}")))?;
        return Ok(form);
    }

    let mut multipart = req
        .extract::<Multipart, _>()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {e}")))?;

    let mut form = TtsForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed reading multipart field: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let slot = match name.as_str() {
            "text" => &mut form.text,
            "lang" => &mut form.lang,
            "voice" => &mut form.voice,
            "voice_type" => &mut form.voice_type,
            "format" => &mut form.format,
            _ => continue,
        };
        *slot = Some(field.text().await.map_err(|e| {
            ApiError::bad_request(format!("Failed reading multipart '{name}' field: {e}"))
        })?);
    }

    Ok(form)
}

async fn parse_stt_form(mut multipart: Multipart) -> Result<TranscriptionRequest, ApiError> {
    let mut audio = None;
    let mut encoding = None;
    let mut sample_rate = None;
    let mut lang = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed reading multipart field: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let bytes = field.bytes().await.map_err(|e| {
                ApiError::bad_request(format!("Failed reading multipart 'file' field: {e}"))
            })?;
            audio = Some(bytes.to_vec());
            continue;
        }

        let value = field.text().await.map_err(|e| {
            ApiError::bad_request(format!("Failed reading multipart '{name}' field: {e}"))
        })?;
        match name.as_str() {
            "encoding" => encoding = Some(value),
            "sample_rate" => sample_rate = non_blank(Some(value)),
            "lang" => lang = non_blank(Some(value)),
            _ => {}
        }
    }

    let audio = audio
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ApiError::bad_request("Multipart 'file' field is required"))?;

    let sample_rate = sample_rate
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .map_err(|_| ApiError::bad_request(format!("Invalid sample_rate: {raw}")))
        })
        .transpose()?;

    Ok(TranscriptionRequest {
        audio,
        encoding: EncodingChoice::from_form_value(encoding.as_deref()),
        sample_rate,
        language_code: lang.unwrap_or_else(|| SynthesisRequest::DEFAULT_LANGUAGE.to_string()),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
