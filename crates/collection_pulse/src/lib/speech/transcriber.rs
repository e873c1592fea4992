use std::{
    fmt::{Debug, Display},
    future::Future,
};

pub trait Transcriber {
    /// Recognition model used when the audio encoding is auto-detected
    const TRANSCRIBER_MODEL: &'static str;

    type Error: Display + Debug + Send;

    fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> impl Future<Output = Result<TranscribeResponse, Self::Error>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRequest {
    pub audio: Vec<u8>,
    pub encoding: EncodingChoice,
    pub sample_rate: Option<u32>,
    pub language_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscribeResponse {
    pub text: String,
}

/// How the caller described the uploaded audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingChoice {
    /// No hint; let the provider sniff the container
    Auto,
    Explicit(AudioEncoding),
}

impl EncodingChoice {
    /// Absent, blank or `AUTO` means auto-detect; any other name is looked up
    /// in [`AudioEncoding`]
    pub fn from_form_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => EncodingChoice::Auto,
            Some(v) if v.eq_ignore_ascii_case("auto") => EncodingChoice::Auto,
            Some(v) => EncodingChoice::Explicit(AudioEncoding::from_name(v)),
        }
    }
}

/// Recognition encodings understood by the speech provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoding {
    Unspecified,
    Linear16,
    Flac,
    Mulaw,
    Amr,
    AmrWb,
    OggOpus,
    SpeexWithHeaderByte,
    Mp3,
    WebmOpus,
}

impl AudioEncoding {
    /// Unknown names map to [`AudioEncoding::Unspecified`]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "LINEAR16" => AudioEncoding::Linear16,
            "FLAC" => AudioEncoding::Flac,
            "MULAW" => AudioEncoding::Mulaw,
            "AMR" => AudioEncoding::Amr,
            "AMR_WB" => AudioEncoding::AmrWb,
            "OGG_OPUS" => AudioEncoding::OggOpus,
            "SPEEX_WITH_HEADER_BYTE" => AudioEncoding::SpeexWithHeaderByte,
            "MP3" => AudioEncoding::Mp3,
            "WEBM_OPUS" => AudioEncoding::WebmOpus,
            _ => AudioEncoding::Unspecified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AudioEncoding::Unspecified => "ENCODING_UNSPECIFIED",
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::Flac => "FLAC",
            AudioEncoding::Mulaw => "MULAW",
            AudioEncoding::Amr => "AMR",
            AudioEncoding::AmrWb => "AMR_WB",
            AudioEncoding::OggOpus => "OGG_OPUS",
            AudioEncoding::SpeexWithHeaderByte => "SPEEX_WITH_HEADER_BYTE",
            AudioEncoding::Mp3 => "MP3",
            AudioEncoding::WebmOpus => "WEBM_OPUS",
        }
    }
}
