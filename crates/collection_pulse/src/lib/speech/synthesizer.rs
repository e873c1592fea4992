use std::{
    fmt::{Debug, Display},
    future::Future,
};

pub trait Synthesizer {
    type Error: Display + Debug + Send;

    /// Returns the encoded audio bytes in `request.format`
    fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    OggOpus,
    Mp3,
}

impl AudioFormat {
    /// `ogg` (any case) selects Ogg Opus, everything else MP3
    pub fn from_form_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("ogg") {
            AudioFormat::OggOpus
        } else {
            AudioFormat::Mp3
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            AudioFormat::OggOpus => "audio/ogg",
            AudioFormat::Mp3 => "audio/mpeg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceGender {
    Male,
    Female,
    Neutral,
}

impl VoiceGender {
    /// Lenient parse of the `voice_type` form field; unknown values yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "pria" | "laki-laki" => Some(VoiceGender::Male),
            "female" | "wanita" | "perempuan" => Some(VoiceGender::Female),
            "neutral" | "netral" => Some(VoiceGender::Neutral),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub language_code: String,
    pub voice: Option<String>,
    pub gender: Option<VoiceGender>,
    pub format: AudioFormat,
}

impl SynthesisRequest {
    pub const DEFAULT_LANGUAGE: &str = "id-ID";
    const DEFAULT_INDONESIAN_VOICE: &str = "id-ID-Wavenet-A";

    /// Voice to request: the explicit one, else the Wavenet default for
    /// Indonesian, else none and the provider picks
    pub fn voice_name(&self) -> Option<&str> {
        match self.voice.as_deref().map(str::trim) {
            Some(voice) if !voice.is_empty() => Some(voice),
            _ if self.language_code.starts_with("id") => Some(Self::DEFAULT_INDONESIAN_VOICE),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(language_code: &str, voice: Option<&str>) -> SynthesisRequest {
        SynthesisRequest {
            text: "Selamat datang".into(),
            language_code: language_code.into(),
            voice: voice.map(str::to_string),
            gender: None,
            format: AudioFormat::OggOpus,
        }
    }

    #[test]
    fn test_voice_defaults() {
        assert_eq!(request("id-ID", None).voice_name(), Some("id-ID-Wavenet-A"));
        assert_eq!(request("id-ID", Some(" ")).voice_name(), Some("id-ID-Wavenet-A"));
        assert_eq!(
            request("id-ID", Some("id-ID-Standard-B")).voice_name(),
            Some("id-ID-Standard-B")
        );
        assert_eq!(request("en-US", None).voice_name(), None);
    }

    #[test]
    fn test_format_from_form_value() {
        assert_eq!(AudioFormat::from_form_value("ogg"), AudioFormat::OggOpus);
        assert_eq!(AudioFormat::from_form_value("OGG"), AudioFormat::OggOpus);
        assert_eq!(AudioFormat::from_form_value("mp3"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::from_form_value("wav"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::OggOpus.content_type(), "audio/ogg");
        assert_eq!(AudioFormat::Mp3.content_type(), "audio/mpeg");
    }

    #[test]
    fn test_voice_gender_parse() {
        assert_eq!(VoiceGender::parse("Female"), Some(VoiceGender::Female));
        assert_eq!(VoiceGender::parse("pria"), Some(VoiceGender::Male));
        assert_eq!(VoiceGender::parse("robot"), None);
    }
}
