pub mod google;
mod synthesizer;
mod transcriber;

pub use synthesizer::{AudioFormat, SynthesisRequest, Synthesizer, VoiceGender};
pub use transcriber::{
    AudioEncoding, EncodingChoice, TranscribeResponse, Transcriber, TranscriptionRequest,
};
