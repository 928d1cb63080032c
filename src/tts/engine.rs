use std::path::Path;

use async_trait::async_trait;

use crate::error::AppError;
use crate::tts::voice::OfflineVoice;

/// Local synthesizer that writes finished audio to a file and blocks until done.
///
/// Implementations must not keep per-request state between calls: the voice
/// travels with every `synthesize_to_file` call.
pub trait OfflineEngine: Send + Sync {
    fn voices(&self) -> Result<Vec<OfflineVoice>, AppError>;

    fn synthesize_to_file(
        &self,
        text: &str,
        voice: Option<&str>,
        path: &Path,
    ) -> Result<(), AppError>;
}

/// Remote synthesizer returning the audio bytes for a language code.
#[async_trait]
pub trait OnlineEngine: Send + Sync {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, AppError>;
}
