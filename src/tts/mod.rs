pub mod engine;
pub mod espeak;
pub mod google;
pub mod voice;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::AppError;

pub use engine::{OfflineEngine, OnlineEngine};
pub use voice::{Voice, VoiceSelection};

use voice::{OfflineVoice, ONLINE_LANGUAGES};

/// Catalog and dispatch over the offline and online engines.
pub struct TtsService {
    offline: Arc<dyn OfflineEngine>,
    online: Arc<dyn OnlineEngine>,
    temp_dir: Option<PathBuf>,
}

impl TtsService {
    pub fn new(offline: Arc<dyn OfflineEngine>, online: Arc<dyn OnlineEngine>) -> Self {
        Self {
            offline,
            online,
            temp_dir: None,
        }
    }

    pub fn with_temp_dir(mut self, temp_dir: Option<PathBuf>) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Offline voice table, or nothing if the engine can't be queried.
    /// Blocks while the engine runs.
    fn offline_voices(&self) -> Vec<OfflineVoice> {
        match self.offline.voices() {
            Ok(voices) => voices,
            Err(e) => {
                tracing::warn!("Offline voice table unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// Every offline voice followed by one entry per online language.
    pub fn list_voices(&self) -> Vec<Voice> {
        let mut voices: Vec<Voice> = self.offline_voices().iter().map(Voice::from).collect();
        voices.extend(voice::online_voices());
        voices
    }

    /// Sorted, deduplicated language codes from both engines.
    pub fn list_languages(&self) -> Vec<String> {
        let mut languages: BTreeSet<String> = self
            .offline_voices()
            .iter()
            .filter_map(OfflineVoice::primary_language)
            .collect();
        languages.extend(ONLINE_LANGUAGES.iter().map(|(code, _)| code.to_string()));
        languages.into_iter().collect()
    }

    pub async fn synthesize(&self, text: &str, voice_id: Option<&str>) -> Result<Vec<u8>, AppError> {
        match VoiceSelection::parse(voice_id) {
            VoiceSelection::Online(lang) => {
                tracing::debug!("Routing to online engine (lang={})", lang);
                self.online.synthesize(text, &lang).await
            }
            VoiceSelection::Offline(voice) => {
                tracing::debug!("Routing to offline engine (voice={:?})", voice);
                self.synthesize_offline(text.to_string(), voice).await
            }
        }
    }

    async fn synthesize_offline(
        &self,
        text: String,
        voice: Option<String>,
    ) -> Result<Vec<u8>, AppError> {
        let engine = Arc::clone(&self.offline);
        let temp_dir = self.temp_dir.clone();

        tokio::task::spawn_blocking(move || -> Result<Vec<u8>, AppError> {
            let mut builder = tempfile::Builder::new();
            builder.prefix("tts-").suffix(".wav");
            let file = match &temp_dir {
                Some(dir) => builder.tempfile_in(dir)?,
                None => builder.tempfile()?,
            };

            // `file` removes itself when dropped, so early returns clean up too.
            engine.synthesize_to_file(&text, voice.as_deref(), file.path())?;
            let audio = std::fs::read(file.path())?;
            file.close()?;

            Ok(audio)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Offline synthesis task failed: {}", e)))?
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn service(offline: FakeOffline) -> (Arc<FakeOffline>, TtsService) {
        let offline = Arc::new(offline);
        let service = TtsService::new(offline.clone(), Arc::new(FakeOnline));
        (offline, service)
    }

    #[test]
    fn voices_merge_both_engines() {
        let (_, service) = service(FakeOffline::with_voices(vec![
            offline_voice("en-gb", &["en-gb"]),
            offline_voice("mystery", &[]),
        ]));

        let voices = service.list_voices();
        assert_eq!(voices.len(), 11);
        assert_eq!(voices[0].lang, "en");
        assert_eq!(voices[0].name, "EN-GB (Offline)");
        assert_eq!(voices[1].lang, "N/A");
        assert_eq!(voices[2].id, "gtts-ar");
    }

    #[test]
    fn voices_survive_missing_offline_engine() {
        let (_, service) = service(FakeOffline::default());
        let voices = service.list_voices();
        assert_eq!(voices.len(), 9);
        assert!(voices.iter().all(|v| v.id.starts_with("gtts-")));
    }

    #[test]
    fn languages_sorted_and_unique() {
        let (_, service) = service(FakeOffline::with_voices(vec![
            offline_voice("en-gb", &["en-gb"]),
            offline_voice("en-us", &["en-us"]),
            offline_voice("sv", &["sv"]),
            offline_voice("mystery", &[]),
        ]));

        let languages = service.list_languages();
        let mut expected = languages.clone();
        expected.sort();
        expected.dedup();
        assert_eq!(languages, expected);
        assert!(languages.contains(&"sv".to_string()));
        assert!(languages.contains(&"zh-CN".to_string()));
        assert!(!languages.contains(&"N/A".to_string()));
        assert_eq!(languages.iter().filter(|l| *l == "en").count(), 1);
    }

    #[tokio::test]
    async fn online_marker_routes_online() {
        let (offline, service) = service(FakeOffline::default());
        let audio = service.synthesize("hello", Some("gtts-en")).await.unwrap();
        assert_eq!(audio, b"ID3en:hello");
        assert!(offline.last_path.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn hyphenated_online_code_resolves() {
        let (_, service) = service(FakeOffline::default());
        let audio = service.synthesize("ni hao", Some("gtts-zh-CN")).await.unwrap();
        assert_eq!(audio, b"ID3zh-CN:ni hao");
    }

    #[tokio::test]
    async fn unknown_online_code_is_online_error() {
        let (_, service) = service(FakeOffline::default());
        let err = service.synthesize("hello", Some("gtts-xx")).await.unwrap_err();
        assert!(matches!(err, AppError::OnlineSynthesis(_)));
    }

    #[tokio::test]
    async fn other_ids_route_offline_with_voice() {
        let (offline, service) = service(FakeOffline::default());
        let audio = service.synthesize("hello", Some("en-us")).await.unwrap();
        assert_eq!(audio, b"RIFFhello");
        assert_eq!(offline.last_voice.lock().unwrap().as_deref(), Some("en-us"));
    }

    #[tokio::test]
    async fn missing_voice_uses_offline_default() {
        let (offline, service) = service(FakeOffline::default());
        service.synthesize("hello", None).await.unwrap();
        assert!(offline.last_path.lock().unwrap().is_some());
        assert!(offline.last_voice.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn offline_temp_file_is_removed() {
        let (offline, service) = service(FakeOffline::default());
        service.synthesize("hello", None).await.unwrap();

        let path = offline.last_path.lock().unwrap().clone().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn offline_temp_file_is_removed_on_failure() {
        let (offline, service) = service(FakeOffline {
            fail_after_write: true,
            ..Default::default()
        });
        let err = service.synthesize("hello", None).await.unwrap_err();
        assert!(matches!(err, AppError::OfflineSynthesis(_)));

        let path = offline.last_path.lock().unwrap().clone().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn offline_temp_file_lands_in_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let offline = Arc::new(FakeOffline::default());
        let service = TtsService::new(offline.clone(), Arc::new(FakeOnline))
            .with_temp_dir(Some(dir.path().to_path_buf()));

        service.synthesize("hello", None).await.unwrap();

        let path = offline.last_path.lock().unwrap().clone().unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
