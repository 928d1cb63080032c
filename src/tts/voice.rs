use serde::Serialize;

/// Prefix marking a voice id as an online-engine language.
pub const ONLINE_MARKER: &str = "gtts-";

/// Language value for offline voices whose metadata can't be read.
pub const UNRESOLVED_LANGUAGE: &str = "N/A";

pub const ONLINE_DISPLAY_NAME: &str = "Google (Online)";

/// Online languages advertised in the catalog, code to display name.
pub const ONLINE_LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh-CN", "Chinese (Simplified)"),
];

/// Catalog entry returned by `/api/voices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    pub lang: String,
}

/// A voice as reported by the offline engine's voice table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineVoice {
    pub id: String,
    pub name: String,
    pub languages: Vec<String>,
}

impl OfflineVoice {
    /// First declared language with any region suffix removed
    /// (`en-gb` and `en_GB` both give `en`).
    pub fn primary_language(&self) -> Option<String> {
        let tag = self.languages.first()?;
        let code = tag.split(['-', '_']).next()?.trim();
        if code.is_empty() {
            None
        } else {
            Some(code.to_string())
        }
    }
}

impl From<&OfflineVoice> for Voice {
    fn from(voice: &OfflineVoice) -> Self {
        Voice {
            id: voice.id.clone(),
            name: format!("{} (Offline)", voice.name),
            lang: voice
                .primary_language()
                .unwrap_or_else(|| UNRESOLVED_LANGUAGE.to_string()),
        }
    }
}

/// Which engine a request goes to, parsed once from the raw `voice_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceSelection {
    /// Offline engine, optionally with a specific voice.
    Offline(Option<String>),
    /// Online engine with the given language code.
    Online(String),
}

impl VoiceSelection {
    pub fn parse(voice_id: Option<&str>) -> Self {
        match voice_id {
            None | Some("") => VoiceSelection::Offline(None),
            Some(id) => match id.strip_prefix(ONLINE_MARKER) {
                Some(lang) => VoiceSelection::Online(lang.to_string()),
                None => VoiceSelection::Offline(Some(id.to_string())),
            },
        }
    }
}

pub fn online_voices() -> impl Iterator<Item = Voice> {
    ONLINE_LANGUAGES.iter().map(|(code, _)| Voice {
        id: format!("{}{}", ONLINE_MARKER, code),
        name: ONLINE_DISPLAY_NAME.to_string(),
        lang: code.to_string(),
    })
}
