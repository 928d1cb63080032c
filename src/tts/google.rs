use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Client, Url};

use crate::error::AppError;
use crate::tts::engine::OnlineEngine;

/// Longest text the translate_tts endpoint accepts in one request.
const GOOGLE_TTS_MAX_CHARS: usize = 100;

/// Language codes accepted by Google Translate TTS.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "af", "am", "ar", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "el", "en", "es", "et",
    "eu", "fi", "fr", "fr-CA", "gl", "gu", "ha", "hi", "hr", "hu", "id", "is", "it", "iw", "ja",
    "jw", "km", "kn", "ko", "la", "lt", "lv", "ml", "mr", "ms", "my", "ne", "nl", "no", "pa",
    "pl", "pt", "pt-PT", "ro", "ru", "si", "sk", "sq", "sr", "su", "sv", "sw", "ta", "te", "th",
    "tl", "tr", "uk", "ur", "vi", "yue", "zh", "zh-CN", "zh-TW",
];

lazy_static! {
    static ref BREAK_CHAR: Regex =
        Regex::new(r##"[\s\u{FEFF}\u{00A0}!"#$%&'()*+,\-./:;<=>?@\[\\\]^_`{|}~。、？！「」（）]"##)
            .unwrap();
    static ref HAS_WORD_CHAR: Regex = Regex::new(r"\w").unwrap();
}

/// Canonical form of a supported language code, matched case-insensitively.
pub fn supported_language(lang: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .copied()
        .find(|code| code.eq_ignore_ascii_case(lang))
}

pub struct GoogleTranslateTts {
    client: Client,
    host: Url,
}

impl GoogleTranslateTts {
    pub fn new(host: Url, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, host })
    }

    fn chunk_url(&self, chunk: &str, lang: &str, idx: usize, total: usize) -> Result<Url, AppError> {
        let mut url = self.host.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::Internal("GTTS_HOST cannot be a base URL".into()))?
            .pop_if_empty()
            .push("translate_tts");

        url.query_pairs_mut()
            .append_pair("ie", "UTF-8")
            .append_pair("q", chunk)
            .append_pair("tl", lang)
            .append_pair("total", &total.to_string())
            .append_pair("idx", &idx.to_string())
            .append_pair("textlen", &chunk.chars().count().to_string())
            .append_pair("client", "tw-ob")
            .append_pair("ttsspeed", "1");

        Ok(url)
    }
}

#[async_trait]
impl OnlineEngine for GoogleTranslateTts {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, AppError> {
        let lang = supported_language(lang)
            .ok_or_else(|| AppError::OnlineSynthesis(format!("Language not supported: {}", lang)))?;

        let chunks = split_text(text, GOOGLE_TTS_MAX_CHARS);
        if chunks.is_empty() {
            return Err(AppError::OnlineSynthesis("No text to speak".into()));
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.chunk_url(chunk, lang, idx, chunks.len())?;
            tracing::debug!("Requesting chunk {}/{} ({})", idx + 1, chunks.len(), lang);

            let bytes = self
                .client
                .get(url)
                .send()
                .await
                .and_then(|resp| resp.error_for_status())
                .map_err(|e| AppError::OnlineSynthesis(e.to_string()))?
                .bytes()
                .await
                .map_err(|e| AppError::OnlineSynthesis(e.to_string()))?;

            audio.extend_from_slice(&bytes);
        }

        Ok(audio)
    }
}

/// Split `text` into pieces of at most `max_chars` characters, breaking on
/// whitespace or punctuation when one is available. Pieces with nothing
/// speakable in them are dropped.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + max_chars).min(chars.len());

        if end < chars.len() && !is_break(chars[end]) {
            if let Some(split) = (start + 1..end).rev().find(|&i| is_break(chars[i - 1])) {
                end = split;
            }
        }

        pieces.push(chars[start..end].iter().collect::<String>());
        start = end;
    }

    pieces
        .into_iter()
        .map(|piece| piece.trim().to_string())
        .filter(|piece| HAS_WORD_CHAR.is_match(piece))
        .collect()
}

fn is_break(c: char) -> bool {
    let mut buf = [0u8; 4];
    BREAK_CHAR.is_match(c.encode_utf8(&mut buf))
}
