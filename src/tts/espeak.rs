use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;
use crate::tts::engine::OfflineEngine;
use crate::tts::voice::OfflineVoice;

lazy_static! {
    // Pty Language Age/Gender VoiceName File [Other Languages]
    static ref VOICE_LINE: Regex = Regex::new(
        r"^\s*\d+\s+(\S+)\s+\S+\s+(\S+)\s+\S+(?:\s+(.*))?$"
    )
    .unwrap();

    // "(en-uk 2)(en 2)"
    static ref OTHER_LANGUAGE: Regex = Regex::new(r"\(([^\s()]+)\s+\d+\)").unwrap();
}

/// espeak-ng driven as a subprocess.
pub struct EspeakEngine {
    program: String,
}

impl EspeakEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn spawn_error(&self, e: std::io::Error) -> AppError {
        AppError::OfflineSynthesis(format!(
            "Failed to run {} (is it installed?): {}",
            self.program, e
        ))
    }
}

impl OfflineEngine for EspeakEngine {
    fn voices(&self) -> Result<Vec<OfflineVoice>, AppError> {
        let output = Command::new(&self.program)
            .arg("--voices")
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::OfflineSynthesis(format!(
                "{} --voices failed: {}",
                self.program, stderr
            )));
        }

        Ok(parse_voice_table(&String::from_utf8_lossy(&output.stdout)))
    }

    fn synthesize_to_file(
        &self,
        text: &str,
        voice: Option<&str>,
        path: &Path,
    ) -> Result<(), AppError> {
        let mut command = Command::new(&self.program);
        command.arg("-w").arg(path).arg("--stdin");
        if let Some(voice) = voice {
            command.args(["-v", voice]);
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Text goes through stdin so a leading '-' is never read as a flag.
        // The child is always reaped, even when the write fails.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::OfflineSynthesis(format!(
                "{} failed: {}",
                self.program,
                stderr.trim()
            )));
        }

        match written {
            // A clean exit after closing stdin early means the engine was done reading.
            Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Parse the table printed by `espeak-ng --voices`.
///
/// The language column doubles as the voice id since `-v` accepts it.
/// Lines that don't look like voice rows (the header, blanks) are skipped.
pub fn parse_voice_table(table: &str) -> Vec<OfflineVoice> {
    table
        .lines()
        .filter_map(|line| {
            let cap = VOICE_LINE.captures(line)?;
            let language = cap[1].to_string();
            let name = cap[2].replace('_', " ");

            let mut languages = vec![language.clone()];
            if let Some(other) = cap.get(3) {
                languages.extend(
                    OTHER_LANGUAGE
                        .captures_iter(other.as_str())
                        .map(|c| c[1].to_string())
                        .filter(|l| *l != language),
                );
            }

            Some(OfflineVoice {
                id: language,
                name,
                languages,
            })
        })
        .collect()
}
