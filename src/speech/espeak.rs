//! espeak-ng backed speech playback.
//! Looks the command up once at construction; each call cancels the utterance
//! still playing (last call wins).

use std::process::Stdio;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::lane::SpeechLane;
use super::{select_voice, utterance_text, SpeechParams, Speaker, Voice};
use crate::metrics::{metric_names, MetricsRegistry};

/// espeak-ng's default words per minute and pitch (0-99).
const BASE_WPM: f32 = 175.0;
const BASE_PITCH: f32 = 50.0;

pub struct EspeakSpeaker {
    command: String,
    available: bool,
    voice: Option<Voice>,
    params: SpeechParams,
    lane: SpeechLane,
    metrics: Arc<MetricsRegistry>,
}

impl EspeakSpeaker {
    /// Create a speaker, looking up `command` and its voice list.
    pub async fn new(command: &str, params: SpeechParams, metrics: Arc<MetricsRegistry>) -> Self {
        let available = command_on_path(command).await;
        let voice = if available {
            let voices = list_voices(command).await;
            select_voice(&voices).cloned()
        } else {
            warn!(command, "speech command not found, playback unavailable");
            None
        };

        if let Some(ref v) = voice {
            info!(voice = %v.name, lang = %v.lang, "speech voice selected");
        } else if available {
            info!(command, "no preferred voice, using default");
        }

        Self {
            command: command.to_string(),
            available,
            voice,
            params,
            lane: SpeechLane::new(),
            metrics,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Command-line arguments for one utterance.
    pub fn args(&self, text: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(7);
        if let Some(ref voice) = self.voice {
            args.push("-v".to_string());
            args.push(voice.lang.clone());
        }
        args.push("-s".to_string());
        args.push(((BASE_WPM * self.params.rate).round() as u32).to_string());
        args.push("-p".to_string());
        args.push(((BASE_PITCH * self.params.pitch).round().min(99.0) as u32).to_string());
        args.push(utterance_text(text));
        args
    }
}

impl Speaker for EspeakSpeaker {
    fn speak(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        if !self.available {
            warn!("speech requested but no speech command is available");
            return false;
        }
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(h) => h,
            Err(_) => {
                warn!("speech requested outside an async runtime");
                return false;
            }
        };

        let span = self.metrics.span(metric_names::SPEECH_START);
        // Silence whatever is still playing before the new utterance starts.
        let turn = self.lane.supersede();

        let mut cmd = tokio::process::Command::new(&self.command);
        cmd.args(self.args(text))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let spawned = {
            let _enter = handle.enter();
            cmd.spawn()
        };
        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                warn!(error = %e, "speech process spawn failed");
                return false;
            }
        };
        span.finish();

        let generation = turn.seq;
        debug!(generation, "speech_started");
        handle.spawn(async move {
            tokio::select! {
                status = child.wait() => match status {
                    Ok(s) if s.success() => debug!(generation, "speech_ended"),
                    Ok(s) => warn!(generation, code = ?s.code(), "speech process failed"),
                    Err(e) => warn!(generation, error = %e, "speech wait failed"),
                },
                _ = turn.token.cancelled() => match child.kill().await {
                    Ok(()) => debug!(generation, "speech_superseded"),
                    Err(e) => warn!(generation, error = %e, "speech kill failed"),
                },
            }
        });
        true
    }
}

/// Parse `espeak-ng --voices` output.
/// Columns: Pty, Language, Age/Gender, VoiceName, File, Other Languages.
pub fn parse_voices(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            match cols.as_slice() {
                [_pty, lang, _age_gender, name, ..] => Some(Voice {
                    name: name.to_string(),
                    lang: lang.to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}

async fn list_voices(command: &str) -> Vec<Voice> {
    match tokio::process::Command::new(command).arg("--voices").output().await {
        Ok(output) if output.status.success() => {
            parse_voices(&String::from_utf8_lossy(&output.stdout))
        }
        Ok(output) => {
            warn!(code = ?output.status.code(), "voice listing failed");
            Vec::new()
        }
        Err(e) => {
            warn!(error = %e, "voice listing exec failed");
            Vec::new()
        }
    }
}

/// Whether a command is available on PATH.
async fn command_on_path(name: &str) -> bool {
    tokio::process::Command::new("which")
        .arg(name)
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 5  en-us           --/M      English_(America)  gmw/en-US            (en 3)
 5  hi              --/M      Hindi              inc/hi
 5  ne              --/M      Nepali             inc/ne
";

    fn speaker_with(voice: Option<Voice>) -> EspeakSpeaker {
        EspeakSpeaker {
            command: "espeak-ng".into(),
            available: false,
            voice,
            params: SpeechParams::default(),
            lane: SpeechLane::new(),
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    #[test]
    fn parses_voice_listing() {
        let voices = parse_voices(LISTING);
        assert_eq!(voices.len(), 4);
        assert_eq!(voices[2].lang, "hi");
        assert_eq!(select_voice(&voices).unwrap().name, "Hindi");
    }

    #[test]
    fn args_carry_rate_pitch_and_voice() {
        let speaker = speaker_with(Some(Voice {
            name: "Hindi".into(),
            lang: "hi".into(),
        }));
        let args = speaker.args("नमस्ते");
        assert_eq!(args[..2], ["-v".to_string(), "hi".to_string()]);
        let rate: u32 = args[3].parse().unwrap();
        assert!(rate < BASE_WPM as u32);
        assert_eq!(args[5], "55");
        assert_eq!(args.last().unwrap(), ", नमस्ते");
    }

    #[tokio::test]
    async fn missing_command_is_not_available() {
        let speaker = EspeakSpeaker::new(
            "no-such-speech-command-xyz",
            SpeechParams::default(),
            Arc::new(MetricsRegistry::new()),
        )
        .await;
        assert!(!speaker.is_available());
        assert!(!speaker.speak("नमस्ते"));
    }

    #[test]
    fn unavailable_speaker_reports_failure() {
        let speaker = speaker_with(None);
        assert!(!speaker.speak("नमस्ते"));
        assert!(!speaker.args("x").contains(&"-v".to_string()));
    }
}
