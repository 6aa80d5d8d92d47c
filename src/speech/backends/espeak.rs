//! espeak-ng backend
//!
//! Requests are queued to a worker thread that runs one `espeak-ng`
//! process at a time, so speech plays in order without blocking the
//! caller. On WSL with WSLG the audio goes through WSLG's PulseAudio
//! server, which is detected and exported as PULSE_SERVER.
//!
//! Dependencies:
//! - espeak-ng (install with: sudo apt install espeak-ng)
//! - PulseAudio client libraries (usually pre-installed with WSLG)

use crate::platform::{is_wsl, wslg_pulse_server, WSLG_PULSE_SERVER};
use crate::speech::{SpeakRequest, SpeechEngine, Voice, VoicesChanged};
use crate::{FalarError, Result};
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

/// Voice espeak-ng uses when `-v` is not given
const DEFAULT_VOICE: &str = "en";

/// One row of `espeak-ng --voices`:
/// `Pty Language Age/Gender VoiceName File Other-Languages`
static VOICE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+\s+(?P<lang>\S+)\s+\S+\s+(?P<name>\S+)\s+(?P<file>\S+)")
        .expect("static voice row pattern")
});

/// espeak-ng backend
pub struct EspeakEngine {
    /// Queue of argument lists for the worker
    queue: Option<Sender<Vec<String>>>,

    /// Worker running espeak-ng processes in order
    worker: Option<JoinHandle<()>>,

    /// espeak speed (words per minute)
    speed: u16,

    /// espeak amplitude (0-200)
    amplitude: u8,

    /// Path to espeak-ng
    espeak_path: String,

    /// Voice-change subscriber
    on_change: Option<VoicesChanged>,
}

impl EspeakEngine {
    /// Setup PulseAudio server environment
    ///
    /// Auto-detects the WSLG PulseAudio server and sets PULSE_SERVER if needed.
    fn setup_pulseaudio() -> Result<()> {
        if std::env::var("PULSE_SERVER").is_ok() {
            debug!("PULSE_SERVER already set via environment");
            return Ok(());
        }

        if let Some(server) = wslg_pulse_server() {
            info!("Auto-detected WSLG PulseAudio server at {}", server.display());
            std::env::set_var("PULSE_SERVER", server);
            return Ok(());
        }

        if is_wsl() {
            warn!("WSLG PulseAudio server not found at {}", WSLG_PULSE_SERVER);
            warn!("Make sure WSLg is installed and running, or set PULSE_SERVER");
            return Err(FalarError::Speech(
                "PulseAudio server not found. Install WSLg or set PULSE_SERVER environment variable."
                    .to_string(),
            ));
        }

        // Native Linux: espeak-ng uses the default audio configuration
        debug!("Running on native Linux - using default audio configuration");
        Ok(())
    }

    /// Create a new espeak-ng engine
    pub fn new() -> Result<Self> {
        debug!("Creating espeak-ng backend");

        Self::setup_pulseaudio()?;

        let espeak_path = Self::find_espeak()?;
        debug!("Found espeak-ng at: {}", espeak_path);

        let (queue, worker) = Self::start_worker(espeak_path.clone())?;

        Ok(Self {
            queue: Some(queue),
            worker: Some(worker),
            speed: Self::rate_to_espeak_speed(50),
            amplitude: Self::volume_to_espeak_amplitude(50),
            espeak_path,
            on_change: None,
        })
    }

    /// Find espeak-ng executable
    fn find_espeak() -> Result<String> {
        for path in ["espeak-ng", "/usr/bin/espeak-ng"] {
            if let Ok(status) = Command::new(path)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                if status.success() {
                    return Ok(path.to_string());
                }
            }
        }

        Err(FalarError::Speech(
            "espeak-ng not found. Install with: sudo apt install espeak-ng".to_string(),
        ))
    }

    /// Convert falar rate (0-100) to espeak speed (80-450 wpm)
    fn rate_to_espeak_speed(rate: u8) -> u16 {
        80 + ((rate.min(100) as u16) * 370 / 100)
    }

    /// Convert falar volume (0-100) to espeak amplitude (0-200)
    fn volume_to_espeak_amplitude(volume: u8) -> u8 {
        ((volume.min(100) as u16 * 200) / 100) as u8
    }

    /// Parse the table printed by `espeak-ng --voices`
    ///
    /// Rows keep their printed order. The language column doubles as the
    /// voice id since that is what `-v` accepts.
    fn parse_voice_list(output: &str) -> Vec<Voice> {
        output
            .lines()
            .filter_map(|line| VOICE_ROW.captures(line))
            .map(|caps| {
                let lang = &caps["lang"];
                let name = caps["name"].replace('_', " ");
                Voice::new(lang, name, lang, lang == DEFAULT_VOICE)
            })
            .collect()
    }

    /// Start the thread that plays queued requests one after another
    fn start_worker(espeak_path: String) -> Result<(Sender<Vec<String>>, JoinHandle<()>)> {
        let (tx, rx) = mpsc::channel::<Vec<String>>();

        let worker = thread::Builder::new()
            .name("espeak-ng".to_string())
            .spawn(move || {
                for args in rx {
                    match Command::new(&espeak_path)
                        .args(&args)
                        .stdout(Stdio::null())
                        .stderr(Stdio::null())
                        .status()
                    {
                        Ok(status) if !status.success() => {
                            warn!("espeak-ng exited with {}", status)
                        }
                        Ok(_) => {}
                        Err(e) => error!("Failed to run espeak-ng: {}", e),
                    }
                }
                debug!("espeak-ng worker finished");
            })
            .map_err(|e| FalarError::Speech(format!("Failed to start espeak-ng worker: {}", e)))?;

        Ok((tx, worker))
    }

    /// espeak-ng arguments for a request
    fn speak_args(&self, request: &SpeakRequest) -> Vec<String> {
        let voice = request
            .voice
            .as_ref()
            .map(|v| v.id.as_str())
            .unwrap_or(DEFAULT_VOICE);

        vec![
            "-v".to_string(),
            voice.to_string(),
            "-s".to_string(),
            self.speed.to_string(),
            "-a".to_string(),
            self.amplitude.to_string(),
            // Keep text starting with '-' from being read as an option
            "--".to_string(),
            request.text.clone(),
        ]
    }

    fn notify(&self) {
        if let Some(on_change) = &self.on_change {
            on_change();
        }
    }
}

impl SpeechEngine for EspeakEngine {
    fn name(&self) -> &'static str {
        "espeak"
    }

    fn voices(&mut self) -> Result<Vec<Voice>> {
        let output = Command::new(&self.espeak_path)
            .arg("--voices")
            .stderr(Stdio::null())
            .output()
            .map_err(|e| FalarError::Speech(format!("Failed to list espeak-ng voices: {}", e)))?;

        if !output.status.success() {
            return Err(FalarError::Speech(format!(
                "espeak-ng --voices exited with {}",
                output.status
            )));
        }

        let voices = Self::parse_voice_list(&String::from_utf8_lossy(&output.stdout));
        debug!("espeak-ng reports {} voices", voices.len());
        Ok(voices)
    }

    fn speak(&mut self, request: &SpeakRequest) -> Result<()> {
        let args = self.speak_args(request);
        debug!("Queueing speech: {:?}", args);

        let queue = self
            .queue
            .as_ref()
            .ok_or_else(|| FalarError::Speech("espeak-ng worker not running".to_string()))?;
        queue
            .send(args)
            .map_err(|_| FalarError::Speech("espeak-ng worker stopped".to_string()))
    }

    fn set_rate(&mut self, rate: u8) -> Result<()> {
        debug!("Setting rate to {}", rate);
        self.speed = Self::rate_to_espeak_speed(rate);
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> Result<()> {
        debug!("Setting volume to {}", volume);
        self.amplitude = Self::volume_to_espeak_amplitude(volume);
        Ok(())
    }

    fn subscribe(&mut self, on_change: VoicesChanged) {
        self.on_change = Some(on_change);
        self.notify();
    }

    fn rescan(&mut self) -> Result<()> {
        self.notify();
        Ok(())
    }
}

impl Drop for EspeakEngine {
    fn drop(&mut self) {
        debug!("Shutting down espeak-ng backend");
        // Closing the queue lets the worker finish what is already queued
        self.queue.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("espeak-ng worker panicked");
            }
        }
    }
}
