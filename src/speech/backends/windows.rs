//! Windows TTS backend using SAPI (System.Speech.Synthesis)
//!
//! Meant for WSL, where Speech Dispatcher may be missing but Windows SAPI is
//! reachable through PowerShell.
//!
//! Speech goes through a persistent PowerShell process reading commands
//! from stdin, one per line:
//! - s<voice>\t<text>: queue text, with the named voice (empty = default)
//! - r<rate>: set rate (0-100, converted to SAPI -10 to 10)
//! - v<volume>: set volume (0-100)
//! - q: quit
//!
//! Voice listing runs a separate one-shot PowerShell command.

use crate::speech::{SpeakRequest, SpeechEngine, Voice, VoicesChanged};
use crate::{FalarError, Result};
use log::{debug, error};
use std::io::Write;
use std::process::{Child, Command, Stdio};

/// Prints `default|<name>` then one `<name>|<culture>` line per voice
const LIST_VOICES_SCRIPT: &str = r#"
Add-Type -AssemblyName System.Speech
$synth = New-Object System.Speech.Synthesis.SpeechSynthesizer
"default|" + $synth.Voice.Name
foreach ($v in $synth.GetInstalledVoices()) {
    if ($v.Enabled) { $v.VoiceInfo.Name + "|" + $v.VoiceInfo.Culture.Name }
}
"#;

/// Speech server loop fed through stdin
const SPEECH_SERVER_SCRIPT: &str = r#"
Add-Type -AssemblyName System.Speech
$synth = New-Object System.Speech.Synthesis.SpeechSynthesizer
$default = $synth.Voice.Name
$synth.Rate = 0
$synth.Volume = 80

while ($line = [Console]::ReadLine()) {
    if ($line -eq $null) { break }
    if ($line.Length -eq 0) { continue }

    $cmd = $line[0]
    $arg = $line.Substring(1)

    switch ($cmd) {
        's' {
            $parts = $arg.Split("`t", 2)
            if ($parts.Count -eq 2 -and $parts[1]) {
                $name = $parts[0]
                if (-not $name) { $name = $default }
                try { $synth.SelectVoice($name) } catch { $synth.SelectVoice($default) }
                [void]$synth.SpeakAsync($parts[1])
            }
        }
        'r' {
            if ($arg) {
                $sapiRate = [Math]::Round(([int]$arg - 50) / 5.0)
                $synth.Rate = [Math]::Max(-10, [Math]::Min(10, $sapiRate))
            }
        }
        'v' {
            if ($arg) {
                $synth.Volume = [Math]::Max(0, [Math]::Min(100, [int]$arg))
            }
        }
        'q' { break }
    }
}
"#;

/// Windows SAPI backend for WSL
pub struct SapiEngine {
    /// Persistent PowerShell process running the speech server
    process: Option<Child>,

    /// Path to powershell.exe
    powershell_path: String,

    /// Voice-change subscriber
    on_change: Option<VoicesChanged>,
}

impl SapiEngine {
    /// Create a new Windows SAPI engine
    ///
    /// Verifies PowerShell is available and spawns the speech server
    pub fn new() -> Result<Self> {
        debug!("Creating Windows SAPI backend");

        let powershell_path = Self::find_powershell()?;
        debug!("Found PowerShell at: {}", powershell_path);

        Self::run_script(&powershell_path, "Add-Type -AssemblyName System.Speech")?;
        debug!("Windows SAPI test successful");

        let mut engine = Self {
            process: None,
            powershell_path,
            on_change: None,
        };
        engine.start_speech_process()?;

        Ok(engine)
    }

    /// Find PowerShell executable (WSL interop)
    fn find_powershell() -> Result<String> {
        let paths = [
            "powershell.exe",
            "/mnt/c/Windows/System32/WindowsPowerShell/v1.0/powershell.exe",
        ];

        for path in paths {
            if let Ok(status) = Command::new(path)
                .arg("-Command")
                .arg("$PSVersionTable.PSVersion")
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
            "PowerShell not found. WSL interop may not be enabled.".to_string(),
        ))
    }

    /// Run a one-shot PowerShell script and return its stdout
    fn run_script(powershell_path: &str, script: &str) -> Result<String> {
        let output = Command::new(powershell_path)
            .arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-Command")
            .arg(script)
            .output()
            .map_err(|e| FalarError::Speech(format!("Failed to run PowerShell: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FalarError::Speech(format!(
                "Windows SAPI not available: {}",
                stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Parse the output of `LIST_VOICES_SCRIPT`
    fn parse_voice_list(output: &str) -> Vec<Voice> {
        let mut default_name = None;
        let mut voices = Vec::new();

        for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some((name, culture)) = line.split_once('|') else {
                continue;
            };
            if name == "default" && default_name.is_none() && voices.is_empty() {
                default_name = Some(culture.to_string());
                continue;
            }
            voices.push(Voice::new(name, name, culture, false));
        }

        if let Some(default_name) = default_name {
            for voice in voices.iter_mut() {
                voice.is_default = voice.name == default_name;
            }
        }

        voices
    }

    /// Start the persistent PowerShell speech server process
    fn start_speech_process(&mut self) -> Result<()> {
        debug!("Starting persistent PowerShell speech process");

        let child = Command::new(&self.powershell_path)
            .arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-Command")
            .arg(SPEECH_SERVER_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn PowerShell speech process: {}", e);
                FalarError::Speech(format!("Failed to start speech process: {}", e))
            })?;

        debug!("PowerShell speech process started with PID: {:?}", child.id());
        self.process = Some(child);
        Ok(())
    }

    /// Send a command to the PowerShell speech process
    fn send_command(&mut self, cmd: &str) -> Result<()> {
        let child = self
            .process
            .as_mut()
            .ok_or_else(|| FalarError::Speech("Speech process not running".to_string()))?;
        let stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| FalarError::Speech("Speech process stdin not available".to_string()))?;

        writeln!(stdin, "{}", cmd).map_err(|e| {
            error!("Failed to write command to speech process: {}", e);
            FalarError::Speech(format!("Failed to send command: {}", e))
        })?;
        stdin.flush().map_err(|e| {
            error!("Failed to flush stdin: {}", e);
            FalarError::Speech(format!("Failed to flush command: {}", e))
        })
    }

    /// Keep text on one protocol line
    fn escape_text(text: &str) -> String {
        text.replace(['\n', '\r', '\t'], " ")
    }

    /// Build the `s` command for a request
    fn speak_command(request: &SpeakRequest) -> String {
        let voice = request
            .voice
            .as_ref()
            .map(|v| Self::escape_text(&v.id))
            .unwrap_or_default();
        format!("s{}\t{}", voice, Self::escape_text(&request.text))
    }

    fn notify(&self) {
        if let Some(on_change) = &self.on_change {
            on_change();
        }
    }
}

impl SpeechEngine for SapiEngine {
    fn name(&self) -> &'static str {
        "sapi"
    }

    fn voices(&mut self) -> Result<Vec<Voice>> {
        let output = Self::run_script(&self.powershell_path, LIST_VOICES_SCRIPT)?;
        Ok(Self::parse_voice_list(&output))
    }

    fn speak(&mut self, request: &SpeakRequest) -> Result<()> {
        let cmd = Self::speak_command(request);
        debug!("Speaking: {}", cmd);
        self.send_command(&cmd)
    }

    fn set_rate(&mut self, rate: u8) -> Result<()> {
        debug!("Setting rate to {}", rate);
        self.send_command(&format!("r{}", rate))
    }

    fn set_volume(&mut self, volume: u8) -> Result<()> {
        debug!("Setting volume to {}", volume);
        self.send_command(&format!("v{}", volume))
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

impl Drop for SapiEngine {
    fn drop(&mut self) {
        debug!("Shutting down Windows SAPI backend");

        if let Err(e) = self.send_command("q") {
            debug!("Failed to send quit command: {}", e);
        }

        if let Some(mut child) = self.process.take() {
            match child.kill() {
                Ok(_) => {
                    debug!("PowerShell speech process terminated");
                    let _ = child.wait();
                }
                Err(e) => debug!("Failed to kill PowerShell process: {}", e),
            }
        }
    }
}
