//! Shared test doubles: an in-memory speech engine and capturing outputs

#![allow(dead_code)]

use falar::speech::{SpeakRequest, SpeechEngine, Voice, VoiceSignal, VoicesChanged};
use falar::state::config::Config;
use falar::state::State;
use falar::ui::Notifier;
use falar::{FalarError, Result};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    voices: Vec<Voice>,
    spoken: Vec<SpeakRequest>,
    fail_voices: bool,
    fail_speak: bool,
    subscriptions: usize,
    voice_queries: usize,
    rate: Option<u8>,
    volume: Option<u8>,
    on_change: Option<VoicesChanged>,
}

/// Engine whose voices and received requests live in memory
pub struct MockEngine {
    inner: Arc<Mutex<Inner>>,
}

/// Test-side handle to a `MockEngine` after it has been boxed away
#[derive(Clone)]
pub struct MockHandle {
    inner: Arc<Mutex<Inner>>,
}

pub fn mock_engine(voices: Vec<Voice>) -> (MockEngine, MockHandle) {
    let inner = Arc::new(Mutex::new(Inner {
        voices,
        ..Inner::default()
    }));
    (
        MockEngine {
            inner: inner.clone(),
        },
        MockHandle { inner },
    )
}

impl SpeechEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn voices(&mut self) -> Result<Vec<Voice>> {
        let mut inner = self.inner.lock().unwrap();
        inner.voice_queries += 1;
        if inner.fail_voices {
            return Err(FalarError::Speech("voices unavailable".to_string()));
        }
        Ok(inner.voices.clone())
    }

    fn speak(&mut self, request: &SpeakRequest) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_speak {
            return Err(FalarError::Speech("engine busy".to_string()));
        }
        inner.spoken.push(request.clone());
        Ok(())
    }

    fn set_rate(&mut self, rate: u8) -> Result<()> {
        self.inner.lock().unwrap().rate = Some(rate);
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> Result<()> {
        self.inner.lock().unwrap().volume = Some(volume);
        Ok(())
    }

    /// Unlike the real backends, does not fire on subscribe; tests decide
    fn subscribe(&mut self, on_change: VoicesChanged) {
        let mut inner = self.inner.lock().unwrap();
        inner.subscriptions += 1;
        inner.on_change = Some(on_change);
    }

    fn rescan(&mut self) -> Result<()> {
        let inner = self.inner.lock().unwrap();
        if let Some(on_change) = &inner.on_change {
            on_change();
        }
        Ok(())
    }
}

impl MockHandle {
    /// Emit a synthetic "voice list changed" notification
    pub fn fire(&self) {
        let inner = self.inner.lock().unwrap();
        if let Some(on_change) = &inner.on_change {
            on_change();
        }
    }

    pub fn set_voices(&self, voices: Vec<Voice>) {
        self.inner.lock().unwrap().voices = voices;
    }

    pub fn fail_voices(&self, fail: bool) {
        self.inner.lock().unwrap().fail_voices = fail;
    }

    pub fn fail_speak(&self, fail: bool) {
        self.inner.lock().unwrap().fail_speak = fail;
    }

    pub fn spoken(&self) -> Vec<SpeakRequest> {
        self.inner.lock().unwrap().spoken.clone()
    }

    pub fn subscriptions(&self) -> usize {
        self.inner.lock().unwrap().subscriptions
    }

    pub fn voice_queries(&self) -> usize {
        self.inner.lock().unwrap().voice_queries
    }

    pub fn rate(&self) -> Option<u8> {
        self.inner.lock().unwrap().rate
    }

    pub fn volume(&self) -> Option<u8> {
        self.inner.lock().unwrap().volume
    }
}

/// Notifier recording every notice
#[derive(Clone, Default)]
pub struct Notices(Arc<Mutex<Vec<String>>>);

impl Notices {
    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for Notices {
    fn notice(&mut self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

/// Writer capturing output; can be made to fail like a closed pipe
#[derive(Clone, Default)]
pub struct Output {
    bytes: Arc<Mutex<Vec<u8>>>,
    broken: Arc<AtomicBool>,
}

impl Output {
    pub fn text(&self) -> String {
        String::from_utf8(self.bytes.lock().unwrap().clone()).unwrap()
    }

    pub fn clear(&self) {
        self.bytes.lock().unwrap().clear();
    }

    pub fn set_broken(&self, broken: bool) {
        self.broken.store(broken, Ordering::SeqCst);
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The two voices used throughout the tests
pub fn ana_and_tom() -> Vec<Voice> {
    vec![
        Voice::new("ana", "Ana", "pt-BR", false),
        Voice::new("tom", "Tom", "en-US", true),
    ]
}

pub struct Harness {
    pub state: State,
    pub engine: MockHandle,
    pub notices: Notices,
    pub output: Output,
}

/// State wired to a mock engine, before any notification was processed
pub fn harness_with_config(voices: Vec<Voice>, config: Config) -> Harness {
    let (engine, handle) = mock_engine(voices);
    let notices = Notices::default();
    let output = Output::default();
    let state = State::new(
        config,
        Box::new(engine),
        Box::new(notices.clone()),
        VoiceSignal::new(),
        Box::new(output.clone()),
    )
    .expect("state");

    Harness {
        state,
        engine: handle,
        notices,
        output,
    }
}

/// Config loaded from INI text
pub fn config_from(text: &str) -> Config {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("falar.cfg");
    std::fs::write(&path, text).expect("write config");
    Config::load_from(&path).expect("load config")
}

pub fn harness(voices: Vec<Voice>) -> Harness {
    harness_with_config(voices, Config::defaults())
}

/// Harness whose first notification has already been processed
pub fn loaded_harness(voices: Vec<Voice>) -> Harness {
    let mut h = harness(voices);
    h.engine.fire();
    assert!(h.state.process_pending());
    h
}
