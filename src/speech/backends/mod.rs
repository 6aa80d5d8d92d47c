//! Platform-specific speech backends

// Native TTS backend using the tts crate (cross-platform)
pub mod native;

// espeak-ng subprocess backend (Linux, WSL with WSLG)
pub mod espeak;

// Windows SAPI backend for WSL
pub mod windows;
