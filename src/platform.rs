//! Platform detection and file descriptor setup

use crate::Result;
use log::{debug, warn};
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use std::fs;
use std::io;
use std::os::unix::io::RawFd;
use std::path::Path;

/// PulseAudio socket exported by WSLG
pub const WSLG_PULSE_SERVER: &str = "/mnt/wslg/PulseServer";

/// Detect if running in WSL (Windows Subsystem for Linux)
///
/// Checks /proc/version and the WSL_DISTRO_NAME variable.
pub fn is_wsl() -> bool {
    if let Ok(contents) = fs::read_to_string("/proc/version") {
        if is_wsl_kernel(&contents) {
            return true;
        }
    }

    std::env::var("WSL_DISTRO_NAME").is_ok()
}

/// Does a /proc/version line describe a WSL kernel?
fn is_wsl_kernel(version: &str) -> bool {
    let lower = version.to_lowercase();
    lower.contains("microsoft") || lower.contains("wsl")
}

/// WSLG's PulseAudio server, if present on this machine
pub fn wslg_pulse_server() -> Option<&'static Path> {
    let path = Path::new(WSLG_PULSE_SERVER);
    path.exists().then_some(path)
}

/// Keeps a file descriptor non-blocking until dropped
///
/// stdin's open file description is shared with the parent shell, so the
/// original flags are put back on drop.
pub struct NonBlocking {
    fd: RawFd,
    original: OFlag,
}

impl NonBlocking {
    pub fn enable(fd: RawFd) -> Result<Self> {
        let original =
            OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL).map_err(io::Error::from)?);
        fcntl(fd, FcntlArg::F_SETFL(original | OFlag::O_NONBLOCK)).map_err(io::Error::from)?;
        debug!("fd {} set non-blocking", fd);
        Ok(Self { fd, original })
    }
}

impl Drop for NonBlocking {
    fn drop(&mut self) {
        if let Err(e) = fcntl(self.fd, FcntlArg::F_SETFL(self.original)) {
            warn!("Failed to restore flags on fd {}: {}", self.fd, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;
    use std::os::unix::io::AsRawFd;

    #[test]
    fn test_is_wsl() {
        // Result depends on the machine; it just must not panic
        let _ = is_wsl();
    }

    #[test]
    fn test_wsl_kernel_strings() {
        assert!(is_wsl_kernel(
            "Linux version 5.15.153.1-microsoft-standard-WSL2 (root@1c602f52c2e4)"
        ));
        assert!(!is_wsl_kernel("Linux version 6.8.0-45-generic (buildd@lcy02-amd64-075)"));
    }

    #[test]
    fn test_non_blocking_is_restored() {
        let (read_end, _write_end) = nix::unistd::pipe().unwrap();
        let fd = read_end.as_raw_fd();
        let flags = || OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL).unwrap());
        assert!(!flags().contains(OFlag::O_NONBLOCK));

        {
            let _guard = NonBlocking::enable(fd).unwrap();
            assert!(flags().contains(OFlag::O_NONBLOCK));
            // An empty pipe reports EAGAIN instead of blocking
            let mut buf = [0u8; 8];
            assert_eq!(nix::unistd::read(fd, &mut buf), Err(Errno::EAGAIN));
        }

        assert!(!flags().contains(OFlag::O_NONBLOCK));
    }
}
