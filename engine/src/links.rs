//! Outbound navigation: hand a URL to the platform's default browser.
//!
//! The browser opens the page in its own window; nothing is exchanged back.

use std::io;
use std::process::{Command, Stdio};

/// Signature of the launcher used by [`crate::App`]; swapped out in tests.
pub type Opener = fn(&str) -> io::Result<()>;

/// Spawn the platform opener for `url` without waiting on it.
pub fn open_external(url: &str) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", url]);
        command
    };

    #[cfg(target_os = "macos")]
    let mut command = {
        let mut command = Command::new("open");
        command.arg(url);
        command
    };

    #[cfg(all(unix, not(target_os = "macos")))]
    let mut command = {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    };

    // The opener must not scribble over the alternate screen.
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(drop)
}
