//! askpty-pty: pseudo-terminal pairs for driving terminal programs
//!
//! This crate allocates a master/slave pseudo-terminal pair, exposes the
//! master side as an async byte stream and starts child processes with the
//! slave side as their terminal. It also carries the raw-mode guard used by
//! prompt code that reads keystrokes from a terminal descriptor.
//!
//! # Platform Support
//!
//! Unix only (Linux, macOS, the BSDs), through `rustix`.
//!
//! # Quick Start
//!
//! ```ignore
//! use askpty_pty::{PtyConfig, PtyMaster, WindowSize, spawn_child};
//! use tokio::io::AsyncReadExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (mut master, slave) = PtyMaster::open(WindowSize::default())?;
//!     let mut child = spawn_child(&slave, "echo", ["hello"], &PtyConfig::default())?;
//!     drop(slave);
//!
//!     let mut out = Vec::new();
//!     master.read_to_end(&mut out).await?;
//!     child.wait().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;

#[cfg(unix)]
pub mod unix;

pub use config::{PtyConfig, PtyConfigBuilder, PtySignal, WindowSize};
pub use error::{PtyError, Result};

#[cfg(unix)]
pub use unix::{ExitStatus, PtyChild, PtyMaster, RawMode, is_terminal, spawn_child};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PtyConfig::default();
        assert_eq!(config.window_size, WindowSize::new(80, 24));
        assert!(config.controlling_terminal);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn echo_through_pty() {
        use tokio::io::AsyncReadExt;

        let (mut master, slave) = PtyMaster::open(WindowSize::default()).unwrap();
        let mut child = spawn_child(&slave, "echo", ["through the pty"], &PtyConfig::default())
            .unwrap();
        drop(slave);

        let mut out = Vec::new();
        master.read_to_end(&mut out).await.unwrap();
        assert!(String::from_utf8_lossy(&out).contains("through the pty"));
        assert!(child.wait().await.unwrap().success());
    }
}
