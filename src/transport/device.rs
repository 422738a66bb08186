//! # Device Node Transport
//!
//! Writes jobs straight to a local printer device such as `/dev/usb/lp0`
//! (USB printer class) or `/dev/rfcomm0` (Bluetooth serial).
//!
//! ## TTY Configuration
//!
//! When the device is a TTY (serial or RFCOMM), it is switched to raw mode
//! first so binary raster data passes through unmodified:
//!
//! - **No input processing**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL
//! - **No flow control**: IXON, IXOFF, IXANY (0x11/0x13 occur in raster data)
//! - **No output processing**: OPOST (no LF to CRLF translation)
//! - **8-bit characters**: CS8, no parity
//! - **Non-canonical, no echo**: ICANON, ECHO, ECHONL, ISIG, IEXTEN
//!
//! ## Chunked Writes
//!
//! Large jobs are written in 4096-byte chunks with a short pause between
//! them, so slow links don't overflow the printer's receive buffer.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::Transport;
use crate::error::PrintError;

/// Default chunk size for writes (bytes)
pub const CHUNK_SIZE: usize = 4096;

/// Default delay between chunks (milliseconds)
pub const CHUNK_DELAY_MS: u64 = 2;

/// Writes jobs to a local device node.
#[derive(Debug, Clone)]
pub struct DeviceTransport {
    chunk_size: usize,
    chunk_delay: Duration,
}

impl Default for DeviceTransport {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        }
    }
}

impl DeviceTransport {
    /// Set the chunk size for large writes.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Set the delay between chunks.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// Blocking write of `data` to the device at `path`.
    pub fn write_blocking(&self, path: &Path, data: &[u8]) -> Result<(), PrintError> {
        let mut file = OpenOptions::new().write(true).open(path).map_err(|e| {
            PrintError::Transport(format!("Failed to open {}: {}", path.display(), e))
        })?;

        configure_if_tty(&file)?;

        let mut chunks = data.chunks(self.chunk_size).peekable();
        while let Some(chunk) = chunks.next() {
            file.write_all(chunk)
                .map_err(|e| PrintError::Transport(format!("Write failed: {}", e)))?;

            // No pause after the final chunk
            if chunks.peek().is_some() && !self.chunk_delay.is_zero() {
                thread::sleep(self.chunk_delay);
            }
        }

        file.flush()
            .map_err(|e| PrintError::Transport(format!("Flush failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl Transport for DeviceTransport {
    fn name(&self) -> &'static str {
        "device"
    }

    async fn send(&self, data: &[u8], destination: &str) -> Result<(), PrintError> {
        let transport = self.clone();
        let path = destination.to_string();
        let data = data.to_vec();
        let len = data.len();

        tokio::task::spawn_blocking(move || transport.write_blocking(Path::new(&path), &data))
            .await
            .map_err(|e| PrintError::Transport(format!("Task error: {}", e)))??;

        info!(destination, bytes = len, "job written to device");
        Ok(())
    }
}

#[cfg(unix)]
fn configure_if_tty(file: &File) -> Result<(), PrintError> {
    use std::os::unix::io::AsRawFd;

    let fd = file.as_raw_fd();
    if unsafe { libc::isatty(fd) } != 1 {
        return Ok(());
    }
    debug!(fd, "configuring TTY for raw mode");
    configure_tty_raw(fd)
}

#[cfg(not(unix))]
fn configure_if_tty(_file: &File) -> Result<(), PrintError> {
    Ok(())
}

/// Configure a file descriptor for raw TTY mode.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> Result<(), PrintError> {
    use std::io;
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(PrintError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(PrintError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}
