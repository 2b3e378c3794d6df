//! Output buffer for a single exec channel.
//!
//! RouterOS decorates terminal output with ANSI colour codes and CRLF line
//! endings even on non-PTY exec channels. Both are removed here so the
//! parsers only ever see plain `\n`-separated text.

use bytes::BytesMut;
use memchr::memchr;

/// Everything a command wrote before its channel closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Standard output, cleaned.
    pub stdout: String,

    /// Standard error, cleaned.
    pub stderr: String,

    /// Exit status, if the server sent one.
    pub exit_status: Option<u32>,
}

/// Accumulates stdout and stderr chunks for one command.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    stdout: BytesMut,
    stderr: BytesMut,
    exit_status: Option<u32>,
}

impl OutputBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            stdout: BytesMut::with_capacity(4096),
            stderr: BytesMut::new(),
            exit_status: None,
        }
    }

    /// Append a stdout chunk.
    pub fn extend_stdout(&mut self, data: &[u8]) {
        self.stdout.extend_from_slice(data);
    }

    /// Append a stderr chunk.
    pub fn extend_stderr(&mut self, data: &[u8]) {
        self.stderr.extend_from_slice(data);
    }

    /// Record the exit status reported by the server.
    pub fn set_exit_status(&mut self, status: u32) {
        self.exit_status = Some(status);
    }

    /// Bytes of stdout collected so far.
    pub fn stdout_len(&self) -> usize {
        self.stdout.len()
    }

    /// Bytes of stderr collected so far.
    pub fn stderr_len(&self) -> usize {
        self.stderr.len()
    }

    /// Clean both streams and hand them over.
    ///
    /// Escape sequences are stripped on the complete stream rather than per
    /// chunk, since a sequence may be split across two SSH packets.
    pub fn finish(self) -> ExecOutput {
        ExecOutput {
            stdout: clean(&self.stdout),
            stderr: clean(&self.stderr),
            exit_status: self.exit_status,
        }
    }
}

/// Strip ANSI escape codes and carriage returns, then decode lossily.
fn clean(raw: &[u8]) -> String {
    let stripped = strip_ansi_escapes::strip(raw);
    let text = if memchr(b'\r', &stripped).is_some() {
        stripped.into_iter().filter(|&b| b != b'\r').collect()
    } else {
        stripped
    };
    String::from_utf8_lossy(&text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extend() {
        let mut buffer = OutputBuffer::new();
        buffer.extend_stdout(b"Hello, ");
        buffer.extend_stdout(b"world!");
        assert_eq!(buffer.stdout_len(), 13);
        assert_eq!(buffer.finish().stdout, "Hello, world!");
    }

    #[test]
    fn test_ansi_stripping() {
        let mut buffer = OutputBuffer::new();
        buffer.extend_stdout(b"\x1b[32mrunning=true\x1b[0m");
        assert_eq!(buffer.finish().stdout, "running=true");
    }

    #[test]
    fn test_escape_split_across_chunks() {
        let mut buffer = OutputBuffer::new();
        buffer.extend_stdout(b"name=ether1 \x1b[3");
        buffer.extend_stdout(b"2mtype=ether\x1b[0m");
        assert_eq!(buffer.finish().stdout, "name=ether1 type=ether");
    }

    #[test]
    fn test_crlf_normalized() {
        let mut buffer = OutputBuffer::new();
        buffer.extend_stdout(b"uptime: 1d\r\nversion: 7.11\r\n");
        assert_eq!(buffer.finish().stdout, "uptime: 1d\nversion: 7.11\n");
    }

    #[test]
    fn test_streams_kept_apart() {
        let mut buffer = OutputBuffer::new();
        buffer.extend_stdout(b"out");
        buffer.extend_stderr(b"err");
        buffer.set_exit_status(1);
        let output = buffer.finish();
        assert_eq!(output.stdout, "out");
        assert_eq!(output.stderr, "err");
        assert_eq!(output.exit_status, Some(1));
    }
}
