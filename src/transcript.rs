//! Installation transcript
//!
//! The append-only log an attempt writes into and the UI reads from.
//! Output arrives as raw byte chunks per channel; complete lines are
//! appended in arrival order, a trailing partial line is buffered per
//! channel until its terminator (or until the attempt flushes it at
//! process exit).

use chrono::{DateTime, Local};

/// Display severity for supervisor status lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Where a transcript line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Stdout,
    Stderr,
    Status(Severity),
}

/// One rendered transcript line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub kind: LineKind,
    pub text: String,
    pub at: DateTime<Local>,
}

impl LogLine {
    fn new(kind: LineKind, text: String) -> Self {
        LogLine {
            kind,
            text,
            at: Local::now(),
        }
    }

    /// Prefix used when the line is written to the install log file
    pub fn file_prefix(&self) -> &'static str {
        match self.kind {
            LineKind::Stdout => "",
            LineKind::Stderr => "[stderr] ",
            LineKind::Status(_) => "[status] ",
        }
    }
}

/// The two child output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChannel {
    Stdout,
    Stderr,
}

impl OutputChannel {
    fn line_kind(self) -> LineKind {
        match self {
            OutputChannel::Stdout => LineKind::Stdout,
            OutputChannel::Stderr => LineKind::Stderr,
        }
    }
}

/// Privilege-tool prompt residue on stderr is not installer output
fn is_prompt_noise(channel: OutputChannel, line: &str) -> bool {
    channel == OutputChannel::Stderr
        && (line.contains("[sudo]") || line.contains("password for"))
}

/// Append-only, ordered installation log
#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<LogLine>,
    stdout_partial: Vec<u8>,
    stderr_partial: Vec<u8>,
}

impl Transcript {
    pub fn new() -> Self {
        Transcript::default()
    }

    /// Ingest a raw chunk from one channel.
    ///
    /// Returns every line the chunk completed, including prompt-noise lines
    /// that are suppressed from the transcript itself (callers tee them to
    /// the install log file).
    pub fn push_chunk(&mut self, channel: OutputChannel, chunk: &[u8]) -> Vec<LogLine> {
        let partial = match channel {
            OutputChannel::Stdout => &mut self.stdout_partial,
            OutputChannel::Stderr => &mut self.stderr_partial,
        };
        partial.extend_from_slice(chunk);

        let mut completed = Vec::new();
        while let Some(pos) = partial.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = partial.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&raw)
                .trim_end_matches(['\n', '\r'])
                .to_string();
            completed.push(LogLine::new(channel.line_kind(), text));
        }

        for line in &completed {
            if !is_prompt_noise(channel, &line.text) {
                self.lines.push(line.clone());
            }
        }
        completed
    }

    /// Flush unterminated partial lines, both channels. Called once when
    /// the process terminates so no output is lost.
    pub fn flush_partial(&mut self) -> Vec<LogLine> {
        let mut flushed = Vec::new();
        for channel in [OutputChannel::Stdout, OutputChannel::Stderr] {
            let partial = match channel {
                OutputChannel::Stdout => &mut self.stdout_partial,
                OutputChannel::Stderr => &mut self.stderr_partial,
            };
            if partial.is_empty() {
                continue;
            }
            let raw = std::mem::take(partial);
            let text = String::from_utf8_lossy(&raw)
                .trim_end_matches('\r')
                .to_string();
            let line = LogLine::new(channel.line_kind(), text);
            if !is_prompt_noise(channel, &line.text) {
                self.lines.push(line.clone());
            }
            flushed.push(line);
        }
        flushed
    }

    /// Append a supervisor status line
    pub fn push_status(&mut self, severity: Severity, text: impl Into<String>) -> LogLine {
        let line = LogLine::new(LineKind::Status(severity), text.into());
        self.lines.push(line.clone());
        line
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Lines appended since a previous `len()` mark (the poll interface)
    pub fn lines_since(&self, mark: usize) -> &[LogLine] {
        &self.lines[mark.min(self.lines.len())..]
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Reset for a new attempt
    pub fn clear(&mut self) {
        self.lines.clear();
        self.stdout_partial.clear();
        self.stderr_partial.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[LogLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    // ==================== Chunk Assembly Tests ====================

    #[test]
    fn test_single_complete_line() {
        let mut t = Transcript::new();
        t.push_chunk(OutputChannel::Stdout, b"hello\n");
        assert_eq!(texts(t.lines()), vec!["hello"]);
    }

    #[test]
    fn test_partial_line_buffers_until_terminator() {
        let mut t = Transcript::new();
        t.push_chunk(OutputChannel::Stdout, b"instal");
        assert!(t.is_empty());
        t.push_chunk(OutputChannel::Stdout, b"ling foo\n");
        assert_eq!(texts(t.lines()), vec!["installing foo"]);
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut t = Transcript::new();
        t.push_chunk(OutputChannel::Stdout, b"one\ntwo\nthr");
        assert_eq!(texts(t.lines()), vec!["one", "two"]);
        t.push_chunk(OutputChannel::Stdout, b"ee\n");
        assert_eq!(texts(t.lines()), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_crlf_is_trimmed() {
        let mut t = Transcript::new();
        t.push_chunk(OutputChannel::Stdout, b"line\r\n");
        assert_eq!(texts(t.lines()), vec!["line"]);
    }

    #[test]
    fn test_channels_have_independent_partials() {
        let mut t = Transcript::new();
        t.push_chunk(OutputChannel::Stdout, b"out-part");
        t.push_chunk(OutputChannel::Stderr, b"err line\n");
        t.push_chunk(OutputChannel::Stdout, b"ial\n");
        assert_eq!(texts(t.lines()), vec!["err line", "out-partial"]);
        assert_eq!(t.lines()[0].kind, LineKind::Stderr);
        assert_eq!(t.lines()[1].kind, LineKind::Stdout);
    }

    #[test]
    fn test_per_channel_order_preserved() {
        let mut t = Transcript::new();
        t.push_chunk(OutputChannel::Stdout, b"A1\n");
        t.push_chunk(OutputChannel::Stderr, b"B1\n");
        t.push_chunk(OutputChannel::Stdout, b"A2\n");
        let stdout_lines: Vec<&str> = t
            .lines()
            .iter()
            .filter(|l| l.kind == LineKind::Stdout)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(stdout_lines, vec!["A1", "A2"]);
    }

    #[test]
    fn test_flush_partial_emits_unterminated() {
        let mut t = Transcript::new();
        t.push_chunk(OutputChannel::Stdout, b"no newline");
        t.push_chunk(OutputChannel::Stderr, b"also cut off");
        let flushed = t.flush_partial();
        assert_eq!(flushed.len(), 2);
        assert_eq!(texts(t.lines()), vec!["no newline", "also cut off"]);
        // Second flush is a no-op
        assert!(t.flush_partial().is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_lossy_not_fatal() {
        let mut t = Transcript::new();
        t.push_chunk(OutputChannel::Stdout, &[0x66, 0x6f, 0xff, 0x6f, b'\n']);
        assert_eq!(t.len(), 1);
        assert!(t.lines()[0].text.starts_with("fo"));
    }

    // ==================== Status & Noise Tests ====================

    #[test]
    fn test_status_line_severity() {
        let mut t = Transcript::new();
        t.push_status(Severity::Success, "✓ Installation completed successfully");
        assert_eq!(t.lines()[0].kind, LineKind::Status(Severity::Success));
    }

    #[test]
    fn test_sudo_prompt_noise_suppressed() {
        let mut t = Transcript::new();
        let completed = t.push_chunk(OutputChannel::Stderr, b"[sudo] password for alice: \n");
        // Returned for the log file, but not stored
        assert_eq!(completed.len(), 1);
        assert!(t.is_empty());
    }

    #[test]
    fn test_prompt_noise_only_applies_to_stderr() {
        let mut t = Transcript::new();
        t.push_chunk(OutputChannel::Stdout, b"changing password for user db\n");
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_lines_since() {
        let mut t = Transcript::new();
        t.push_chunk(OutputChannel::Stdout, b"one\n");
        let mark = t.len();
        t.push_chunk(OutputChannel::Stdout, b"two\nthree\n");
        assert_eq!(texts(t.lines_since(mark)), vec!["two", "three"]);
        assert!(t.lines_since(t.len()).is_empty());
        // A stale over-long mark is clamped
        assert!(t.lines_since(100).is_empty());
    }

    #[test]
    fn test_clear_resets_partials_too() {
        let mut t = Transcript::new();
        t.push_chunk(OutputChannel::Stdout, b"dangling");
        t.push_status(Severity::Info, "something");
        t.clear();
        assert!(t.is_empty());
        assert!(t.flush_partial().is_empty());
    }
}
