//! Operator console log
//!
//! The console log is the text the operator sees and also the source the
//! telemetry parser scans. It only grows at the end; clearing drops
//! everything at once.
//!
//! With a capacity set, the oldest text is dropped once the log outgrows it.
//! The cut lands on a line boundary when the kept tail contains one, so the
//! newest lines always survive intact.

/// Append-only text buffer with an optional capacity
#[derive(Debug, Clone, Default)]
pub struct ConsoleLog {
    text: String,
    appended: u64,
    capacity: Option<usize>,
}

impl ConsoleLog {
    /// Create an empty log holding at most `capacity` bytes
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            text: String::new(),
            appended: 0,
            capacity,
        }
    }

    /// Append raw text
    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.text.push_str(text);
        self.appended += text.len() as u64;
        self.enforce_capacity();
    }

    /// Append `message` followed by a newline
    pub fn line(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        let mut line = String::with_capacity(message.len() + 1);
        line.push_str(message);
        line.push('\n');
        self.append(&line);
    }

    /// Drop all text
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Current log text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the current text in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Position marker for [`ConsoleLog::since`]
    pub fn mark(&self) -> u64 {
        self.appended
    }

    /// Text appended after `mark` that is still in the log
    pub fn since(&self, mark: u64) -> &str {
        let new = usize::try_from(self.appended.saturating_sub(mark)).unwrap_or(usize::MAX);
        let start = self.text.len().saturating_sub(new);
        &self.text[start..]
    }

    fn enforce_capacity(&mut self) {
        let Some(capacity) = self.capacity else {
            return;
        };
        if self.text.len() <= capacity {
            return;
        }

        let mut cut = self.text.len() - capacity;
        while !self.text.is_char_boundary(cut) {
            cut += 1;
        }

        let at_line_start = self.text.as_bytes()[cut - 1] == b'\n';
        if !at_line_start {
            if let Some(newline) = self.text[cut..].find('\n') {
                let next_line = cut + newline + 1;
                if next_line < self.text.len() {
                    cut = next_line;
                }
            }
        }

        self.text.drain(..cut);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_appends_newline() {
        let mut log = ConsoleLog::default();
        log.line("Connecting to serial /dev/ttyACM0");
        log.append("acc:0");
        log.append("42\n");
        assert_eq!(log.text(), "Connecting to serial /dev/ttyACM0\nacc:042\n");
    }

    #[test]
    fn test_clear_keeps_mark_monotonic() {
        let mut log = ConsoleLog::default();
        log.line("one");
        let mark = log.mark();
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.mark(), mark);

        log.line("two");
        assert_eq!(log.since(mark), "two\n");
        assert_eq!(log.since(0), "two\n");
    }

    #[test]
    fn test_since_returns_only_new_text() {
        let mut log = ConsoleLog::default();
        log.line("first");
        let mark = log.mark();
        assert_eq!(log.since(mark), "");
        log.line("second");
        assert_eq!(log.since(mark), "second\n");
    }

    #[test]
    fn test_capacity_drops_oldest_lines() {
        let mut log = ConsoleLog::new(Some(16));
        log.line("aaaaaaaaaa");
        log.line("bbbbbbbbbb");
        assert_eq!(log.text(), "bbbbbbbbbb\n");

        log.line("cc");
        assert_eq!(log.text(), "bbbbbbbbbb\ncc\n");
        assert!(log.len() <= 16);
    }

    #[test]
    fn test_capacity_without_newline_cuts_on_char_boundary() {
        let mut log = ConsoleLog::new(Some(4));
        log.append("ééé");
        assert!(log.len() <= 4);
        assert_eq!(log.text(), "éé");
    }

    #[test]
    fn test_capacity_keeps_latest_telemetry() {
        let mut log = ConsoleLog::new(Some(64));
        for value in 0..50 {
            log.line(format!("status acc:{:03}", value));
        }
        assert!(log.text().ends_with("acc:049\n"));
        assert!(log.len() <= 64);
    }
}
