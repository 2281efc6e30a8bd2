use std::collections::VecDeque;

use super::constants::CONSOLE_MAX_LINES;

/// Bounded status log shown under the entry list.
pub struct ConsoleState {
    lines: VecDeque<String>,
}

impl ConsoleState {
    pub(in crate::app) fn new() -> Self {
        Self {
            lines: VecDeque::new(),
        }
    }

    pub(in crate::app) fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
        while self.lines.len() > CONSOLE_MAX_LINES {
            self.lines.pop_front();
        }
    }

    pub(in crate::app) fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_lines_fall_off() {
        let mut console = ConsoleState::new();
        for n in 0..(CONSOLE_MAX_LINES + 5) {
            console.push(format!("line {n}"));
        }
        assert_eq!(console.lines().count(), CONSOLE_MAX_LINES);
        assert_eq!(console.lines().next(), Some("line 5"));
    }
}
