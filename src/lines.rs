// Line handling: reads keep each line's own terminator so the splice
// can either preserve them or force a single convention on write.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SpliceError;

/// Newline convention applied to every output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Windows-style `\r\n`
    #[default]
    Crlf,
    /// Unix-style `\n`
    Lf,
    /// Keep whatever each line already ends with
    Preserve,
}

impl LineEnding {
    /// Terminator written after each line, `None` for `Preserve`
    pub fn terminator(self) -> Option<&'static str> {
        match self {
            LineEnding::Crlf => Some("\r\n"),
            LineEnding::Lf => Some("\n"),
            LineEnding::Preserve => None,
        }
    }

    /// Re-terminate a single line according to this convention
    pub fn apply(self, line: &str) -> String {
        match self.terminator() {
            Some(term) => {
                let mut out = String::with_capacity(line.len() + 2);
                out.push_str(strip_line_ending(line));
                out.push_str(term);
                out
            }
            None => line.to_string(),
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::Crlf => write!(f, "crlf"),
            LineEnding::Lf => write!(f, "lf"),
            LineEnding::Preserve => write!(f, "preserve"),
        }
    }
}

impl FromStr for LineEnding {
    type Err = SpliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crlf" => Ok(LineEnding::Crlf),
            "lf" => Ok(LineEnding::Lf),
            "preserve" => Ok(LineEnding::Preserve),
            other => Err(SpliceError::invalid_argument(format!(
                "unknown line ending '{}' (expected crlf, lf or preserve)",
                other
            ))),
        }
    }
}

/// Split text into lines, each keeping its terminator.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A trailing fragment without
/// a terminator becomes the last line. Empty input yields no lines.
pub fn split_lines_keep_ends(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        let ends_line = match b {
            b'\n' => true,
            b'\r' => bytes.get(i + 1) != Some(&b'\n'),
            _ => false,
        };
        if ends_line {
            lines.push(text[start..=i].to_string());
            start = i + 1;
        }
    }
    if start < bytes.len() {
        lines.push(text[start..].to_string());
    }
    lines
}

/// Remove a trailing `\r\n`, `\n` or lone `\r`
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Join lines back into file content using the given convention
pub fn join_lines<S: AsRef<str>>(lines: &[S], ending: LineEnding) -> String {
    lines.iter().map(|line| ending.apply(line.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_terminators() {
        let lines = split_lines_keep_ends("a\r\nb\nc");
        assert_eq!(lines, vec!["a\r\n", "b\n", "c"]);
    }

    #[test]
    fn test_split_on_lone_cr() {
        let lines = split_lines_keep_ends("a\rb\r\nc\rd");
        assert_eq!(lines, vec!["a\r", "b\r\n", "c\r", "d"]);
        assert_eq!(join_lines(&lines, LineEnding::Crlf), "a\r\nb\r\nc\r\nd\r\n");
        assert_eq!(split_lines_keep_ends("\r\r\n"), vec!["\r", "\r\n"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_lines_keep_ends("").is_empty());
        assert_eq!(split_lines_keep_ends("\n"), vec!["\n"]);
    }

    #[test]
    fn test_join_forces_crlf_on_every_line() {
        let lines = split_lines_keep_ends("a\nb\r\nc");
        assert_eq!(join_lines(&lines, LineEnding::Crlf), "a\r\nb\r\nc\r\n");
        assert_eq!(join_lines(&lines, LineEnding::Lf), "a\nb\nc\n");
        assert_eq!(join_lines(&lines, LineEnding::Preserve), "a\nb\r\nc");
    }

    #[test]
    fn test_apply_strips_lone_cr() {
        assert_eq!(LineEnding::Lf.apply("x\r"), "x\n");
        assert_eq!(LineEnding::Preserve.apply("x\r"), "x\r");
    }

    #[test]
    fn test_parse_line_ending() {
        assert_eq!("CRLF".parse::<LineEnding>().unwrap(), LineEnding::Crlf);
        assert_eq!("lf".parse::<LineEnding>().unwrap(), LineEnding::Lf);
        assert!("dos".parse::<LineEnding>().is_err());
        assert_eq!(LineEnding::Preserve.to_string(), "preserve");
    }
}
