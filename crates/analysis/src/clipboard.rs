//! Best-effort clipboard probe for pastable tabular data.
//!
//! The probe may fail for any platform reason (unavailable clipboard, wrong
//! flavor, access denial). Failures are swallowed and reported as "nothing
//! pastable" -- the new-track paste item just stays disabled.

use bevy::prelude::*;
use std::fmt;

/// Errors a clipboard reader can surface.
#[derive(Debug)]
pub enum ProbeError {
    /// No system clipboard is available in this environment.
    Unavailable,
    /// The clipboard holds data in a flavor we cannot read as text.
    FormatMismatch(String),
    /// Access was denied by the platform.
    AccessDenied(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Unavailable => write!(f, "clipboard unavailable"),
            ProbeError::FormatMismatch(msg) => write!(f, "clipboard format mismatch: {msg}"),
            ProbeError::AccessDenied(msg) => write!(f, "clipboard access denied: {msg}"),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Reader closure supplied by the shell; returns clipboard text if present.
pub type ClipboardReader = Box<dyn Fn() -> Result<Option<String>, ProbeError> + Send + Sync>;

/// Resource wrapping the platform clipboard reader.
#[derive(Resource)]
pub struct ClipboardProbe {
    reader: ClipboardReader,
}

impl Default for ClipboardProbe {
    fn default() -> Self {
        // headless default: nothing pastable
        Self {
            reader: Box::new(|| Ok(None)),
        }
    }
}

impl ClipboardProbe {
    pub fn with_reader(reader: ClipboardReader) -> Self {
        Self { reader }
    }

    /// Returns the name of importable tabular data on the clipboard, or
    /// `None`. Reader failures degrade to `None`.
    pub fn pastable_data_name(&self) -> Option<String> {
        match (self.reader)() {
            Ok(Some(text)) => importable_data_name(&text),
            Ok(None) => None,
            Err(err) => {
                debug!("clipboard probe failed, treating as not pastable: {err}");
                None
            }
        }
    }
}

/// Checks whether `text` looks like importable tabular data: at least one
/// row of two or more numeric columns (tab, comma, or whitespace separated).
///
/// The returned name is the first non-numeric token of the first line, or
/// "data" when the table has no header.
pub fn importable_data_name(text: &str) -> Option<String> {
    let mut name: Option<String> = None;
    let mut has_numeric_row = false;
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let columns: Vec<&str> = line
            .split(|c: char| c == '\t' || c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        let numeric = columns.len() >= 2 && columns.iter().all(|c| c.parse::<f64>().is_ok());
        if numeric {
            has_numeric_row = true;
        } else if i == 0 {
            name = columns.first().map(|s| (*s).to_string());
        }
    }
    if has_numeric_row {
        Some(name.unwrap_or_else(|| "data".to_string()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_tab_separated_numeric_rows() {
        let text = "t\tx\ty\n0.0\t1.2\t3.4\n0.1\t1.3\t3.5";
        assert_eq!(importable_data_name(text), Some("t".to_string()));
    }

    #[test]
    fn headerless_table_gets_default_name() {
        let text = "0.0, 1.2\n0.1, 1.3";
        assert_eq!(importable_data_name(text), Some("data".to_string()));
    }

    #[test]
    fn prose_is_not_importable() {
        assert_eq!(importable_data_name("hello world"), None);
        assert_eq!(importable_data_name(""), None);
        // a single numeric column is not tabular
        assert_eq!(importable_data_name("1.0\n2.0\n3.0"), None);
    }

    #[test]
    fn probe_failure_degrades_to_not_pastable() {
        let probe = ClipboardProbe::with_reader(Box::new(|| {
            Err(ProbeError::AccessDenied("sandbox".to_string()))
        }));
        assert_eq!(probe.pastable_data_name(), None);
    }

    #[test]
    fn probe_reads_importable_text() {
        let probe =
            ClipboardProbe::with_reader(Box::new(|| Ok(Some("0\t1\n2\t3".to_string()))));
        assert_eq!(probe.pastable_data_name(), Some("data".to_string()));
    }
}
