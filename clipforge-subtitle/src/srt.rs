//! SRT (SubRip) parser and writer.
//!
//! SRT consists of blocks separated by blank lines: a numeric index, a
//! timing line in `HH:MM:SS,mmm --> HH:MM:SS,mmm` form, and one or more text
//! lines. The parser is tolerant: the index is not required to be numeric,
//! position info after the end timestamp is ignored, and cues whose end does
//! not exceed their start are dropped. Source order is preserved, not
//! re-sorted.

use crate::types::{SrtTimestamp, SubtitleCue, SubtitleError, SubtitleResult};
use regex::Regex;
use std::sync::OnceLock;

/// Parse SRT content into cues.
pub fn parse(content: &str) -> SubtitleResult<Vec<SubtitleCue>> {
    let mut cues = Vec::new();
    let mut lines = content.lines().peekable();

    while lines.peek().is_some() {
        // Skip blank separators.
        while lines.peek().is_some_and(|l| l.trim().is_empty()) {
            lines.next();
        }
        if lines.peek().is_none() {
            break;
        }

        // Index line (tolerated non-numeric). A line containing "-->" is
        // treated as the timing line of a block with a missing index.
        let first = match lines.next() {
            Some(line) => line.trim(),
            None => break,
        };
        let timing_line = if first.contains("-->") {
            first
        } else {
            match lines.next() {
                Some(line) => line.trim(),
                None => break,
            }
        };

        let (start, end) = parse_timing_line(timing_line)?;

        let mut text_lines = Vec::new();
        while let Some(line) = lines.peek() {
            if line.trim().is_empty() {
                break;
            }
            text_lines.push(lines.next().unwrap());
        }

        // Cues must run forward in time; zero-length or reversed cues are
        // dropped rather than propagated.
        if end <= start || text_lines.is_empty() {
            continue;
        }

        cues.push(SubtitleCue::new(
            start.as_seconds_f64(),
            end.as_seconds_f64(),
            text_lines.join("\n"),
        ));
    }

    Ok(cues)
}

/// Parse a timing line in SRT format.
fn parse_timing_line(line: &str) -> SubtitleResult<(SrtTimestamp, SrtTimestamp)> {
    let (start_part, end_part) = line
        .split_once("-->")
        .ok_or_else(|| SubtitleError::ParseError(format!("invalid timing line: {}", line)))?;
    let start = SrtTimestamp::parse(start_part.trim())?;
    // Position info may follow the end timestamp.
    let end_token = end_part.split_whitespace().next().unwrap_or("");
    let end = SrtTimestamp::parse(end_token)?;
    Ok((start, end))
}

/// Write cues out as SRT text.
pub fn write(cues: &[SubtitleCue]) -> String {
    let mut output = String::new();
    for (index, cue) in cues.iter().enumerate() {
        output.push_str(&format!("{}\n", index + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            SrtTimestamp::from_millis(cue.start_millis().max(0) as u64),
            SrtTimestamp::from_millis(cue.end_millis().max(0) as u64),
        ));
        output.push_str(&cue.text);
        output.push_str("\n\n");
    }
    output
}

/// Strip all formatting tags (`<b>`, `<i>`, `<font ...>`, ...) from text.
pub fn strip_formatting(text: &str) -> String {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());
    regex.replace_all(text, "").to_string()
}
