//! Active-cue lookup for sequential frame timestamps.

use crate::types::SubtitleCue;

/// Finds the cue active at a given time over a time-ordered cue list.
///
/// Frame timestamps arrive in non-decreasing order during a burn-in pass, so
/// the cursor keeps a hint index and resumes scanning from there instead of
/// searching the whole list per frame. A timestamp earlier than the hinted
/// cue rewinds the hint, so out-of-order lookups still resolve correctly.
#[derive(Debug, Default)]
pub struct CueCursor {
    hint: usize,
}

impl CueCursor {
    /// Create a cursor starting at the first cue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cue active at `sec`, or `None` between cues.
    pub fn active_at<'c>(&mut self, cues: &'c [SubtitleCue], sec: f64) -> Option<&'c SubtitleCue> {
        if cues.is_empty() {
            return None;
        }
        // Time moved backwards relative to the hint: rescan from the start.
        if self.hint >= cues.len() || sec < cues[self.hint].start_sec {
            self.hint = 0;
        }
        while self.hint < cues.len() {
            let cue = &cues[self.hint];
            if sec < cue.start_sec {
                // Before the hinted cue begins; nothing is active yet.
                return None;
            }
            if cue.contains(sec) {
                return Some(cue);
            }
            self.hint += 1;
        }
        None
    }
}
