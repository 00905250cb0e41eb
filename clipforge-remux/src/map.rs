//! Input-to-output stream mapping.

use clipforge_container::traits::{StreamInfo, TrackType};

/// Selection policy deciding which input streams are copied to the output.
#[derive(Debug, Clone, Default)]
pub struct StreamSelector {
    /// Copy video streams.
    pub video: bool,
    /// Copy audio streams.
    pub audio: bool,
    /// Copy subtitle streams.
    pub subtitles: bool,
    /// Copy data/other streams.
    pub data: bool,
    /// Exclude streams whose language tag equals this value.
    pub drop_language: Option<String>,
    /// Cap on the total number of mapped streams.
    pub limit: Option<usize>,
}

impl StreamSelector {
    /// Video, audio, and subtitle streams (the usual pass-through set).
    pub fn default_copy() -> Self {
        Self {
            video: true,
            audio: true,
            subtitles: true,
            ..Self::default()
        }
    }

    /// Video and audio only.
    pub fn av() -> Self {
        Self {
            video: true,
            audio: true,
            ..Self::default()
        }
    }

    /// Video streams only.
    pub fn video_only() -> Self {
        Self {
            video: true,
            ..Self::default()
        }
    }

    /// Audio streams only.
    pub fn audio_only() -> Self {
        Self {
            audio: true,
            ..Self::default()
        }
    }

    /// Every stream, including data tracks.
    pub fn everything() -> Self {
        Self {
            video: true,
            audio: true,
            subtitles: true,
            data: true,
            ..Self::default()
        }
    }

    /// Exclude streams tagged with `language`.
    pub fn without_language(mut self, language: impl Into<String>) -> Self {
        self.drop_language = Some(language.into());
        self
    }

    /// Cap the number of mapped streams.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a stream passes this selector, ignoring the count limit.
    pub fn selects(&self, stream: &StreamInfo) -> bool {
        let type_ok = match stream.track_type {
            TrackType::Video => self.video,
            TrackType::Audio => self.audio,
            TrackType::Subtitle => self.subtitles,
            TrackType::Data => self.data,
        };
        if !type_ok {
            return false;
        }
        if let Some(drop) = &self.drop_language {
            if stream.language() == Some(drop.as_str()) {
                return false;
            }
        }
        true
    }
}

/// A dense input-stream-index to output-stream-index map.
///
/// Built once per transform after enumerating input streams; consulted for
/// every packet. Included streams receive sequential output indices in input
/// order, so the assigned indices are exactly `0..mapped_count()` with no
/// gaps.
#[derive(Debug, Clone)]
pub struct StreamMap {
    entries: Vec<Option<usize>>,
}

impl StreamMap {
    /// Build a map from a selection policy.
    pub fn build(streams: &[StreamInfo], selector: &StreamSelector) -> Self {
        let limit = selector.limit.unwrap_or(usize::MAX);
        let mut next = 0usize;
        let entries: Vec<Option<usize>> = streams
            .iter()
            .map(|stream| {
                if next < limit && selector.selects(stream) {
                    let idx = next;
                    next += 1;
                    Some(idx)
                } else {
                    None
                }
            })
            .collect();
        tracing::debug!(inputs = streams.len(), mapped = next, "built stream map");
        Self { entries }
    }

    /// Build a map from an arbitrary inclusion predicate.
    pub fn build_with(streams: &[StreamInfo], mut include: impl FnMut(&StreamInfo) -> bool) -> Self {
        let mut next = 0usize;
        let entries = streams
            .iter()
            .map(|stream| {
                if include(stream) {
                    let idx = next;
                    next += 1;
                    Some(idx)
                } else {
                    None
                }
            })
            .collect();
        Self { entries }
    }

    /// Output index for an input stream, or `None` if the stream is not
    /// copied.
    pub fn output_index(&self, input_index: usize) -> Option<usize> {
        self.entries.get(input_index).copied().flatten()
    }

    /// Number of input streams covered by the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map covers no streams.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of mapped (copied) streams.
    pub fn mapped_count(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// Iterate over `(input_index, output_index)` pairs of mapped streams in
    /// input order.
    pub fn iter_mapped(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(input, output)| output.map(|o| (input, o)))
    }
}
