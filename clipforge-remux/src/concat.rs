//! Per-stream time offsets for two-input concatenation.

use clipforge_core::packet::Packet;
use clipforge_core::timestamp::Timestamp;

/// Tracks, per output stream, the last DTS and duration written from the
/// first input, then yields the offsets that make the second input start
/// immediately after the first ends.
///
/// All bookkeeping happens in each output stream's own time base (values are
/// recorded after the output rescale), so heterogeneous input time bases
/// cannot introduce gaps or overlap.
#[derive(Debug)]
pub struct ConcatTracker {
    last: Vec<Option<(i64, i64)>>,
}

impl ConcatTracker {
    /// Create a tracker for `num_output_streams` streams.
    pub fn new(num_output_streams: usize) -> Self {
        Self {
            last: vec![None; num_output_streams],
        }
    }

    /// Record a packet of the first input, already rescaled to its output
    /// stream's time base.
    pub fn note(&mut self, output_index: usize, packet: &Packet) {
        if let Some(slot) = self.last.get_mut(output_index) {
            if packet.dts.is_valid() {
                let duration = packet.duration.value.max(1);
                *slot = Some((packet.dts.value, duration));
            }
        }
    }

    /// The offset (in output time base ticks) to add to the second input's
    /// timestamps on the given output stream. Streams that saw no packets
    /// get a zero offset.
    pub fn offset(&self, output_index: usize) -> i64 {
        self.last
            .get(output_index)
            .copied()
            .flatten()
            .map(|(dts, duration)| dts + duration)
            .unwrap_or(0)
    }

    /// Add the stream's offset to a packet of the second input, already
    /// rescaled to the output time base.
    pub fn apply(&self, output_index: usize, packet: &mut Packet) {
        let offset = self.offset(output_index);
        if packet.pts.is_valid() {
            packet.pts = Timestamp::new(packet.pts.value + offset, packet.pts.time_base);
        }
        if packet.dts.is_valid() {
            packet.dts = Timestamp::new(packet.dts.value + offset, packet.dts.time_base);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_core::timestamp::{Duration, TimeBase};

    fn packet(dts: i64, duration: i64) -> Packet<'static> {
        Packet::empty()
            .with_timestamps(
                Timestamp::new(dts, TimeBase::MPEG),
                Timestamp::new(dts, TimeBase::MPEG),
            )
            .with_duration(Duration::new(duration, TimeBase::MPEG))
    }

    #[test]
    fn test_offset_is_last_dts_plus_duration() {
        let mut tracker = ConcatTracker::new(1);
        tracker.note(0, &packet(0, 3000));
        tracker.note(0, &packet(3000, 3000));
        assert_eq!(tracker.offset(0), 6000);
    }

    #[test]
    fn test_unknown_duration_defaults_to_one_tick() {
        let mut tracker = ConcatTracker::new(1);
        tracker.note(0, &packet(500, 0));
        assert_eq!(tracker.offset(0), 501);
    }

    #[test]
    fn test_second_input_starts_strictly_after_first() {
        let mut tracker = ConcatTracker::new(1);
        let last_of_a = packet(9000, 3000);
        tracker.note(0, &last_of_a);

        let mut first_of_b = packet(0, 3000);
        tracker.apply(0, &mut first_of_b);
        assert!(first_of_b.pts.value > last_of_a.pts.value);
        assert_eq!(first_of_b.pts.value, 12000);
    }

    #[test]
    fn test_streams_tracked_independently() {
        let mut tracker = ConcatTracker::new(2);
        tracker.note(0, &packet(9000, 3000));
        tracker.note(1, &packet(48000, 1024));
        assert_eq!(tracker.offset(0), 12000);
        assert_eq!(tracker.offset(1), 49024);
    }

    #[test]
    fn test_untouched_stream_has_zero_offset() {
        let tracker = ConcatTracker::new(2);
        assert_eq!(tracker.offset(1), 0);
    }
}
