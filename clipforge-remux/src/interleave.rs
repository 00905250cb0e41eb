//! Interleave-by-time merging of two independent packet sources.
//!
//! Used when combining an independent video source with an independent audio
//! source: hold one pending packet per input, always write the one with the
//! earlier absolute time, and rebase each stream to start at zero on its
//! first packet.

use clipforge_core::packet::Packet;
use clipforge_core::timestamp::Timestamp;

/// Per-stream rebasing that makes the stream's timeline start at zero on its
/// first timestamped packet. Negative results clamp to zero.
#[derive(Debug, Default)]
pub struct ZeroBase {
    first_pts: Option<i64>,
    first_dts: Option<i64>,
}

impl ZeroBase {
    /// Create a fresh rebaser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift a packet (in its own time base) so the stream starts at zero.
    pub fn apply(&mut self, packet: &mut Packet) {
        if packet.pts.is_valid() {
            let first = *self.first_pts.get_or_insert(packet.pts.value);
            packet.pts = Timestamp::new((packet.pts.value - first).max(0), packet.pts.time_base);
        }
        if packet.dts.is_valid() {
            let first = *self.first_dts.get_or_insert(packet.dts.value);
            packet.dts = Timestamp::new((packet.dts.value - first).max(0), packet.dts.time_base);
        }
    }
}

/// Which pending packet to write next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePick {
    /// Write the first source's pending packet.
    First,
    /// Write the second source's pending packet.
    Second,
}

/// Pick the pending packet with the earlier absolute time, each in its own
/// time base. A packet with no defined timestamp counts as time zero. Returns
/// `None` when both sources are exhausted; ties go to the first source.
pub fn pick_earlier(first: Option<&Packet>, second: Option<&Packet>) -> Option<MergePick> {
    match (first, second) {
        (None, None) => None,
        (Some(_), None) => Some(MergePick::First),
        (None, Some(_)) => Some(MergePick::Second),
        (Some(a), Some(b)) => {
            if absolute_seconds(a) <= absolute_seconds(b) {
                Some(MergePick::First)
            } else {
                Some(MergePick::Second)
            }
        }
    }
}

/// A packet's reference time in seconds; undefined timestamps count as zero.
pub fn absolute_seconds(packet: &Packet) -> f64 {
    packet.reference_timestamp().to_seconds().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_core::timestamp::TimeBase;

    fn packet_at(value: i64, time_base: TimeBase) -> Packet<'static> {
        Packet::empty().with_timestamps(Timestamp::new(value, time_base), Timestamp::none())
    }

    #[test]
    fn test_zero_base_first_packet_becomes_zero() {
        let mut rebase = ZeroBase::new();
        let mut first = packet_at(9000, TimeBase::MPEG);
        rebase.apply(&mut first);
        assert_eq!(first.pts.value, 0);

        let mut second = packet_at(12000, TimeBase::MPEG);
        rebase.apply(&mut second);
        assert_eq!(second.pts.value, 3000);
    }

    #[test]
    fn test_zero_base_clamps_backward_jumps() {
        let mut rebase = ZeroBase::new();
        rebase.apply(&mut packet_at(5000, TimeBase::MPEG));
        let mut earlier = packet_at(4000, TimeBase::MPEG);
        rebase.apply(&mut earlier);
        assert_eq!(earlier.pts.value, 0);
    }

    #[test]
    fn test_pick_earlier_across_time_bases() {
        // 0.5 s of video vs 0.4 s of audio: audio goes first.
        let video = packet_at(45000, TimeBase::MPEG);
        let audio = packet_at(19200, TimeBase::new(1, 48000));
        assert_eq!(
            pick_earlier(Some(&video), Some(&audio)),
            Some(MergePick::Second)
        );
    }

    #[test]
    fn test_pick_ties_go_first() {
        let a = packet_at(1000, TimeBase::MILLISECONDS);
        let b = packet_at(1000, TimeBase::MILLISECONDS);
        assert_eq!(pick_earlier(Some(&a), Some(&b)), Some(MergePick::First));
    }

    #[test]
    fn test_pick_with_exhausted_sources() {
        let a = packet_at(0, TimeBase::MILLISECONDS);
        assert_eq!(pick_earlier(Some(&a), None), Some(MergePick::First));
        assert_eq!(pick_earlier(None, Some(&a)), Some(MergePick::Second));
        assert_eq!(pick_earlier(None, None), None);
    }
}
