//! Trim-window and speed-change timestamp rebasing.

use clipforge_core::packet::Packet;
use clipforge_core::timestamp::{Duration, TimeBase, Timestamp};

/// Where a packet falls relative to a trim window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimDecision {
    /// Before the window start: drop the packet.
    Before,
    /// Inside the window: rebase and keep.
    Within,
    /// Past the window end: drop and stop reading (packet order is
    /// non-decreasing in decode order).
    After,
}

/// A time window over the input, in absolute stream time.
///
/// Packets before the window are dropped; packets inside it have the window
/// start subtracted from their timestamps (in the input time base, clamped at
/// zero) so the output timeline starts at zero regardless of where the trim
/// began.
#[derive(Debug, Clone, Copy)]
pub struct TrimWindow {
    start: Duration,
    end: Option<Duration>,
}

impl TrimWindow {
    /// Create a window from `start_sec` to `end_sec` (unbounded if `None`).
    pub fn new(start_sec: f64, end_sec: Option<f64>) -> Self {
        Self {
            start: Duration::from_seconds(start_sec.max(0.0), TimeBase::MICROSECONDS),
            end: end_sec
                .filter(|&e| e > 0.0)
                .map(|e| Duration::from_seconds(e, TimeBase::MICROSECONDS)),
        }
    }

    /// The window start.
    pub fn start(&self) -> Duration {
        self.start
    }

    /// Whether the window changes anything at all.
    pub fn is_noop(&self) -> bool {
        self.start.is_zero() && self.end.is_none()
    }

    /// Where a packet's reference timestamp falls relative to the window.
    /// Packets with no defined timestamps pass as [`TrimDecision::Within`].
    pub fn classify(&self, packet: &Packet) -> TrimDecision {
        let reference = packet.reference_timestamp();
        if !reference.is_valid() {
            return TrimDecision::Within;
        }
        let abs = reference.rescale(TimeBase::MICROSECONDS).value;
        if abs < self.start.rescale(TimeBase::MICROSECONDS).value {
            return TrimDecision::Before;
        }
        if let Some(end) = self.end {
            if abs > end.rescale(TimeBase::MICROSECONDS).value {
                return TrimDecision::After;
            }
        }
        TrimDecision::Within
    }

    /// Shift a kept packet's timestamps so the window start becomes zero.
    /// The offset is expressed in the packet's own (input) time base before
    /// any output rescale; negative results clamp to zero.
    pub fn rebase(&self, packet: &mut Packet) {
        if self.start.is_zero() {
            return;
        }
        packet.pts = shift_down(packet.pts, self.start);
        packet.dts = shift_down(packet.dts, self.start);
    }
}

fn shift_down(ts: Timestamp, offset: Duration) -> Timestamp {
    if !ts.is_valid() {
        return ts;
    }
    let offset_ticks = offset.rescale(ts.time_base).value;
    Timestamp::new((ts.value - offset_ticks).max(0), ts.time_base)
}

/// Constant-factor speed change applied to packet timestamps.
///
/// A factor above 1.0 speeds playback up (timestamps shrink); below 1.0
/// slows it down. Applied in the input time base, before the output rescale.
#[derive(Debug, Clone, Copy)]
pub struct SpeedChange {
    factor: f64,
}

impl SpeedChange {
    /// Create a speed change; the factor must be positive.
    pub fn new(factor: f64) -> Option<Self> {
        (factor > 0.0).then_some(Self { factor })
    }

    /// The speed factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Rescale a packet's timestamps by the factor.
    pub fn apply(&self, packet: &mut Packet) {
        if packet.pts.is_valid() {
            packet.pts.value = (packet.pts.value as f64 / self.factor) as i64;
        }
        if packet.dts.is_valid() {
            packet.dts.value = (packet.dts.value as f64 / self.factor) as i64;
        }
        if packet.duration.value > 0 {
            packet.duration.value = (packet.duration.value as f64 / self.factor) as i64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_core::packet::Packet;

    fn packet_at(pts_ms: i64) -> Packet<'static> {
        Packet::empty().with_timestamps(
            Timestamp::new(pts_ms, TimeBase::MILLISECONDS),
            Timestamp::new(pts_ms, TimeBase::MILLISECONDS),
        )
    }

    #[test]
    fn test_classify_window() {
        let window = TrimWindow::new(1.0, Some(3.0));
        assert_eq!(window.classify(&packet_at(500)), TrimDecision::Before);
        assert_eq!(window.classify(&packet_at(1000)), TrimDecision::Within);
        assert_eq!(window.classify(&packet_at(3000)), TrimDecision::Within);
        assert_eq!(window.classify(&packet_at(3001)), TrimDecision::After);
    }

    #[test]
    fn test_undefined_timestamps_pass() {
        let window = TrimWindow::new(1.0, Some(3.0));
        assert_eq!(window.classify(&Packet::empty()), TrimDecision::Within);
    }

    #[test]
    fn test_rebase_starts_timeline_at_zero() {
        let window = TrimWindow::new(1.0, None);
        let mut packet = packet_at(1000);
        window.rebase(&mut packet);
        assert_eq!(packet.pts.value, 0);
        assert_eq!(packet.dts.value, 0);

        let mut later = packet_at(2500);
        window.rebase(&mut later);
        assert_eq!(later.pts.value, 1500);
    }

    #[test]
    fn test_rebase_clamps_negative() {
        // A keyframe seek can land slightly before the window; the packet is
        // dropped by classify, but dts-only packets rebasing below zero clamp.
        let window = TrimWindow::new(1.0, None);
        let mut packet = Packet::empty().with_timestamps(
            Timestamp::new(1100, TimeBase::MILLISECONDS),
            Timestamp::new(900, TimeBase::MILLISECONDS),
        );
        window.rebase(&mut packet);
        assert_eq!(packet.pts.value, 100);
        assert_eq!(packet.dts.value, 0);
    }

    #[test]
    fn test_noop_window() {
        assert!(TrimWindow::new(0.0, None).is_noop());
        assert!(!TrimWindow::new(0.5, None).is_noop());
    }

    #[test]
    fn test_speed_change() {
        let speed = SpeedChange::new(2.0).unwrap();
        let mut packet = packet_at(1000).with_duration(Duration::new(40, TimeBase::MILLISECONDS));
        speed.apply(&mut packet);
        assert_eq!(packet.pts.value, 500);
        assert_eq!(packet.duration.value, 20);
    }

    #[test]
    fn test_speed_change_rejects_nonpositive() {
        assert!(SpeedChange::new(0.0).is_none());
        assert!(SpeedChange::new(-1.5).is_none());
    }
}
