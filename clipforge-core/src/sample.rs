//! Planar audio frames and the sample FIFO used for encoder chunking.

use crate::error::{Error, Result};
use crate::timestamp::Timestamp;
use std::fmt;

/// A decoded audio frame holding planar f32 samples.
///
/// Other sample layouts are the backend resampler's business; everything that
/// touches samples inside clipforge works on normalized planar f32.
#[derive(Clone)]
pub struct AudioFrame {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// One plane of samples per channel; all planes have equal length.
    pub channels: Vec<Vec<f32>>,
    /// Presentation timestamp.
    pub pts: Timestamp,
}

impl AudioFrame {
    /// Create a silent frame with the given geometry.
    pub fn silence(sample_rate: u32, num_channels: usize, num_samples: usize) -> Self {
        Self {
            sample_rate,
            channels: vec![vec![0.0; num_samples]; num_channels],
            pts: Timestamp::none(),
        }
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel.
    pub fn num_samples(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    /// Scale every sample by `gain`, clamping the result to [-1.0, 1.0].
    pub fn scale(&mut self, gain: f32) {
        for plane in &mut self.channels {
            for sample in plane {
                *sample = (*sample * gain).clamp(-1.0, 1.0);
            }
        }
    }
}

impl fmt::Debug for AudioFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioFrame")
            .field("sample_rate", &self.sample_rate)
            .field("channels", &self.num_channels())
            .field("samples", &self.num_samples())
            .field("pts", &self.pts)
            .finish()
    }
}

/// A per-channel FIFO that regroups resampled audio into fixed-size chunks.
///
/// Encoders consume frames of a fixed sample count while resamplers emit
/// whatever they have; the FIFO sits between the two.
#[derive(Debug, Default)]
pub struct SampleFifo {
    channels: Vec<Vec<f32>>,
}

impl SampleFifo {
    /// Create a FIFO for `num_channels` channels.
    pub fn new(num_channels: usize) -> Self {
        Self {
            channels: vec![Vec::new(); num_channels],
        }
    }

    /// Samples currently buffered per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    /// Whether no samples are buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a frame's samples.
    pub fn push(&mut self, frame: &AudioFrame) -> Result<()> {
        if frame.num_channels() != self.channels.len() {
            return Err(Error::invalid(format!(
                "channel count mismatch: fifo has {}, frame has {}",
                self.channels.len(),
                frame.num_channels()
            )));
        }
        for (fifo, plane) in self.channels.iter_mut().zip(&frame.channels) {
            fifo.extend_from_slice(plane);
        }
        Ok(())
    }

    /// Pop exactly `count` samples per channel, or `None` if fewer are
    /// buffered.
    pub fn pop(&mut self, count: usize) -> Option<Vec<Vec<f32>>> {
        if count == 0 || self.len() < count {
            return None;
        }
        Some(
            self.channels
                .iter_mut()
                .map(|fifo| fifo.drain(..count).collect())
                .collect(),
        )
    }

    /// Drain whatever remains (the final short chunk), or `None` if empty.
    pub fn drain_remaining(&mut self) -> Option<Vec<Vec<f32>>> {
        if self.is_empty() {
            return None;
        }
        Some(
            self.channels
                .iter_mut()
                .map(std::mem::take)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_of(samples: &[f32]) -> AudioFrame {
        AudioFrame {
            sample_rate: 44100,
            channels: vec![samples.to_vec(), samples.to_vec()],
            pts: Timestamp::none(),
        }
    }

    #[test]
    fn test_scale_clamps() {
        let mut frame = frame_of(&[0.5, -0.75, 0.9]);
        frame.scale(2.0);
        assert_eq!(frame.channels[0], vec![1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_fifo_pop_exact_chunks() {
        let mut fifo = SampleFifo::new(2);
        fifo.push(&frame_of(&[1.0, 2.0, 3.0])).unwrap();
        fifo.push(&frame_of(&[4.0, 5.0])).unwrap();

        let chunk = fifo.pop(4).unwrap();
        assert_eq!(chunk[0], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(fifo.len(), 1);
        assert!(fifo.pop(4).is_none());
        assert_eq!(fifo.drain_remaining().unwrap()[1], vec![5.0]);
        assert!(fifo.drain_remaining().is_none());
    }

    #[test]
    fn test_fifo_rejects_channel_mismatch() {
        let mut fifo = SampleFifo::new(1);
        assert!(fifo.push(&frame_of(&[0.0])).is_err());
    }
}
