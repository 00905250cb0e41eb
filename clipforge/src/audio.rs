//! Audio transforms: extraction, volume adjustment.

use crate::engine::write_mapped;
use clipforge_container::{
    find_stream, AudioCodec, AudioEncoder, AudioEncoderConfig, AudioStreamInfo, ContainerFormat,
    MediaBackend, Muxer, MuxerOptions, Resampler, ResamplerSpec, StreamInfo, TrackType,
};
use clipforge_core::error::{Error, Result};
use clipforge_core::memio::MemoryReader;
use clipforge_core::sample::{AudioFrame, SampleFifo};
use clipforge_core::timestamp::Timestamp;

pub use crate::passthrough::replace_audio;

/// Audio-only export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioExportFormat {
    /// MP3.
    Mp3,
    /// AAC in ADTS framing.
    Aac,
    /// Ogg Vorbis.
    Ogg,
    /// RIFF/WAVE PCM.
    Wav,
}

impl AudioExportFormat {
    fn codec(&self) -> AudioCodec {
        match self {
            Self::Mp3 => AudioCodec::Mp3,
            Self::Aac => AudioCodec::Aac,
            Self::Ogg => AudioCodec::Vorbis,
            Self::Wav => AudioCodec::PcmS16le,
        }
    }

    fn container(&self) -> ContainerFormat {
        match self {
            Self::Mp3 => ContainerFormat::Mp3,
            Self::Aac => ContainerFormat::Adts,
            Self::Ogg => ContainerFormat::Ogg,
            Self::Wav => ContainerFormat::Wav,
        }
    }

    fn bit_rate(&self) -> Option<u64> {
        match self {
            Self::Wav => None,
            _ => Some(128_000),
        }
    }
}

const EXPORT_SAMPLE_RATE: u32 = 44_100;
const EXPORT_CHANNELS: u16 = 2;
const FALLBACK_FRAME_SIZE: usize = 1024;

// Encode-and-write state shared by the audio operations: resample, chunk to
// the encoder frame size through the FIFO, stamp sequential sample pts.
struct AudioEncodePath {
    encoder: Box<dyn AudioEncoder>,
    resampler: Box<dyn Resampler>,
    fifo: SampleFifo,
    frame_size: usize,
    sample_rate: u32,
    pts_counter: i64,
    output_index: usize,
}

impl AudioEncodePath {
    fn new(
        backend: &dyn MediaBackend,
        source: &AudioStreamInfo,
        config: AudioEncoderConfig,
        output_index: usize,
    ) -> Result<Self> {
        let encoder = backend.audio_encoder(&config)?;
        let resampler = backend.resampler(
            ResamplerSpec {
                sample_rate: source.sample_rate,
                channels: source.channels,
            },
            ResamplerSpec {
                sample_rate: config.sample_rate,
                channels: config.channels,
            },
        )?;
        let frame_size = encoder.frame_size().unwrap_or(FALLBACK_FRAME_SIZE);
        Ok(Self {
            encoder,
            resampler,
            fifo: SampleFifo::new(config.channels as usize),
            frame_size,
            sample_rate: config.sample_rate,
            pts_counter: 0,
            output_index,
        })
    }

    fn push(&mut self, frame: &AudioFrame, muxer: &mut dyn Muxer) -> Result<()> {
        let converted = self.resampler.convert(frame)?;
        self.fifo.push(&converted)?;
        self.encode_ready(muxer)
    }

    fn encode_ready(&mut self, muxer: &mut dyn Muxer) -> Result<()> {
        while let Some(channels) = self.fifo.pop(self.frame_size) {
            self.encode_chunk(channels, muxer)?;
        }
        Ok(())
    }

    fn encode_chunk(&mut self, channels: Vec<Vec<f32>>, muxer: &mut dyn Muxer) -> Result<()> {
        let samples = channels.first().map(Vec::len).unwrap_or(0) as i64;
        let frame = AudioFrame {
            sample_rate: self.sample_rate,
            channels,
            pts: Timestamp::new(self.pts_counter, self.encoder.time_base()),
        };
        self.pts_counter += samples;
        self.encoder.send_frame(Some(&frame))?;
        self.drain(muxer)
    }

    fn drain(&mut self, muxer: &mut dyn Muxer) -> Result<()> {
        while let Some(mut packet) = self.encoder.receive_packet()? {
            write_mapped(muxer, self.output_index, &mut packet)?;
        }
        Ok(())
    }

    /// Drain the resampler and FIFO tails, then flush the encoder.
    fn finish(&mut self, muxer: &mut dyn Muxer) -> Result<()> {
        while let Some(tail) = self.resampler.flush()? {
            self.fifo.push(&tail)?;
        }
        self.encode_ready(muxer)?;
        if let Some(rest) = self.fifo.drain_remaining() {
            self.encode_chunk(rest, muxer)?;
        }
        self.encoder.send_frame(None)?;
        self.drain(muxer)
    }
}

/// Extract the first audio stream into a standalone audio file, resampled to
/// 44.1 kHz stereo.
pub fn extract_audio(
    backend: &dyn MediaBackend,
    input: &[u8],
    format: AudioExportFormat,
) -> Result<Vec<u8>> {
    let mut demuxer = backend.open_input(MemoryReader::new(input))?;
    let streams = demuxer.streams().to_vec();
    let audio_index =
        find_stream(&streams, TrackType::Audio).ok_or(Error::MissingStream("audio"))?;
    let source = streams[audio_index]
        .audio
        .clone()
        .ok_or(Error::MissingStream("audio"))?;

    let config = AudioEncoderConfig {
        codec: format.codec(),
        sample_rate: EXPORT_SAMPLE_RATE,
        channels: EXPORT_CHANNELS,
        bit_rate: format.bit_rate(),
    };
    let mut decoder = backend.audio_decoder(&streams[audio_index])?;
    let mut muxer = backend.create_muxer(MuxerOptions::new(format.container()))?;

    // Encoder first: the output stream's time base is the encoder's.
    let mut path = AudioEncodePath::new(backend, &source, config.clone(), 0)?;
    let output_index = muxer.add_stream(StreamInfo::audio(
        0,
        path.encoder.time_base(),
        AudioStreamInfo {
            codec: config.codec,
            sample_rate: config.sample_rate,
            channels: config.channels,
            bit_rate: config.bit_rate,
        },
    ))?;
    path.output_index = output_index;
    muxer.write_header()?;

    while let Some(packet) = demuxer.read_packet()? {
        if packet.stream_index as usize != audio_index {
            continue;
        }
        decoder.send_packet(Some(&packet))?;
        while let Some(frame) = decoder.receive_frame()? {
            path.push(&frame, &mut *muxer)?;
        }
    }
    decoder.send_packet(None)?;
    while let Some(frame) = decoder.receive_frame()? {
        path.push(&frame, &mut *muxer)?;
    }
    path.finish(&mut *muxer)?;

    muxer.finish()
}

/// Scale the audio volume by `factor` (clamped at zero; 0 silences),
/// re-encoding audio as AAC and copying video through untouched.
pub fn adjust_volume(backend: &dyn MediaBackend, input: &[u8], factor: f64) -> Result<Vec<u8>> {
    let factor = factor.max(0.0) as f32;

    let mut demuxer = backend.open_input(MemoryReader::new(input))?;
    let streams = demuxer.streams().to_vec();
    let audio_index =
        find_stream(&streams, TrackType::Audio).ok_or(Error::MissingStream("audio"))?;
    let video_index = find_stream(&streams, TrackType::Video);
    let source = streams[audio_index]
        .audio
        .clone()
        .ok_or(Error::MissingStream("audio"))?;

    let sample_rate = if source.sample_rate > 0 {
        source.sample_rate
    } else {
        EXPORT_SAMPLE_RATE
    };
    let channels = if source.channels > 0 {
        source.channels
    } else {
        EXPORT_CHANNELS
    };
    let config = AudioEncoderConfig {
        codec: AudioCodec::Aac,
        sample_rate,
        channels,
        bit_rate: Some(128_000),
    };

    let mut decoder = backend.audio_decoder(&streams[audio_index])?;
    let mut muxer = backend.create_muxer(MuxerOptions::new(ContainerFormat::Mp4))?;

    let video_out = match video_index {
        Some(index) => Some(muxer.add_stream(streams[index].clone())?),
        None => None,
    };
    let mut path = AudioEncodePath::new(backend, &source, config.clone(), 0)?;
    let audio_out = muxer.add_stream(StreamInfo::audio(
        video_out.map_or(0, |v| v + 1),
        path.encoder.time_base(),
        AudioStreamInfo {
            codec: config.codec,
            sample_rate: config.sample_rate,
            channels: config.channels,
            bit_rate: config.bit_rate,
        },
    ))?;
    path.output_index = audio_out;
    muxer.write_header()?;

    while let Some(mut packet) = demuxer.read_packet()? {
        let stream_index = packet.stream_index as usize;
        if Some(stream_index) == video_index {
            write_mapped(&mut *muxer, video_out.unwrap(), &mut packet)?;
        } else if stream_index == audio_index {
            decoder.send_packet(Some(&packet))?;
            while let Some(mut frame) = decoder.receive_frame()? {
                frame.scale(factor);
                path.push(&frame, &mut *muxer)?;
            }
        }
    }
    decoder.send_packet(None)?;
    while let Some(mut frame) = decoder.receive_frame()? {
        frame.scale(factor);
        path.push(&frame, &mut *muxer)?;
    }
    path.finish(&mut *muxer)?;

    muxer.finish()
}
