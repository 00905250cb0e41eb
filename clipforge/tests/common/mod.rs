//! Synthetic media backend for exercising the operation surface end to end.
//!
//! The "container" is a JSON document describing streams and packets; the
//! "codecs" move raw plane/sample bytes in and out of packets unchanged.
//! This stands in for the real media library per its send/receive contract,
//! so the orchestration, mapping, and rebasing logic runs exactly as it
//! would in production.

// Each integration test binary compiles this module separately and uses a
// different slice of it.
#![allow(dead_code)]

use clipforge_container::{
    AudioCodec, AudioDecoder, AudioEncoder, AudioEncoderConfig, AudioStreamInfo, ContainerFormat,
    Demuxer, MediaBackend, Muxer, MuxerOptions, Resampler, ResamplerSpec, Scaler, ScalerSpec,
    StreamInfo, SubtitleCodec, SubtitleStreamInfo, TrackType, VideoCodec, VideoDecoder,
    VideoEncoder, VideoEncoderConfig, VideoStreamInfo,
};
use clipforge_core::error::{ContainerError, Error, Result};
use clipforge_core::frame::{PixelFormat, VideoFrame};
use clipforge_core::memio::MemoryReader;
use clipforge_core::meta::Metadata;
use clipforge_core::packet::{OwnedPacket, Packet};
use clipforge_core::rational::Rational;
use clipforge_core::sample::AudioFrame;
use clipforge_core::timestamp::{Duration, TimeBase, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::io::{Read, Seek, SeekFrom};

pub const NONE_TS: i64 = i64::MIN;

/// Route tracing output through the test harness, once per binary.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestStream {
    pub track: String,
    pub codec: String,
    pub tb: (i64, i64),
    pub duration: Option<i64>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub fps: Option<(i64, i64)>,
    #[serde(default)]
    pub sample_rate: u32,
    #[serde(default)]
    pub channels: u16,
    #[serde(default)]
    pub language: Option<String>,
}

impl TestStream {
    pub fn video(width: u32, height: u32) -> Self {
        Self {
            track: "video".into(),
            codec: "h264".into(),
            tb: (1, 90000),
            duration: None,
            width,
            height,
            fps: Some((30, 1)),
            sample_rate: 0,
            channels: 0,
            language: None,
        }
    }

    pub fn audio(sample_rate: u32, channels: u16) -> Self {
        Self {
            track: "audio".into(),
            codec: "aac".into(),
            tb: (1, sample_rate as i64),
            duration: None,
            width: 0,
            height: 0,
            fps: None,
            sample_rate,
            channels,
            language: None,
        }
    }

    pub fn subtitle(language: &str) -> Self {
        Self {
            track: "subtitle".into(),
            codec: "subrip".into(),
            tb: (1, 1000),
            duration: None,
            width: 0,
            height: 0,
            fps: None,
            sample_rate: 0,
            channels: 0,
            language: Some(language.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestPacket {
    pub stream: u32,
    pub pts: i64,
    pub dts: i64,
    pub duration: i64,
    pub key: bool,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestContainer {
    pub format: String,
    pub fragmented: bool,
    pub metadata: BTreeMap<String, String>,
    pub streams: Vec<TestStream>,
    pub packets: Vec<TestPacket>,
}

impl TestContainer {
    pub fn new(streams: Vec<TestStream>) -> Self {
        Self {
            format: "mp4".into(),
            fragmented: false,
            metadata: BTreeMap::new(),
            streams,
            packets: Vec::new(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap()
    }

    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        serde_json::from_slice(data).ok()
    }
}

fn video_codec_from_name(name: &str) -> VideoCodec {
    match name {
        "h264" => VideoCodec::H264,
        "hevc" => VideoCodec::Hevc,
        "mjpeg" => VideoCodec::Mjpeg,
        "png" => VideoCodec::Png,
        "gif" => VideoCodec::Gif,
        "rawvideo" => VideoCodec::Raw,
        _ => VideoCodec::Unknown,
    }
}

fn audio_codec_from_name(name: &str) -> AudioCodec {
    match name {
        "aac" => AudioCodec::Aac,
        "mp3" => AudioCodec::Mp3,
        "vorbis" => AudioCodec::Vorbis,
        "opus" => AudioCodec::Opus,
        "flac" => AudioCodec::Flac,
        "pcm_s16le" => AudioCodec::PcmS16le,
        "pcm_f32le" => AudioCodec::Raw,
        _ => AudioCodec::Unknown,
    }
}

fn stream_info_from(test: &TestStream, index: usize) -> StreamInfo {
    let time_base = TimeBase::new(test.tb.0, test.tb.1);
    let mut info = match test.track.as_str() {
        "video" => StreamInfo::video(
            index,
            time_base,
            VideoStreamInfo {
                codec: video_codec_from_name(&test.codec),
                width: test.width,
                height: test.height,
                frame_rate: test.fps.map(|(n, d)| Rational::new(n, d)),
            },
        ),
        "audio" => StreamInfo::audio(
            index,
            time_base,
            AudioStreamInfo {
                codec: audio_codec_from_name(&test.codec),
                sample_rate: test.sample_rate,
                channels: test.channels,
                bit_rate: None,
            },
        ),
        "subtitle" => StreamInfo::subtitle(
            index,
            time_base,
            SubtitleStreamInfo {
                codec: if test.codec == "mov_text" {
                    SubtitleCodec::MovText
                } else {
                    SubtitleCodec::SubRip
                },
                language: test.language.clone(),
            },
        ),
        _ => {
            let mut info = StreamInfo::video(
                index,
                time_base,
                VideoStreamInfo {
                    codec: VideoCodec::Unknown,
                    width: 0,
                    height: 0,
                    frame_rate: None,
                },
            );
            info.track_type = TrackType::Data;
            info.video = None;
            info
        }
    };
    info.duration = test.duration;
    info
}

fn test_from_stream_info(info: &StreamInfo) -> TestStream {
    let tb = (info.time_base.0.num, info.time_base.0.den);
    match info.track_type {
        TrackType::Video => {
            let video = info.video.as_ref().expect("video info");
            TestStream {
                track: "video".into(),
                codec: video.codec.name().into(),
                tb,
                duration: info.duration,
                width: video.width,
                height: video.height,
                fps: video.frame_rate.map(|r| (r.num, r.den)),
                sample_rate: 0,
                channels: 0,
                language: None,
            }
        }
        TrackType::Audio => {
            let audio = info.audio.as_ref().expect("audio info");
            TestStream {
                track: "audio".into(),
                codec: audio.codec.name().into(),
                tb,
                duration: info.duration,
                width: 0,
                height: 0,
                fps: None,
                sample_rate: audio.sample_rate,
                channels: audio.channels,
                language: None,
            }
        }
        TrackType::Subtitle => {
            let subtitle = info.subtitle.as_ref().expect("subtitle info");
            TestStream {
                track: "subtitle".into(),
                codec: subtitle.codec.name().into(),
                tb,
                duration: info.duration,
                width: 0,
                height: 0,
                fps: None,
                sample_rate: 0,
                channels: 0,
                language: subtitle.language.clone(),
            }
        }
        TrackType::Data => TestStream {
            track: "data".into(),
            codec: "bin".into(),
            tb,
            duration: info.duration,
            width: 0,
            height: 0,
            fps: None,
            sample_rate: 0,
            channels: 0,
            language: None,
        },
    }
}

pub struct MockBackend;

impl MediaBackend for MockBackend {
    fn open_input<'a>(&self, mut reader: MemoryReader<'a>) -> Result<Box<dyn Demuxer + 'a>> {
        // Exercise the bridge the way a real demuxer would: size query,
        // rewind, sequential read.
        let size = reader.len();
        reader.seek(SeekFrom::Start(0))?;
        let mut data = Vec::with_capacity(size);
        reader.read_to_end(&mut data)?;
        let container = TestContainer::from_bytes(&data)
            .ok_or(Error::Container(ContainerError::UnknownFormat))?;
        let streams = container
            .streams
            .iter()
            .enumerate()
            .map(|(i, s)| stream_info_from(s, i))
            .collect();
        let mut metadata = Metadata::new();
        for (k, v) in &container.metadata {
            metadata.set(k.clone(), v.clone());
        }
        Ok(Box::new(MockDemuxer {
            container,
            streams,
            metadata,
            position: 0,
        }))
    }

    fn create_muxer(&self, options: MuxerOptions) -> Result<Box<dyn Muxer>> {
        Ok(Box::new(MockMuxer {
            options,
            streams: Vec::new(),
            metadata: Metadata::new(),
            header_written: false,
            packets: Vec::new(),
        }))
    }

    fn video_decoder(&self, stream: &StreamInfo) -> Result<Box<dyn VideoDecoder>> {
        let video = stream
            .video
            .clone()
            .ok_or_else(|| Error::unsupported("not a video stream"))?;
        Ok(Box::new(MockVideoDecoder {
            width: video.width,
            height: video.height,
            queue: VecDeque::new(),
        }))
    }

    fn video_encoder(&self, config: &VideoEncoderConfig) -> Result<Box<dyn VideoEncoder>> {
        Ok(Box::new(MockVideoEncoder {
            config: config.clone(),
            queue: VecDeque::new(),
        }))
    }

    fn audio_decoder(&self, stream: &StreamInfo) -> Result<Box<dyn AudioDecoder>> {
        let audio = stream
            .audio
            .clone()
            .ok_or_else(|| Error::unsupported("not an audio stream"))?;
        Ok(Box::new(MockAudioDecoder {
            sample_rate: audio.sample_rate,
            channels: audio.channels as usize,
            queue: VecDeque::new(),
        }))
    }

    fn audio_encoder(&self, config: &AudioEncoderConfig) -> Result<Box<dyn AudioEncoder>> {
        Ok(Box::new(MockAudioEncoder {
            sample_rate: config.sample_rate,
            queue: VecDeque::new(),
        }))
    }

    fn scaler(&self, src: ScalerSpec, dst: ScalerSpec) -> Result<Box<dyn Scaler>> {
        Ok(Box::new(MockScaler { src, dst }))
    }

    fn resampler(&self, src: ResamplerSpec, dst: ResamplerSpec) -> Result<Box<dyn Resampler>> {
        Ok(Box::new(MockResampler { src, dst }))
    }
}

pub struct MockDemuxer {
    container: TestContainer,
    streams: Vec<StreamInfo>,
    metadata: Metadata,
    position: usize,
}

impl Demuxer for MockDemuxer {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::from_name(&self.container.format).unwrap_or(ContainerFormat::Mp4)
    }

    fn duration(&self) -> Option<Duration> {
        let max_sec = self
            .streams
            .iter()
            .filter_map(|s| {
                s.duration
                    .map(|d| Timestamp::new(d, s.time_base).to_seconds().unwrap_or(0.0))
            })
            .fold(None::<f64>, |acc, sec| {
                Some(acc.map_or(sec, |a| a.max(sec)))
            })?;
        Some(Duration::from_seconds(max_sec, TimeBase::MICROSECONDS))
    }

    fn bit_rate(&self) -> Option<u64> {
        None
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn streams(&self) -> &[StreamInfo] {
        &self.streams
    }

    fn read_packet(&mut self) -> Result<Option<OwnedPacket>> {
        let Some(test) = self.container.packets.get(self.position) else {
            return Ok(None);
        };
        self.position += 1;
        let stream = &self.streams[test.stream as usize];
        let tb = stream.time_base;
        let mut packet = Packet::new(test.data.clone())
            .with_stream_index(test.stream)
            .with_timestamps(Timestamp::new(test.pts, tb), Timestamp::new(test.dts, tb))
            .with_duration(Duration::new(test.duration.max(0), tb));
        packet.set_keyframe(test.key);
        Ok(Some(packet))
    }

    fn seek(&mut self, _target: Timestamp) -> Result<()> {
        // Backward-seek stand-in: restart from the first packet and let the
        // caller's window filtering do the rest.
        self.position = 0;
        Ok(())
    }
}

pub struct MockMuxer {
    options: MuxerOptions,
    streams: Vec<StreamInfo>,
    metadata: Metadata,
    header_written: bool,
    packets: Vec<TestPacket>,
}

impl Muxer for MockMuxer {
    fn add_stream(&mut self, mut info: StreamInfo) -> Result<usize> {
        if self.header_written {
            return Err(Error::Container(ContainerError::WriteFailed(
                "stream added after header".into(),
            )));
        }
        let index = self.streams.len();
        info.index = index;
        self.streams.push(info);
        Ok(index)
    }

    fn stream_time_base(&self, index: usize) -> Option<TimeBase> {
        self.streams.get(index).map(|s| s.time_base)
    }

    fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
    }

    fn write_header(&mut self) -> Result<()> {
        if self.streams.is_empty() {
            return Err(Error::Container(ContainerError::WriteFailed(
                "no streams".into(),
            )));
        }
        self.header_written = true;
        Ok(())
    }

    fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        if !self.header_written {
            return Err(Error::Container(ContainerError::WriteFailed(
                "header not written".into(),
            )));
        }
        if packet.stream_index as usize >= self.streams.len() {
            return Err(Error::Container(ContainerError::WriteFailed(format!(
                "unknown stream {}",
                packet.stream_index
            ))));
        }
        self.packets.push(TestPacket {
            stream: packet.stream_index,
            pts: packet.pts.value,
            dts: packet.dts.value,
            duration: packet.duration.value,
            key: packet.is_keyframe(),
            data: packet.data().to_vec(),
        });
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>> {
        if !self.header_written {
            return Err(Error::Container(ContainerError::WriteFailed(
                "finish before header".into(),
            )));
        }
        let container = TestContainer {
            format: self.options.format.name().into(),
            fragmented: self.options.fragmented,
            metadata: self
                .metadata
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            streams: self.streams.iter().map(test_from_stream_info).collect(),
            packets: self.packets,
        };
        Ok(container.to_bytes())
    }
}

// Raw-plane "codec": packet payload is the tightly packed Y+U+V planes.

pub fn yuv_payload(frame: &VideoFrame) -> Vec<u8> {
    let mut data = Vec::new();
    for plane in 0..3 {
        for y in 0..frame.plane(plane).height() {
            data.extend_from_slice(frame.plane(plane).row(y));
        }
    }
    data
}

pub fn frame_from_yuv_payload(width: u32, height: u32, data: &[u8]) -> Option<VideoFrame> {
    let (w, h) = (width as usize, height as usize);
    if data.len() != w * h + (w / 2) * (h / 2) * 2 {
        return None;
    }
    let mut frame = VideoFrame::new_yuv420(width, height);
    let mut offset = 0;
    for plane in 0..3 {
        let pw = frame.plane(plane).width();
        for y in 0..frame.plane(plane).height() {
            frame
                .plane_mut(plane)
                .row_mut(y)
                .copy_from_slice(&data[offset..offset + pw]);
            offset += pw;
        }
    }
    Some(frame)
}

struct MockVideoDecoder {
    width: u32,
    height: u32,
    queue: VecDeque<VideoFrame>,
}

impl VideoDecoder for MockVideoDecoder {
    fn send_packet(&mut self, packet: Option<&Packet>) -> Result<()> {
        let Some(packet) = packet else {
            return Ok(());
        };
        let mut frame = frame_from_yuv_payload(self.width, self.height, packet.data())
            .ok_or_else(|| {
                Error::Codec(clipforge_core::error::CodecError::DecodeFailed(
                    "payload size mismatch".into(),
                ))
            })?;
        frame.pts = packet.reference_timestamp();
        self.queue.push_back(frame);
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<Option<VideoFrame>> {
        Ok(self.queue.pop_front())
    }
}

struct MockVideoEncoder {
    config: VideoEncoderConfig,
    queue: VecDeque<OwnedPacket>,
}

impl VideoEncoder for MockVideoEncoder {
    fn time_base(&self) -> TimeBase {
        self.config.time_base
    }

    fn send_frame(&mut self, frame: Option<&VideoFrame>) -> Result<()> {
        let Some(frame) = frame else {
            return Ok(());
        };
        let data = match frame.format() {
            PixelFormat::Yuv420p => yuv_payload(frame),
            PixelFormat::Rgba => (0..frame.plane(0).height())
                .flat_map(|y| frame.plane(0).row(y).to_vec())
                .collect(),
        };
        let pts = frame.pts.rescale(self.config.time_base);
        let mut packet = Packet::new(data).with_timestamps(pts, pts);
        packet.set_keyframe(true);
        self.queue.push_back(packet);
        Ok(())
    }

    fn receive_packet(&mut self) -> Result<Option<OwnedPacket>> {
        Ok(self.queue.pop_front())
    }
}

struct MockAudioDecoder {
    sample_rate: u32,
    channels: usize,
    queue: VecDeque<AudioFrame>,
}

pub fn pcm_payload(channels: &[Vec<f32>]) -> Vec<u8> {
    channels
        .iter()
        .flat_map(|plane| plane.iter().flat_map(|s| s.to_le_bytes()))
        .collect()
}

pub fn channels_from_pcm(data: &[u8], channel_count: usize) -> Vec<Vec<f32>> {
    let total = data.len() / 4;
    let per_channel = if channel_count == 0 {
        0
    } else {
        total / channel_count
    };
    (0..channel_count)
        .map(|ch| {
            (0..per_channel)
                .map(|i| {
                    let offset = (ch * per_channel + i) * 4;
                    f32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
                })
                .collect()
        })
        .collect()
}

impl AudioDecoder for MockAudioDecoder {
    fn send_packet(&mut self, packet: Option<&Packet>) -> Result<()> {
        let Some(packet) = packet else {
            return Ok(());
        };
        let frame = AudioFrame {
            sample_rate: self.sample_rate,
            channels: channels_from_pcm(packet.data(), self.channels),
            pts: packet.reference_timestamp(),
        };
        self.queue.push_back(frame);
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<Option<AudioFrame>> {
        Ok(self.queue.pop_front())
    }
}

struct MockAudioEncoder {
    sample_rate: u32,
    queue: VecDeque<OwnedPacket>,
}

impl AudioEncoder for MockAudioEncoder {
    fn time_base(&self) -> TimeBase {
        TimeBase::new(1, self.sample_rate as i64)
    }

    fn frame_size(&self) -> Option<usize> {
        Some(4)
    }

    fn send_frame(&mut self, frame: Option<&AudioFrame>) -> Result<()> {
        let Some(frame) = frame else {
            return Ok(());
        };
        let samples = frame.num_samples() as i64;
        let pts = frame.pts.rescale(self.time_base());
        let packet = Packet::new(pcm_payload(&frame.channels))
            .with_timestamps(pts, pts)
            .with_duration(Duration::new(samples, self.time_base()));
        self.queue.push_back(packet);
        Ok(())
    }

    fn receive_packet(&mut self) -> Result<Option<OwnedPacket>> {
        Ok(self.queue.pop_front())
    }
}

struct MockScaler {
    src: ScalerSpec,
    dst: ScalerSpec,
}

impl Scaler for MockScaler {
    fn convert(&mut self, frame: &VideoFrame) -> Result<VideoFrame> {
        if frame.width() != self.src.width || frame.height() != self.src.height {
            return Err(Error::Codec(
                clipforge_core::error::CodecError::ConversionFailed(format!(
                    "expected {}x{}, got {}x{}",
                    self.src.width,
                    self.src.height,
                    frame.width(),
                    frame.height()
                )),
            ));
        }
        let mut out = match self.dst.format {
            PixelFormat::Yuv420p => VideoFrame::new_yuv420(self.dst.width, self.dst.height),
            PixelFormat::Rgba => VideoFrame::new_rgba(self.dst.width, self.dst.height),
        };
        out.pts = frame.pts;

        match (frame.format(), self.dst.format) {
            (PixelFormat::Yuv420p, PixelFormat::Yuv420p) => {
                for plane in 0..3 {
                    nearest_resize_plane(frame, &mut out, plane);
                }
            }
            (PixelFormat::Yuv420p, PixelFormat::Rgba) => {
                // Grayscale expansion of luma; alpha opaque.
                for y in 0..self.dst.height as usize {
                    let sy = y * frame.height() as usize / self.dst.height as usize;
                    for x in 0..self.dst.width as usize {
                        let sx = x * frame.width() as usize / self.dst.width as usize;
                        let luma = frame.plane(0).row(sy)[sx];
                        let row = out.plane_mut(0).row_mut(y);
                        row[x * 4..x * 4 + 4].copy_from_slice(&[luma, luma, luma, 255]);
                    }
                }
            }
            (PixelFormat::Rgba, PixelFormat::Yuv420p) => {
                // Red channel becomes luma; chroma neutral.
                for y in 0..self.dst.height as usize {
                    let sy = y * frame.height() as usize / self.dst.height as usize;
                    for x in 0..self.dst.width as usize {
                        let sx = x * frame.width() as usize / self.dst.width as usize;
                        let red = frame.plane(0).row(sy)[sx * 4];
                        out.plane_mut(0).row_mut(y)[x] = red;
                    }
                }
                out.plane_mut(1).fill(128);
                out.plane_mut(2).fill(128);
            }
            (PixelFormat::Rgba, PixelFormat::Rgba) => {
                for y in 0..self.dst.height as usize {
                    let sy = y * frame.height() as usize / self.dst.height as usize;
                    for x in 0..self.dst.width as usize {
                        let sx = x * frame.width() as usize / self.dst.width as usize;
                        let px: [u8; 4] = frame.plane(0).row(sy)[sx * 4..sx * 4 + 4]
                            .try_into()
                            .unwrap();
                        out.plane_mut(0).row_mut(y)[x * 4..x * 4 + 4].copy_from_slice(&px);
                    }
                }
            }
        }
        Ok(out)
    }
}

fn nearest_resize_plane(src: &VideoFrame, dst: &mut VideoFrame, plane: usize) {
    let sw = src.plane(plane).width();
    let sh = src.plane(plane).height();
    let dw = dst.plane(plane).width();
    let dh = dst.plane(plane).height();
    for y in 0..dh {
        let sy = y * sh / dh;
        for x in 0..dw {
            let sx = x * sw / dw;
            let value = src.plane(plane).row(sy)[sx];
            dst.plane_mut(plane).row_mut(y)[x] = value;
        }
    }
}

struct MockResampler {
    src: ResamplerSpec,
    dst: ResamplerSpec,
}

impl Resampler for MockResampler {
    fn convert(&mut self, frame: &AudioFrame) -> Result<AudioFrame> {
        let samples = frame.num_samples();
        let out_samples = if self.src.sample_rate == self.dst.sample_rate {
            samples
        } else {
            samples * self.dst.sample_rate as usize / self.src.sample_rate as usize
        };
        let channels = (0..self.dst.channels as usize)
            .map(|ch| {
                let source = frame
                    .channels
                    .get(ch.min(frame.channels.len().saturating_sub(1)))
                    .cloned()
                    .unwrap_or_default();
                (0..out_samples)
                    .map(|i| {
                        let si = i * samples / out_samples.max(1);
                        source.get(si).copied().unwrap_or(0.0)
                    })
                    .collect()
            })
            .collect();
        Ok(AudioFrame {
            sample_rate: self.dst.sample_rate,
            channels,
            pts: frame.pts,
        })
    }

    fn flush(&mut self) -> Result<Option<AudioFrame>> {
        Ok(None)
    }
}

// Input builders shared by the integration tests.

/// A YUV frame whose luma encodes (frame, x, y) so movement is traceable.
pub fn patterned_frame(width: u32, height: u32, seed: u8) -> VideoFrame {
    let mut frame = VideoFrame::new_yuv420(width, height);
    for plane in 0..3 {
        let w = frame.plane(plane).width();
        for y in 0..frame.plane(plane).height() {
            let row = frame.plane_mut(plane).row_mut(y);
            for x in 0..w {
                row[x] = seed
                    .wrapping_add((plane * 64) as u8)
                    .wrapping_add((y * 17) as u8)
                    .wrapping_add((x * 5) as u8);
            }
        }
    }
    frame
}

/// A video-only input: `frames` packets at 30 fps in a 1/90000 time base.
pub fn video_input(frames: usize, width: u32, height: u32) -> TestContainer {
    let mut container = TestContainer::new(vec![TestStream::video(width, height)]);
    container.streams[0].duration = Some(frames as i64 * 3000);
    for i in 0..frames {
        let frame = patterned_frame(width, height, i as u8);
        container.packets.push(TestPacket {
            stream: 0,
            pts: i as i64 * 3000,
            dts: i as i64 * 3000,
            duration: 3000,
            key: i == 0,
            data: yuv_payload(&frame),
        });
    }
    container
}

/// A video+audio input with interleaved packets.
pub fn av_input(frames: usize, width: u32, height: u32) -> TestContainer {
    let mut container = video_input(frames, width, height);
    container.streams.push(TestStream::audio(48000, 2));
    let samples_per_packet = 1600; // one video frame of audio at 48 kHz
    for i in 0..frames {
        let plane: Vec<f32> = (0..samples_per_packet)
            .map(|s| ((i * samples_per_packet + s) as f32 * 0.001).sin() * 0.5)
            .collect();
        container.packets.push(TestPacket {
            stream: 1,
            pts: (i * samples_per_packet) as i64,
            dts: (i * samples_per_packet) as i64,
            duration: samples_per_packet as i64,
            key: true,
            data: pcm_payload(&[plane.clone(), plane]),
        });
    }
    container.streams[1].duration = Some((frames * samples_per_packet) as i64);
    // Interleave by time for realism.
    container.packets.sort_by(|a, b| {
        let a_sec = a.pts as f64 / if a.stream == 0 { 90000.0 } else { 48000.0 };
        let b_sec = b.pts as f64 / if b.stream == 0 { 90000.0 } else { 48000.0 };
        a_sec.partial_cmp(&b_sec).unwrap()
    });
    container
}
