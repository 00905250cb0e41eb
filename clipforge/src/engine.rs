//! Shared orchestration engines.
//!
//! Two loops cover nearly every operation: the remux loop (raw packet copy
//! with stream mapping and timestamp rebasing) and the frame pipeline
//! (decode video, convert, run a per-frame hook, re-encode, copy audio).

use clipforge_container::{
    find_stream, MediaBackend, Muxer, MuxerOptions, Quality, ScalerSpec, StreamInfo, TrackType,
    VideoCodec, VideoEncoder, VideoEncoderConfig,
};
use clipforge_core::error::{Error, Result};
use clipforge_core::frame::{PixelFormat, VideoFrame};
use clipforge_core::memio::MemoryReader;
use clipforge_core::packet::Packet;
use clipforge_core::timestamp::{TimeBase, Timestamp};
use clipforge_remux::{SpeedChange, StreamMap, StreamSelector, TrimDecision, TrimWindow};

/// What happens to container-level metadata during a remux.
#[derive(Debug, Clone)]
pub(crate) enum MetadataPolicy {
    /// The output carries no container metadata.
    Discard,
    /// Copy the input metadata, then set one tag.
    CopyAndSet(String, String),
}

/// Options for the shared remux loop.
pub(crate) struct RemuxOptions {
    pub selector: StreamSelector,
    pub format: Option<ContainerFormatOverride>,
    pub fragmented: bool,
    pub trim: Option<TrimWindow>,
    pub speed: Option<SpeedChange>,
    pub metadata: MetadataPolicy,
}

pub(crate) type ContainerFormatOverride = clipforge_container::ContainerFormat;

impl Default for RemuxOptions {
    fn default() -> Self {
        Self {
            selector: StreamSelector::default_copy(),
            format: None,
            fragmented: false,
            trim: None,
            speed: None,
            metadata: MetadataPolicy::Discard,
        }
    }
}

/// The raw-copy path shared by every pass-through transform: open the input,
/// build the stream map, create the output streams, then copy packets with
/// per-packet rebasing. No decode happens anywhere on this path.
pub(crate) fn remux(
    backend: &dyn MediaBackend,
    input: &[u8],
    options: RemuxOptions,
) -> Result<Vec<u8>> {
    let mut demuxer = backend.open_input(MemoryReader::new(input))?;
    let format = options
        .format
        .unwrap_or_else(|| demuxer.format().as_output());
    let map = StreamMap::build(demuxer.streams(), &options.selector);
    if map.mapped_count() == 0 {
        return Err(Error::unsupported("no input stream selected for output"));
    }
    tracing::debug!(%format, streams = map.mapped_count(), "remux start");

    let mut muxer = backend.create_muxer(MuxerOptions {
        format,
        fragmented: options.fragmented,
    })?;
    for (input_index, _) in map.iter_mapped() {
        muxer.add_stream(demuxer.streams()[input_index].clone())?;
    }
    if let MetadataPolicy::CopyAndSet(key, value) = &options.metadata {
        let mut metadata = demuxer.metadata().clone();
        metadata.set(key.clone(), value.clone());
        muxer.set_metadata(metadata);
    }
    muxer.write_header()?;

    if let Some(window) = &options.trim {
        if !window.start().is_zero() {
            let start = window.start().rescale(TimeBase::MICROSECONDS);
            demuxer.seek(Timestamp::new(start.value, TimeBase::MICROSECONDS))?;
        }
    }

    while let Some(mut packet) = demuxer.read_packet()? {
        let Some(output_index) = map.output_index(packet.stream_index as usize) else {
            continue;
        };
        if let Some(window) = &options.trim {
            match window.classify(&packet) {
                TrimDecision::Before => continue,
                TrimDecision::After => break,
                TrimDecision::Within => window.rebase(&mut packet),
            }
        }
        if let Some(speed) = &options.speed {
            speed.apply(&mut packet);
        }
        write_mapped(&mut *muxer, output_index, &mut packet)?;
    }

    muxer.finish()
}

/// Rewrite a packet's stream index, rescale into the output stream's time
/// base, and write it.
pub(crate) fn write_mapped(
    muxer: &mut dyn Muxer,
    output_index: usize,
    packet: &mut Packet,
) -> Result<()> {
    let time_base = muxer
        .stream_time_base(output_index)
        .ok_or_else(|| Error::invalid(format!("unknown output stream {}", output_index)))?;
    packet.stream_index = output_index as u32;
    packet.rescale(time_base);
    muxer.write_packet(packet)
}

/// Options for the frame pipeline.
pub(crate) struct PipelineOptions {
    /// Format the per-frame hook runs in.
    pub work_format: PixelFormat,
    /// Dimensions handed to the hook (defaults to the source dimensions).
    pub work_size: Option<(u32, u32)>,
    /// Encoder output dimensions (defaults to the hook output dimensions).
    pub out_size: Option<(u32, u32)>,
    /// Encoder rate control.
    pub quality: Quality,
    /// Copy the first audio stream through unchanged.
    pub copy_audio: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            work_format: PixelFormat::Yuv420p,
            work_size: None,
            out_size: None,
            quality: Quality::default(),
            copy_audio: true,
        }
    }
}

/// Decode the first video stream, run every frame through `process`, and
/// re-encode, copying the first audio stream's packets unchanged. The hook
/// receives frames in `work_format` at the work size and must return frames
/// of a consistent size matching `out_size`.
pub(crate) fn transcode_video(
    backend: &dyn MediaBackend,
    input: &[u8],
    options: PipelineOptions,
    mut process: impl FnMut(VideoFrame) -> Result<VideoFrame>,
) -> Result<Vec<u8>> {
    let mut demuxer = backend.open_input(MemoryReader::new(input))?;
    let streams = demuxer.streams().to_vec();
    let video_index =
        find_stream(&streams, TrackType::Video).ok_or(Error::MissingStream("video"))?;
    let audio_index = find_stream(&streams, TrackType::Audio).filter(|_| options.copy_audio);

    let video_stream = &streams[video_index];
    let video_info = video_stream
        .video
        .clone()
        .ok_or(Error::MissingStream("video"))?;
    let (src_w, src_h) = (video_info.width, video_info.height);
    let (work_w, work_h) = options.work_size.unwrap_or((src_w & !1, src_h & !1));
    let (out_w, out_h) = options.out_size.unwrap_or((work_w, work_h));

    let mut decoder = backend.video_decoder(video_stream)?;
    let mut to_work = backend.scaler(
        ScalerSpec {
            width: src_w,
            height: src_h,
            format: PixelFormat::Yuv420p,
        },
        ScalerSpec {
            width: work_w,
            height: work_h,
            format: options.work_format,
        },
    )?;
    // RGBA hooks need a conversion back to the encoder's planar format.
    let mut to_output = if options.work_format == PixelFormat::Rgba {
        Some(backend.scaler(
            ScalerSpec {
                width: out_w,
                height: out_h,
                format: PixelFormat::Rgba,
            },
            ScalerSpec {
                width: out_w,
                height: out_h,
                format: PixelFormat::Yuv420p,
            },
        )?)
    } else {
        None
    };

    let encoder_config = VideoEncoderConfig {
        codec: VideoCodec::H264,
        width: out_w,
        height: out_h,
        time_base: video_stream.time_base,
        frame_rate: video_info.frame_rate,
        quality: options.quality,
    };
    let mut encoder = backend.video_encoder(&encoder_config)?;

    let mut muxer = backend.create_muxer(MuxerOptions {
        format: ContainerFormatOverride::Mp4,
        fragmented: false,
    })?;
    let video_out = muxer.add_stream(StreamInfo::video(
        0,
        encoder.time_base(),
        clipforge_container::VideoStreamInfo {
            codec: encoder_config.codec,
            width: out_w,
            height: out_h,
            frame_rate: video_info.frame_rate,
        },
    ))?;
    let audio_out = match audio_index {
        Some(index) => Some(muxer.add_stream(streams[index].clone())?),
        None => None,
    };
    muxer.write_header()?;

    while let Some(mut packet) = demuxer.read_packet()? {
        let stream_index = packet.stream_index as usize;
        if stream_index == video_index {
            decoder.send_packet(Some(&packet))?;
            drain_decoder(
                &mut *decoder,
                &mut *to_work,
                &mut to_output,
                &mut process,
                &mut *encoder,
                &mut *muxer,
                video_out,
            )?;
        } else if Some(stream_index) == audio_index {
            write_mapped(&mut *muxer, audio_out.unwrap(), &mut packet)?;
        }
    }

    // Flush the decoder, then the encoder.
    decoder.send_packet(None)?;
    drain_decoder(
        &mut *decoder,
        &mut *to_work,
        &mut to_output,
        &mut process,
        &mut *encoder,
        &mut *muxer,
        video_out,
    )?;
    encoder.send_frame(None)?;
    drain_encoder(&mut *encoder, &mut *muxer, video_out)?;

    muxer.finish()
}

fn drain_decoder(
    decoder: &mut dyn clipforge_container::VideoDecoder,
    to_work: &mut dyn clipforge_container::Scaler,
    to_output: &mut Option<Box<dyn clipforge_container::Scaler>>,
    process: &mut dyn FnMut(VideoFrame) -> Result<VideoFrame>,
    encoder: &mut dyn VideoEncoder,
    muxer: &mut dyn Muxer,
    video_out: usize,
) -> Result<()> {
    while let Some(frame) = decoder.receive_frame()? {
        let pts = frame.pts;
        let mut work = to_work.convert(&frame)?;
        work.pts = pts;
        let mut processed = process(work)?;
        processed.pts = pts;
        let encoded_input = match to_output {
            Some(scaler) => {
                let mut converted = scaler.convert(&processed)?;
                converted.pts = pts;
                converted
            }
            None => processed,
        };
        encoder.send_frame(Some(&encoded_input))?;
        drain_encoder(encoder, muxer, video_out)?;
    }
    Ok(())
}

/// Move every pending packet out of the encoder into the muxer.
pub(crate) fn drain_encoder(
    encoder: &mut dyn VideoEncoder,
    muxer: &mut dyn Muxer,
    video_out: usize,
) -> Result<()> {
    while let Some(mut packet) = encoder.receive_packet()? {
        write_mapped(muxer, video_out, &mut packet)?;
    }
    Ok(())
}

/// Read packets of one stream only, discarding the rest. Returns `None` when
/// the input is exhausted.
pub(crate) fn next_packet_of(
    demuxer: &mut dyn clipforge_container::Demuxer,
    stream_index: usize,
) -> Result<Option<clipforge_core::packet::OwnedPacket>> {
    while let Some(packet) = demuxer.read_packet()? {
        if packet.stream_index as usize == stream_index {
            return Ok(Some(packet));
        }
    }
    Ok(None)
}
