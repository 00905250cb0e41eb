//! Video transforms that decode, process frames, and re-encode.
//!
//! All of these share the frame pipeline in `engine`: video is decoded,
//! converted to a working format, run through a per-frame hook from
//! `clipforge-compose`, and re-encoded; the first audio stream is copied
//! through untouched.

use crate::engine::{drain_encoder, next_packet_of, transcode_video, PipelineOptions};
use clipforge_compose as compose;
use clipforge_compose::{CropRect, PadGeometry, Rotation, VideoFilter, YuvColor};
use clipforge_container::{
    find_stream, ContainerFormat, MediaBackend, MuxerOptions, Quality, ScalerSpec, StreamInfo,
    TrackType, VideoCodec, VideoEncoderConfig, VideoStreamInfo,
};
use clipforge_core::error::{Error, Result};
use clipforge_core::frame::{PixelFormat, VideoFrame};
use clipforge_core::memio::MemoryReader;
use clipforge_core::rational::Rational;
use clipforge_core::timestamp::{TimeBase, Timestamp};
use clipforge_subtitle::CueCursor;

/// Single-image export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG via the motion-JPEG encoder.
    Jpeg,
    /// PNG.
    Png,
}

impl ImageFormat {
    fn codec(&self) -> VideoCodec {
        match self {
            Self::Jpeg => VideoCodec::Mjpeg,
            Self::Png => VideoCodec::Png,
        }
    }

    fn pixel_format(&self) -> PixelFormat {
        match self {
            Self::Jpeg => PixelFormat::Yuv420p,
            Self::Png => PixelFormat::Rgba,
        }
    }
}

fn probe_video(backend: &dyn MediaBackend, input: &[u8]) -> Result<VideoStreamInfo> {
    let demuxer = backend.open_input(MemoryReader::new(input))?;
    let index = find_stream(demuxer.streams(), TrackType::Video)
        .ok_or(Error::MissingStream("video"))?;
    demuxer.streams()[index]
        .video
        .clone()
        .ok_or(Error::MissingStream("video"))
}

fn frame_rate_or(info: &VideoStreamInfo, fallback: f64) -> f64 {
    info.frame_rate
        .filter(|r| r.is_positive())
        .map(|r| r.to_f64())
        .unwrap_or(fallback)
}

/// Re-encode the video stream, optionally resizing. A missing dimension is
/// derived from the source aspect ratio; both are forced even.
pub fn reencode(
    backend: &dyn MediaBackend,
    input: &[u8],
    quality: Quality,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<Vec<u8>> {
    let info = probe_video(backend, input)?;
    let (src_w, src_h) = (info.width, info.height);
    let (mut out_w, mut out_h) = match (width, height) {
        (None, None) => (src_w, src_h),
        (Some(w), None) => (w, (src_h as f64 / src_w as f64 * w as f64 + 0.5) as u32),
        (None, Some(h)) => ((src_w as f64 / src_h as f64 * h as f64 + 0.5) as u32, h),
        (Some(w), Some(h)) => (w, h),
    };
    out_w &= !1;
    out_h &= !1;
    if out_w == 0 || out_h == 0 {
        return Err(Error::invalid("output dimensions collapse to zero"));
    }

    transcode_video(
        backend,
        input,
        PipelineOptions {
            work_size: Some((out_w, out_h)),
            quality,
            ..PipelineOptions::default()
        },
        Ok,
    )
}

/// Crop the video to a rectangle. Odd geometry rounds down to even; the
/// rectangle must lie inside the frame.
pub fn crop(
    backend: &dyn MediaBackend,
    input: &[u8],
    rect: CropRect,
    quality: Quality,
) -> Result<Vec<u8>> {
    let info = probe_video(backend, input)?;
    let aligned = CropRect::new(rect.x & !1, rect.y & !1, rect.width & !1, rect.height & !1);
    if aligned.width == 0 || aligned.height == 0 {
        return Err(Error::invalid("crop rectangle has zero area"));
    }
    if aligned.x + aligned.width > info.width || aligned.y + aligned.height > info.height {
        return Err(Error::invalid(format!(
            "crop rectangle {}x{}+{}+{} exceeds frame {}x{}",
            aligned.width, aligned.height, aligned.x, aligned.y, info.width, info.height
        )));
    }

    transcode_video(
        backend,
        input,
        PipelineOptions {
            out_size: Some((aligned.width, aligned.height)),
            quality,
            ..PipelineOptions::default()
        },
        move |frame| compose::crop(&frame, aligned).map_err(Into::into),
    )
}

/// Mirror the video horizontally and/or vertically.
pub fn flip(
    backend: &dyn MediaBackend,
    input: &[u8],
    horizontal: bool,
    vertical: bool,
    quality: Quality,
) -> Result<Vec<u8>> {
    if !horizontal && !vertical {
        return Err(Error::invalid("at least one flip axis is required"));
    }
    transcode_video(
        backend,
        input,
        PipelineOptions {
            quality,
            ..PipelineOptions::default()
        },
        move |frame| compose::flip(&frame, horizontal, vertical).map_err(Into::into),
    )
}

/// Rotate the video by a multiple of 90 degrees.
pub fn rotate(
    backend: &dyn MediaBackend,
    input: &[u8],
    degrees: i32,
    quality: Quality,
) -> Result<Vec<u8>> {
    let rotation = Rotation::from_degrees(degrees)?;
    let info = probe_video(backend, input)?;
    let (work_w, work_h) = (info.width & !1, info.height & !1);
    let out_size = if rotation.transposes() {
        (work_h, work_w)
    } else {
        (work_w, work_h)
    };

    transcode_video(
        backend,
        input,
        PipelineOptions {
            work_size: Some((work_w, work_h)),
            out_size: Some(out_size),
            quality,
            ..PipelineOptions::default()
        },
        move |frame| compose::rotate(&frame, rotation).map_err(Into::into),
    )
}

/// Place the video inside a larger solid-color canvas.
pub fn pad(
    backend: &dyn MediaBackend,
    input: &[u8],
    geometry: PadGeometry,
    color: &str,
    quality: Quality,
) -> Result<Vec<u8>> {
    let info = probe_video(backend, input)?;
    let canvas = PadGeometry {
        width: geometry.width & !1,
        height: geometry.height & !1,
        x: geometry.x & !1,
        y: geometry.y & !1,
    };
    if canvas.x + (info.width & !1) > canvas.width || canvas.y + (info.height & !1) > canvas.height
    {
        return Err(Error::invalid(format!(
            "canvas {}x{} cannot hold {}x{} at +{}+{}",
            canvas.width, canvas.height, info.width, info.height, canvas.x, canvas.y
        )));
    }
    let fill = YuvColor::from_name(color);

    transcode_video(
        backend,
        input,
        PipelineOptions {
            out_size: Some((canvas.width, canvas.height)),
            quality,
            ..PipelineOptions::default()
        },
        move |frame| compose::pad(&frame, canvas, fill).map_err(Into::into),
    )
}

/// Apply a basic video filter (blur, denoise, sharpen, color correction, or
/// gamma) to every frame.
pub fn filter(
    backend: &dyn MediaBackend,
    input: &[u8],
    video_filter: VideoFilter,
    quality: Quality,
) -> Result<Vec<u8>> {
    video_filter.validate()?;
    transcode_video(
        backend,
        input,
        PipelineOptions {
            quality,
            ..PipelineOptions::default()
        },
        move |mut frame| {
            video_filter.apply(&mut frame)?;
            Ok(frame)
        },
    )
}

/// Damp frame-to-frame jitter by temporally smoothing each frame toward its
/// predecessor. `strength` runs 1..=32; higher means stronger damping.
pub fn stabilize(backend: &dyn MediaBackend, input: &[u8], strength: u8) -> Result<Vec<u8>> {
    let strength = strength.clamp(1, 32);
    let mut previous: Option<VideoFrame> = None;
    transcode_video(
        backend,
        input,
        PipelineOptions::default(),
        move |mut frame| {
            if let Some(prev) = &previous {
                compose::temporal_smooth(&mut frame, prev, strength)?;
            }
            previous = Some(frame.clone());
            Ok(frame)
        },
    )
}

/// Alpha-composite a watermark image onto every frame. The watermark input
/// is any decodable media buffer; its first video frame is used.
pub fn watermark(
    backend: &dyn MediaBackend,
    input: &[u8],
    overlay_input: &[u8],
    x: i32,
    y: i32,
    opacity: f32,
    quality: Quality,
) -> Result<Vec<u8>> {
    let opacity = if opacity <= 0.0 { 0.5 } else { opacity.min(1.0) };
    let overlay = decode_first_frame(backend, overlay_input, PixelFormat::Rgba)?;

    transcode_video(
        backend,
        input,
        PipelineOptions {
            work_format: PixelFormat::Rgba,
            quality,
            ..PipelineOptions::default()
        },
        move |mut frame| {
            compose::alpha_overlay(&mut frame, &overlay, x, y, opacity)?;
            Ok(frame)
        },
    )
}

/// Burn SRT subtitles into the video as block glyphs. Empty or unusable SRT
/// text degrades to a plain container rewrite.
pub fn burn_in_subtitles(
    backend: &dyn MediaBackend,
    input: &[u8],
    srt_text: &str,
    font_size: u32,
    margin_bottom: u32,
    quality: Quality,
) -> Result<Vec<u8>> {
    let cues = clipforge_subtitle::parse(srt_text).unwrap_or_default();
    if cues.is_empty() {
        return crate::passthrough::convert_format(backend, input, None);
    }
    let margin = if margin_bottom == 0 { 24 } else { margin_bottom };
    let mut cursor = CueCursor::new();

    transcode_video(
        backend,
        input,
        PipelineOptions {
            work_format: PixelFormat::Rgba,
            quality,
            ..PipelineOptions::default()
        },
        move |mut frame| {
            let sec = frame.pts.to_seconds().unwrap_or(0.0);
            if let Some(cue) = cursor.active_at(&cues, sec) {
                let text = clipforge_subtitle::strip_formatting(&cue.text);
                compose::draw_subtitle_band(&mut frame, &text, margin, font_size)?;
            }
            Ok(frame)
        },
    )
}

/// Reverse video playback. Audio is dropped.
///
/// Every decoded frame is held in memory until the input is exhausted, so
/// peak memory is proportional to input duration times frame size.
pub fn reverse(backend: &dyn MediaBackend, input: &[u8]) -> Result<Vec<u8>> {
    let mut demuxer = backend.open_input(MemoryReader::new(input))?;
    let streams = demuxer.streams().to_vec();
    let video_index =
        find_stream(&streams, TrackType::Video).ok_or(Error::MissingStream("video"))?;
    let video_stream = &streams[video_index];
    let info = video_stream.video.clone().ok_or(Error::MissingStream("video"))?;
    let (out_w, out_h) = (info.width & !1, info.height & !1);
    let fps = frame_rate_or(&info, 30.0);

    let mut decoder = backend.video_decoder(video_stream)?;
    let mut scaler = backend.scaler(
        ScalerSpec {
            width: info.width,
            height: info.height,
            format: PixelFormat::Yuv420p,
        },
        ScalerSpec {
            width: out_w,
            height: out_h,
            format: PixelFormat::Yuv420p,
        },
    )?;

    let mut frames: Vec<VideoFrame> = Vec::new();
    while let Some(packet) = next_packet_of(&mut *demuxer, video_index)? {
        decoder.send_packet(Some(&packet))?;
        while let Some(frame) = decoder.receive_frame()? {
            frames.push(scaler.convert(&frame)?);
        }
    }
    decoder.send_packet(None)?;
    while let Some(frame) = decoder.receive_frame()? {
        frames.push(scaler.convert(&frame)?);
    }
    if frames.is_empty() {
        return Err(Error::unsupported("input contains no decodable video frames"));
    }
    tracing::debug!(frames = frames.len(), "reversing frame order");

    let time_base = TimeBase::new(1, fps.round().max(1.0) as i64);
    let mut encoder = backend.video_encoder(&VideoEncoderConfig {
        codec: VideoCodec::H264,
        width: out_w,
        height: out_h,
        time_base,
        frame_rate: info.frame_rate,
        quality: Quality::new(18, Default::default()),
    })?;
    let mut muxer = backend.create_muxer(MuxerOptions::new(ContainerFormat::Mp4))?;
    let video_out = muxer.add_stream(StreamInfo::video(
        0,
        encoder.time_base(),
        VideoStreamInfo {
            codec: VideoCodec::H264,
            width: out_w,
            height: out_h,
            frame_rate: info.frame_rate,
        },
    ))?;
    muxer.write_header()?;

    for (position, frame) in frames.iter().rev().enumerate() {
        let mut restamped = frame.clone();
        restamped.pts = Timestamp::new(position as i64, time_base);
        encoder.send_frame(Some(&restamped))?;
        drain_encoder(&mut *encoder, &mut *muxer, video_out)?;
    }
    encoder.send_frame(None)?;
    drain_encoder(&mut *encoder, &mut *muxer, video_out)?;

    muxer.finish()
}

/// Convert the input to a constant frame rate by duplicating or dropping
/// frames. Over long inputs the nearest-integer cadence can drift slightly
/// from the exact target rate.
pub fn change_fps(
    backend: &dyn MediaBackend,
    input: &[u8],
    target_fps: f64,
    quality: Quality,
) -> Result<Vec<u8>> {
    if target_fps <= 0.0 {
        return Err(Error::invalid("target fps must be positive"));
    }
    let mut demuxer = backend.open_input(MemoryReader::new(input))?;
    let streams = demuxer.streams().to_vec();
    let video_index =
        find_stream(&streams, TrackType::Video).ok_or(Error::MissingStream("video"))?;
    let audio_index = find_stream(&streams, TrackType::Audio);
    let video_stream = &streams[video_index];
    let info = video_stream.video.clone().ok_or(Error::MissingStream("video"))?;
    let (out_w, out_h) = (info.width & !1, info.height & !1);
    let ratio = target_fps / frame_rate_or(&info, target_fps);

    let mut decoder = backend.video_decoder(video_stream)?;
    let mut scaler = backend.scaler(
        ScalerSpec {
            width: info.width,
            height: info.height,
            format: PixelFormat::Yuv420p,
        },
        ScalerSpec {
            width: out_w,
            height: out_h,
            format: PixelFormat::Yuv420p,
        },
    )?;

    let time_base = TimeBase::new(1, target_fps.round().max(1.0) as i64);
    let mut encoder = backend.video_encoder(&VideoEncoderConfig {
        codec: VideoCodec::H264,
        width: out_w,
        height: out_h,
        time_base,
        frame_rate: Some(Rational::new(target_fps.round() as i64, 1)),
        quality,
    })?;
    let mut muxer = backend.create_muxer(MuxerOptions::new(ContainerFormat::Mp4))?;
    let video_out = muxer.add_stream(StreamInfo::video(
        0,
        encoder.time_base(),
        VideoStreamInfo {
            codec: VideoCodec::H264,
            width: out_w,
            height: out_h,
            frame_rate: Some(Rational::new(target_fps.round() as i64, 1)),
        },
    ))?;
    let audio_out = match audio_index {
        Some(index) => Some(muxer.add_stream(streams[index].clone())?),
        None => None,
    };
    muxer.write_header()?;

    let mut in_frames: i64 = 0;
    let mut out_frames: i64 = 0;
    let emit = |frame: &VideoFrame,
                    encoder: &mut dyn clipforge_container::VideoEncoder,
                    muxer: &mut dyn clipforge_container::Muxer,
                    in_frames: i64,
                    out_frames: &mut i64|
     -> Result<()> {
        let should_have = (in_frames as f64 * ratio + 1e-9).floor() as i64;
        while *out_frames < should_have {
            let mut restamped = frame.clone();
            restamped.pts = Timestamp::new(*out_frames, time_base);
            encoder.send_frame(Some(&restamped))?;
            drain_encoder(encoder, muxer, video_out)?;
            *out_frames += 1;
        }
        Ok(())
    };

    while let Some(mut packet) = demuxer.read_packet()? {
        let stream_index = packet.stream_index as usize;
        if stream_index == video_index {
            decoder.send_packet(Some(&packet))?;
            while let Some(frame) = decoder.receive_frame()? {
                let scaled = scaler.convert(&frame)?;
                in_frames += 1;
                emit(&scaled, &mut *encoder, &mut *muxer, in_frames, &mut out_frames)?;
            }
        } else if Some(stream_index) == audio_index {
            crate::engine::write_mapped(&mut *muxer, audio_out.unwrap(), &mut packet)?;
        }
    }
    decoder.send_packet(None)?;
    while let Some(frame) = decoder.receive_frame()? {
        let scaled = scaler.convert(&frame)?;
        in_frames += 1;
        emit(&scaled, &mut *encoder, &mut *muxer, in_frames, &mut out_frames)?;
    }
    encoder.send_frame(None)?;
    drain_encoder(&mut *encoder, &mut *muxer, video_out)?;

    muxer.finish()
}

/// Extract one frame at (or just after) `timestamp_sec` as an encoded image.
pub fn extract_frame(
    backend: &dyn MediaBackend,
    input: &[u8],
    timestamp_sec: f64,
    format: ImageFormat,
) -> Result<Vec<u8>> {
    let mut demuxer = backend.open_input(MemoryReader::new(input))?;
    let streams = demuxer.streams().to_vec();
    let video_index =
        find_stream(&streams, TrackType::Video).ok_or(Error::MissingStream("video"))?;
    let video_stream = &streams[video_index];
    let info = video_stream.video.clone().ok_or(Error::MissingStream("video"))?;

    let mut decoder = backend.video_decoder(video_stream)?;
    if timestamp_sec > 0.0 {
        demuxer.seek(Timestamp::from_seconds(timestamp_sec, TimeBase::MICROSECONDS))?;
    }

    let mut picked: Option<VideoFrame> = None;
    'read: while let Some(packet) = next_packet_of(&mut *demuxer, video_index)? {
        decoder.send_packet(Some(&packet))?;
        while let Some(frame) = decoder.receive_frame()? {
            let sec = frame.pts.to_seconds().unwrap_or(0.0);
            picked = Some(frame);
            if timestamp_sec <= 0.0 || sec >= timestamp_sec {
                break 'read;
            }
        }
    }
    if picked.is_none() {
        decoder.send_packet(None)?;
        picked = decoder.receive_frame()?;
    }
    let frame = picked.ok_or_else(|| Error::unsupported("no decodable video frame found"))?;

    let (w, h) = (info.width & !1, info.height & !1);
    let mut scaler = backend.scaler(
        ScalerSpec {
            width: info.width,
            height: info.height,
            format: PixelFormat::Yuv420p,
        },
        ScalerSpec {
            width: w,
            height: h,
            format: format.pixel_format(),
        },
    )?;
    let mut image = scaler.convert(&frame)?;
    image.pts = Timestamp::new(0, TimeBase::SECONDS);

    let mut encoder = backend.video_encoder(&VideoEncoderConfig {
        codec: format.codec(),
        width: w,
        height: h,
        time_base: TimeBase::SECONDS,
        frame_rate: None,
        quality: Quality::new(2, Default::default()),
    })?;
    encoder.send_frame(Some(&image))?;
    encoder.send_frame(None)?;
    let packet = encoder
        .receive_packet()?
        .ok_or_else(|| Error::unsupported("image encoder produced no output"))?;
    Ok(packet.data().to_vec())
}

/// Convert a slice of the video to an animated GIF.
///
/// Frames are sampled by nearest-integer decimation of the source cadence,
/// which can drift from the requested rate over long durations.
pub fn to_gif(
    backend: &dyn MediaBackend,
    input: &[u8],
    fps: u32,
    width: u32,
    start_sec: f64,
    duration_sec: f64,
) -> Result<Vec<u8>> {
    let fps = if fps == 0 { 10 } else { fps };
    let width = if width == 0 { 320 } else { width & !1 };

    let mut demuxer = backend.open_input(MemoryReader::new(input))?;
    let streams = demuxer.streams().to_vec();
    let video_index =
        find_stream(&streams, TrackType::Video).ok_or(Error::MissingStream("video"))?;
    let video_stream = &streams[video_index];
    let info = video_stream.video.clone().ok_or(Error::MissingStream("video"))?;
    let out_h = ((info.height as f64 / info.width as f64 * width as f64 + 0.5) as u32) & !1;
    if out_h == 0 {
        return Err(Error::invalid("gif output height collapses to zero"));
    }

    let end_sec = if duration_sec > 0.0 {
        start_sec + duration_sec
    } else {
        f64::INFINITY
    };
    let src_fps = frame_rate_or(&info, 30.0);
    let frame_interval = (src_fps / fps as f64).max(1.0).round() as i64;

    let mut decoder = backend.video_decoder(video_stream)?;
    let mut scaler = backend.scaler(
        ScalerSpec {
            width: info.width,
            height: info.height,
            format: PixelFormat::Yuv420p,
        },
        ScalerSpec {
            width,
            height: out_h,
            format: PixelFormat::Rgba,
        },
    )?;

    let time_base = TimeBase::new(1, fps as i64);
    let mut encoder = backend.video_encoder(&VideoEncoderConfig {
        codec: VideoCodec::Gif,
        width,
        height: out_h,
        time_base,
        frame_rate: Some(Rational::new(fps as i64, 1)),
        quality: Quality::default(),
    })?;
    let mut muxer = backend.create_muxer(MuxerOptions::new(ContainerFormat::Gif))?;
    let video_out = muxer.add_stream(StreamInfo::video(
        0,
        encoder.time_base(),
        VideoStreamInfo {
            codec: VideoCodec::Gif,
            width,
            height: out_h,
            frame_rate: Some(Rational::new(fps as i64, 1)),
        },
    ))?;
    muxer.write_header()?;

    if start_sec > 0.0 {
        demuxer.seek(Timestamp::from_seconds(start_sec, TimeBase::MICROSECONDS))?;
    }

    let mut decoded: i64 = 0;
    let mut emitted: i64 = 0;
    'read: while let Some(packet) = next_packet_of(&mut *demuxer, video_index)? {
        if let Some(sec) = packet.reference_timestamp().to_seconds() {
            if sec > end_sec {
                break;
            }
        }
        decoder.send_packet(Some(&packet))?;
        while let Some(frame) = decoder.receive_frame()? {
            let sec = frame.pts.to_seconds().unwrap_or(0.0);
            if sec < start_sec {
                continue;
            }
            if sec > end_sec {
                break 'read;
            }
            let sampled = decoded % frame_interval == 0;
            decoded += 1;
            if !sampled {
                continue;
            }
            let mut gif_frame = scaler.convert(&frame)?;
            gif_frame.pts = Timestamp::new(emitted, time_base);
            emitted += 1;
            encoder.send_frame(Some(&gif_frame))?;
            drain_encoder(&mut *encoder, &mut *muxer, video_out)?;
        }
    }
    encoder.send_frame(None)?;
    drain_encoder(&mut *encoder, &mut *muxer, video_out)?;

    muxer.finish()
}

fn decode_first_frame(
    backend: &dyn MediaBackend,
    input: &[u8],
    format: PixelFormat,
) -> Result<VideoFrame> {
    let mut demuxer = backend.open_input(MemoryReader::new(input))?;
    let streams = demuxer.streams().to_vec();
    let video_index =
        find_stream(&streams, TrackType::Video).ok_or(Error::MissingStream("video"))?;
    let video_stream = &streams[video_index];
    let info = video_stream.video.clone().ok_or(Error::MissingStream("video"))?;

    let mut decoder = backend.video_decoder(video_stream)?;
    let mut first = None;
    while let Some(packet) = next_packet_of(&mut *demuxer, video_index)? {
        decoder.send_packet(Some(&packet))?;
        if let Some(frame) = decoder.receive_frame()? {
            first = Some(frame);
            break;
        }
    }
    if first.is_none() {
        decoder.send_packet(None)?;
        first = decoder.receive_frame()?;
    }
    let frame = first.ok_or_else(|| Error::unsupported("overlay input has no video frames"))?;

    let mut scaler = backend.scaler(
        ScalerSpec {
            width: info.width,
            height: info.height,
            format: PixelFormat::Yuv420p,
        },
        ScalerSpec {
            width: info.width,
            height: info.height,
            format,
        },
    )?;
    scaler.convert(&frame)
}
