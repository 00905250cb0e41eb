//! Pass-through transforms: raw packet copy with stream mapping and
//! timestamp rebasing, no decode anywhere.

use crate::engine::{next_packet_of, remux, write_mapped, MetadataPolicy, RemuxOptions};
use clipforge_container::{
    find_stream, ContainerFormat, MediaBackend, MuxerOptions, StreamInfo, SubtitleCodec,
    SubtitleStreamInfo, TrackType,
};
use clipforge_core::error::{Error, Result};
use clipforge_core::memio::MemoryReader;
use clipforge_core::packet::Packet;
use clipforge_core::timestamp::{Duration, TimeBase, Timestamp};
use clipforge_remux::{
    pick_earlier, ConcatTracker, MergePick, SpeedChange, StreamMap, StreamSelector, TrimWindow,
    ZeroBase,
};
use clipforge_subtitle::SubtitleCue;

/// Rewrite the container to `format`, copying every video/audio/subtitle
/// stream. With no format given, the input's own format is reused (the
/// QuickTime family normalizes to MP4).
pub fn convert_format(
    backend: &dyn MediaBackend,
    input: &[u8],
    format: Option<ContainerFormat>,
) -> Result<Vec<u8>> {
    remux(
        backend,
        input,
        RemuxOptions {
            format,
            ..RemuxOptions::default()
        },
    )
}

/// Cut the input to the `[start_sec, end_sec]` window without re-encoding.
///
/// Packets before the window are dropped; the first kept packet's timestamps
/// rebase to zero, so the output timeline starts at the cut. An `end_sec` of
/// zero or less means "to the end".
pub fn trim(
    backend: &dyn MediaBackend,
    input: &[u8],
    start_sec: f64,
    end_sec: f64,
) -> Result<Vec<u8>> {
    let window = TrimWindow::new(start_sec, (end_sec > 0.0).then_some(end_sec));
    if start_sec > 0.0 && end_sec > 0.0 && end_sec <= start_sec {
        return Err(Error::invalid(format!(
            "empty trim window: {}..{}",
            start_sec, end_sec
        )));
    }
    remux(
        backend,
        input,
        RemuxOptions {
            trim: Some(window),
            ..RemuxOptions::default()
        },
    )
}

/// Drop every audio stream, copying video and subtitles through.
pub fn mute(backend: &dyn MediaBackend, input: &[u8]) -> Result<Vec<u8>> {
    remux(
        backend,
        input,
        RemuxOptions {
            selector: StreamSelector {
                video: true,
                subtitles: true,
                ..StreamSelector::default()
            },
            ..RemuxOptions::default()
        },
    )
}

/// Change playback speed by rescaling timestamps; `factor > 1` speeds up.
/// Audio pitch is untouched (this is a timestamp-only operation).
pub fn change_speed(backend: &dyn MediaBackend, input: &[u8], factor: f64) -> Result<Vec<u8>> {
    let speed = SpeedChange::new(factor)
        .ok_or_else(|| Error::invalid(format!("speed factor must be positive, got {}", factor)))?;
    remux(
        backend,
        input,
        RemuxOptions {
            selector: StreamSelector::av(),
            format: Some(ContainerFormat::Mp4),
            speed: Some(speed),
            ..RemuxOptions::default()
        },
    )
}

/// Remove all container-level metadata tags.
pub fn strip_metadata(backend: &dyn MediaBackend, input: &[u8]) -> Result<Vec<u8>> {
    remux(
        backend,
        input,
        RemuxOptions {
            selector: StreamSelector::av(),
            format: Some(ContainerFormat::Mp4),
            metadata: MetadataPolicy::Discard,
            ..RemuxOptions::default()
        },
    )
}

/// Copy the input with one metadata tag set (existing tags are kept).
pub fn set_metadata(
    backend: &dyn MediaBackend,
    input: &[u8],
    key: &str,
    value: &str,
) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(Error::invalid("metadata key must not be empty"));
    }
    remux(
        backend,
        input,
        RemuxOptions {
            selector: StreamSelector::av(),
            format: Some(ContainerFormat::Mp4),
            metadata: MetadataPolicy::CopyAndSet(key.to_string(), value.to_string()),
            ..RemuxOptions::default()
        },
    )
}

/// Rewrite as fragmented MP4 suitable for streaming playback, copying every
/// stream.
pub fn fragment_for_streaming(backend: &dyn MediaBackend, input: &[u8]) -> Result<Vec<u8>> {
    remux(
        backend,
        input,
        RemuxOptions {
            selector: StreamSelector::everything(),
            format: Some(ContainerFormat::Mp4),
            fragmented: true,
            ..RemuxOptions::default()
        },
    )
}

/// Remove subtitle tracks: all of them, or only those tagged with
/// `language`. Matroska-family inputs stay Matroska, everything else
/// becomes MP4.
pub fn remove_subtitle_tracks(
    backend: &dyn MediaBackend,
    input: &[u8],
    language: Option<&str>,
) -> Result<Vec<u8>> {
    let demuxer = backend.open_input(MemoryReader::new(input))?;
    let format = if demuxer.format().is_matroska_family() {
        ContainerFormat::Matroska
    } else {
        ContainerFormat::Mp4
    };
    drop(demuxer);

    let selector = match language {
        None => StreamSelector {
            video: true,
            audio: true,
            data: true,
            ..StreamSelector::default()
        },
        Some(lang) => StreamSelector {
            video: true,
            audio: true,
            subtitles: true,
            data: true,
            ..StreamSelector::default()
        }
        .without_language(lang),
    };
    remux(
        backend,
        input,
        RemuxOptions {
            selector,
            format: Some(format),
            ..RemuxOptions::default()
        },
    )
}

/// Add a soft subtitle track from SRT text. The container follows the
/// subtitle codec: SubRip goes into Matroska, MOV text into MP4. Cue packets
/// are stamped in a 1/1000 time base with `pts = start`, `duration = end -
/// start`.
pub fn add_subtitle_track(
    backend: &dyn MediaBackend,
    input: &[u8],
    srt_text: &str,
    language: &str,
    codec: SubtitleCodec,
) -> Result<Vec<u8>> {
    let cues = clipforge_subtitle::parse(srt_text)
        .map_err(|e| Error::invalid(format!("bad SRT input: {}", e)))?;
    if cues.is_empty() {
        return Err(Error::invalid("SRT input contains no usable cues"));
    }
    let language = if language.is_empty() { "eng" } else { language };

    let mut demuxer = backend.open_input(MemoryReader::new(input))?;
    let map = StreamMap::build(demuxer.streams(), &StreamSelector::everything());
    let mut muxer = backend.create_muxer(MuxerOptions::new(codec.container()))?;
    for (input_index, _) in map.iter_mapped() {
        muxer.add_stream(demuxer.streams()[input_index].clone())?;
    }
    let subtitle_out = muxer.add_stream(StreamInfo::subtitle(
        map.mapped_count(),
        TimeBase::MILLISECONDS,
        SubtitleStreamInfo {
            codec,
            language: Some(language.to_string()),
        },
    ))?;
    muxer.write_header()?;

    while let Some(mut packet) = demuxer.read_packet()? {
        let Some(output_index) = map.output_index(packet.stream_index as usize) else {
            continue;
        };
        write_mapped(&mut *muxer, output_index, &mut packet)?;
    }

    for cue in &cues {
        let mut packet = cue_packet(cue);
        write_mapped(&mut *muxer, subtitle_out, &mut packet)?;
    }

    muxer.finish()
}

fn cue_packet(cue: &SubtitleCue) -> Packet<'static> {
    let start = Timestamp::new(cue.start_millis(), TimeBase::MILLISECONDS);
    Packet::new(cue.text.clone().into_bytes())
        .with_timestamps(start, start)
        .with_duration(Duration::new(
            (cue.end_millis() - cue.start_millis()).max(0),
            TimeBase::MILLISECONDS,
        ))
}

/// Concatenate two inputs back to back without re-encoding.
///
/// The second input's streams are matched to the first's by media type; its
/// timestamps are shifted per output stream by the first input's final
/// `dts + duration`, so content B starts exactly where A ends even with
/// heterogeneous time bases. Both inputs must carry compatible streams (the
/// backend rejects codec mismatches at write time).
pub fn merge(backend: &dyn MediaBackend, first: &[u8], second: &[u8]) -> Result<Vec<u8>> {
    let mut demuxer_a = backend.open_input(MemoryReader::new(first))?;
    let mut demuxer_b = backend.open_input(MemoryReader::new(second))?;

    let map_a = StreamMap::build(demuxer_a.streams(), &StreamSelector::av());
    if map_a.mapped_count() == 0 {
        return Err(Error::unsupported("first input has no usable streams"));
    }

    // Map the second input's streams onto the first's outputs by media type.
    let streams_a = demuxer_a.streams().to_vec();
    let map_b: Vec<Option<usize>> = demuxer_b
        .streams()
        .iter()
        .map(|stream_b| {
            streams_a.iter().enumerate().find_map(|(index_a, stream_a)| {
                (stream_a.track_type == stream_b.track_type)
                    .then(|| map_a.output_index(index_a))
                    .flatten()
            })
        })
        .collect();

    let mut muxer = backend.create_muxer(MuxerOptions::new(ContainerFormat::Mp4))?;
    for (input_index, _) in map_a.iter_mapped() {
        muxer.add_stream(streams_a[input_index].clone())?;
    }
    muxer.write_header()?;

    let mut tracker = ConcatTracker::new(map_a.mapped_count());
    while let Some(mut packet) = demuxer_a.read_packet()? {
        let Some(output_index) = map_a.output_index(packet.stream_index as usize) else {
            continue;
        };
        write_mapped(&mut *muxer, output_index, &mut packet)?;
        tracker.note(output_index, &packet);
    }

    while let Some(mut packet) = demuxer_b.read_packet()? {
        let Some(output_index) = map_b
            .get(packet.stream_index as usize)
            .copied()
            .flatten()
        else {
            continue;
        };
        let time_base = muxer
            .stream_time_base(output_index)
            .ok_or_else(|| Error::invalid("unknown output stream"))?;
        packet.stream_index = output_index as u32;
        packet.rescale(time_base);
        tracker.apply(output_index, &mut packet);
        muxer.write_packet(&packet)?;
    }

    muxer.finish()
}

/// Replace the video input's audio with an independent audio input, merging
/// by interleave-on-time. Each stream's timeline is rebased to start at
/// zero; with `trim_to_video`, audio running past the video's duration is
/// dropped.
pub fn replace_audio(
    backend: &dyn MediaBackend,
    video_input: &[u8],
    audio_input: &[u8],
    trim_to_video: bool,
) -> Result<Vec<u8>> {
    let mut video_demuxer = backend.open_input(MemoryReader::new(video_input))?;
    let mut audio_demuxer = backend.open_input(MemoryReader::new(audio_input))?;

    let video_index = find_stream(video_demuxer.streams(), TrackType::Video)
        .ok_or(Error::MissingStream("video"))?;
    let audio_index = find_stream(audio_demuxer.streams(), TrackType::Audio)
        .ok_or(Error::MissingStream("audio"))?;

    let video_duration_sec = video_demuxer
        .duration()
        .map(|d| d.to_seconds())
        .unwrap_or(f64::INFINITY);

    let mut muxer = backend.create_muxer(MuxerOptions::new(ContainerFormat::Mp4))?;
    let video_out = muxer.add_stream(video_demuxer.streams()[video_index].clone())?;
    let audio_out = muxer.add_stream(audio_demuxer.streams()[audio_index].clone())?;
    muxer.write_header()?;

    let mut pending_video = next_packet_of(&mut *video_demuxer, video_index)?;
    let mut pending_audio = next_packet_of(&mut *audio_demuxer, audio_index)?;
    let mut video_base = ZeroBase::new();
    let mut audio_base = ZeroBase::new();

    while let Some(pick) = pick_earlier(pending_video.as_ref(), pending_audio.as_ref()) {
        match pick {
            MergePick::First => {
                let mut packet = pending_video.take().unwrap();
                video_base.apply(&mut packet);
                write_mapped(&mut *muxer, video_out, &mut packet)?;
                pending_video = next_packet_of(&mut *video_demuxer, video_index)?;
            }
            MergePick::Second => {
                let packet = pending_audio.take().unwrap();
                let keep = !trim_to_video
                    || clipforge_remux::interleave::absolute_seconds(&packet)
                        <= video_duration_sec;
                if keep {
                    let mut packet = packet;
                    audio_base.apply(&mut packet);
                    write_mapped(&mut *muxer, audio_out, &mut packet)?;
                }
                pending_audio = next_packet_of(&mut *audio_demuxer, audio_index)?;
            }
        }
    }

    muxer.finish()
}

/// The presentation timeline of the first video stream: one entry per
/// packet, in seconds, in read order.
pub fn packet_timestamps(backend: &dyn MediaBackend, input: &[u8]) -> Result<Vec<f64>> {
    let mut demuxer = backend.open_input(MemoryReader::new(input))?;
    let video_index = find_stream(demuxer.streams(), TrackType::Video)
        .ok_or(Error::MissingStream("video"))?;

    let mut timestamps = Vec::new();
    while let Some(packet) = demuxer.read_packet()? {
        if packet.stream_index as usize != video_index {
            continue;
        }
        if let Some(sec) = packet.reference_timestamp().to_seconds() {
            timestamps.push(sec);
        }
    }
    Ok(timestamps)
}
