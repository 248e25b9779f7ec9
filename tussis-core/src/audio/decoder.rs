//! Audio decoding
//!
//! Format-agnostic decoding of in-memory audio bytes to mono f32 PCM using
//! symphonia (WAV, MP3, FLAC, OGG, AAC, ...). Channels are averaged into a
//! single stream during decode, and decoding stops early once the caller's
//! duration cap is reached so oversized uploads cost bounded work.

use std::io::Cursor;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

use crate::error::{Error, Result};

/// Decoded audio: mono samples plus the source stream's properties.
#[derive(Debug)]
pub struct DecodedAudio {
    /// Mono samples in [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Source sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count before the mono mixdown.
    pub channels: usize,
}

/// Decode audio bytes to mono f32 PCM samples.
///
/// The container format is probed from content; request bodies carry no
/// filename to hint with. At most `duration_cap` seconds of audio (at the
/// source rate) are decoded.
pub fn decode_bytes(bytes: Vec<u8>, duration_cap: f64) -> Result<DecodedAudio> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::AudioDecode(format!("unrecognized audio format: {e}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::AudioDecode("no audio track found".into()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::AudioDecode("sample rate unknown".into()))?;
    let channels = track
        .codec_params
        .channels
        .ok_or_else(|| Error::AudioDecode("channel layout unknown".into()))?;
    let channel_count = channels.count();

    if sample_rate == 0 || channel_count == 0 {
        return Err(Error::AudioDecode("degenerate stream parameters".into()));
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::AudioDecode(format!("no decoder for codec: {e}")))?;

    let sample_cap = (duration_cap * sample_rate as f64).ceil() as usize;
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                // End of stream
                break;
            }
            Err(e) => return Err(Error::AudioDecode(format!("error reading packet: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| Error::AudioDecode(format!("failed to decode packet: {e}")))?;
        mix_to_mono(&decoded, &mut samples);

        if samples.len() >= sample_cap {
            samples.truncate(sample_cap);
            break;
        }
    }

    if samples.is_empty() {
        return Err(Error::AudioDecode("stream contained no audio samples".into()));
    }

    tracing::debug!(
        sample_rate,
        channels = channel_count,
        samples = samples.len(),
        "Decoded audio"
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels: channel_count,
    })
}

/// Append the mono mixdown of a decoded buffer to `out`.
fn mix_to_mono(decoded: &AudioBufferRef, out: &mut Vec<f32>) {
    fn mix<S: Sample>(buf: &AudioBuffer<S>, out: &mut Vec<f32>)
    where
        f32: FromSample<S>,
    {
        let num_channels = buf.spec().channels.count();
        let num_frames = buf.frames();
        out.reserve(num_frames);

        for frame_idx in 0..num_frames {
            let mut sum = 0.0f32;
            for ch in 0..num_channels {
                sum += f32::from_sample(buf.chan(ch)[frame_idx]);
            }
            out.push(sum / num_channels as f32);
        }
    }

    match decoded {
        AudioBufferRef::U8(buf) => mix(buf.as_ref(), out),
        AudioBufferRef::U16(buf) => mix(buf.as_ref(), out),
        AudioBufferRef::U24(buf) => mix(buf.as_ref(), out),
        AudioBufferRef::U32(buf) => mix(buf.as_ref(), out),
        AudioBufferRef::S8(buf) => mix(buf.as_ref(), out),
        AudioBufferRef::S16(buf) => mix(buf.as_ref(), out),
        AudioBufferRef::S24(buf) => mix(buf.as_ref(), out),
        AudioBufferRef::S32(buf) => mix(buf.as_ref(), out),
        AudioBufferRef::F32(buf) => mix(buf.as_ref(), out),
        AudioBufferRef::F64(buf) => mix(buf.as_ref(), out),
    }
}
