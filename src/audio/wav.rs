use crate::{Result, VoxnoteError};

/// Mime type of blobs produced by [`encode_wav`]
pub const WAV_MIME: &str = "audio/wav";

/// Opaque recorded audio payload as persisted with a note.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlob {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl AudioBlob {
    /// Wrap WAV-encoded bytes
    pub fn wav(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: WAV_MIME.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encode mono f32 samples as in-memory WAV bytes (16-bit PCM).
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| VoxnoteError::AudioProcessingError(format!("WAV writer: {}", e)))?;

    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let value = (clamped * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|e| VoxnoteError::AudioProcessingError(format!("WAV write: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| VoxnoteError::AudioProcessingError(format!("WAV finalize: {}", e)))?;

    Ok(cursor.into_inner())
}

/// Decode WAV bytes back to mono f32 samples and the source sample rate.
/// Multi-channel audio is downmixed by averaging.
pub fn decode_wav(bytes: &[u8]) -> Result<(Vec<f32>, u32)> {
    let cursor = std::io::Cursor::new(bytes);
    let mut reader = hound::WavReader::new(cursor)
        .map_err(|e| VoxnoteError::AudioProcessingError(format!("WAV reader: {}", e)))?;

    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| VoxnoteError::AudioProcessingError(format!("WAV read: {}", e)))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| VoxnoteError::AudioProcessingError(format!("WAV read: {}", e)))?
        }
    };

    let samples = if channels <= 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    Ok((samples, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let samples: Vec<f32> = (0..1600)
            .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / 16000.0).sin() * 0.5)
            .collect();

        let bytes = encode_wav(&samples, 16000).unwrap();
        let (decoded, rate) = decode_wav(&bytes).unwrap();

        assert_eq!(rate, 16000);
        assert_eq!(decoded.len(), samples.len());
        for (a, b) in samples.iter().zip(decoded.iter()) {
            assert!((a - b).abs() < 1.0 / 16384.0);
        }
    }

    #[test]
    fn test_encode_clamps_out_of_range() {
        let bytes = encode_wav(&[2.0, -2.0], 16000).unwrap();
        let (decoded, _) = decode_wav(&bytes).unwrap();

        assert!(decoded[0] <= 1.0);
        assert!(decoded[1] >= -1.0);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_wav(&[0u8; 16]).is_err());
    }

    #[test]
    fn test_blob_mime() {
        let blob = AudioBlob::wav(vec![1, 2, 3]);
        assert_eq!(blob.mime, WAV_MIME);
        assert_eq!(blob.len(), 3);
    }
}
