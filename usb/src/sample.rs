use crate::error::DecodeError;
use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Cursor, Seek, SeekFrom};

/// Width in bytes of a single sample inside a record.
pub const SAMPLE_WIDTH: usize = 32;

// Scaling factors, worked out by comparing stored values against what the watch displays.
pub const COORDINATE_SCALE: f64 = 1_000_000.0;
pub const SPEED_SCALE: f64 = 0.002777781;
pub const PERIOD_SCALE: f64 = 100.0;

/// One reading from the trainer, with every value left in the units the device stores.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetrySample {
    /// Beats per minute.
    pub heartrate: u16,
    pub latitude: i32,
    pub longitude: i32,
    pub altitude: i16,
    pub gps_speed: i16,
    pub compass: i16,
    pub distance_period: i16,
    pub time_period: i16,
    pub distance_total: i16,
}

impl TelemetrySample {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < SAMPLE_WIDTH {
            return Err(DecodeError::Truncated {
                expected: SAMPLE_WIDTH,
                actual: data.len(),
            });
        }

        let mut cursor = Cursor::new(&data[..SAMPLE_WIDTH]);
        let heartrate = cursor.read_u16::<LittleEndian>()?;
        cursor.seek(SeekFrom::Current(2))?;

        let latitude = cursor.read_i32::<LittleEndian>()?;
        let longitude = cursor.read_i32::<LittleEndian>()?;
        let altitude = cursor.read_i16::<LittleEndian>()?;
        let gps_speed = cursor.read_i16::<LittleEndian>()?;
        let compass = cursor.read_i16::<LittleEndian>()?;
        let distance_period = cursor.read_i16::<LittleEndian>()?;
        let time_period = cursor.read_i16::<LittleEndian>()?;
        let distance_total = cursor.read_i16::<LittleEndian>()?;

        // Bytes 24 to 32 are unknown, and currently always zero.
        Ok(Self {
            heartrate,
            latitude,
            longitude,
            altitude,
            gps_speed,
            compass,
            distance_period,
            time_period,
            distance_total,
        })
    }

    pub fn latitude_degrees(&self) -> f64 {
        self.latitude as f64 / COORDINATE_SCALE
    }

    pub fn longitude_degrees(&self) -> f64 {
        self.longitude as f64 / COORDINATE_SCALE
    }

    pub fn speed(&self) -> f64 {
        self.gps_speed as f64 * SPEED_SCALE
    }

    pub fn period_distance(&self) -> f64 {
        self.distance_period as f64 / PERIOD_SCALE
    }

    pub fn period_seconds(&self) -> f64 {
        self.time_period as f64 / PERIOD_SCALE
    }
}

/// Decodes every whole sample in `data`, returning any bytes left over at the end.
pub fn decode_samples(data: &[u8]) -> Result<(Vec<TelemetrySample>, &[u8]), DecodeError> {
    let chunks = data.chunks_exact(SAMPLE_WIDTH);
    let trailing = chunks.remainder();

    let samples = chunks
        .map(TelemetrySample::decode)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((samples, trailing))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bytes() -> [u8; SAMPLE_WIDTH] {
        let mut bytes = [0; SAMPLE_WIDTH];
        bytes[0..2].copy_from_slice(&[0x78, 0x00]);
        bytes[2..4].copy_from_slice(&[0xEE, 0xEE]);
        bytes[4..8].copy_from_slice(&40_000_000i32.to_le_bytes());
        bytes[8..12].copy_from_slice(&(-3_703_790i32).to_le_bytes());
        bytes[12..14].copy_from_slice(&667i16.to_le_bytes());
        bytes[14..16].copy_from_slice(&3600i16.to_le_bytes());
        bytes[16..18].copy_from_slice(&270i16.to_le_bytes());
        bytes[18..20].copy_from_slice(&250i16.to_le_bytes());
        bytes[20..22].copy_from_slice(&100i16.to_le_bytes());
        bytes[22..24].copy_from_slice(&(-2i16).to_le_bytes());
        bytes[24..].copy_from_slice(&[0xEE; 8]);
        bytes
    }

    #[test]
    fn decodes_fields_at_their_offsets() {
        let sample = TelemetrySample::decode(&sample_bytes()).expect("sample");

        assert_eq!(sample.heartrate, 120);
        assert_eq!(sample.latitude, 40_000_000);
        assert_eq!(sample.longitude, -3_703_790);
        assert_eq!(sample.altitude, 667);
        assert_eq!(sample.gps_speed, 3600);
        assert_eq!(sample.compass, 270);
        assert_eq!(sample.distance_period, 250);
        assert_eq!(sample.time_period, 100);
        assert_eq!(sample.distance_total, -2);
    }

    #[test]
    fn scaled_values() {
        let sample = TelemetrySample::decode(&sample_bytes()).expect("sample");

        assert_eq!(sample.latitude_degrees(), 40.0);
        assert!((sample.longitude_degrees() + 3.70379).abs() < 1e-9);
        assert!((sample.speed() - 10.0000116).abs() < 1e-6);
        assert_eq!(sample.period_distance(), 2.5);
        assert_eq!(sample.period_seconds(), 1.0);
    }

    #[test]
    fn short_buffer_is_truncated() {
        let bytes = sample_bytes();
        let result = TelemetrySample::decode(&bytes[..SAMPLE_WIDTH - 1]);
        assert!(matches!(
            result,
            Err(DecodeError::Truncated {
                expected: SAMPLE_WIDTH,
                actual: 31
            })
        ));

        assert!(matches!(
            TelemetrySample::decode(&[]),
            Err(DecodeError::Truncated { actual: 0, .. })
        ));
    }

    #[test]
    fn longer_buffer_only_reads_one_sample() {
        let mut bytes = sample_bytes().to_vec();
        bytes.extend_from_slice(&[0xFF; 10]);
        let sample = TelemetrySample::decode(&bytes).expect("sample");
        assert_eq!(sample.heartrate, 120);
    }

    #[test]
    fn decodes_consecutive_samples_from_a_record() {
        let mut record = sample_bytes().to_vec();
        let mut second = sample_bytes();
        second[0] = 0x82;
        record.extend_from_slice(&second);
        record.extend_from_slice(&[0x01, 0x02, 0x03]);

        let (samples, trailing) = decode_samples(&record).expect("samples");
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].heartrate, 120);
        assert_eq!(samples[1].heartrate, 130);
        assert_eq!(trailing, &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn empty_record_has_no_samples() {
        let (samples, trailing) = decode_samples(&[]).expect("samples");
        assert!(samples.is_empty());
        assert!(trailing.is_empty());
    }
}
