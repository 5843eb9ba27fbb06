// JSON Lines codec for timestamped sample fixtures
use crate::domain::sample::Timestamped;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization failed: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Write one JSON object per sample, each carrying its `timestamp` field.
pub fn write_jsonl<S, W>(mut writer: W, samples: &[Timestamped<S>]) -> Result<(), JsonlError>
where
    S: Serialize,
    W: Write,
{
    for entry in samples {
        serde_json::to_writer(&mut writer, entry).map_err(JsonlError::Encode)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read samples back in file order. Blank lines are skipped.
pub fn read_jsonl<S, R>(reader: R) -> Result<Vec<Timestamped<S>>, JsonlError>
where
    S: DeserializeOwned,
    R: BufRead,
{
    let mut samples = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).map_err(|source| JsonlError::Parse {
            line: index + 1,
            source,
        })?;
        samples.push(entry);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::noise::RngNoise;
    use crate::application::sample_source::{EnvironmentalModel, SampleSource};
    use crate::domain::sample::EnvironmentalSample;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_lines_carry_timestamp_and_camel_case_fields() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let samples = vec![Timestamped::new(
            at,
            EnvironmentalSample {
                temp: 25.0,
                humidity: 65.0,
                wind_speed: 12.0,
                pressure: 1013.0,
            },
        )];

        let mut out = Vec::new();
        write_jsonl(&mut out, &samples).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["timestamp"], "2024-05-01T12:00:00Z");
        assert_eq!(value["windSpeed"], 12.0);

        let back: Vec<Timestamped<EnvironmentalSample>> = read_jsonl(text.as_bytes()).unwrap();
        assert_eq!(back, samples);
    }

    #[test]
    fn test_generated_window_reads_back_bit_for_bit() {
        let model = EnvironmentalModel::default();
        let mut noise = RngNoise::seeded(2024);
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let samples: Vec<Timestamped<EnvironmentalSample>> = (0..2000u64)
            .map(|tick| {
                let at = start + Duration::milliseconds(5000 * tick as i64 + 137);
                Timestamped::new(at, model.next(None, tick, &mut noise).unwrap())
            })
            .collect();

        let mut out = Vec::new();
        write_jsonl(&mut out, &samples).unwrap();
        let back: Vec<Timestamped<EnvironmentalSample>> = read_jsonl(out.as_slice()).unwrap();

        assert_eq!(back.len(), samples.len());
        for (read, written) in back.iter().zip(&samples) {
            assert_eq!(read.timestamp, written.timestamp);
            assert_eq!(read.sample.temp.to_bits(), written.sample.temp.to_bits());
            assert_eq!(read.sample.humidity.to_bits(), written.sample.humidity.to_bits());
            assert_eq!(read.sample.wind_speed.to_bits(), written.sample.wind_speed.to_bits());
            assert_eq!(read.sample.pressure.to_bits(), written.sample.pressure.to_bits());
        }
    }

    #[test]
    fn test_fixture_with_blank_lines() {
        let fixture = "\
{\"timestamp\":\"2024-05-01T12:00:00Z\",\"temp\":25.0,\"humidity\":65.0,\"windSpeed\":12.0,\"pressure\":1013.0}

{\"timestamp\":\"2024-05-01T12:00:05Z\",\"temp\":25.4,\"humidity\":64.0,\"windSpeed\":11.5,\"pressure\":1012.8}
";
        let samples: Vec<Timestamped<EnvironmentalSample>> = read_jsonl(fixture.as_bytes()).unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples[0].timestamp < samples[1].timestamp);
        assert_eq!(samples[1].sample.temp, 25.4);
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let fixture = "{\"timestamp\":\"2024-05-01T12:00:00Z\",\"temp\":1.0,\"humidity\":1.0,\"windSpeed\":1.0,\"pressure\":1.0}\nnot json\n";
        let err = read_jsonl::<EnvironmentalSample, _>(fixture.as_bytes()).unwrap_err();
        assert!(matches!(err, JsonlError::Parse { line: 2, .. }));
    }
}
