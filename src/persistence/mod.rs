//! Tabular persistence for generated series.
//!
//! Each series is written as a header row of field names followed by one
//! row per record, in day order. Reals are written at the two-decimal
//! precision they are generated with, so reading a table back yields the
//! exact values that were written.

pub mod csv;

use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::OutputConfig;
use crate::error::{SimError, SimResult};
use crate::series::{BioRecord, Dataset, SolarRecord};

/// A record that maps onto one table row.
pub trait TableRow: Sized {
    /// Column names, in write order.
    const HEADER: &'static [&'static str];

    /// Render the record as one field per column.
    fn to_fields(&self) -> Vec<String>;

    /// Rebuild the record from one field per column.
    ///
    /// # Errors
    ///
    /// Returns a description of the first field that does not parse.
    fn from_fields(fields: &[String]) -> Result<Self, String>;
}

impl TableRow for SolarRecord {
    const HEADER: &'static [&'static str] = &[
        "date",
        "location",
        "sunrise_time",
        "sunset_time",
        "cloud_cover_pct",
        "uv_index",
        "sunlight_hours",
    ];

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.location.clone(),
            self.sunrise_time.clone(),
            self.sunset_time.clone(),
            format!("{:.2}", self.cloud_cover_pct),
            self.uv_index.to_string(),
            format!("{:.2}", self.sunlight_hours),
        ]
    }

    fn from_fields(fields: &[String]) -> Result<Self, String> {
        Ok(Self {
            date: parse_date(&fields[0])?,
            location: fields[1].clone(),
            sunrise_time: fields[2].clone(),
            sunset_time: fields[3].clone(),
            cloud_cover_pct: parse_field("cloud_cover_pct", &fields[4])?,
            uv_index: parse_field("uv_index", &fields[5])?,
            sunlight_hours: parse_field("sunlight_hours", &fields[6])?,
        })
    }
}

impl TableRow for BioRecord {
    const HEADER: &'static [&'static str] = &[
        "date",
        "user_id",
        "sleep_hours",
        "step_count",
        "mood_score",
        "energy_level",
    ];

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.user_id.clone(),
            format!("{:.2}", self.sleep_hours),
            self.step_count.to_string(),
            format!("{:.2}", self.mood_score),
            self.energy_level.to_string(),
        ]
    }

    fn from_fields(fields: &[String]) -> Result<Self, String> {
        Ok(Self {
            date: parse_date(&fields[0])?,
            user_id: fields[1].clone(),
            sleep_hours: parse_field("sleep_hours", &fields[2])?,
            step_count: parse_field("step_count", &fields[3])?,
            mood_score: parse_field("mood_score", &fields[4])?,
            energy_level: parse_field("energy_level", &fields[5])?,
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("date '{raw}': {e}"))
}

fn parse_field<T>(name: &str, raw: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| format!("{name} '{raw}': {e}"))
}

/// Write a header and one row per record. Returns the number of rows.
///
/// # Errors
///
/// Returns `Serialization` if a field holds a line break (nothing is
/// written past the previous row); `Io` if the writer fails.
pub fn write_table<W: Write, T: TableRow>(mut writer: W, rows: &[T]) -> SimResult<usize> {
    writeln!(writer, "{}", csv::encode_line(T::HEADER))?;
    for (index, row) in rows.iter().enumerate() {
        let fields = row.to_fields();
        if let Some(column) = fields
            .iter()
            .position(|field| csv::has_line_break(field))
            .map(|i| T::HEADER[i])
        {
            return Err(SimError::serialization(format!(
                "row {}: {column} contains a line break",
                index + 1
            )));
        }
        writeln!(writer, "{}", csv::encode_line(&fields))?;
    }
    writer.flush()?;
    Ok(rows.len())
}

/// Read a table written by [`write_table`].
///
/// # Errors
///
/// Returns `Serialization` naming the 1-based line on a header mismatch,
/// wrong field count or unparseable field; `Io` if reading fails.
pub fn read_table<R: BufRead, T: TableRow>(reader: R) -> SimResult<Vec<T>> {
    let mut lines = reader.lines();

    let header = lines
        .next()
        .transpose()?
        .ok_or_else(|| SimError::serialization("empty table: missing header"))?;
    let columns = csv::split_line(header.trim_end_matches('\r'))
        .map_err(|e| SimError::serialization(format!("line 1: {e}")))?;
    if columns != T::HEADER {
        return Err(SimError::serialization(format!(
            "line 1: expected header {:?}, found {columns:?}",
            T::HEADER
        )));
    }

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let line = line?;
        let line_no = index + 2;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let fields = csv::split_line(line)
            .map_err(|e| SimError::serialization(format!("line {line_no}: {e}")))?;
        if fields.len() != T::HEADER.len() {
            return Err(SimError::serialization(format!(
                "line {line_no}: expected {} fields, found {}",
                T::HEADER.len(),
                fields.len()
            )));
        }
        let row = T::from_fields(&fields)
            .map_err(|e| SimError::serialization(format!("line {line_no}: {e}")))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Write the solar series as a table.
///
/// # Errors
///
/// See [`write_table`].
pub fn write_solar_csv<W: Write>(writer: W, records: &[SolarRecord]) -> SimResult<usize> {
    write_table(writer, records)
}

/// Write the bio series as a table.
///
/// # Errors
///
/// See [`write_table`].
pub fn write_bio_csv<W: Write>(writer: W, records: &[BioRecord]) -> SimResult<usize> {
    write_table(writer, records)
}

/// Read a solar table.
///
/// # Errors
///
/// See [`read_table`].
pub fn read_solar_csv<R: BufRead>(reader: R) -> SimResult<Vec<SolarRecord>> {
    read_table(reader)
}

/// Read a bio table.
///
/// # Errors
///
/// See [`read_table`].
pub fn read_bio_csv<R: BufRead>(reader: R) -> SimResult<Vec<BioRecord>> {
    read_table(reader)
}

/// Outcome of writing a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// Solar table location.
    pub solar_path: PathBuf,
    /// Solar rows written.
    pub solar_rows: usize,
    /// Bio table location.
    pub bio_path: PathBuf,
    /// Bio rows written.
    pub bio_rows: usize,
}

/// Write both series into the configured directory, creating it if needed.
///
/// # Errors
///
/// Returns `Io` if the directory or either file cannot be written.
pub fn write_dataset(dataset: &Dataset, output: &OutputConfig) -> SimResult<WriteReport> {
    fs::create_dir_all(&output.directory)?;

    let solar_path = output.solar_path();
    let solar_rows = write_solar_csv(create(&solar_path)?, &dataset.solar)?;
    info!(path = %solar_path.display(), rows = solar_rows, "wrote solar table");

    let bio_path = output.bio_path();
    let bio_rows = write_bio_csv(create(&bio_path)?, &dataset.bio)?;
    info!(path = %bio_path.display(), rows = bio_rows, "wrote bio table");

    Ok(WriteReport {
        solar_path,
        solar_rows,
        bio_path,
        bio_rows,
    })
}

/// Read both series back from the configured directory.
///
/// # Errors
///
/// Returns `Io` if either file cannot be opened, `Serialization` if either
/// does not parse.
pub fn read_dataset(output: &OutputConfig) -> SimResult<(Vec<SolarRecord>, Vec<BioRecord>)> {
    let solar = read_solar_csv(open(&output.solar_path())?)?;
    let bio = read_bio_csv(open(&output.bio_path())?)?;
    debug!(solar = solar.len(), bio = bio.len(), "read dataset tables");
    Ok((solar, bio))
}

fn create(path: &Path) -> SimResult<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

fn open(path: &Path) -> SimResult<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn dataset(days: usize) -> Dataset {
        let end = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        Dataset::from_seed(42, days, end, "usr_001").unwrap()
    }

    #[test]
    fn test_solar_header_and_quoting() {
        let data = dataset(2);
        let mut buf = Vec::new();
        let rows = write_solar_csv(&mut buf, &data.solar).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,location,sunrise_time,sunset_time,cloud_cover_pct,uv_index,sunlight_hours"
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("2024-11-29,\"New York, USA\",06:30,18:00,"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_bio_header() {
        let data = dataset(1);
        let mut buf = Vec::new();
        write_bio_csv(&mut buf, &data.bio).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with(
            "date,user_id,sleep_hours,step_count,mood_score,energy_level\n2024-11-30,usr_001,"
        ));
        assert!(text.trim_end().ends_with(",8.00,8"));
    }

    #[test]
    fn test_solar_roundtrip_exact() {
        let data = dataset(60);
        let mut buf = Vec::new();
        write_solar_csv(&mut buf, &data.solar).unwrap();
        let back = read_solar_csv(Cursor::new(buf)).unwrap();
        assert_eq!(back, data.solar);
    }

    #[test]
    fn test_bio_roundtrip_exact() {
        let data = dataset(60);
        let mut buf = Vec::new();
        write_bio_csv(&mut buf, &data.bio).unwrap();
        let back = read_bio_csv(Cursor::new(buf)).unwrap();
        assert_eq!(back, data.bio);
    }

    #[test]
    fn test_write_refuses_line_break_in_field() {
        let data = dataset(3);
        let mut bio = data.bio.clone();
        bio[1].user_id = "usr\n001".to_string();

        let mut buf = Vec::new();
        let err = write_bio_csv(&mut buf, &bio).unwrap_err();
        match err {
            SimError::Serialization(msg) => {
                assert!(msg.contains("row 2"));
                assert!(msg.contains("user_id"));
            }
            other => panic!("unexpected error: {other}"),
        }

        // Only the header and the first row reached the writer.
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(read_bio_csv(Cursor::new(text)).unwrap(), data.bio[..1]);
    }

    #[test]
    fn test_read_rejects_wrong_header() {
        let input = "date,user_id\n2024-01-01,usr_001\n";
        let err = read_bio_csv(Cursor::new(input)).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_read_rejects_empty_input() {
        let err = read_solar_csv(Cursor::new("")).unwrap_err();
        assert!(err.to_string().contains("missing header"));
    }

    #[test]
    fn test_read_rejects_field_count() {
        let input = "date,user_id,sleep_hours,step_count,mood_score,energy_level\n\
                     2024-01-01,usr_001,7.5,6000\n";
        let err = read_bio_csv(Cursor::new(input)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"));
        assert!(msg.contains("expected 6 fields"));
    }

    #[test]
    fn test_read_rejects_bad_number() {
        let input = "date,user_id,sleep_hours,step_count,mood_score,energy_level\n\
                     2024-01-01,usr_001,7.5,-3,8.00,8\n";
        let err = read_bio_csv(Cursor::new(input)).unwrap_err();
        assert!(err.to_string().contains("step_count"));
    }

    #[test]
    fn test_read_rejects_bad_date() {
        let input = "date,user_id,sleep_hours,step_count,mood_score,energy_level\n\
                     2024-02-30,usr_001,7.5,6000,8.00,8\n";
        let err = read_bio_csv(Cursor::new(input)).unwrap_err();
        assert!(err.to_string().contains("date"));
    }

    #[test]
    fn test_read_tolerates_crlf_and_blank_lines() {
        let input = "date,user_id,sleep_hours,step_count,mood_score,energy_level\r\n\
                     2024-01-01,usr_001,7.50,6000,8.00,8\r\n\r\n";
        let rows = read_bio_csv(Cursor::new(input)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].step_count, 6000);
    }

    #[test]
    fn test_write_and_read_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            directory: dir.path().join("nested").join("raw"),
            ..OutputConfig::default()
        };
        let data = dataset(30);

        let report = write_dataset(&data, &output).unwrap();
        assert_eq!(report.solar_rows, 30);
        assert_eq!(report.bio_rows, 30);
        assert!(report.solar_path.ends_with("solar_history.csv"));
        assert!(report.bio_path.exists());

        let (solar, bio) = read_dataset(&output).unwrap();
        assert_eq!(solar, data.solar);
        assert_eq!(bio, data.bio);
    }

    #[test]
    fn test_read_dataset_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            directory: dir.path().to_path_buf(),
            ..OutputConfig::default()
        };
        assert!(matches!(read_dataset(&output), Err(SimError::Io(_))));
    }
}
