//! CSV-file roster source. Columns are positional; the header row is
//! skipped, not interpreted.

use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::debug;

use escalade_core::roster::WeeklyRow;
use escalade_core::rotation::RotationRow;
use escalade_ports::error::PortError;
use escalade_ports::inbound::RosterSource;

const WEEKLY_COLUMNS: usize = 6;
const ROTATION_COLUMNS: usize = 12;

/// One roster CSV on disk.
pub struct CsvRoster {
    path: PathBuf,
}

impl CsvRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn records(&self, columns: usize) -> Result<Vec<StringRecord>, PortError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| read_error(&self.path, e))?;
        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| read_error(&self.path, e))?;
            if record.len() != columns {
                return Err(PortError::Malformed(format!(
                    "{}: expected {columns} columns, found {} on line {}",
                    self.path.display(),
                    record.len(),
                    record
                        .position()
                        .map(|p| p.line().to_string())
                        .unwrap_or_else(|| "?".into()),
                )));
            }
            records.push(record);
        }
        debug!(path = %self.path.display(), rows = records.len(), "read roster");
        Ok(records)
    }
}

impl RosterSource for CsvRoster {
    fn weekly_rows(&self) -> Result<Vec<WeeklyRow>, PortError> {
        Ok(self
            .records(WEEKLY_COLUMNS)?
            .iter()
            .map(|r| WeeklyRow {
                escalation_level: r[0].to_string(),
                user_or_team: r[1].to_string(),
                kind: r[2].to_string(),
                day_of_week: r[3].to_string(),
                start_time: r[4].to_string(),
                end_time: r[5].to_string(),
            })
            .collect())
    }

    fn rotation_rows(&self) -> Result<Vec<RotationRow>, PortError> {
        Ok(self
            .records(ROTATION_COLUMNS)?
            .iter()
            .map(|r| RotationRow {
                user: r[0].to_string(),
                layer: r[1].to_string(),
                layer_name: r[2].to_string(),
                rotation_type: r[3].to_string(),
                shift_length: r[4].to_string(),
                shift_type: r[5].to_string(),
                handoff_day: r[6].to_string(),
                handoff_time: r[7].to_string(),
                restriction_start_day: r[8].to_string(),
                restriction_start_time: r[9].to_string(),
                restriction_end_day: r[10].to_string(),
                restriction_end_time: r[11].to_string(),
            })
            .collect())
    }
}

fn read_error(path: &Path, err: csv::Error) -> PortError {
    if err.is_io_error() {
        PortError::Io(format!("{}: {err}", path.display()))
    } else {
        PortError::Malformed(format!("{}: {err}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn weekly_rows_skip_the_header_and_keep_raw_text() {
        let file = csv_file(
            "escalation_level,user_or_team,type,day_of_week,start_time,end_time\n\
             1,alice@example.com,user,monday,9:00,17:00\n\
             2,oncall,team,weekends,17:00,24:00\n",
        );
        let rows = CsvRoster::new(file.path()).weekly_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user_or_team, "alice@example.com");
        assert_eq!(rows[0].start_time, "9:00");
        assert_eq!(rows[1].kind, "team");
        assert_eq!(rows[1].end_time, "24:00");
    }

    #[test]
    fn short_weekly_row_is_malformed() {
        let file = csv_file(
            "escalation_level,user_or_team,type,day_of_week,start_time,end_time\n\
             1,alice,user,monday,9:00\n",
        );
        let err = CsvRoster::new(file.path()).weekly_rows().unwrap_err();
        assert!(matches!(err, PortError::Malformed(_)));
    }

    #[test]
    fn rotation_rows_keep_empty_columns_empty() {
        let file = csv_file(
            "user,layer,layer_name,rotation_type,shift_length,shift_type,\
             handoff_day,handoff_time,restriction_start_day,restriction_start_time,\
             restriction_end_day,restriction_end_time\n\
             alice,1,Primary,weekly,,,monday,09:00,,,,\n",
        );
        let rows = CsvRoster::new(file.path()).rotation_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rotation_type, "weekly");
        assert_eq!(rows[0].shift_length, "");
        assert_eq!(rows[0].restriction_end_time, "");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CsvRoster::new("/nonexistent/roster.csv")
            .weekly_rows()
            .unwrap_err();
        assert!(matches!(err, PortError::Io(_)));
    }
}
