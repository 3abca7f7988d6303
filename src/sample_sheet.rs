// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Load an Illumina sample sheet into an immutable table of `SampleRecord`s.
//!
//! Identifiers are sanitized the way `bcl2fastq` sanitizes them when it
//! writes output files: every `-` becomes `_`.

use crate::error::SampleSheetError;
use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

pub const SAMPLE_ID: &str = "Sample_ID";
pub const SAMPLE_NAME: &str = "Sample_Name";
pub const SAMPLE_PROJECT: &str = "Sample_Project";
pub const LANE: &str = "Lane";

/// Number of lines preceding the `[Data]` table in the standard sample sheet
/// layout, counting the `[Data]` marker itself.
pub const DEFAULT_PREAMBLE_LINES: usize = 21;

const DATA_SECTION: &str = "[Data]";

/// How to find the start of the sample table.
#[derive(Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Preamble {
    /// Skip exactly this many lines before the header row
    Lines(usize),
    /// Skip everything up to and including the `[Data]` line
    DataSection,
}

impl Default for Preamble {
    fn default() -> Self {
        Preamble::Lines(DEFAULT_PREAMBLE_LINES)
    }
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Debug)]
#[serde(default)]
pub struct SampleSheetConfig {
    pub preamble: Preamble,
    /// Field delimiter, as an ASCII byte
    pub delimiter: u8,
}

impl Default for SampleSheetConfig {
    fn default() -> Self {
        SampleSheetConfig {
            preamble: Preamble::default(),
            delimiter: b',',
        }
    }
}

/// Replace every hyphen with an underscore, as `bcl2fastq` does for output
/// filenames.
pub fn normalize_identifier(value: &str) -> String {
    value.replace('-', "_")
}

/// One row of the sample table.
///
/// `sample_name` and `sample_project` are `None` when the cell is absent; a
/// present value is never turned into `None` by normalization, even if empty.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Debug)]
pub struct SampleRecord {
    pub sample_id: String,
    pub sample_name: Option<String>,
    pub sample_project: Option<String>,
    pub lane: usize,
}

impl SampleRecord {
    pub fn new(
        sample_id: impl Into<String>,
        sample_name: Option<&str>,
        sample_project: Option<&str>,
        lane: usize,
    ) -> SampleRecord {
        SampleRecord {
            sample_id: sample_id.into(),
            sample_name: sample_name.map(String::from),
            sample_project: sample_project.map(String::from),
            lane,
        }
    }

    /// Apply `normalize_identifier` to the id, name and project.
    pub fn normalized(&self) -> SampleRecord {
        SampleRecord {
            sample_id: normalize_identifier(&self.sample_id),
            sample_name: self.sample_name.as_deref().map(normalize_identifier),
            sample_project: self.sample_project.as_deref().map(normalize_identifier),
            lane: self.lane,
        }
    }

    /// The name used in the final filename component: the sample name if
    /// there is one, otherwise the sample id.
    pub fn display_name(&self) -> &str {
        self.sample_name.as_deref().unwrap_or(&self.sample_id)
    }
}

/// A normalized snapshot of a sample sheet. Rows keep the order of the file.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct SampleSheet {
    rows: Vec<SampleRecord>,
}

impl SampleSheet {
    /// Build a sheet from in-memory records. Errors report the 1-based
    /// position of the record in `records` as the line.
    pub fn from_records(records: Vec<SampleRecord>) -> Result<SampleSheet, SampleSheetError> {
        let mut rows = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let line = i as u64 + 1;
            if record.sample_id.is_empty() {
                return Err(SampleSheetError::MalformedField {
                    line,
                    column: SAMPLE_ID,
                    value: record.sample_id,
                    reason: "a sample id is required",
                });
            }
            if record.lane == 0 {
                return Err(SampleSheetError::MalformedField {
                    line,
                    column: LANE,
                    value: record.lane.to_string(),
                    reason: "lanes are numbered from 1",
                });
            }
            rows.push(record.normalized());
        }
        Ok(SampleSheet { rows })
    }

    /// Parse a sample sheet, skipping the preamble described by `config`.
    pub fn from_reader(
        mut reader: impl Read,
        config: &SampleSheetConfig,
    ) -> Result<SampleSheet, SampleSheetError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let text = text.trim_start_matches('\u{feff}');

        let (skipped, body) = split_preamble(text, config)?;

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(config.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let headers = rdr.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(SampleSheetError::MissingColumn { column: name })
        };
        let id_col = column(SAMPLE_ID)?;
        let name_col = column(SAMPLE_NAME)?;
        let project_col = column(SAMPLE_PROJECT)?;
        let lane_col = column(LANE)?;

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            let line = skipped + record.position().map_or(0, |p| p.line());
            let cell = |col: usize| record.get(col).filter(|v| !v.is_empty());

            let sample_id = cell(id_col).ok_or_else(|| SampleSheetError::MalformedField {
                line,
                column: SAMPLE_ID,
                value: String::new(),
                reason: "a sample id is required",
            })?;
            let lane = parse_lane(cell(lane_col), line)?;

            rows.push(
                SampleRecord::new(sample_id, cell(name_col), cell(project_col), lane).normalized(),
            );
        }

        let sheet = SampleSheet { rows };
        debug!(
            "loaded sample sheet: {} rows after skipping {} preamble lines",
            sheet.len(),
            skipped
        );
        Ok(sheet)
    }

    pub fn from_path(
        path: impl AsRef<Path>,
        config: &SampleSheetConfig,
    ) -> anyhow::Result<SampleSheet> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Unable to open sample sheet {}", path.display()))?;
        SampleSheet::from_reader(std::io::BufReader::new(file), config)
            .with_context(|| format!("Unable to parse sample sheet {}", path.display()))
    }

    pub fn rows(&self) -> &[SampleRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn parse_lane(value: Option<&str>, line: u64) -> Result<usize, SampleSheetError> {
    let malformed = |value: &str, reason| SampleSheetError::MalformedField {
        line,
        column: LANE,
        value: value.to_string(),
        reason,
    };
    let value = value.ok_or_else(|| malformed("", "a lane is required"))?;
    match value.parse::<usize>() {
        Ok(0) => Err(malformed(value, "lanes are numbered from 1")),
        Ok(lane) => Ok(lane),
        Err(_) => Err(malformed(value, "expected a positive integer")),
    }
}

/// Split `text` into the number of skipped lines and the remaining table.
fn split_preamble<'a>(
    text: &'a str,
    config: &SampleSheetConfig,
) -> Result<(u64, &'a str), SampleSheetError> {
    let mut offset = 0;
    for (i, line) in text.split_inclusive('\n').enumerate() {
        let done = match config.preamble {
            Preamble::Lines(n) => i == n,
            Preamble::DataSection => false,
        };
        if done {
            return Ok((i as u64, &text[offset..]));
        }
        offset += line.len();
        if config.preamble == Preamble::DataSection {
            let first_cell = line.split(config.delimiter as char).next().unwrap_or("");
            if first_cell.trim() == DATA_SECTION {
                return Ok((i as u64 + 1, &text[offset..]));
            }
        }
    }
    match config.preamble {
        Preamble::Lines(n) => Ok((n as u64, "")),
        Preamble::DataSection => Err(SampleSheetError::MissingDataSection),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn data_only() -> SampleSheetConfig {
        SampleSheetConfig {
            preamble: Preamble::Lines(0),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("S-1"), "S_1");
        assert_eq!(normalize_identifier("a-b-c_d"), "a_b_c_d");
        assert_eq!(normalize_identifier(""), "");
    }

    #[test]
    fn test_normalized_keeps_absent_and_empty_apart() {
        let rec = SampleRecord::new("A-1", None, Some(""), 2).normalized();
        assert_eq!(rec.sample_id, "A_1");
        assert_eq!(rec.sample_name, None);
        assert_eq!(rec.sample_project, Some(String::new()));
        assert_eq!(rec.display_name(), "A_1");
    }

    #[test]
    fn test_from_records_rejects_lane_zero() {
        let err = SampleSheet::from_records(vec![
            SampleRecord::new("A", None, None, 1),
            SampleRecord::new("B", None, None, 0),
        ])
        .unwrap_err();
        match err {
            SampleSheetError::MalformedField { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, LANE);
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn test_parse_data_table() {
        let csv = "\
Lane,Sample_ID,Sample_Name,Sample_Plate,Sample_Project,index
1,S-1,,,Proj-A,ACGT
2,S-2,heart-1k,,,TTTT
,,,,,
";
        let sheet = SampleSheet::from_reader(csv.as_bytes(), &data_only()).unwrap();
        assert_eq!(
            sheet.rows(),
            &[
                SampleRecord::new("S_1", None, Some("Proj_A"), 1),
                SampleRecord::new("S_2", Some("heart_1k"), None, 2),
            ]
        );
    }

    #[test]
    fn test_data_section_preamble() {
        let csv = "\
[Header],,
Date,2018-06-14,
[Reads],,
151,,
[Data],,
Lane,Sample_ID,Sample_Name,Sample_Project
3,X,,P
";
        let config = SampleSheetConfig {
            preamble: Preamble::DataSection,
            ..Default::default()
        };
        let sheet = SampleSheet::from_reader(csv.as_bytes(), &config).unwrap();
        assert_eq!(sheet.rows(), &[SampleRecord::new("X", None, Some("P"), 3)]);

        let err = SampleSheet::from_reader("Lane,Sample_ID\n".as_bytes(), &config).unwrap_err();
        assert!(matches!(err, SampleSheetError::MissingDataSection));
    }

    #[test]
    fn test_missing_column() {
        let csv = "Sample_ID,Sample_Name,Sample_Project\nA,,\n";
        let err = SampleSheet::from_reader(csv.as_bytes(), &data_only()).unwrap_err();
        assert!(err.is_malformed_manifest());
        assert!(matches!(err, SampleSheetError::MissingColumn { column: LANE }));
    }

    #[test]
    fn test_bad_lane_reports_line() {
        let csv = "\
[Data]
Lane,Sample_ID,Sample_Name,Sample_Project
1,A,,
x,B,,
";
        let config = SampleSheetConfig {
            preamble: Preamble::Lines(1),
            ..Default::default()
        };
        let err = SampleSheet::from_reader(csv.as_bytes(), &config).unwrap_err();
        match err {
            SampleSheetError::MalformedField {
                line,
                column,
                ref value,
                ..
            } => {
                assert_eq!(line, 4);
                assert_eq!(column, LANE);
                assert_eq!(value, "x");
            }
            ref e => panic!("unexpected error {:?}", e),
        }
        assert!(err.to_string().contains("line 4"));
    }

    #[test]
    fn test_missing_lane_and_id() {
        let csv = "Lane,Sample_ID,Sample_Name,Sample_Project\n,A,,\n";
        let err = SampleSheet::from_reader(csv.as_bytes(), &data_only()).unwrap_err();
        assert!(matches!(err, SampleSheetError::MalformedField { column: LANE, line: 2, .. }));

        let csv = "Lane,Sample_ID,Sample_Name,Sample_Project\n1,,N,\n";
        let err = SampleSheet::from_reader(csv.as_bytes(), &data_only()).unwrap_err();
        assert!(matches!(err, SampleSheetError::MalformedField { column: SAMPLE_ID, .. }));
    }

    #[test]
    fn test_load_fixture() -> anyhow::Result<()> {
        let sheet = SampleSheet::from_path(
            "test/samplesheets/180614_SN737_0438_BCC7MCACXX_ukd.csv",
            &SampleSheetConfig::default(),
        )?;
        assert_eq!(sheet.len(), 5);
        assert_eq!(
            sheet.rows()[0],
            SampleRecord::new("CLIS_23", Some("274"), Some("AG_Remke"), 1)
        );
        assert_eq!(sheet.rows()[4], SampleRecord::new("ctrl_1", None, None, 2));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = SampleSheet::from_path("test/samplesheets/nope.csv", &SampleSheetConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn test_config_from_json() {
        let config: SampleSheetConfig =
            serde_json::from_str(r#"{"preamble": "DataSection"}"#).unwrap();
        assert_eq!(config.preamble, Preamble::DataSection);
        assert_eq!(config.delimiter, b',');

        let config: SampleSheetConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SampleSheetConfig::default());
    }

    proptest! {
        #[test]
        fn prop_test_normalize_idempotent(
            id in "[A-Za-z0-9_-]{1,12}",
            name in proptest::option::of("[A-Za-z0-9_-]{0,12}"),
            project in proptest::option::of("[A-Za-z0-9_-]{0,12}"),
            lane in 1usize..9,
        ) {
            let rec = SampleRecord::new(id, name.as_deref(), project.as_deref(), lane);
            let once = rec.normalized();
            prop_assert!(!once.sample_id.contains('-'));
            prop_assert_eq!(once.sample_name.is_some(), rec.sample_name.is_some());
            prop_assert_eq!(once.sample_project.is_some(), rec.sample_project.is_some());
            prop_assert_eq!(once.normalized(), once);
        }
    }
}
