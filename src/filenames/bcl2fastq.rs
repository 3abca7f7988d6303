use super::{fastq_filename, undetermined_filename, ReadDirection, UNDETERMINED, UNDETERMINED_S};
use crate::sample_index::SampleIndex;
use crate::sample_sheet::{SampleRecord, SampleSheet};
use itertools::Itertools;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ASCII classes only: bcl2fastq sample names are restricted to [A-Za-z0-9_-],
// and the pattern must not depend on regex's unicode features.
const BCL2FASTQ_PATTERN: &str =
    r"^([A-Za-z0-9_-]+)_S([0-9]+)_L([0-9]+)_([RI][12])_([0-9]+)\.fastq(\.gz)?$";

lazy_static! {
    static ref BCL2FASTQ_REGEX: Regex = Regex::new(BCL2FASTQ_PATTERN).unwrap();
}

/// Output path of a sample relative to the `bcl2fastq` output directory,
/// without the lane / read / chunk suffix.
///
/// The layout is `[<project>/][<sample_id>/]<display_name>_S<n>`, where the
/// `<sample_id>` directory only appears when the row has a `Sample_Name`.
/// Empty components are skipped and a trailing `/` on a component does not
/// produce a doubled separator.
pub fn fastq_prefix(record: &SampleRecord, sample_number: usize) -> String {
    let leaf = format!("{}_S{}", record.display_name(), sample_number);
    let id_dir = record
        .sample_name
        .as_ref()
        .map(|_| record.sample_id.as_str());

    [record.sample_project.as_deref(), id_dir, Some(leaf.as_str())]
        .iter()
        .flatten()
        .map(|s| s.trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .join("/")
}

/// Derives the FASTQ files `bcl2fastq` will write for a sample sheet.
///
/// Sample numbers and prefixes are computed once in `new` from the sheet
/// snapshot and are not shared between resolvers.
#[derive(Debug)]
pub struct SampleSheetResolver<'a> {
    sheet: &'a SampleSheet,
    index: SampleIndex,
    prefixes: Vec<String>,
}

impl<'a> SampleSheetResolver<'a> {
    pub fn new(sheet: &'a SampleSheet) -> SampleSheetResolver<'a> {
        let index = SampleIndex::from_ids(sheet.rows().iter().map(|r| r.sample_id.as_str()));

        let mut first_seen: HashMap<&str, &SampleRecord> = HashMap::new();
        let mut prefixes = Vec::with_capacity(sheet.len());
        for record in sheet.rows() {
            let first = *first_seen.entry(record.sample_id.as_str()).or_insert(record);
            if first.sample_name != record.sample_name
                || first.sample_project != record.sample_project
            {
                warn!(
                    "Sample_ID {} appears with different Sample_Name/Sample_Project values; \
                     its rows share S{} but will have different FASTQ prefixes",
                    record.sample_id,
                    index.get(&record.sample_id).unwrap_or_default()
                );
            }
            let s = index.get(&record.sample_id).unwrap_or_default();
            prefixes.push(fastq_prefix(record, s));
        }

        debug!(
            "resolved {} sample sheet rows: {} samples",
            sheet.len(),
            index.len()
        );

        SampleSheetResolver {
            sheet,
            index,
            prefixes,
        }
    }

    pub fn sheet(&self) -> &'a SampleSheet {
        self.sheet
    }

    pub fn sample_index(&self) -> &SampleIndex {
        &self.index
    }

    /// `S` number of the sample on row `row`, `None` past the last row.
    pub fn sample_number(&self, row: usize) -> Option<usize> {
        self.index.get(&self.sheet.rows().get(row)?.sample_id)
    }

    /// FASTQ prefix of each row, in sheet order.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Distinct prefixes in order of first occurrence: one entry per logical
    /// sample, however many lanes it was split across.
    pub fn unique_prefixes(&self) -> Vec<&str> {
        self.prefixes.iter().map(String::as_str).unique().collect()
    }

    /// Distinct lanes in order of first occurrence.
    pub fn lanes(&self) -> Vec<usize> {
        self.sheet.rows().iter().map(|r| r.lane).unique().collect()
    }

    /// Every FASTQ file of the run. First the sample files, in sheet row
    /// order with R1 before R2, then one Undetermined R1/R2 pair per lane in
    /// the order of `lanes()`.
    pub fn all_filenames(&self) -> Vec<String> {
        let lanes = self.lanes();
        let mut res = Vec::with_capacity(2 * (self.sheet.len() + lanes.len()));

        for (record, prefix) in self.sheet.rows().iter().zip(&self.prefixes) {
            for direction in ReadDirection::ALL {
                res.push(fastq_filename(prefix, record.lane, direction));
            }
        }

        for lane in lanes {
            for direction in ReadDirection::ALL {
                res.push(undetermined_filename(lane, direction));
            }
        }
        res
    }

    /// Key identifying the sample on row `row` independently of its lane:
    /// `<sample_id>[/<sample_name>]<n>`. `None` past the last row.
    pub fn join_key(&self, row: usize) -> Option<String> {
        let record = self.sheet.rows().get(row)?;
        let name = record
            .sample_name
            .as_ref()
            .map(|n| format!("/{}", n))
            .unwrap_or_default();
        Some(format!(
            "{}{}{}",
            record.sample_id,
            name,
            self.sample_number(row)?
        ))
    }
}

/// All FASTQ filenames for `sheet`; see `SampleSheetResolver::all_filenames`.
pub fn resolve_all_filenames(sheet: &SampleSheet) -> Vec<String> {
    SampleSheetResolver::new(sheet).all_filenames()
}

/// Distinct FASTQ prefixes for `sheet`; see
/// `SampleSheetResolver::unique_prefixes`.
pub fn resolve_unique_prefixes(sheet: &SampleSheet) -> Vec<String> {
    SampleSheetResolver::new(sheet)
        .unique_prefixes()
        .into_iter()
        .map(String::from)
        .collect()
}

/// A parsed representation of a FASTQ file produced by
/// Illumina's bcl2fastq tool.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FastqFileName {
    pub sample: String,
    pub s: usize,
    pub lane: usize,
    pub read: String,
    pub chunk: usize,
    pub path: PathBuf,
}

/// Parse the filename to get the sample, S number, lane, read and chunk.
/// We expect a filename of the form
/// <path>/<sample>_S1_L001_R1_001.fastq.gz
impl FastqFileName {
    pub fn new(path: impl AsRef<Path>) -> Option<FastqFileName> {
        let filename = path.as_ref().file_name()?.to_str()?;
        let cap = BCL2FASTQ_REGEX.captures(filename)?;

        Some(FastqFileName {
            sample: cap.get(1)?.as_str().to_string(),
            s: cap.get(2)?.as_str().parse().ok()?,
            lane: cap.get(3)?.as_str().parse().ok()?,
            read: cap.get(4)?.as_str().to_string(),
            chunk: cap.get(5)?.as_str().parse().ok()?,
            path: path.as_ref().into(),
        })
    }

    pub fn is_undetermined(&self) -> bool {
        self.sample == UNDETERMINED && self.s == UNDETERMINED_S
    }

    /// `None` for index reads.
    pub fn direction(&self) -> Option<ReadDirection> {
        self.read.parse().ok()
    }
}
