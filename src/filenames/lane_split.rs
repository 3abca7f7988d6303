//! Find the per-lane FASTQ files that make up one logical sample.
//!
//! Workflows that merge lanes describe the merged file by its project,
//! sample group, sample and `S` number, and need the list of lane-split
//! files `bcl2fastq` wrote for it. The filenames are rebuilt here from those
//! caller-supplied fragments rather than from `fastq_prefix`, so both must
//! follow the same layout for the results to agree.

use super::bcl2fastq::SampleSheetResolver;
use super::{fastq_filename, ReadDirection};
use crate::error::SampleSheetError;
use crate::sample_sheet::{SampleSheet, SampleSheetConfig};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location of a run's sample sheet and demultiplexed output.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Debug)]
pub struct LaneSplitContext {
    /// Root every other path is relative to
    pub root: PathBuf,
    /// Directory holding `<run>_ukd.csv` sample sheets
    pub sample_sheet_dir: PathBuf,
    /// Directory holding one `bcl2fastq` output folder per run
    pub demultiplex_dir: PathBuf,
    pub run: String,
}

impl LaneSplitContext {
    pub fn sample_sheet_path(&self) -> PathBuf {
        self.root
            .join(&self.sample_sheet_dir)
            .join(format!("{}_ukd.csv", self.run))
    }

    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.root
            .join(&self.demultiplex_dir)
            .join(&self.run)
            .join(project)
    }
}

/// Identifies one merged FASTQ file. `sample_group`, `sample` and
/// `sample_index` are concatenated verbatim, so for a row with a
/// `Sample_Name` the `/` separator belongs at the start of `sample`.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Debug)]
pub struct LaneSplitKey {
    pub project: String,
    pub sample_group: String,
    pub sample: String,
    pub sample_index: String,
    pub direction: ReadDirection,
}

impl LaneSplitKey {
    /// Key comparable with `SampleSheetResolver::join_key`.
    pub fn join_key(&self) -> String {
        format!("{}{}{}", self.sample_group, self.sample, self.sample_index)
    }
}

impl<'a> SampleSheetResolver<'a> {
    /// The lane-split files for `key`, one per distinct lane the sample
    /// occupies, in order of first occurrence:
    /// `<project_dir>/<sample_group><sample>_S<n>_L<lane:03>_<direction>_001.fastq.gz`.
    pub fn lane_split_filenames(
        &self,
        key: &LaneSplitKey,
        ctx: &LaneSplitContext,
    ) -> Result<Vec<String>, SampleSheetError> {
        let wanted = key.join_key();
        let rows: Vec<usize> = (0..self.sheet().len())
            .filter(|&row| self.join_key(row).as_deref() == Some(wanted.as_str()))
            .collect();

        if rows.is_empty() {
            return Err(SampleSheetError::UnresolvedSampleKey { key: wanted });
        }

        let prefixes: Vec<&str> = rows
            .iter()
            .map(|&row| self.prefixes()[row].as_str())
            .unique()
            .collect();
        if prefixes.len() > 1 {
            return Err(SampleSheetError::AmbiguousJoin {
                key: wanted,
                prefixes: prefixes.into_iter().map(String::from).collect(),
            });
        }

        let lanes: Vec<usize> = rows
            .iter()
            .map(|&row| self.sheet().rows()[row].lane)
            .unique()
            .collect();
        debug!("sample key {} spans lanes {:?}", wanted, lanes);

        let project_dir = ctx.project_dir(&key.project).display().to_string();
        let stem = format!(
            "{}/{}{}_S{}",
            project_dir.trim_end_matches('/'),
            key.sample_group,
            key.sample,
            key.sample_index
        );
        Ok(lanes
            .into_iter()
            .map(|lane| fastq_filename(&stem, lane, key.direction))
            .collect())
    }
}

/// Load the sample sheet of `ctx.run` and list the lane-split files for `key`.
pub fn lane_split_inputs(
    key: &LaneSplitKey,
    ctx: &LaneSplitContext,
    config: &SampleSheetConfig,
) -> anyhow::Result<Vec<String>> {
    let sheet = SampleSheet::from_path(ctx.sample_sheet_path(), config)?;
    Ok(SampleSheetResolver::new(&sheet).lane_split_filenames(key, ctx)?)
}
