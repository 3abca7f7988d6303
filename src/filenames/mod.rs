//! Filename conventions of the Illumina `bcl2fastq` demultiplexer.

pub mod bcl2fastq;
pub mod lane_split;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub use bcl2fastq::{FastqFileName, SampleSheetResolver};
pub use lane_split::{lane_split_inputs, LaneSplitContext, LaneSplitKey};

/// Sample name and number `bcl2fastq` gives to reads it could not assign.
pub const UNDETERMINED: &str = "Undetermined";
pub const UNDETERMINED_S: usize = 0;

/// Read direction of a paired-end run. Deserializes from the same spellings
/// as `FromStr`.
#[derive(Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ReadDirection {
    R1,
    R2,
}

impl ReadDirection {
    /// All directions, in the order files are emitted.
    pub const ALL: [ReadDirection; 2] = [ReadDirection::R1, ReadDirection::R2];

    pub fn as_str(self) -> &'static str {
        match self {
            ReadDirection::R1 => "R1",
            ReadDirection::R2 => "R2",
        }
    }
}

impl fmt::Display for ReadDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown read direction '{0}', expected one of R1, R2, 1, 2")]
pub struct ParseReadDirectionError(String);

/// Accepts `R1`/`R2` as well as the bare read number.
impl FromStr for ReadDirection {
    type Err = ParseReadDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R1" | "1" => Ok(ReadDirection::R1),
            "R2" | "2" => Ok(ReadDirection::R2),
            _ => Err(ParseReadDirectionError(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ReadDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// `<prefix>_L<lane:03>_<direction>_001.fastq.gz`
pub fn fastq_filename(prefix: &str, lane: usize, direction: ReadDirection) -> String {
    format!("{}_L{:03}_{}_001.fastq.gz", prefix, lane, direction)
}

/// `Undetermined_S0_L<lane:03>_<direction>_001.fastq.gz`
pub fn undetermined_filename(lane: usize, direction: ReadDirection) -> String {
    fastq_filename(
        &format!("{}_S{}", UNDETERMINED, UNDETERMINED_S),
        lane,
        direction,
    )
}
