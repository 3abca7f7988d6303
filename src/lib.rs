// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Derive the FASTQ filenames `bcl2fastq` writes for an Illumina sample sheet.
//!
//! ```no_run
//! use bcl2fastq_names::{SampleSheet, SampleSheetConfig, SampleSheetResolver};
//!
//! let sheet = SampleSheet::from_path("SampleSheet.csv", &SampleSheetConfig::default())?;
//! for f in SampleSheetResolver::new(&sheet).all_filenames() {
//!     println!("{}", f);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod error;
pub mod filenames;
pub mod sample_index;
pub mod sample_sheet;

pub use error::SampleSheetError;
pub use filenames::bcl2fastq::{fastq_prefix, resolve_all_filenames, resolve_unique_prefixes};
pub use filenames::{ReadDirection, SampleSheetResolver};
pub use sample_index::SampleIndex;
pub use sample_sheet::{Preamble, SampleRecord, SampleSheet, SampleSheetConfig};
