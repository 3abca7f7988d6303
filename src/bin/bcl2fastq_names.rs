// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Print the FASTQ files `bcl2fastq` will write for a sample sheet.

use anyhow::Result;
use bcl2fastq_names::sample_sheet::DEFAULT_PREAMBLE_LINES;
use bcl2fastq_names::{Preamble, SampleSheet, SampleSheetConfig, SampleSheetResolver};
use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::{info, LevelFilter};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(about = "List the FASTQ files bcl2fastq writes for a sample sheet")]
struct Args {
    /// Path to the sample sheet CSV
    sample_sheet: PathBuf,

    /// Number of lines before the sample table header
    #[clap(long, default_value_t = DEFAULT_PREAMBLE_LINES, conflicts_with = "data_section")]
    skip_rows: usize,

    /// Start reading after the [Data] line instead of a fixed line count
    #[clap(long)]
    data_section: bool,

    /// Print one prefix per sample instead of every FASTQ file
    #[clap(long)]
    prefixes: bool,

    /// Log debug messages
    #[clap(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(
            None,
            if args.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        )
        .init();

    let config = SampleSheetConfig {
        preamble: if args.data_section {
            Preamble::DataSection
        } else {
            Preamble::Lines(args.skip_rows)
        },
        ..Default::default()
    };

    info!("Processing: {}", args.sample_sheet.display());
    let sheet = SampleSheet::from_path(&args.sample_sheet, &config)?;
    let resolver = SampleSheetResolver::new(&sheet);

    let names: Vec<String> = if args.prefixes {
        resolver
            .unique_prefixes()
            .into_iter()
            .map(String::from)
            .collect()
    } else {
        resolver.all_filenames()
    };

    let mut out = BufWriter::new(std::io::stdout().lock());
    for name in &names {
        writeln!(out, "{}", name)?;
    }
    out.flush()?;
    Ok(())
}
