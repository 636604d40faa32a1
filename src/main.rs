// This is the main file of magqc and where execution starts. It mainly handles the CLI and then
// calls into other files to run whichever subcommand the user chose.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use std::path::PathBuf;
use clap::{Parser, Subcommand, crate_version};

mod assembly_stats;
mod classify;
mod decimal;
mod layout;
mod log;
mod metrics;
mod misc;
mod naming;
mod quality_report;
mod record;
mod report;
mod summary;

#[cfg(test)]
mod tests;

use layout::LayoutMode;

#[derive(Parser)]
#[clap(name = "magqc",
       version = concat!("v", crate_version!()),
       about = "assembly statistics and MIMAG quality classes for metagenome-assembled genomes")]
#[command(author, version, long_about = None, disable_help_subcommand = true,
          propagate_version = true)]
#[clap(subcommand_required = true)]
#[clap(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {

    /// build a genome report with assembly statistics and quality classes
    Report {
        /// Directory containing genome FASTA files or per-sample subdirectories (required)
        #[clap(short = 'i', long = "input_dir", required = true)]
        input_dir: PathBuf,

        /// Output CSV file
        #[clap(short = 'o', long = "out_csv", hide_default_value = true,
               help = "Output CSV file [default: Genome_Statistics_YYYYMMDD.csv]")]
        out_csv: Option<PathBuf>,

        /// Directory layout of the genome files
        #[clap(short = 't', long = "layout", value_enum, default_value = "auto")]
        layout: LayoutMode,

        /// Tab-separated completeness/contamination report (e.g. from CheckM)
        #[clap(short = 'q', long = "quality_report")]
        quality_report: Option<PathBuf>,

        /// Number of CPU threads
        #[clap(long = "threads", default_value = "8")]
        threads: usize,

        /// YAML file where run metrics will be saved
        #[clap(long = "metrics")]
        metrics: Option<PathBuf>,
    },

    /// summarise the quality classes in one or more genome reports
    Summary {
        /// Genome report CSV files made by magqc report (one or more required)
        #[clap(short = 'i', long = "in_csv", required = true, num_args = 1..)]
        in_csvs: Vec<PathBuf>,

        /// YAML file where combined metrics will be saved
        #[clap(long = "metrics")]
        metrics: Option<PathBuf>,
    },
}


fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Report { input_dir, out_csv, layout, quality_report, threads, metrics }) => {
            report::report(input_dir, out_csv, layout, quality_report, threads, metrics);
        },
        Some(Commands::Summary { in_csvs, metrics }) => {
            summary::summary(in_csvs, metrics);
        },
        None => {}
    }
}
