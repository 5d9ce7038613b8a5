use crate::infra::{apply_entries, CutoffEntries};
use clap::{Args, ValueEnum};
use gradebook::config::AppConfig;
use gradebook::error::AppError;
use gradebook::roster::{
    export, import, process_roster, sample, CohortSummary, CutoffEntryMode, CutoffTable,
    GradedRecord, RosterImportError, ScorePolicy,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum EntryModeArg {
    /// Base-10 integers in 0..=100 only
    StrictInteger,
    /// Any decimal in 0.0..=100.0
    Decimal,
}

impl From<EntryModeArg> for CutoffEntryMode {
    fn from(value: EntryModeArg) -> Self {
        match value {
            EntryModeArg::StrictInteger => CutoffEntryMode::StrictInteger,
            EntryModeArg::Decimal => CutoffEntryMode::Decimal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PolicyArg {
    /// Abort the batch on a non-numeric part score
    Strict,
    /// Default the record's composite to zero instead
    ZeroOnError,
}

impl From<PolicyArg> for ScorePolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Strict => ScorePolicy::Strict,
            PolicyArg::ZeroOnError => ScorePolicy::ZeroOnError,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ProcessArgs {
    /// Roster file to score (.csv, .xlsx, or .xls)
    pub(crate) input: PathBuf,
    /// Directory for the exported workbook (defaults to the input's directory)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// How raw cutoff overrides are validated
    #[arg(long, value_enum, default_value_t = EntryModeArg::StrictInteger)]
    pub(crate) entry_mode: EntryModeArg,
    /// Conversion failure handling (defaults to GRADEBOOK_SCORE_POLICY)
    #[arg(long, value_enum)]
    pub(crate) policy: Option<PolicyArg>,
    /// Print every graded record after the summary
    #[arg(long)]
    pub(crate) list_records: bool,
    #[command(flatten)]
    pub(crate) cutoffs: CutoffEntries,
}

#[derive(Args, Debug)]
pub(crate) struct SampleArgs {
    /// Number of records to generate
    #[arg(long, default_value_t = 30)]
    pub(crate) count: usize,
    /// RNG seed (fixed default keeps demo output reproducible)
    #[arg(long, default_value_t = sample::DEFAULT_SAMPLE_SEED)]
    pub(crate) seed: u64,
    /// Output CSV path
    #[arg(long, default_value = "sample_roster.csv")]
    pub(crate) output: PathBuf,
}

pub(crate) fn run_process(args: ProcessArgs) -> Result<(), AppError> {
    let ProcessArgs {
        input,
        output_dir,
        entry_mode,
        policy,
        list_records,
        cutoffs,
    } = args;

    let config = AppConfig::load()?;
    let policy = policy
        .map(ScorePolicy::from)
        .unwrap_or(config.pipeline.score_policy);
    let cutoffs = apply_entries(&CutoffTable::default(), &cutoffs, entry_mode.into())?;

    let records = import::from_path(&input)?;
    let graded = process_roster(records, &cutoffs, policy)?;
    let summary = CohortSummary::from_records(&graded);

    let workbook = export::write_workbook(&graded)?;
    let source = std::fs::read(&input)?;
    let filename = export::export_filename(&source);
    let target_dir = output_dir.unwrap_or_else(|| {
        input
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let output_path = target_dir.join(filename);
    std::fs::write(&output_path, workbook)?;

    render_summary(&summary, &cutoffs);
    if list_records {
        render_records(&graded);
    }
    println!("\nExported {}", output_path.display());

    Ok(())
}

pub(crate) fn run_sample(args: SampleArgs) -> Result<(), AppError> {
    let roster = sample::generate_sample(args.count, args.seed);
    let csv = sample::to_csv(&roster).map_err(RosterImportError::from)?;
    std::fs::write(&args.output, csv)?;

    println!(
        "Wrote {} sample records to {}",
        args.count,
        args.output.display()
    );
    Ok(())
}

fn render_summary(summary: &CohortSummary, cutoffs: &CutoffTable) {
    println!("Roster results");
    println!(
        "Students: {} | mean {:.1} | highest {} | lowest {}",
        summary.total, summary.mean_composite, summary.highest_composite, summary.lowest_composite
    );

    println!("\nCutoffs in effect");
    for (tier, threshold) in cutoffs.ascending() {
        if threshold > 0.0 {
            println!("- {tier}: >= {threshold}");
        } else {
            println!("- {tier}: disabled");
        }
    }

    if summary.grade_distribution.is_empty() {
        println!("\nGrade distribution: none");
    } else {
        println!("\nGrade distribution");
        for band in &summary.grade_distribution {
            println!(
                "- {}: {} ({:.1}%)",
                band.tier_label, band.count, band.percentage
            );
        }
    }

    if !summary.class_averages.is_empty() {
        println!("\nClass averages");
        for entry in &summary.class_averages {
            println!("- {}: {:.1}", entry.class_name, entry.mean_composite);
        }
    }
}

fn render_records(records: &[GradedRecord]) {
    println!("\nGraded records by rank");
    for record in records {
        println!(
            "- #{} {} ({}, {}) | composite {} | {}",
            record.rank,
            record.student.name,
            record.student.student_id,
            record.student.class_name,
            record.composite,
            record.grade
        );
    }
}
