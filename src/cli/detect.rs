use std::path::{Path, PathBuf};

use clap::Args;

use crate::cli::OutputFormat;
use crate::matching::counts::{ChapterMode, CountsMatcher, CountsReport};
use crate::matching::coverage::ObservedCoverage;
use crate::matching::engine::{MatchOptions, MatchReport, SchemeMatcher, SchemeScore};

#[derive(Args)]
pub struct DetectArgs {
    /// Observed coverage listing (one "<book> <chapter>:<verse>" per line)
    #[arg(required = true)]
    pub coverage: PathBuf,

    /// Use the approximate counts-only mode instead of exact verse
    /// membership
    #[arg(long)]
    pub counts: bool,

    /// Priority between chapter and verse mismatches (counts mode only)
    #[arg(long, value_enum, default_value = "high-priority")]
    pub chapter_mode: ChapterModeArg,

    /// Restrict candidate schemes to the books the document uses
    #[arg(long)]
    pub limit_books: bool,

    /// Additionally report these schemes, wherever they rank
    pub schemes: Vec<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ChapterModeArg {
    /// Chapter mismatches rank before verse mismatches
    HighPriority,
    /// Verse mismatches rank before chapter mismatches
    LowPriority,
    /// Ignore chapter counts entirely
    Ignore,
}

impl From<ChapterModeArg> for ChapterMode {
    fn from(arg: ChapterModeArg) -> Self {
        match arg {
            ChapterModeArg::HighPriority => ChapterMode::HighPriority,
            ChapterModeArg::LowPriority => ChapterMode::LowPriority,
            ChapterModeArg::Ignore => ChapterMode::Ignore,
        }
    }
}

pub fn run(args: DetectArgs, db: &Path, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let store = crate::cli::load_store(db)?;
    let text = std::fs::read_to_string(&args.coverage)?;
    let observed = ObservedCoverage::from_text(&text)?;

    if verbose {
        eprintln!(
            "Observed {} distinct verses in {} books",
            observed.distinct_verse_count(),
            observed.books().count()
        );
    }

    if args.counts {
        let matcher = CountsMatcher::new(store.schemes())?;
        let report = matcher.run(&observed, args.chapter_mode.into(), args.limit_books);
        print_counts_report(&report, format, verbose)?;
    } else {
        let matcher = SchemeMatcher::new(store.schemes())?;
        let report = matcher.run(
            &observed,
            &MatchOptions {
                limit_books: args.limit_books,
            },
        );
        print_exact_report(&report, &args.schemes, format, verbose)?;
    }

    Ok(())
}

fn print_exact_report(
    report: &MatchReport,
    selected: &[String],
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            print!("Best match:  ");
            print_score_line(report.best(), report.observed_verse_count(), verbose);

            println!();
            println!("Other options:");
            for score in report.runner_ups() {
                print_score_line(score, report.observed_verse_count(), verbose);
            }

            if !selected.is_empty() {
                println!();
                println!("Selected schemes:");
                let (found, unknown) = report.selected(selected);
                for score in found {
                    print_score_line(score, report.observed_verse_count(), verbose);
                }
                for name in unknown {
                    println!("{name} (Unknown scheme)");
                }
            }
        }
        OutputFormat::Json => {
            let ranked: Vec<serde_json::Value> = report
                .ranked()
                .iter()
                .map(|score| {
                    serde_json::json!({
                        "scheme": score.name(),
                        "missing_chapters": score.missing_chapter_count(),
                        "missing_verses": score.missing_verse_count(),
                        "verse_count": score.verse_count(),
                    })
                })
                .collect();
            let output = serde_json::json!({
                "observed_verses": report.observed_verse_count(),
                "ranked": ranked,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("scheme\tmissing_chapters\tmissing_verses\tverse_count");
            for score in report.ranked() {
                println!(
                    "{}\t{}\t{}\t{}",
                    score.name(),
                    score.missing_chapter_count(),
                    score.missing_verse_count(),
                    score.verse_count()
                );
            }
        }
    }
    Ok(())
}

fn print_score_line(score: &SchemeScore, observed_verses: usize, verbose: bool) {
    if score.missing_chapter_count() > 0 {
        print!(
            "{} (Missing chapters+verses: {}+{}",
            score.name(),
            score.missing_chapter_count(),
            score.missing_verse_count()
        );
        if verbose {
            print!(
                " {:?} {:?}",
                score.missing_chapters(),
                score.missing_verses()
            );
        }
        println!(")");
    } else if score.missing_verse_count() > 0 {
        print!(
            "{} (Missing verses: {}",
            score.name(),
            score.missing_verse_count()
        );
        if verbose {
            print!(" {:?}", score.missing_verses());
        }
        println!(")");
    } else {
        println!(
            "{} (All verses covered, and {} more)",
            score.name(),
            score.verse_count() - observed_verses
        );
    }
}

fn print_counts_report(
    report: &CountsReport,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            print!("Best match:  ");
            print_counts_line(report.best(), report.observed_verse_count());

            println!();
            println!("Other options:");
            for score in report.ranked().iter().skip(1).take(10) {
                print_counts_line(score, report.observed_verse_count());
            }

            if verbose {
                println!();
                for score in report.ranked() {
                    println!("{}:", score.name());
                    for (book, counts) in score.covered_counts() {
                        println!(
                            "\t{}: {}c, {}v",
                            book.osis_id(),
                            counts.chapters,
                            counts.verses
                        );
                    }
                }
            }
        }
        OutputFormat::Json => {
            let ranked: Vec<serde_json::Value> = report
                .ranked()
                .iter()
                .map(|score| {
                    serde_json::json!({
                        "scheme": score.name(),
                        "missing_books": score.missing_books(),
                        "missing_chapters": score.missing_chapters(),
                        "missing_verses": score.missing_verses(),
                        "verse_count": score.verse_count(),
                    })
                })
                .collect();
            let output = serde_json::json!({
                "observed_verses": report.observed_verse_count(),
                "ranked": ranked,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("scheme\tmissing_books\tmissing_chapters\tmissing_verses\tverse_count");
            for score in report.ranked() {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    score.name(),
                    score.missing_books(),
                    score.missing_chapters(),
                    score.missing_verses(),
                    score.verse_count()
                );
            }
        }
    }
    Ok(())
}

fn print_counts_line(score: &crate::matching::counts::CountsScore, observed_verses: usize) {
    if score.missing_books() > 0 {
        println!(
            "{} (Missing books+chapters+verses: {}+{}+{})",
            score.name(),
            score.missing_books(),
            score.missing_chapters(),
            score.missing_verses()
        );
    } else if score.missing_chapters() > 0 {
        println!(
            "{} (Missing chapters+verses: {}+{})",
            score.name(),
            score.missing_chapters(),
            score.missing_verses()
        );
    } else if score.missing_verses() > 0 {
        println!("{} (Missing verses: {})", score.name(), score.missing_verses());
    } else {
        println!(
            "{} (All verses covered, and {} more)",
            score.name(),
            score.verse_count() - observed_verses
        );
    }
}
