//! textloom CLI - text, table, and document reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use textloom::{BidiMode, ComposeOptions, Extraction, Extractor, PageRange, Spacing};

#[derive(Parser)]
#[command(name = "textloom")]
#[command(version)]
#[command(about = "Reconstruct text, tables, and documents from placement dumps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose plain reading-order text
    Text {
        /// Input placement dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        compose: ComposeArgs,
    },

    /// Export inferred tables as delimited text
    Csv {
        /// Input placement dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Cell delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: String,

        #[command(flatten)]
        compose: ComposeArgs,
    },

    /// Compose the block-structured document as JSON
    Document {
        /// Input placement dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        compose: ComposeArgs,
    },

    /// Show dump information and composition warnings
    Info {
        /// Input placement dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(clap::Args)]
struct ComposeArgs {
    /// Base direction for the visual-to-logical bidi pass
    #[arg(long, value_enum)]
    bidi: Option<BidiArg>,

    /// Disable inferred inter-word spaces
    #[arg(long)]
    no_spaces: bool,

    /// Disable inferred blank lines
    #[arg(long)]
    no_blank_lines: bool,

    /// Page range, inclusive; negative indices count from the end
    /// (e.g. "0:3", "-2:-1")
    #[arg(long, value_name = "START:END")]
    pages: Option<String>,

    /// Compose pages sequentially instead of on the thread pool
    #[arg(long)]
    sequential: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BidiArg {
    /// Left-to-right base direction
    Ltr,
    /// Right-to-left base direction
    Rtl,
}

impl From<BidiArg> for BidiMode {
    fn from(arg: BidiArg) -> Self {
        match arg {
            BidiArg::Ltr => BidiMode::LeftToRight,
            BidiArg::Rtl => BidiMode::RightToLeft,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Text {
            input,
            output,
            compose,
        } => cmd_text(&input, output.as_deref(), &compose),
        Commands::Csv {
            input,
            output,
            delimiter,
            compose,
        } => cmd_csv(&input, output.as_deref(), &delimiter, &compose),
        Commands::Document {
            input,
            output,
            compact,
            compose,
        } => cmd_document(&input, output.as_deref(), compact, &compose),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn run_extraction(input: &Path, args: &ComposeArgs, delimiter: Option<&str>) -> Result<Extraction, Box<dyn std::error::Error>> {
    let mut options = ComposeOptions::new().with_spacing(Spacing {
        horizontal: !args.no_spaces,
        vertical: !args.no_blank_lines,
    });
    if let Some(bidi) = args.bidi {
        options = options.with_bidi(bidi.into());
    }
    if let Some(delimiter) = delimiter {
        options = options.with_delimiter(delimiter);
    }
    if args.sequential {
        options = options.sequential();
    }

    let mut extractor = Extractor::new(options);
    if let Some(spec) = &args.pages {
        extractor = extractor.with_range(parse_page_range(spec)?);
    }

    let extraction = extractor.run_file(input)?;
    for warning in extraction.warnings() {
        log::warn!("page {}: {}", warning.page, warning.message);
    }
    Ok(extraction)
}

/// Parse "start:end" with optional negative from-the-end indices.
fn parse_page_range(spec: &str) -> Result<PageRange, String> {
    let (start, end) = spec
        .split_once(':')
        .ok_or_else(|| format!("invalid page range '{spec}', expected START:END"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<i64>()
            .map_err(|_| format!("invalid page index '{s}'"))
    };
    Ok(PageRange::new(parse(start)?, parse(end)?))
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("{} {}", "Wrote".green(), path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>, compose: &ComposeArgs) -> CliResult {
    let extraction = run_extraction(input, compose, None)?;
    write_output(output, &extraction.text())
}

fn cmd_csv(
    input: &Path,
    output: Option<&Path>,
    delimiter: &str,
    compose: &ComposeArgs,
) -> CliResult {
    let extraction = run_extraction(input, compose, Some(delimiter))?;
    write_output(output, &extraction.tables_csv())
}

fn cmd_document(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    compose: &ComposeArgs,
) -> CliResult {
    let extraction = run_extraction(input, compose, None)?;
    let document = extraction.document();
    let json = if compact {
        serde_json::to_string(&document)?
    } else {
        serde_json::to_string_pretty(&document)?
    };
    write_output(output, &json)?;
    if output.is_none() {
        println!();
    }
    Ok(())
}

fn cmd_info(input: &Path) -> CliResult {
    let extraction = Extractor::new(ComposeOptions::new()).run_file(input)?;

    println!("{}", "Dump".bold());
    println!("  pages: {}", extraction.page_count());

    let table_count: usize = extraction.tables().iter().map(Vec::len).sum();
    println!("  tables: {table_count}");

    let document = extraction.document();
    println!("  blocks: {}", document.block_count());

    if extraction.warnings().is_empty() {
        println!("  warnings: none");
    } else {
        println!("{}", "Warnings".bold());
        for warning in extraction.warnings() {
            println!(
                "  {} page {}: {}",
                "!".yellow(),
                warning.page,
                warning.message
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_range() {
        assert_eq!(parse_page_range("0:3").unwrap(), PageRange::new(0, 3));
        assert_eq!(parse_page_range("-2:-1").unwrap(), PageRange::new(-2, -1));
        assert!(parse_page_range("5").is_err());
        assert!(parse_page_range("a:b").is_err());
    }
}
