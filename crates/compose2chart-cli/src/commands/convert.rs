//! Convert command - generate a Helm chart from a compose file

use compose2chart_convert::{ConversionResult, ConversionWarning, ConvertOptions, WarningSeverity};
use console::style;

use crate::error::Result;

pub fn run(options: ConvertOptions, quiet: bool) -> Result<()> {
    if !quiet {
        print_header(&options);
    }

    let dry_run = options.dry_run;
    let out_dir = options.out_dir.clone();
    let result = compose2chart_convert::convert(options)?;

    // Warnings go to stderr even in quiet mode
    for warning in &result.warnings {
        print_warning(warning);
    }

    if !quiet {
        print_files(&result, &out_dir);
        print_summary(&result, dry_run);
    }

    Ok(())
}

fn print_header(options: &ConvertOptions) {
    println!();
    println!(
        "  {} {} {}",
        style("compose2chart").bold().cyan(),
        style("─").dim(),
        style("docker-compose → Helm").dim()
    );
    println!();
    println!(
        "  {} {}",
        style("Source:").dim(),
        style(options.compose_file.display()).cyan()
    );
    println!(
        "  {} {} {}",
        style("Target:").dim(),
        style(options.out_dir.display()).green(),
        style(format!("({} {})", options.chart_name, options.version)).dim()
    );
    println!();
}

/// One line per warning
fn print_warning(warning: &ConversionWarning) {
    let label = match warning.severity {
        WarningSeverity::Warning => style("warning:").yellow().bold(),
        WarningSeverity::Error => style("warning:").red().bold(),
    };
    eprintln!("{} {}", label.for_stderr(), warning);
}

fn print_files(result: &ConversionResult, out_dir: &std::path::Path) {
    println!("  {}", style("Generated Files").bold());
    println!("  {}", style("───────────────").dim());

    for file in &result.written_files {
        let rel_path = file.strip_prefix(out_dir).unwrap_or(file);
        println!("  {} {}", style("✓").green().bold(), rel_path.display());
    }

    println!();
}

fn print_summary(result: &ConversionResult, dry_run: bool) {
    let skipped = result.count_by_severity(WarningSeverity::Error);

    println!("  {}", style(result.success_message()).bold());

    if skipped > 0 {
        println!(
            "  {} service{} skipped",
            style(skipped).red().bold(),
            if skipped == 1 { "" } else { "s" }
        );
    }

    if dry_run {
        println!();
        println!(
            "  {} {}",
            style("ℹ").cyan(),
            style("Dry run mode - no files were written").dim()
        );
    }

    println!();
}
