//! `loggen check` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

use loggen_core::config::LoggenConfig;
use loggen_sequence::{GapFilter, GapSummary};

use crate::cli::CheckArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `check` command.
pub async fn execute(
    args: CheckArgs,
    config: &LoggenConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let pattern = args.pattern.unwrap_or_else(|| config.gap.pattern.clone());
    let mut filter = GapFilter::new(&pattern)?;

    let source = match &args.file {
        Some(path) => path.display().to_string(),
        None => "<stdin>".to_owned(),
    };
    info!(source = %source, pattern = %pattern, "checking sequence numbers");

    let mut stdout = tokio::io::stdout();
    let echo: Option<&mut (dyn AsyncWrite + Unpin)> = if args.passthrough {
        Some(&mut stdout)
    } else {
        None
    };

    let summary = match &args.file {
        Some(path) => check_file(path, &mut filter, echo).await?,
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            check_reader(stdin, &mut filter, echo).await?
        }
    };

    let report = CheckReport {
        source,
        pattern,
        summary,
    };
    writer.render(&report)?;

    if args.strict && !report.summary.is_complete() {
        return Err(CliError::GapsFound {
            gaps: report.summary.gaps.len(),
            missing: report.summary.missing_count,
        });
    }
    Ok(())
}

async fn check_file(
    path: &Path,
    filter: &mut GapFilter,
    echo: Option<&mut (dyn AsyncWrite + Unpin)>,
) -> Result<GapSummary, CliError> {
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CliError::Command(format!("input file not found: {}", path.display()))
        } else {
            CliError::Io(e)
        }
    })?;
    check_reader(BufReader::new(file), filter, echo).await
}

/// Feed every line of `reader` through the gap filter.
///
/// With `echo`, each line is copied to it unchanged.
pub async fn check_reader<R>(
    reader: R,
    filter: &mut GapFilter,
    mut echo: Option<&mut (dyn AsyncWrite + Unpin)>,
) -> Result<GapSummary, CliError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = filter.filter(&line);
        if let Some(out) = echo.as_mut() {
            out.write_all(line.as_bytes()).await?;
            out.write_all(b"\n").await?;
        }
    }
    if let Some(out) = echo.as_mut() {
        out.flush().await?;
    }
    Ok(filter.summary())
}

/// Sequence check report.
#[derive(Serialize)]
pub struct CheckReport {
    /// Input file or `<stdin>`
    pub source: String,
    /// Extraction pattern
    pub pattern: String,
    /// Detector state after the last line
    #[serde(flatten)]
    pub summary: GapSummary,
}

impl Render for CheckReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let s = &self.summary;
        writeln!(w, "Sequence Check: {}", self.source.bold())?;
        writeln!(w, "  Pattern:  {}", self.pattern)?;
        writeln!(w, "  Lines:    {} seen, {} matched", s.lines_seen, s.lines_matched)?;
        writeln!(w, "  Expected: {}", s.expected_number)?;

        if s.is_complete() {
            writeln!(w, "  Result:   {}", "COMPLETE".green().bold())?;
        } else {
            writeln!(
                w,
                "  Result:   {} ({} missing)",
                "GAPS".red().bold(),
                s.missing_count
            )?;
            for gap in &s.gaps {
                writeln!(w, "  Gap:      {}", gap.to_string().red())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loggen_sequence::Gap;

    #[tokio::test]
    async fn reader_lines_feed_detector() {
        let input: &[u8] = b"seq=1\nseq=2\nnoise\nseq=5\nseq=3\n";
        let mut filter = GapFilter::new(r"seq=(\d+)").unwrap();
        let summary = check_reader(input, &mut filter, None).await.unwrap();

        assert_eq!(summary.lines_seen, 5);
        assert_eq!(summary.lines_matched, 4);
        assert_eq!(summary.gaps, vec![Gap { from: 4, to: 4 }]);
        assert_eq!(summary.expected_number, 6);
    }

    #[tokio::test]
    async fn passthrough_echoes_lines() {
        let input: &[u8] = b"a seq=1\nb\n";
        let mut filter = GapFilter::new(r"seq=(\d+)").unwrap();
        let mut out: Vec<u8> = Vec::new();
        check_reader(input, &mut filter, Some(&mut out)).await.unwrap();
        assert_eq!(out, b"a seq=1\nb\n");
    }

    #[test]
    fn text_report_lists_gaps() {
        let report = CheckReport {
            source: "app.log".to_owned(),
            pattern: r"seq=(\d+)".to_owned(),
            summary: GapSummary {
                expected_number: 10,
                gaps: vec![Gap { from: 3, to: 4 }],
                missing_count: 2,
                lines_seen: 8,
                lines_matched: 7,
            },
        };
        colored::control::set_override(false);
        let mut buf = Vec::new();
        report.render_text(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("app.log"));
        assert!(text.contains("GAPS (2 missing)"));
        assert!(text.contains("[3-4]"));
    }

    #[test]
    fn json_report_is_flat() {
        let report = CheckReport {
            source: "<stdin>".to_owned(),
            pattern: r"n=(\d+)".to_owned(),
            summary: GapSummary {
                expected_number: 4,
                gaps: Vec::new(),
                missing_count: 0,
                lines_seen: 3,
                lines_matched: 3,
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["source"], "<stdin>");
        assert_eq!(json["expected_number"], 4);
        assert!(json["gaps"].as_array().unwrap().is_empty());
    }
}
