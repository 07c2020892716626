//! `loggen generate` command handler

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use loggen_core::config::LoggenConfig;
use loggen_sequence::{GapFilter, GapSummary};
use loggen_template::{GenerationContext, TemplateEngine};

use crate::cli::GenerateArgs;
use crate::error::CliError;

/// Everything needed to produce a run of lines.
pub struct GeneratePlan {
    /// Fully resolved template text
    pub template: String,
    /// Engine with limits and translations applied
    pub engine: TemplateEngine,
    /// Number of lines (0 = until stopped)
    pub count: u64,
    /// Lines per second (0 = unthrottled)
    pub rate_per_sec: u64,
    /// Optional sequence gap check over generated lines
    pub gap_filter: Option<GapFilter>,
}

/// Result of a generate run.
#[derive(Debug)]
pub struct GenerateOutcome {
    /// Lines written to the sink
    pub lines_written: u64,
    /// Gap summary when a check pattern was configured
    pub gaps: Option<GapSummary>,
}

/// Execute the `generate` command.
pub async fn execute(args: GenerateArgs, config: LoggenConfig) -> Result<(), CliError> {
    let mut plan = build_plan(args, config).await?;

    let stop = Arc::new(AtomicBool::new(false));
    let signal = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal.store(true, Ordering::Relaxed);
        }
    });

    let started = Instant::now();
    let mut stdout = BufWriter::new(tokio::io::stdout());
    let outcome = run(&mut plan, &mut stdout, &stop).await?;

    info!(
        lines = outcome.lines_written,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generation finished"
    );
    if let Some(summary) = &outcome.gaps {
        if summary.is_complete() {
            info!(expected = summary.expected_number, "no sequence gaps");
        } else {
            warn!(
                gaps = summary.gaps.len(),
                missing = summary.missing_count,
                "sequence gaps remain open"
            );
        }
    }

    Ok(())
}

/// Merge command-line overrides into the configuration and build the engine.
pub async fn build_plan(args: GenerateArgs, mut config: LoggenConfig) -> Result<GeneratePlan, CliError> {
    let generator = &mut config.generator;
    if let Some(template) = args.template {
        generator.template = template;
        generator.template_file.clear();
    }
    if let Some(path) = args.template_file {
        generator.template_file = path.display().to_string();
    }
    if let Some(count) = args.count {
        generator.count = count;
    }
    if let Some(rate) = args.rate {
        generator.rate_per_sec = rate;
    }
    generator.translations.extend(args.translations);
    config.validate()?;

    let template = config.generator.resolve_template().await?;
    let engine = TemplateEngine::from_core(Arc::new(GenerationContext::new()), &config.generator);

    let pattern = args
        .check_pattern
        .or_else(|| config.gap.enabled.then(|| config.gap.pattern.clone()));
    let gap_filter = pattern.as_deref().map(GapFilter::new).transpose()?;

    Ok(GeneratePlan {
        template,
        engine,
        count: config.generator.count,
        rate_per_sec: config.generator.rate_per_sec,
        gap_filter,
    })
}

/// Render lines into `sink` until `count` is reached or `stop` is set.
///
/// A malformed template aborts the run on the first line.
pub async fn run<W>(
    plan: &mut GeneratePlan,
    sink: &mut W,
    stop: &AtomicBool,
) -> Result<GenerateOutcome, CliError>
where
    W: AsyncWrite + Unpin,
{
    let mut interval = (plan.rate_per_sec > 0).then(|| {
        let mut interval =
            tokio::time::interval(Duration::from_secs_f64(1.0 / plan.rate_per_sec as f64));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    let mut written = 0u64;
    while plan.count == 0 || written < plan.count {
        if stop.load(Ordering::Relaxed) {
            info!(lines = written, "interrupted");
            break;
        }
        match interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None if plan.count == 0 => tokio::task::yield_now().await,
            None => {}
        }

        let line = plan.engine.render(&plan.template)?;
        if let Some(filter) = plan.gap_filter.as_mut() {
            filter.filter(&line);
        }

        sink.write_all(line.as_bytes()).await?;
        sink.write_all(b"\n").await?;
        written += 1;

        // 속도 제한 시 라인마다 내보냄
        if interval.is_some() {
            sink.flush().await?;
        }
    }
    sink.flush().await?;

    Ok(GenerateOutcome {
        lines_written: written,
        gaps: plan.gap_filter.as_ref().map(GapFilter::summary),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(template: &str, count: u64) -> GenerateArgs {
        GenerateArgs {
            template: Some(template.to_owned()),
            count: Some(count),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn generates_requested_count() {
        let mut plan = build_plan(args("seq={counter:seq:1}", 3), LoggenConfig::default())
            .await
            .unwrap();
        let mut out = Vec::new();
        let outcome = run(&mut plan, &mut out, &AtomicBool::new(false))
            .await
            .unwrap();

        assert_eq!(outcome.lines_written, 3);
        assert_eq!(String::from_utf8(out).unwrap(), "seq=1\nseq=2\nseq=3\n");
        assert!(outcome.gaps.is_none());
    }

    #[tokio::test]
    async fn translations_from_args_and_config_merge() {
        let mut config = LoggenConfig::default();
        config
            .generator
            .translations
            .insert("host".to_owned(), "web-01".to_owned());
        let mut generate = args("{host} {app}", 1);
        generate.translations = vec![("app".to_owned(), "api".to_owned())];

        let mut plan = build_plan(generate, config).await.unwrap();
        let mut out = Vec::new();
        run(&mut plan, &mut out, &AtomicBool::new(false))
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "web-01 api\n");
    }

    #[tokio::test]
    async fn gap_check_over_generated_lines() {
        let mut generate = args("seq={counter:seq:1}", 5);
        generate.check_pattern = Some(r"seq=(\d+)".to_owned());

        let mut plan = build_plan(generate, LoggenConfig::default()).await.unwrap();
        let mut out = Vec::new();
        let outcome = run(&mut plan, &mut out, &AtomicBool::new(false))
            .await
            .unwrap();

        let gaps = outcome.gaps.unwrap();
        assert!(gaps.is_complete());
        assert_eq!(gaps.expected_number, 6);
        assert_eq!(gaps.lines_matched, 5);
    }

    #[tokio::test]
    async fn stop_flag_ends_unbounded_run() {
        let mut plan = build_plan(args("x", 0), LoggenConfig::default())
            .await
            .unwrap();
        let mut out = Vec::new();
        let outcome = run(&mut plan, &mut out, &AtomicBool::new(true))
            .await
            .unwrap();
        assert_eq!(outcome.lines_written, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_spaces_lines() {
        let mut generate = args("x", 3);
        generate.rate = Some(10);
        let mut plan = build_plan(generate, LoggenConfig::default()).await.unwrap();

        let started = tokio::time::Instant::now();
        let mut out = Vec::new();
        run(&mut plan, &mut out, &AtomicBool::new(false))
            .await
            .unwrap();
        // 첫 틱은 즉시, 이후 100ms 간격
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn malformed_template_fails_first_line() {
        let mut plan = build_plan(args("{date:}", 3), LoggenConfig::default())
            .await
            .unwrap();
        let mut out = Vec::new();
        let err = run(&mut plan, &mut out, &AtomicBool::new(false))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn invalid_check_pattern_is_rejected() {
        let mut generate = args("x", 1);
        generate.check_pattern = Some("no-groups".to_owned());
        let err = build_plan(generate, LoggenConfig::default())
            .await
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);
    }
}
