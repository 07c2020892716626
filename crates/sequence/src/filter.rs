//! gap 필터 -- 라인에서 순번을 추출해 탐지기에 전달
//!
//! 라인은 항상 그대로 통과합니다. 추출 패턴이 일치하고 첫 번째 캡처 그룹이
//! 음이 아닌 10진 정수면 [`GapDetector::observe`]를 호출하고, 결과를
//! [`GapReporter`]에 넘깁니다.

use regex::Regex;
use serde::{Deserialize, Serialize};

use loggen_core::metrics as m;

use crate::detector::{Gap, GapDetector, Observation};
use crate::error::SequenceError;

/// 검사 결과를 받는 협력자
pub trait GapReporter {
    /// 번호 하나의 검사 결과를 받습니다.
    fn report(&mut self, line: &str, observation: &Observation);
}

/// `tracing` 로그와 메트릭으로 결과를 보고합니다.
///
/// 앞으로 건너뜀은 `warn`, gap 해소는 `info`, 중복은 `debug`입니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl GapReporter for TracingReporter {
    fn report(&mut self, line: &str, observation: &Observation) {
        match *observation {
            Observation::InOrder { .. } => {}
            Observation::Jump { number, gap } => {
                metrics::counter!(m::SEQUENCE_GAPS_OPENED_TOTAL).increment(1);
                tracing::warn!(
                    number,
                    gap_from = gap.from,
                    gap_to = gap.to,
                    missing = gap.len(),
                    "sequence jumped forward"
                );
            }
            Observation::Healed { number, delta } => {
                metrics::counter!(m::SEQUENCE_GAPS_HEALED_TOTAL).increment(1);
                tracing::info!(number, delta, "late sequence number filled a gap");
            }
            Observation::Duplicate { number, delta } => {
                metrics::counter!(m::SEQUENCE_DUPLICATES_TOTAL).increment(1);
                tracing::debug!(number, delta, line, "sequence number seen again");
            }
        }
    }
}

impl GapReporter for Vec<Observation> {
    fn report(&mut self, _line: &str, observation: &Observation) {
        self.push(*observation);
    }
}

/// 필터 상태 요약
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapSummary {
    /// 다음에 올 것으로 기대하는 번호
    pub expected_number: i64,
    /// 열린 누락 구간
    pub gaps: Vec<Gap>,
    /// 누락된 번호 총 개수
    pub missing_count: u64,
    /// 필터를 통과한 라인 수
    pub lines_seen: u64,
    /// 순번이 추출된 라인 수
    pub lines_matched: u64,
}

impl GapSummary {
    /// 누락 번호가 없으면 `true`
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }
}

/// 단일 스트림용 gap 필터
///
/// # 사용 예시
/// ```
/// use loggen_sequence::GapFilter;
///
/// let mut filter = GapFilter::new(r"seq=(\d+)")?;
/// for line in ["a seq=1", "b seq=3", "no number", "c seq=2"] {
///     assert_eq!(filter.filter(line), line);
/// }
/// let summary = filter.summary();
/// assert_eq!(summary.lines_seen, 4);
/// assert_eq!(summary.lines_matched, 3);
/// assert!(summary.is_complete());
/// # Ok::<(), loggen_sequence::SequenceError>(())
/// ```
#[derive(Debug)]
pub struct GapFilter<R = TracingReporter> {
    pattern: Regex,
    detector: GapDetector,
    reporter: R,
    lines_seen: u64,
    lines_matched: u64,
}

impl GapFilter<TracingReporter> {
    /// 기본 보고자(`TracingReporter`)로 필터를 생성합니다.
    pub fn new(pattern: &str) -> Result<Self, SequenceError> {
        Self::with_reporter(pattern, TracingReporter)
    }
}

impl<R: GapReporter> GapFilter<R> {
    /// 보고자를 지정해 필터를 생성합니다.
    ///
    /// 패턴은 캡처 그룹을 정확히 하나 가져야 합니다.
    pub fn with_reporter(pattern: &str, reporter: R) -> Result<Self, SequenceError> {
        let compiled = Regex::new(pattern).map_err(|e| SequenceError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })?;

        let groups = compiled.captures_len() - 1;
        if groups != 1 {
            return Err(SequenceError::GroupCount {
                pattern: pattern.to_owned(),
                groups,
            });
        }

        Ok(Self {
            pattern: compiled,
            detector: GapDetector::new(),
            reporter,
            lines_seen: 0,
            lines_matched: 0,
        })
    }

    /// 라인을 검사하고 그대로 반환합니다.
    pub fn filter<'l>(&mut self, line: &'l str) -> &'l str {
        self.lines_seen += 1;

        let Some(number) = self.extract(line) else {
            return line;
        };

        self.lines_matched += 1;
        metrics::counter!(m::SEQUENCE_LINES_CHECKED_TOTAL).increment(1);
        let observation = self.detector.observe(number);
        self.reporter.report(line, &observation);
        line
    }

    /// 여러 라인을 순서대로 검사합니다.
    pub fn filter_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.filter(line.as_ref());
        }
    }

    fn extract(&self, line: &str) -> Option<i64> {
        let digits = self.pattern.captures(line)?.get(1)?.as_str();
        match digits.parse::<u64>().ok().and_then(|n| i64::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                tracing::debug!(digits, "sequence capture is not a non-negative integer");
                None
            }
        }
    }

    /// 현재 상태 요약을 반환합니다.
    pub fn summary(&self) -> GapSummary {
        GapSummary {
            expected_number: self.detector.expected_number(),
            gaps: self.detector.gaps().to_vec(),
            missing_count: self.detector.missing_count(),
            lines_seen: self.lines_seen,
            lines_matched: self.lines_matched,
        }
    }

    /// 내부 탐지기
    pub fn detector(&self) -> &GapDetector {
        &self.detector
    }

    /// 보고자
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// 추출 패턴 원문
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}
