//! 시퀀스 gap 탐지기 -- 누락 번호 구간 상태 기계
//!
//! 다음에 올 번호(`expected_number`)와 아직 보지 못한 번호 구간 목록(`gaps`)을
//! 유지합니다. 구간은 오름차순이며 서로 겹치지 않고, 모든 구간은 `from <= to`입니다.
//!
//! 늦게 도착한 번호는 구간을 제거하거나 줄이거나 둘로 나눕니다.
//! 나뉜 구간은 이후에 다시 병합되지 않습니다.
//!
//! # 사용 예시
//! ```
//! use loggen_sequence::GapDetector;
//!
//! let mut detector = GapDetector::new();
//! assert_eq!(detector.check(1), 0);
//! assert_eq!(detector.check(3), 1);   // 2 누락
//! assert_eq!(detector.check(2), -2);  // 늦게 도착, gap 해소
//! assert!(detector.is_complete());
//! ```

use serde::{Deserialize, Serialize};

/// 아직 관측되지 않은 번호의 닫힌 구간 `[from, to]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    /// 구간 시작 (포함)
    pub from: i64,
    /// 구간 끝 (포함)
    pub to: i64,
}

impl Gap {
    /// 구간에 포함된 번호 수
    pub fn len(&self) -> u64 {
        self.to.abs_diff(self.from) + 1
    }

    /// 닫힌 구간은 비어 있지 않습니다.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// 번호가 구간에 포함되는지 확인합니다.
    pub fn contains(&self, n: i64) -> bool {
        self.from <= n && n <= self.to
    }
}

impl std::fmt::Display for Gap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.from == self.to {
            write!(f, "[{}]", self.from)
        } else {
            write!(f, "[{}-{}]", self.from, self.to)
        }
    }
}

/// 번호 하나를 검사한 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// 기대한 번호가 도착함
    InOrder {
        /// 도착한 번호
        number: i64,
    },
    /// 앞으로 건너뜀, `gap`이 새로 기록됨
    Jump {
        /// 도착한 번호
        number: i64,
        /// 새로 열린 구간
        gap: Gap,
    },
    /// 늦게 도착해 기존 구간을 메움
    Healed {
        /// 도착한 번호
        number: i64,
        /// `number - expected_number` (음수)
        delta: i64,
    },
    /// 이미 관측된 번호가 다시 도착함
    Duplicate {
        /// 도착한 번호
        number: i64,
        /// `number - expected_number` (0 이하)
        delta: i64,
    },
}

impl Observation {
    /// `check`가 반환하는 부호 있는 차이
    pub fn delta(&self) -> i64 {
        match self {
            Self::InOrder { .. } => 0,
            Self::Jump { gap, .. } => gap.len().try_into().unwrap_or(i64::MAX),
            Self::Healed { delta, .. } | Self::Duplicate { delta, .. } => *delta,
        }
    }

    /// 도착한 번호
    pub fn number(&self) -> i64 {
        match self {
            Self::InOrder { number }
            | Self::Jump { number, .. }
            | Self::Healed { number, .. }
            | Self::Duplicate { number, .. } => *number,
        }
    }
}

/// 단일 스트림용 gap 탐지기
///
/// `check`만 상태를 바꾸며 `&mut self`로 단일 작성자를 강제합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapDetector {
    expected_number: i64,
    gaps: Vec<Gap>,
    /// `i64::MAX`를 이미 받아 기대 번호가 더 오를 수 없는 상태
    exhausted: bool,
}

impl Default for GapDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl GapDetector {
    /// `expected_number = 1`, gap 없음으로 시작합니다.
    pub fn new() -> Self {
        Self {
            expected_number: 1,
            gaps: Vec::new(),
            exhausted: false,
        }
    }

    /// 번호를 검사하고 `n - expected_number`를 반환합니다.
    ///
    /// - `0`: 순서대로 도착
    /// - 양수: 앞으로 건너뜀, 누락 구간 기록
    /// - 음수: 늦게 도착 (구간을 메웠거나 중복)
    pub fn check(&mut self, n: i64) -> i64 {
        self.observe(n).delta()
    }

    /// 번호를 검사하고 분류된 결과를 반환합니다.
    pub fn observe(&mut self, n: i64) -> Observation {
        let expected = self.expected_number;

        if n == expected {
            // 기대 번호는 i64::MAX에서 멈추므로 두 번째 i64::MAX는 중복
            if self.exhausted {
                return Observation::Duplicate {
                    number: n,
                    delta: -1,
                };
            }
            self.advance_past(n);
            return Observation::InOrder { number: n };
        }

        if n > expected {
            let gap = Gap {
                from: expected,
                to: n - 1,
            };
            self.gaps.push(gap);
            self.advance_past(n);
            return Observation::Jump { number: n, gap };
        }

        let delta = n.saturating_sub(expected);
        let idx = self.gaps.partition_point(|g| g.to < n);
        let Some(gap) = self.gaps.get_mut(idx).filter(|g| g.from <= n) else {
            return Observation::Duplicate { number: n, delta };
        };

        match (n == gap.from, n == gap.to) {
            (true, true) => {
                self.gaps.remove(idx);
            }
            (true, false) => gap.from = n + 1,
            (false, true) => gap.to = n - 1,
            (false, false) => {
                let upper = Gap {
                    from: n + 1,
                    to: gap.to,
                };
                gap.to = n - 1;
                self.gaps.insert(idx + 1, upper);
            }
        }
        Observation::Healed { number: n, delta }
    }

    fn advance_past(&mut self, n: i64) {
        match n.checked_add(1) {
            Some(next) => self.expected_number = next,
            None => {
                self.expected_number = n;
                self.exhausted = true;
            }
        }
    }

    /// 다음에 올 것으로 기대하는 번호 (`i64::MAX` 도착 후에는 `i64::MAX`에 머묾)
    pub fn expected_number(&self) -> i64 {
        self.expected_number
    }

    /// 열린 누락 구간 (오름차순)
    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    /// 누락된 번호의 총 개수
    pub fn missing_count(&self) -> u64 {
        self.gaps
            .iter()
            .fold(0u64, |acc, g| acc.saturating_add(g.len()))
    }

    /// 열린 구간이 없으면 `true`
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn with_state(expected_number: i64, gaps: Vec<Gap>) -> Self {
        Self {
            expected_number,
            gaps,
            exhausted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap(from: i64, to: i64) -> Gap {
        Gap { from, to }
    }

    #[test]
    fn in_order_sequence_has_no_gaps() {
        let mut d = GapDetector::new();
        assert_eq!(d.check(1), 0);
        assert_eq!(d.check(2), 0);
        assert_eq!(d.check(3), 0);
        assert_eq!(d.expected_number(), 4);
        assert!(d.is_complete());
    }

    #[test]
    fn single_missing_number_heals() {
        let mut d = GapDetector::new();
        assert_eq!(d.check(1), 0);
        assert_eq!(d.check(3), 1);
        assert_eq!(d.gaps(), &[gap(2, 2)]);
        assert_eq!(d.expected_number(), 4);

        let delta = d.check(2);
        assert!(delta < 0);
        assert_eq!(delta, -2);
        assert!(d.is_complete());
    }

    #[test]
    fn forward_jump_from_start() {
        let mut d = GapDetector::new();
        assert_eq!(d.check(5), 4);
        assert_eq!(d.gaps(), &[gap(1, 4)]);
        assert_eq!(d.expected_number(), 6);
        assert_eq!(d.missing_count(), 4);
    }

    #[test]
    fn heal_lower_edge() {
        let mut d = GapDetector::with_state(11, vec![gap(3, 7)]);
        assert_eq!(d.check(3), -8);
        assert_eq!(d.gaps(), &[gap(4, 7)]);
    }

    #[test]
    fn heal_upper_edge() {
        let mut d = GapDetector::with_state(11, vec![gap(3, 7)]);
        assert_eq!(d.check(7), -4);
        assert_eq!(d.gaps(), &[gap(3, 6)]);
    }

    #[test]
    fn heal_interior_splits_gap() {
        let mut d = GapDetector::with_state(11, vec![gap(3, 7), gap(9, 9)]);
        assert_eq!(d.check(5), -6);
        assert_eq!(d.gaps(), &[gap(3, 4), gap(6, 7), gap(9, 9)]);
    }

    #[test]
    fn duplicate_leaves_state_unchanged() {
        let mut d = GapDetector::with_state(11, vec![gap(3, 7)]);
        let before = d.clone();
        assert_eq!(d.check(8), -3);
        assert_eq!(d.check(1), -10);
        assert_eq!(d, before);
    }

    #[test]
    fn duplicate_of_expected_minus_one() {
        let mut d = GapDetector::new();
        d.check(1);
        d.check(2);
        assert_eq!(d.check(2), -1);
        assert!(matches!(d.observe(2), Observation::Duplicate { .. }));
    }

    #[test]
    fn split_gaps_are_not_merged_again() {
        let mut d = GapDetector::new();
        d.check(10);
        assert_eq!(d.gaps(), &[gap(1, 9)]);

        // 분할 후 양쪽 끝을 메워도 두 구간은 별도 항목으로 남음
        d.check(5);
        d.check(4);
        d.check(6);
        assert_eq!(d.gaps(), &[gap(1, 3), gap(7, 9)]);
        assert_eq!(d.missing_count(), 6);
    }

    #[test]
    fn multiple_jumps_append_in_order() {
        let mut d = GapDetector::new();
        d.check(3);
        d.check(6);
        d.check(10);
        assert_eq!(d.gaps(), &[gap(1, 2), gap(4, 5), gap(7, 9)]);
        assert_eq!(d.expected_number(), 11);
    }

    #[test]
    fn observe_classifies_results() {
        let mut d = GapDetector::new();
        assert_eq!(d.observe(1), Observation::InOrder { number: 1 });
        assert_eq!(
            d.observe(4),
            Observation::Jump {
                number: 4,
                gap: gap(2, 3)
            }
        );
        assert_eq!(d.observe(2), Observation::Healed { number: 2, delta: -3 });
        assert_eq!(d.observe(2), Observation::Duplicate { number: 2, delta: -3 });
    }

    #[test]
    fn extreme_values_do_not_panic() {
        let mut d = GapDetector::new();
        assert_eq!(d.check(i64::MAX), i64::MAX - 1);
        assert_eq!(d.expected_number(), i64::MAX);
        assert!(d.check(i64::MIN) < 0);
    }

    #[test]
    fn repeated_max_is_duplicate() {
        let mut d = GapDetector::new();
        assert_eq!(d.check(i64::MAX), i64::MAX - 1);
        assert_eq!(
            d.observe(i64::MAX),
            Observation::Duplicate {
                number: i64::MAX,
                delta: -1
            }
        );
        assert_eq!(d.check(i64::MAX), -1);
        assert_eq!(d.expected_number(), i64::MAX);
        assert_eq!(d.gaps(), &[gap(1, i64::MAX - 1)]);
    }

    #[test]
    fn max_in_order_then_repeated() {
        let mut d = GapDetector::with_state(i64::MAX, Vec::new());
        assert_eq!(d.observe(i64::MAX), Observation::InOrder { number: i64::MAX });
        assert!(matches!(d.observe(i64::MAX), Observation::Duplicate { .. }));
    }

    #[test]
    fn gap_display() {
        assert_eq!(gap(2, 2).to_string(), "[2]");
        assert_eq!(gap(2, 9).to_string(), "[2-9]");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeSet;

        fn assert_invariants(d: &GapDetector) {
            for g in d.gaps() {
                assert!(g.from <= g.to, "{g:?}");
                assert!(g.to < d.expected_number());
            }
            for pair in d.gaps().windows(2) {
                assert!(pair[0].to < pair[1].from, "{pair:?}");
            }
        }

        proptest! {
            #[test]
            fn gaps_stay_ordered_and_disjoint(numbers in prop::collection::vec(0i64..200, 0..300)) {
                let mut d = GapDetector::new();
                for n in numbers {
                    d.check(n);
                    assert_invariants(&d);
                }
            }

            #[test]
            fn gaps_are_exactly_the_unseen_numbers(numbers in prop::collection::vec(1i64..100, 1..200)) {
                let mut d = GapDetector::new();
                let mut seen = BTreeSet::new();
                for n in &numbers {
                    d.check(*n);
                    seen.insert(*n);
                }

                let missing: BTreeSet<i64> = d
                    .gaps()
                    .iter()
                    .flat_map(|g| g.from..=g.to)
                    .collect();
                let max = d.expected_number() - 1;
                let unseen: BTreeSet<i64> = (1..=max).filter(|n| !seen.contains(n)).collect();
                prop_assert_eq!(missing, unseen);
            }

            #[test]
            fn any_permutation_completes(len in 1usize..60, seed in any::<u64>()) {
                // 1..=len을 섞어 넣으면 모든 gap이 해소됨
                let mut numbers: Vec<i64> = (1..=len as i64).collect();
                let mut state = seed;
                for i in (1..numbers.len()).rev() {
                    state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                    let j = (state >> 33) as usize % (i + 1);
                    numbers.swap(i, j);
                }

                let mut d = GapDetector::new();
                for n in numbers {
                    d.check(n);
                }
                prop_assert!(d.is_complete());
                prop_assert_eq!(d.expected_number(), len as i64 + 1);
            }
        }
    }
}
