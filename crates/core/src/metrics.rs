//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `loggen_`
//! - 모듈명: `template_`, `sequence_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(loggen_core::metrics::TEMPLATE_LINES_RENDERED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 에러 종류 레이블 키 (malformed_tag, file_not_found, io)
pub const LABEL_KIND: &str = "kind";

// ─── Template 메트릭 ────────────────────────────────────────────────

/// Template: 렌더링된 라인 수 (counter)
pub const TEMPLATE_LINES_RENDERED_TOTAL: &str = "loggen_template_lines_rendered_total";

/// Template: 치환 실패 수 (counter, label: kind)
pub const TEMPLATE_ERRORS_TOTAL: &str = "loggen_template_errors_total";

/// Template: 파일 캐시에 적재된 파일 수 (counter)
pub const TEMPLATE_FILES_LOADED_TOTAL: &str = "loggen_template_files_loaded_total";

// ─── Sequence 메트릭 ────────────────────────────────────────────────

/// Sequence: 검사한 라인 수 (counter)
pub const SEQUENCE_LINES_CHECKED_TOTAL: &str = "loggen_sequence_lines_checked_total";

/// Sequence: 새로 열린 gap 수 (counter)
pub const SEQUENCE_GAPS_OPENED_TOTAL: &str = "loggen_sequence_gaps_opened_total";

/// Sequence: 늦게 도착해 gap을 메운 번호 수 (counter)
pub const SEQUENCE_GAPS_HEALED_TOTAL: &str = "loggen_sequence_gaps_healed_total";

/// Sequence: 이미 확인된 번호의 중복 도착 수 (counter)
pub const SEQUENCE_DUPLICATES_TOTAL: &str = "loggen_sequence_duplicates_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::describe_counter;

    // Template
    describe_counter!(
        TEMPLATE_LINES_RENDERED_TOTAL,
        "Total number of template lines rendered to a fixed point"
    );
    describe_counter!(
        TEMPLATE_ERRORS_TOTAL,
        "Total number of substitution calls rejected with a malformed tag"
    );
    describe_counter!(
        TEMPLATE_FILES_LOADED_TOTAL,
        "Total number of files loaded into the pick-line cache"
    );

    // Sequence
    describe_counter!(
        SEQUENCE_LINES_CHECKED_TOTAL,
        "Total number of lines whose sequence number was checked"
    );
    describe_counter!(
        SEQUENCE_GAPS_OPENED_TOTAL,
        "Total number of forward jumps that opened a missing-number gap"
    );
    describe_counter!(
        SEQUENCE_GAPS_HEALED_TOTAL,
        "Total number of late arrivals that filled a missing number"
    );
    describe_counter!(
        SEQUENCE_DUPLICATES_TOTAL,
        "Total number of numbers seen again after already being accounted for"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_metric_names_use_prefix() {
        let names = [
            TEMPLATE_LINES_RENDERED_TOTAL,
            TEMPLATE_ERRORS_TOTAL,
            TEMPLATE_FILES_LOADED_TOTAL,
            SEQUENCE_LINES_CHECKED_TOTAL,
            SEQUENCE_GAPS_OPENED_TOTAL,
            SEQUENCE_GAPS_HEALED_TOTAL,
            SEQUENCE_DUPLICATES_TOTAL,
        ];
        for name in names {
            assert!(name.starts_with("loggen_"), "{name}");
            assert!(name.ends_with("_total"), "{name}");
        }
    }

    #[test]
    fn describe_all_without_recorder_is_noop() {
        describe_all();
    }
}
