#![no_main]

use arbitrary::Arbitrary;
use chrono::{FixedOffset, TimeZone};
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::StdRng;

use loggen_template::{EngineConfig, GenerationContext, Translations, substitute_with};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    template: String,
    /// 번역 맵 (키/값)
    translations: Vec<(String, String)>,
    seed: u64,
}

/// 출력 크기를 폭발시키는 입력(큰 수, 중첩 반복)과 파일 접근은 건너뛴다
fn is_unbounded(text: &str) -> bool {
    let mut run = 0;
    for c in text.chars() {
        run = if c.is_ascii_digit() { run + 1 } else { 0 };
        if run > 2 {
            return true;
        }
    }
    text.matches("repeat").count() > 2 || text.contains("oneFromFile")
}

fuzz_target!(|input: FuzzInput| {
    let translations: Translations = input.translations.into_iter().take(8).collect();
    let mut combined = input.template.clone();
    combined.extend(translations.values().map(String::as_str));
    if is_unbounded(&combined) {
        return;
    }
    let config = EngineConfig {
        max_passes: 64,
        max_depth: 16,
    };
    let Some(instant) = FixedOffset::east_opt(0)
        .and_then(|tz| tz.with_ymd_and_hms(2024, 1, 15, 12, 30, 45).single())
    else {
        return;
    };
    let mut rng = StdRng::seed_from_u64(input.seed);
    let ctx = GenerationContext::new();

    // 크래시나 패닉 없이 Ok 또는 Err을 반환해야 한다
    let _ = substitute_with(
        &ctx,
        &config,
        &input.template,
        &translations,
        instant,
        &mut rng,
    );
});
