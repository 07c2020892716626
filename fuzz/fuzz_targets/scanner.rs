#![no_main]

use libfuzzer_sys::fuzz_target;
use loggen_template::scanner::{find_tag, rsplit_top_level_once, scan, split_top_level};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // 모든 `{` 위치에서 스캔해도 패닉 없이 Ok 또는 Err을 반환해야 한다
    for (open, _) in text.match_indices('{') {
        if let Ok(end) = scan(text, open) {
            assert!(end > open && end <= text.len());
            assert!(text[..end].ends_with('}'));
        }
    }

    let _ = find_tag(text, "random");
    let parts = split_top_level(text, ",");
    assert_eq!(parts.iter().map(|p| p.len()).sum::<usize>() + parts.len() - 1, text.len());
    let _ = rsplit_top_level_once(text, '/');
});
