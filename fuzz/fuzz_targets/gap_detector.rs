#![no_main]

use libfuzzer_sys::fuzz_target;
use loggen_sequence::GapDetector;

fuzz_target!(|numbers: Vec<i64>| {
    let mut detector = GapDetector::new();
    for n in numbers {
        let _ = detector.check(n);

        // 열린 구간은 항상 정렬되어 있고 서로 겹치지 않아야 한다
        let gaps = detector.gaps();
        for pair in gaps.windows(2) {
            assert!(pair[0].to < pair[1].from);
        }
        for gap in gaps {
            assert!(gap.from <= gap.to);
            assert!(gap.to < detector.expected_number());
        }
    }
});
