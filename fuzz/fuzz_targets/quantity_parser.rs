#![no_main]

use libfuzzer_sys::fuzz_target;
use healthswap_engine::{compare_quantities, parse_quantity};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Some(q) = parse_quantity(&text) {
        assert!(q.normalized.is_finite() && q.normalized > 0.0);
        assert!(!q.display.is_empty());

        // 자기 자신과의 비교는 항상 0%
        if let Some(c) = compare_quantities(&q, &q, 5.0) {
            assert_eq!(c.diff_percent, 0);
        }
    }
});
