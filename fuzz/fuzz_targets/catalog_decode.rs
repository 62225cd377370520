#![no_main]

use libfuzzer_sys::fuzz_target;
use healthswap_engine::catalog::decode_search_response;

fuzz_target!(|data: &[u8]| {
    if let Ok(products) = decode_search_response("fuzz", data) {
        for p in &products {
            assert!(!p.barcode.is_empty());
        }
    }
});
