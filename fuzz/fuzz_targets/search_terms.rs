#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use healthswap_engine::extract_search_terms;
use healthswap_engine::search_terms::MAX_SEARCH_TERMS;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    name: String,
    categories: Option<String>,
}

fuzz_target!(|input: FuzzInput| {
    let terms = extract_search_terms(&input.name, input.categories.as_deref());

    assert!(terms.len() <= MAX_SEARCH_TERMS);
    for (i, term) in terms.iter().enumerate() {
        assert!(!term.trim().is_empty());
        assert!(!terms[..i].contains(term), "duplicate term {term:?}");
    }
});
