#[cfg(test)]
mod tests {
    use tabula::catalog::{Symbol, SymbolKind};
    use tabula::{IndexError, PrefixIndex};

    fn sym(name: &str) -> Symbol {
        Symbol::builtin(name, format!("description of {name}"), SymbolKind::Function)
    }

    fn build(words: &[&str]) -> PrefixIndex {
        let mut index = PrefixIndex::new();
        for word in words {
            index.insert(word, sym(word)).unwrap();
        }
        index.prepare_for_search();
        index
    }

    fn matches(index: &PrefixIndex, prefix: &str) -> Vec<String> {
        index
            .search_by_prefix(prefix)
            .map(|s| s.name.clone())
            .collect()
    }

    const WORDS: &[&str] = &[
        "CALCULATE",
        "CALCULATETABLE",
        "COUNT",
        "COUNTROWS",
        "SUM",
        "SUMX",
        "SWITCH",
        "[M Decimal]",
        "[M1]",
        "[Measure With Spaces]",
        "[c]",
    ];

    #[test]
    fn test_prefix_completeness() {
        let index = build(WORDS);

        // For every prefix of every word, the result set must be exactly
        // the stored words starting with that prefix, no omissions or
        // duplicates, in lexicographic order.
        for word in WORDS {
            for end in 1..=word.len() {
                if !word.is_char_boundary(end) {
                    continue;
                }
                let prefix = &word[..end];
                let mut expected: Vec<String> = WORDS
                    .iter()
                    .filter(|w| w.starts_with(prefix))
                    .map(|w| w.to_string())
                    .collect();
                expected.sort();

                assert_eq!(
                    matches(&index, prefix),
                    expected,
                    "prefix {prefix:?} returned the wrong set"
                );
            }
        }
    }

    #[test]
    fn test_exact_search_finds_only_whole_words() {
        let index = build(WORDS);
        assert!(index.search_exact("CALCULATE").is_some());
        assert!(index.search_exact("CALC").is_none());
        assert!(index.search_exact("CALCULATED").is_none());
    }

    #[test]
    fn test_insert_after_seal_fails_without_changing_results() {
        let mut index = build(&["SUM", "SUMX"]);
        let before = matches(&index, "");

        let result = index.insert("MIN", sym("MIN"));
        assert!(matches!(result, Err(IndexError::Sealed)));
        assert_eq!(matches(&index, ""), before);
        assert!(index.search_exact("MIN").is_none());
    }

    #[test]
    fn test_measure_prefix_scenario() {
        let index = build(WORDS);
        // '[M ' sorts before '[M1' because space precedes '1'.
        assert_eq!(
            matches(&index, "[M"),
            vec!["[M Decimal]", "[M1]", "[Measure With Spaces]"]
        );
    }

    #[test]
    fn test_search_is_restartable() {
        let index = build(WORDS);
        let first: Vec<String> = matches(&index, "C");
        let second: Vec<String> = matches(&index, "C");
        assert_eq!(first, second);
    }

    #[test]
    fn test_lazy_iteration_can_stop_early() {
        let index = build(WORDS);
        let first_two: Vec<String> = index
            .search_by_prefix("")
            .take(2)
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(first_two.len(), 2);
        assert_eq!(first_two, matches(&index, "")[..2].to_vec());
    }

    #[test]
    fn test_prepare_on_empty_index() {
        let mut index = PrefixIndex::new();
        index.prepare_for_search();
        assert!(index.is_sealed());
        assert!(index.is_empty());
        assert!(matches(&index, "anything").is_empty());
    }
}
