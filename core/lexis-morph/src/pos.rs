use lexis_protocol::PosSet;

/// Candidate parts of speech signalled by a suffix. Unknown suffixes map to
/// the empty set.
pub fn pos_for_suffix(suffix: &str) -> PosSet {
    match suffix {
        "ly" => PosSet::ADVERB,
        "ness" | "tion" | "sion" | "ment" | "ity" => PosSet::NOUN,
        "er" => PosSet::NOUN | PosSet::ADJECTIVE,
        "est" | "able" | "ible" | "ful" | "less" | "ous" | "ive" | "al" => PosSet::ADJECTIVE,
        "ed" => PosSet::VERB | PosSet::ADJECTIVE,
        "ing" => PosSet::VERB | PosSet::NOUN | PosSet::ADJECTIVE,
        "s" | "es" => PosSet::NOUN | PosSet::VERB,
        "ize" | "ise" => PosSet::VERB,
        _ => PosSet::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::SUFFIXES;

    #[test]
    fn test_every_default_suffix_is_mapped() {
        for (suffix, _) in SUFFIXES {
            assert!(!pos_for_suffix(suffix).is_empty(), "no POS for -{suffix}");
        }
    }

    #[test]
    fn test_unmapped_suffix() {
        assert!(pos_for_suffix("ward").is_empty());
        assert!(pos_for_suffix("").is_empty());
    }
}
