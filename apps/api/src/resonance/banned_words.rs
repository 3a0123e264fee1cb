/// Returns the banned words that occur in `draft`, in the brand's list order.
///
/// Matching is a case-insensitive literal substring test with no word
/// boundaries, so banning "ass" also flags "class". Blank entries are skipped:
/// an empty needle is a substring of every draft and would flag everything.
pub fn find_banned_words(draft: &str, banned_words: &[String]) -> Vec<String> {
    let haystack = draft.to_lowercase();
    banned_words
        .iter()
        .filter(|word| {
            let needle = word.to_lowercase();
            !needle.trim().is_empty() && haystack.contains(&needle)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_case_insensitive_match() {
        let found = find_banned_words("This is Awesome", &words(&["awesome"]));
        assert_eq!(found, words(&["awesome"]));
    }

    #[test]
    fn test_substring_match_without_word_boundary() {
        let found = find_banned_words("Join our masterclass", &words(&["ass"]));
        assert_eq!(found, words(&["ass"]));
    }

    #[test]
    fn test_preserves_list_order_and_original_casing() {
        let found = find_banned_words(
            "cheap deals, SIMPLE pricing",
            &words(&["Simple", "luxury", "cheap"]),
        );
        assert_eq!(found, words(&["Simple", "cheap"]));
    }

    #[test]
    fn test_blank_entries_never_match() {
        assert!(find_banned_words("anything", &words(&["", "  "])).is_empty());
    }

    #[test]
    fn test_no_banned_words() {
        assert!(find_banned_words("Hello world", &[]).is_empty());
    }
}
