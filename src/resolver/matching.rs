use std::path::{Path, PathBuf};

use crate::library::stem_of;

/// Trim, lowercase and collapse every whitespace run to a single space.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First candidate whose normalized stem equals `wanted`, else the first one
/// where either contains the other. `wanted` must already be normalized.
pub fn find_local_match<'a>(wanted: &str, candidates: &'a [PathBuf]) -> Option<&'a PathBuf> {
    let stems: Vec<String> = candidates.iter().map(|p| normalized_stem(p)).collect();

    stems
        .iter()
        .position(|stem| stem == wanted)
        .or_else(|| {
            stems
                .iter()
                .position(|stem| stem.contains(wanted) || (!stem.is_empty() && wanted.contains(stem.as_str())))
        })
        .map(|i| &candidates[i])
}

fn normalized_stem(path: &Path) -> String {
    normalize(&stem_of(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("/m").join(n)).collect()
    }

    #[test]
    fn normalize_trims_lowercases_and_collapses() {
        assert_eq!(normalize("  Daft   Punk\t- One  More Time "), "daft punk - one more time");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn exact_match_wins_over_earlier_substring_match() {
        let c = paths(&["Around the World (Remix).mp3", "around  the world.m4a"]);
        assert_eq!(find_local_match("around the world", &c), Some(&c[1]));
    }

    #[test]
    fn substring_matches_in_either_direction() {
        let c = paths(&["Harder_Better_Faster.mp3", "One More Time.m4a"]);
        assert_eq!(find_local_match("one more", &c), Some(&c[1]));
        assert_eq!(find_local_match("daft punk one more time live", &c), Some(&c[1]));
    }

    #[test]
    fn no_match_is_none() {
        let c = paths(&["Alpha.mp3"]);
        assert_eq!(find_local_match("beta", &c), None);
        assert_eq!(find_local_match("beta", &[]), None);
    }
}
