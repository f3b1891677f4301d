//! Edit distance between two words.

/// Levenshtein distance over Unicode scalar values.
///
/// ## Algorithm
/// Classic dynamic programme where insertion, deletion and substitution all
/// cost 1, keeping only two rows of the matrix.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Edit-distance budget for comparing two words whose longer length is
/// `length`: short words must match exactly, medium words tolerate one typo,
/// longer words one typo per four characters, never more than `threshold`.
pub fn adjusted_threshold(threshold: usize, length: usize) -> usize {
    if length <= 3 {
        0
    } else if length <= 5 {
        threshold.min(1)
    } else {
        threshold.min(length / 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: [&str; 8] = ["", "a", "cat", "bat", "kitten", "sitting", "flaw", "lawn"];

    #[test]
    fn test_known_distances() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("flaw", "lawn"), 2);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("cat", "bat"), 1);
        assert_eq!(levenshtein_distance("naïve", "naive"), 1);
    }

    #[test]
    fn test_identity_and_symmetry() {
        for x in WORDS {
            assert_eq!(levenshtein_distance(x, x), 0);
            for y in WORDS {
                assert_eq!(levenshtein_distance(x, y), levenshtein_distance(y, x));
            }
        }
    }

    #[test]
    fn test_triangle_inequality() {
        for x in WORDS {
            for y in WORDS {
                for z in WORDS {
                    assert!(
                        levenshtein_distance(x, z)
                            <= levenshtein_distance(x, y) + levenshtein_distance(y, z)
                    );
                }
            }
        }
    }

    #[test]
    fn test_adjusted_threshold() {
        assert_eq!(adjusted_threshold(5, 3), 0);
        assert_eq!(adjusted_threshold(5, 4), 1);
        assert_eq!(adjusted_threshold(0, 5), 0);
        assert_eq!(adjusted_threshold(5, 8), 2);
        assert_eq!(adjusted_threshold(1, 12), 1);
    }
}
