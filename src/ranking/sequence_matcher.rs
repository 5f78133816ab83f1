//! Ratcliff-Obershelp sequence similarity.
//!
//! Same block-matching rules as Python's `difflib.SequenceMatcher` with no junk
//! predicate and `autojunk` enabled, so ratios are comparable with scores
//! computed by that library. The acceptance threshold in the ranker depends on
//! this exact measure.

use std::collections::HashMap;

/// A run of equal elements: `a[a_start..a_start + size] == b[b_start..b_start + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Compare two strings character by character
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    /// Positions of each non-popular element of `b`
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        // autojunk: drop very frequent elements of long sequences from the index
        let n = b.len();
        if n >= 200 {
            let ntest = n / 100 + 1;
            b2j.retain(|_, idxs| idxs.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchingBlock {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        // j2len[j] = length of the longest match ending at a[i-1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut newj2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    newj2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = newj2len;
        }

        // Popular elements are not indexed but may still extend a match
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        MatchingBlock {
            a_start: besti,
            b_start: bestj,
            size: bestsize,
        }
    }

    /// All matching blocks, sorted, with adjacent blocks merged
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.size);
            blocks.push(block);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        blocks.sort();

        let mut merged: Vec<MatchingBlock> = Vec::with_capacity(blocks.len());
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged
    }

    /// 2*M / T, where M is the number of matched characters and T the total length
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|b| b.size).sum();
        2.0 * matches as f64 / total as f64
    }
}

/// Case-insensitive similarity ratio of two names (0.0 - 1.0)
pub fn similarity(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(&a.to_lowercase(), &b.to_lowercase()).ratio()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_and_disjoint() {
        assert_eq!(similarity("Château Margaux 2015", "château margaux 2015"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_known_ratios() {
        assert_eq!(similarity("abcd", "bcde"), 0.75);
        assert_eq!(similarity("ab", "ba"), 0.5);
        // 19 shared characters out of 40
        assert_eq!(similarity("Château Margaux 2015", "Château Margaux 2010"), 0.95);
    }

    #[test]
    fn test_matching_blocks() {
        let sm = SequenceMatcher::new("abxcd", "abcd");
        assert_eq!(
            sm.matching_blocks(),
            vec![
                MatchingBlock { a_start: 0, b_start: 0, size: 2 },
                MatchingBlock { a_start: 3, b_start: 2, size: 2 },
            ]
        );
    }

    #[test]
    fn test_longest_match_prefers_earliest() {
        let sm = SequenceMatcher::new("ab ab", "ab");
        let block = sm.find_longest_match(0, 5, 0, 2);
        assert_eq!(block, MatchingBlock { a_start: 0, b_start: 0, size: 2 });
    }

    #[test]
    fn test_autojunk_long_sequences() {
        // 'a' is popular in b (more than 200/100 + 1 occurrences) and is not
        // indexed; the lone 'b' still anchors a match that extends over it.
        let b = format!("{}b{}", "a".repeat(150), "a".repeat(60));
        let sm = SequenceMatcher::new("aba", &b);
        let blocks = sm.matching_blocks();
        assert_eq!(blocks, vec![MatchingBlock { a_start: 0, b_start: 149, size: 3 }]);
    }
}
