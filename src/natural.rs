//! Natural string ordering: `img2` sorts before `img10`.
//!
//! Follows the classic `strnatcmp` rules. A digit run starting with `0` is
//! a fraction and compares left-aligned, so `02` sorts before `1`. Other runs
//! compare by magnitude. Whitespace is skipped, and leading zeros are ignored
//! only at the very start of a string.

use std::cmp::Ordering;

/// Compare two strings naturally. Ties under `strnatcmp` (for example
/// strings differing only in whitespace) fall back to byte order so the
/// result is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    strnatcmp(a.as_bytes(), b.as_bytes()).then_with(|| a.cmp(b))
}

/// Byte at `i`, or NUL past the end.
fn at(s: &[u8], i: usize) -> u8 {
    s.get(i).copied().unwrap_or(0)
}

fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

fn ends(a: &[u8], i: usize, b: &[u8], j: usize) -> Option<Ordering> {
    match (i >= a.len(), j >= b.len()) {
        (true, true) => Some(Ordering::Equal),
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        (false, false) => None,
    }
}

fn strnatcmp(a: &[u8], b: &[u8]) -> Ordering {
    if a.is_empty() || b.is_empty() {
        return a.len().cmp(&b.len());
    }

    let (mut i, mut j) = (0, 0);
    while at(a, i) == b'0' && at(a, i + 1).is_ascii_digit() {
        i += 1;
    }
    while at(b, j) == b'0' && at(b, j + 1).is_ascii_digit() {
        j += 1;
    }

    loop {
        while is_space(at(a, i)) {
            i += 1;
        }
        while is_space(at(b, j)) {
            j += 1;
        }

        let (ca, cb) = (at(a, i), at(b, j));
        if ca.is_ascii_digit() && cb.is_ascii_digit() {
            let ord = if ca == b'0' || cb == b'0' {
                compare_left(a, &mut i, b, &mut j)
            } else {
                compare_right(a, &mut i, b, &mut j)
            };
            if ord != Ordering::Equal {
                return ord;
            }
            if let Some(ord) = ends(a, i, b, j) {
                return ord;
            }
        }

        match at(a, i).cmp(&at(b, j)) {
            Ordering::Equal => {}
            ord => return ord,
        }

        i += 1;
        j += 1;
        if let Some(ord) = ends(a, i, b, j) {
            return ord;
        }
    }
}

/// Left-aligned runs: the first differing digit wins.
fn compare_left(a: &[u8], i: &mut usize, b: &[u8], j: &mut usize) -> Ordering {
    loop {
        let (ca, cb) = (at(a, *i), at(b, *j));
        match (ca.is_ascii_digit(), cb.is_ascii_digit()) {
            (false, false) => return Ordering::Equal,
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            (true, true) => match ca.cmp(&cb) {
                Ordering::Equal => {}
                ord => return ord,
            },
        }
        *i += 1;
        *j += 1;
    }
}

/// Right-aligned runs: the longer run wins, else the first differing digit.
fn compare_right(a: &[u8], i: &mut usize, b: &[u8], j: &mut usize) -> Ordering {
    let mut bias = Ordering::Equal;
    loop {
        let (ca, cb) = (at(a, *i), at(b, *j));
        match (ca.is_ascii_digit(), cb.is_ascii_digit()) {
            (false, false) => return bias,
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            (true, true) => {
                if bias == Ordering::Equal {
                    bias = ca.cmp(&cb);
                }
            }
        }
        *i += 1;
        *j += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<&str>) -> Vec<&str> {
        v.sort_by(|a, b| natural_cmp(a, b));
        v
    }

    #[test]
    fn test_numeric_runs() {
        assert_eq!(
            sorted(vec!["img10.png", "img2.png", "img1.png"]),
            vec!["img1.png", "img2.png", "img10.png"]
        );
    }

    #[test]
    fn test_zero_prefixed_runs_compare_left_aligned() {
        assert_eq!(natural_cmp("/a/02.png", "/a/1.png"), Ordering::Less);
        assert_eq!(natural_cmp("/a/1.png", "/a/02.png"), Ordering::Greater);
        assert_eq!(natural_cmp("a01", "a1"), Ordering::Less);
        assert_eq!(natural_cmp("a007", "a10"), Ordering::Less);
        assert_eq!(natural_cmp("1.05", "1.5"), Ordering::Less);
    }

    #[test]
    fn test_leading_zeros_at_string_start() {
        assert_eq!(strnatcmp(b"007", b"7"), Ordering::Equal);
        assert_eq!(strnatcmp(b"02", b"10"), Ordering::Less);
        assert_eq!(natural_cmp("007", "7"), Ordering::Less);
    }

    #[test]
    fn test_whitespace_skipped() {
        assert_eq!(strnatcmp(b"a  2", b"a2"), Ordering::Equal);
        assert_eq!(strnatcmp(b"x 10", b"x9"), Ordering::Greater);
    }

    #[test]
    fn test_prefix_and_case() {
        assert_eq!(natural_cmp("a", "ab"), Ordering::Less);
        assert_eq!(natural_cmp("B", "a"), Ordering::Less);
        assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }

    #[test]
    fn test_full_paths() {
        assert_eq!(
            sorted(vec!["/x/assets/9.jpg", "/x/assets/10.jpg", "/x/assets/1.jpg"]),
            vec!["/x/assets/1.jpg", "/x/assets/9.jpg", "/x/assets/10.jpg"]
        );
    }
}
