//! Comparison helpers for titles, group names and response codes.

use std::cmp::Ordering;

/// Case-insensitive comparison with lowercase ordered before uppercase on ties.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| b.cmp(a))
}

/// Unicode case-insensitive equality, e.g. for tag names.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Numeric-aware comparison for response codes.
///
/// Digit runs compare by value (`2` < `10`), and an `X` wildcard inside a
/// code sorts after every concrete digit in the same position, so `200` <
/// `2XX` < `404`. Codes sort before words such as `default`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let chunks_a = chunks(a);
    let chunks_b = chunks(b);
    for (left, right) in chunks_a.iter().zip(chunks_b.iter()) {
        let ordering = match (left, right) {
            (Chunk::Code(l), Chunk::Code(r)) => code_cmp(l, r),
            (Chunk::Code(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Code(_)) => Ordering::Greater,
            (Chunk::Text(l), Chunk::Text(r)) => locale_cmp(l, r),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    chunks_a.len().cmp(&chunks_b.len()).then_with(|| a.cmp(b))
}

#[derive(Debug, PartialEq)]
enum Chunk<'a> {
    /// Starts with a digit, continues through digits and `X` wildcards.
    Code(&'a str),
    Text(&'a str),
}

fn is_wildcard(c: char) -> bool {
    c == 'X' || c == 'x'
}

fn chunks(input: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut rest = input;
    while let Some(first) = rest.chars().next() {
        let end = if first.is_ascii_digit() {
            rest.find(|c: char| !c.is_ascii_digit() && !is_wildcard(c))
        } else {
            rest.find(|c: char| c.is_ascii_digit())
        }
        .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(end);
        out.push(if first.is_ascii_digit() {
            Chunk::Code(head)
        } else {
            Chunk::Text(head)
        });
        rest = tail;
    }
    out
}

fn code_cmp(a: &str, b: &str) -> Ordering {
    let trimmed_a = trim_leading_zeros(a);
    let trimmed_b = trim_leading_zeros(b);
    trimmed_a
        .len()
        .cmp(&trimmed_b.len())
        .then_with(|| {
            trimmed_a
                .chars()
                .map(code_rank)
                .cmp(trimmed_b.chars().map(code_rank))
        })
        .then_with(|| a.len().cmp(&b.len()))
}

fn trim_leading_zeros(code: &str) -> &str {
    let trimmed = code.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}

fn code_rank(c: char) -> u32 {
    c.to_digit(10).unwrap_or(10)
}
