//! Payload splitting and count record parsing.

/// Split `payload` into chunks of `chunk_size` characters; the last chunk
/// holds the remainder.
///
/// Splits fall on character boundaries, so multi-byte characters are never
/// divided. An empty payload yields no chunks. `chunk_size` must be positive.
pub fn split_chunks(payload: &str, chunk_size: usize) -> Vec<&str> {
    debug_assert!(chunk_size > 0, "chunk_size must be positive");
    let mut chunks = Vec::new();
    let mut rest = payload;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(chunk_size)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

/// Outcome of parsing a count record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParsedCount {
    Count(usize),
    /// Not a number, negative, or too large.
    Invalid,
}

/// Parse a count record with leading-integer semantics.
///
/// Leading whitespace and an optional sign are accepted, then the longest
/// run of ASCII digits is read and anything after it ignored, so `"2abc"`
/// counts as 2. No digits, a negative value, or overflow is invalid. `"-0"`
/// is zero.
pub fn parse_count(raw: &str) -> ParsedCount {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return ParsedCount::Invalid;
    }
    match digits.parse::<usize>() {
        Ok(0) => ParsedCount::Count(0),
        Ok(_) if negative => ParsedCount::Invalid,
        Ok(n) => ParsedCount::Count(n),
        Err(_) => ParsedCount::Invalid,
    }
}
