//! Stateless input predicates.
//!
//! Both functions are total: any string yields true or false, never a panic.
//! The engine calls them before touching the store.

/// Luhn check over a string of ASCII digits.
///
/// Walking from the second-to-last digit toward the first, every other
/// digit (starting with the second-to-last) is doubled, with 9 subtracted
/// when the result exceeds 9.
pub fn is_valid_card_number(number: &str) -> bool {
    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = number.bytes().map(|b| u32::from(b - b'0')).collect();
    let Some((check_digit, body)) = digits.split_last() else {
        return false;
    };

    let checksum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(pos, &d)| match (pos % 2, d) {
            (0, d) if d > 4 => d * 2 - 9,
            (0, d)          => d * 2,
            (_, d)          => d,
        })
        .sum();

    (checksum + check_digit) % 10 == 0
}

/// Dotted-quad IPv4 address: exactly four decimal octets in 0..=255.
pub fn is_valid_ip(ip: &str) -> bool {
    let parts: Vec<&str> = ip.split('.').collect();
    parts.len() == 4
        && parts.iter().all(|part| {
            !part.is_empty()
                && part.bytes().all(|b| b.is_ascii_digit())
                && part.parse::<u8>().is_ok()
        })
}
