//! Percent-escape handling for authorization codes.
//!
//! LinkedIn codes only ever escape a handful of reserved characters, so decoding is limited to
//! exactly those ten escapes. Anything else, `%20` included, is left as-is.

const RESERVED_ESCAPES: [(&str, char); 10] = [
    ("%24", '$'),
    ("%26", '&'),
    ("%2B", '+'),
    ("%2C", ','),
    ("%2F", '/'),
    ("%3A", ':'),
    ("%3B", ';'),
    ("%3D", '='),
    ("%3F", '?'),
    ("%40", '@'),
];

/// Decode the reserved escapes in an authorization code.
///
/// Replacement runs until none of the ten escapes remain. Only uppercase escapes are
/// recognized.
pub fn decode_code(encoded: &str) -> String {
    let mut decoded = encoded.to_string();

    loop {
        let mut changed = false;
        for (escape, character) in RESERVED_ESCAPES {
            if decoded.contains(escape) {
                decoded = decoded.replace(escape, character.encode_utf8(&mut [0; 4]));
                changed = true;
            }
        }
        if !changed {
            return decoded;
        }
    }
}

/// Escape the ten reserved characters, leaving everything else untouched.
pub fn encode_code(code: &str) -> String {
    let mut encoded = String::with_capacity(code.len());
    for character in code.chars() {
        match RESERVED_ESCAPES
            .iter()
            .find(|(_, reserved)| *reserved == character)
        {
            Some((escape, _)) => encoded.push_str(escape),
            None => encoded.push(character),
        }
    }
    encoded
}
