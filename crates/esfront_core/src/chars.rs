//! Character classification used by the tokenizer.

use unicode_xid::UnicodeXID;

pub const LINE_FEED: char = '\n';
pub const CARRIAGE_RETURN: char = '\r';
pub const LINE_SEPARATOR: char = '\u{2028}';
pub const PARAGRAPH_SEPARATOR: char = '\u{2029}';
pub const NO_BREAK_SPACE: char = '\u{a0}';
pub const ZERO_WIDTH_NON_JOINER: char = '\u{200c}';
pub const ZERO_WIDTH_JOINER: char = '\u{200d}';

/// Check if a character is a line terminator.
#[inline]
pub fn is_new_line(ch: char) -> bool {
    matches!(ch, LINE_FEED | CARRIAGE_RETURN | LINE_SEPARATOR | PARAGRAPH_SEPARATOR)
}

/// Whitespace that is neither ASCII nor a line terminator.
#[inline]
pub fn is_non_ascii_whitespace(ch: char) -> bool {
    matches!(
        ch,
        '\u{1680}' | '\u{180e}' | '\u{2000}'..='\u{200a}' | '\u{202f}' | '\u{205f}' | '\u{3000}' | '\u{feff}'
    )
}

/// Whitespace skipped between tokens (line terminators excluded).
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{b}' | '\u{c}' | NO_BREAK_SPACE) || is_non_ascii_whitespace(ch)
}

/// Can `ch` start an identifier?
#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphabetic() || ch == '$' || ch == '_';
    }
    UnicodeXID::is_xid_start(ch)
}

/// Can `ch` continue an identifier?
#[inline]
pub fn is_identifier_char(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphanumeric() || ch == '$' || ch == '_';
    }
    ch == ZERO_WIDTH_NON_JOINER || ch == ZERO_WIDTH_JOINER || UnicodeXID::is_xid_continue(ch)
}

/// Value of an ASCII digit in the given radix, if it is one.
#[inline]
pub fn digit_value(ch: u8, radix: u32) -> Option<u32> {
    let value = match ch {
        b'0'..=b'9' => u32::from(ch - b'0'),
        b'a'..=b'z' => u32::from(ch - b'a') + 10,
        b'A'..=b'Z' => u32::from(ch - b'A') + 10,
        _ => return None,
    };
    (value < radix).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_classes() {
        assert!(is_identifier_start('a'));
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('é'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_char('1'));
        assert!(is_identifier_char(ZERO_WIDTH_JOINER));
        assert!(!is_identifier_char('-'));
    }

    #[test]
    fn test_whitespace_classes() {
        assert!(is_new_line('\u{2028}'));
        assert!(!is_new_line(' '));
        assert!(is_white_space_single_line('\u{3000}'));
        assert!(is_white_space_single_line('\t'));
        assert!(!is_white_space_single_line('\n'));
    }

    #[test]
    fn test_digit_value() {
        assert_eq!(digit_value(b'7', 8), Some(7));
        assert_eq!(digit_value(b'8', 8), None);
        assert_eq!(digit_value(b'f', 16), Some(15));
        assert_eq!(digit_value(b'F', 16), Some(15));
        assert_eq!(digit_value(b'g', 16), None);
    }
}
