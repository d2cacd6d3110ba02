//! Character classes used by the scanner. Only ASCII characters are
//! considered letters or digits.

pub const LANGLE: char = '<';
pub const RANGLE: char = '>';
pub const SLASH: char = '/';
pub const EQUAL: char = '=';
pub const MARK: char = '?';
pub const BANG: char = '!';
pub const HYPHEN: char = '-';
pub const UNDERSCORE: char = '_';
pub const LSQUARE: char = '[';
pub const RSQUARE: char = ']';
pub const COLON: char = ':';
pub const AMPERSAND: char = '&';
pub const SEMICOLON: char = ';';
pub const POUND: char = '#';

pub fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Characters allowed after the first letter of a name
pub fn is_name(c: char) -> bool {
    is_letter(c) || is_digit(c) || c == HYPHEN || c == UNDERSCORE
}

pub fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

pub fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

#[cfg(test)]
mod tests {
    use assertor::{assert_that, BooleanAssertion};

    use super::{is_blank, is_hex, is_letter, is_name, is_quote};

    #[test]
    fn classes() {
        assert_that!(is_letter('z')).is_true();
        assert_that!(is_letter('é')).is_false();
        assert_that!(is_hex('F')).is_true();
        assert_that!(is_hex('g')).is_false();
        assert_that!(is_name('-')).is_true();
        assert_that!(is_name('_')).is_true();
        assert_that!(is_name(':')).is_false();
        assert_that!(is_quote('\'')).is_true();
        assert_that!(is_blank('\r')).is_true();
        assert_that!(is_blank('\u{a0}')).is_false();
    }
}
