use crate::util::chars::{is_digit, is_hex};

/// The predefined named entities. There is no way to declare more.
static ENTITIES: &[(&str, char)] = &[
    ("quot", '"'),
    ("apos", '\''),
    ("lt", '<'),
    ("gt", '>'),
    ("amp", '&'),
];

/// The base of a numeric character reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    /// `&#33;`
    Decimal,

    /// `&#x21;`
    Hexadecimal,
}

impl Radix {
    /// Checks if `c` is a valid digit in this base
    pub fn accepts(self, c: char) -> bool {
        match self {
            Radix::Decimal => is_digit(c),
            Radix::Hexadecimal => is_hex(c),
        }
    }

    fn base(self) -> u32 {
        match self {
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }
}

/// Resolves a named entity (without `&` and `;`)
pub fn named(name: &str) -> Option<char> {
    ENTITIES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
}

/// Decodes the digits of a numeric character reference. Returns [`None`]
/// if `digits` is empty, contains a character that is not a digit in the
/// given base, or does not denote a Unicode scalar value.
pub fn numeric(digits: &str, radix: Radix) -> Option<char> {
    if digits.is_empty() || !digits.chars().all(|c| radix.accepts(c)) {
        return None;
    }
    u32::from_str_radix(digits, radix.base())
        .ok()
        .and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use assertor::{assert_that, OptionAssertion};

    use super::{named, numeric, Radix};

    #[test]
    fn named_entities() {
        let decoded: String = ["amp", "lt", "gt", "quot", "apos"]
            .iter()
            .filter_map(|n| named(n))
            .collect();
        assert_eq!(decoded, "&<>\"'");
        assert_that!(named("nbsp")).is_none();
        assert_that!(named("AMP")).is_none();
    }

    #[test]
    fn decimal() {
        assert_that!(numeric("33", Radix::Decimal)).has_value('!');
        assert_that!(numeric("8776", Radix::Decimal)).has_value('≈');
        assert_that!(numeric("3a", Radix::Decimal)).is_none();
        assert_that!(numeric("", Radix::Decimal)).is_none();
        assert_that!(numeric("+33", Radix::Decimal)).is_none();
    }

    #[test]
    fn hexadecimal() {
        assert_that!(numeric("21", Radix::Hexadecimal)).has_value('!');
        assert_that!(numeric("1F600", Radix::Hexadecimal)).has_value('😀');
        assert_that!(numeric("2g", Radix::Hexadecimal)).is_none();
    }

    #[test]
    fn out_of_range() {
        // surrogates and values above U+10FFFF are not characters
        assert_that!(numeric("D800", Radix::Hexadecimal)).is_none();
        assert_that!(numeric("110000", Radix::Hexadecimal)).is_none();
        assert_that!(numeric("99999999999", Radix::Decimal)).is_none();
    }
}
