//! Reserved words recognized inside default expressions

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    True,
    False,
    Null,
    Div,
    Mod,
}

impl Keyword {
    pub fn all() -> &'static [Keyword] {
        &[
            Keyword::True,
            Keyword::False,
            Keyword::Null,
            Keyword::Div,
            Keyword::Mod,
        ]
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::Null => "NULL",
            Keyword::Div => "DIV",
            Keyword::Mod => "MOD",
        };
        write!(f, "{}", text)
    }
}
