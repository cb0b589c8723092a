use std::str::FromStr;

use miette::{Result, miette};

use crate::sql::parser::Keyword;

#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Keyword(Keyword),
    Identifier(&'a str),
    /// Integer literal as written, including a leading `-`.
    Integer(&'a str),
    /// Contents of a double-quoted string, without the quotes.
    String(&'a str),
    /// A run of `=`, `!`, `<`, `>` characters.
    Comparator(&'a str),

    Comma,
    Asterisk,

    LeftParen,
    RightParen,
}

fn is_comparator_char(c: char) -> bool {
    matches!(c, '=' | '!' | '<' | '>')
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub(crate) struct Lexer<'a> {
    pub whole: &'a str,
    pub rest: &'a str,
    pub position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            whole: input,
            rest: input,
            position: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        let non_whitespace_pos = self
            .rest
            .char_indices()
            .find(|(_, ch)| !ch.is_whitespace())
            .map(|(pos, _)| pos)
            .unwrap_or(self.rest.len());

        self.advance(non_whitespace_pos);
    }

    fn advance(&mut self, len: usize) -> &'a str {
        let consumed = &self.rest[..len];
        self.position += len;
        self.rest = &self.rest[len..];
        consumed
    }

    fn consume_while(&mut self, skip: usize, pred: impl Fn(char) -> bool) -> &'a str {
        let end = self.rest[skip..]
            .find(|c: char| !pred(c))
            .map(|pos| pos + skip)
            .unwrap_or(self.rest.len());

        self.advance(end)
    }

    /// Consumes a double-quoted string. The first `"` after the opening one
    /// closes it; there are no escapes.
    fn consume_string(&mut self) -> Result<&'a str> {
        let start = self.position;
        let Some(end_index) = self.rest[1..].find('"') else {
            return Err(miette!(
                "Unterminated string starting at position {} in {:?}",
                start,
                self.whole
            ));
        };

        let string_value = &self.rest[1..end_index + 1];
        self.advance(end_index + 2);

        Ok(string_value)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();

        let char = self.rest.chars().next()?;

        let token = match char {
            ',' => {
                self.advance(1);
                Ok(Token::Comma)
            }
            '*' => {
                self.advance(1);
                Ok(Token::Asterisk)
            }
            '(' => {
                self.advance(1);
                Ok(Token::LeftParen)
            }
            ')' => {
                self.advance(1);
                Ok(Token::RightParen)
            }
            '"' => self.consume_string().map(Token::String),
            _ if is_comparator_char(char) => {
                Ok(Token::Comparator(self.consume_while(0, is_comparator_char)))
            }
            '-' if self.rest[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                Ok(Token::Integer(self.consume_while(1, |c| c.is_ascii_digit())))
            }
            _ if char.is_ascii_digit() => {
                // `2024sales` is a name, `2024` a number.
                let word = self.consume_while(0, is_identifier_char);

                if word.bytes().all(|b| b.is_ascii_digit()) {
                    Ok(Token::Integer(word))
                } else {
                    Ok(Token::Identifier(word))
                }
            }
            _ if char.is_alphabetic() || char == '_' => {
                let word = self.consume_while(0, is_identifier_char);

                match Keyword::from_str(word) {
                    Ok(keyword) => Ok(Token::Keyword(keyword)),
                    Err(_) => Ok(Token::Identifier(word)),
                }
            }
            _ => Err(miette!(
                "Unexpected character '{}' at position {}",
                char,
                self.position
            )),
        };

        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_token_eq(actual: Option<Result<Token>>, expected: Token) {
        match actual {
            Some(Ok(token)) => assert_eq!(token, expected),
            _ => panic!("Expected token {expected:?}, got {actual:?}"),
        }
    }

    #[test]
    fn test_lexer() {
        let mut lexer = Lexer::new("SELECT * FROM users");

        assert_token_eq(lexer.next(), Token::Keyword(Keyword::Select));
        assert_token_eq(lexer.next(), Token::Asterisk);
        assert_token_eq(lexer.next(), Token::Keyword(Keyword::From));
        assert_token_eq(lexer.next(), Token::Identifier("users"));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_lexer_with_spaces() {
        let mut lexer = Lexer::new("  SELECT   *  FROM    users  ");

        assert_token_eq(lexer.next(), Token::Keyword(Keyword::Select));
        assert_token_eq(lexer.next(), Token::Asterisk);
        assert_token_eq(lexer.next(), Token::Keyword(Keyword::From));
        assert_token_eq(lexer.next(), Token::Identifier("users"));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_lexer_keywords_are_case_sensitive() {
        let mut lexer = Lexer::new("select From");

        assert_token_eq(lexer.next(), Token::Identifier("select"));
        assert_token_eq(lexer.next(), Token::Identifier("From"));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_lexer_insert_values() {
        let mut lexer = Lexer::new("INSERT INTO t VALUES (1, \"x y\",-42)");

        assert_token_eq(lexer.next(), Token::Keyword(Keyword::Insert));
        assert_token_eq(lexer.next(), Token::Keyword(Keyword::Into));
        assert_token_eq(lexer.next(), Token::Identifier("t"));
        assert_token_eq(lexer.next(), Token::Keyword(Keyword::Values));
        assert_token_eq(lexer.next(), Token::LeftParen);
        assert_token_eq(lexer.next(), Token::Integer("1"));
        assert_token_eq(lexer.next(), Token::Comma);
        assert_token_eq(lexer.next(), Token::String("x y"));
        assert_token_eq(lexer.next(), Token::Comma);
        assert_token_eq(lexer.next(), Token::Integer("-42"));
        assert_token_eq(lexer.next(), Token::RightParen);
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_lexer_comparators() {
        let mut lexer = Lexer::new("a=1 b != 2 c<3 d>4 e <= 5");

        assert_token_eq(lexer.next(), Token::Identifier("a"));
        assert_token_eq(lexer.next(), Token::Comparator("="));
        assert_token_eq(lexer.next(), Token::Integer("1"));
        assert_token_eq(lexer.next(), Token::Identifier("b"));
        assert_token_eq(lexer.next(), Token::Comparator("!="));
        assert_token_eq(lexer.next(), Token::Integer("2"));
        assert_token_eq(lexer.next(), Token::Identifier("c"));
        assert_token_eq(lexer.next(), Token::Comparator("<"));
        assert_token_eq(lexer.next(), Token::Integer("3"));
        assert_token_eq(lexer.next(), Token::Identifier("d"));
        assert_token_eq(lexer.next(), Token::Comparator(">"));
        assert_token_eq(lexer.next(), Token::Integer("4"));
        assert_token_eq(lexer.next(), Token::Identifier("e"));
        assert_token_eq(lexer.next(), Token::Comparator("<="));
        assert_token_eq(lexer.next(), Token::Integer("5"));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_lexer_digit_led_identifiers() {
        let mut lexer = Lexer::new("2024sales 1st 42 7_ -3x");

        assert_token_eq(lexer.next(), Token::Identifier("2024sales"));
        assert_token_eq(lexer.next(), Token::Identifier("1st"));
        assert_token_eq(lexer.next(), Token::Integer("42"));
        assert_token_eq(lexer.next(), Token::Identifier("7_"));
        // a signed literal never starts a name
        assert_token_eq(lexer.next(), Token::Integer("-3"));
        assert_token_eq(lexer.next(), Token::Identifier("x"));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_lexer_string_ends_at_first_quote() {
        let mut lexer = Lexer::new("\"ab\"cd\"");

        assert_token_eq(lexer.next(), Token::String("ab"));
        assert_token_eq(lexer.next(), Token::Identifier("cd"));
        assert!(matches!(lexer.next(), Some(Err(_))));
    }

    #[test]
    fn test_lexer_unexpected_character() {
        let mut lexer = Lexer::new("SELECT ; FROM");

        assert_token_eq(lexer.next(), Token::Keyword(Keyword::Select));
        assert!(matches!(lexer.next(), Some(Err(_))));
    }
}
