//! Lexer (tokenizer) for the netlist DSL.

use crate::error::{GridError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier (component name, switch state keyword)
    Identifier,
    /// A number (integer or floating point, possibly with suffix)
    Number,
    /// A directive (starts with '.')
    Directive,
    /// Coordinate separator ','
    Comma,
    /// Newline
    Newline,
    /// End of file
    Eof,
}

/// Lexer for tokenizing netlist input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;
        let token = |kind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let Some(&ch) = self.chars.peek() else {
            return Ok(token(TokenKind::Eof, String::new()));
        };

        let tok = match ch {
            '\n' => {
                self.advance();
                token(TokenKind::Newline, "\n".to_string())
            }
            ',' => {
                self.advance();
                token(TokenKind::Comma, ",".to_string())
            }
            '.' => {
                self.advance();
                let text = self.read_identifier();
                token(TokenKind::Directive, format!(".{}", text))
            }
            '-' | '+' | '0'..='9' => token(TokenKind::Number, self.read_number()),
            _ if ch.is_alphabetic() || ch == '_' => {
                token(TokenKind::Identifier, self.read_identifier())
            }
            _ => {
                return Err(GridError::lexer(
                    line,
                    column,
                    format!("unexpected character '{}'", ch),
                ));
            }
        };

        Ok(tok)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else if ch == '#' || ch == ';' {
                // Skip comment until end of line
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_while(&mut self, text: &mut String, pred: impl Fn(char) -> bool) {
        while let Some(&ch) = self.chars.peek() {
            if !pred(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        self.read_while(&mut text, |ch| ch.is_alphanumeric() || ch == '_');
        text
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();

        // Optional sign
        if let Some(&ch) = self.chars.peek() {
            if ch == '-' || ch == '+' {
                text.push(ch);
                self.advance();
            }
        }

        // Integer part
        self.read_while(&mut text, |ch| ch.is_ascii_digit());

        // Decimal part
        if let Some(&'.') = self.chars.peek() {
            text.push('.');
            self.advance();
            self.read_while(&mut text, |ch| ch.is_ascii_digit());
        }

        // Exponent part
        if let Some(&ch) = self.chars.peek() {
            if ch == 'e' || ch == 'E' {
                text.push(ch);
                self.advance();
                if let Some(&sign) = self.chars.peek() {
                    if sign == '-' || sign == '+' {
                        text.push(sign);
                        self.advance();
                    }
                }
                self.read_while(&mut text, |ch| ch.is_ascii_digit());
            }
        }

        // Unit suffix (p, n, u, m, k, M, G)
        if let Some(&ch) = self.chars.peek() {
            if is_unit_suffix(ch) {
                text.push(ch);
                self.advance();
            }
        }

        text
    }
}

fn is_unit_suffix(ch: char) -> bool {
    matches!(ch, 'p' | 'n' | 'u' | 'µ' | 'm' | 'k' | 'K' | 'M' | 'G')
}

/// Parse a number string with optional unit suffix.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let last = text.chars().last()?;

    let multiplier = match last {
        'p' => 1e-12,
        'n' => 1e-9,
        'u' | 'µ' => 1e-6,
        'm' => 1e-3,
        'k' | 'K' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        _ => 1.0,
    };
    let num_str = if is_unit_suffix(last) {
        &text[..text.len() - last.len_utf8()]
    } else {
        text
    };

    num_str.parse::<f64>().ok().map(|v| v * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            out.push(tok.kind);
            if tok.kind == TokenKind::Eof {
                return out;
            }
        }
    }

    #[test]
    fn test_parse_value() {
        assert_relative_eq!(parse_value("10k").unwrap(), 10_000.0);
        assert_relative_eq!(parse_value("4.7").unwrap(), 4.7);
        assert_relative_eq!(parse_value("1M").unwrap(), 1e6);
        assert_relative_eq!(parse_value("500m").unwrap(), 0.5);
        assert_relative_eq!(parse_value("1e-3").unwrap(), 1e-3);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value(""), None);
    }

    #[test]
    fn test_lexer_component_line() {
        use TokenKind::*;
        assert_eq!(
            kinds("R1 0,0 2,-1 100 # load\n"),
            vec![Identifier, Number, Comma, Number, Number, Comma, Number, Number, Newline, Eof]
        );
    }

    #[test]
    fn test_lexer_directive_and_position() {
        let mut lexer = Lexer::new("\n  .wire 0,0 3,0");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Newline);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Directive);
        assert_eq!(tok.text, ".wire");
        assert_eq!((tok.line, tok.column), (2, 3));
    }

    #[test]
    fn test_lexer_rejects_garbage() {
        let mut lexer = Lexer::new("R1 @");
        lexer.next_token().unwrap();
        assert!(matches!(
            lexer.next_token(),
            Err(GridError::LexerError { line: 1, column: 4, .. })
        ));
    }
}
