//! Lexer for MiniLang
//!
//! Converts UTF-8 source text into a flat token stream ending in exactly one
//! `Eof` token. Operates byte-wise (source is required to be ASCII outside
//! of string literal contents, which pass UTF-8 bytes through untouched).

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Float(f64),
    Str(String),
    Identifier(String),

    // Keywords
    Let,
    Global,
    If,
    Then,
    Else,
    End,
    While,
    Do,
    Print,
    Func,
    Return,
    Struct,
    Ref,
    Break,
    Zeros,
    IntType,
    FloatType,
    StringType,
    StrType,
    VoidType,
    BoolType,
    True,
    False,
    Null,

    // Two-char operators
    Gte,
    Lte,
    EqEq,
    Neq,
    Arrow,
    Concat,

    // Single-char operators / delimiters
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Gt,
    Lt,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Dot,
    Amp,
    Pipe,
    Bang,

    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lex error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

fn keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "let" => Let,
        "global" => Global,
        "if" => If,
        "then" => Then,
        "else" => Else,
        "end" => End,
        "while" => While,
        "do" => Do,
        "print" => Print,
        "func" => Func,
        "return" => Return,
        "struct" => Struct,
        "ref" => Ref,
        "break" => Break,
        "zeros" => Zeros,
        "int" => IntType,
        "float" => FloatType,
        "string" => StringType,
        "str" => StrType,
        "void" => VoidType,
        "bool" => BoolType,
        "true" => True,
        "false" => False,
        "null" => Null,
        _ => return None,
    })
}

/// Lexes `source` into a token stream, or the first `LexError` encountered.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Lexer {
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let (line, column) = (self.line, self.column);
            match self.current() {
                None => {
                    tokens.push(Token {
                        kind: TokenKind::Eof,
                        line,
                        column,
                    });
                    break;
                }
                Some(b'"') => tokens.push(self.read_string()?),
                Some(c) if c.is_ascii_digit() => tokens.push(self.read_number()),
                Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                    tokens.push(self.read_identifier())
                }
                Some(_) => tokens.push(self.read_operator()?),
            }
        }
        Ok(tokens)
    }

    fn current(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    fn advance(&mut self) {
        if self.current() == Some(b'\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += 1;
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.current() {
                Some(c) if c.is_ascii_whitespace() => self.advance(),
                Some(b'/') if self.peek() == Some(b'/') => {
                    while self.current().is_some() && self.current() != Some(b'\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let (line, column) = (self.line, self.column);
        self.advance(); // opening quote
        let mut value = Vec::new();
        loop {
            match self.current() {
                None => {
                    return Err(LexError {
                        line,
                        column,
                        message: "unterminated string literal".to_string(),
                    });
                }
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(b'\\') => {
                    self.advance();
                    match self.current() {
                        None => {
                            return Err(LexError {
                                line,
                                column,
                                message: "unterminated string literal".to_string(),
                            });
                        }
                        Some(b'n') => value.push(b'\n'),
                        Some(b't') => value.push(b'\t'),
                        Some(b'"') => value.push(b'"'),
                        Some(b'\\') => value.push(b'\\'),
                        Some(b'0') => value.push(0),
                        Some(other) => value.push(other),
                    }
                    self.advance();
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
        let text = String::from_utf8_lossy(&value).into_owned();
        Ok(Token {
            kind: TokenKind::Str(text),
            line,
            column,
        })
    }

    fn read_number(&mut self) -> Token {
        let (line, column) = (self.line, self.column);
        let start = self.pos;
        let mut seen_dot = false;
        loop {
            match self.current() {
                Some(c) if c.is_ascii_digit() => self.advance(),
                Some(b'.') if !seen_dot => {
                    seen_dot = true;
                    self.advance();
                }
                _ => break,
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap();
        let kind = if seen_dot {
            TokenKind::Float(text.parse().unwrap_or(0.0))
        } else {
            TokenKind::Int(text.parse().unwrap_or(0))
        };
        Token { kind, line, column }
    }

    fn read_identifier(&mut self) -> Token {
        let (line, column) = (self.line, self.column);
        let start = self.pos;
        loop {
            match self.current() {
                Some(c) if c.is_ascii_alphanumeric() || c == b'_' => self.advance(),
                _ => break,
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .unwrap()
            .to_string();
        let kind = keyword(&text).unwrap_or(TokenKind::Identifier(text));
        Token { kind, line, column }
    }

    fn read_operator(&mut self) -> Result<Token, LexError> {
        use TokenKind::*;
        let (line, column) = (self.line, self.column);
        let c = self.current().unwrap();
        let two = self.peek().map(|p| (c, p));
        let (kind, width) = match two {
            Some((b'>', b'=')) => (Gte, 2),
            Some((b'<', b'=')) => (Lte, 2),
            Some((b'=', b'=')) => (EqEq, 2),
            Some((b'!', b'=')) => (Neq, 2),
            Some((b'-', b'>')) => (Arrow, 2),
            Some((b'+', b'+')) => (Concat, 2),
            _ => (
                match c {
                    b'+' => Plus,
                    b'-' => Minus,
                    b'*' => Star,
                    b'/' => Slash,
                    b'%' => Percent,
                    b'=' => Assign,
                    b'>' => Gt,
                    b'<' => Lt,
                    b'(' => LParen,
                    b')' => RParen,
                    b'[' => LBracket,
                    b']' => RBracket,
                    b',' => Comma,
                    b':' => Colon,
                    b'.' => Dot,
                    b'&' => Amp,
                    b'|' => Pipe,
                    b'!' => Bang,
                    other => {
                        return Err(LexError {
                            line,
                            column,
                            message: format!("unknown character '{}'", other as char),
                        });
                    }
                },
                1,
            ),
        };
        for _ in 0..width {
            self.advance();
        }
        Ok(Token { kind, line, column })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn ends_with_single_eof() {
        let toks = tokenize("let x: int = 1").unwrap();
        assert_eq!(toks.last().unwrap().kind, Eof);
        assert_eq!(toks.iter().filter(|t| t.kind == Eof).count(), 1);
    }

    #[test]
    fn positions_are_monotonic() {
        let toks = tokenize("let\nx: int = 1").unwrap();
        for pair in toks.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!((a.line, a.column) <= (b.line, b.column));
        }
    }

    #[test]
    fn two_char_operators_take_priority() {
        assert_eq!(kinds(">="), vec![Gte, Eof]);
        assert_eq!(kinds("->"), vec![Arrow, Eof]);
        assert_eq!(kinds("++"), vec![Concat, Eof]);
        assert_eq!(kinds("--"), vec![Minus, Minus, Eof]);
    }

    #[test]
    fn string_escapes() {
        let toks = tokenize(r#""a\nb\tc\"d\\e\0f""#).unwrap();
        assert_eq!(toks[0].kind, Str("a\nb\tc\"d\\e\0f".to_string()));
    }

    #[test]
    fn unknown_escape_passes_through_literal_byte() {
        let toks = tokenize(r#""\q""#).unwrap();
        assert_eq!(toks[0].kind, Str("q".to_string()));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(tokenize(r#""abc"#).is_err());
    }

    #[test]
    fn float_requires_digit_after_dot() {
        assert_eq!(kinds("3.14"), vec![Float(3.14), Eof]);
        assert_eq!(kinds("1.2.3"), vec![Float(1.2), Dot, Int(3), Eof]);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(kinds("let struct ref"), vec![Let, Struct, Ref, Eof]);
        assert_eq!(
            kinds("foo_bar1"),
            vec![Identifier("foo_bar1".to_string()), Eof]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("1 // trailing\n2"), vec![Int(1), Int(2), Eof]);
    }
}
