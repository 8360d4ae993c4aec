//! SQL Tokenizer implementation.

use super::{Keyword, LexError, LexErrorKind, Span, Token, TokenKind};

/// A lexer that tokenizes SQL input.
///
/// Unlike a lexer feeding an interpreter, this one never discards input:
/// whitespace and comments come out as trivia tokens so that the original
/// text can be rebuilt exactly from the token stream.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// Sequence index of the next token.
    index: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            index: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        self.peek_nth(1)
    }

    /// Returns the character `n` positions ahead without advancing.
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advances while `pred` holds for the current character.
    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    /// Creates a token covering `start..pos` and bumps the sequence index.
    fn make_token(&mut self, kind: TokenKind) -> Token<'a> {
        let token = Token::new(
            kind,
            &self.input[self.start..self.pos],
            Span::new(self.start, self.pos),
            self.index,
        );
        self.index += 1;
        token
    }

    /// Creates an error located at the start of the current token.
    const fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::new(kind, self.start)
    }

    /// Scans a `--` comment up to, not including, the line break.
    fn scan_line_comment(&mut self) -> TokenKind {
        self.advance_while(|c| c != '\n');
        TokenKind::LineComment
    }

    /// Scans a `/* ... */` comment. The opening `/` is already consumed.
    fn scan_block_comment(&mut self) -> Result<TokenKind, LexError> {
        self.advance(); // *
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return Ok(TokenKind::BlockComment);
                }
                Some(_) => {}
                None => return Err(self.error(LexErrorKind::UnterminatedComment)),
            }
        }
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> TokenKind {
        self.advance_while(|c| c.is_alphanumeric() || c == '_');

        let text = &self.input[self.start..self.pos];
        Keyword::from_str(text).map_or(TokenKind::Identifier, TokenKind::Keyword)
    }

    /// Scans a quoted identifier (e.g., "column name" or `column name`).
    /// The opening quote is already consumed.
    fn scan_quoted_identifier(&mut self, quote: char) -> Result<TokenKind, LexError> {
        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    // A doubled quote is an escaped quote.
                    if self.peek() == Some(quote) {
                        self.advance();
                    } else {
                        return Ok(TokenKind::QuotedIdentifier);
                    }
                }
                Some(_) => {}
                None => return Err(self.error(LexErrorKind::UnterminatedQuotedIdentifier)),
            }
        }
    }

    /// Scans a string literal. The opening quote is already consumed.
    ///
    /// Both SQL-style doubled quotes and Hive backslash escapes are accepted.
    fn scan_string(&mut self, quote: char) -> Result<TokenKind, LexError> {
        loop {
            match self.advance() {
                Some('\\') => {
                    if self.advance().is_none() {
                        return Err(self.error(LexErrorKind::UnterminatedString));
                    }
                }
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.advance();
                    } else {
                        return Ok(TokenKind::String);
                    }
                }
                Some(_) => {}
                None => return Err(self.error(LexErrorKind::UnterminatedString)),
            }
        }
    }

    /// Scans a number (integer, decimal or exponent form, with an optional
    /// Hive type suffix such as `100L` or `1.5BD`).
    fn scan_number(&mut self) -> TokenKind {
        self.advance_while(|c| c.is_ascii_digit());

        // Decimal point
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // consume .
            self.advance_while(|c| c.is_ascii_digit());
        }

        // Exponent, only when digits actually follow
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let digits_at = if self.peek_next().is_some_and(|c| c == '+' || c == '-') {
                2
            } else {
                1
            };
            if self.peek_nth(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digits_at {
                    self.advance();
                }
                self.advance_while(|c| c.is_ascii_digit());
            }
        }

        self.scan_number_suffix();
        TokenKind::Number
    }

    /// Consumes a trailing `L`, `S`, `Y` or `BD` literal suffix.
    fn scan_number_suffix(&mut self) {
        let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
        match self.peek() {
            Some('L' | 'l' | 'S' | 's' | 'Y' | 'y') if !is_word(self.peek_next()) => {
                self.advance();
            }
            Some('B' | 'b')
                if matches!(self.peek_next(), Some('D' | 'd')) && !is_word(self.peek_nth(2)) =>
            {
                self.advance();
                self.advance();
            }
            _ => {}
        }
    }

    /// Scans the next token.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] on an unterminated literal or comment, or on a
    /// character that cannot start any token.
    pub fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        let kind = match c {
            c if c.is_whitespace() => {
                self.advance_while(char::is_whitespace);
                TokenKind::Whitespace
            }

            // Comments
            '-' if self.peek() == Some('-') => self.scan_line_comment(),
            '/' if self.peek() == Some('*') => self.scan_block_comment()?,

            // Single-character tokens
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '~' => TokenKind::BitNot,
            '^' => TokenKind::BitXor,
            '&' => TokenKind::BitAnd,
            '?' => TokenKind::Question,
            '@' => TokenKind::At,

            // Potentially multi-character tokens
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.pos = self.start;
                self.scan_number()
            }
            '.' => TokenKind::Dot,
            ':' => {
                if self.peek() == Some(':') {
                    self.advance();
                    TokenKind::DoubleColon
                } else {
                    TokenKind::Colon
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    if self.peek() == Some('>') {
                        self.advance();
                        TokenKind::NullSafeEq
                    } else {
                        TokenKind::LtEq
                    }
                }
                Some('>') => {
                    self.advance();
                    TokenKind::NotEq
                }
                Some('<') => {
                    self.advance();
                    TokenKind::LeftShift
                }
                _ => TokenKind::Lt,
            },
            '>' => match self.peek() {
                Some('=') => {
                    self.advance();
                    TokenKind::GtEq
                }
                Some('>') => {
                    self.advance();
                    TokenKind::RightShift
                }
                _ => TokenKind::Gt,
            },
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    TokenKind::Concat
                } else {
                    TokenKind::BitOr
                }
            }

            // String literals
            '\'' => self.scan_string('\'')?,

            // Quoted identifiers
            '"' | '`' => self.scan_quoted_identifier(c)?,

            // Numbers
            c if c.is_ascii_digit() => {
                self.pos = self.start;
                self.scan_number()
            }

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => {
                self.pos = self.start;
                self.scan_identifier()
            }

            other => return Err(self.error(LexErrorKind::UnexpectedCharacter(other))),
        };

        Ok(self.make_token(kind))
    }

    /// Tokenizes the entire input and returns all tokens, trivia included,
    /// terminated by a single [`TokenKind::Eof`] token.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered.
    pub fn tokenize(&mut self) -> Result<Vec<Token<'a>>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}
