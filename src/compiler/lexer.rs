//! This lexer tokenizes hlx gate sources.
use std::fmt;

/// The glyph that opens an action line.
pub const BULLET: char = '•';

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    GateOpen,
    GateEnd,
    Init,
    Fuse,
    When,
    Identifier,
    // Number, Str, Semicolon, Dash and Whitespace are reserved.
    // The lexer never produces them.
    #[allow(dead_code)]
    Number,
    #[allow(dead_code)]
    Str,
    Colon,
    Bullet,
    #[allow(dead_code)]
    Semicolon,
    #[allow(dead_code)]
    Dash,
    Operator,
    Newline,
    #[allow(dead_code)]
    Whitespace,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TokenKind::*;
        let name = match self {
            GateOpen   => "GATE",
            GateEnd    => "END",
            Init       => "INIT",
            Fuse       => "FUSE",
            When       => "WHEN",
            Identifier => "IDENT",
            Number     => "NUMBER",
            Str        => "STRING",
            Colon      => "COLON",
            Bullet     => "BULLET",
            Semicolon  => "SEMI",
            Dash       => "DASH",
            Operator   => "OP",
            Newline    => "NEWLINE",
            Whitespace => "SPACE",
            Eof        => "EOF",
        };
        write!(f, "{}", name)
    }
}

/// A token and the 1-based position of its first character.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind:   TokenKind,
    pub value:  String,
    pub line:   usize,
    pub column: usize,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, value: S, line: usize, column: usize) -> Self {
        Token{kind, value: value.into(), line, column}
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{} {} `{}`", self.line, self.column, self.kind, self.value.escape_debug())
    }
}

/// A character the lexer threw away.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Dropped {
    pub character: char,
    pub line:      usize,
    pub column:    usize,
}

/// Tokenizes a whole source, always ending with exactly one EOF token.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).run().0
}

pub struct Lexer {
    source:  Vec<char>,
    pos:     usize,
    line:    usize,
    column:  usize,
    // The colon split off the end of an identifier run, if any.
    pending: Option<Token>,
    dropped: Vec<Dropped>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer{
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            pending: None,
            dropped: Vec::new(),
        }
    }

    /// Run the lexer, consuming itself and returning the tokens
    /// alongside every character it discarded.
    pub fn run(mut self) -> (Vec<Token>, Vec<Dropped>) {
        let mut tokens: Vec<Token> = Vec::with_capacity(self.source.len() / 2 + 1);
        loop {
            let tok = self.next_token();
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }

        if !self.dropped.is_empty() {
            debug!("lexer dropped {} unrecognized character(s)", self.dropped.len());
        }
        (tokens, self.dropped)
    }

    pub fn next_token(&mut self) -> Token {
        if let Some(tok) = self.pending.take() {
            return tok;
        }

        loop {
            self.skip_whitespace();
            let (line, column) = (self.line, self.column);

            let c = match self.peek() {
                Some(c) => c,
                None => return Token::new(TokenKind::Eof, "", line, column),
            };

            if c.is_alphabetic() || c == ':' {
                return self.identifier();
            }

            match c {
                '\n' => {
                    self.get();
                    return Token::new(TokenKind::Newline, "\\n", line, column);
                },
                BULLET => {
                    self.get();
                    return Token::new(TokenKind::Bullet, BULLET.to_string(), line, column);
                },
                '=' | '@' | '%' => return self.operator(),
                _ => {
                    self.get();
                    debug!("{}:{}: dropping unrecognized character {:?}", line, column, c);
                    self.dropped.push(Dropped{character: c, line, column});
                },
            }
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    /// Consumes one character, keeping the line and column current.
    fn get(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() || c == '\n' {
                break;
            }
            self.get();
        }
    }

    fn identifier(&mut self) -> Token {
        let (line, column) = (self.line, self.column);
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if !is_identifier_char(c) {
                break;
            }
            value.push(c);
            self.get();
        }

        if value == ":" {
            return Token::new(TokenKind::Colon, value, line, column);
        }

        // `main:` is the name `main` followed by a colon.
        if value.ends_with(':') && value.chars().any(|c| c != ':') {
            value.pop();
            let colon_column = column + value.chars().count();
            self.pending = Some(Token::new(TokenKind::Colon, ":", line, colon_column));
        }

        let kind = keyword(&value).unwrap_or(TokenKind::Identifier);
        Token::new(kind, value, line, column)
    }

    fn operator(&mut self) -> Token {
        let (line, column) = (self.line, self.column);
        let mut op = String::with_capacity(2);
        if let Some(c) = self.get() {
            op.push(c);
        }
        if self.peek() == Some('=') {
            op.push('=');
            self.get();
        }
        Token::new(TokenKind::Operator, op, line, column)
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == ':' || c == '='
}

fn keyword(value: &str) -> Option<TokenKind> {
    match value {
        "::gate" => Some(TokenKind::GateOpen),
        "::end"  => Some(TokenKind::GateEnd),
        "init"   => Some(TokenKind::Init),
        "::fuse" => Some(TokenKind::Fuse),
        "when"   => Some(TokenKind::When),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::TokenKind::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).iter().map(|t| t.kind).collect()
    }

    fn values(source: &str) -> Vec<String> {
        tokenize(source).into_iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_keyword() {
        assert_eq!(keyword("::gate"), Some(GateOpen));
        assert_eq!(keyword("::end"), Some(GateEnd));
        assert_eq!(keyword("init"), Some(Init));
        assert_eq!(keyword("::fuse"), Some(Fuse));
        assert_eq!(keyword("when"), Some(When));

        assert_eq!(keyword("gate"), None);
        assert_eq!(keyword("INIT"), None);
        assert_eq!(keyword(" when"), None);
        assert_eq!(keyword(""), None);
    }

    #[test]
    fn test_always_ends_with_one_eof() {
        for source in &["", "   ", "\n\n", "@@@", "::gate main:\n::end", "1200 > 3", "•"] {
            let toks = tokenize(source);
            assert_eq!(toks.last().map(|t| t.kind), Some(Eof), "source {:?}", source);
            assert_eq!(toks.iter().filter(|t| t.kind == Eof).count(), 1, "source {:?}", source);
        }
    }

    #[test]
    fn test_positions() {
        let toks = tokenize("ab\n  cd\n\ne");
        assert_eq!(toks, vec![
            Token::new(Identifier, "ab", 1, 1),
            Token::new(Newline, "\\n", 1, 3),
            Token::new(Identifier, "cd", 2, 3),
            Token::new(Newline, "\\n", 2, 5),
            Token::new(Newline, "\\n", 3, 1),
            Token::new(Identifier, "e", 4, 1),
            Token::new(Eof, "", 4, 2),
        ]);
    }

    #[test]
    fn test_bullet_counts_as_one_column() {
        let toks = tokenize("• x");
        assert_eq!(toks[0], Token::new(Bullet, "•", 1, 1));
        assert_eq!(toks[1], Token::new(Identifier, "x", 1, 3));
    }

    #[test]
    fn test_identifier_run() {
        assert_eq!(values("load.env"), vec!["load.env", ""]);
        assert_eq!(values("set.mode=SAFE"), vec!["set.mode=SAFE", ""]);
        assert_eq!(values("a_b:c.d"), vec!["a_b:c.d", ""]);
        assert_eq!(kinds("ch4 x9"), vec![Identifier, Identifier, Eof]);
    }

    #[test]
    fn test_trailing_colon_is_split() {
        let toks = tokenize("main:");
        assert_eq!(toks, vec![
            Token::new(Identifier, "main", 1, 1),
            Token::new(Colon, ":", 1, 5),
            Token::new(Eof, "", 1, 6),
        ]);

        assert_eq!(kinds("init:"), vec![Init, Colon, Eof]);
        assert_eq!(kinds("::gate:"), vec![GateOpen, Colon, Eof]);
        assert_eq!(kinds(":"), vec![Colon, Eof]);
        // A run made only of colons stays whole.
        assert_eq!(values("::"), vec!["::", ""]);
    }

    #[test]
    fn test_keywords_lex_from_colon() {
        assert_eq!(kinds("::gate ::fuse when ::end init"), vec![GateOpen, Fuse, When, GateEnd, Init, Eof]);
        assert_eq!(kinds("::gated"), vec![Identifier, Eof]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(kinds("a = b"), vec![Identifier, Operator, Identifier, Eof]);
        assert_eq!(values("x @ch4"), vec!["x", "@", "ch4", ""]);
        assert_eq!(values("x == y"), vec!["x", "==", "y", ""]);
        assert_eq!(values("%= @="), vec!["%=", "@=", ""]);
    }

    #[test]
    fn test_unknown_characters_are_dropped() {
        let (toks, dropped) = Lexer::new("clock > 1200:").run();
        assert_eq!(toks, vec![
            Token::new(Identifier, "clock", 1, 1),
            Token::new(Colon, ":", 1, 13),
            Token::new(Eof, "", 1, 14),
        ]);
        let chars: String = dropped.iter().map(|d| d.character).collect();
        assert_eq!(chars, ">1200");
        assert_eq!(dropped[0], Dropped{character: '>', line: 1, column: 7});
    }

    #[test]
    fn test_newline_value_is_escaped() {
        let toks = tokenize("a\nb");
        assert_eq!(toks[1].kind, Newline);
        assert_eq!(toks[1].value, "\\n");
        assert!(!toks.iter().any(|t| t.value.contains('\n')));
    }

    #[test]
    fn test_carriage_return_is_whitespace() {
        assert_eq!(kinds("a\r\nb"), vec![Identifier, Newline, Identifier, Eof]);
    }

    #[test]
    fn test_tokenize() {
        let src = "::gate main:\n   init:\n      • load.env\n      • set.mode = SAFE\n::end";
        assert_eq!(tokenize(src), vec![
            Token::new(GateOpen, "::gate", 1, 1),
            Token::new(Identifier, "main", 1, 8),
            Token::new(Colon, ":", 1, 12),
            Token::new(Newline, "\\n", 1, 13),
            Token::new(Init, "init", 2, 4),
            Token::new(Colon, ":", 2, 8),
            Token::new(Newline, "\\n", 2, 9),
            Token::new(Bullet, "•", 3, 7),
            Token::new(Identifier, "load.env", 3, 9),
            Token::new(Newline, "\\n", 3, 17),
            Token::new(Bullet, "•", 4, 7),
            Token::new(Identifier, "set.mode", 4, 9),
            Token::new(Operator, "=", 4, 18),
            Token::new(Identifier, "SAFE", 4, 20),
            Token::new(Newline, "\\n", 4, 24),
            Token::new(GateEnd, "::end", 5, 1),
            Token::new(Eof, "", 5, 6),
        ]);
    }
}
