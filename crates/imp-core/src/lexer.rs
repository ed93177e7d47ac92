//! Lexer for the imp concrete syntax
//!
//! Tokenizes imp source with the logos crate. Whitespace and `#` line
//! comments are skipped.

use logos::Logos;

/// imp tokens
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token<'a> {
    #[token("skip")]
    Skip,

    #[token("print_state")]
    PrintState,

    #[token("havoc")]
    Havoc,

    #[token("assert")]
    Assert,

    #[token("assume")]
    Assume,

    #[token("if")]
    If,

    #[token("then")]
    Then,

    #[token("else")]
    Else,

    #[token("while")]
    While,

    #[token("inv")]
    Inv,

    #[token("do")]
    Do,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("not")]
    Not,

    #[token("and")]
    And,

    #[token("or")]
    Or,

    #[token(":=")]
    Assign,

    #[token(";")]
    Semi,

    #[token(",")]
    Comma,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("<=")]
    Le,

    #[token("<")]
    Lt,

    #[token("=")]
    Eq,

    #[token(">=")]
    Ge,

    #[token(">")]
    Gt,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    /// Integer literal; the parser rejects literals outside `i64`
    #[regex(r"[0-9]+", |lex| lex.slice())]
    Int(&'a str),

    /// Identifier; keywords win by logos token priority
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice())]
    Ident(&'a str),
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Skip => write!(f, "skip"),
            Token::PrintState => write!(f, "print_state"),
            Token::Havoc => write!(f, "havoc"),
            Token::Assert => write!(f, "assert"),
            Token::Assume => write!(f, "assume"),
            Token::If => write!(f, "if"),
            Token::Then => write!(f, "then"),
            Token::Else => write!(f, "else"),
            Token::While => write!(f, "while"),
            Token::Inv => write!(f, "inv"),
            Token::Do => write!(f, "do"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Not => write!(f, "not"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Assign => write!(f, ":="),
            Token::Semi => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Le => write!(f, "<="),
            Token::Lt => write!(f, "<"),
            Token::Eq => write!(f, "="),
            Token::Ge => write!(f, ">="),
            Token::Gt => write!(f, ">"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Int(s) => write!(f, "{}", s),
            Token::Ident(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokens() {
        let input = "x := 10";
        let mut lexer = Token::lexer(input);

        assert_eq!(lexer.next(), Some(Ok(Token::Ident("x"))));
        assert_eq!(lexer.next(), Some(Ok(Token::Assign)));
        assert_eq!(lexer.next(), Some(Ok(Token::Int("10"))));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_keywords_vs_identifiers() {
        let input = "while whilex inv invariant";
        let mut lexer = Token::lexer(input);

        assert_eq!(lexer.next(), Some(Ok(Token::While)));
        assert_eq!(lexer.next(), Some(Ok(Token::Ident("whilex"))));
        assert_eq!(lexer.next(), Some(Ok(Token::Inv)));
        assert_eq!(lexer.next(), Some(Ok(Token::Ident("invariant"))));
    }

    #[test]
    fn test_relational_operators() {
        let input = "<= < = >= >";
        let mut lexer = Token::lexer(input);

        assert_eq!(lexer.next(), Some(Ok(Token::Le)));
        assert_eq!(lexer.next(), Some(Ok(Token::Lt)));
        assert_eq!(lexer.next(), Some(Ok(Token::Eq)));
        assert_eq!(lexer.next(), Some(Ok(Token::Ge)));
        assert_eq!(lexer.next(), Some(Ok(Token::Gt)));
    }

    #[test]
    fn test_comments() {
        let input = "skip # trailing comment\n; skip";
        let mut lexer = Token::lexer(input);

        assert_eq!(lexer.next(), Some(Ok(Token::Skip)));
        assert_eq!(lexer.next(), Some(Ok(Token::Semi)));
        assert_eq!(lexer.next(), Some(Ok(Token::Skip)));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_unrecognized_input() {
        let mut lexer = Token::lexer("x @ y");
        assert_eq!(lexer.next(), Some(Ok(Token::Ident("x"))));
        assert_eq!(lexer.next(), Some(Err(())));
    }
}
