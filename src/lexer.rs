//! 词法分析
//!
//! 把表达式文本切分为操作数、运算符和括号。操作数是最长的连续字母数字串。

use logos::Logos;

use crate::ast::Operator;
use crate::error::{ExprError, ExprResult};

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[regex(r"[A-Za-z0-9]+", |lex| lex.slice().to_owned())]
    Operand(String),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

impl Token {
    /// 运算符 token 对应的运算符
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Token::Plus => Some(Operator::Add),
            Token::Minus => Some(Operator::Sub),
            Token::Star => Some(Operator::Mul),
            Token::Slash => Some(Operator::Div),
            Token::Caret => Some(Operator::Pow),
            _ => None,
        }
    }
}

/// 带源码偏移的 token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub offset: usize,
}

/// 词法分析入口
pub fn lex(source: &str) -> ExprResult<Vec<SpannedToken>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let offset = lexer.span().start;
        match result {
            Ok(token) => tokens.push(SpannedToken { token, offset }),
            Err(()) => {
                let ch = lexer.slice().chars().next().unwrap_or('\u{FFFD}');
                return Err(ExprError::UnexpectedCharacter { ch, offset });
            }
        }
    }

    Ok(tokens)
}
