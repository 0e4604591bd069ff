//! 语法分析模块
//!
//! 单次从左到右扫描 token 流，用运算符栈和操作数栈（调度场算法）构造表达式树。

mod stacks;

use tracing::{debug, trace};

use crate::ast::ExprNode;
use crate::error::{ExprResult, malformed, unbalanced};
use crate::lexer::{self, SpannedToken, Token};
use stacks::{BuildStacks, StackOp};

pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    end: usize,
    stacks: BuildStacks,
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>, source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end: source_len,
            stacks: BuildStacks::default(),
        }
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// 当前 token 的偏移；越过末尾时为源文本长度
    pub fn current_loc(&self) -> usize {
        self.tokens.get(self.pos).map(|t| t.offset).unwrap_or(self.end)
    }

    pub fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// 构造整棵树，消耗解析器
    pub fn parse(mut self) -> ExprResult<ExprNode> {
        while let Some(token) = self.current_token().cloned() {
            let loc = self.current_loc();
            trace!(?token, loc, "shift");

            match token {
                Token::LParen => self.stacks.push_op(StackOp::Open(loc)),
                Token::Operand(text) => self.stacks.push_operand(ExprNode::Operand(text)),
                Token::RParen => self.close_group(loc)?,
                other => {
                    // 词法分析只产生括号、操作数和五种运算符
                    let op = other
                        .operator()
                        .ok_or_else(|| malformed(format!("unexpected token {:?}", other), Some(loc)))?;
                    self.stacks.reduce_while_binds(op)?;
                    self.stacks.push_op(StackOp::Apply(op, loc));
                }
            }

            self.advance();
        }

        self.finish()
    }

    /// 遇到 `)`：归约直到弹出匹配的 `(`
    fn close_group(&mut self, loc: usize) -> ExprResult<()> {
        loop {
            match self.stacks.pop_op() {
                Some(StackOp::Open(_)) => return Ok(()),
                Some(StackOp::Apply(op, op_loc)) => self.stacks.apply(op, op_loc)?,
                None => return Err(unbalanced("')' has no matching '('", loc)),
            }
        }
    }

    /// 扫描结束：应用剩余运算符，操作数栈必须恰好剩一个节点
    fn finish(mut self) -> ExprResult<ExprNode> {
        while let Some(item) = self.stacks.pop_op() {
            match item {
                StackOp::Apply(op, loc) => self.stacks.apply(op, loc)?,
                StackOp::Open(loc) => return Err(unbalanced("'(' is never closed", loc)),
            }
        }

        let mut operands = self.stacks.into_operands();
        match operands.len() {
            1 => operands.pop().ok_or_else(|| malformed("empty operand stack", None)),
            0 => Err(malformed("expression has no operands", Some(self.end))),
            n => Err(malformed(
                format!("{} operands left without an operator joining them", n),
                None,
            )),
        }
    }
}

/// 解析表达式文本，返回表达式树根节点
pub fn parse(source: &str) -> ExprResult<ExprNode> {
    let tokens = lexer::lex(source)?;
    debug!(tokens = tokens.len(), "building expression tree");
    Parser::new(tokens, source.len()).parse()
}
