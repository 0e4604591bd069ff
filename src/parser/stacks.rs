//! 建树工作栈
//!
//! 运算符栈保存 `(` 与待应用的运算符，操作数栈保存已构造的子树。
//! 两个栈都只在一次解析调用内存在。

use tracing::trace;

use crate::ast::{ExprNode, Operator};
use crate::error::{ExprResult, malformed};

/// 运算符栈元素，附带源码偏移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOp {
    Open(usize),
    Apply(Operator, usize),
}

#[derive(Debug, Default)]
pub struct BuildStacks {
    operators: Vec<StackOp>,
    operands: Vec<ExprNode>,
}

impl BuildStacks {
    pub fn push_op(&mut self, op: StackOp) {
        self.operators.push(op);
    }

    pub fn pop_op(&mut self) -> Option<StackOp> {
        self.operators.pop()
    }

    pub fn push_operand(&mut self, node: ExprNode) {
        self.operands.push(node);
    }

    /// 栈顶不是 `(` 且优先级 >= `incoming` 时持续归约
    pub fn reduce_while_binds(&mut self, incoming: Operator) -> ExprResult<()> {
        while let Some(&StackOp::Apply(top, top_loc)) = self.operators.last() {
            if top.precedence() < incoming.precedence() {
                break;
            }
            self.operators.pop();
            self.apply(top, top_loc)?;
        }
        Ok(())
    }

    /// 弹出右、左两个操作数，构造内部节点后压回
    pub fn apply(&mut self, op: Operator, loc: usize) -> ExprResult<()> {
        let right = self.operands.pop();
        let left = self.operands.pop();

        match (left, right) {
            (Some(left), Some(right)) => {
                trace!(op = %op, "reduce");
                self.operands.push(ExprNode::binary(op, left, right));
                Ok(())
            }
            _ => Err(malformed(
                format!("operator '{}' is missing an operand", op),
                Some(loc),
            )),
        }
    }

    pub fn into_operands(self) -> Vec<ExprNode> {
        self.operands
    }
}
