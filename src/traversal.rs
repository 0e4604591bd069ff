//! 树遍历
//!
//! 前序（波兰式）、中序、后序三种遍历。每种遍历返回 token 序列，
//! 字符串形式用单个空格连接，叶子的遍历结果就是其自身的值。
//! 中序结果不重新插入括号。

use crate::ast::ExprNode;

/// 遍历顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Prefix,
    Infix,
    Postfix,
}

impl Order {
    pub const ALL: [Order; 3] = [Order::Prefix, Order::Infix, Order::Postfix];
}

/// 显式栈中的待办项
enum Frame<'a> {
    /// 展开子树
    Visit(&'a ExprNode),
    /// 输出节点自身的值
    Emit(&'a ExprNode),
}

pub fn prefix_tokens(node: &ExprNode) -> Vec<&str> {
    let mut out = Vec::new();
    walk(Some(node), Order::Prefix, &mut out);
    out
}

pub fn infix_tokens(node: &ExprNode) -> Vec<&str> {
    let mut out = Vec::new();
    walk(Some(node), Order::Infix, &mut out);
    out
}

pub fn postfix_tokens(node: &ExprNode) -> Vec<&str> {
    let mut out = Vec::new();
    walk(Some(node), Order::Postfix, &mut out);
    out
}

/// 按给定顺序遍历；`None` 产生空序列
pub fn tokens(node: Option<&ExprNode>, order: Order) -> Vec<&str> {
    let mut out = Vec::new();
    walk(node, order, &mut out);
    out
}

pub fn prefix(node: &ExprNode) -> String {
    prefix_tokens(node).join(" ")
}

pub fn infix(node: &ExprNode) -> String {
    infix_tokens(node).join(" ")
}

pub fn postfix(node: &ExprNode) -> String {
    postfix_tokens(node).join(" ")
}

pub fn render(node: Option<&ExprNode>, order: Order) -> String {
    tokens(node, order).join(" ")
}

fn walk<'a>(node: Option<&'a ExprNode>, order: Order, out: &mut Vec<&'a str>) {
    let mut stack: Vec<Frame<'a>> = node.map(Frame::Visit).into_iter().collect();

    while let Some(frame) = stack.pop() {
        let node = match frame {
            Frame::Emit(node) => {
                out.push(node.value());
                continue;
            }
            Frame::Visit(node) => node,
        };
        let (Some(left), Some(right)) = (node.left(), node.right()) else {
            out.push(node.value());
            continue;
        };

        // 后入先出：按期望输出的逆序压栈
        match order {
            Order::Prefix => stack.extend([Frame::Visit(right), Frame::Visit(left), Frame::Emit(node)]),
            Order::Infix => stack.extend([Frame::Visit(right), Frame::Emit(node), Frame::Visit(left)]),
            Order::Postfix => stack.extend([Frame::Emit(node), Frame::Visit(right), Frame::Visit(left)]),
        }
    }
}
