//! 表达式树定义
//!
//! 叶子节点保存操作数文本，内部节点保存二元运算符及其左右子树。
//! 语言中没有一元运算符，因此内部节点总是恰好有两个子节点。

use std::fmt;
use std::mem;

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Pow,
    ];

    /// 由符号查找运算符
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Sub),
            "*" => Some(Operator::Mul),
            "/" => Some(Operator::Div),
            "^" => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Pow => '^',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "^",
        }
    }

    /// 优先级，数值越大结合越紧
    ///
    /// 不区分结合性：建树时栈顶优先级 >= 新运算符即归约，`^` 也按左结合处理。
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
            Operator::Pow => 3,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 表达式树节点
///
/// 遍历、比较、格式化与析构都使用显式栈，树的深度不受调用栈限制。
pub enum ExprNode {
    /// 操作数（变量名或数字字面量）
    Operand(String),
    /// 二元运算
    Binary(BinaryExpr),
}

#[derive(Debug, PartialEq, Eq)]
pub struct BinaryExpr {
    pub left: Box<ExprNode>,
    pub op: Operator,
    pub right: Box<ExprNode>,
}

impl ExprNode {
    pub fn operand(text: impl Into<String>) -> Self {
        ExprNode::Operand(text.into())
    }

    pub fn binary(op: Operator, left: ExprNode, right: ExprNode) -> Self {
        ExprNode::Binary(BinaryExpr {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    /// 节点的文本值：操作数名或运算符符号
    pub fn value(&self) -> &str {
        match self {
            ExprNode::Operand(text) => text,
            ExprNode::Binary(bin) => bin.op.as_str(),
        }
    }

    pub fn left(&self) -> Option<&ExprNode> {
        match self {
            ExprNode::Operand(_) => None,
            ExprNode::Binary(bin) => Some(&bin.left),
        }
    }

    pub fn right(&self) -> Option<&ExprNode> {
        match self {
            ExprNode::Operand(_) => None,
            ExprNode::Binary(bin) => Some(&bin.right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ExprNode::Operand(_))
    }

    /// 前序迭代所有节点
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    pub fn leaf_count(&self) -> usize {
        self.preorder().filter(|node| node.is_leaf()).count()
    }

    pub fn internal_count(&self) -> usize {
        self.preorder().filter(|node| !node.is_leaf()).count()
    }

    /// 把非叶子的子节点移入 `out`，原位置换成空叶子
    fn detach_children(&mut self, out: &mut Vec<ExprNode>) {
        if let ExprNode::Binary(bin) = self {
            for child in [&mut bin.left, &mut bin.right] {
                if !child.is_leaf() {
                    out.push(mem::replace(&mut **child, ExprNode::Operand(String::new())));
                }
            }
        }
    }
}

impl Drop for ExprNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

/// 满二叉树由带叶子标记的前序序列唯一确定
impl PartialEq for ExprNode {
    fn eq(&self, other: &Self) -> bool {
        let mut lhs = self.preorder();
        let mut rhs = other.preorder();
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a.is_leaf() == b.is_leaf() && a.value() == b.value() => {}
                _ => return false,
            }
        }
    }
}

impl Eq for ExprNode {}

/// 以前序（波兰式）形式输出，如 `ExprNode(+ 3 * 4 2)`
impl fmt::Debug for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExprNode(")?;
        for (i, node) in self.preorder().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(node.value())?;
        }
        f.write_str(")")
    }
}

pub struct Preorder<'a> {
    stack: Vec<&'a ExprNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a ExprNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right());
        self.stack.extend(node.left());
        Some(node)
    }
}
