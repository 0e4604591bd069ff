//! 树图输出
//!
//! 为显示层提供 (节点, 父节点, 标签) 边列表、分层布局坐标和 DOT 文本。
//! 节点编号按前序从根 0 开始连续分配。

use std::fmt::Write;

use crate::ast::ExprNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEdge<'a> {
    pub id: usize,
    pub parent: Option<usize>,
    pub label: &'a str,
}

/// 布局参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// 根节点分得的水平宽度
    pub width: f64,
    /// 相邻两层的垂直间距
    pub vert_gap: f64,
    /// 根节点的纵坐标
    pub vert_loc: f64,
    /// 根节点的横坐标
    pub xcenter: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            width: 1.0,
            vert_gap: 0.2,
            vert_loc: 0.0,
            xcenter: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePosition {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

/// 前序列出所有节点及其父节点
pub fn edges(root: &ExprNode) -> Vec<TreeEdge<'_>> {
    let mut out = Vec::new();
    let mut stack = vec![(root, None)];

    while let Some((node, parent)) = stack.pop() {
        let id = out.len();
        out.push(TreeEdge {
            id,
            parent,
            label: node.value(),
        });
        // 先压右子树，左子树先出栈，编号保持前序
        stack.extend(node.right().map(|child| (child, Some(id))));
        stack.extend(node.left().map(|child| (child, Some(id))));
    }
    out
}

/// 待放置的子树及其分得的区域
struct Slot<'a> {
    node: &'a ExprNode,
    width: f64,
    vert_loc: f64,
    xcenter: f64,
}

/// 分层布局：每个节点把自己的宽度平分给子节点，子节点位于下一层
///
/// 返回值按节点编号排列，与 [`edges`] 的编号一致。
pub fn layout(root: &ExprNode, options: LayoutOptions) -> Vec<NodePosition> {
    let mut out = Vec::new();
    let mut stack = vec![Slot {
        node: root,
        width: options.width,
        vert_loc: options.vert_loc,
        xcenter: options.xcenter,
    }];

    while let Some(slot) = stack.pop() {
        out.push(NodePosition {
            id: out.len(),
            x: slot.xcenter,
            y: slot.vert_loc,
        });

        // 两个子节点各占一半宽度，中心分别在左右四分之一处
        let dx = slot.width / 2.0;
        let children = [(slot.node.right(), dx / 2.0), (slot.node.left(), -dx / 2.0)];
        for (child, offset) in children {
            if let Some(node) = child {
                stack.push(Slot {
                    node,
                    width: dx,
                    vert_loc: slot.vert_loc - options.vert_gap,
                    xcenter: slot.xcenter + offset,
                });
            }
        }
    }
    out
}

/// 生成 Graphviz DOT 文本
pub fn to_dot(root: &ExprNode) -> String {
    let edges = edges(root);
    let mut dot = String::from("digraph expression {\n");

    for edge in &edges {
        let label = edge.label.replace('\\', "\\\\").replace('"', "\\\"");
        let _ = writeln!(dot, "    n{} [label=\"{}\"];", edge.id, label);
    }
    for edge in &edges {
        if let Some(parent) = edge.parent {
            let _ = writeln!(dot, "    n{} -> n{};", parent, edge.id);
        }
    }

    dot.push('}');
    dot
}
