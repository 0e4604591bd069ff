//! 算术表达式树
//!
//! 把中缀算术表达式解析为二叉表达式树，给出前序（波兰式）、中序、后序三种遍历，
//! 并在所有操作数都是数字时生成栈式汇编指令清单。

pub mod ast;
pub mod codegen;
pub mod error;
pub mod graph;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod traversal;

use std::path::Path;

use anyhow::Context;
use tracing::debug;

pub use ast::{BinaryExpr, ExprNode, Operator};
pub use codegen::{CodegenOptions, Listing, UnderflowPolicy, UnsupportedPolicy};
pub use error::{ExprError, ExprResult};
pub use traversal::{infix, postfix, prefix};

/// 解析表达式文本为表达式树
pub fn build_tree(source: &str) -> ExprResult<ExprNode> {
    parser::parse(source)
}

/// 对后序 token 序列生成代码
pub fn generate_code<S: AsRef<str>>(postfix_tokens: &[S]) -> ExprResult<Listing> {
    codegen::generate(postfix_tokens)
}

/// 三种遍历结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversals {
    pub prefix: String,
    pub infix: String,
    pub postfix: String,
}

impl Traversals {
    pub fn of(tree: &ExprNode) -> Self {
        Traversals {
            prefix: traversal::prefix(tree),
            infix: traversal::infix(tree),
            postfix: traversal::postfix(tree),
        }
    }
}

/// 从表达式文本到遍历结果和汇编清单的完整流程
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CodegenOptions,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodegenOptions) -> Self {
        Compiler { options }
    }

    /// 去掉首尾空白后建树；空白输入视为未提供表达式
    pub fn build_tree(&self, source: &str) -> ExprResult<ExprNode> {
        let source = source.trim();
        if source.is_empty() {
            return Err(error::malformed("no expression provided", None));
        }
        build_tree(source)
    }

    pub fn traversals(&self, source: &str) -> ExprResult<Traversals> {
        let tree = self.build_tree(source)?;
        Ok(Traversals::of(&tree))
    }

    /// 建树 → 后序遍历 → 校验操作数 → 生成代码
    pub fn generate(&self, source: &str) -> ExprResult<Listing> {
        let tree = self.build_tree(source)?;
        let tokens = traversal::postfix_tokens(&tree);
        debug!(postfix = %tokens.join(" "), "postfix sequence");
        codegen::generate_with(&tokens, self.options.clone())
    }

    /// 生成代码并写入 `output_path`
    pub fn compile(&self, source: &str, output_path: impl AsRef<Path>) -> anyhow::Result<Listing> {
        let output_path = output_path.as_ref();
        let listing = self.generate(source)?;
        output::write_listing(&listing, output_path)
            .with_context(|| format!("failed to write '{}'", output_path.display()))?;
        Ok(listing)
    }
}
