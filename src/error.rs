//! 错误类型
//!
//! 建树、代码生成过程中所有可恢复的错误都归入 `ExprError`。

use thiserror::Error;

pub type ExprResult<T> = Result<T, ExprError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },

    #[error("unbalanced parentheses: {reason} at offset {offset}")]
    UnbalancedParentheses { reason: String, offset: usize },

    #[error("malformed expression: {reason}")]
    MalformedExpression { reason: String, offset: Option<usize> },

    #[error("the expression {tokens:?} contains variables, assembly code cannot be generated from it")]
    NonNumericOperand { tokens: Vec<String> },

    #[error("operator '{symbol}' has no instruction in the target machine")]
    UnsupportedOperator { symbol: char },

    #[error("operator '{symbol}' needs two operands but {available} available")]
    OperandUnderflow { symbol: char, available: usize },
}

impl ExprError {
    /// 错误在源文本中的字节偏移（若有）
    pub fn offset(&self) -> Option<usize> {
        match self {
            ExprError::UnexpectedCharacter { offset, .. } => Some(*offset),
            ExprError::UnbalancedParentheses { offset, .. } => Some(*offset),
            ExprError::MalformedExpression { offset, .. } => *offset,
            _ => None,
        }
    }

    /// 错误分类，用于日志
    pub fn category(&self) -> &'static str {
        match self {
            ExprError::UnexpectedCharacter { .. } => "lexer",
            ExprError::UnbalancedParentheses { .. } | ExprError::MalformedExpression { .. } => "parser",
            ExprError::NonNumericOperand { .. }
            | ExprError::UnsupportedOperator { .. }
            | ExprError::OperandUnderflow { .. } => "codegen",
        }
    }
}

pub fn malformed(reason: impl Into<String>, offset: Option<usize>) -> ExprError {
    ExprError::MalformedExpression { reason: reason.into(), offset }
}

pub fn unbalanced(reason: impl Into<String>, offset: usize) -> ExprError {
    ExprError::UnbalancedParentheses { reason: reason.into(), offset }
}

/// 打印带源码上下文的错误信息
///
/// # Arguments
/// * `err` - 错误
/// * `source` - 原始表达式文本
/// * `origin` - 表达式来源（文件名或 `<stdin>`）
pub fn print_error_with_context(err: &ExprError, source: &str, origin: &str) {
    eprintln!("{}", render_error_with_context(err, source, origin));
}

/// 生成带源码行和插入符的错误文本
pub fn render_error_with_context(err: &ExprError, source: &str, origin: &str) -> String {
    let mut out = format!("error[{}]: {}\n  --> {}", err.category(), err, origin);

    if let Some(offset) = err.offset() {
        let offset = offset.min(source.len());
        let line_start = source[..offset].rfind('\n').map(|p| p + 1).unwrap_or(0);
        let line_end = source[offset..].find('\n').map(|p| offset + p).unwrap_or(source.len());
        let line_no = source[..line_start].matches('\n').count() + 1;
        let column = source[line_start..offset].chars().count();

        out.push_str(&format!(":{}:{}\n", line_no, column + 1));
        out.push_str(&format!("   | {}\n", &source[line_start..line_end]));
        out.push_str(&format!("   | {}^", " ".repeat(column)));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_points_at_offset() {
        let err = ExprError::UnexpectedCharacter { ch: '.', offset: 4 };
        let text = render_error_with_context(&err, "3 + .5", "<stdin>");
        assert!(text.contains("<stdin>:1:5"));
        assert!(text.ends_with("   |     ^"), "got: {}", text);
    }

    #[test]
    fn test_context_without_offset() {
        let err = ExprError::NonNumericOperand { tokens: vec!["x".into()] };
        let text = render_error_with_context(&err, "x", "input.txt");
        assert!(text.starts_with("error[codegen]"));
        assert!(!text.contains('^'));
    }
}
