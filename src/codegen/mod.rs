//! 代码生成模块
//!
//! 单次扫描后序 token 序列，借助临时变量栈生成类 8086 汇编清单。
//!
//! # 模块结构
//!
//! - `instruction`: 指令、临时变量槽位与清单
//! - `context`: 生成过程状态（计数器、变量栈）

mod context;
pub mod instruction;

use tracing::{debug, warn};

use crate::ast::Operator;
use crate::error::{ExprError, ExprResult, malformed};
pub use context::AsmGenerator;
pub use instruction::{ArithOp, Instruction, Listing, TempSlot};
use instruction::{CODE_PROLOGUE, DATA_HEADER, PRINT_EPILOGUE, TERMINATOR};

/// 运算符遇到变量栈不足两个元素时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderflowPolicy {
    /// 返回 `OperandUnderflow`
    #[default]
    Fail,
    /// 跳过该运算符，不生成任何指令
    Skip,
}

/// 目标指令集没有对应助记符的运算符（`^`）的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedPolicy {
    /// 返回 `UnsupportedOperator`
    #[default]
    Fail,
    /// 弹出两个操作数，压入一个未赋值的临时变量，不生成指令
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    pub underflow: UnderflowPolicy,
    pub unsupported: UnsupportedPolicy,
    /// 结果不在 AX 中时，在尾声前补一条 `MOV AX, TEMPn`
    pub load_result: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions {
            underflow: UnderflowPolicy::Fail,
            unsupported: UnsupportedPolicy::Fail,
            load_result: true,
        }
    }
}

impl CodegenOptions {
    /// 兼容模式：跳过缺操作数的运算符，`^` 只占位，不补装载指令
    pub fn compatible() -> Self {
        CodegenOptions {
            underflow: UnderflowPolicy::Skip,
            unsupported: UnsupportedPolicy::Placeholder,
            load_result: false,
        }
    }
}

/// 后序序列中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PostfixItem<'a> {
    Literal(&'a str),
    Op(Operator),
}

/// 是否为有限的数字字面量
pub fn is_numeric_literal(token: &str) -> bool {
    token.parse::<f64>().is_ok_and(f64::is_finite)
}

/// 检查除运算符外的每个 token 都是数字
pub fn validate_operands<S: AsRef<str>>(tokens: &[S]) -> ExprResult<()> {
    let all_numeric = tokens.iter().map(|t| t.as_ref()).all(|token| {
        Operator::from_symbol(token).is_some() || is_numeric_literal(token)
    });

    if all_numeric {
        Ok(())
    } else {
        Err(ExprError::NonNumericOperand {
            tokens: tokens.iter().map(|t| t.as_ref().to_owned()).collect(),
        })
    }
}

/// 用默认选项生成代码
pub fn generate<S: AsRef<str>>(tokens: &[S]) -> ExprResult<Listing> {
    generate_with(tokens, CodegenOptions::default())
}

pub fn generate_with<S: AsRef<str>>(tokens: &[S], options: CodegenOptions) -> ExprResult<Listing> {
    validate_operands(tokens)?;
    debug!(tokens = tokens.len(), ?options, "generating assembly");

    let items: Vec<PostfixItem<'_>> = tokens
        .iter()
        .map(|t| t.as_ref())
        .map(|token| match Operator::from_symbol(token) {
            Some(op) => PostfixItem::Op(op),
            None => PostfixItem::Literal(token),
        })
        .collect();

    let mut generator = AsmGenerator::new(options);
    generator.generate_program(&items)?;
    Ok(generator.finish())
}

impl AsmGenerator {
    fn generate_program(&mut self, items: &[PostfixItem<'_>]) -> ExprResult<()> {
        self.emit_directives(&DATA_HEADER);
        // 每个 token 预先声明一个临时变量，这是所需数量的上界
        for index in 0..items.len() {
            self.emit(Instruction::Declare(TempSlot(index)));
        }
        self.emit_directives(&CODE_PROLOGUE);

        for item in items {
            match *item {
                PostfixItem::Literal(literal) => self.generate_literal(literal),
                PostfixItem::Op(op) => self.generate_operator(op)?,
            }
        }

        self.generate_result()?;
        self.emit_directives(&PRINT_EPILOGUE);
        self.emit_directives(&TERMINATOR);
        Ok(())
    }

    fn generate_literal(&mut self, literal: &str) {
        let dst = self.new_temp();
        self.emit(Instruction::MoveLiteral {
            dst,
            literal: literal.to_owned(),
        });
        self.push_value(dst);
    }

    /// 生成 装载 / 运算 / 存储 三条指令
    fn generate_operator(&mut self, op: Operator) -> ExprResult<()> {
        let available = self.stack_depth();
        if available < 2 {
            return match self.options.underflow {
                UnderflowPolicy::Skip => {
                    warn!(op = %op, available, "operator skipped: not enough operands");
                    Ok(())
                }
                UnderflowPolicy::Fail => Err(ExprError::OperandUnderflow {
                    symbol: op.symbol(),
                    available,
                }),
            };
        }

        let arith = match ArithOp::try_from(op) {
            Ok(arith) => Some(arith),
            Err(_) if self.options.unsupported == UnsupportedPolicy::Placeholder => None,
            Err(e) => return Err(e),
        };
        let (Some(right), Some(left)) = (self.pop_value(), self.pop_value()) else {
            return Err(ExprError::OperandUnderflow { symbol: op.symbol(), available });
        };

        let dst = self.new_temp();
        let Some(arith) = arith else {
            warn!(op = %op, temp = %dst, "no instruction for operator, result left unassigned");
            self.push_value(dst);
            return Ok(());
        };
        self.emit(Instruction::LoadAcc(left));
        self.emit(Instruction::Combine { op: arith, src: right });
        self.emit(Instruction::StoreAcc(dst));
        self.push_value(dst);
        Ok(())
    }

    /// 确认栈上只剩最终结果，并保证它在 AX 中
    fn generate_result(&mut self) -> ExprResult<()> {
        if self.options.underflow == UnderflowPolicy::Fail {
            match self.stack_depth() {
                1 => {}
                0 => return Err(malformed("postfix sequence produces no value", None)),
                n => {
                    return Err(malformed(
                        format!("postfix sequence leaves {} values on the stack", n),
                        None,
                    ));
                }
            }
        }

        if !self.options.load_result {
            return Ok(());
        }
        if let Some(top) = self.top_value() {
            if !self.accumulator_holds(top) {
                self.emit(Instruction::LoadAcc(top));
            }
        }
        Ok(())
    }
}
