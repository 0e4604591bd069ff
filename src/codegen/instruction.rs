//! 指令与清单
//!
//! 临时变量以下标 `TempSlot` 标识，只有在输出文本时才格式化为 `TEMPn`。

use std::fmt;

use crate::ast::Operator;
use crate::error::ExprError;

pub const TEMP_PREFIX: &str = "TEMP";

/// 数据段头
pub const DATA_HEADER: [&str; 3] = [".model small", ".stack 100h", ".data"];

/// 代码段序言
pub const CODE_PROLOGUE: [&str; 2] = [".code", "main proc"];

/// 把 AX 中的值转换为十进制数字并逐位打印，然后退出程序
pub const PRINT_EPILOGUE: [&str; 19] = [
    "MOV BX, 10",
    "XOR CX, CX",
    "CONVERT:",
    "    XOR DX, DX",
    "    DIV BX",
    "    ADD DL, '0'",
    "    PUSH DX",
    "    INC CX",
    "    TEST AX, AX",
    "    JNZ CONVERT",
    "",
    "PRINT_DIGITS:",
    "    POP DX",
    "    MOV AH, 02h",
    "    INT 21h",
    "    LOOP PRINT_DIGITS",
    "",
    "    MOV AH, 4Ch",
    "    INT 21h",
];

pub const TERMINATOR: [&str; 2] = ["main endp", "end main"];

/// 临时变量槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TempSlot(pub usize);

impl fmt::Display for TempSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", TEMP_PREFIX, self.0)
    }
}

/// 目标机器支持的算术运算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl TryFrom<Operator> for ArithOp {
    type Error = ExprError;

    fn try_from(op: Operator) -> Result<Self, Self::Error> {
        match op {
            Operator::Add => Ok(ArithOp::Add),
            Operator::Sub => Ok(ArithOp::Sub),
            Operator::Mul => Ok(ArithOp::Mul),
            Operator::Div => Ok(ArithOp::Div),
            Operator::Pow => Err(ExprError::UnsupportedOperator { symbol: op.symbol() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// 固定文本行（段头、序言、尾声）
    Directive(&'static str),
    /// `TEMPn DW ?`
    Declare(TempSlot),
    /// `MOV TEMPn, literal`
    MoveLiteral { dst: TempSlot, literal: String },
    /// `MOV AX, TEMPn`
    LoadAcc(TempSlot),
    /// 累加器与 `src` 运算
    Combine { op: ArithOp, src: TempSlot },
    /// `MOV TEMPn, AX`
    StoreAcc(TempSlot),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Directive(text) => f.write_str(text),
            Instruction::Declare(slot) => write!(f, "{} DW ?", slot),
            Instruction::MoveLiteral { dst, literal } => write!(f, "MOV {}, {}", dst, literal),
            Instruction::LoadAcc(slot) => write!(f, "MOV AX, {}", slot),
            Instruction::Combine { op, src } => match op {
                ArithOp::Add => write!(f, "ADD AX, {}", src),
                ArithOp::Sub => write!(f, "SUB AX, {}", src),
                ArithOp::Mul => write!(f, "IMUL {}", src),
                ArithOp::Div => write!(f, "IDIV {}", src),
            },
            Instruction::StoreAcc(slot) => write!(f, "MOV {}, AX", slot),
        }
    }
}

/// 生成的指令清单
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    instructions: Vec<Instruction>,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn extend_directives(&mut self, lines: &[&'static str]) {
        self.instructions.extend(lines.iter().copied().map(Instruction::Directive));
    }

    pub fn last(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    /// 声明的临时变量数量
    pub fn declared_temps(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, Instruction::Declare(_)))
            .count()
    }

    /// 每条指令一行
    pub fn lines(&self) -> Vec<String> {
        self.instructions.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instruction) in self.instructions.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", instruction)?;
        }
        Ok(())
    }
}
