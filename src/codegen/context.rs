//! 代码生成上下文
//!
//! 保存一次生成调用的全部状态：输出清单、临时变量计数器与变量名栈。

use tracing::trace;

use super::CodegenOptions;
use super::instruction::{Instruction, Listing, TempSlot};

pub struct AsmGenerator {
    pub(super) options: CodegenOptions,
    listing: Listing,
    stack: Vec<TempSlot>,
    next_temp: usize,
}

impl AsmGenerator {
    pub fn new(options: CodegenOptions) -> Self {
        Self {
            options,
            listing: Listing::new(),
            stack: Vec::new(),
            next_temp: 0,
        }
    }

    /// 分配下一个未使用的临时变量
    pub fn new_temp(&mut self) -> TempSlot {
        let slot = TempSlot(self.next_temp);
        self.next_temp += 1;
        slot
    }

    pub fn emit(&mut self, instruction: Instruction) {
        trace!(%instruction, "emit");
        self.listing.push(instruction);
    }

    pub fn emit_directives(&mut self, lines: &[&'static str]) {
        self.listing.extend_directives(lines);
    }

    pub fn push_value(&mut self, slot: TempSlot) {
        self.stack.push(slot);
    }

    pub fn pop_value(&mut self) -> Option<TempSlot> {
        self.stack.pop()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn top_value(&self) -> Option<TempSlot> {
        self.stack.last().copied()
    }

    /// 最近一条指令是否把 `slot` 从累加器存出
    pub fn accumulator_holds(&self, slot: TempSlot) -> bool {
        matches!(self.listing.last(), Some(Instruction::StoreAcc(s)) if *s == slot)
    }

    pub fn finish(self) -> Listing {
        self.listing
    }
}
