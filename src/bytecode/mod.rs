pub mod bytecode;

use std::fmt;

use thiserror::Error;

/// Displacement from the cell pointer at the moment an instruction executes
pub type CellOffset = i16;

/// Index into an instruction sequence
pub type Dest = u32;

/// The flat instruction set the translator emits.
///
/// There is no pointer move instruction: `<` and `>` are folded into the
/// offsets of the instructions that touch cells, and the pointer itself only
/// moves when a jump executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Add `amount` (wrapping) to the cell at `offset`
    IncCell { amount: u8, offset: CellOffset },

    /// Move the pointer by `offset`, jump to `dest` if the cell there is zero
    JumpForward { offset: CellOffset, dest: Dest },

    /// Move the pointer by `offset`, jump to `dest` if the cell there is non-zero
    JumpBackward { offset: CellOffset, dest: Dest },

    /// Set the cell at `offset` to zero, the result of recognising `[-]` and `[+]`
    ZeroCell { offset: CellOffset },

    /// Write the cell at `offset` to the output stream
    Output { offset: CellOffset },

    /// Read a byte from the input stream into the cell at `offset`
    Input { offset: CellOffset },

    /// Never emitted by the translator, executing it faults the interpreter
    Invalid,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Instruction::IncCell { amount, offset } => write!(f, "inc {} {}", offset, amount),
            Instruction::JumpForward { offset, dest } => write!(f, "jmp_fwd {} {}", offset, dest),
            Instruction::JumpBackward { offset, dest } => write!(f, "jmp_bwd {} {}", offset, dest),
            Instruction::ZeroCell { offset } => write!(f, "zero {}", offset),
            Instruction::Output { offset } => write!(f, "put {}", offset),
            Instruction::Input { offset } => write!(f, "get {}", offset),
            Instruction::Invalid => write!(f, "invalid"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Unmatched '[' at cleaned position {position}")]
    UnmatchedOpen { position: usize },

    #[error("Unmatched ']' at cleaned position {position}")]
    UnmatchedClose { position: usize },

    #[error("Cell offset leaves the 16 bit range at cleaned position {position}")]
    OffsetOverflow { position: usize },
}

/// One line per instruction, purely diagnostic
pub fn disassemble(code: &[Instruction]) -> String {
    let mut out = String::new();
    for instruction in code {
        out.push_str(&instruction.to_string());
        out.push('\n');
    }
    out
}

/// Size of the instruction sequence as it sits in memory
pub fn code_size_bytes(code: &[Instruction]) -> usize {
    std::mem::size_of_val(code)
}
