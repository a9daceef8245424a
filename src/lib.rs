//! brainfold translates Brainfuck into a flat instruction set with folded
//! cell offsets, then interprets it against a fixed size tape.

pub mod bytecode;
pub mod interpreter;
pub mod lexer;
pub mod optimizer;

pub use bytecode::{bytecode::translate, disassemble, CellOffset, Instruction, SyntaxError};
pub use interpreter::{
    bytecode_interpreter::ByteCodeInterpreter, EofBehavior, ExecutionFault, RunState, Runtime,
    RuntimeConfig, DEFAULT_TAPE_LEN,
};
