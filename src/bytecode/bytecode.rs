use tracing::debug;

use crate::lexer::{lexer::Lexer, TokenKind};
use crate::optimizer::{fold_increment, is_zero_loop};

use super::{CellOffset, Dest, Instruction, SyntaxError};

/// Lexes `source` and translates the resulting operator stream
pub fn translate(source: &[u8]) -> Result<Vec<Instruction>, SyntaxError> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.collect_tokens();
    let code = to_bytecode(&tokens)?;
    debug!(
        source_bytes = lexer.byte_offset,
        comments = lexer.skipped,
        tokens = tokens.len(),
        instructions = code.len(),
        "translated program"
    );
    Ok(code)
}

/// A `[` whose `]` hasn't been seen yet
struct OpenLoop {
    /// Index of its `JumpForward`
    index: usize,
    /// Where the `[` sits in the token stream
    position: usize,
}

/// Single pass over the filtered token stream.
///
/// Pointer movement accumulates into `offset` and is attached to whatever
/// instruction comes next, so `>` and `<` never reach the output. Jumps are
/// the only place the pointer really moves, which is why the offset starts
/// again from zero at every loop boundary.
pub fn to_bytecode(tokens: &[TokenKind]) -> Result<Vec<Instruction>, SyntaxError> {
    let mut instructions: Vec<Instruction> = vec![];
    let mut loops: Vec<OpenLoop> = vec![];
    let mut offset: CellOffset = 0;

    let mut position = 0;
    while position < tokens.len() {
        match tokens[position] {
            TokenKind::Right => {
                offset = offset
                    .checked_add(1)
                    .ok_or(SyntaxError::OffsetOverflow { position })?;
            }
            TokenKind::Left => {
                offset = offset
                    .checked_sub(1)
                    .ok_or(SyntaxError::OffsetOverflow { position })?;
            }
            TokenKind::Increment => emit_increment(&mut instructions, offset, 1),
            TokenKind::Decrement => emit_increment(&mut instructions, offset, u8::MAX),
            TokenKind::Write => instructions.push(Instruction::Output { offset }),
            TokenKind::Read => instructions.push(Instruction::Input { offset }),
            TokenKind::JumpStart => {
                if is_zero_loop(tokens, position) {
                    instructions.push(Instruction::ZeroCell { offset });
                    // the body and the `]` are consumed along with the `[`
                    position += 3;
                    continue;
                }

                loops.push(OpenLoop {
                    index: instructions.len(),
                    position,
                });
                // patched once the matching `]` turns up
                instructions.push(Instruction::JumpForward { offset, dest: 0 });
                offset = 0;
            }
            TokenKind::JumpEnd => {
                let open = loops
                    .pop()
                    .ok_or(SyntaxError::UnmatchedClose { position })?;

                instructions.push(Instruction::JumpBackward {
                    offset,
                    dest: to_dest(open.index + 1),
                });

                let past_end = to_dest(instructions.len());
                if let Instruction::JumpForward { dest, .. } = &mut instructions[open.index] {
                    *dest = past_end;
                }
                offset = 0;
            }
        }

        position += 1;
    }

    match loops.pop() {
        Some(open) => Err(SyntaxError::UnmatchedOpen {
            position: open.position,
        }),
        None => Ok(instructions),
    }
}

fn emit_increment(instructions: &mut Vec<Instruction>, offset: CellOffset, delta: u8) {
    if !fold_increment(instructions, offset, delta) {
        instructions.push(Instruction::IncCell {
            amount: delta,
            offset,
        });
    }
}

fn to_dest(index: usize) -> Dest {
    // a program needs more than four billion `]` before this saturates
    Dest::try_from(index).unwrap_or(Dest::MAX)
}
