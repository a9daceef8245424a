pub mod bytecode_interpreter;

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::bytecode::CellOffset;

pub const DEFAULT_TAPE_LEN: usize = 3000;

/// What `,` stores when the input stream has run dry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofBehavior {
    /// Store 0
    Zero,
    /// Leave the cell as it was
    Unchanged,
    /// Store 255, i.e. -1 truncated to a byte
    #[default]
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Number of cells on the tape
    pub tape_len: usize,
    pub eof: EofBehavior,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tape_len: DEFAULT_TAPE_LEN,
            eof: EofBehavior::default(),
        }
    }
}

/// Where a run left the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Loaded (or reset) and not run yet
    Ready,
    /// The step budget ran out, the next run picks up where this one stopped
    Paused,
    /// The program counter reached the end of the code
    Finished,
    /// A fault stopped the run, only `reset` or `load` recover from this
    Faulted,
}

#[derive(Error, Debug)]
pub enum ExecutionFault {
    #[error("Invalid instruction at {pc}")]
    InvalidInstruction { pc: usize },

    #[error("Cell {cell} is outside the tape (length {tape_len}) at instruction {pc}")]
    CellOutOfBounds {
        pc: usize,
        cell: isize,
        tape_len: usize,
    },

    #[error("IO Error")]
    Io(
        #[from]
        io::Error,
    ),

    #[error("Interpreter has faulted and needs a reset")]
    Halted,
}

/// The machine state: tape, cell pointer and the streams `,` and `.` talk to
pub struct Runtime<I, O> {
    /// Pointer into the tape
    cell_pointer: usize,

    /// Our statically sized tape
    tape: Vec<u8>,

    eof: EofBehavior,

    in_stream: I,
    out_stream: O,
}

impl<I: Read, O: Write> Runtime<I, O> {
    pub fn new(config: RuntimeConfig, in_stream: I, out_stream: O) -> Self {
        Self {
            cell_pointer: 0,
            tape: vec![0; config.tape_len],
            eof: config.eof,
            in_stream,
            out_stream,
        }
    }

    pub fn reset(&mut self) {
        // the streams are the caller's, they carry on where they were
        self.tape.fill(0);
        self.cell_pointer = 0;
    }

    pub fn tape(&self) -> &[u8] {
        &self.tape
    }

    pub fn cell_pointer(&self) -> usize {
        self.cell_pointer
    }

    pub fn input(&self) -> &I {
        &self.in_stream
    }

    pub fn output(&self) -> &O {
        &self.out_stream
    }

    pub fn into_streams(self) -> (I, O) {
        (self.in_stream, self.out_stream)
    }

    /// Tape index of the cell `offset` away from the pointer, or the
    /// out-of-range cell number if there isn't one
    pub fn locate(&self, offset: CellOffset) -> Result<usize, isize> {
        let cell = self.cell_pointer as isize + offset as isize;
        if cell >= 0 && (cell as usize) < self.tape.len() {
            Ok(cell as usize)
        } else {
            Err(cell)
        }
    }

    /// Move the pointer, only valid with an index from `locate`
    pub fn move_to(&mut self, cell: usize) {
        self.cell_pointer = cell;
    }

    pub fn value(&self, cell: usize) -> u8 {
        self.tape[cell]
    }

    pub fn add_value(&mut self, cell: usize, amount: u8) {
        self.tape[cell] = self.tape[cell].wrapping_add(amount);
    }

    pub fn set_value(&mut self, cell: usize, value: u8) {
        self.tape[cell] = value;
    }

    /// Write the cell to the output stream
    pub fn write(&mut self, cell: usize) -> io::Result<()> {
        self.out_stream.write_all(&self.tape[cell..=cell])
    }

    /// Read one byte from the input stream into the cell, applying the EOF
    /// behaviour once the stream is exhausted
    pub fn read(&mut self, cell: usize) -> io::Result<()> {
        match (&mut self.in_stream).bytes().next() {
            Some(byte) => self.tape[cell] = byte?,
            None => match self.eof {
                EofBehavior::Zero => self.tape[cell] = 0,
                EofBehavior::Unchanged => {}
                EofBehavior::Max => self.tape[cell] = u8::MAX,
            },
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out_stream.flush()
    }
}
