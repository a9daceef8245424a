use std::io::{Read, Write};

use tracing::{debug, warn};

use crate::bytecode::{self, bytecode::translate, Instruction, SyntaxError};

use super::{ExecutionFault, RunState, Runtime};

/// Runs translated code against a `Runtime`.
///
/// The program counter survives between runs so `run_bounded` can be used to
/// interleave many programs on one thread.
pub struct ByteCodeInterpreter<I, O> {
    runtime: Runtime<I, O>,
    code: Vec<Instruction>,
    pc: usize,
    state: RunState,
}

impl<I: Read, O: Write> ByteCodeInterpreter<I, O> {
    pub fn new(runtime: Runtime<I, O>) -> Self {
        Self {
            runtime,
            code: vec![],
            pc: 0,
            state: RunState::Ready,
        }
    }

    /// Resets the machine and installs `code` in place of whatever was loaded
    pub fn load(&mut self, code: Vec<Instruction>) {
        self.reset();
        self.code = code;
    }

    /// Translates and loads `source`, on error nothing is loaded
    pub fn load_source(&mut self, source: &[u8]) -> Result<(), SyntaxError> {
        self.reset();
        self.code = translate(source)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.runtime.reset();
        self.code.clear();
        self.pc = 0;
        self.state = RunState::Ready;
    }

    /// Runs until the code is exhausted
    pub fn run_to_completion(&mut self) -> Result<RunState, ExecutionFault> {
        self.run(None)
    }

    /// Runs at most `max_steps` instructions, returning `RunState::Paused` if
    /// the program still has more to do
    pub fn run_bounded(&mut self, max_steps: u32) -> Result<RunState, ExecutionFault> {
        self.run(Some(max_steps))
    }

    fn run(&mut self, max_steps: Option<u32>) -> Result<RunState, ExecutionFault> {
        if self.state == RunState::Faulted {
            return Err(ExecutionFault::Halted);
        }

        let mut steps: u32 = 0;
        let mut result = Ok(());
        while self.pc < self.code.len() && max_steps.map_or(true, |max| steps < max) {
            result = self.step();
            if result.is_err() {
                break;
            }
            steps = steps.wrapping_add(1);
        }

        // output is flushed whichever way the run ended
        let flushed = self.runtime.flush();
        let result = result.and_then(|_| flushed.map_err(ExecutionFault::from));
        if let Err(fault) = result {
            warn!(pc = self.pc, steps, %fault, "execution faulted");
            self.state = RunState::Faulted;
            return Err(fault);
        }

        self.state = if self.pc >= self.code.len() {
            RunState::Finished
        } else {
            RunState::Paused
        };
        debug!(state = ?self.state, pc = self.pc, steps, "run stopped");
        Ok(self.state)
    }

    /// Executes the instruction at the program counter
    fn step(&mut self) -> Result<(), ExecutionFault> {
        match self.code[self.pc] {
            Instruction::IncCell { amount, offset } => {
                let cell = self.cell(offset)?;
                self.runtime.add_value(cell, amount);
                self.pc += 1;
            }
            Instruction::JumpForward { offset, dest } => {
                let cell = self.cell(offset)?;
                self.runtime.move_to(cell);
                if self.runtime.value(cell) != 0 {
                    self.pc += 1;
                } else {
                    self.pc = dest as usize;
                }
            }
            Instruction::JumpBackward { offset, dest } => {
                let cell = self.cell(offset)?;
                self.runtime.move_to(cell);
                if self.runtime.value(cell) == 0 {
                    self.pc += 1;
                } else {
                    self.pc = dest as usize;
                }
            }
            Instruction::ZeroCell { offset } => {
                let cell = self.cell(offset)?;
                self.runtime.set_value(cell, 0);
                self.pc += 1;
            }
            Instruction::Output { offset } => {
                let cell = self.cell(offset)?;
                self.runtime.write(cell)?;
                self.pc += 1;
            }
            Instruction::Input { offset } => {
                let cell = self.cell(offset)?;
                self.runtime.read(cell)?;
                self.pc += 1;
            }
            Instruction::Invalid => return Err(ExecutionFault::InvalidInstruction { pc: self.pc }),
        }
        Ok(())
    }

    fn cell(&self, offset: bytecode::CellOffset) -> Result<usize, ExecutionFault> {
        self.runtime
            .locate(offset)
            .map_err(|cell| ExecutionFault::CellOutOfBounds {
                pc: self.pc,
                cell,
                tape_len: self.runtime.tape().len(),
            })
    }

    /// Only true once a run has reached the end of the code, a freshly
    /// loaded or reset interpreter is `Ready` instead
    pub fn finished(&self) -> bool {
        self.state == RunState::Finished
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn code(&self) -> &[Instruction] {
        &self.code
    }

    pub fn runtime(&self) -> &Runtime<I, O> {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime<I, O> {
        &mut self.runtime
    }

    pub fn into_runtime(self) -> Runtime<I, O> {
        self.runtime
    }

    pub fn disassemble(&self) -> String {
        bytecode::disassemble(&self.code)
    }

    pub fn code_size_bytes(&self) -> usize {
        bytecode::code_size_bytes(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{EofBehavior, RuntimeConfig};
    use std::io::Cursor;

    type TestInterpreter = ByteCodeInterpreter<Cursor<Vec<u8>>, Vec<u8>>;

    fn interpreter(tape_len: usize, input: &[u8]) -> TestInterpreter {
        let config = RuntimeConfig {
            tape_len,
            eof: EofBehavior::Zero,
        };
        ByteCodeInterpreter::new(Runtime::new(config, Cursor::new(input.to_vec()), vec![]))
    }

    fn loaded(source: &str) -> TestInterpreter {
        let mut interp = interpreter(64, b"");
        interp.load_source(source.as_bytes()).unwrap();
        interp
    }

    #[test]
    fn runs_to_completion() {
        let mut interp = loaded("++>+++[<+>-]<.");
        assert_eq!(interp.state(), RunState::Ready);
        assert_eq!(interp.run_to_completion().unwrap(), RunState::Finished);
        assert!(interp.finished());
        assert_eq!(interp.runtime().output(), &vec![5]);
        assert_eq!(&interp.runtime().tape()[..2], &[5, 0]);
    }

    #[test]
    fn empty_program_finishes_immediately() {
        let mut interp = loaded("");
        assert!(!interp.finished());
        assert_eq!(interp.run_to_completion().unwrap(), RunState::Finished);
        assert!(interp.finished());
    }

    #[test]
    fn bounded_run_pauses_in_an_infinite_loop() {
        let mut interp = loaded("+[]");
        assert_eq!(interp.run_bounded(5).unwrap(), RunState::Paused);
        assert!(!interp.finished());
        // stuck on the `]`, which keeps jumping to itself
        assert_eq!(interp.pc(), 2);
        assert_eq!(interp.run_bounded(5).unwrap(), RunState::Paused);
        assert_eq!(interp.pc(), 2);
    }

    #[test]
    fn bounded_runs_resume() {
        let mut interp = loaded("+++[>+<-]>.");
        let mut runs = 0;
        while interp.run_bounded(2).unwrap() == RunState::Paused {
            runs += 1;
        }
        assert!(runs > 3);
        assert!(interp.finished());
        assert_eq!(interp.runtime().output(), &vec![3]);
    }

    #[test]
    fn bounded_run_that_ends_exactly_on_budget() {
        let mut interp = loaded("+.");
        assert_eq!(interp.run_bounded(2).unwrap(), RunState::Finished);
        assert_eq!(interp.run_bounded(0).unwrap(), RunState::Finished);
    }

    #[test]
    fn zero_step_budget_does_nothing() {
        let mut interp = loaded("+");
        assert_eq!(interp.run_bounded(0).unwrap(), RunState::Paused);
        assert_eq!(interp.pc(), 0);
        assert_eq!(interp.runtime().tape()[0], 0);
    }

    #[test]
    fn echoes_input() {
        let mut interp = interpreter(8, b"A");
        interp.load_source(b",.").unwrap();
        interp.run_to_completion().unwrap();
        assert_eq!(interp.runtime().output(), &vec![65]);
    }

    #[test]
    fn invalid_instruction_faults_for_good() {
        let mut interp = interpreter(8, b"");
        interp.load(vec![
            Instruction::IncCell { amount: 1, offset: 0 },
            Instruction::Invalid,
            Instruction::Output { offset: 0 },
        ]);

        assert!(matches!(
            interp.run_to_completion(),
            Err(ExecutionFault::InvalidInstruction { pc: 1 })
        ));
        assert_eq!(interp.state(), RunState::Faulted);
        assert!(!interp.finished());
        assert!(matches!(interp.run_bounded(10), Err(ExecutionFault::Halted)));
        assert!(interp.runtime().output().is_empty());

        interp.reset();
        assert_eq!(interp.state(), RunState::Ready);
        assert!(interp.code().is_empty());
    }

    #[test]
    fn leaving_the_tape_faults() {
        let mut interp = interpreter(4, b"");
        interp.load_source(b"<+").unwrap();
        assert!(matches!(
            interp.run_to_completion(),
            Err(ExecutionFault::CellOutOfBounds {
                pc: 0,
                cell: -1,
                tape_len: 4
            })
        ));

        interp.load_source(b"+[>+]").unwrap();
        assert!(matches!(
            interp.run_to_completion(),
            Err(ExecutionFault::CellOutOfBounds {
                cell: 4,
                tape_len: 4,
                ..
            })
        ));
        assert_eq!(interp.runtime().tape(), &[1, 1, 1, 1]);
    }

    #[test]
    fn last_cell_is_reachable() {
        let mut interp = interpreter(4, b"");
        interp.load_source(b">>>+").unwrap();
        assert_eq!(interp.run_to_completion().unwrap(), RunState::Finished);
        assert_eq!(interp.runtime().tape(), &[0, 0, 0, 1]);
    }

    #[test]
    fn jumps_move_the_pointer() {
        let mut interp = loaded(">>+[-]>+[<]");
        interp.run_to_completion().unwrap();
        // entered the loop at cell 3, left it at cell 2
        assert_eq!(interp.runtime().cell_pointer(), 2);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut interp = loaded("+>++>+++[.]");
        interp.run_bounded(4).unwrap();
        for _ in 0..2 {
            interp.reset();
            assert!(!interp.finished());
            assert_eq!(interp.pc(), 0);
            assert_eq!(interp.runtime().cell_pointer(), 0);
            assert!(interp.runtime().tape().iter().all(|&c| c == 0));
            assert_eq!(interp.runtime().tape().len(), 64);
            assert!(interp.code().is_empty());
        }
    }

    #[test]
    fn syntax_error_leaves_nothing_loaded() {
        let mut interp = loaded("+++");
        assert_eq!(
            interp.load_source(b"[[]"),
            Err(SyntaxError::UnmatchedOpen { position: 0 })
        );
        assert!(interp.code().is_empty());
        assert_eq!(interp.code_size_bytes(), 0);
    }

    #[test]
    fn diagnostics() {
        let interp = loaded("+[-]>.");
        assert_eq!(interp.disassemble(), "inc 0 1\nzero 0\nput 1\n");
        assert_eq!(
            interp.code_size_bytes(),
            3 * std::mem::size_of::<Instruction>()
        );
    }
}
