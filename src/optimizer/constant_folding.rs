use crate::bytecode::{CellOffset, Instruction};

/// Folds `delta` into the last emitted instruction if it is an `IncCell` on
/// the same cell, so a run of `+`/`-` (with `<`/`>` in between) becomes one
/// instruction per touched offset.
///
/// Returns false when nothing was folded and the caller has to emit a new
/// `IncCell` itself.
pub fn fold_increment(code: &mut [Instruction], offset: CellOffset, delta: u8) -> bool {
    match code.last_mut() {
        Some(Instruction::IncCell {
            amount,
            offset: last_offset,
        }) if *last_offset == offset => {
            *amount = amount.wrapping_add(delta);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn folds_into_same_offset() {
        let mut code = vec![Instruction::IncCell { amount: 1, offset: 3 }];
        assert!(fold_increment(&mut code, 3, 1));
        assert_eq!(code, vec![Instruction::IncCell { amount: 2, offset: 3 }]);
    }

    #[test]
    fn folding_wraps() {
        let mut code = vec![Instruction::IncCell { amount: 0, offset: 0 }];
        assert!(fold_increment(&mut code, 0, u8::MAX));
        assert_eq!(code, vec![Instruction::IncCell { amount: 255, offset: 0 }]);
        assert!(fold_increment(&mut code, 0, 1));
        assert_eq!(code, vec![Instruction::IncCell { amount: 0, offset: 0 }]);
    }

    #[test]
    fn only_looks_at_the_last_instruction() {
        let mut code = vec![
            Instruction::IncCell { amount: 1, offset: 0 },
            Instruction::Output { offset: 0 },
        ];
        assert!(!fold_increment(&mut code, 0, 1));

        let mut code = vec![Instruction::IncCell { amount: 1, offset: 0 }];
        assert!(!fold_increment(&mut code, 1, 1));
        assert!(!fold_increment(&mut [], 0, 1));
    }
}
