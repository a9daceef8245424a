use crate::lexer::TokenKind;

/// Is the `[` at `start` the beginning of `[-]` or `[+]`?
///
/// Both forms clear the current cell whatever its starting value since cells
/// wrap, so the translator replaces them with a single `ZeroCell`.
pub fn is_zero_loop(tokens: &[TokenKind], start: usize) -> bool {
    matches!(
        tokens.get(start..start + 3),
        Some([
            TokenKind::JumpStart,
            TokenKind::Increment | TokenKind::Decrement,
            TokenKind::JumpEnd
        ])
    )
}
