pub mod lexer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // `>`: Move the cell offset one cell to the right
    Right,
    // `<`: Move the cell offset one cell to the left
    Left,

    // `+`: Increment the byte at the cell offset by one
    Increment,
    // `-`: Decrement the byte at the cell offset by one
    Decrement,

    // `.`: Write the byte at the cell offset to the output stream
    Write,
    // `,`: Read the next byte from the input stream into the cell offset
    Read,

    // `[`: If the byte at the cell pointer is zero, jump past the matching `]`
    JumpStart,
    // `]`: If the byte at the cell pointer is non-zero, jump back to just after the matching `[`
    JumpEnd,
}

impl TokenKind {
    /// Maps a raw source byte to its operator, `None` for anything else (comments)
    pub fn from_byte(byte: u8) -> Option<TokenKind> {
        match byte {
            b'>' => Some(TokenKind::Right),
            b'<' => Some(TokenKind::Left),
            b'+' => Some(TokenKind::Increment),
            b'-' => Some(TokenKind::Decrement),
            b'.' => Some(TokenKind::Write),
            b',' => Some(TokenKind::Read),
            b'[' => Some(TokenKind::JumpStart),
            b']' => Some(TokenKind::JumpEnd),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            TokenKind::Right => '>',
            TokenKind::Left => '<',
            TokenKind::Increment => '+',
            TokenKind::Decrement => '-',
            TokenKind::Write => '.',
            TokenKind::Read => ',',
            TokenKind::JumpStart => '[',
            TokenKind::JumpEnd => ']',
        }
    }
}
