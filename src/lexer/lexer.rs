use super::TokenKind;

/// Turns raw source bytes into the filtered operator stream.
///
/// A token's index in the collected stream is its "filtered position", which
/// is what every translation error reports.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /** 'raw' offset within the source (in bytes) */
    pub byte_offset: usize,

    /** how many of the consumed bytes were comments */
    pub skipped: usize,

    bytes: std::iter::Peekable<std::slice::Iter<'a, u8>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a [u8]) -> Lexer<'a> {
        Lexer {
            byte_offset: 0,
            skipped: 0,
            bytes: source.iter().peekable(),
        }
    }

    fn consume_byte(&mut self) -> Option<u8> {
        let byte = *self.bytes.next()?;
        self.byte_offset += 1;
        Some(byte)
    }

    fn skip_comments(&mut self) {
        while let Some(&&byte) = self.bytes.peek() {
            if TokenKind::from_byte(byte).is_some() {
                break;
            }
            self.consume_byte();
            self.skipped += 1;
        }
    }

    pub fn next_token(&mut self) -> Option<TokenKind> {
        self.skip_comments();
        // skip_comments guarantees the next byte (if any) is an operator
        self.consume_byte().and_then(TokenKind::from_byte)
    }

    pub fn collect_tokens(&mut self) -> Vec<TokenKind> {
        let mut v = vec![];
        while let Some(tok) = self.next_token() {
            v.push(tok);
        }
        v
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = TokenKind;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
