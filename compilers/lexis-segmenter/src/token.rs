#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken<'a> {
    /// Maximal run of word characters.
    Word(&'a str),
    /// Any single character that is neither a word character nor whitespace.
    Punct(char),
}

impl RawToken<'_> {
    pub fn is_punctuation(&self) -> bool {
        matches!(self, RawToken::Punct(_))
    }
}
