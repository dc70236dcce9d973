use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while, take_while1},
    character::complete::satisfy,
    combinator::{map, recognize},
    sequence::pair,
    IResult,
};

use crate::token::{RawToken, Span};

/// Letters, digits (any script) and underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Characters absorbed into a boundary after the terminal punctuation.
fn is_closer(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\'' | '"' | ')' | ']')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Text(&'a str),
    /// One or more terminals followed by closing quotes, brackets or spaces.
    Boundary(&'a str),
}

fn text_run(input: &str) -> IResult<&str, &str> {
    take_till(is_terminal)(input)
}

fn boundary_run(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_terminal), take_while(is_closer)))(input)
}

/// Cuts `text` into alternating text and boundary runs, starting and ending
/// with a (possibly empty) text run.
pub fn split_boundaries(text: &str) -> Vec<Piece<'_>> {
    let mut input = text;
    let mut pieces = Vec::new();

    loop {
        let (rest, run) = match text_run(input) {
            Ok(res) => res,
            Err(_) => break,
        };
        pieces.push(Piece::Text(run));

        if rest.is_empty() {
            break;
        }

        match boundary_run(rest) {
            Ok((next_input, run)) => {
                pieces.push(Piece::Boundary(run));
                input = next_input;
            }
            Err(_) => break,
        }
    }

    pieces
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while(char::is_whitespace)(input)
}

fn word(input: &str) -> IResult<&str, RawToken> {
    map(take_while1(is_word_char), RawToken::Word)(input)
}

fn symbol(input: &str) -> IResult<&str, RawToken> {
    map(satisfy(|c| !is_word_char(c) && !c.is_whitespace()), RawToken::Punct)(input)
}

/// Scans `original_input` into word runs and single punctuation characters
/// with byte spans. Punctuation is dropped when `punctuation` is false.
pub fn parse_with_spans(original_input: &str, punctuation: bool) -> Vec<(Span, RawToken)> {
    let mut input = original_input;
    let mut result = Vec::new();

    loop {
        // 1. Skip whitespace
        input = match whitespace(input) {
            Ok((next_input, _)) => next_input,
            Err(_) => break,
        };

        if input.is_empty() {
            break;
        }

        // 2. Word run first, then a single symbol
        match alt((word, symbol))(input) {
            Ok((next_input, token)) => {
                let start = original_input.len() - input.len();
                let len = input.len() - next_input.len();

                if punctuation || !token.is_punctuation() {
                    result.push((Span::new(start, start + len), token));
                }
                input = next_input;
            }
            Err(_) => {
                // Skip one char to recover
                match input.chars().next() {
                    Some(c) => input = &input[c.len_utf8()..],
                    None => break,
                }
            }
        }
    }

    result
}

/// Word runs only.
pub fn word_runs(input: &str) -> Vec<&str> {
    parse_with_spans(input, false)
        .into_iter()
        .map(|(span, _)| &input[span.start..span.end])
        .collect()
}
