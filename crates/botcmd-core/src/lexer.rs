//! POSIX shell-style word splitting with read-position tracking.
//!
//! Whitespace separates words, single and double quotes group them, and a
//! backslash escapes the next character. Inside double quotes a backslash
//! only escapes `"` or `\` and is kept literally before anything else.
//! There is no comment character.
//!
//! After each word the lexer reports how far it has read, in UTF-16 units.
//! A word ended by whitespace has consumed that whitespace character, so the
//! reported position is one past it; a word ended by the input has position
//! equal to the input length.

use botcmd_types::error::TokenizeError;

/// A word together with the lexer's read position after producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedWord {
    pub value: String,
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Whitespace,
    Word,
    Quoted(char),
    Escape,
}

/// Streaming word splitter over a string slice.
pub struct ShellLexer<'a> {
    chars: std::str::Chars<'a>,
    position: usize,
    state: State,
    exhausted: bool,
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"')
}

impl<'a> ShellLexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
            position: 0,
            state: State::Whitespace,
            exhausted: false,
        }
    }

    /// UTF-16 units consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    fn read_char(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += c.len_utf16();
        Some(c)
    }

    fn read_word(&mut self) -> Result<Option<String>, TokenizeError> {
        if self.exhausted {
            return Ok(None);
        }

        let mut word = String::new();
        let mut quoted = false;
        let mut quote_offset = 0;
        // State to return to once an escaped character is consumed.
        let mut resume = State::Word;

        loop {
            let next = self.read_char();
            match self.state {
                State::Whitespace => match next {
                    None => {
                        self.exhausted = true;
                        break;
                    }
                    Some(c) if is_whitespace(c) => continue,
                    Some('\\') => {
                        resume = State::Word;
                        self.state = State::Escape;
                    }
                    Some(c) if is_quote(c) => {
                        quote_offset = self.position - 1;
                        self.state = State::Quoted(c);
                    }
                    Some(c) => {
                        word.push(c);
                        self.state = State::Word;
                    }
                },
                State::Quoted(quote) => {
                    quoted = true;
                    match next {
                        None => {
                            return Err(TokenizeError::UnclosedQuote {
                                quote,
                                offset: quote_offset,
                            });
                        }
                        Some(c) if c == quote => self.state = State::Word,
                        Some('\\') if quote == '"' => {
                            resume = State::Quoted(quote);
                            self.state = State::Escape;
                        }
                        Some(c) => word.push(c),
                    }
                }
                State::Escape => match next {
                    None => {
                        return Err(TokenizeError::DanglingEscape {
                            offset: self.position.saturating_sub(1),
                        });
                    }
                    Some(c) => {
                        if let State::Quoted(quote) = resume {
                            if c != '\\' && c != quote {
                                word.push('\\');
                            }
                        }
                        word.push(c);
                        self.state = resume;
                    }
                },
                State::Word => match next {
                    None => {
                        self.exhausted = true;
                        break;
                    }
                    Some(c) if is_whitespace(c) => {
                        self.state = State::Whitespace;
                        if !word.is_empty() || quoted {
                            break;
                        }
                    }
                    Some(c) if is_quote(c) => {
                        quote_offset = self.position - 1;
                        self.state = State::Quoted(c);
                    }
                    Some('\\') => {
                        resume = State::Word;
                        self.state = State::Escape;
                    }
                    Some(c) => word.push(c),
                },
            }
        }

        if word.is_empty() && !quoted {
            Ok(None)
        } else {
            Ok(Some(word))
        }
    }
}

impl Iterator for ShellLexer<'_> {
    type Item = Result<LexedWord, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_word() {
            Ok(Some(value)) => Some(Ok(LexedWord {
                value,
                position: self.position,
            })),
            Ok(None) => None,
            Err(err) => {
                self.exhausted = true;
                Some(Err(err))
            }
        }
    }
}
