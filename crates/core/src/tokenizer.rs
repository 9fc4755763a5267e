//! Splits the typed part of a command line into words.

/// Words of `line[..cursor]`, split on runs of whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub words: Vec<String>,
    /// The cursor sits after a separator, so a brand new word is being
    /// asked for rather than the completion of a partial one.
    pub expecting_new_token: bool,
}

/// The line with the program name split off and the word under the cursor
/// separated from the finished ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub program: Option<String>,
    pub completed: Vec<String>,
    /// The partial word, empty when a new word is expected.
    pub last: String,
}

/// Tokenizes `line` up to `cursor` (a byte offset).
///
/// The cursor is clamped to the line and moved back onto a character
/// boundary if it points into the middle of one.
#[must_use]
pub fn tokenize(line: &str, cursor: usize) -> Tokens {
    let mut cursor = cursor.min(line.len());
    while !line.is_char_boundary(cursor) {
        cursor -= 1;
    }
    let typed = &line[..cursor];

    Tokens {
        words: typed.split_whitespace().map(ToString::to_string).collect(),
        expecting_new_token: typed.is_empty() || typed.ends_with(char::is_whitespace),
    }
}

impl Tokens {
    /// Drops the program name and splits off the partial word.
    ///
    /// Returns `None` while the program name itself is still being typed.
    #[must_use]
    pub fn into_line(self) -> Option<Line> {
        let Tokens {
            mut words,
            expecting_new_token,
        } = self;

        if words.len() == 1 && !expecting_new_token {
            return None;
        }

        let program = if words.is_empty() {
            None
        } else {
            Some(words.remove(0))
        };

        let last = if expecting_new_token {
            String::new()
        } else {
            words.pop().unwrap_or_default()
        };

        Some(Line {
            program,
            completed: words,
            last,
        })
    }
}
