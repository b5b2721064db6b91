//! Just enough shell lexing to find command invocations line by line.

use std::iter::Enumerate;
use std::str::Lines;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(['"]?)([A-Za-z_][A-Za-z0-9_]*)(['"]?)$"#).expect("delimiter pattern is valid")
});

/// Words that may precede the command in a segment.
const PREFIX_WORDS: &[&str] = &[
    "if", "then", "else", "elif", "do", "while", "until", "!", "{", "(", "exec", "command",
];

/// Classification of one script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// Blank, comment or here-document body
    Data,
    /// Code split into command segments, each a list of words
    Code(Vec<Vec<&'a str>>),
}

/// Iterates `(1-based line number, Line)` pairs, tracking here-documents.
pub(crate) struct ScriptLines<'a> {
    lines: Enumerate<Lines<'a>>,
    heredoc: Option<String>,
}

impl<'a> ScriptLines<'a> {
    pub(crate) fn new(script: &'a str) -> Self {
        Self {
            lines: script.lines().enumerate(),
            heredoc: None,
        }
    }
}

impl<'a> Iterator for ScriptLines<'a> {
    type Item = (usize, Line<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, raw) = self.lines.next()?;
        let number = index + 1;

        if let Some(delimiter) = &self.heredoc {
            if raw.trim() == delimiter {
                self.heredoc = None;
            }
            return Some((number, Line::Data));
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Some((number, Line::Data));
        }
        let segments = split_segments(raw);
        self.heredoc = heredoc_delimiter(&segments);
        Some((number, Line::Code(segments)))
    }
}

/// Delimiter of a here-document opened by an unquoted `<<` or `<<-` word.
/// Here-strings (`<<<`) open nothing.
fn heredoc_delimiter(segments: &[Vec<&str>]) -> Option<String> {
    for segment in segments {
        let mut words = segment.iter();
        while let Some(word) = words.next() {
            if word.starts_with('#') {
                return None;
            }
            let Some(rest) = word.strip_prefix("<<") else {
                continue;
            };
            if rest.starts_with('<') {
                continue;
            }
            let rest = rest.strip_prefix('-').unwrap_or(rest);
            let target = if rest.is_empty() {
                match words.next() {
                    Some(next) => *next,
                    None => continue,
                }
            } else {
                rest
            };
            if let Some(caps) = DELIMITER.captures(target)
                && caps[1] == caps[3]
            {
                return Some(caps[2].to_string());
            }
        }
    }
    None
}

/// A resolved command within one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Invocation<'s, 'a> {
    /// Preceded by `sudo` or `doas`
    pub(crate) elevated: bool,
    pub(crate) command: &'a str,
    pub(crate) args: &'s [&'a str],
}

/// Skip control keywords, elevation and env assignments to find the command.
pub(crate) fn invocation<'s, 'a>(
    segment: &'s [&'a str],
    elevators: &[&str],
) -> Option<Invocation<'s, 'a>> {
    let mut elevated = false;
    let mut rest = segment;
    while let Some((&word, tail)) = rest.split_first() {
        rest = tail;
        if elevators.contains(&word) {
            elevated = true;
            while let Some((&flag, tail)) = rest.split_first() {
                if !flag.starts_with('-') {
                    break;
                }
                rest = tail;
            }
        } else if !PREFIX_WORDS.contains(&word) && !is_assignment(word) {
            return Some(Invocation {
                elevated,
                command: word,
                args: rest,
            });
        }
    }
    None
}

fn is_assignment(word: &str) -> bool {
    word.split_once('=').is_some_and(|(name, _)| {
        !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    })
}

/// Strip one layer of matching quotes.
pub(crate) fn unquote(word: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = word.strip_prefix(q).and_then(|w| w.strip_suffix(q)) {
            return inner;
        }
    }
    word
}

/// Split a line into segments at unquoted `;`, `|` and `&`, and each segment
/// into words at unquoted whitespace. Quotes stay part of their word.
pub(crate) fn split_segments(line: &str) -> Vec<Vec<&str>> {
    let mut segments = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut start: Option<usize> = None;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            } else if c == '\\' && q == '"' {
                escaped = true;
            }
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                start.get_or_insert(i);
            }
            '\'' | '"' => {
                quote = Some(c);
                start.get_or_insert(i);
            }
            ';' | '|' | '&' => {
                if let Some(s) = start.take() {
                    current.push(&line[s..i]);
                }
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            c if c.is_whitespace() => {
                if let Some(s) = start.take() {
                    current.push(&line[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        current.push(&line[s..]);
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}
