// Tracker line grammar
//
//   line   := ... "[" stamp "]" ws "[" LEVEL "]" ws message
//   clock  := ... digits ":" digits ":" digits ws ("A" | "P") "M." digits
//
// Both are searched for anywhere in the text, leftmost match wins, and the
// stamp is the shortest run that lets the rest of the line match. Nothing in
// a match may cross a line terminator except the whitespace runs. Every
// search is a single left-to-right pass.

/// Byte cursor. All delimiters are ASCII so every stop lands on a char boundary.
#[derive(Clone, Copy)]
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, pos: usize) -> Self {
        Self { text, pos }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.text.as_bytes().get(self.pos) == Some(&byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// one or more whitespace chars (unicode)
    fn eat_whitespace(&mut self) -> bool {
        let len: usize = self
            .rest()
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        self.pos += len;
        len > 0
    }

    /// one or more ASCII bytes matching `pred`
    fn take_while1(&mut self, pred: impl Fn(u8) -> bool) -> Option<&'a str> {
        let len = self
            .rest()
            .bytes()
            .take_while(|b| pred(*b))
            .count();
        if len == 0 {
            return None;
        }
        let start = self.pos;
        self.pos += len;
        Some(&self.text[start..self.pos])
    }
}

/// Chars that end the stamp and the message, as in the tracker's own patterns.
pub(crate) fn is_line_end(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

// LINE HEADER //

/// Captures of a successful line match, borrowed from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineMatch<'a> {
    pub timestamp: &'a str,
    pub level: &'a str,
    pub message: &'a str,
}

/// Full line: stamp, level and a message after at least one whitespace char.
pub(crate) fn match_line(line: &str) -> Option<LineMatch<'_>> {
    find_header(line, true)
}

/// Just the level token. The trailing whitespace and message are not
/// required here, so `[t] [INFO]` has a level even though it is not a full line.
pub fn level_token(line: &str) -> Option<&str> {
    find_header(line, false).map(|m| m.level)
}

/// What follows a usable closing `]`.
#[derive(Clone, Copy)]
struct Tail<'a> {
    level: &'a str,
    message_start: usize,
}

fn find_header(line: &str, with_message: bool) -> Option<LineMatch<'_>> {
    // both walk forward only, in step with the opening brackets
    let mut closes = line
        .match_indices(']')
        .filter_map(|(close, _)| tail_after(line, close, with_message).map(|tail| (close, tail)))
        .peekable();
    let mut line_ends = line.match_indices(is_line_end).map(|(i, _)| i).peekable();

    for (open, _) in line.match_indices('[') {
        while closes.next_if(|(close, _)| *close < open).is_some() {}
        while line_ends.next_if(|end| *end < open).is_some() {}

        // no usable `]` left means no later `[` can match either
        let (close, tail) = *closes.peek()?;
        if line_ends.peek().is_some_and(|end| *end < close) {
            continue;
        }

        let message = if with_message {
            let rest = &line[tail.message_start..];
            rest.find(is_line_end).map_or(rest, |i| &rest[..i])
        } else {
            ""
        };
        return Some(LineMatch {
            timestamp: &line[open + 1..close],
            level: tail.level,
            message,
        });
    }
    None
}

// the whitespace and level runs after distinct `]` never overlap, so
// checking every `]` once stays linear in the line
fn tail_after(line: &str, close: usize, with_message: bool) -> Option<Tail<'_>> {
    let mut cur = Cursor::new(line, close + 1);
    if !cur.eat_whitespace() || !cur.eat(b'[') {
        return None;
    }
    let level = cur.take_while1(|b| b.is_ascii_uppercase())?;
    if !cur.eat(b']') {
        return None;
    }
    if with_message && !cur.eat_whitespace() {
        return None;
    }

    Some(Tail {
        level,
        message_start: cur.pos,
    })
}

// CLOCK //

/// Raw digit runs of a `h:mm:ss AM.mmm` clock, unconverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClockMatch<'a> {
    pub hour: &'a str,
    pub minute: &'a str,
    pub second: &'a str,
    pub pm: bool,
    pub millis: &'a str,
}

pub(crate) fn match_clock(text: &str) -> Option<ClockMatch<'_>> {
    let bytes = text.as_bytes();
    // a clock that fails from the start of a digit run fails from inside it too
    (0..bytes.len())
        .filter(|&i| bytes[i].is_ascii_digit() && (i == 0 || !bytes[i - 1].is_ascii_digit()))
        .find_map(|start| clock_at(Cursor::new(text, start)))
}

fn clock_at(mut cur: Cursor<'_>) -> Option<ClockMatch<'_>> {
    let digits = |b: u8| b.is_ascii_digit();

    let hour = cur.take_while1(digits)?;
    cur.eat(b':').then_some(())?;
    let minute = cur.take_while1(digits)?;
    cur.eat(b':').then_some(())?;
    let second = cur.take_while1(digits)?;
    cur.eat_whitespace().then_some(())?;

    let pm = if cur.eat(b'A') {
        false
    } else if cur.eat(b'P') {
        true
    } else {
        return None;
    };
    (cur.eat(b'M') && cur.eat(b'.')).then_some(())?;
    let millis = cur.take_while1(digits)?;

    Some(ClockMatch {
        hour,
        minute,
        second,
        pm,
        millis,
    })
}
