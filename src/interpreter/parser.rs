use super::ast::{Command, Comparison, Condition, Statement};
use super::ParseError;
use crate::runtime::action::Direction;

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Largest `range(...)` bound or `walk` count accepted by default.
pub const DEFAULT_MAX_REPEAT: u32 = 1000;

/// Split a submitted line into statements and parse each one, with repeat
/// counts capped at [`DEFAULT_MAX_REPEAT`].
pub fn parse_line(source: &str) -> Vec<ParseResult<Statement>> {
    parse_line_with_limit(source, DEFAULT_MAX_REPEAT)
}

/// Split a submitted line into statements and parse each one.
///
/// Dispatch order is fixed: `clear`/`stop`, then a leading `for`/`if` (which
/// claims the whole line, separators included), then `;`/newline sequences,
/// then a single command. Sequence members are parsed once and never split
/// again. Blank members are skipped. Loop and walk counts above `max_repeat`
/// are rejected.
pub fn parse_line_with_limit(source: &str, max_repeat: u32) -> Vec<ParseResult<Statement>> {
    let line = source.trim();
    if line.is_empty() {
        return Vec::new();
    }
    if line == "clear" || line == "stop" {
        return vec![Ok(Statement::Command(Command::Clear))];
    }
    if line.starts_with("for ") || line.starts_with("if ") {
        return vec![parse_statement_with_limit(line, max_repeat)];
    }
    if line.contains([';', '\n']) {
        return line
            .split([';', '\n'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| parse_statement_with_limit(part, max_repeat))
            .collect();
    }
    vec![parse_statement_with_limit(line, max_repeat)]
}

/// Parse exactly one statement (no sequence splitting).
pub fn parse_statement(source: &str) -> ParseResult<Statement> {
    parse_statement_with_limit(source, DEFAULT_MAX_REPEAT)
}

/// Parse exactly one statement with repeat counts capped at `max_repeat`.
pub fn parse_statement_with_limit(source: &str, max_repeat: u32) -> ParseResult<Statement> {
    Parser::new(source.trim())
        .with_max_repeat(max_repeat)
        .statement(Nesting::Line)
}

/// Where a statement appears; bodies accept a narrower set of forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nesting {
    Line,
    LoopBody,
    IfBody,
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    index: usize,
    max_repeat: u32,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            index: 0,
            max_repeat: DEFAULT_MAX_REPEAT,
        }
    }

    fn with_max_repeat(mut self, max_repeat: u32) -> Self {
        self.max_repeat = max_repeat;
        self
    }

    /// Parser over the remaining input, for a loop or `if` body.
    fn body(&self) -> Parser<'a> {
        Parser::new(self.rest()).with_max_repeat(self.max_repeat)
    }

    /// Parse a repeat count and hold it to `max_repeat`.
    fn repeat_count(&self, digits: &str) -> ParseResult<u32> {
        match digits.parse::<u32>() {
            Ok(count) if count <= self.max_repeat => Ok(count),
            _ => Err(ParseError::NumericParseError(digits.to_string())),
        }
    }

    fn eof(&self) -> bool {
        self.index >= self.bytes.len()
    }

    fn current(&self) -> Option<u8> {
        self.bytes.get(self.index).copied()
    }

    fn advance(&mut self) {
        if self.index < self.bytes.len() {
            self.index += 1;
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.index..]
    }

    /// Skip spaces and tabs. Newlines are separators, never whitespace.
    fn skip_ws(&mut self) -> bool {
        let start = self.index;
        while matches!(self.current(), Some(b' ' | b'\t')) {
            self.advance();
        }
        self.index > start
    }

    fn at_ws(&self) -> bool {
        matches!(self.current(), Some(b' ' | b'\t'))
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.current() == Some(byte) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn word(&mut self) -> &'a str {
        let start = self.index;
        while let Some(ch) = self.current() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        &self.src[start..self.index]
    }

    fn identifier(&mut self) -> Option<&'a str> {
        match self.current() {
            Some(ch) if ch.is_ascii_alphabetic() || ch == b'_' => Some(self.word()),
            _ => None,
        }
    }

    fn digits(&mut self) -> &'a str {
        let start = self.index;
        while matches!(self.current(), Some(b'0'..=b'9')) {
            self.advance();
        }
        &self.src[start..self.index]
    }

    /// Everything up to the next space/tab.
    fn token(&mut self) -> &'a str {
        let start = self.index;
        while let Some(ch) = self.current() {
            if ch == b' ' || ch == b'\t' {
                break;
            }
            self.advance();
        }
        &self.src[start..self.index]
    }

    fn statement(&mut self, nesting: Nesting) -> ParseResult<Statement> {
        let start = self.index;
        let keyword = self.word();
        match keyword {
            "for" if self.at_ws() => {
                if nesting != Nesting::Line {
                    return Err(self.unrecognized());
                }
                self.for_loop()
            }
            "if" if self.at_ws() => {
                if nesting == Nesting::IfBody {
                    return Err(self.unrecognized());
                }
                self.if_statement()
            }
            _ => {
                self.index = start;
                self.command().map(Statement::Command)
            }
        }
    }

    fn for_loop(&mut self) -> ParseResult<Statement> {
        self.skip_ws();
        let var = self.identifier().ok_or_else(|| self.header_error())?;
        if !self.skip_ws() || self.word() != "in" || !self.skip_ws() || self.word() != "range" {
            return Err(self.header_error());
        }
        self.skip_ws();
        if !self.eat(b'(') {
            return Err(self.header_error());
        }
        self.skip_ws();
        let digits = self.digits();
        if digits.is_empty() {
            return Err(self.header_error());
        }
        let count = self.repeat_count(digits)?;
        self.skip_ws();
        if !self.eat(b')') {
            return Err(self.header_error());
        }
        self.skip_ws();
        if !self.eat(b':') {
            return Err(self.header_error());
        }
        self.skip_ws();
        if self.eof() {
            return Err(self.header_error());
        }

        let body = self.body().statement(Nesting::LoopBody)?;
        Ok(Statement::For {
            var: var.to_string(),
            count,
            body: Box::new(body),
        })
    }

    fn if_statement(&mut self) -> ParseResult<Statement> {
        let Some(colon) = self.rest().find(':') else {
            return Err(ParseError::MalformedCondition(self.src.to_string()));
        };
        let condition = parse_condition(self.rest()[..colon].trim())?;
        self.index += colon + 1;
        self.skip_ws();
        if self.eof() {
            return Err(ParseError::MalformedCondition(self.src.to_string()));
        }

        let body = self.body().statement(Nesting::IfBody)?;
        Ok(Statement::If {
            condition,
            body: Box::new(body),
        })
    }

    fn command(&mut self) -> ParseResult<Command> {
        if let Some(rest) = self.src.strip_prefix("player.move") {
            return rest
                .strip_suffix("()")
                .filter(|name| name.bytes().all(|ch| ch.is_ascii_alphanumeric()))
                .and_then(Direction::from_alias)
                .map(Command::Move)
                .ok_or_else(|| self.unrecognized());
        }

        match self.word() {
            "move" => {
                let direction = self.direction_arg()?;
                self.finish()?;
                Ok(Command::Move(direction))
            }
            "turn" => {
                let direction = self.direction_arg()?;
                self.finish()?;
                Ok(Command::Turn(direction))
            }
            "walk" => {
                if !self.skip_ws() {
                    return Err(self.unrecognized());
                }
                let count = self.token();
                let count = self.repeat_count(count)?;
                let direction = self.direction_arg()?;
                self.finish()?;
                Ok(Command::Walk(direction, count))
            }
            "wait" => {
                self.skip_ws();
                if self.eof() {
                    return Ok(Command::Wait(None));
                }
                let duration = self.token();
                let duration = duration
                    .parse::<u64>()
                    .map_err(|_| ParseError::NumericParseError(duration.to_string()))?;
                self.finish()?;
                Ok(Command::Wait(Some(duration)))
            }
            "print" => match self.current() {
                Some(b' ' | b'\t' | b'(' | b'"' | b'\'') => {
                    Ok(Command::Print(print_message(self.rest())))
                }
                _ => Err(self.unrecognized()),
            },
            "clear" | "stop" => {
                self.finish()?;
                Ok(Command::Clear)
            }
            _ => Err(self.unrecognized()),
        }
    }

    fn direction_arg(&mut self) -> ParseResult<Direction> {
        if !self.skip_ws() {
            return Err(self.unrecognized());
        }
        Direction::from_alias(self.word()).ok_or_else(|| self.unrecognized())
    }

    fn finish(&mut self) -> ParseResult<()> {
        self.skip_ws();
        if self.eof() {
            Ok(())
        } else {
            Err(self.unrecognized())
        }
    }

    fn unrecognized(&self) -> ParseError {
        ParseError::UnrecognizedStatement(self.src.to_string())
    }

    fn header_error(&self) -> ParseError {
        ParseError::MalformedLoopHeader(self.src.to_string())
    }
}

/// `<ident> <op> <uint>` with optional spaces around the operator.
fn parse_condition(source: &str) -> ParseResult<Condition> {
    let malformed = || ParseError::MalformedCondition(source.to_string());
    let mut parser = Parser::new(source);

    let ident = parser.identifier().ok_or_else(malformed)?;
    parser.skip_ws();
    let op_start = parser.index;
    while matches!(parser.current(), Some(b'<' | b'>' | b'!' | b'=')) {
        parser.advance();
    }
    let op = Comparison::from_token(&source[op_start..parser.index]).ok_or_else(malformed)?;
    parser.skip_ws();
    let digits = parser.digits();
    if digits.is_empty() {
        return Err(malformed());
    }
    let value = digits
        .parse::<i64>()
        .map_err(|_| ParseError::NumericParseError(digits.to_string()))?;
    parser.skip_ws();
    if !parser.eof() {
        return Err(malformed());
    }

    Ok(Condition {
        ident: ident.to_string(),
        op,
        value,
    })
}

/// `hello`, `"hello"`, `('hello')` all print `hello`.
fn print_message(raw: &str) -> String {
    let mut message = raw.trim();
    if message.len() >= 2 && message.starts_with('(') && message.ends_with(')') {
        message = message[1..message.len() - 1].trim();
    }
    let message = message.strip_prefix(['"', '\'']).unwrap_or(message);
    let message = message.strip_suffix(['"', '\'']).unwrap_or(message);
    message.to_string()
}
