//! Roster file loader.
//!
//! Each non-comment line of the roster file holds one player:
//!
//! ```text
//! [id] [name] {prior, opponent, ids} [score] { {day ranges} x7 } trailing comment
//! ```
//!
//! Lines starting with `#` are skipped. The seven day blocks run Monday
//! through Sunday; each holds zero or more `H:MM-H:MM` ranges. A hand-rolled
//! tokenizer feeds a recursive-descent parser; structural errors are fatal
//! and carry the offending line number.

use std::collections::HashSet;
use std::path::Path;
use std::str::CharIndices;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Player, TimeSet, DAYS_PER_WEEK};

/// Roster parsing errors.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected {expected}, found {found}")]
    Unexpected {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: score tenths must be 0 or 5")]
    BadScoreFraction { line: usize },

    #[error("line {line}: time {hour}:{minute:02} is out of range")]
    TimeOutOfRange { line: usize, hour: u32, minute: u32 },

    #[error("line {line}: time range {start}-{end} is empty")]
    EmptyTimeRange {
        line: usize,
        start: String,
        end: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    OpenBrace,
    CloseBrace,
    Colon,
    Comma,
    Dash,
    Dot,
    /// Unsigned integer plus the number of digits it was written with.
    Number(u32, u8),
    /// Alphanumeric word starting with a letter.
    Ident(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::OpenBrace => "'{'".to_string(),
            Token::CloseBrace => "'}'".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Dash => "'-'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Number(n, _) => format!("number {}", n),
            Token::Ident(s) => format!("\"{}\"", s),
        }
    }
}

struct Lexer<'a> {
    chars: std::iter::Peekable<CharIndices<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.char_indices().peekable(),
            line: 1,
        }
    }

    /// Skip whitespace and `#` comment lines.
    fn skip_trivia(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '\n' {
                self.line += 1;
                self.chars.next();
            } else if c.is_whitespace() {
                self.chars.next();
            } else if c == '#' {
                while let Some(&(_, c)) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.chars.next();
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, LoadError> {
        self.skip_trivia();
        let Some(&(_, c)) = self.chars.peek() else {
            return Ok(None);
        };

        let simple = match c {
            '{' => Some(Token::OpenBrace),
            '}' => Some(Token::CloseBrace),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            '-' => Some(Token::Dash),
            '.' => Some(Token::Dot),
            _ => None,
        };
        if let Some(token) = simple {
            self.chars.next();
            return Ok(Some(token));
        }

        if c.is_ascii_digit() {
            let mut value: u32 = 0;
            let mut digits: u8 = 0;
            while let Some(&(_, c)) = self.chars.peek() {
                let Some(d) = c.to_digit(10) else { break };
                value = value.saturating_mul(10).saturating_add(d);
                digits = digits.saturating_add(1);
                self.chars.next();
            }
            return Ok(Some(Token::Number(value, digits)));
        }

        if c.is_alphabetic() {
            let mut word = String::new();
            while let Some(&(_, c)) = self.chars.peek() {
                if !c.is_alphanumeric() && c != '_' {
                    break;
                }
                word.push(c);
                self.chars.next();
            }
            return Ok(Some(Token::Ident(word)));
        }

        Err(LoadError::Unexpected {
            line: self.line,
            expected: "a token",
            found: format!("'{}'", c),
        })
    }

    /// Consume the remainder of the current line, trimmed.
    fn take_rest_of_line(&mut self) -> String {
        let mut rest = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            self.chars.next();
            if c == '\n' {
                self.line += 1;
                break;
            }
            rest.push(c);
        }
        rest.trim().to_string()
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            lexer: Lexer::new(src),
            peeked: None,
        }
    }

    fn line(&self) -> usize {
        self.lexer.line
    }

    fn next(&mut self) -> Result<Option<Token>, LoadError> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.lexer.next_token(),
        }
    }

    fn peek(&mut self) -> Result<Option<&Token>, LoadError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn unexpected(&self, expected: &'static str, found: Option<Token>) -> LoadError {
        LoadError::Unexpected {
            line: self.line(),
            expected,
            found: found
                .map(|t| t.describe())
                .unwrap_or_else(|| "end of file".to_string()),
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), LoadError> {
        match self.next()? {
            Some(found) if found == token => Ok(()),
            other => Err(self.unexpected(expected, other)),
        }
    }

    fn expect_number(&mut self, expected: &'static str) -> Result<(u32, u8), LoadError> {
        match self.next()? {
            Some(Token::Number(value, digits)) => Ok((value, digits)),
            other => Err(self.unexpected(expected, other)),
        }
    }
}

/// Read and parse a roster file.
pub fn load_roster(path: &Path) -> Result<Vec<Player>, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let players = parse_roster(&text)?;
    debug!("loaded {} players from {:?}", players.len(), path);
    Ok(players)
}

/// Parse roster text into player records.
pub fn parse_roster(text: &str) -> Result<Vec<Player>, LoadError> {
    let mut parser = Parser::new(text);
    let mut players = Vec::new();

    while parser.peek()?.is_some() {
        let player = parse_player(&mut parser, players.len())?;
        players.push(player);
    }
    Ok(players)
}

fn parse_player(p: &mut Parser, ordinal: usize) -> Result<Player, LoadError> {
    let id = match p.peek()? {
        Some(Token::Number(..)) => p.expect_number("player id")?.0,
        _ => {
            warn!(
                "line {}: player id not given, defaulting to {}",
                p.line(),
                ordinal
            );
            ordinal as u32
        }
    };

    let name = match p.next()? {
        Some(Token::Ident(name)) => name,
        other => return Err(p.unexpected("player name", other)),
    };

    let prior_opponents = parse_prior_opponents(p)?;
    let score = parse_score(p)?;

    let mut player = Player::new(id, name, score);
    player.prior_opponents = prior_opponents;

    p.expect(Token::OpenBrace, "'{' opening the week's availability")?;
    for day in 0..DAYS_PER_WEEK {
        parse_day_times(p, player.availability.day_index_mut(day))?;
        // Day blocks may be separated by commas; the writer emits them.
        if day + 1 < DAYS_PER_WEEK {
            if let Some(Token::Comma) = p.peek()? {
                p.next()?;
            }
        }
    }
    p.expect(Token::CloseBrace, "'}' closing the week's availability")?;

    player.comment = p.lexer.take_rest_of_line();
    Ok(player)
}

fn parse_prior_opponents(p: &mut Parser) -> Result<HashSet<u32>, LoadError> {
    let mut opponents = HashSet::new();

    p.expect(Token::OpenBrace, "'{' opening prior opponents")?;
    if let Some(Token::CloseBrace) = p.peek()? {
        p.next()?;
        return Ok(opponents);
    }
    loop {
        let (id, _) = p.expect_number("opponent id")?;
        opponents.insert(id);
        match p.next()? {
            Some(Token::CloseBrace) => break,
            Some(Token::Comma) => continue,
            other => return Err(p.unexpected("',' or '}' after opponent id", other)),
        }
    }
    Ok(opponents)
}

fn parse_score(p: &mut Parser) -> Result<f32, LoadError> {
    let (whole, _) = p.expect_number("score")?;
    p.expect(Token::Dot, "'.' in score")?;
    let (tenths, digits) = p.expect_number("score tenths digit")?;
    if digits != 1 {
        return Err(LoadError::Unexpected {
            line: p.line(),
            expected: "a single tenths digit",
            found: format!("{} digits", digits),
        });
    }
    if tenths != 0 && tenths != 5 {
        return Err(LoadError::BadScoreFraction { line: p.line() });
    }
    Ok(whole as f32 + tenths as f32 / 10.0)
}

fn parse_day_times(p: &mut Parser, times: &mut TimeSet) -> Result<(), LoadError> {
    p.expect(Token::OpenBrace, "'{' opening a day's time list")?;
    if let Some(Token::CloseBrace) = p.peek()? {
        p.next()?;
        return Ok(());
    }
    loop {
        parse_time_range(p, times)?;
        match p.next()? {
            Some(Token::CloseBrace) => break,
            Some(Token::Comma) => continue,
            other => return Err(p.unexpected("',' or '}' after a time range", other)),
        }
    }
    Ok(())
}

fn parse_time_range(p: &mut Parser, times: &mut TimeSet) -> Result<(), LoadError> {
    let (start_hour, start_minute) = parse_time(p)?;
    p.expect(Token::Dash, "'-' between range times")?;
    let (end_hour, end_minute) = parse_time(p)?;

    if (start_hour, start_minute) >= (end_hour, end_minute) {
        return Err(LoadError::EmptyTimeRange {
            line: p.line(),
            start: format!("{}:{:02}", start_hour, start_minute),
            end: format!("{}:{:02}", end_hour, end_minute),
        });
    }

    times.set_range(
        start_hour as u8,
        start_minute as u8,
        end_hour as u8,
        end_minute as u8,
    );
    Ok(())
}

fn parse_time(p: &mut Parser) -> Result<(u32, u32), LoadError> {
    let (hour, _) = p.expect_number("an hour")?;
    p.expect(Token::Colon, "':' in a time")?;
    let (minute, _) = p.expect_number("a minute")?;
    if hour >= 24 || minute >= 60 {
        return Err(LoadError::TimeOutOfRange {
            line: p.line(),
            hour,
            minute,
        });
    }
    Ok((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    const EMPTY_WEEK: &str = "{ {} {} {} {} {} {} {} }";

    #[test]
    fn test_parse_single_player() {
        let text = "0 Alice {1, 2} 3.5 { {} {} {} {} {} {9:00-12:30, 14:00-15:00} {} } star player\n";
        let players = parse_roster(text).unwrap();

        assert_eq!(players.len(), 1);
        let alice = &players[0];
        assert_eq!(alice.id, 0);
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.score, 3.5);
        assert_eq!(alice.prior_opponents, HashSet::from([1, 2]));
        assert_eq!(alice.comment, "star player");

        let saturday = alice.availability.day(Weekday::Sat);
        assert!(saturday.contains(9, 0));
        assert!(saturday.contains(12, 29));
        assert!(!saturday.contains(12, 30));
        assert!(saturday.contains(14, 30));
        assert!(alice.availability.day(Weekday::Sun).is_empty());
    }

    #[test]
    fn test_parse_multiple_players_and_comments() {
        let text = format!(
            "# weekly roster\n\
             0 Alice {{}} 2.0 {EMPTY_WEEK}\n\
             # midfield\n\
             1 Bob {{0}} 1.5 {EMPTY_WEEK}\n"
        );
        let players = parse_roster(&text).unwrap();

        assert_eq!(players.len(), 2);
        assert_eq!(players[1].name, "Bob");
        assert!(players[1].prior_opponents.contains(&0));
    }

    #[test]
    fn test_missing_id_defaults_to_ordinal() {
        let text = format!(
            "0 Alice {{}} 2.0 {EMPTY_WEEK}\n\
             Bob {{}} 1.0 {EMPTY_WEEK}\n"
        );
        let players = parse_roster(&text).unwrap();

        assert_eq!(players[1].id, 1);
        assert_eq!(players[1].name, "Bob");
    }

    #[test]
    fn test_score_fraction_must_be_half_point() {
        let text = format!("0 Alice {{}} 2.3 {EMPTY_WEEK}\n");
        assert!(matches!(
            parse_roster(&text),
            Err(LoadError::BadScoreFraction { line: 1 })
        ));
    }

    #[test]
    fn test_score_rejects_multi_digit_tenths() {
        let text = format!("0 Alice {{}} 2.55 {EMPTY_WEEK}\n");
        assert!(matches!(
            parse_roster(&text),
            Err(LoadError::Unexpected { .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_time() {
        let text = "0 Alice {} 2.0 { {25:00-26:00} {} {} {} {} {} {} }\n";
        assert!(matches!(
            parse_roster(text),
            Err(LoadError::TimeOutOfRange { hour: 25, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_time_range() {
        let text = "0 Alice {} 2.0 { {9:00-9:00} {} {} {} {} {} {} }\n";
        assert!(matches!(
            parse_roster(text),
            Err(LoadError::EmptyTimeRange { .. })
        ));
    }

    #[test]
    fn test_rejects_missing_brace() {
        let text = "0 Alice 2.0\n";
        assert!(matches!(
            parse_roster(text),
            Err(LoadError::Unexpected { line: 1, .. })
        ));
    }

    #[test]
    fn test_error_reports_line_number() {
        let text = format!(
            "0 Alice {{}} 2.0 {EMPTY_WEEK}\n\
             1 Bob {{}} bad {EMPTY_WEEK}\n"
        );
        match parse_roster(&text) {
            Err(LoadError::Unexpected { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected Unexpected error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_input_yields_no_players() {
        assert!(parse_roster("").unwrap().is_empty());
        assert!(parse_roster("# only comments\n").unwrap().is_empty());
    }

    #[test]
    fn test_load_roster_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 Alice {{}} 2.0 {EMPTY_WEEK}").unwrap();
        writeln!(file, "1 Bob {{}} 1.5 {EMPTY_WEEK}").unwrap();

        let players = load_roster(file.path()).unwrap();
        assert_eq!(players.len(), 2);
    }
}
