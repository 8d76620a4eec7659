/// Line and column cursor over marker-delimited scene text
use nom::{
    bytes::complete::{take_till, take_until},
    character::complete::{char, i64 as parse_i64, space0, u64 as parse_u64},
    combinator::all_consuming,
    number::complete::float,
    sequence::{delimited, preceded},
    IResult,
};

use crate::error::ScanError;

fn token(input: &str) -> IResult<&str, &str> {
    preceded(space0, take_till(|c| c == ' '))(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    preceded(space0, delimited(char('"'), take_until("\""), char('"')))(input)
}

/// Forward-only cursor over the lines of a scene document.
///
/// Tabs are treated as spaces. The cursor never moves back, so every
/// `find` continues from the line the previous one stopped on.
#[derive(Debug, Clone)]
pub struct Scanner {
    lines: Vec<String>,
    row: usize,
    column: usize,
}

impl Scanner {
    pub fn new(content: &str) -> Self {
        let lines = content
            .split('\n')
            .map(|line| line.trim_end_matches('\r').replace('\t', " "))
            .collect();
        Self {
            lines,
            row: 0,
            column: 0,
        }
    }

    /// 1-based number of the current line, for error messages.
    pub fn line_number(&self) -> usize {
        self.row + 1
    }

    pub fn is_at_end(&self) -> bool {
        self.row >= self.lines.len()
    }

    fn rest(&self) -> &str {
        self.lines
            .get(self.row)
            .and_then(|line| line.get(self.column..))
            .unwrap_or("")
    }

    /// Move to the first line, starting with the current one, that contains
    /// `marker`, and place the column just past it.
    pub fn find(&mut self, marker: &str) -> Result<(), ScanError> {
        while let Some(line) = self.lines.get(self.row) {
            if let Some(position) = line.find(marker) {
                self.column = position + marker.len();
                return Ok(());
            }
            self.row += 1;
        }
        self.column = 0;
        Err(ScanError::UnexpectedEof {
            marker: marker.to_string(),
        })
    }

    pub fn next_line(&mut self) {
        self.row += 1;
        self.column = 0;
    }

    /// Skip spaces and return the following run of non-space characters.
    ///
    /// Returns an empty string at the end of a line.
    pub fn read_token(&mut self) -> &str {
        let rest = self.rest();
        let (remaining, found) = match token(rest) {
            Ok(result) => result,
            Err(_) => ("", rest),
        };
        let consumed = rest.len() - remaining.len();
        let start = self.column + (consumed - found.len());
        self.column += consumed;
        match self.lines.get(self.row) {
            Some(line) => &line[start..self.column],
            None => "",
        }
    }

    /// Read a `"quoted name"` as a whole, or a bare token otherwise.
    pub fn read_name(&mut self) -> String {
        let rest = self.rest();
        if let Ok((remaining, name)) = quoted(rest) {
            let consumed = rest.len() - remaining.len();
            let name = name.to_string();
            self.column += consumed;
            return name;
        }
        self.read_token().to_string()
    }

    fn invalid(&self, token: &str) -> ScanError {
        ScanError::InvalidNumber {
            token: token.to_string(),
            line: self.line_number(),
        }
    }

    pub fn read_int(&mut self) -> Result<i64, ScanError> {
        let token = self.read_token().to_string();
        let result: IResult<&str, i64> = all_consuming(parse_i64)(token.as_str());
        result.map(|(_, value)| value).map_err(|_| self.invalid(&token))
    }

    /// Read a non-negative integer such as a count or an index.
    pub fn read_index(&mut self) -> Result<usize, ScanError> {
        let token = self.read_token().to_string();
        let result: IResult<&str, u64> = all_consuming(parse_u64)(token.as_str());
        match result {
            Ok((_, value)) => usize::try_from(value).map_err(|_| self.invalid(&token)),
            Err(_) => Err(self.invalid(&token)),
        }
    }

    pub fn read_float(&mut self) -> Result<f32, ScanError> {
        let token = self.read_token().to_string();
        let result: IResult<&str, f32> = all_consuming(float)(token.as_str());
        result.map(|(_, value)| value).map_err(|_| self.invalid(&token))
    }
}
