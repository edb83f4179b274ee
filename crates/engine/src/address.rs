//! A1-style cell and range addressing.
//!
//! Coordinates are 0-based internally and rendered 1-based with column letters,
//! so `CellAddr { row: 6, col: 1 }` is `B7`.

use std::fmt;
use std::str::FromStr;

/// A single cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddr {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub col: usize,
}

impl CellAddr {
    #[inline]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Build from a 1-based row number and a column letter, e.g. `(14, 'E')`.
    pub fn at(row_number: usize, col_letter: char) -> Self {
        let col = (col_letter.to_ascii_uppercase() as u8).saturating_sub(b'A') as usize;
        Self::new(row_number.saturating_sub(1), col)
    }

    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| AddressError(format!("missing row number in '{s}'")))?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AddressError(format!("bad column in '{s}'")));
        }
        let row: usize = digits
            .parse()
            .map_err(|_| AddressError(format!("bad row number in '{s}'")))?;
        if row == 0 {
            return Err(AddressError(format!("row numbers start at 1 in '{s}'")));
        }
        Ok(Self::new(row - 1, letters_to_col(letters)))
    }
}

impl fmt::Display for CellAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", col_to_letters(self.col), self.row + 1)
    }
}

impl FromStr for CellAddr {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An inclusive rectangular range. A single cell is a range whose corners coincide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RangeAddr {
    pub start: CellAddr,
    pub end: CellAddr,
}

impl RangeAddr {
    pub fn new(start: CellAddr, end: CellAddr) -> Self {
        Self {
            start: CellAddr::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellAddr::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    pub fn cell(addr: CellAddr) -> Self {
        Self { start: addr, end: addr }
    }

    /// Columns `first..=last` of one 1-based row, e.g. `row_span(7, 'B', 'F')` is `B7:F7`.
    pub fn row_span(row_number: usize, first: char, last: char) -> Self {
        Self::new(CellAddr::at(row_number, first), CellAddr::at(row_number, last))
    }

    pub fn parse(s: &str) -> Result<Self, AddressError> {
        match s.split_once(':') {
            Some((a, b)) => Ok(Self::new(CellAddr::parse(a)?, CellAddr::parse(b)?)),
            None => Ok(Self::cell(CellAddr::parse(s)?)),
        }
    }

    pub fn height(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    pub fn width(&self) -> usize {
        self.end.col - self.start.col + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, addr: CellAddr) -> bool {
        (self.start.row..=self.end.row).contains(&addr.row)
            && (self.start.col..=self.end.col).contains(&addr.col)
    }

    /// Row-major iteration over every cell in the range.
    pub fn cells(&self) -> impl Iterator<Item = CellAddr> + '_ {
        (self.start.row..=self.end.row)
            .flat_map(move |r| (self.start.col..=self.end.col).map(move |c| CellAddr::new(r, c)))
    }
}

impl fmt::Display for RangeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for RangeAddr {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressError(pub String);

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cell reference: {}", self.0)
    }
}

impl std::error::Error for AddressError {}

/// Convert 0-based column index to letter(s): 0=A, 25=Z, 26=AA.
pub fn col_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

fn letters_to_col(letters: &str) -> usize {
    letters
        .chars()
        .fold(0usize, |acc, c| acc * 26 + (c.to_ascii_uppercase() as u8 - b'A') as usize + 1)
        - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_letters() {
        assert_eq!(col_to_letters(0), "A");
        assert_eq!(col_to_letters(25), "Z");
        assert_eq!(col_to_letters(26), "AA");
        assert_eq!(col_to_letters(701), "ZZ");
        assert_eq!(col_to_letters(702), "AAA");
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(CellAddr::parse("A1").unwrap(), CellAddr::new(0, 0));
        assert_eq!(CellAddr::parse("f14").unwrap(), CellAddr::new(13, 5));
        assert_eq!(CellAddr::parse("AA10").unwrap(), CellAddr::new(9, 26));
        assert!(CellAddr::parse("A0").is_err());
        assert!(CellAddr::parse("14").is_err());
        assert!(CellAddr::parse("B").is_err());
    }

    #[test]
    fn test_parse_range_and_display() {
        let r = RangeAddr::parse("B7:F7").unwrap();
        assert_eq!(r.height(), 1);
        assert_eq!(r.width(), 5);
        assert_eq!(r.to_string(), "B7:F7");

        let single = RangeAddr::parse("A5").unwrap();
        assert!(single.is_single_cell());
        assert_eq!(single.to_string(), "A5");
    }

    #[test]
    fn test_row_span_and_at() {
        assert_eq!(RangeAddr::row_span(12, 'B', 'F').to_string(), "B12:F12");
        assert_eq!(CellAddr::at(14, 'E').to_string(), "E14");
    }

    #[test]
    fn test_reversed_corners_normalize() {
        let r = RangeAddr::parse("F7:B6").unwrap();
        assert_eq!(r.to_string(), "B6:F7");
        assert_eq!(r.cells().count(), 10);
        assert!(r.contains(CellAddr::parse("C6").unwrap()));
    }
}
