use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::PriceProvider;
use crate::error::ProviderError;
use crate::model::{PricePoint, Profile};

/// Offline provider over a directory of `SYMBOL.TXT` history files.
///
/// Each line holds `YYYYMMDD close adjclose`, separated by spaces, tabs or
/// commas. An optional `SYMBOL.toml` next to it supplies `name` and
/// `currency`.
#[derive(Debug, Clone)]
pub struct FileProvider {
    dir: PathBuf,
}

impl FileProvider {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn history_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.TXT", symbol))
    }

    fn profile_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.toml", symbol))
    }
}

/// Missing files read as `None`.
fn read_optional(path: &Path) -> Result<Option<String>, ProviderError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl PriceProvider for FileProvider {
    async fn daily_history(&self, symbol: &str) -> Result<Vec<PricePoint>, ProviderError> {
        match read_optional(&self.history_path(symbol))? {
            Some(text) => parse_price_lines(&text),
            None => Ok(Vec::new()),
        }
    }

    async fn profile(&self, symbol: &str) -> Result<Profile, ProviderError> {
        match read_optional(&self.profile_path(symbol))? {
            Some(text) => toml::from_str(&text).map_err(|e| ProviderError::Parse(e.to_string())),
            None => Ok(Profile::default()),
        }
    }
}

/// Parse `YYYYMMDD close adjclose` lines. Blank lines are skipped.
pub fn parse_price_lines(text: &str) -> Result<Vec<PricePoint>, ProviderError> {
    let mut points = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parse_err =
            |what: &str| ProviderError::Parse(format!("{} on line {}", what, line_num + 1));

        let date_str = line.get(..8).ok_or_else(|| parse_err("Line too short"))?;
        if !date_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(parse_err("Invalid date"));
        }
        let date = NaiveDate::parse_from_str(date_str, "%Y%m%d")
            .map_err(|_| parse_err("Invalid date"))?;

        let mut fields = line[8..].split([' ', '\t', ',']).filter(|s| !s.is_empty());

        let close = fields
            .next()
            .ok_or_else(|| parse_err("No price found"))?
            .parse::<f64>()
            .map_err(|_| parse_err("Invalid close"))?;

        let adjusted_close = fields
            .next()
            .ok_or_else(|| parse_err("No adjusted close"))?
            .parse::<f64>()
            .map_err(|_| parse_err("Invalid adjusted close"))?;

        points.push(PricePoint {
            date,
            close,
            adjusted_close,
        });
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_lines() {
        let text = "20240102 37.10 30.20\n\n20240103\t37.50\t30.50\n20240104,38.00,31.00\n";
        let points = parse_price_lines(text).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[1].close, 37.5);
        assert_eq!(points[2].adjusted_close, 31.0);
    }

    #[test]
    fn test_parse_errors_name_the_line() {
        let err = parse_price_lines("20240102 1.0 1.0\n2024-01-03 1.0 1.0").unwrap_err();
        assert!(err.to_string().contains("line 2"));

        let err = parse_price_lines("20240102 1.0").unwrap_err();
        assert!(err.to_string().contains("No adjusted close"));

        let err = parse_price_lines("20241302 1.0 1.0").unwrap_err();
        assert!(err.to_string().contains("Invalid date"));

        assert!(parse_price_lines("2024").is_err());
        assert!(parse_price_lines("20240102 abc 1.0").is_err());
    }
}
