//! Interactive console prompts.
//!
//! Every prompt re-asks until it gets a usable answer. Running out of input
//! is an error rather than an endless loop.

use crate::domain::asset::{Catalog, Ticker};
use crate::domain::error::CryptochartError;
use crate::domain::price_series::DateRange;
use chrono::NaiveDate;
use std::io::{self, BufRead, Write};

const RULE_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    Single,
    Paired,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String, CryptochartError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
        }
        Ok(line.trim().to_string())
    }

    fn rule(&mut self) -> Result<(), CryptochartError> {
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))?;
        Ok(())
    }

    pub fn select_mode(&mut self) -> Result<ChartMode, CryptochartError> {
        loop {
            write!(self.output, "Chart one asset or compare two? [1/2]: ")?;
            match self.read_line()?.as_str() {
                "" | "1" => return Ok(ChartMode::Single),
                "2" => return Ok(ChartMode::Paired),
                other => writeln!(self.output, "Please answer 1 or 2 (got \"{other}\").")?,
            }
        }
    }

    pub fn select_ticker(
        &mut self,
        catalog: &Catalog,
        label: &str,
    ) -> Result<Ticker, CryptochartError> {
        self.rule()?;
        writeln!(self.output, "What crypto would you like to plot {label}?\n")?;
        for asset in catalog.iter() {
            writeln!(self.output, "  {} ({})", asset.name, asset.ticker)?;
        }
        writeln!(self.output)?;

        loop {
            write!(self.output, "Ticker: ")?;
            let answer = self.read_line()?;
            match catalog.parse(&answer) {
                Ok(ticker) => {
                    self.rule()?;
                    return Ok(ticker);
                }
                Err(_) => {
                    let valid: Vec<&str> = catalog.iter().map(|a| a.ticker.as_str()).collect();
                    writeln!(
                        self.output,
                        "Unknown ticker \"{}\". Please enter one of: {}",
                        answer,
                        valid.join(", ")
                    )?;
                }
            }
        }
    }

    fn read_date(&mut self, label: &str) -> Result<Option<NaiveDate>, CryptochartError> {
        loop {
            write!(self.output, "{label}: ")?;
            let answer = self.read_line()?;
            if answer.is_empty() {
                return Ok(None);
            }
            match NaiveDate::parse_from_str(&answer, "%Y-%m-%d") {
                Ok(date) => return Ok(Some(date)),
                Err(_) => writeln!(self.output, "Invalid date \"{answer}\", expected YYYY-MM-DD.")?,
            }
        }
    }

    /// Blank bounds are open; two blanks mean no filter.
    pub fn select_range(&mut self) -> Result<Option<DateRange>, CryptochartError> {
        writeln!(self.output, "What date range (YYYY-MM-DD, blank for no limit)?")?;
        loop {
            let start = self.read_date("From")?;
            let end = self.read_date("To")?;
            match DateRange::from_bounds(start, end) {
                Ok(range) => return Ok(range),
                Err(e) => writeln!(self.output, "{e}. Try again.")?,
            }
        }
    }
}
