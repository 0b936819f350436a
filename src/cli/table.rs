//! Table output for analysis commands
//!
//! One row type, rendered per output format: boxed tables for the terminal,
//! markdown via tabled, and plain TSV/CSV for piping.

use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::escape_csv;
use crate::cli::OutputFormat;

/// Headers plus string rows
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Render for a tabular format (structured formats fall back to auto)
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Tsv => self.delimited("\t", |s| s.replace(['\t', '\n'], " ")),
            OutputFormat::Csv => self.delimited(",", escape_csv),
            OutputFormat::Md => self.tabled(true),
            _ => self.tabled(false),
        }
    }

    fn tabled(&self, markdown: bool) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.clone());
        for row in &self.rows {
            builder.push_record(row.clone());
        }
        let mut table = builder.build();
        if markdown {
            table.with(Style::markdown());
        } else {
            table.with(Style::rounded());
        }
        table.to_string()
    }

    fn delimited(&self, sep: &str, escape: impl Fn(&str) -> String) -> String {
        let mut out = String::new();
        for line in std::iter::once(&self.headers).chain(self.rows.iter()) {
            let cells: Vec<String> = line.iter().map(|c| escape(c)).collect();
            out.push_str(&cells.join(sep));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["PART", "SCORE"]);
        table.push(["MCU-1", "72.5"]);
        table.push(["CAP, 10uF", "12.0"]);
        table
    }

    #[test]
    fn test_tsv_output() {
        let out = sample().render(OutputFormat::Tsv);
        assert_eq!(out, "PART\tSCORE\nMCU-1\t72.5\nCAP, 10uF\t12.0\n");
    }

    #[test]
    fn test_csv_escapes_commas() {
        let out = sample().render(OutputFormat::Csv);
        assert!(out.contains("\"CAP, 10uF\",12.0"));
    }

    #[test]
    fn test_markdown_has_header_rule() {
        let out = sample().render(OutputFormat::Md);
        assert!(out.contains("| PART"));
        assert!(out.contains("|---"));
    }

    #[test]
    fn test_len() {
        let table = sample();
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }
}
