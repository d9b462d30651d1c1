//! Mapping from API price records to Quicken's price import layout

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::core::error::{ExportError, Result};
use crate::core::price::PriceRecord;

const API_DATE_FORMAT: &str = "%Y-%m-%d";
const TSX_SUFFIX: &str = "-CT";

/// A line of the Quicken price import file: `SYMBOL,PRICE,DATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickenRecord {
    pub symbol: String,
    pub price: String,
    pub date: String,
}

/// How the year is written in output dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `MM/DD/YYYY`
    #[default]
    Long,
    /// `MM/DD/YY`, as older Quicken versions expect
    Short,
}

impl DateStyle {
    fn format(&self) -> &'static str {
        match self {
            DateStyle::Long => "%m/%d/%Y",
            DateStyle::Short => "%m/%d/%y",
        }
    }
}

/// Uppercases a ticker and drops the `-CT` suffix IEX uses for TSX listings.
pub fn format_ticker(symbol: &str) -> String {
    let upper = symbol.trim().to_uppercase();
    match upper.strip_suffix(TSX_SUFFIX) {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => upper,
    }
}

pub fn format_price(price: Decimal) -> String {
    let mut price = price;
    if price.scale() < 2 {
        price.rescale(2);
    }
    price.to_string()
}

pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    date.format(style.format()).to_string()
}

fn convert(index: usize, record: &PriceRecord, style: DateStyle) -> Result<QuickenRecord> {
    let invalid = |reason: String| ExportError::Transform {
        index,
        symbol: record.symbol.clone(),
        reason,
    };

    let raw_date = record
        .date
        .as_deref()
        .ok_or_else(|| invalid("missing date".to_string()))?;
    let date = NaiveDate::parse_from_str(raw_date.trim(), API_DATE_FORMAT)
        .map_err(|e| invalid(format!("unparsable date '{raw_date}': {e}")))?;

    let raw_close = record
        .close
        .as_deref()
        .ok_or_else(|| invalid("missing close price".to_string()))?;
    let close = Decimal::from_str(raw_close.trim())
        .or_else(|_| Decimal::from_scientific(raw_close.trim()))
        .map_err(|e| invalid(format!("unparsable close price '{raw_close}': {e}")))?;

    Ok(QuickenRecord {
        symbol: format_ticker(&record.symbol),
        price: format_price(close),
        date: format_date(date, style),
    })
}

/// Converts every record in order, stopping at the first one that cannot be converted.
pub fn transform(records: &[PriceRecord], style: DateStyle) -> Result<Vec<QuickenRecord>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| convert(index, record, style))
        .collect()
}
