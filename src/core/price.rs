//! Pricing abstractions and core types

use crate::core::error::Result;
use async_trait::async_trait;
use std::fmt::Display;
use std::str::FromStr;

/// History window understood by the IEX chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartRange {
    #[default]
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    YearToDate,
    OneYear,
    TwoYears,
    FiveYears,
}

impl Display for ChartRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChartRange::FiveDays => "5d",
                ChartRange::OneMonth => "1m",
                ChartRange::ThreeMonths => "3m",
                ChartRange::SixMonths => "6m",
                ChartRange::YearToDate => "ytd",
                ChartRange::OneYear => "1y",
                ChartRange::TwoYears => "2y",
                ChartRange::FiveYears => "5y",
            }
        )
    }
}

impl FromStr for ChartRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "5d" => Ok(ChartRange::FiveDays),
            "1m" => Ok(ChartRange::OneMonth),
            "3m" => Ok(ChartRange::ThreeMonths),
            "6m" => Ok(ChartRange::SixMonths),
            "ytd" => Ok(ChartRange::YearToDate),
            "1y" => Ok(ChartRange::OneYear),
            "2y" => Ok(ChartRange::TwoYears),
            "5y" => Ok(ChartRange::FiveYears),
            _ => Err(anyhow::anyhow!("Invalid chart range: {}", s)),
        }
    }
}

/// One day's close for one symbol, as the API returned it.
///
/// `date` and `close` stay unparsed; the transformer decides whether they are usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRecord {
    pub symbol: String,
    pub date: Option<String>,
    pub close: Option<String>,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_history(&self, symbol: &str, range: ChartRange) -> Result<Vec<PriceRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_range_round_trip_through_display() {
        for range in [
            ChartRange::FiveDays,
            ChartRange::OneMonth,
            ChartRange::ThreeMonths,
            ChartRange::SixMonths,
            ChartRange::YearToDate,
            ChartRange::OneYear,
            ChartRange::TwoYears,
            ChartRange::FiveYears,
        ] {
            assert_eq!(range.to_string().parse::<ChartRange>().unwrap(), range);
        }
    }

    #[test]
    fn test_chart_range_parsing() {
        assert_eq!("1M".parse::<ChartRange>().unwrap(), ChartRange::OneMonth);
        assert_eq!("YTD".parse::<ChartRange>().unwrap(), ChartRange::YearToDate);
        assert!("10y".parse::<ChartRange>().is_err());
        assert_eq!(ChartRange::default(), ChartRange::FiveDays);
    }
}
