//! Fixed asset catalog.
//!
//! The set of supported assets is closed: ten tickers, each with a display
//! name. The catalog is built once at startup and handed to whoever needs it.

use crate::domain::error::CryptochartError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ticker {
    Btc,
    Eth,
    Xrp,
    Usdt,
    Sol,
    Bnb,
    Doge,
    Usdc,
    Ada,
    Trx,
}

impl Ticker {
    pub const ALL: [Ticker; 10] = [
        Ticker::Btc,
        Ticker::Eth,
        Ticker::Xrp,
        Ticker::Usdt,
        Ticker::Sol,
        Ticker::Bnb,
        Ticker::Doge,
        Ticker::Usdc,
        Ticker::Ada,
        Ticker::Trx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ticker::Btc => "BTC",
            Ticker::Eth => "ETH",
            Ticker::Xrp => "XRP",
            Ticker::Usdt => "USDT",
            Ticker::Sol => "SOL",
            Ticker::Bnb => "BNB",
            Ticker::Doge => "DOGE",
            Ticker::Usdc => "USDC",
            Ticker::Ada => "ADA",
            Ticker::Trx => "TRX",
        }
    }

    /// Name of the cache table holding this ticker's series.
    pub fn storage_key(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ticker {
    type Err = CryptochartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_uppercase();
        Ticker::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == symbol)
            .ok_or(CryptochartError::UnknownTicker { ticker: symbol })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub ticker: Ticker,
    pub name: &'static str,
}

impl Asset {
    /// Lowercased display name, as used in source URLs and export file names.
    pub fn slug(&self) -> String {
        self.name.to_lowercase()
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    assets: Vec<Asset>,
}

impl Catalog {
    pub fn standard() -> Self {
        let names = [
            "Bitcoin",
            "Ethereum",
            "Ripple",
            "Tether",
            "Solana",
            "Binance-Coin",
            "Dogecoin",
            "USD-Coin",
            "Cardano",
            "TRON",
        ];
        let assets = Ticker::ALL
            .iter()
            .zip(names)
            .map(|(&ticker, name)| Asset { ticker, name })
            .collect();
        Self { assets }
    }

    pub fn parse(&self, symbol: &str) -> Result<Ticker, CryptochartError> {
        symbol.parse()
    }

    pub fn name_of(&self, symbol: &str) -> Result<&'static str, CryptochartError> {
        let ticker = self.parse(symbol)?;
        Ok(self.asset(ticker).name)
    }

    pub fn is_valid(&self, symbol: &str) -> bool {
        self.parse(symbol).is_ok()
    }

    pub fn asset(&self, ticker: Ticker) -> &Asset {
        // Every Ticker variant has exactly one entry, in declaration order.
        &self.assets[ticker as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
