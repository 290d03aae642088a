//! The four marketplaces sharing one protocol shape.
//!
//! Each product line is bound to a fixed base URL, an upstream numeric app
//! code and a column layout for the price feed. Because the set is a closed
//! enum, an unsupported product line cannot reach the record mapper.

use std::fmt;
use std::str::FromStr;

/// One of the supported marketplaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductLine {
    Dota2,
    Csgo,
    Tf2,
    Gifts,
}

impl ProductLine {
    pub const ALL: [ProductLine; 4] = [
        ProductLine::Dota2,
        ProductLine::Csgo,
        ProductLine::Tf2,
        ProductLine::Gifts,
    ];

    pub fn base_url(self) -> &'static str {
        match self {
            ProductLine::Dota2 => "https://market.dota2.net",
            ProductLine::Csgo => "https://market.csgo.com",
            ProductLine::Tf2 => "https://tf2.tm",
            ProductLine::Gifts => "https://gifts.tm",
        }
    }

    /// Upstream app code, used to name the current price database.
    pub fn app_code(self) -> &'static str {
        match self {
            ProductLine::Dota2 => "570",
            ProductLine::Csgo => "730",
            ProductLine::Tf2 => "440",
            ProductLine::Gifts => "753",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            ProductLine::Dota2 => "dota2",
            ProductLine::Csgo => "csgo",
            ProductLine::Tf2 => "tf2",
            ProductLine::Gifts => "gifts",
        }
    }

    /// Number of columns in one row of this product line's price feed.
    pub fn column_count(self) -> usize {
        match self {
            ProductLine::Dota2 => 12,
            ProductLine::Csgo => 14,
            ProductLine::Tf2 => 15,
            ProductLine::Gifts => 16,
        }
    }
}

impl fmt::Display for ProductLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Returned when a string names no known product line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown product line \"{0}\" (expected dota2, csgo, tf2 or gifts)")]
pub struct UnknownProductLine(pub String);

impl FromStr for ProductLine {
    type Err = UnknownProductLine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductLine::ALL
            .into_iter()
            .find(|p| p.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownProductLine(s.to_string()))
    }
}
