//! Price feed records.
//!
//! # Design
//! The bulk price database is a semicolon-delimited text feed whose column
//! layout depends on the product line. Every layout shares the same eight
//! leading columns and the same four trailing ones; what sits between them is
//! captured by `RecordDetails`, one variant per product line. Fields are kept
//! as text, exactly as the feed carries them.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::product::ProductLine;

/// Columns shared by every layout before the product-specific block.
const LEADING: usize = 8;
/// Columns shared by every layout after the product-specific block.
const TRAILING: usize = 4;

/// One row of the price feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRecord {
    pub class_id: String,
    pub instance_id: String,
    pub price: String,
    pub offers: String,
    pub popularity: String,
    pub rarity: String,
    pub quality: String,
    pub hero_id: String,
    pub details: RecordDetails,
    pub market_name: String,
    pub name_color: String,
    pub price_updated: String,
    pub pop: String,
}

/// Product-specific columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "product", rename_all = "lowercase")]
pub enum RecordDetails {
    Dota2,
    Csgo {
        slot: String,
        stickers: String,
    },
    Tf2 {
        craftable: String,
        look: String,
        collection: String,
    },
    Gifts {
        slot: String,
        os: String,
        features: String,
        rating: String,
    },
}

impl RecordDetails {
    pub fn product(&self) -> ProductLine {
        match self {
            RecordDetails::Dota2 => ProductLine::Dota2,
            RecordDetails::Csgo { .. } => ProductLine::Csgo,
            RecordDetails::Tf2 { .. } => ProductLine::Tf2,
            RecordDetails::Gifts { .. } => ProductLine::Gifts,
        }
    }
}

/// Map one row of columns onto `product`'s layout.
///
/// Empty columns left by a terminating delimiter are ignored; any other
/// mismatch with the layout's column count is rejected.
pub fn map_row<S: AsRef<str>>(product: ProductLine, columns: &[S]) -> Result<PriceRecord, ApiError> {
    let expected = product.column_count();
    let mut found = columns.len();
    while found > expected && columns[found - 1].as_ref().is_empty() {
        found -= 1;
    }
    if found != expected {
        return Err(ApiError::MalformedRow {
            product,
            expected,
            found,
        });
    }

    let mut cols = columns[..expected].iter().map(|c| c.as_ref().to_string());
    // Length is checked above, so every `next` below yields a value.
    let mut next = || cols.next().unwrap_or_default();

    let class_id = next();
    let instance_id = next();
    let price = next();
    let offers = next();
    let popularity = next();
    let rarity = next();
    let quality = next();
    let hero_id = next();
    let details = match product {
        ProductLine::Dota2 => RecordDetails::Dota2,
        ProductLine::Csgo => RecordDetails::Csgo {
            slot: next(),
            stickers: next(),
        },
        ProductLine::Tf2 => RecordDetails::Tf2 {
            craftable: next(),
            look: next(),
            collection: next(),
        },
        ProductLine::Gifts => RecordDetails::Gifts {
            slot: next(),
            os: next(),
            features: next(),
            rating: next(),
        },
    };
    debug_assert_eq!(LEADING + details_width(product) + TRAILING, expected);

    Ok(PriceRecord {
        class_id,
        instance_id,
        price,
        offers,
        popularity,
        rarity,
        quality,
        hero_id,
        details,
        market_name: next(),
        name_color: next(),
        price_updated: next(),
        pop: next(),
    })
}

fn details_width(product: ProductLine) -> usize {
    match product {
        ProductLine::Dota2 => 0,
        ProductLine::Csgo => 2,
        ProductLine::Tf2 => 3,
        ProductLine::Gifts => 4,
    }
}

/// Parse a whole price feed: one header row, then data rows.
pub fn parse_price_feed(product: ProductLine, body: &[u8]) -> Result<Vec<PriceRecord>, ApiError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(body);

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    loop {
        match reader.read_record(&mut row) {
            Ok(true) => {
                let columns: Vec<&str> = row.iter().collect();
                records.push(map_row(product, &columns)?);
            }
            Ok(false) => break,
            Err(e) => return Err(ApiError::Feed(e.to_string())),
        }
    }

    debug!(%product, rows = records.len(), "parsed price feed");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{i}")).collect()
    }

    fn assert_common(record: &PriceRecord, total: usize) {
        assert_eq!(record.class_id, "c0");
        assert_eq!(record.instance_id, "c1");
        assert_eq!(record.price, "c2");
        assert_eq!(record.offers, "c3");
        assert_eq!(record.popularity, "c4");
        assert_eq!(record.rarity, "c5");
        assert_eq!(record.quality, "c6");
        assert_eq!(record.hero_id, "c7");
        assert_eq!(record.market_name, format!("c{}", total - 4));
        assert_eq!(record.name_color, format!("c{}", total - 3));
        assert_eq!(record.price_updated, format!("c{}", total - 2));
        assert_eq!(record.pop, format!("c{}", total - 1));
    }

    #[test]
    fn dota2_layout() {
        let record = map_row(ProductLine::Dota2, &columns(12)).unwrap();
        assert_common(&record, 12);
        assert_eq!(record.details, RecordDetails::Dota2);
    }

    #[test]
    fn csgo_layout() {
        let record = map_row(ProductLine::Csgo, &columns(14)).unwrap();
        assert_common(&record, 14);
        assert_eq!(
            record.details,
            RecordDetails::Csgo {
                slot: "c8".to_string(),
                stickers: "c9".to_string(),
            }
        );
    }

    #[test]
    fn tf2_layout() {
        let record = map_row(ProductLine::Tf2, &columns(15)).unwrap();
        assert_common(&record, 15);
        assert_eq!(
            record.details,
            RecordDetails::Tf2 {
                craftable: "c8".to_string(),
                look: "c9".to_string(),
                collection: "c10".to_string(),
            }
        );
    }

    #[test]
    fn gifts_layout() {
        let record = map_row(ProductLine::Gifts, &columns(16)).unwrap();
        assert_common(&record, 16);
        assert_eq!(
            record.details,
            RecordDetails::Gifts {
                slot: "c8".to_string(),
                os: "c9".to_string(),
                features: "c10".to_string(),
                rating: "c11".to_string(),
            }
        );
        assert_eq!(record.details.product(), ProductLine::Gifts);
    }

    #[test]
    fn short_rows_are_rejected() {
        for product in ProductLine::ALL {
            let expected = product.column_count();
            let err = map_row(product, &columns(expected - 1)).unwrap_err();
            assert_eq!(
                err,
                ApiError::MalformedRow {
                    product,
                    expected,
                    found: expected - 1
                }
            );
        }
    }

    #[test]
    fn long_rows_are_rejected_not_truncated() {
        let err = map_row(ProductLine::Dota2, &columns(14)).unwrap_err();
        assert!(matches!(err, ApiError::MalformedRow { expected: 12, found: 14, .. }));
    }

    #[test]
    fn trailing_empty_column_is_ignored() {
        let mut cols = columns(12);
        cols.push(String::new());
        let record = map_row(ProductLine::Dota2, &cols).unwrap();
        assert_eq!(record.pop, "c11");
    }

    #[test]
    fn feed_skips_header_and_maps_rows() {
        let feed = "c_classid;c_instanceid;c_price;c_offers;c_popularity;c_rarity;c_quality;c_heroid;c_market_name;c_name_color;c_price_updated;c_pop\n\
                    57939770;57939888;1500;3;12;Rare;Standard;0;Treasure Key;D2D2D2;1500000000;7\n\
                    1;2;100;1;1;Common;Standard;5;Plain \"Hat\";FFFFFF;1500000001;0\n";
        let records = parse_price_feed(ProductLine::Dota2, feed.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].class_id, "57939770");
        assert_eq!(records[0].market_name, "Treasure Key");
        assert_eq!(records[1].market_name, "Plain \"Hat\"");
    }

    #[test]
    fn feed_accepts_quoted_fields_with_delimiters() {
        let feed = "h\n1;2;3;4;5;6;7;8;\"slot;x\";[];\"AK-47 | Redline\";D2D2D2;9;10;\n";
        let records = parse_price_feed(ProductLine::Csgo, feed.as_bytes()).unwrap();
        assert_eq!(
            records[0].details,
            RecordDetails::Csgo {
                slot: "slot;x".to_string(),
                stickers: "[]".to_string(),
            }
        );
        assert_eq!(records[0].market_name, "AK-47 | Redline");
    }

    #[test]
    fn feed_with_only_header_is_empty() {
        let records = parse_price_feed(ProductLine::Tf2, b"c_classid;c_instanceid\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn malformed_feed_row_fails_the_whole_feed() {
        let feed = "h\n1;2;3\n";
        let err = parse_price_feed(ProductLine::Gifts, feed.as_bytes()).unwrap_err();
        assert!(matches!(err, ApiError::MalformedRow { found: 3, .. }));
    }
}
