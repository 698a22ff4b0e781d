//! CSV ingestion: turns the event schema (`uid, side, kind, price,
//! quantity, timestamp, target_uid`) into `Order` records, honoring the
//! configured price scale and lot size. Out of scope for the matching core
//! itself, but a concrete part of this crate's external interface.

use std::path::Path;

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::types::{Order, OrderKind, Price, Side};

#[derive(Debug, Deserialize)]
struct RawRow {
    uid: String,
    side: String,
    kind: String,
    price: String,
    quantity: String,
    timestamp: String,
    #[serde(default)]
    target_uid: String,
}

/// Read every row of the CSV file at `path` and convert it into an `Order`,
/// in file order (the caller is responsible for the stable sort-by-timestamp
/// that requires — `Dispatcher::enqueue` does that). The reader is
/// opened, fully drained, and dropped (closing the file) on every exit path,
/// including the first parse error.
///
/// # Errors
/// `InvalidInput` naming the 1-indexed row and the field that failed to
/// parse. Ingestion aborts at the first bad row.
pub fn load_csv(path: &Path, config: &EngineConfig) -> EngineResult<Vec<Order>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| EngineError::InvalidInput { row: 0, message: e.to_string() })?;

    let mut orders = Vec::new();
    for (idx, record) in reader.deserialize::<RawRow>().enumerate() {
        let row_num = idx + 1;
        let raw = record.map_err(|e| EngineError::InvalidInput { row: row_num, message: e.to_string() })?;
        orders.push(row_to_order(&raw, row_num, config)?);
    }
    Ok(orders)
}

fn row_to_order(raw: &RawRow, row_num: usize, config: &EngineConfig) -> EngineResult<Order> {
    let invalid = |message: String| EngineError::InvalidInput { row: row_num, message };

    let uid: u64 = raw
        .uid
        .trim()
        .parse()
        .map_err(|_| invalid(format!("bad uid {:?}", raw.uid)))?;

    let side = match raw.side.trim() {
        "B" => Side::Bid,
        "S" => Side::Ask,
        other => return Err(invalid(format!("unknown side {other:?} (expected B or S)"))),
    };

    let kind = match raw.kind.trim() {
        "L" => OrderKind::Limit,
        "M" => OrderKind::Market,
        "C" => OrderKind::Cancel,
        "X" => OrderKind::Modify,
        other => return Err(invalid(format!("unknown kind {other:?} (expected L, M, C, or X)"))),
    };

    let timestamp = parse_timestamp(&raw.timestamp).ok_or_else(|| {
        invalid(format!("bad timestamp {:?} (expected integer ns or RFC3339)", raw.timestamp))
    })?;

    let target_uid = match kind {
        OrderKind::Cancel | OrderKind::Modify => Some(
            raw.target_uid
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(format!("bad target_uid {:?}", raw.target_uid)))?,
        ),
        OrderKind::Limit | OrderKind::Market => None,
    };

    let quantity = match kind {
        OrderKind::Cancel => 0,
        _ => {
            let raw_qty: u64 = raw
                .quantity
                .trim()
                .parse()
                .map_err(|_| invalid(format!("bad quantity {:?}", raw.quantity)))?;
            truncate_to_lot(raw_qty, config.lot_size)
        }
    };

    let price = match kind {
        OrderKind::Limit | OrderKind::Modify => parse_price(raw.price.trim(), config.price_scale)
            .map_err(|message| invalid(message))?,
        OrderKind::Market | OrderKind::Cancel => 0,
    };

    if matches!(kind, OrderKind::Limit) && price <= 0 {
        return Err(invalid(format!("limit price must be positive, got {price}")));
    }
    if matches!(kind, OrderKind::Limit | OrderKind::Market) && quantity == 0 {
        return Err(invalid("quantity truncates to zero at the configured lot size".to_string()));
    }

    Ok(Order { uid, side, kind, price, quantity, timestamp, target_uid })
}

fn truncate_to_lot(quantity: u64, lot_size: u64) -> u64 {
    if lot_size <= 1 {
        quantity
    } else {
        (quantity / lot_size) * lot_size
    }
}

/// Convert a decimal-text price column into the engine's scaled-integer
/// `Price`. A value with more fractional digits than `scale` is an error —
/// this never silently rounds.
fn parse_price(text: &str, scale: u32) -> Result<Price, String> {
    let decimal = Decimal::from_str_exact(text).map_err(|_| format!("bad price {text:?}"))?;
    if decimal.scale() > scale {
        return Err(format!(
            "price {text:?} has more than {scale} fractional digits"
        ));
    }
    let mantissa = decimal.mantissa();
    let exponent_diff = scale - decimal.scale();
    let scaled = mantissa
        .checked_mul(10i128.pow(exponent_diff))
        .ok_or_else(|| format!("price {text:?} out of range at scale {scale}"))?;
    i64::try_from(scaled).map_err(|_| format!("price {text:?} out of range at scale {scale}"))
}

/// Accepts either a raw integer nanosecond count or an RFC3339 timestamp.
fn parse_timestamp(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(ns) = text.parse::<i64>() {
        return Some(ns);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .and_then(|dt| dt.timestamp_nanos_opt())
}
