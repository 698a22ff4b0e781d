//! Call-Auction Matcher: accumulates resting orders without matching, then
//! resolves a single uniform clearing price and executes all crossable
//! volume in one shot.

use tracing::{debug, trace};

use crate::engine::book::Book;
use crate::error::{EngineError, EngineResult};
use crate::types::{Order, OrderKind, Price, Side, Trade};

/// Apply one event during a `CallAuction` interval: Limit orders rest
/// unconditionally (no crossing attempted), Cancel/Modify remove/replace as
/// in continuous trading, and Market orders — having no price to rest
/// at — are logged and discarded rather than matched, since no matching
/// happens before `match_call_auction` resolves the book.
pub fn accumulate(book: &mut Book, order: Order) -> EngineResult<()> {
    match order.kind {
        OrderKind::Cancel => {
            let target = order.target_uid.ok_or(EngineError::UnknownOrder(0))?;
            book.cancel(target)?;
            trace!(cancelled = target, "auction accumulate: cancel");
            Ok(())
        }
        OrderKind::Modify => {
            let target = order.target_uid.ok_or(EngineError::UnknownOrder(0))?;
            book.cancel(target)?;
            book.rest(order.side, order.price, order.quantity, order.uid);
            trace!(cancelled = target, new_uid = order.uid, "auction accumulate: modify");
            Ok(())
        }
        OrderKind::Limit => {
            book.rest(order.side, order.price, order.quantity, order.uid);
            trace!(uid = order.uid, price = order.price, qty = order.quantity, "auction accumulate: limit");
            Ok(())
        }
        OrderKind::Market => {
            debug!(uid = order.uid, "market order discarded during call-auction accumulation");
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    price: Price,
    bid_qty: u64,
    ask_qty: u64,
    crossable: u64,
}

/// Resolve the book's clearing price and execute every crossable unit.
/// `close_ts` is stamped on every resulting trade. `previous_close` feeds
/// the final tie-break rule, used when bid and ask pressure are perfectly
/// balanced at every tied candidate price.
///
/// Returns no trades (and leaves the book untouched) if there are no
/// candidate prices, or if the maximum executable volume is zero.
pub fn match_call_auction(
    book: &mut Book,
    close_ts: i64,
    previous_close: Option<Price>,
) -> Vec<Trade> {
    let bid_levels: Vec<(Price, u64)> = book
        .side(Side::Bid)
        .iter_from_best()
        .map(|(p, level)| (p, crate::engine::book_side::BookSide::lock_level(&level).total_quantity()))
        .collect();
    let ask_levels: Vec<(Price, u64)> = book
        .side(Side::Ask)
        .iter_from_best()
        .map(|(p, level)| (p, crate::engine::book_side::BookSide::lock_level(&level).total_quantity()))
        .collect();

    if bid_levels.is_empty() || ask_levels.is_empty() {
        return Vec::new();
    }

    let mut prices: Vec<Price> = bid_levels
        .iter()
        .map(|(p, _)| *p)
        .chain(ask_levels.iter().map(|(p, _)| *p))
        .collect();
    prices.sort_unstable();
    prices.dedup();

    let candidates: Vec<Candidate> = prices
        .iter()
        .map(|&p| {
            let bid_qty: u64 = bid_levels.iter().filter(|(lp, _)| *lp >= p).map(|(_, q)| q).sum();
            let ask_qty: u64 = ask_levels.iter().filter(|(lp, _)| *lp <= p).map(|(_, q)| q).sum();
            Candidate {
                price: p,
                bid_qty,
                ask_qty,
                crossable: bid_qty.min(ask_qty),
            }
        })
        .collect();

    let Some(clearing) = resolve_clearing_price(&candidates, previous_close) else {
        return Vec::new();
    };
    if clearing.crossable == 0 {
        return Vec::new();
    }

    execute(book, clearing.price, clearing.crossable, close_ts)
}

fn resolve_clearing_price(candidates: &[Candidate], previous_close: Option<Price>) -> Option<Candidate> {
    let max_x = candidates.iter().map(|c| c.crossable).max()?;
    if max_x == 0 {
        return None;
    }
    let top: Vec<Candidate> = candidates.iter().copied().filter(|c| c.crossable == max_x).collect();
    if top.len() == 1 {
        return Some(top[0]);
    }

    let min_imbalance = top.iter().map(|c| c.bid_qty.abs_diff(c.ask_qty)).min().unwrap();
    let top2: Vec<Candidate> = top
        .into_iter()
        .filter(|c| c.bid_qty.abs_diff(c.ask_qty) == min_imbalance)
        .collect();
    if top2.len() == 1 {
        return Some(top2[0]);
    }

    let ups: Vec<Candidate> = top2.iter().copied().filter(|c| c.bid_qty > c.ask_qty).collect();
    if !ups.is_empty() {
        return ups.into_iter().max_by_key(|c| c.price);
    }
    let downs: Vec<Candidate> = top2.iter().copied().filter(|c| c.bid_qty < c.ask_qty).collect();
    if !downs.is_empty() {
        return downs.into_iter().min_by_key(|c| c.price);
    }

    // every remaining tie has bid_qty == ask_qty exactly.
    match previous_close {
        Some(pc) => top2
            .into_iter()
            .min_by_key(|c| ((c.price - pc).abs(), std::cmp::Reverse(c.price))),
        None => top2.into_iter().max_by_key(|c| c.price),
    }
}

fn execute(book: &mut Book, clearing_price: Price, total_qty: u64, close_ts: i64) -> Vec<Trade> {
    let mut trades = Vec::new();
    let mut remaining = total_qty;

    while remaining > 0 {
        let Some(bid_price) = book.side(Side::Bid).best_price() else {
            break;
        };
        if bid_price < clearing_price {
            break;
        }
        let Some(ask_price) = book.side(Side::Ask).best_price() else {
            break;
        };
        if ask_price > clearing_price {
            break;
        }

        let bid_level = book.side(Side::Bid).peek_level(bid_price).expect("best implies live level");
        let ask_level = book.side(Side::Ask).peek_level(ask_price).expect("best implies live level");
        let (bid_head, ask_head) = {
            let bid_guard = crate::engine::book_side::BookSide::lock_level(&bid_level);
            let ask_guard = crate::engine::book_side::BookSide::lock_level(&ask_level);
            (bid_guard.peek_head(), ask_guard.peek_head())
        };
        let (Some(bid_head), Some(ask_head)) = (bid_head, ask_head) else {
            break;
        };

        let qty = remaining.min(bid_head.remaining).min(ask_head.remaining);
        trades.push(Trade {
            bid_uid: bid_head.uid,
            ask_uid: ask_head.uid,
            price: clearing_price,
            quantity: qty,
            timestamp: close_ts,
        });
        trace!(bid_uid = bid_head.uid, ask_uid = ask_head.uid, price = clearing_price, qty, "call auction trade");

        book.reduce(bid_head.uid, qty).expect("head order from peek_head is live");
        book.reduce(ask_head.uid, qty).expect("head order from peek_head is live");
        remaining -= qty;
    }

    trades
}
