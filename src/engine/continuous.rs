//! Continuous Matcher: crosses one incoming aggressive order against the
//! opposite side of the book, event by event.

use tracing::trace;

use crate::engine::book::Book;
use crate::error::{EngineError, EngineResult};
use crate::types::{Order, OrderKind, Side, Trade};

/// Apply one event to `book` under continuous-trading rules, returning any
/// trades produced. Cancel/Modify against an absent `target_uid` return
/// `UnknownOrder` — callers in the dispatcher treat that as recoverable
/// (log, count, continue) rather than aborting the replay.
pub fn apply(book: &mut Book, order: Order) -> EngineResult<Vec<Trade>> {
    match order.kind {
        OrderKind::Cancel => {
            let target = order.target_uid.ok_or(EngineError::UnknownOrder(0))?;
            book.cancel(target)?;
            trace!(cancelled = target, "continuous cancel");
            Ok(Vec::new())
        }
        OrderKind::Modify => {
            let target = order.target_uid.ok_or(EngineError::UnknownOrder(0))?;
            book.cancel(target)?;
            trace!(cancelled = target, new_uid = order.uid, "continuous modify");
            let fresh = Order::limit(order.uid, order.side, order.price, order.quantity, order.timestamp);
            apply(book, fresh)
        }
        OrderKind::Limit | OrderKind::Market => apply_aggressive(book, order),
    }
}

fn crosses(order: &Order, opposite_best: i64) -> bool {
    match order.kind {
        OrderKind::Market => true,
        _ => match order.side {
            Side::Bid => opposite_best <= order.price,
            Side::Ask => opposite_best >= order.price,
        },
    }
}

fn apply_aggressive(book: &mut Book, order: Order) -> EngineResult<Vec<Trade>> {
    let mut trades = Vec::new();
    let opposite = order.side.opposite();
    let mut remaining = order.quantity;

    while remaining > 0 {
        let Some(best) = book.side(opposite).best_price() else {
            break;
        };
        if !crosses(&order, best) {
            break;
        }
        let level = book
            .side(opposite)
            .peek_level(best)
            .expect("best_price implies a live level");
        let head = {
            let guard = crate::engine::book_side::BookSide::lock_level(&level);
            guard.peek_head()
        };
        let Some(head) = head else {
            // level exists but is momentarily empty (shouldn't happen once
            // drop_if_empty has run, but guards against a stale best_price).
            book.side(opposite).drop_if_empty(best);
            break;
        };

        let trade_qty = remaining.min(head.remaining);
        let trade_price = best;
        let (bid_uid, ask_uid) = match order.side {
            Side::Bid => (order.uid, head.uid),
            Side::Ask => (head.uid, order.uid),
        };
        trades.push(Trade {
            bid_uid,
            ask_uid,
            price: trade_price,
            quantity: trade_qty,
            timestamp: order.timestamp,
        });
        trace!(
            bid_uid,
            ask_uid,
            price = trade_price,
            qty = trade_qty,
            "continuous trade"
        );

        book.reduce(head.uid, trade_qty)?;
        remaining -= trade_qty;
    }

    if order.kind == OrderKind::Limit && remaining > 0 {
        book.rest(order.side, order.price, remaining, order.uid);
    }

    Ok(trades)
}
