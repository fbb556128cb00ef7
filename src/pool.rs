//! Fixed-size worker pool that returns results in input order.
//!
//! The fetch phase runs up to 32 comics concurrently, but the book needs them
//! back in exactly the order they were scheduled (newest first). Rather than
//! lean on an ordering-preserving parallel-iterator primitive, the pool makes
//! the guarantee explicit: workers claim item indices from a shared counter,
//! each result is recorded into a preallocated slot at its item's index, and
//! the scope join ensures every slot is filled before results are returned.
//!
//! Workers share nothing except the read-only item slice and the result
//! channel, so no locking is needed around the work itself.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

/// Apply `f` to every item using up to `workers` threads, returning results
/// in the same order as `items` regardless of completion order.
///
/// Blocks until all items are done. A panicking `f` propagates out of the
/// thread scope and aborts the batch.
pub fn map_ordered<T, R>(workers: usize, items: &[T], f: impl Fn(&T) -> R + Sync) -> Vec<R>
where
    T: Sync,
    R: Send,
{
    if items.is_empty() {
        return Vec::new();
    }
    let workers = workers.clamp(1, items.len());

    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(usize, R)>();

    let mut slots: Vec<Option<R>> = Vec::with_capacity(items.len());
    slots.resize_with(items.len(), || None);

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let next = &next;
            let f = &f;
            scope.spawn(move || {
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    if index >= items.len() {
                        break;
                    }
                    let result = f(&items[index]);
                    if tx.send((index, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        for (index, result) in rx {
            slots[index] = Some(result);
        }
    });

    slots
        .into_iter()
        .map(|slot| slot.expect("pool scope joined with an unfilled slot"))
        .collect()
}
