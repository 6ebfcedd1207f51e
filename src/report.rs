//! Cross-retailer discount report
//!
//! Pages through the same query on several clients until none of them has
//! more postings, pausing every few rounds to go easy on the API. The clients
//! themselves never paginate; this is the loop a caller would write.

use std::cmp::Ordering;
use std::time::Duration;

use log::{debug, info};

use crate::client::{Fundgrube, FundgrubeError};
use crate::data::Posting;
use crate::query::PostingsQuery;

/// Discount levels the summary counts postings at
pub const DISCOUNT_THRESHOLDS: [u32; 5] = [50, 60, 70, 80, 90];

/// How often to pause between rounds of requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after this many rounds; 0 never pauses
    pub every: u32,
    pub pause: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            every: 4,
            pause: Duration::from_secs(2),
        }
    }
}

/// Runs `query` against every client, following each one's pages until its
/// continuation flag is false
///
/// All clients advance in lockstep: round `n` requests offset `n * limit`
/// from every client that still has more postings.
pub async fn collect_postings(
    clients: &[Fundgrube],
    query: &PostingsQuery,
    pacing: Pacing,
) -> Result<Vec<Posting>, FundgrubeError> {
    let mut postings = Vec::new();
    let mut active = vec![true; clients.len()];
    let mut query = query.clone();
    let mut rounds = 0u32;

    while active.iter().any(|a| *a) {
        for (client, more) in clients.iter().zip(active.iter_mut()) {
            if !*more {
                continue;
            }
            let page = client.postings(&query).await?;
            debug!(
                "{}: {} postings from {}",
                client.retailer(),
                page.postings.len(),
                page.url
            );
            *more = page.more_available;
            postings.extend(page.postings);
        }

        rounds += 1;
        // A zero page size would request the same page forever
        if query.page_size() == 0 {
            break;
        }
        query = query.next_page();

        if pacing.every > 0 && rounds % pacing.every == 0 && active.iter().any(|a| *a) {
            info!("pausing {:?} after {} rounds", pacing.pause, rounds);
            tokio::time::sleep(pacing.pause).await;
        }
    }

    Ok(postings)
}

/// Number of postings at or above each threshold
pub fn discount_counts(postings: &[Posting], thresholds: &[u32]) -> Vec<(u32, usize)> {
    thresholds
        .iter()
        .map(|&threshold| {
            let count = postings
                .iter()
                .filter(|p| p.discount >= f64::from(threshold))
                .count();
            (threshold, count)
        })
        .collect()
}

/// Postings discounted at least `min_discount` percent, smallest discount first
pub fn best_deals(postings: &[Posting], min_discount: f64) -> Vec<&Posting> {
    let mut deals: Vec<&Posting> = postings
        .iter()
        .filter(|p| p.discount >= min_discount)
        .collect();
    deals.sort_by(|a, b| a.discount.partial_cmp(&b.discount).unwrap_or(Ordering::Equal));
    deals
}

/// One line per posting: `id | discount | retailer | brand name (old -> new)`
pub fn format_posting_line(posting: &Posting) -> String {
    format!(
        "{} | {}% | {:<10} | {} {} ({} -> {})",
        posting.product_id,
        posting.discount,
        posting.retailer.display_name(),
        posting.brand,
        posting.name,
        format_price(posting.price_old),
        format_price(posting.price),
    )
}

fn format_price(price: Option<f64>) -> String {
    match price {
        Some(price) => format!("{:.2}€", price),
        None => "?€".to_string(),
    }
}
