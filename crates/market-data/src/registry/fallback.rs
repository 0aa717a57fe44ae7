//! Fallback resolution across the primary and secondary providers.
//!
//! Single-symbol requests are sequential: the primary is fully resolved
//! before the secondary is tried. Bulk quote requests race both providers per
//! symbol and keep the first usable answer.

use std::future::Future;
use std::pin::pin;
use std::sync::Arc;

use futures::future::{self, Either};
use log::{debug, info};

use super::CancelToken;
use crate::assembler::assemble;
use crate::models::{IntervalKind, NewsArticle, NormalizedQuote, SearchResult, Series};
use crate::provider::{MarketDataProvider, ProviderCapabilities};

/// Minimum trimmed query length for symbol search.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Trimmed, uppercased symbol, or `None` for a blank one.
fn canonical_symbol(symbol: &str) -> Option<String> {
    let symbol = symbol.trim();
    (!symbol.is_empty()).then(|| symbol.to_uppercase())
}

/// Await both futures concurrently and return the first `Some`.
///
/// If the first to settle is `None`, the other is awaited. Once a winner is
/// found the other future is dropped, so its outcome is discarded.
async fn first_some<T, A, B>(a: A, b: B) -> Option<T>
where
    A: Future<Output = Option<T>>,
    B: Future<Output = Option<T>>,
{
    let a = pin!(a);
    let b = pin!(b);

    match future::select(a, b).await {
        Either::Left((Some(value), _)) | Either::Right((Some(value), _)) => Some(value),
        Either::Left((None, b)) => b.await,
        Either::Right((None, a)) => a.await,
    }
}

/// Resolves requests against an ordered pair of market data providers plus
/// an optional news provider.
///
/// No error crosses this boundary: every outcome is either data or an
/// explicit absence (`None`, an empty series, an empty `Vec`).
pub struct FallbackResolver {
    primary: Arc<dyn MarketDataProvider>,
    secondary: Arc<dyn MarketDataProvider>,
    news: Option<Arc<dyn MarketDataProvider>>,
}

impl FallbackResolver {
    pub fn new(
        primary: Arc<dyn MarketDataProvider>,
        secondary: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self {
            primary,
            secondary,
            news: None,
        }
    }

    pub fn with_news(mut self, news: Arc<dyn MarketDataProvider>) -> Self {
        self.news = Some(news);
        self
    }

    /// Providers in authority order, filtered by capability.
    fn chain(
        &self,
        supports: fn(&ProviderCapabilities) -> bool,
    ) -> Vec<&Arc<dyn MarketDataProvider>> {
        [&self.primary, &self.secondary]
            .into_iter()
            .filter(|p| supports(&p.capabilities()))
            .collect()
    }

    /// Quote for one symbol: primary first, secondary only if the primary
    /// had nothing. `None` means no provider had the symbol.
    pub async fn get_quote(&self, symbol: &str, cancel: &CancelToken) -> Option<NormalizedQuote> {
        let symbol = canonical_symbol(symbol)?;

        for provider in self.chain(|c| c.supports_quote) {
            match cancel.guard(provider.fetch_quote(&symbol)).await {
                None => {
                    debug!("Quote request for {} cancelled", symbol);
                    return None;
                }
                Some(Some(quote)) => {
                    debug!("Quote for {} served by '{}'", symbol, provider.id());
                    return Some(quote);
                }
                Some(None) => {
                    info!(
                        "No quote for {} from '{}', trying next provider",
                        symbol,
                        provider.id()
                    );
                }
            }
        }

        info!("No quote available for {}", symbol);
        None
    }

    /// Quotes for many symbols.
    ///
    /// Symbols are resolved concurrently. Each one races the primary against
    /// the secondary and keeps whichever answers first with data. Symbols
    /// neither provider has are omitted; input order is otherwise kept.
    pub async fn get_quotes(
        &self,
        symbols: &[String],
        cancel: &CancelToken,
    ) -> Vec<NormalizedQuote> {
        let quotes: Vec<NormalizedQuote> = self
            .get_quotes_by_symbol(symbols, cancel)
            .await
            .into_iter()
            .filter_map(|(_, quote)| quote)
            .collect();

        tracing::debug!(
            "Bulk quote fetch resolved {} of {} symbols",
            quotes.len(),
            symbols.len()
        );

        quotes
    }

    /// Like [`get_quotes`](Self::get_quotes), but keyed by the requested
    /// symbol (canonicalised) rather than whatever symbol the provider echoes
    /// back. Blank symbols are skipped; unresolved ones pair with `None`.
    pub async fn get_quotes_by_symbol(
        &self,
        symbols: &[String],
        cancel: &CancelToken,
    ) -> Vec<(String, Option<NormalizedQuote>)> {
        let requested: Vec<String> = symbols.iter().filter_map(|s| canonical_symbol(s)).collect();
        let results =
            future::join_all(requested.iter().map(|s| self.race_quote(s.clone(), cancel))).await;

        requested.into_iter().zip(results).collect()
    }

    async fn race_quote(&self, symbol: String, cancel: &CancelToken) -> Option<NormalizedQuote> {
        let providers = self.chain(|c| c.supports_quote);

        let quote = match providers.as_slice() {
            [] => None,
            [only] => cancel.guard(only.fetch_quote(&symbol)).await.flatten(),
            [first, second, ..] => cancel
                .guard(first_some(
                    first.fetch_quote(&symbol),
                    second.fetch_quote(&symbol),
                ))
                .await
                .flatten(),
        };

        match &quote {
            Some(q) => tracing::debug!("Quote race for {} won by '{}'", symbol, q.source),
            None => tracing::debug!("No provider produced a quote for {}", symbol),
        }

        quote
    }

    /// Series for one symbol, assembled and optionally limited to the most
    /// recent `limit` bars.
    ///
    /// A provider whose bars are all invalid counts as having no data, so the
    /// next provider is tried. The result is empty when nothing worked.
    pub async fn get_series(
        &self,
        symbol: &str,
        interval: IntervalKind,
        limit: Option<usize>,
        cancel: &CancelToken,
    ) -> Series {
        let Some(symbol) = canonical_symbol(symbol) else {
            return Series::empty(String::new(), interval);
        };

        for provider in self.chain(|c| c.supports_series) {
            match cancel.guard(provider.fetch_series(&symbol, interval)).await {
                None => {
                    debug!("Series request for {} cancelled", symbol);
                    return Series::empty(symbol, interval);
                }
                Some(Some(bars)) => {
                    // Emptiness is judged before the limit is applied
                    let series = assemble(&symbol, interval, bars, None);
                    if !series.is_empty() {
                        debug!(
                            "{} {} series for {} served by '{}'",
                            series.len(),
                            interval,
                            symbol,
                            provider.id()
                        );
                        return match limit {
                            Some(count) => series.tail(count),
                            None => series,
                        };
                    }
                    info!(
                        "No usable {} bars for {} from '{}', trying next provider",
                        interval,
                        symbol,
                        provider.id()
                    );
                }
                Some(None) => {
                    info!(
                        "No {} series for {} from '{}', trying next provider",
                        interval,
                        symbol,
                        provider.id()
                    );
                }
            }
        }

        info!("No {} series available for {}", interval, symbol);
        Series::empty(symbol, interval)
    }

    /// Symbol search. Queries shorter than [`MIN_SEARCH_QUERY_LEN`] after
    /// trimming return empty without any upstream call.
    pub async fn get_search(&self, query: &str, cancel: &CancelToken) -> Vec<SearchResult> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Vec::new();
        }

        for provider in self.chain(|c| c.supports_search) {
            match cancel.guard(provider.fetch_search(query)).await {
                None => return Vec::new(),
                Some(results) if !results.is_empty() => return results,
                Some(_) => debug!("No search results for '{}' from '{}'", query, provider.id()),
            }
        }

        Vec::new()
    }

    /// Headlines about `symbol`, or general market news, truncated to
    /// `limit` when given.
    pub async fn get_news(
        &self,
        symbol: Option<&str>,
        limit: Option<usize>,
        cancel: &CancelToken,
    ) -> Vec<NewsArticle> {
        let Some(news) = self.news.as_ref().filter(|p| p.capabilities().supports_news) else {
            debug!("No news provider configured");
            return Vec::new();
        };

        let symbol = symbol.and_then(canonical_symbol);
        let mut articles = cancel
            .guard(news.fetch_news(symbol.as_deref()))
            .await
            .unwrap_or_default();

        if let Some(limit) = limit {
            articles.truncate(limit);
        }
        articles
    }
}
