//! Cart reconciliation: stored entries joined with live product records.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use rust_decimal::Decimal;
use shopfront_core::{Cart, EnrichedLineItem, Product};
use tracing::{debug, info, instrument, warn};

use crate::products::ProductSource;

/// Produce the enriched line items for a cart.
///
/// One fetch is issued per distinct product id, all concurrently, and every
/// fetch completes before output is built. Items come out in cart order
/// regardless of which fetch finished first. An entry whose fetch fails, or
/// whose fetched record carries a different id, is omitted; the failure is
/// logged and nothing else is affected.
#[instrument(skip_all, fields(entries = cart.len()))]
pub async fn reconcile<P: ProductSource>(products: &P, cart: &Cart) -> Vec<EnrichedLineItem> {
    if cart.is_empty() {
        return Vec::new();
    }

    let fetches = cart.product_ids().map(|id| async move {
        let result = products.fetch(id).await;
        (id, result)
    });
    let results = join_all(fetches).await;

    let mut resolved: HashMap<_, Product> = HashMap::with_capacity(results.len());
    for (requested, result) in results {
        match result {
            Ok(product) if &product.id == requested => {
                resolved.insert(product.id.clone(), product);
            }
            Ok(product) => {
                warn!(
                    product_id = %requested,
                    returned_id = %product.id,
                    "Backend returned a different product; dropping cart entry"
                );
            }
            Err(e) if e.is_not_found() => {
                info!(product_id = %requested, "Product no longer exists; dropping cart entry");
            }
            Err(e) => {
                warn!(product_id = %requested, error = %e, "Product unavailable; dropping cart entry");
            }
        }
    }

    let items: Vec<EnrichedLineItem> = cart
        .entries()
        .iter()
        .filter_map(|entry| {
            resolved
                .remove(&entry.product_id)
                .map(|product| EnrichedLineItem::new(product, entry.quantity))
        })
        .collect();

    debug!(resolved = items.len(), "Cart reconciled");
    items
}

/// Outcome of a [`CartView::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The run was the latest issued; its items are now current.
    Applied { generation: u64 },
    /// A newer run was issued while this one was in flight; its items were
    /// discarded.
    Stale { generation: u64 },
}

impl Refresh {
    /// Whether the run's items were published.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

#[derive(Debug, Default)]
struct Snapshot {
    generation: u64,
    items: Vec<EnrichedLineItem>,
}

/// The current enriched view of a cart.
///
/// Each [`refresh`](Self::refresh) takes a generation number from a monotonic
/// counter. When a run finishes, its items are published only if no newer run
/// has been issued since (last-issued-wins). A slow reconciliation of an old
/// cart can therefore never overwrite the view of a newer one.
#[derive(Debug)]
pub struct CartView<P> {
    products: P,
    issued: AtomicU64,
    current: Mutex<Snapshot>,
}

impl<P: ProductSource> CartView<P> {
    /// Create an empty view over a product source.
    #[must_use]
    pub fn new(products: P) -> Self {
        Self {
            products,
            issued: AtomicU64::new(0),
            current: Mutex::new(Snapshot::default()),
        }
    }

    /// Reconcile `cart` and publish the result if it is still the latest run.
    pub async fn refresh(&self, cart: &Cart) -> Refresh {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let items = reconcile(&self.products, cart).await;

        let mut current = self.snapshot();
        if generation != self.issued.load(Ordering::SeqCst) || generation < current.generation {
            debug!(generation, "Discarding stale cart reconciliation");
            return Refresh::Stale { generation };
        }

        *current = Snapshot { generation, items };
        Refresh::Applied { generation }
    }

    /// The current line items.
    #[must_use]
    pub fn items(&self) -> Vec<EnrichedLineItem> {
        self.snapshot().items.clone()
    }

    /// Generation of the published items; 0 before the first refresh.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.snapshot().generation
    }

    /// Total of the current line items.
    #[must_use]
    pub fn total(&self) -> Decimal {
        super::total(&self.snapshot().items)
    }

    fn snapshot(&self) -> MutexGuard<'_, Snapshot> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use rust_decimal::Decimal;
    use shopfront_core::{CartEntry, Price, ProductId};
    use tokio::sync::Notify;

    use super::*;
    use crate::products::ApiError;

    pub(crate) fn product(id: &str, price: Decimal, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::new(price).unwrap(),
            stock,
            images: Vec::new(),
            category: None,
        }
    }

    /// In-memory catalog that counts fetches and can hold one id until released.
    #[derive(Default)]
    pub(crate) struct FakeCatalog {
        products: HashMap<ProductId, Product>,
        gated: Option<(ProductId, Arc<Notify>)>,
        fetches: AtomicUsize,
    }

    impl FakeCatalog {
        pub(crate) fn with(products: impl IntoIterator<Item = Product>) -> Self {
            Self {
                products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
                ..Self::default()
            }
        }

        fn gate(mut self, id: &str, notify: Arc<Notify>) -> Self {
            self.gated = Some((ProductId::new(id), notify));
            self
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl ProductSource for FakeCatalog {
        fn fetch(
            &self,
            id: &ProductId,
        ) -> impl Future<Output = Result<Product, ApiError>> + Send {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let gate = self
                .gated
                .as_ref()
                .filter(|(gated, _)| gated == id)
                .map(|(_, notify)| Arc::clone(notify));
            let result = self
                .products
                .get(id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(format!("product {id}")));
            async move {
                if let Some(notify) = gate {
                    notify.notified().await;
                }
                result
            }
        }
    }

    fn cart(entries: &[(&str, u32)]) -> Cart {
        entries
            .iter()
            .map(|(id, qty)| CartEntry::new(ProductId::new(*id), *qty))
            .collect()
    }

    fn ids(items: &[EnrichedLineItem]) -> Vec<&str> {
        items.iter().map(|i| i.product_id().as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_cart_fetches_nothing() {
        let catalog = FakeCatalog::default();
        let items = reconcile(&catalog, &Cart::new()).await;
        assert!(items.is_empty());
        assert_eq!(catalog.fetches(), 0);
    }

    #[tokio::test]
    async fn test_single_entry_is_enriched() {
        let catalog = FakeCatalog::with([product("A", Decimal::new(999, 2), 5)]);
        let items = reconcile(&catalog, &cart(&[("A", 2)])).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].product.stock, 5);
        assert_eq!(super::super::total(&items), Decimal::new(1998, 2));
    }

    #[tokio::test]
    async fn test_failed_fetch_drops_only_that_entry() {
        let catalog = FakeCatalog::with([
            product("A", Decimal::ONE, 9),
            product("C", Decimal::TWO, 9),
        ]);
        let items = reconcile(&catalog, &cart(&[("A", 1), ("B", 3), ("C", 2)])).await;

        assert_eq!(ids(&items), ["A", "C"]);
        assert_eq!(items[1].quantity, 2);
        assert_eq!(catalog.fetches(), 3);
    }

    #[tokio::test]
    async fn test_order_follows_cart_not_completion() {
        let release = Arc::new(Notify::new());
        let catalog = FakeCatalog::with([
            product("A", Decimal::ONE, 9),
            product("B", Decimal::ONE, 9),
        ])
        .gate("A", Arc::clone(&release));

        let entries = cart(&[("A", 1), ("B", 1)]);
        let (items, ()) = tokio::join!(reconcile(&catalog, &entries), async {
            // B resolves on the first poll; A only once released
            tokio::task::yield_now().await;
            release.notify_one();
        });
        assert_eq!(ids(&items), ["A", "B"]);
    }

    #[tokio::test]
    async fn test_mismatched_id_is_dropped() {
        let mut catalog = FakeCatalog::with([product("B", Decimal::ONE, 1)]);
        catalog
            .products
            .insert(ProductId::new("A"), product("B", Decimal::ONE, 1));

        let items = reconcile(&catalog, &cart(&[("A", 1)])).await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_view_discards_stale_generation() {
        let release = Arc::new(Notify::new());
        let catalog = FakeCatalog::with([
            product("slow", Decimal::ONE, 9),
            product("fast", Decimal::TWO, 9),
        ])
        .gate("slow", Arc::clone(&release));
        let view = CartView::new(catalog);

        let old_cart = cart(&[("slow", 1)]);
        let new_cart = cart(&[("fast", 1)]);

        let (old, new) = tokio::join!(view.refresh(&old_cart), async {
            let outcome = view.refresh(&new_cart).await;
            release.notify_one();
            outcome
        });

        assert_eq!(new, Refresh::Applied { generation: 2 });
        assert_eq!(old, Refresh::Stale { generation: 1 });
        assert_eq!(ids(&view.items()), ["fast"]);
        assert_eq!(view.generation(), 2);
        assert_eq!(view.total(), Decimal::TWO);
    }

    #[tokio::test]
    async fn test_view_applies_sequential_refreshes() {
        let view = CartView::new(FakeCatalog::with([product("A", Decimal::ONE, 9)]));

        assert!(view.refresh(&cart(&[("A", 1)])).await.is_applied());
        assert_eq!(view.total(), Decimal::ONE);

        assert!(view.refresh(&Cart::new()).await.is_applied());
        assert!(view.items().is_empty());
        assert_eq!(view.generation(), 2);
    }
}
