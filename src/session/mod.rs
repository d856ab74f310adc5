//! In-memory session state: result list, navigation cursor, cart.
//!
//! Sessions live for the process lifetime only — a restart loses everything,
//! which is the stated freshness-over-durability contract. The registry is an
//! explicit object injected into the router, not ambient global state.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::models::{CartItem, Product};

/// Progress of the most recent search on a session, consumed by the
/// asynchronous search-status polling endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Idle,
    Pending,
    Complete,
}

/// Per-session mutable state. Owned by the registry; mutated only through
/// the command router, one whole operation at a time under the session's
/// own mutex.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSession {
    pub session_id: String,
    pub current_products: Vec<Product>,
    pub current_index: usize,
    pub last_query: String,
    pub cart: Vec<CartItem>,
    pub active: bool,
    pub search_status: SearchStatus,
}

impl SearchSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            current_products: Vec::new(),
            current_index: 0,
            last_query: String::new(),
            cart: Vec::new(),
            active: true,
            search_status: SearchStatus::Idle,
        }
    }

    pub fn has_results(&self) -> bool {
        !self.current_products.is_empty()
    }

    pub fn current_product(&self) -> Option<&Product> {
        self.current_products.get(self.current_index)
    }

    /// Install a fresh result list: cursor back to zero, status complete.
    /// An empty list returns the session to idle.
    pub fn set_results(&mut self, query: &str, products: Vec<Product>) {
        self.last_query = query.to_string();
        self.current_products = products;
        self.current_index = 0;
        self.search_status = SearchStatus::Complete;
    }

    pub fn begin_search(&mut self, query: &str) {
        self.last_query = query.to_string();
        self.current_products.clear();
        self.current_index = 0;
        self.search_status = SearchStatus::Pending;
    }

    /// Add a product to the cart. Exact title match increments quantity
    /// instead of duplicating the row.
    pub fn add_to_cart(&mut self, product: &Product) -> String {
        if let Some(item) = self.cart.iter_mut().find(|item| item.title == product.title) {
            item.quantity += 1;
            return format!("Increased quantity of {} to {}", item.title, item.quantity);
        }

        self.cart.push(CartItem {
            title: product.title.clone(),
            price: product.price.unwrap_or(0),
            quantity: 1,
            source_store: product.source_store.clone(),
        });
        format!("Added {} to your cart", product.title)
    }

    /// Remove a cart row by exact title match.
    pub fn remove_from_cart(&mut self, title: &str) -> (bool, String) {
        if self.cart.is_empty() {
            return (false, "Your cart is empty".to_string());
        }
        match self.cart.iter().position(|item| item.title == title) {
            Some(index) => {
                let removed = self.cart.remove(index);
                (true, format!("Removed {} from your cart", removed.title))
            }
            None => (false, format!("Could not find {title} in your cart")),
        }
    }

    pub fn clear_cart(&mut self) -> String {
        self.cart.clear();
        "Your cart has been cleared".to_string()
    }

    pub fn cart_total(&self) -> u64 {
        self.cart.iter().map(CartItem::line_total).sum()
    }

    pub fn cart_unit_count(&self) -> u32 {
        self.cart.iter().map(|item| item.quantity).sum()
    }

    /// Voice-friendly cart summary: every row plus the total.
    pub fn cart_summary(&self) -> String {
        if self.cart.is_empty() {
            return "Your cart is empty".to_string();
        }

        let units = self.cart_unit_count();
        let plural = if units == 1 { "" } else { "s" };
        let mut parts = vec![format!("You have {units} item{plural} in your cart")];

        for (position, item) in self.cart.iter().enumerate() {
            if item.quantity > 1 {
                parts.push(format!(
                    "Item {}: {} units of {} at rupees {} each",
                    position + 1,
                    item.quantity,
                    item.title,
                    item.price
                ));
            } else {
                parts.push(format!(
                    "Item {}: {} at rupees {}",
                    position + 1,
                    item.title,
                    item.price
                ));
            }
        }

        parts.push(format!("Total amount: rupees {}", self.cart_total()));
        parts.join(". ") + "."
    }

    /// Simulated checkout: requires a non-empty cart, empties it, returns a
    /// confirmation. No order record survives the call.
    pub fn checkout(&mut self) -> (bool, String) {
        if self.cart.is_empty() {
            return (
                false,
                "Your cart is empty. Add some items before checkout.".to_string(),
            );
        }

        let summary = self.cart_summary();
        self.cart.clear();
        (
            true,
            format!(
                "Proceeding to checkout. {summary} Your order has been placed successfully. Thank you for shopping with us!"
            ),
        )
    }
}

/// Process-wide session registry.
///
/// The outer lock guards only the map; every session sits behind its own
/// mutex so a navigate or cart operation applies atomically without any
/// cross-session contention.
pub struct SessionRegistry {
    default_id: String,
    sessions: RwLock<HashMap<String, Arc<Mutex<SearchSession>>>>,
}

impl SessionRegistry {
    pub fn new(default_id: impl Into<String>) -> Self {
        Self {
            default_id: default_id.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Map an optional caller-supplied id to the effective session key.
    pub fn resolve_id(&self, session_id: Option<&str>) -> String {
        match session_id {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => self.default_id.clone(),
        }
    }

    /// Fetch a session, creating it lazily on first reference.
    pub async fn get_or_create(&self, session_id: Option<&str>) -> Arc<Mutex<SearchSession>> {
        let id = self.resolve_id(session_id);

        if let Some(session) = self.sessions.read().await.get(&id) {
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write().await;
        Arc::clone(sessions.entry(id.clone()).or_insert_with(|| {
            info!("Creating session '{}'", id);
            Arc::new(Mutex::new(SearchSession::new(id.clone())))
        }))
    }

    /// Fetch a session without creating it.
    pub async fn get(&self, session_id: Option<&str>) -> Option<Arc<Mutex<SearchSession>>> {
        let id = self.resolve_id(session_id);
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
