//! Command routing: interprets a voice/text command against a session's
//! state, drives searches through the coordinator, and formats every
//! transition into the uniform voice-ready response.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::finder::ProductFinder;
use crate::models::{Product, SearchIntent};
use crate::parser::{self, Command, NavAction};
use crate::session::SessionRegistry;

/// Uniform response shape for every command transition.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    pub voice_response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_index: Option<usize>,
}

impl CommandResponse {
    pub fn failure(voice_response: impl Into<String>) -> Self {
        Self {
            success: false,
            voice_response: voice_response.into(),
            product: None,
            products: None,
            current_index: None,
        }
    }

    pub fn spoken(voice_response: impl Into<String>) -> Self {
        Self {
            success: true,
            voice_response: voice_response.into(),
            product: None,
            products: None,
            current_index: None,
        }
    }

    fn at_product(voice_response: String, product: Product, index: usize) -> Self {
        Self {
            success: true,
            voice_response,
            product: Some(product),
            products: None,
            current_index: Some(index),
        }
    }
}

pub struct CommandRouter {
    finder: Arc<ProductFinder>,
    sessions: Arc<SessionRegistry>,
}

impl CommandRouter {
    pub fn new(finder: Arc<ProductFinder>, sessions: Arc<SessionRegistry>) -> Self {
        Self { finder, sessions }
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn finder_stores(&self) -> Vec<String> {
        self.finder.store_names()
    }

    /// Route one free-text command. Every internal failure is absorbed into
    /// a spoken response; nothing escapes to the transport layer from here.
    pub async fn handle_command(&self, command: &str, session_id: Option<&str>) -> CommandResponse {
        info!("Routing command '{}' for session {:?}", command, session_id);

        match parser::parse_command(command) {
            Command::Search(intent) => self.run_search(command, intent, session_id).await,
            Command::Navigate(action) => self.navigate(action, session_id).await,
            Command::AddToCart { item_number } => {
                self.add_to_cart_by_number(item_number, session_id).await
            }
            Command::RemoveFromCart { title } => {
                let session = self.sessions.get_or_create(session_id).await;
                let (success, message) = session.lock().await.remove_from_cart(&title);
                CommandResponse {
                    success,
                    ..CommandResponse::failure(message)
                }
            }
            Command::ViewCart => {
                let session = self.sessions.get_or_create(session_id).await;
                let summary = session.lock().await.cart_summary();
                CommandResponse::spoken(summary)
            }
            Command::ClearCart => {
                let session = self.sessions.get_or_create(session_id).await;
                let message = session.lock().await.clear_cart();
                CommandResponse::spoken(message)
            }
            Command::Checkout => {
                let session = self.sessions.get_or_create(session_id).await;
                let (success, message) = session.lock().await.checkout();
                CommandResponse {
                    success,
                    ..CommandResponse::failure(message)
                }
            }
            Command::Help => CommandResponse::spoken(
                "You can say things like: find shoes under 2000 rupees, next, previous, \
                 first, last, repeat, buy this, add item 2, show cart, remove an item from \
                 cart, clear cart, or checkout.",
            ),
            Command::Unknown => CommandResponse::failure(
                "I didn't understand that. Say help to hear what you can ask for.",
            ),
        }
    }

    /// Run a search to completion and install the results on the session.
    /// An empty result set returns the session to idle with a spoken
    /// no-results message.
    pub async fn run_search(
        &self,
        raw_query: &str,
        intent: SearchIntent,
        session_id: Option<&str>,
    ) -> CommandResponse {
        let products = self.finder.search_all(&intent).await;

        let session = self.sessions.get_or_create(session_id).await;
        let mut session = session.lock().await;

        if products.is_empty() {
            session.set_results(raw_query, Vec::new());
            return CommandResponse::failure(format!(
                "Sorry, I couldn't find any products for {}. Please try different keywords.",
                intent.query_string()
            ));
        }

        session.set_results(raw_query, products.clone());
        let first = &products[0];
        let voice_response = format!(
            "Found {} products. First result: {}. Say next for more options or buy this to purchase.",
            products.len(),
            first.voice_summary()
        );

        CommandResponse {
            success: true,
            voice_response,
            product: Some(first.clone()),
            products: Some(products),
            current_index: Some(0),
        }
    }

    /// Apply a navigation action. The cursor clamps at both ends and is
    /// never allowed outside [0, len-1]; commands outside `has_results`
    /// report nothing-to-show instead of erroring.
    pub async fn navigate(&self, action: NavAction, session_id: Option<&str>) -> CommandResponse {
        let session = self.sessions.get_or_create(session_id).await;
        let mut session = session.lock().await;

        if !session.has_results() {
            return CommandResponse::failure(
                "No products available. Please search for products first.",
            );
        }

        let last_index = session.current_products.len() - 1;

        match action {
            NavAction::Next => {
                if session.current_index >= last_index {
                    return CommandResponse::failure(
                        "This is the last product. Say first to go back to the beginning.",
                    );
                }
                session.current_index += 1;
                self.describe_current(&session, "Next product")
            }
            NavAction::Previous => {
                if session.current_index == 0 {
                    return CommandResponse::failure(
                        "This is the first product. Say next to move forward.",
                    );
                }
                session.current_index -= 1;
                self.describe_current(&session, "Previous product")
            }
            NavAction::First => {
                session.current_index = 0;
                self.describe_current(&session, "First product")
            }
            NavAction::Last => {
                session.current_index = last_index;
                self.describe_current(&session, "Last product")
            }
            NavAction::Repeat => self.describe_current(&session, "Current product"),
            NavAction::Buy => {
                // Buy never mutates the session; it hands back the link for
                // the caller to open.
                let Some(product) = session.current_product().cloned() else {
                    return CommandResponse::failure("Nothing is selected right now.");
                };
                let voice_response = format!(
                    "Great choice! You selected {}. Opening the store page so you can complete the purchase.",
                    product.voice_summary()
                );
                CommandResponse::at_product(voice_response, product, session.current_index)
            }
        }
    }

    fn describe_current(
        &self,
        session: &crate::session::SearchSession,
        prefix: &str,
    ) -> CommandResponse {
        let Some(product) = session.current_product().cloned() else {
            return CommandResponse::failure("Nothing is selected right now.");
        };
        let voice_response = format!(
            "{}: {}. Say buy this to purchase, next for more options, or previous to go back.",
            prefix,
            product.voice_summary()
        );
        CommandResponse::at_product(voice_response, product, session.current_index)
    }

    /// Add either an explicit 1-based item number or the cursor item to the
    /// cart. Out-of-range numbers are reported by name, nothing mutates.
    pub async fn add_to_cart_by_number(
        &self,
        item_number: Option<usize>,
        session_id: Option<&str>,
    ) -> CommandResponse {
        let session = self.sessions.get_or_create(session_id).await;
        let mut session = session.lock().await;

        if !session.has_results() {
            return CommandResponse::failure(
                "No products available. Please search for products first.",
            );
        }

        let index = match item_number {
            Some(number) => {
                if number == 0 || number > session.current_products.len() {
                    return CommandResponse::failure(format!(
                        "Invalid item number {}. Please choose between 1 and {}.",
                        number,
                        session.current_products.len()
                    ));
                }
                number - 1
            }
            None => session.current_index,
        };

        let product = session.current_products[index].clone();
        let message = session.add_to_cart(&product);
        CommandResponse {
            success: true,
            voice_response: message,
            product: Some(product),
            products: None,
            current_index: Some(index),
        }
    }
}
