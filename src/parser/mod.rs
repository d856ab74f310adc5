//! Free-text command parsing: classifies voice commands and extracts
//! structured search intents (keywords, price bounds, category).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::SearchIntent;

/// Keywords used when a search command carries no usable free text and no
/// recognizable category.
pub const DEFAULT_KEYWORDS: &str = "shoes";

/// A classified voice/text command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(SearchIntent),
    Navigate(NavAction),
    /// `item_number` is 1-based; `None` means "the product under the cursor".
    AddToCart { item_number: Option<usize> },
    RemoveFromCart { title: String },
    ViewCart,
    ClearCart,
    Checkout,
    Help,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Next,
    Previous,
    First,
    Last,
    Repeat,
    Buy,
}

static BETWEEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:between|from)\s+(?:rs\.?\s*|rupees?\s*|₹\s*)?(\d+)\s+(?:and|to)\s+(?:rs\.?\s*|rupees?\s*|₹\s*)?(\d+)",
    )
    .expect("between pattern")
});

static UNDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:under|below|upto|less\s+than|max(?:imum)?)\s+(?:rs\.?\s*|rupees?\s*|₹\s*)?(\d+)")
        .expect("under pattern")
});

static ABOVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:above|over|more\s+than|min(?:imum)?)\s+(?:rs\.?\s*|rupees?\s*|₹\s*)?(\d+)")
        .expect("above pattern")
});

static TRIGGER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:search\s+for|search|find\s+me|find|look\s+for|show\s+me|get\s+me|i\s+want|need)\b")
        .expect("trigger pattern")
});

static NOISE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:rs|rupees?|price|cost|under|below|above|upto|between|from|to|and|for|a|an|the|me|please)\b|₹|\d+")
        .expect("noise pattern")
});

static ITEM_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:item|number|option|product)\s+(\d+)|\b(?:add|buy)\s+(\d+)\b")
        .expect("item number pattern")
});

static REMOVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:remove|delete)\s+(.+?)(?:\s+from(?:\s+my)?\s+cart)?$").expect("remove pattern")
});

/// Fixed category table. First matching keyword wins; checked against the
/// raw lowered text so price noise does not hide a category word.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("clothing", &["shirt", "dress", "kurti", "jeans", "pants", "top", "saree", "suit"]),
    ("footwear", &["shoe", "shoes", "sandals", "sneakers", "boots", "heels", "slippers"]),
    ("electronics", &["phone", "laptop", "tablet", "headphones", "earphones", "speaker", "charger"]),
    ("accessories", &["watch", "bag", "wallet", "belt", "sunglasses", "jewelry"]),
    ("home", &["bedsheet", "pillow", "curtain", "lamp", "mirror", "furniture"]),
    ("beauty", &["lipstick", "foundation", "perfume", "cream", "shampoo", "makeup"]),
];

/// Classify a raw command into one of the supported intents.
///
/// Cart phrases are checked before navigation and search so "show cart" is
/// never mistaken for a "show me ..." search and "buy item 3" lands in the
/// cart instead of triggering a bare buy. Clear and remove come before the
/// view-cart phrases, which would otherwise swallow "clear my cart".
pub fn parse_command(text: &str) -> Command {
    let text = text.to_lowercase();
    let text = text.trim();

    if contains_phrase(text, &["clear cart", "clear my cart", "empty cart", "empty my cart"]) {
        return Command::ClearCart;
    }
    if (has_word(text, "remove") || has_word(text, "delete")) && text.contains("cart") {
        if let Some(caps) = REMOVE_RE.captures(text) {
            return Command::RemoveFromCart {
                title: caps[1].trim().to_string(),
            };
        }
    }
    if has_word(text, "add") || contains_phrase(text, &["buy item", "purchase item"]) {
        // "add item 2", "add 2", "buy item 3", or "add this" for the cursor item
        let item_number = extract_item_number(text);
        if item_number.is_some() || text.contains("cart") || contains_phrase(text, &["add this", "add it"]) {
            return Command::AddToCart { item_number };
        }
    }
    if has_word(text, "checkout")
        || contains_phrase(text, &["check out", "place order", "place my order"])
    {
        return Command::Checkout;
    }
    if contains_phrase(text, &["show cart", "view cart", "my cart", "open cart", "what is in cart"]) {
        return Command::ViewCart;
    }
    if let Some(action) = parse_navigation(text) {
        return Command::Navigate(action);
    }
    if let Some(intent) = parse_search(text) {
        return Command::Search(intent);
    }
    if has_word(text, "help") || contains_phrase(text, &["what can you do", "commands"]) {
        return Command::Help;
    }
    Command::Unknown
}

/// Navigation words, whole-word matched so "nextdoor shoes" stays a search.
pub fn parse_navigation(text: &str) -> Option<NavAction> {
    let text = text.to_lowercase();
    let text = text.as_str();
    if has_word(text, "next") {
        Some(NavAction::Next)
    } else if has_word(text, "previous") || has_word(text, "prev") || has_word(text, "back") {
        Some(NavAction::Previous)
    } else if has_word(text, "first") {
        Some(NavAction::First)
    } else if has_word(text, "last") {
        Some(NavAction::Last)
    } else if has_word(text, "repeat") || has_word(text, "again") {
        Some(NavAction::Repeat)
    } else if has_word(text, "buy") || has_word(text, "purchase") {
        Some(NavAction::Buy)
    } else {
        None
    }
}

/// Extract a structured search intent from a command.
///
/// Returns `None` when no trigger phrase is present — the command is then
/// not a search and the caller falls through to other intents.
pub fn parse_search(text: &str) -> Option<SearchIntent> {
    let lowered = text.to_lowercase();
    if !TRIGGER_RE.is_match(lowered.trim()) {
        return None;
    }
    Some(parse_search_query(text))
}

/// Build a search intent from text already known to be a search, e.g. the
/// dedicated search endpoint. Never fails: a query with nothing usable in
/// it degrades to a browse intent.
pub fn parse_search_query(text: &str) -> SearchIntent {
    let text = text.to_lowercase();
    let text = text.trim();

    let mut min_price = None;
    let mut max_price = None;

    if let Some(caps) = UNDER_RE.captures(text) {
        max_price = caps[1].parse().ok();
    }
    if let Some(caps) = ABOVE_RE.captures(text) {
        min_price = caps[1].parse().ok();
    }
    // A range overrides any co-occurring under/above match: last applicable
    // pattern wins.
    if let Some(caps) = BETWEEN_RE.captures(text) {
        min_price = caps[1].parse().ok();
        max_price = caps[2].parse().ok();
    }

    let category = detect_category(text);

    let stripped = BETWEEN_RE.replace_all(text, " ");
    let stripped = UNDER_RE.replace_all(&stripped, " ");
    let stripped = ABOVE_RE.replace_all(&stripped, " ");
    let stripped = TRIGGER_RE.replace_all(&stripped, " ");
    let stripped = NOISE_RE.replace_all(&stripped, " ");

    let mut keywords: Vec<String> = stripped
        .split_whitespace()
        .filter(|w| w.len() > 1)
        .map(str::to_string)
        .collect();

    // Empty keywords degrade to a browse query, never to a failure.
    if keywords.is_empty() {
        let fallback = category.as_deref().unwrap_or(DEFAULT_KEYWORDS);
        keywords = vec![fallback.to_string()];
    }

    SearchIntent {
        keywords,
        min_price,
        max_price,
        category,
    }
}

pub fn detect_category(text: &str) -> Option<String> {
    for (category, words) in CATEGORIES {
        if words.iter().any(|w| has_word(text, w)) {
            return Some((*category).to_string());
        }
    }
    None
}

/// 1-based item number from phrases like "add item 3" or "buy 2".
pub fn extract_item_number(text: &str) -> Option<usize> {
    let caps = ITEM_NUMBER_RE.captures(text)?;
    let group = caps.get(1).or_else(|| caps.get(2))?;
    group.as_str().parse().ok()
}

fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|w| w == word)
}

fn contains_phrase(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}
