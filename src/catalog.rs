// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Static keyword lists: the category catalog, quick-commerce merchants and
//! merchant based category suggestions.

use once_cell::sync::Lazy;
use regex::Regex;

pub struct CategoryTag {
    pub key: &'static str,
    pub emoji: &'static str,
}

pub const CATEGORIES: &[CategoryTag] = &[
    CategoryTag { key: "Groceries", emoji: "🥦" },
    CategoryTag { key: "Food Delivery", emoji: "🍔" },
    CategoryTag { key: "Canteen", emoji: "🍱" },
    CategoryTag { key: "Transportation", emoji: "🚗" },
    CategoryTag { key: "Travel", emoji: "✈️" },
    CategoryTag { key: "Bills", emoji: "💡" },
    CategoryTag { key: "Rent", emoji: "🏠" },
    CategoryTag { key: "Investments", emoji: "📈" },
    CategoryTag { key: "Savings", emoji: "💰" },
    CategoryTag { key: "Entertainment", emoji: "🎮" },
    CategoryTag { key: "Gym", emoji: "🏋️" },
    CategoryTag { key: "Shopping", emoji: "🛍️" },
    CategoryTag { key: "Personal", emoji: "👕" },
    CategoryTag { key: "Health", emoji: "🏥" },
    CategoryTag { key: "Misc", emoji: "🔖" },
];

pub const FALLBACK_EMOJI: &str = "🔖";

pub const QUICK_COMMERCE_KEYWORDS: &[&str] =
    &["blinkit", "zepto", "dunzo", "blink", "groceries", "quick"];

// First match wins.
const SUGGESTIONS: &[(&[&str], &str)] = &[
    (&["blinkit", "zepto", "bigbasket"], "Groceries"),
    (&["zomato", "swiggy"], "Food Delivery"),
    (&["uber", "ola", "rapido"], "Transportation"),
];

static NON_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s&/-]").unwrap());

pub fn is_quick_commerce(merchant: &str) -> bool {
    let m = merchant.to_lowercase();
    QUICK_COMMERCE_KEYWORDS.iter().any(|k| m.contains(k))
}

pub fn suggest_category(merchant: &str) -> Option<&'static str> {
    let m = merchant.to_lowercase();
    SUGGESTIONS
        .iter()
        .find(|(keys, _)| keys.iter().any(|k| m.contains(k)))
        .map(|(_, cat)| *cat)
}

/// Drops emoji and symbols from a category label, e.g. "🥦 Groceries" -> "Groceries".
pub fn strip_emoji(label: &str) -> String {
    NON_LABEL.replace_all(label, "").trim().to_string()
}

/// Maps user input onto a catalog key when it names one (with or without its
/// emoji, any case); free text passes through trimmed.
pub fn normalize_category(input: &str) -> Option<String> {
    let bare = strip_emoji(input);
    if bare.is_empty() {
        return None;
    }
    let hit = CATEGORIES
        .iter()
        .find(|t| t.key.eq_ignore_ascii_case(&bare))
        .map(|t| t.key.to_string());
    Some(hit.unwrap_or_else(|| input.trim().to_string()))
}

pub fn category_emoji(category: &str) -> &'static str {
    let bare = strip_emoji(category);
    CATEGORIES
        .iter()
        .find(|t| t.key.eq_ignore_ascii_case(&bare))
        .map(|t| t.emoji)
        .unwrap_or(FALLBACK_EMOJI)
}
