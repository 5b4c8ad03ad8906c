// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog::{CATEGORIES, QUICK_COMMERCE_KEYWORDS};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle() -> Result<()> {
    let rows = CATEGORIES
        .iter()
        .map(|t| vec![t.emoji.to_string(), t.key.to_string()])
        .collect();
    println!("{}", pretty_table(&["", "Category"], rows));
    println!(
        "Quick-commerce keywords: {}",
        QUICK_COMMERCE_KEYWORDS.join(", ")
    );
    Ok(())
}
