// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::unknown_varieties;
use crate::db::BlobStore;
use crate::store::Khata;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle<B: BlobStore>(k: &Khata<B>) -> Result<()> {
    let rows: Vec<Vec<String>> = unknown_varieties(k.book())
        .into_iter()
        .map(|w| {
            vec![
                "unknown_variety".into(),
                format!("{} {} ({})", w.kind, w.account_name, w.account_id),
                w.tx_id,
                w.variety,
            ]
        })
        .collect();

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!(
            "{}",
            pretty_table(&["Issue", "Account", "Transaction", "Variety"], rows)
        );
    }
    Ok(())
}
