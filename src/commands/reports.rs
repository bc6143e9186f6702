// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{DateWindow, Filter, Kpis, daily_profit_series, dashboard, stock_by_variety};
use crate::config::Config;
use crate::db::BlobStore;
use crate::store::Khata;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table, today};
use anyhow::{Result, anyhow, bail};

pub fn filter_from_args(sub: &clap::ArgMatches) -> Result<Filter> {
    let window = sub
        .get_one::<String>("range")
        .map(|s| s.parse::<DateWindow>())
        .transpose()
        .map_err(|e| anyhow!(e))?
        .unwrap_or_default();
    let mut filter = Filter::window(window);
    if let (Some(from), Some(to)) = (sub.get_one::<String>("from"), sub.get_one::<String>("to")) {
        let (from, to) = (parse_date(from)?, parse_date(to)?);
        if from > to {
            bail!("--from {} is after --to {}", from, to);
        }
        filter = filter.with_range(from, to);
    }
    if let Some(v) = sub.get_one::<String>("variety") {
        filter = filter.with_variety(v);
    }
    Ok(filter)
}

fn kpi_rows(k: &Kpis, sym: &str) -> Vec<Vec<String>> {
    vec![
        vec!["Boxes bought".into(), k.boxes_bought.to_string()],
        vec!["Boxes sold".into(), k.boxes_sold.to_string()],
        vec!["Amount bought".into(), fmt_money(&k.amount_bought, sym)],
        vec!["Amount sold".into(), fmt_money(&k.amount_sold, sym)],
        vec!["Gross".into(), fmt_money(&k.gross, sym)],
        vec!["Expenses".into(), fmt_money(&k.expenses, sym)],
        vec!["Profit".into(), fmt_money(&k.profit, sym)],
    ]
}

pub fn dashboard_cmd<B: BlobStore>(k: &Khata<B>, sub: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    let filter = filter_from_args(sub)?;
    let view = dashboard(k.book(), &filter, today());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        return Ok(());
    }
    let label = match filter.range {
        Some((from, to)) => format!("{} .. {}", from, to),
        None => filter.window.to_string(),
    };
    println!(
        "Window: {} | Variety: {}",
        label,
        filter.variety.as_deref().unwrap_or("all")
    );
    println!("{}", pretty_table(&["Metric", "Value"], kpi_rows(&view.window, &cfg.currency_symbol)));
    println!("Today");
    println!(
        "{}",
        pretty_table(
            &["Metric", "Value"],
            vec![
                vec!["Boxes bought".into(), view.today.boxes_bought.to_string()],
                vec!["Boxes sold".into(), view.today.boxes_sold.to_string()],
                vec!["Profit".into(), fmt_money(&view.today.profit, &cfg.currency_symbol)],
            ]
        )
    );
    Ok(())
}

pub fn stock_cmd<B: BlobStore>(k: &Khata<B>, sub: &clap::ArgMatches) -> Result<()> {
    let lines = stock_by_variety(k.book());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &lines)? {
        let rows = lines
            .into_iter()
            .map(|l| {
                vec![
                    l.variety,
                    l.purchased.to_string(),
                    l.sold.to_string(),
                    l.stock.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Variety", "Purchased", "Sold", "In Stock"], rows)
        );
    }
    Ok(())
}

pub fn profit_cmd<B: BlobStore>(k: &Khata<B>, sub: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    let variety = sub
        .get_one::<String>("variety")
        .map(|s| s.as_str())
        .filter(|s| !s.eq_ignore_ascii_case("all"));
    let series = daily_profit_series(k.book(), variety, today());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        let rows = series
            .iter()
            .map(|d| {
                vec![
                    d.date.format("%a %d").to_string(),
                    fmt_money(&d.profit, &cfg.currency_symbol),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Day", "Profit"], rows));
    }
    Ok(())
}
