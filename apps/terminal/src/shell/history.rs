//! Purchase history page.
//!
//! There is no history endpoint on the event API yet, so the page shows a
//! fixed set of past purchases.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};
use eventpos_core::{HistoryItem, HistoryRecord, Yen};

const SHEET_MASK: &str = "DETクリア ブライト&ピール ピーリングジェリー シートマスク";
const FRUITY: &str = "DETクリア ブライト&ピール ピーリングジェリー <フルーティ>";
const MIXED_BERRY: &str = "DETクリア ブライト&ピール ピーリングジェリー <ミックスベリーの香り>";
const UNSCENTED: &str = "DETクリア ブライト&ピール ピーリングジェリー <無香料タイプ>";

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .unwrap_or_default()
}

fn item(name: &str, price: i64) -> HistoryItem {
    HistoryItem {
        name: name.to_string(),
        price: Yen::new(price),
    }
}

/// Past purchases, newest first.
pub fn history_records() -> Vec<HistoryRecord> {
    vec![
        HistoryRecord {
            id: 1,
            datetime: at(2025, 10, 12, 15, 47),
            store: "30".to_string(),
            cashier: "01".to_string(),
            items: vec![item(SHEET_MASK, 800), item(FRUITY, 1200)],
        },
        HistoryRecord {
            id: 2,
            datetime: at(2025, 10, 10, 18, 21),
            store: "30".to_string(),
            cashier: "02".to_string(),
            items: vec![item(MIXED_BERRY, 1200)],
        },
        HistoryRecord {
            id: 3,
            datetime: at(2025, 10, 9, 11, 5),
            store: "30".to_string(),
            cashier: "01".to_string(),
            items: vec![
                item(UNSCENTED, 1200),
                item(SHEET_MASK, 800),
                item(FRUITY, 1200),
            ],
        },
    ]
}

pub(super) fn render() -> String {
    let mut out = String::new();
    let _ = writeln!(out, " 購入履歴");

    for record in history_records() {
        out.push('\n');
        let _ = writeln!(
            out,
            "  {}                    {}",
            record.display_datetime(),
            record.total()
        );
        let _ = writeln!(out, "  店舗:{} | レジ担:{}", record.store, record.cashier);
        let _ = writeln!(out, "  ----------------------------------------");
        for item in &record.items {
            let _ = writeln!(out, "    {}  {}", item.name, item.price);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_are_newest_first() {
        let records = history_records();
        assert_eq!(records.len(), 3);
        assert!(records.windows(2).all(|w| w[0].datetime > w[1].datetime));
    }

    #[test]
    fn test_record_totals() {
        let totals: Vec<Yen> = history_records().iter().map(|r| r.total()).collect();
        assert_eq!(totals, vec![Yen::new(2000), Yen::new(1200), Yen::new(3200)]);
    }

    #[test]
    fn test_render() {
        let page = render();
        assert!(page.contains("2025/10/09 11:05"));
        assert!(page.contains("¥3,200"));
        assert!(page.contains("店舗:30 | レジ担:02"));
    }
}
