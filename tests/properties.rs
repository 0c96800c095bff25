//! Property tests for the join, the filter and the aggregation helpers.

use chrono::NaiveDate;
use proptest::prelude::*;

use nifty_dashboard::{
    analysis::{distinct_industries, distinct_symbols},
    filter,
    loader::join,
    news::mock_news,
    CombinedRecord, DaySeriesData, FilterCriteria, MetadataRecord, PriceRecord,
};

const SYMBOLS: [&str; 5] = ["TCS", "INFY", "ONGC", "SBIN", "XYZ"];
const INDUSTRIES: [&str; 3] = ["IT", "ENERGY", "FINANCIAL SERVICES"];

fn day(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(offset as i64)
}

fn price_strategy() -> impl Strategy<Value = PriceRecord> {
    (0..SYMBOLS.len(), 0u32..60, 1.0..5000.0f64, 0u64..10_000_000).prop_map(
        |(symbol, offset, close, volume)| PriceRecord {
            symbol: SYMBOLS[symbol].to_owned(),
            date: day(offset),
            data: DaySeriesData {
                open: close,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume,
            },
        },
    )
}

/// Metadata for a random subset of the symbols; `XYZ` is never described.
fn metadata_strategy() -> impl Strategy<Value = Vec<MetadataRecord>> {
    proptest::collection::vec((any::<bool>(), proptest::option::of(0..INDUSTRIES.len())), 4)
        .prop_map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .filter(|(_, (present, _))| *present)
                .map(|(ix, (_, industry))| MetadataRecord {
                    symbol: SYMBOLS[ix].to_owned(),
                    company_name: Some(format!("{} Ltd", SYMBOLS[ix])),
                    industry: industry.map(|i| INDUSTRIES[i].to_owned()),
                })
                .collect()
        })
}

fn table_strategy() -> impl Strategy<Value = Vec<CombinedRecord>> {
    (
        proptest::collection::vec(price_strategy(), 0..80),
        metadata_strategy(),
    )
        .prop_map(|(prices, metadata)| join(prices, &metadata))
}

fn criteria_strategy() -> impl Strategy<Value = FilterCriteria> {
    (
        proptest::option::of(0..SYMBOLS.len()),
        proptest::option::of(0..INDUSTRIES.len()),
        proptest::option::of(0u32..60),
        proptest::option::of(0u32..60),
    )
        .prop_map(|(symbol, industry, start, end)| FilterCriteria {
            symbol: symbol.map(|s| SYMBOLS[s].to_owned()),
            industry: industry.map(|i| INDUSTRIES[i].to_owned()),
            start_date: start.map(day),
            end_date: end.map(day),
        })
}

proptest! {
    #[test]
    fn prop_join_keeps_every_price_row(
        prices in proptest::collection::vec(price_strategy(), 0..80),
        metadata in metadata_strategy(),
    ) {
        let table = join(prices.clone(), &metadata);

        prop_assert_eq!(table.len(), prices.len());

        for (row, price) in table.iter().zip(&prices) {
            prop_assert_eq!(&row.symbol, &price.symbol);
            prop_assert_eq!(row.date, price.date);

            match metadata.iter().find(|m| m.symbol == row.symbol) {
                Some(m) => {
                    prop_assert_eq!(&row.industry, &m.industry);
                    prop_assert_eq!(&row.company_name, &m.company_name);
                }
                None => {
                    prop_assert!(row.industry.is_none());
                    prop_assert!(row.company_name.is_none());
                }
            }
        }
    }

    #[test]
    fn prop_filter_is_idempotent(table in table_strategy(), criteria in criteria_strategy()) {
        let once = filter(&table, &criteria);
        let twice = filter(&once, &criteria);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_filter_preserves_order(table in table_strategy(), criteria in criteria_strategy()) {
        let rows = filter(&table, &criteria);

        // every kept row appears in the table after the previously kept one
        let mut position = 0;
        for row in &rows {
            let found = table[position..].iter().position(|r| r == row);
            prop_assert!(found.is_some());
            position += found.unwrap_or_default() + 1;
        }
    }

    #[test]
    fn prop_date_range_narrows_symbol_filter(
        table in table_strategy(),
        symbol in 0..SYMBOLS.len(),
        a in 0u32..60,
        b in 0u32..60,
    ) {
        let (start, end) = (day(a.min(b)), day(a.max(b)));
        let by_symbol = filter(&table, &FilterCriteria::default().with_symbol(SYMBOLS[symbol]));
        let ranged = filter(
            &table,
            &FilterCriteria::default().with_symbol(SYMBOLS[symbol]).with_range(start, end),
        );

        prop_assert!(ranged.len() <= by_symbol.len());
        prop_assert!(ranged.iter().all(|r| by_symbol.contains(r)));
        prop_assert!(ranged.iter().all(|r| start <= r.date && r.date <= end));
    }

    #[test]
    fn prop_range_bounds_are_inclusive(table in table_strategy(), ix in any::<prop::sample::Index>()) {
        prop_assume!(!table.is_empty());
        let row = ix.get(&table);

        let on_start = filter(&table, &FilterCriteria::default().with_range(row.date, day(100)));
        let on_end = filter(&table, &FilterCriteria::default().with_range(day(0), row.date));

        prop_assert!(on_start.contains(row));
        prop_assert!(on_end.contains(row));
    }

    #[test]
    fn prop_distinct_helpers_are_sorted_and_unique(table in table_strategy()) {
        let industries = distinct_industries(&table);
        prop_assert!(industries.windows(2).all(|w| w[0] < w[1]));

        let symbols = distinct_symbols(&table);
        prop_assert!(symbols.windows(2).all(|w| w[0].symbol < w[1].symbol));
    }

    #[test]
    fn prop_mock_news_mentions_query(query in "[A-Z]{2,10}") {
        let items = mock_news(&query);

        prop_assert_eq!(&items, &mock_news(&query));
        prop_assert_eq!(items.len(), 3);
        prop_assert!(items
            .iter()
            .all(|n| n.title.as_deref().unwrap_or_default().contains(query.as_str())));
    }
}

#[test]
fn test_tcs_scenario() {
    let prices = [(1, 100.0), (2, 105.0), (3, 98.0)]
        .into_iter()
        .map(|(d, close)| PriceRecord {
            symbol: "TCS".to_owned(),
            date: NaiveDate::from_ymd_opt(2020, 1, d).unwrap(),
            data: DaySeriesData {
                close,
                ..Default::default()
            },
        })
        .collect();
    let metadata = vec![MetadataRecord {
        symbol: "TCS".to_owned(),
        company_name: Some("Tata Consultancy".to_owned()),
        industry: Some("IT".to_owned()),
    }];

    let table = join(prices, &metadata);
    assert_eq!(table.len(), 3);
    assert!(table.iter().all(|r| r.industry.as_deref() == Some("IT")));

    let rows = filter(
        &table,
        &FilterCriteria::default().with_symbol("TCS").with_range(
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(),
        ),
    );
    assert_eq!(
        rows.iter().map(|r| r.close()).collect::<Vec<_>>(),
        vec![105.0, 98.0]
    );
}
