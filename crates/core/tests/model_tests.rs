use chrono::NaiveDate;

use portfolio_tracker_core::models::alert::AlertKind;
use portfolio_tracker_core::models::asset::{normalize_symbol, Asset, AssetCategory};
use portfolio_tracker_core::models::forecast::ForecastKind;
use portfolio_tracker_core::models::holding::Holding;
use portfolio_tracker_core::models::price::HistoryPeriod;
use portfolio_tracker_core::models::settings::Currency;
use portfolio_tracker_core::models::transaction::{NewTransaction, Transaction};
use portfolio_tracker_core::errors::CoreError;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn tx(symbol: &str, price: f64, quantity: f64) -> Transaction {
    Transaction {
        id: 0,
        date: d(2025, 1, 15),
        symbol: symbol.to_string(),
        price,
        quantity,
        commission: 0.0,
    }
}

// ═══════════════════════════════════════════════════════════════════
//  AssetCategory
// ═══════════════════════════════════════════════════════════════════

mod asset_category {
    use super::*;

    #[test]
    fn as_str_roundtrips_through_parse() {
        for cat in [
            AssetCategory::Equity,
            AssetCategory::Crypto,
            AssetCategory::Etf,
            AssetCategory::FixedIncome,
            AssetCategory::OtherVariable,
            AssetCategory::OtherFixed,
        ] {
            assert_eq!(AssetCategory::parse(cat.as_str()).unwrap(), cat);
        }
    }

    #[test]
    fn parse_unknown_fails() {
        let result = AssetCategory::parse("real_estate");
        assert!(result.is_err());
        match result.unwrap_err() {
            CoreError::Validation(msg) => assert!(msg.contains("real_estate")),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn display_matches_column_form() {
        assert_eq!(AssetCategory::FixedIncome.to_string(), "fixed_income");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Asset & symbol normalization
// ═══════════════════════════════════════════════════════════════════

mod asset {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_uppercases_symbol() {
        let a = Asset::new("aapl", "Apple Inc.", AssetCategory::Equity);
        assert_eq!(a.symbol, "AAPL");
    }

    #[test]
    fn new_trims_whitespace() {
        let a = Asset::new("  msft ", "Microsoft", AssetCategory::Equity);
        assert_eq!(a.symbol, "MSFT");
    }

    #[test]
    fn equality_ignores_name() {
        // Equality is (symbol) only — the store keys on symbol
        let a = Asset::new("AAPL", "Apple Inc.", AssetCategory::Equity);
        let b = Asset::new("AAPL", "Apple", AssetCategory::Equity);
        assert_eq!(a, b);
    }

    #[test]
    fn works_as_hashset_key() {
        let mut set = HashSet::new();
        set.insert(Asset::new("AAPL", "Apple", AssetCategory::Equity));
        set.insert(Asset::new("AAPL", "Apple Inc.", AssetCategory::Equity));
        set.insert(Asset::new("BTC-USD", "Bitcoin", AssetCategory::Crypto));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn normalize_rejects_empty() {
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("   ").is_err());
    }

    #[test]
    fn normalize_uppercases_and_trims() {
        assert_eq!(normalize_symbol(" btc-usd ").unwrap(), "BTC-USD");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  NewTransaction validation
// ═══════════════════════════════════════════════════════════════════

mod transaction_validation {
    use super::*;

    #[test]
    fn valid_transaction_passes() {
        let tx = NewTransaction::new(d(2023, 10, 1), "AAPL", 170.5, 10.0);
        assert_eq!(tx.validate().unwrap(), "AAPL");
    }

    #[test]
    fn validate_normalizes_symbol() {
        let tx = NewTransaction::new(d(2023, 10, 1), " aapl", 170.5, 10.0);
        assert_eq!(tx.validate().unwrap(), "AAPL");
    }

    #[test]
    fn zero_price_fails() {
        let tx = NewTransaction::new(d(2023, 10, 1), "AAPL", 0.0, 10.0);
        assert!(tx.validate().is_err());
    }

    #[test]
    fn negative_price_fails() {
        let tx = NewTransaction::new(d(2023, 10, 1), "AAPL", -5.0, 10.0);
        assert!(tx.validate().is_err());
    }

    #[test]
    fn nan_price_fails() {
        let tx = NewTransaction::new(d(2023, 10, 1), "AAPL", f64::NAN, 10.0);
        assert!(tx.validate().is_err());
    }

    #[test]
    fn zero_quantity_fails() {
        let tx = NewTransaction::new(d(2023, 10, 1), "AAPL", 170.5, 0.0);
        let result = tx.validate();
        assert!(result.is_err());
        match result.unwrap_err() {
            CoreError::Validation(msg) => assert!(msg.contains("Quantity")),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn negative_commission_fails() {
        let tx = NewTransaction::new(d(2023, 10, 1), "AAPL", 170.5, 10.0).with_commission(-1.0);
        assert!(tx.validate().is_err());
    }

    #[test]
    fn commission_defaults_to_zero() {
        let tx = NewTransaction::new(d(2023, 10, 1), "AAPL", 170.5, 10.0);
        assert_eq!(tx.commission, 0.0);
    }

    #[test]
    fn empty_symbol_fails() {
        let tx = NewTransaction::new(d(2023, 10, 1), "  ", 170.5, 10.0);
        assert!(tx.validate().is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Holding — fold over the transaction log
// ═══════════════════════════════════════════════════════════════════

mod holdings {
    use super::*;

    #[test]
    fn empty_log_empty_holdings() {
        assert!(Holding::from_transactions(&[]).is_empty());
    }

    #[test]
    fn single_buy() {
        let holdings = Holding::from_transactions(&[tx("AAPL", 170.5, 10.0)]);
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].symbol, "AAPL");
        assert_eq!(holdings[0].total_quantity, 10.0);
        assert_eq!(holdings[0].weighted_avg_price, 170.5);
        assert_eq!(holdings[0].total_invested, 1705.0);
    }

    #[test]
    fn weighted_average_over_two_buys() {
        // 10 @ 100 + 10 @ 120 → avg 110, invested 2200, qty 20
        let holdings =
            Holding::from_transactions(&[tx("AAPL", 100.0, 10.0), tx("AAPL", 120.0, 10.0)]);
        assert_eq!(holdings.len(), 1);
        assert!((holdings[0].weighted_avg_price - 110.0).abs() < 1e-9);
        assert!((holdings[0].total_invested - 2200.0).abs() < 1e-9);
        assert!((holdings[0].total_quantity - 20.0).abs() < 1e-9);
    }

    #[test]
    fn fully_closed_position_disappears() {
        let holdings =
            Holding::from_transactions(&[tx("AAPL", 100.0, 10.0), tx("AAPL", 120.0, -10.0)]);
        assert!(holdings.is_empty());
    }

    #[test]
    fn ordered_by_symbol() {
        let holdings = Holding::from_transactions(&[
            tx("MSFT", 300.0, 1.0),
            tx("AAPL", 100.0, 1.0),
            tx("GOOG", 150.0, 1.0),
        ]);
        let symbols: Vec<&str> = holdings.iter().map(|h| h.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "GOOG", "MSFT"]);
    }

    #[test]
    fn symbols_accumulate_independently() {
        let holdings = Holding::from_transactions(&[
            tx("AAPL", 100.0, 10.0),
            tx("MSFT", 300.0, 2.0),
            tx("AAPL", 110.0, 5.0),
        ]);
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].symbol, "AAPL");
        assert!((holdings[0].total_quantity - 15.0).abs() < 1e-9);
        assert_eq!(holdings[1].symbol, "MSFT");
        assert_eq!(holdings[1].total_quantity, 2.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Currency
// ═══════════════════════════════════════════════════════════════════

mod currency {
    use super::*;

    #[test]
    fn default_is_mxn() {
        assert_eq!(Currency::default(), Currency::Mxn);
    }

    #[test]
    fn parse_case_insensitive() {
        assert_eq!(Currency::parse("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::parse("Mxn").unwrap(), Currency::Mxn);
        assert_eq!(Currency::parse(" USD ").unwrap(), Currency::Usd);
    }

    #[test]
    fn parse_unknown_fails() {
        assert!(Currency::parse("EUR").is_err());
        assert!(Currency::parse("").is_err());
    }

    #[test]
    fn codes_and_symbols() {
        assert_eq!(Currency::Usd.code(), "USD");
        assert_eq!(Currency::Mxn.code(), "MXN");
        assert_eq!(Currency::Usd.symbol(), "US$");
        assert_eq!(Currency::Mxn.symbol(), "$");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  AlertKind / ForecastKind / HistoryPeriod
// ═══════════════════════════════════════════════════════════════════

mod enums {
    use super::*;

    #[test]
    fn alert_kind_roundtrip() {
        for kind in [AlertKind::BuyOpportunity, AlertKind::Overbought] {
            assert_eq!(AlertKind::parse(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn alert_kind_parse_unknown_fails() {
        assert!(AlertKind::parse("sell_everything").is_err());
    }

    #[test]
    fn forecast_kind_parse_by_name() {
        assert_eq!(ForecastKind::parse("arima").unwrap(), ForecastKind::Arima);
        assert_eq!(ForecastKind::parse("LINEAR").unwrap(), ForecastKind::Linear);
        assert_eq!(
            ForecastKind::parse(" exponential ").unwrap(),
            ForecastKind::Exponential
        );
    }

    #[test]
    fn forecast_kind_unknown_model() {
        match ForecastKind::parse("prophet").unwrap_err() {
            CoreError::UnknownModel(name) => assert_eq!(name, "prophet"),
            other => panic!("Expected UnknownModel, got {:?}", other),
        }
    }

    #[test]
    fn history_period_range_tokens() {
        assert_eq!(HistoryPeriod::OneMonth.as_range(), "1mo");
        assert_eq!(HistoryPeriod::SixMonths.as_range(), "6mo");
        assert_eq!(HistoryPeriod::FiveYears.as_range(), "5y");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  JSON serialization of the public model types
// ═══════════════════════════════════════════════════════════════════

mod serialization {
    use super::*;
    use chrono::{TimeZone, Utc};
    use portfolio_tracker_core::models::alert::AlertRecord;

    #[test]
    fn transaction_roundtrips_through_json() {
        let original = tx("AAPL", 170.5, 10.0);
        let json = serde_json::to_string(&original).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn asset_roundtrips_through_json() {
        let original = Asset::new("BTC-USD", "Bitcoin", AssetCategory::Crypto);
        let json = serde_json::to_string(&original).unwrap();
        let back: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(back.symbol, "BTC-USD");
        assert_eq!(back.category, AssetCategory::Crypto);
    }

    #[test]
    fn alert_record_roundtrips_through_json() {
        let original = AlertRecord {
            id: 7,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            symbol: "AAPL".into(),
            kind: AlertKind::BuyOpportunity,
            price_at_alert: 99.0,
            reference_price: 100.0,
            deviation_pct: 1.0,
            message: "AAPL is 1.0% below the lower confidence band".into(),
            read: false,
        };
        let json = serde_json::to_string(&original).unwrap();
        let back: AlertRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn currency_roundtrips_through_json() {
        for currency in [Currency::Usd, Currency::Mxn] {
            let json = serde_json::to_string(&currency).unwrap();
            let back: Currency = serde_json::from_str(&json).unwrap();
            assert_eq!(back, currency);
        }
    }
}
