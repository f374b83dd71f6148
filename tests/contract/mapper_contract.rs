//! Field mapping contract: one provider fixture per category, mapped to exact
//! normalized values, plus the missing-key failure for each category.

use quotedeck_core::mapper::{self, MissingData};
use quotedeck_core::{
    BalanceSheet, CashFlow, CommodityPoint, CompanyOverview, CurrencyCode, Earnings,
    ExchangeRate, HistoricalPoint, IncomeStatement, IndicatorFunction, IntradayInterval,
    OptionContract, Quote, SearchResult,
};
use serde_json::{json, Value};

#[test]
fn quote_fixture_maps_to_exact_values() {
    let body = json!({
        "Global Quote": {
            "01. symbol": "AAPL",
            "02. open": "149.00",
            "05. price": "150.25",
            "06. volume": "52341234",
            "07. latest trading day": "2024-01-02",
            "10. change percent": "0.8000%"
        }
    });

    let quote = mapper::map_quote(&body).expect("quote should map");

    assert_eq!(quote, Quote::new("AAPL", 150.25, Some(52_341_234), "2024-01-02"));
}

#[test]
fn daily_fixture_maps_to_exact_points() {
    let body = json!({
        "Meta Data": { "2. Symbol": "IBM" },
        "Time Series (Daily)": {
            "2024-01-02": {
                "1. open": "100",
                "2. high": "105",
                "3. low": "99",
                "4. close": "104",
                "5. volume": "1000"
            }
        }
    });

    let points = mapper::map_historical(&body).expect("series should map");

    assert_eq!(
        points,
        vec![HistoricalPoint {
            date: String::from("2024-01-02"),
            open: 100.0,
            high: 105.0,
            low: 99.0,
            close: 104.0,
            volume: Some(1000),
        }]
    );
}

#[test]
fn intraday_fixture_uses_interval_specific_key() {
    let body = json!({
        "Time Series (5min)": {
            "2024-01-02 16:00:00": {
                "1. open": "185.10",
                "2. high": "185.40",
                "3. low": "184.95",
                "4. close": "185.20",
                "5. volume": "120034"
            },
            "2024-01-02 15:55:00": {
                "1. open": "184.90",
                "2. high": "185.15",
                "3. low": "184.80",
                "4. close": "185.10",
                "5. volume": "98012"
            }
        }
    });

    let points = mapper::map_intraday(&body, IntradayInterval::FiveMinutes)
        .expect("intraday series should map");

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].timestamp, "2024-01-02 16:00:00");
    assert_eq!(points[0].close, 185.20);
    assert_eq!(points[1].volume, Some(98_012));

    let err = mapper::map_intraday(&body, IntradayInterval::OneMinute)
        .expect_err("a different interval key is missing");
    assert_eq!(err.key, "Time Series (1min)");
}

#[test]
fn option_chain_fixture_maps_contracts() {
    let body = json!({
        "Option Chain": [
            {
                "symbol": "AAPL240119C00150000",
                "expiration_date": "2024-01-19",
                "strike": "150.00",
                "type": "call",
                "last_price": "4.35"
            }
        ]
    });

    let contracts = mapper::map_options(&body).expect("chain should map");

    assert_eq!(
        contracts,
        vec![OptionContract {
            symbol: String::from("AAPL240119C00150000"),
            expiration_date: String::from("2024-01-19"),
            strike: 150.0,
            option_type: String::from("call"),
            last_price: 4.35,
        }]
    );
}

#[test]
fn fundamentals_fixtures_map_statements() {
    let overview = json!({
        "Symbol": "IBM",
        "Name": "International Business Machines",
        "Description": "IBM is an American multinational technology company.",
        "Exchange": "NYSE",
        "MarketCapitalization": "172000000000"
    });
    assert_eq!(
        mapper::map_overview(&overview).expect("overview should map"),
        CompanyOverview {
            symbol: String::from("IBM"),
            name: String::from("International Business Machines"),
            description: String::from("IBM is an American multinational technology company."),
            exchange: String::from("NYSE"),
            market_cap: Some(172_000_000_000),
        }
    );

    let income = json!({ "symbol": "IBM", "annualReports": [
        { "fiscalDateEnding": "2023-12-31", "totalRevenue": "61860000000", "netIncome": "7502000000" }
    ]});
    assert_eq!(
        mapper::map_income_statements(&income).expect("income should map"),
        vec![IncomeStatement {
            fiscal_date_ending: String::from("2023-12-31"),
            total_revenue: Some(61_860_000_000),
            net_income: Some(7_502_000_000),
        }]
    );

    let balance = json!({ "annualReports": [
        { "fiscalDateEnding": "2023-12-31", "totalAssets": "135241000000", "totalLiabilities": "112628000000" }
    ]});
    assert_eq!(
        mapper::map_balance_sheets(&balance).expect("balance sheet should map"),
        vec![BalanceSheet {
            fiscal_date_ending: String::from("2023-12-31"),
            total_assets: Some(135_241_000_000),
            total_liabilities: Some(112_628_000_000),
        }]
    );

    let cash_flow = json!({ "annualReports": [
        { "fiscalDateEnding": "2023-12-31", "operatingCashflow": "13931000000", "capitalExpenditures": "None" }
    ]});
    assert_eq!(
        mapper::map_cash_flows(&cash_flow).expect("cash flow should map"),
        vec![CashFlow {
            fiscal_date_ending: String::from("2023-12-31"),
            operating_cash_flow: Some(13_931_000_000),
            capital_expenditure: None,
        }]
    );

    let earnings = json!({ "annualEarnings": [
        { "fiscalDateEnding": "2023-12-31", "reportedEPS": "9.61" }
    ]});
    assert_eq!(
        mapper::map_earnings(&earnings).expect("earnings should map"),
        vec![Earnings {
            fiscal_date_ending: String::from("2023-12-31"),
            reported_eps: 9.61,
        }]
    );
}

#[test]
fn exchange_rate_fixture_maps_currency_pair() {
    let body = json!({
        "Realtime Currency Exchange Rate": {
            "1. From_Currency Code": "USD",
            "2. From_Currency Name": "United States Dollar",
            "3. To_Currency Code": "JPY",
            "4. To_Currency Name": "Japanese Yen",
            "5. Exchange Rate": "141.23000000"
        }
    });

    assert_eq!(
        mapper::map_exchange_rate(&body).expect("rate should map"),
        ExchangeRate {
            from_currency: String::from("USD"),
            to_currency: String::from("JPY"),
            exchange_rate: 141.23,
        }
    );
}

#[test]
fn crypto_fixture_reads_market_suffixed_then_plain_prices() {
    let market = CurrencyCode::parse("EUR").expect("valid market");
    let body = json!({
        "Time Series (Digital Currency Daily)": {
            "2024-01-02": {
                "1a. open (EUR)": "38000.5",
                "2a. high (EUR)": "39000",
                "3a. low (EUR)": "37500",
                "4a. close (EUR)": "38800",
                "5. volume": "2100.75"
            },
            "2024-01-01": {
                "1. open": "37000",
                "2. high": "38100",
                "3. low": "36900",
                "4. close": "38000.5",
                "5. volume": "1800"
            }
        }
    });

    let points = mapper::map_crypto_daily(&body, &market).expect("crypto should map");

    assert_eq!(points[0].open, 38_000.5);
    assert_eq!(points[0].close, 38_800.0);
    assert_eq!(points[0].volume, Some(2100));
    assert_eq!(points[1].open, 37_000.0);
    assert_eq!(points[1].close, 38_000.5);
}

#[test]
fn commodity_and_economic_fixtures_map_dated_values() {
    let commodity = json!({
        "name": "Crude Oil Prices WTI",
        "interval": "monthly",
        "data": [
            { "date": "2024-01-01", "value": "73.86" },
            { "date": "2023-12-01", "value": "." }
        ]
    });
    let points = mapper::map_commodity(&commodity).expect("commodity should map");
    assert_eq!(
        points[0],
        CommodityPoint {
            date: String::from("2024-01-01"),
            value: 73.86
        }
    );
    assert!(points[1].value.is_nan(), "placeholder value should be NaN");

    let economic = json!({ "name": "Real GDP", "data": [ { "date": "2023-10-01", "value": "22490.692" } ] });
    let points = mapper::map_economic(&economic).expect("economic should map");
    assert_eq!(points[0].date, "2023-10-01");
    assert_eq!(points[0].value, 22_490.692);
}

#[test]
fn technical_fixture_reads_value_under_function_name() {
    let function = IndicatorFunction::parse("sma").expect("valid function");
    let body = json!({
        "Meta Data": { "2: Indicator": "Simple Moving Average (SMA)" },
        "Technical Analysis: SMA": {
            "2024-01-02": { "SMA": "182.5210" }
        }
    });

    let points = mapper::map_technical(&body, &function).expect("indicator should map");

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].date, "2024-01-02");
    assert_eq!(points[0].value, 182.521);
}

#[test]
fn search_fixture_maps_best_matches() {
    let body = json!({
        "bestMatches": [
            {
                "1. symbol": "TSCO.LON",
                "2. name": "Tesco PLC",
                "3. type": "Equity",
                "4. region": "United Kingdom",
                "9. matchScore": "0.7273"
            }
        ]
    });

    assert_eq!(
        mapper::map_search(&body).expect("search should map"),
        vec![SearchResult {
            symbol: String::from("TSCO.LON"),
            name: String::from("Tesco PLC"),
            match_type: String::from("Equity"),
            region: String::from("United Kingdom"),
        }]
    );
}

#[test]
fn every_category_fails_with_missing_data_when_its_key_is_absent() {
    let empty = json!({});
    let market = CurrencyCode::parse("USD").expect("valid market");
    let function = IndicatorFunction::parse("RSI").expect("valid function");

    let cases: Vec<(&str, Result<(), MissingData>)> = vec![
        ("Global Quote", mapper::map_quote(&empty).map(drop)),
        ("Time Series (Daily)", mapper::map_historical(&empty).map(drop)),
        (
            "Time Series (60min)",
            mapper::map_intraday(&empty, IntradayInterval::SixtyMinutes).map(drop),
        ),
        ("Option Chain", mapper::map_options(&empty).map(drop)),
        ("Symbol", mapper::map_overview(&empty).map(drop)),
        ("annualReports", mapper::map_income_statements(&empty).map(drop)),
        ("annualReports", mapper::map_balance_sheets(&empty).map(drop)),
        ("annualReports", mapper::map_cash_flows(&empty).map(drop)),
        ("annualEarnings", mapper::map_earnings(&empty).map(drop)),
        (
            "Realtime Currency Exchange Rate",
            mapper::map_exchange_rate(&empty).map(drop),
        ),
        (
            "Time Series (Digital Currency Daily)",
            mapper::map_crypto_daily(&empty, &market).map(drop),
        ),
        ("data", mapper::map_commodity(&empty).map(drop)),
        ("data", mapper::map_economic(&empty).map(drop)),
        (
            "Technical Analysis: RSI",
            mapper::map_technical(&empty, &function).map(drop),
        ),
        ("bestMatches", mapper::map_search(&empty).map(drop)),
    ];

    for (key, result) in cases {
        let err = result.expect_err("an empty body must not map");
        assert_eq!(err.key, key);
        assert_eq!(err.detail, None);
    }
}

#[test]
fn provider_error_message_is_kept_as_detail() {
    let body: Value = json!({
        "Error Message": "Invalid API call. Please retry or visit the documentation for TIME_SERIES_DAILY."
    });

    let err = mapper::map_historical(&body).expect_err("error body must not map");

    assert!(err
        .detail
        .as_deref()
        .is_some_and(|detail| detail.starts_with("Invalid API call")));
}
