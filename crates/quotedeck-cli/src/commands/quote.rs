use quotedeck_core::{EnvelopeError, MarketStore, Quote, Symbol};
use serde::Serialize;

use crate::cli::QuoteArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct QuoteResponseData {
    quotes: Vec<Quote>,
}

/// Tracks every symbol and reports the quotes that could be fetched. Symbols
/// that fail are reported as envelope errors with the symbol as subject.
pub async fn run(args: &QuoteArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let symbols = parse_symbols(&args.symbols)?;

    let mut quotes = Vec::with_capacity(symbols.unique.len());
    let mut errors = Vec::new();
    for outcome in store.track_many(&symbols.unique).await {
        match outcome.result {
            Ok(quote) => quotes.push(quote),
            Err(error) => {
                errors.push(EnvelopeError::from(&error).with_subject(outcome.symbol.as_str()))
            }
        }
    }

    let data = serde_json::to_value(QuoteResponseData { quotes })?;
    let mut result = CommandResult::ok(data).with_errors(errors);
    for duplicate in symbols.duplicates {
        result = result.with_warning(format!("duplicate symbol '{duplicate}' ignored"));
    }
    Ok(result)
}

pub struct ParsedSymbols {
    pub unique: Vec<Symbol>,
    pub duplicates: Vec<Symbol>,
}

/// Validates every raw symbol, keeping first occurrences in input order.
pub fn parse_symbols(raw: &[String]) -> Result<ParsedSymbols, CliError> {
    let mut unique = Vec::with_capacity(raw.len());
    let mut duplicates = Vec::new();
    for value in raw {
        let symbol = Symbol::parse(value)?;
        if unique.contains(&symbol) {
            duplicates.push(symbol);
        } else {
            unique.push(symbol);
        }
    }
    Ok(ParsedSymbols { unique, duplicates })
}
