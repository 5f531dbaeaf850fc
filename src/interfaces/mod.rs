pub mod ledger_client;
pub mod quote_source;
