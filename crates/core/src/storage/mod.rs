pub mod baseline;
pub mod ledger;
