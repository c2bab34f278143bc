#![allow(dead_code)]
pub mod messages;
pub mod stub_exchange_provider;

pub use messages::*;
pub use stub_exchange_provider::StubExchangeProvider;
