// Adapters layer: concrete implementations for external systems (XML input, HTTP, filesystem).

pub mod http;
pub mod storage;
pub mod xml;
