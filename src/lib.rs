pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod guardrail;
pub mod reasoner;
pub mod session;
pub mod shared;
pub mod worker;
