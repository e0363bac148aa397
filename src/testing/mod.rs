//! # Conformance Testing
//!
//! Declarative test cases, the static catalog they are grouped into, the
//! sequential runner, and the collector the runner records outcomes in.
//!
//! Control flow for a run:
//!
//! ```text
//! Runner::run ─> for each Suite ─> for each TestCase ─> HttpClient::send
//!                                                     └─> Expectation::evaluate
//!                                                     └─> ResultCollector::record
//!            ─> SuiteReport::from_outcomes
//! ```

pub mod case;
pub mod catalog;
pub mod collector;
pub mod runner;
