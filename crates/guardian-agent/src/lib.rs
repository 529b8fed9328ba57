//! Reporting agent: samples runtime metrics on one interval and ships them to
//! the server on another.

pub mod config;
pub mod scheduler;
pub mod sender;


pub use scheduler::{Agent, AgentState};
pub use sender::{HttpSender, MetricSender, SendError, WireFormat};
