//! Cooperative cancellation passed through to transports.

mod token;

pub use token::CancellationToken;
