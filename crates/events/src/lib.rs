//! Event-sourcing mechanics shared by the domain crates: the `Event` contract,
//! the stream envelope, projections over envelopes, and in-place command
//! execution.

pub mod envelope;
pub mod event;
pub mod handler;
pub mod projection;

pub use envelope::EventEnvelope;
pub use event::Event;
pub use handler::execute;
pub use projection::Projection;
