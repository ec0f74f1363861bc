use crate::{Event, EventEnvelope};

/// A read model folded from committed envelopes.
///
/// Read models are disposable: dropping one and replaying its stream must
/// rebuild the same state. Implementations should ignore envelopes they have
/// already seen (same aggregate, sequence number not past their cursor) so
/// that a replay over a partially built model is harmless.
pub trait Projection {
    type Ev: Event;

    fn apply(&mut self, envelope: &EventEnvelope<Self::Ev>);

    /// Fold many envelopes in order.
    fn apply_all<'a>(&mut self, envelopes: impl IntoIterator<Item = &'a EventEnvelope<Self::Ev>>)
    where
        Self::Ev: 'a,
    {
        for env in envelopes {
            self.apply(env);
        }
    }
}
