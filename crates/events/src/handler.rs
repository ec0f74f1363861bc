/// Run a command against an in-memory aggregate: decide, then apply.
///
/// No store is involved, which makes this the helper of choice in domain
/// unit tests. The infrastructure dispatcher adds loading, persistence and
/// the optimistic revision check on top of the same two steps.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: restoflow_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}
