use shopledger_core::{Aggregate, AggregateRoot};

/// Execute an aggregate command deterministically (no IO, no async).
///
/// 1. **Decide**: calls `aggregate.handle(command)` to get events (pure, no mutation)
/// 2. **Evolve**: applies each event to the aggregate via `aggregate.apply(event)`
///
/// If `handle` rejects the command nothing is applied, so the aggregate is
/// either fully updated or untouched.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    tracing::trace!(applied = events.len(), version = AggregateRoot::version(aggregate), "command executed");
    Ok(events)
}
