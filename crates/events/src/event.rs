/// A domain-agnostic notification.
///
/// Events are:
/// - **immutable** (treat them as facts about a change that already happened)
/// - **named** (a stable dotted type, used as a structured log field)
pub trait Event: Clone + core::fmt::Debug + 'static {
    /// Stable event name/type identifier (e.g. "inventory.changed").
    fn event_type(&self) -> &'static str;
}
