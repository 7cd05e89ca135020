/// Lifecycle of the single peer connection. Commands arriving in the wrong
/// state are rejected with a notice instead of replacing the live handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// No call yet.
    Idle,
    /// An offer is in flight, in either direction.
    Negotiating(CallRole),
    /// Both descriptions applied; the transport takes it from here.
    Connected,
    /// A call existed and was torn down.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallRole {
    Caller,
    Callee,
}

impl CallState {
    /// Whether a new call (outbound or inbound) may start from here.
    pub fn accepts_new_call(&self) -> bool {
        matches!(self, CallState::Idle | CallState::Closed)
    }
}
