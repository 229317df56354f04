/// Synchronization state of a client.
#[derive(Debug, Clone, PartialEq)]
pub enum State<O> {
    /// Nothing outstanding.
    Synchronized,
    /// One operation sent and not yet acknowledged.
    AwaitingConfirm(O),
    /// One operation outstanding plus the local edits made since, composed
    /// into a single buffer.
    AwaitingConfirmWithBuffer(O, O),
}

impl<O> State<O> {
    pub fn name(&self) -> &'static str {
        match self {
            State::Synchronized => "Synchronized",
            State::AwaitingConfirm(_) => "AwaitingConfirm",
            State::AwaitingConfirmWithBuffer(..) => "AwaitingConfirmWithBuffer",
        }
    }

    /// The operation awaiting acknowledgement, if any.
    pub fn outstanding(&self) -> Option<&O> {
        match self {
            State::Synchronized => None,
            State::AwaitingConfirm(outstanding) | State::AwaitingConfirmWithBuffer(outstanding, _) => Some(outstanding),
        }
    }

    pub fn buffer(&self) -> Option<&O> {
        match self {
            State::AwaitingConfirmWithBuffer(_, buffer) => Some(buffer),
            _ => None,
        }
    }
}

impl<O> Default for State<O> {
    fn default() -> Self {
        State::Synchronized
    }
}
