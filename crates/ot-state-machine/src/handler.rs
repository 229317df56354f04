/// Outbound side of the [`StateMachine`](crate::StateMachine).
///
/// The network layer implements `send_operation`; the editor view
/// implements `apply_operation`.
pub trait TransitionHandler<O> {
    /// Transmits a local operation to the server.
    fn send_operation(&mut self, operation: &O);

    /// Applies a (transformed) remote operation to the local document.
    fn apply_operation(&mut self, operation: &O);
}

impl<O, H: TransitionHandler<O> + ?Sized> TransitionHandler<O> for &mut H {
    fn send_operation(&mut self, operation: &O) {
        (**self).send_operation(operation);
    }

    fn apply_operation(&mut self, operation: &O) {
        (**self).apply_operation(operation);
    }
}

impl<O, H: TransitionHandler<O> + ?Sized> TransitionHandler<O> for Box<H> {
    fn send_operation(&mut self, operation: &O) {
        (**self).send_operation(operation);
    }

    fn apply_operation(&mut self, operation: &O) {
        (**self).apply_operation(operation);
    }
}
