use ot_plaintext::{OperationError, PlainTextOperation};
use ot_plaintext_editor::{Cursor, OperationMetadata, WrappedOperation};
use ot_state_machine::{State, StateMachine, StateMachineError, TransitionHandler};
use serde_json::json;

fn op(tokens: serde_json::Value) -> WrappedOperation {
    WrappedOperation::from(PlainTextOperation::from_json(&tokens).expect("valid operation"))
}

/// An editor view plus its network outbox.
#[derive(Debug, Default)]
struct Peer {
    document: String,
    outbox: Vec<WrappedOperation>,
}

impl Peer {
    fn with_document(document: &str) -> Self {
        Self {
            document: document.to_string(),
            outbox: Vec::new(),
        }
    }
}

impl TransitionHandler<WrappedOperation> for Peer {
    fn send_operation(&mut self, operation: &WrappedOperation) {
        self.outbox.push(operation.clone());
    }

    fn apply_operation(&mut self, operation: &WrappedOperation) {
        self.document = operation.apply(&self.document).expect("remote operation fits the document");
    }
}

struct Client {
    machine: StateMachine<WrappedOperation, Peer>,
    revision: usize,
    in_flight: Vec<(usize, WrappedOperation)>,
}

impl Client {
    fn new(document: &str) -> Self {
        Self {
            machine: StateMachine::new(Peer::with_document(document)),
            revision: 0,
            in_flight: Vec::new(),
        }
    }

    fn edit(&mut self, operation: WrappedOperation) {
        let peer = self.machine.handler_mut();
        peer.document = operation.apply(&peer.document).expect("local edit fits the document");
        self.machine.apply_client(operation).expect("local edit accepted");
        self.stamp_outbox();
    }

    /// Tags freshly sent operations with the revision they are based on.
    fn stamp_outbox(&mut self) {
        let revision = self.revision;
        let sent = self.machine.handler_mut().outbox.drain(..).map(|operation| (revision, operation));
        self.in_flight.extend(sent);
    }

    fn take_sent(&mut self) -> (usize, WrappedOperation) {
        assert!(!self.in_flight.is_empty(), "an operation was sent");
        self.in_flight.remove(0)
    }

    fn receive_ack(&mut self) {
        self.revision += 1;
        self.machine.server_ack().expect("ack accepted");
        self.stamp_outbox();
    }

    fn receive_remote(&mut self, operation: WrappedOperation) {
        self.revision += 1;
        self.machine.apply_server(operation).expect("remote edit accepted");
    }

    fn document(&self) -> &str {
        &self.machine.handler().document
    }
}

/// Authoritative history; incoming operations are rebased over everything
/// the sender had not seen.
struct Server {
    document: String,
    history: Vec<WrappedOperation>,
}

impl Server {
    fn new(document: &str) -> Self {
        Self {
            document: document.to_string(),
            history: Vec::new(),
        }
    }

    fn receive(&mut self, revision: usize, operation: WrappedOperation) -> WrappedOperation {
        let mut operation = operation;
        for concurrent in &self.history[revision..] {
            operation = operation.transform(concurrent).expect("concurrent operations share a base").0;
        }
        self.document = operation.apply(&self.document).expect("rebased operation fits the document");
        self.history.push(operation.clone());
        operation
    }
}

#[test]
fn two_clients_converge() {
    let base = "Hello World";
    let mut server = Server::new(base);
    let mut alice = Client::new(base);
    let mut bob = Client::new(base);

    alice.edit(op(json!([11, "!"])));
    bob.edit(op(json!(["> ", 11])));
    bob.edit(op(json!([13, "?"])));
    assert!(alice.machine.is_awaiting_confirm());
    assert!(bob.machine.is_awaiting_with_buffer());

    let (revision, sent) = alice.take_sent();
    let accepted = server.receive(revision, sent);
    alice.receive_ack();
    bob.receive_remote(accepted);
    assert!(alice.machine.is_synchronized());
    assert_eq!(bob.document(), "> Hello World?!");

    let (revision, sent) = bob.take_sent();
    let accepted = server.receive(revision, sent);
    bob.receive_ack();
    alice.receive_remote(accepted);
    assert!(bob.machine.is_awaiting_confirm());
    assert_eq!(alice.document(), "> Hello World!");

    let (revision, sent) = bob.take_sent();
    assert!(sent.equals(&op(json!([13, "?", 1]))));
    let accepted = server.receive(revision, sent);
    bob.receive_ack();
    alice.receive_remote(accepted);

    assert!(alice.machine.is_synchronized());
    assert!(bob.machine.is_synchronized());
    assert_eq!(server.document, "> Hello World?!");
    assert_eq!(alice.document(), server.document);
    assert_eq!(bob.document(), server.document);
}

#[test]
fn buffered_edits_are_sent_composed_after_ack() {
    let mut client = StateMachine::new(Peer::with_document("Hello World"));
    client.apply_client(op(json!([6, "Me", -5]))).unwrap();
    assert!(client.is_awaiting_confirm());
    assert_eq!(client.handler().outbox.len(), 1);

    client.apply_client(op(json!([8, "!"]))).unwrap();
    client.apply_client(op(json!([9, "!"]))).unwrap();
    assert!(client.is_awaiting_with_buffer());
    assert_eq!(client.handler().outbox.len(), 1);

    client.server_ack().unwrap();
    assert!(client.is_awaiting_confirm());
    let sent = &client.handler().outbox;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].to_json(), json!([8, "!!"]));
}

#[test]
fn retry_resends_everything_pending() {
    let mut client = StateMachine::new(Peer::with_document("Hello World"));
    client.apply_client(op(json!([6, "Me", -5]))).unwrap();
    client.apply_client(op(json!([8, "!"]))).unwrap();
    client.server_retry().unwrap();

    assert!(client.is_awaiting_confirm());
    let resent = client.handler().outbox.last().unwrap();
    assert_eq!(resent.to_json(), json!([6, "Me!", -5]));
    assert_eq!(resent.apply("Hello World").unwrap(), "Hello Me!");
}

#[test]
fn ack_and_retry_fail_when_synchronized() {
    let mut client: StateMachine<WrappedOperation, Peer> = StateMachine::new(Peer::default());
    assert!(matches!(client.server_ack(), Err(StateMachineError::InvalidState(_))));
    assert!(matches!(client.server_retry(), Err(StateMachineError::InvalidState(_))));
    assert!(client.is_synchronized());
    assert!(client.handler().outbox.is_empty());
}

#[test]
fn incompatible_buffer_edit_keeps_state() {
    let mut client = StateMachine::new(Peer::with_document("Hello World"));
    client.apply_client(op(json!([11, "!"]))).unwrap();
    client.apply_client(op(json!([12, "?"]))).unwrap();
    let before = client.state().clone();

    let result = client.apply_client(op(json!([5, "x"])));
    assert!(matches!(
        result,
        Err(StateMachineError::Operation(OperationError::LengthMismatch { .. }))
    ));
    assert_eq!(client.state(), &before);
}

#[test]
fn remote_edit_moves_pending_cursor() {
    let mut client = StateMachine::new(Peer::with_document("> Hello World"));
    let mut local = WrappedOperation::new(
        PlainTextOperation::new(),
        Some(OperationMetadata::new(Some(Cursor::caret(13)), Some(Cursor::caret(14)))),
    );
    local.retain(13).insert("!");
    client.apply_client(local).unwrap();
    client.handler_mut().document = "> Hello World!".to_string();

    client.apply_server(op(json!([-2, 11]))).unwrap();
    assert_eq!(client.handler().document, "Hello World!");
    match client.state() {
        State::AwaitingConfirm(outstanding) => {
            assert_eq!(outstanding.to_json(), json!([11, "!"]));
            assert_eq!(outstanding.cursor(), Some(Cursor::caret(12)));
        }
        other => panic!("unexpected state {}", other.name()),
    }
}

#[test]
fn disposed_machine_rejects_calls() {
    let mut client = StateMachine::new(Peer::default());
    client.dispose();
    assert!(matches!(client.send_operation(&op(json!([0]))), Err(StateMachineError::Disposed)));
    assert!(matches!(client.apply_operation(&op(json!([0]))), Err(StateMachineError::Disposed)));
    assert!(client.handler().outbox.is_empty());
}
