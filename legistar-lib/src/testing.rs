//! In-memory transport for unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::client::Legistar;
use crate::error::TransportError;
use crate::raw::RawValue;
use crate::request::CallDescriptor;
use crate::transport::Transport;

#[derive(Default)]
struct State {
    responses: HashMap<String, RawValue>,
    faults: HashMap<String, (String, String)>,
    calls: Vec<CallDescriptor>,
}

/// Records every call and answers with canned responses (absent by default)
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub(crate) fn respond(&self, operation: &str, raw: RawValue) {
        let mut state = self.state.lock().unwrap();
        state.faults.remove(operation);
        state.responses.insert(operation.to_string(), raw);
    }

    pub(crate) fn fail(&self, operation: &str, code: &str, message: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .faults
            .insert(operation.to_string(), (code.to_string(), message.to_string()));
    }

    pub(crate) fn calls(&self) -> Vec<CallDescriptor> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn last_call(&self) -> Option<CallDescriptor> {
        self.state.lock().unwrap().calls.last().cloned()
    }
}

impl Transport for MockTransport {
    fn invoke(&self, call: &CallDescriptor) -> Result<RawValue, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());

        if let Some((code, message)) = state.faults.get(call.operation()) {
            return Err(TransportError::Fault {
                code: code.clone(),
                message: message.clone(),
            });
        }
        Ok(state
            .responses
            .get(call.operation())
            .cloned()
            .unwrap_or_default())
    }
}

/// A client over a fresh mock transport, optionally with a government selected
pub(crate) fn client(tenant: Option<&str>) -> (Legistar, MockTransport) {
    let transport = MockTransport::default();
    let mut legistar = Legistar::new("test-key", transport.clone());
    if let Some(tenant) = tenant {
        legistar = legistar.with_tenant(tenant).unwrap();
    }
    (legistar, transport)
}

/// A list container holding `items` as children named `element`
pub(crate) fn list<I>(element: &str, items: I) -> RawValue
where
    I: IntoIterator<Item = RawValue>,
{
    RawValue::Struct(
        items
            .into_iter()
            .map(|item| (element.to_string(), item))
            .collect(),
    )
}
