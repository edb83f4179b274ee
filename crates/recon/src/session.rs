use crate::interact::Prompter;
use crate::runlog::LogSink;
use crate::store::DocumentStore;

/// The collaborators one pipeline action runs against.
pub struct Session<'a, S: DocumentStore> {
    pub store: &'a mut S,
    pub prompter: &'a mut dyn Prompter,
    pub log: &'a mut dyn LogSink,
}

impl<'a, S: DocumentStore> Session<'a, S> {
    pub fn new(store: &'a mut S, prompter: &'a mut dyn Prompter, log: &'a mut dyn LogSink) -> Self {
        Self { store, prompter, log }
    }
}
