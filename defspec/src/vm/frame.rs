use defspec_runtime::Value;

use crate::ir::binding::BindingId;

/// Variable slots of one activation, indexed by [`BindingId`].
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub locals_slots: Vec<Option<Value>>,
}

impl Frame {
    pub fn new(slots: usize) -> Self {
        Self {
            locals_slots: vec![None; slots],
        }
    }

    pub fn get(&self, id: BindingId) -> Option<&Value> {
        self.locals_slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn set(&mut self, id: BindingId, value: Value) {
        let index = id.index();
        if index >= self.locals_slots.len() {
            self.locals_slots.resize(index + 1, None);
        }
        self.locals_slots[index] = Some(value);
    }
}
