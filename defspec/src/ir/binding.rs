use serde::{Deserialize, Serialize};

/// Index into a function's [`BindingTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BindingId(pub u32);

impl BindingId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingKind {
    /// Declared parameter, by position.
    Param(usize),
    /// Variable introduced by a clause pattern.
    Pattern,
    /// `let` binding.
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
}

/// Every variable of one function, parameters first.
///
/// Guards, validation statements and the user body all refer to variables
/// through [`BindingId`]s into this table, so a synthesized fragment can never
/// capture or be captured by a user name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, kind: BindingKind) -> BindingId {
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(Binding {
            name: name.into(),
            kind,
        });
        id
    }

    pub fn get(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id.index())
    }

    /// Source name of a binding; `"_"` for an id from another table.
    pub fn name(&self, id: BindingId) -> &str {
        self.get(id).map(|b| b.name.as_str()).unwrap_or("_")
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BindingId, &Binding)> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(i, b)| (BindingId(i as u32), b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_stable() {
        let mut table = BindingTable::new();
        let a = table.add("a", BindingKind::Param(0));
        let shadow = table.add("a", BindingKind::Local);
        assert_ne!(a, shadow);
        assert_eq!(table.len(), 2);
        assert_eq!(table.name(a), "a");
        assert_eq!(table.get(shadow).unwrap().kind, BindingKind::Local);
        assert_eq!(table.name(BindingId(9)), "_");
    }
}
