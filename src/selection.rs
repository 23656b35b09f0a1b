use crate::catalog;
use crate::types::Circuit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub driver_id: String,
    pub circuit: Circuit,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            driver_id: catalog::DRIVERS[0].id.to_string(),
            circuit: catalog::CIRCUITS[0],
        }
    }
}

/// Holds what the user has picked. Callers only pass catalog entries.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    current: Selection,
}

impl SelectionState {
    pub fn new(selection: Selection) -> Self {
        Self { current: selection }
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    pub fn set_driver(&mut self, id: impl Into<String>) {
        self.current.driver_id = id.into();
    }

    pub fn set_circuit(&mut self, circuit: Circuit) {
        self.current.circuit = circuit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_verstappen_in_bahrain() {
        let state = SelectionState::default();
        assert_eq!(state.current().driver_id, "VER");
        assert_eq!(state.current().circuit.name, "Bahrain");
    }

    #[test]
    fn setters_replace_one_field_each() {
        let mut state = SelectionState::default();
        let monaco = catalog::lookup_circuit("Monaco").unwrap();

        state.set_driver("LEC");
        assert_eq!(state.current().driver_id, "LEC");
        assert_eq!(state.current().circuit.name, "Bahrain");

        state.set_circuit(monaco);
        assert_eq!(state.current().driver_id, "LEC");
        assert_eq!(state.current().circuit, monaco);
    }
}
