use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalculatorState {
    Init,
    AlgorithmSelected,
    Searching,
    PathFound,
    NoPath,
    AbortedMaxNodes,
    Unpacking,
    Done,
}

impl CalculatorState {
    pub fn can_transition_to(&self, next: CalculatorState) -> bool {
        use CalculatorState::*;

        matches!(
            (self, next),
            (Init, AlgorithmSelected)
                | (AlgorithmSelected, Searching)
                | (Searching, PathFound | NoPath | AbortedMaxNodes)
                | (PathFound, Unpacking)
                | (NoPath, Done)
                | (AbortedMaxNodes, Done)
                // A filter rejection found while unpacking starts a new search
                | (Unpacking, Done | Searching | NoPath)
                | (Done, Init)
        )
    }
}

impl fmt::Display for CalculatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalculatorState::Init => "init",
            CalculatorState::AlgorithmSelected => "algorithm_selected",
            CalculatorState::Searching => "searching",
            CalculatorState::PathFound => "path_found",
            CalculatorState::NoPath => "no_path",
            CalculatorState::AbortedMaxNodes => "aborted_max_nodes",
            CalculatorState::Unpacking => "unpacking",
            CalculatorState::Done => "done",
        };
        write!(f, "{name}")
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid path calculator transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: CalculatorState,
    pub to: CalculatorState,
}

/// Current state of a path calculator with every state it went through.
#[derive(Debug, Clone)]
pub struct CalculatorStateMachine {
    state: CalculatorState,
    history: Vec<CalculatorState>,
}

impl Default for CalculatorStateMachine {
    fn default() -> Self {
        CalculatorStateMachine::new()
    }
}

impl CalculatorStateMachine {
    pub fn new() -> Self {
        CalculatorStateMachine {
            state: CalculatorState::Init,
            history: vec![CalculatorState::Init],
        }
    }

    pub fn state(&self) -> CalculatorState {
        self.state
    }

    pub fn history(&self) -> &[CalculatorState] {
        &self.history
    }

    pub fn transition(&mut self, next: CalculatorState) -> Result<(), InvalidTransition> {
        if !self.state.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        self.state = next;
        self.history.push(next);
        Ok(())
    }
}
