// Serializable description of an explicit automaton.
//
// States are numbered `0..states`. Labels are strings; a missing label is an
// epsilon transition. A missing weight means the semiring's `one`.
//
// ```json
// {
//   "states": 3,
//   "initial": [{ "state": 0 }],
//   "final": [{ "state": 2, "weight": 0.5 }],
//   "transitions": [
//     { "from": 0, "to": 1, "label": "a", "weight": 1.0 },
//     { "from": 1, "to": 2, "label": "b" }
//   ]
// }
// ```

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use wfsa_core::Semiring;

use crate::WfsaError;
use crate::automaton::Automaton;
use crate::explicit::{AutomatonBuilder, ExplicitAutomaton, StateId};

/// A state with an initial or final weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "W: Deserialize<'de>"))]
pub struct WeightedState<W> {
    pub state: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<W>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "W: Deserialize<'de>"))]
pub struct TransitionDescription<W> {
    pub from: usize,
    pub to: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<W>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "W: Deserialize<'de>"))]
pub struct AutomatonDescription<W> {
    pub states: usize,
    #[serde(default)]
    pub initial: Vec<WeightedState<W>>,
    #[serde(rename = "final", default)]
    pub finals: Vec<WeightedState<W>>,
    #[serde(default)]
    pub transitions: Vec<TransitionDescription<W>>,
}

impl<W: Clone> AutomatonDescription<W> {
    /// Build the described automaton over `semiring`.
    ///
    /// Fails if a state index is out of range or a state is listed twice as
    /// initial or as final.
    pub fn build<S>(&self, semiring: S) -> Result<ExplicitAutomaton<String, S>, WfsaError>
    where
        S: Semiring<Weight = W>,
    {
        let one = semiring.one();
        let mut builder = AutomatonBuilder::new(semiring);
        let ids = builder.add_states(self.states);
        let id = |state: usize| {
            ids.get(state).copied().ok_or(WfsaError::UnknownState {
                state,
                states: self.states,
            })
        };
        let weight = |w: &Option<W>| w.clone().unwrap_or_else(|| one.clone());

        let mut seen = HashSet::new();
        for s in &self.initial {
            if !seen.insert(s.state) {
                return Err(WfsaError::Description(format!(
                    "state {} is listed twice as initial",
                    s.state
                )));
            }
            builder.set_initial_weight(id(s.state)?, weight(&s.weight))?;
        }
        seen.clear();
        for s in &self.finals {
            if !seen.insert(s.state) {
                return Err(WfsaError::Description(format!(
                    "state {} is listed twice as final",
                    s.state
                )));
            }
            builder.set_final_weight(id(s.state)?, weight(&s.weight))?;
        }
        for t in &self.transitions {
            builder.add_transition(id(t.from)?, id(t.to)?, t.label.clone(), weight(&t.weight))?;
        }
        Ok(builder.build())
    }
}

impl<W> AutomatonDescription<W> {
    /// Describe an explicit automaton. Weights equal to `one` are left out.
    pub fn describe<S>(automaton: &ExplicitAutomaton<String, S>) -> Self
    where
        S: Semiring<Weight = W>,
    {
        let semiring = automaton.semiring();
        let explicit = |w: W| (!semiring.is_one(&w)).then_some(w);
        let weighted = |weight: &dyn Fn(&StateId) -> W| {
            automaton
                .state_ids()
                .filter_map(|s| {
                    let w = weight(&s);
                    (!semiring.is_zero(&w)).then(|| WeightedState {
                        state: s.index(),
                        weight: explicit(w),
                    })
                })
                .collect::<Vec<_>>()
        };

        Self {
            states: automaton.num_states(),
            initial: weighted(&|s| automaton.initial_weight(s)),
            finals: weighted(&|s| automaton.final_weight(s)),
            transitions: automaton
                .transition_ids()
                .map(|t| TransitionDescription {
                    from: automaton.from(&t).index(),
                    to: automaton.to(&t).index(),
                    label: automaton.label(&t),
                    weight: explicit(automaton.transition_weight(&t)),
                })
                .collect(),
        }
    }
}
