//! Goals and the action history recorded for them.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::{ActionData, ActionResult, EntityCondition, StateKey};

/// One recorded step: the action taken from `from`, where it led and how it
/// ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub from: StateKey,
    pub action: ActionData,
    pub to: StateKey,
    pub result: ActionResult,
}

/// Accumulated history of one goal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Experience {
    pub transitions: Vec<Transition>,
    pub episodes: u32,
}

impl Experience {
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
        self.episodes = 0;
    }

    /// Records a transition. An identical transition is stored once.
    pub fn record(&mut self, transition: Transition) {
        if !self.transitions.contains(&transition) {
            self.transitions.push(transition);
        }
    }

    /// Number of distinct source states in the history.
    pub fn known_states(&self) -> usize {
        self.transitions
            .iter()
            .map(|t| t.from)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Actions already taken from `state`.
    pub fn tried_from(&self, state: StateKey) -> BTreeSet<&ActionData> {
        self.transitions
            .iter()
            .filter(|t| t.from == state)
            .map(|t| &t.action)
            .collect()
    }

    /// Actions that ended in `Failed`, `Deadlock` or `Denied` from `state`.
    pub fn forbidden_from(&self, state: StateKey) -> Vec<ActionData> {
        let forbidden: BTreeSet<&ActionData> = self
            .transitions
            .iter()
            .filter(|t| t.from == state && t.result.is_negative())
            .map(|t| &t.action)
            .collect();
        forbidden.into_iter().cloned().collect()
    }

    /// Actions from `state` known to lead to success, shortest remaining path
    /// first.
    ///
    /// Distances are propagated backwards from every `Succeeded` transition
    /// over transitions that did not end negatively.
    pub fn suggested_from(&self, state: StateKey) -> Vec<ActionData> {
        let distance = self.distance_to_success();
        let forbidden = self.forbidden_from(state);

        let mut ranked: BTreeSet<(usize, &ActionData)> = BTreeSet::new();
        for t in self.transitions.iter().filter(|t| t.from == state) {
            if forbidden.contains(&t.action) {
                continue;
            }
            let steps = match t.result {
                ActionResult::Succeeded => Some(1),
                ActionResult::InProgress => distance.get(&t.to).map(|d| d + 1),
                _ => None,
            };
            if let Some(steps) = steps {
                ranked.insert((steps, &t.action));
            }
        }

        let mut seen = BTreeSet::new();
        ranked
            .into_iter()
            .filter(|(_, action)| seen.insert(*action))
            .map(|(_, action)| action.clone())
            .collect()
    }

    /// Minimum number of actions from each known state to a success.
    fn distance_to_success(&self) -> BTreeMap<StateKey, usize> {
        let mut distance = BTreeMap::new();
        let mut queue = VecDeque::new();
        for t in &self.transitions {
            if t.result == ActionResult::Succeeded && !distance.contains_key(&t.from) {
                distance.insert(t.from, 1);
                queue.push_back(t.from);
            }
        }

        while let Some(state) = queue.pop_front() {
            let next = distance.get(&state).copied().unwrap_or_default() + 1;
            for t in &self.transitions {
                if t.to == state
                    && t.result == ActionResult::InProgress
                    && !distance.contains_key(&t.from)
                {
                    distance.insert(t.from, next);
                    queue.push_back(t.from);
                }
            }
        }
        distance
    }
}

/// Named objective with its success conditions and experience.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Goal {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub success_conditions: Vec<EntityCondition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub experience: Experience,
}

impl Goal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> StateKey {
        StateKey::from_bytes([n; 32])
    }

    fn step(from: u8, action: &str, to: u8, result: ActionResult) -> Transition {
        Transition {
            from: key(from),
            action: ActionData::new(action, Vec::<String>::new()),
            to: key(to),
            result,
        }
    }

    #[test]
    fn suggestions_prefer_the_shortest_known_path() {
        let mut xp = Experience::default();
        // 0 -long-> 1 -a-> 2 -win-> 3 ; 0 -short-> 2
        xp.record(step(0, "long", 1, ActionResult::InProgress));
        xp.record(step(1, "a", 2, ActionResult::InProgress));
        xp.record(step(2, "win", 3, ActionResult::Succeeded));
        xp.record(step(0, "short", 2, ActionResult::InProgress));
        xp.record(step(0, "loop", 0, ActionResult::Deadlock));

        let suggested = xp.suggested_from(key(0));
        let ids: Vec<_> = suggested.iter().map(|a| a.action_id.as_str()).collect();
        assert_eq!(ids, vec!["short", "long"]);

        let forbidden = xp.forbidden_from(key(0));
        assert_eq!(forbidden, vec![ActionData::new("loop", Vec::<String>::new())]);
    }

    #[test]
    fn duplicate_transitions_are_recorded_once() {
        let mut xp = Experience::default();
        xp.record(step(0, "a", 1, ActionResult::InProgress));
        xp.record(step(0, "a", 1, ActionResult::InProgress));
        assert_eq!(xp.transitions.len(), 1);
        assert_eq!(xp.tried_from(key(0)).len(), 1);
    }

    #[test]
    fn nothing_suggested_without_success() {
        let mut xp = Experience::default();
        xp.record(step(0, "a", 1, ActionResult::InProgress));
        assert!(xp.suggested_from(key(0)).is_empty());
    }
}
