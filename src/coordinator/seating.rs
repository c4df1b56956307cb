// ABOUTME: Seating state guarded by the coordinator - philosopher states and wait queues.
// ABOUTME: Holds the eligibility predicates; never blocks and never touches the lock itself.

use std::collections::VecDeque;

use serde::Serialize;

/// Seat index of a philosopher, in `[0, N)`.
pub type PhilosopherId = usize;

/// What a philosopher is doing, as far as the coordinator knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhilosopherState {
    Thinking,
    Hungry,
    Eating,
    Talking,
}

impl std::fmt::Display for PhilosopherState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhilosopherState::Thinking => write!(f, "thinking"),
            PhilosopherState::Hungry => write!(f, "hungry"),
            PhilosopherState::Eating => write!(f, "eating"),
            PhilosopherState::Talking => write!(f, "talking"),
        }
    }
}

/// The kind of grant a philosopher is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Request {
    /// Both adjacent utensils.
    Meal,
    /// The speaking token.
    Token,
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Request::Meal => write!(f, "utensils"),
            Request::Token => write!(f, "the speaking token"),
        }
    }
}

/// A consistent copy of the coordinator's state, taken under the lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    pub states: Vec<PhilosopherState>,
    pub meal_queue: Vec<PhilosopherId>,
    pub talk_queue: Vec<PhilosopherId>,
    pub speaker: Option<PhilosopherId>,
    pub meals: Vec<u64>,
    pub speeches: Vec<u64>,
}

impl TableSnapshot {
    /// Whether anyone currently holds the speaking token.
    pub fn is_speaking(&self) -> bool {
        self.speaker.is_some()
    }

    /// Ids of every philosopher currently eating, in seat order.
    pub fn eating(&self) -> Vec<PhilosopherId> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == PhilosopherState::Eating)
            .map(|(id, _)| id)
            .collect()
    }

    /// Pairs of neighbours that are both eating. Always empty for a sound table.
    pub fn adjacent_eaters(&self) -> Vec<(PhilosopherId, PhilosopherId)> {
        let n = self.states.len();
        if n < 2 {
            return Vec::new();
        }
        (0..n)
            .filter_map(|id| {
                let right = (id + 1) % n;
                let both = self.states[id] == PhilosopherState::Eating
                    && self.states[right] == PhilosopherState::Eating;
                // With two seats, (0, 1) and (1, 0) are the same pair.
                (both && (n > 2 || id < right)).then_some((id, right))
            })
            .collect()
    }
}

/// Mutable state for the coordinator, protected by a single mutex.
#[derive(Debug)]
pub(crate) struct Seating {
    states: Vec<PhilosopherState>,
    meal_queue: VecDeque<PhilosopherId>,
    talk_queue: VecDeque<PhilosopherId>,
    speaker: Option<PhilosopherId>,
    meals: Vec<u64>,
    speeches: Vec<u64>,
}

impl Seating {
    /// Seat `philosophers` philosophers, all thinking.
    ///
    /// # Panics
    ///
    /// Panics if `philosophers` is zero.
    pub(crate) fn new(philosophers: usize) -> Self {
        assert!(philosophers > 0, "a table needs at least one philosopher");

        Self {
            states: vec![PhilosopherState::Thinking; philosophers],
            meal_queue: VecDeque::with_capacity(philosophers),
            talk_queue: VecDeque::with_capacity(philosophers),
            speaker: None,
            meals: vec![0; philosophers],
            speeches: vec![0; philosophers],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }

    #[cfg(test)]
    pub(crate) fn state(&self, id: PhilosopherId) -> PhilosopherState {
        self.states[self.check(id)]
    }

    /// Left and right neighbours of `id`, wrapping around the table.
    pub(crate) fn neighbours(&self, id: PhilosopherId) -> (PhilosopherId, PhilosopherId) {
        let n = self.len();
        let id = self.check(id);
        ((id + n - 1) % n, (id + 1) % n)
    }

    /// Mark `id` hungry and put it at the back of the meal queue.
    pub(crate) fn join_meal_queue(&mut self, id: PhilosopherId) {
        let id = self.check(id);
        assert!(
            !self.meal_queue.contains(&id),
            "philosopher {id} is already waiting for utensils"
        );
        assert!(
            self.states[id] != PhilosopherState::Eating,
            "philosopher {id} is already eating"
        );
        self.states[id] = PhilosopherState::Hungry;
        self.meal_queue.push_back(id);
    }

    /// Whether `id` may start eating right now.
    ///
    /// Neither neighbour may be eating, and `id` must either head the meal
    /// queue or the head must not be one of its neighbours. The second
    /// clause lets distant philosophers overtake the head without ever
    /// taking a utensil the head is waiting for.
    pub(crate) fn can_eat(&self, id: PhilosopherId) -> bool {
        let (left, right) = self.neighbours(id);
        if self.states[left] == PhilosopherState::Eating
            || self.states[right] == PhilosopherState::Eating
        {
            return false;
        }
        match self.meal_queue.front() {
            Some(&head) => head == id || (head != left && head != right),
            None => false,
        }
    }

    /// Grant `id` its utensils if it is eligible. Returns whether it now eats.
    pub(crate) fn try_start_eating(&mut self, id: PhilosopherId) -> bool {
        if !self.can_eat(id) {
            return false;
        }
        self.meal_queue.retain(|&queued| queued != id);
        self.states[id] = PhilosopherState::Eating;
        self.meals[id] += 1;
        true
    }

    /// Put `id`'s utensils down. Returns false (and changes nothing) if it
    /// was not eating.
    pub(crate) fn finish_eating(&mut self, id: PhilosopherId) -> bool {
        let id = self.check(id);
        if self.states[id] != PhilosopherState::Eating {
            return false;
        }
        self.states[id] = PhilosopherState::Thinking;
        true
    }

    /// Drop an ungranted meal request. Returns whether anything changed.
    pub(crate) fn leave_meal_queue(&mut self, id: PhilosopherId) -> bool {
        let id = self.check(id);
        let before = self.meal_queue.len();
        self.meal_queue.retain(|&queued| queued != id);
        if self.meal_queue.len() == before {
            return false;
        }
        if self.states[id] == PhilosopherState::Hungry {
            self.states[id] = PhilosopherState::Thinking;
        }
        true
    }

    /// Put `id` at the back of the talk queue.
    pub(crate) fn join_talk_queue(&mut self, id: PhilosopherId) {
        let id = self.check(id);
        assert!(
            !self.talk_queue.contains(&id),
            "philosopher {id} is already waiting to talk"
        );
        self.talk_queue.push_back(id);
    }

    /// Whether `id` may take the speaking token right now. Strict FIFO.
    pub(crate) fn can_talk(&self, id: PhilosopherId) -> bool {
        self.states[self.check(id)] != PhilosopherState::Eating
            && self.talk_queue.front() == Some(&id)
            && self.speaker.is_none()
    }

    /// Hand `id` the speaking token if it is eligible.
    pub(crate) fn try_start_talking(&mut self, id: PhilosopherId) -> bool {
        if !self.can_talk(id) {
            return false;
        }
        self.talk_queue.pop_front();
        self.speaker = Some(id);
        self.states[id] = PhilosopherState::Talking;
        self.speeches[id] += 1;
        true
    }

    /// Take the token back. Returns the previous holder, if any.
    pub(crate) fn finish_talking(&mut self) -> Option<PhilosopherId> {
        let speaker = self.speaker.take()?;
        if self.states[speaker] == PhilosopherState::Talking {
            self.states[speaker] = PhilosopherState::Thinking;
        }
        Some(speaker)
    }

    /// Drop an ungranted token request. Returns whether anything changed.
    pub(crate) fn leave_talk_queue(&mut self, id: PhilosopherId) -> bool {
        let id = self.check(id);
        let before = self.talk_queue.len();
        self.talk_queue.retain(|&queued| queued != id);
        self.talk_queue.len() != before
    }

    pub(crate) fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            states: self.states.clone(),
            meal_queue: self.meal_queue.iter().copied().collect(),
            talk_queue: self.talk_queue.iter().copied().collect(),
            speaker: self.speaker,
            meals: self.meals.clone(),
            speeches: self.speeches.clone(),
        }
    }

    fn check(&self, id: PhilosopherId) -> PhilosopherId {
        assert!(
            id < self.len(),
            "philosopher {id} is not seated at a table of {}",
            self.len()
        );
        id
    }
}
