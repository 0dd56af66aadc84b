//! Bounded experience replay buffer

use super::Experience;
use rand::Rng;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct ReplayBuffer {
    capacity: usize,
    experiences: VecDeque<Experience>,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            experiences: VecDeque::with_capacity(capacity),
        }
    }

    /// Append, evicting the oldest experience when full
    pub fn push(&mut self, experience: Experience) {
        if self.experiences.len() == self.capacity {
            self.experiences.pop_front();
        }
        self.experiences.push_back(experience);
    }

    pub fn len(&self) -> usize {
        self.experiences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiences.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Experience> {
        self.experiences.iter()
    }

    /// Uniform sample without replacement. Empty until `batch_size` experiences exist.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, batch_size: usize) -> Vec<&Experience> {
        if batch_size == 0 || self.experiences.len() < batch_size {
            return Vec::new();
        }
        rand::seq::index::sample(rng, self.experiences.len(), batch_size)
            .into_iter()
            .filter_map(|i| self.experiences.get(i))
            .collect()
    }
}
