//! Display-only fact rotation.

/// Cycles through a fixed list of trivia strings.
///
/// Not part of the journey computation; kept next to it because both are
/// driven by the same scheduler.
#[derive(Clone, Debug, Default)]
pub struct FactRotator {
    facts: Vec<String>,
    index: usize,
}

impl FactRotator {
    pub fn new<I, S>(facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { facts: facts.into_iter().map(Into::into).collect(), index: 0 }
    }

    /// The fact on display, or `None` if there are no facts.
    pub fn current(&self) -> Option<&str> {
        self.facts.get(self.index).map(String::as_str)
    }

    /// Step to the next fact, wrapping after the last one.
    pub fn advance(&mut self) -> Option<&str> {
        if self.facts.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.facts.len();
        self.current()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
