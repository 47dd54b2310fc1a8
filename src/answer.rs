//! Programmed answers for matched calls.
//!
//! Each configured call pattern owns an [`AnswerQueue`]. Successive
//! matched calls consume the queue in order; once only the last answer
//! remains it repeats forever (sticky-last). An empty queue answers with
//! nothing, which a caller observes as `Ok(None)`.

use crate::value::Value;
use std::collections::VecDeque;
use thiserror::Error;

/// A programmed error raised by a `then_raise` answer.
///
/// Faults are plain values until a matched call consumes them, so they
/// are cloneable and comparable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Fault {
    message: String,
}

impl Fault {
    /// Create a fault with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The fault message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// What a matched call produces: a return value or a raised fault.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Return the value to the caller.
    Returns(Value),
    /// Raise the fault to the caller.
    Raises(Fault),
}

/// Ordered answers attached to one call pattern.
#[derive(Debug, Clone, Default)]
pub struct AnswerQueue {
    answers: VecDeque<Answer>,
}

impl AnswerQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an answer.
    pub fn push(&mut self, answer: Answer) {
        self.answers.push_back(answer);
    }

    /// Take the answer for the next matched call.
    ///
    /// Yields queued answers in order, then repeats the last one forever.
    /// An empty queue yields `None`.
    pub fn next_answer(&mut self) -> Option<Answer> {
        if self.answers.len() > 1 {
            return self.answers.pop_front();
        }
        self.answers.front().cloned()
    }

    /// Number of answers still queued.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Check if no answers are queued.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queue_yields_nothing_forever() {
        let mut queue = AnswerQueue::new();
        assert_eq!(queue.next_answer(), None);
        assert_eq!(queue.next_answer(), None);
    }

    #[test]
    fn answers_come_in_order_then_stick() {
        let mut queue = AnswerQueue::new();
        queue.push(Answer::Returns(Value::int(1)));
        queue.push(Answer::Returns(Value::int(2)));
        queue.push(Answer::Returns(Value::int(3)));

        assert_eq!(queue.next_answer(), Some(Answer::Returns(Value::int(1))));
        assert_eq!(queue.next_answer(), Some(Answer::Returns(Value::int(2))));
        assert_eq!(queue.next_answer(), Some(Answer::Returns(Value::int(3))));
        assert_eq!(queue.next_answer(), Some(Answer::Returns(Value::int(3))));
        assert_eq!(queue.next_answer(), Some(Answer::Returns(Value::int(3))));
    }

    #[test]
    fn single_answer_repeats() {
        let mut queue = AnswerQueue::new();
        queue.push(Answer::Returns(Value::int(0)));

        assert_eq!(queue.next_answer(), Some(Answer::Returns(Value::int(0))));
        assert_eq!(queue.next_answer(), Some(Answer::Returns(Value::int(0))));
    }

    #[test]
    fn faults_queue_like_values() {
        let mut queue = AnswerQueue::new();
        queue.push(Answer::Returns(Value::int(1)));
        queue.push(Answer::Raises(Fault::new("boom")));

        assert_eq!(queue.next_answer(), Some(Answer::Returns(Value::int(1))));
        assert_eq!(queue.next_answer(), Some(Answer::Raises(Fault::new("boom"))));
        assert_eq!(queue.next_answer(), Some(Answer::Raises(Fault::new("boom"))));
    }
}
