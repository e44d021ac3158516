//! Token source used for table aliases and bind-parameter tags.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use rand::Rng;

/// Length of every generated token.
pub const TOKEN_LEN: usize = 10;

/// Supplies fixed-length random lowercase strings used to build
/// collision-resistant aliases and bind tags. Collisions are not
/// detected, only made negligibly unlikely.
pub trait TokenSource: fmt::Debug {
    fn next_token(&self) -> String;
}

/// Default source backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokens;

impl TokenSource for RandomTokens {
    fn next_token(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..TOKEN_LEN)
            .map(|_| rng.gen_range(b'a'..=b'z') as char)
            .collect()
    }
}

/// Deterministic source: a base-26 counter padded to [`TOKEN_LEN`].
/// Clones share the counter, so one instance can feed tables and the
/// statement that uses them without repeating tokens. Intended for
/// tests that assert exact SQL text.
#[derive(Debug, Default, Clone)]
pub struct SeqTokens {
    next: Rc<Cell<u64>>,
}

impl SeqTokens {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenSource for SeqTokens {
    fn next_token(&self) -> String {
        let mut n = self.next.get();
        self.next.set(n + 1);
        let mut out = [b'a'; TOKEN_LEN];
        for slot in out.iter_mut().rev() {
            *slot = b'a' + (n % 26) as u8;
            n /= 26;
        }
        out.iter().map(|b| *b as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_tokens_are_distinct_and_fixed_length() {
        let source = RandomTokens;
        let one = source.next_token();
        let two = source.next_token();
        let three = source.next_token();

        assert_ne!(one, two);
        assert_ne!(one, three);
        assert_ne!(two, three);

        assert_eq!(one.len(), TOKEN_LEN);
        assert_eq!(two.len(), TOKEN_LEN);
        assert_eq!(three.len(), TOKEN_LEN);
        assert!(one.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_seq_tokens_count_in_base_26() {
        let source = SeqTokens::new();
        assert_eq!(source.next_token(), "aaaaaaaaaa");
        assert_eq!(source.next_token(), "aaaaaaaaab");
        assert_eq!(source.next_token(), "aaaaaaaaac");
    }

    #[test]
    fn test_seq_tokens_clones_share_the_counter() {
        let source = SeqTokens::new();
        let clone = source.clone();
        assert_eq!(source.next_token(), "aaaaaaaaaa");
        assert_eq!(clone.next_token(), "aaaaaaaaab");
    }
}
