//! Bounded text helpers

use core::fmt::{self, Write};

use heapless::String;

/// Writer that keeps what fits and silently drops the rest
pub struct Truncating<'a, const N: usize>(pub &'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Copy as many whole characters of `s` as fit
pub fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    let _ = Truncating(&mut out).write_str(s);
    out
}
