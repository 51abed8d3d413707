//! Stack growth for deep recursive stub writing.
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: no-op passthrough.

/// Grow the stack when less than this remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f` with at least [`RED_ZONE`] bytes of stack available.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_recursion_does_not_overflow() {
        fn depth(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
        }

        assert_eq!(depth(100_000), 100_000);
    }
}
