use super::*;

fn nested_sum(depth: u32) -> u64 {
    ensure_sufficient_stack(|| {
        if depth == 0 {
            0
        } else {
            u64::from(depth) + nested_sum(depth - 1)
        }
    })
}

#[test]
fn shallow_recursion_completes() {
    assert_eq!(nested_sum(10), 55);
}

#[test]
fn deep_recursion_grows_the_stack() {
    // far past what a default 8MB main-thread stack holds for this frame size
    assert_eq!(nested_sum(200_000), 20_000_100_000);
}

#[test]
fn passes_through_results() {
    let ok: Result<u8, String> = ensure_sufficient_stack(|| Ok(7));
    assert_eq!(ok, Ok(7));
}

#[test]
fn remaining_stack_is_reported_on_native() {
    if cfg!(not(target_arch = "wasm32")) {
        assert!(remaining_stack().is_some_and(|n| n > 0));
    }
}
