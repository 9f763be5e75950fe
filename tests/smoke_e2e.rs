//! E2E Smoke Tests for Backend Equivalence
//!
//! Every compiled backend must give exactly the answer of a plain
//! left-to-right scan: same index, same value bits, same copied data.
//!
//! # Running
//! ```bash
//! cargo test --test smoke_e2e -- --nocapture
//! RUSTFLAGS="-C target-cpu=native" cargo test --test smoke_e2e
//! ```

use rayo::{Backend, Element, Kernels};

/// One handle per backend in this build
fn all_kernels() -> Vec<Kernels> {
    Backend::all_compiled()
        .into_iter()
        .map(|b| Kernels::with_backend(b).expect("compiled backend"))
        .collect()
}

/// Element bit patterns, so signed zeros and NaN payloads compare exactly
fn bits<T: Element>(v: &[T]) -> Vec<u64> {
    v.iter().map(|x| x.to_bits_u64()).collect()
}

/// Naive first-minimum scan (1-based)
fn reference_imin(x: &[f64]) -> usize {
    let mut best = 0;
    for i in 1..x.len() {
        if x[i] < x[best] {
            best = i;
        }
    }
    best + 1
}

// ============================================================================
// END-TO-END FIXTURE
// ============================================================================

#[test]
fn smoke_short_fixture() {
    let x = [3.0f32, 1.0, 1.0, 2.0];
    for k in all_kernels() {
        assert_eq!(k.imin(4, &x, 1), 2, "{:?}", k.backend());
        assert_eq!(k.max(4, &x, 1), 3.0, "{:?}", k.backend());

        let mut y = [0.0f32; 4];
        k.copy(4, &x, 1, &mut y, 1);
        assert_eq!(y, x, "{:?}", k.backend());
    }
}

// ============================================================================
// TIE-BREAK ACROSS BLOCK WIDTHS
// ============================================================================

/// Duplicate minima placed below, at and above the imin block width (32)
#[test]
fn smoke_duplicate_minimum_first_wins() {
    for n in [31usize, 32, 33, 64, 95, 1000] {
        let mut x = vec![7.0f64; n];
        let first = n / 3;
        x[first] = -7.0;
        x[n - 1] = -7.0;
        for k in all_kernels() {
            assert_eq!(k.imin(n as isize, &x, 1), first + 1, "n={n} {:?}", k.backend());
        }
    }
}

#[test]
fn smoke_duplicate_maximum_first_wins() {
    for n in [63usize, 64, 65, 130] {
        let mut x = vec![0.5f32; n];
        x[n - 2] = 2.0;
        x[1] = 2.0;
        for k in all_kernels() {
            assert_eq!(k.imax(n as isize, &x, 1), 2, "n={n} {:?}", k.backend());
        }
    }
}

/// Signed zeros compare equal; the earliest one is returned bit for bit
#[test]
fn smoke_signed_zero_max_is_path_independent() {
    let n = 200;
    let mut x = vec![-1.0f64; n];
    x[150] = 0.0;
    x[20] = -0.0;
    let strided: Vec<f64> = x.iter().flat_map(|&v| [v, 99.0]).collect();

    for k in all_kernels() {
        let contiguous = k.max(n as isize, &x, 1);
        let gathered = k.max(n as isize, &strided, 2);
        assert!(contiguous.is_sign_negative(), "{:?}", k.backend());
        assert_eq!(bits(&[contiguous]), bits(&[gathered]), "{:?}", k.backend());
    }
}

// ============================================================================
// BLOCK BOUNDARIES
// ============================================================================

#[test]
fn smoke_boundary_lengths_match_reference() {
    for n in [1usize, 2, 31, 32, 33, 63, 64, 65, 127, 128, 129] {
        let x: Vec<f64> = (0..n).map(|i| ((i * 37) % 23) as f64 - 11.0).collect();
        let want = reference_imin(&x);
        for k in all_kernels() {
            assert_eq!(k.imin(n as isize, &x, 1), want, "n={n} {:?}", k.backend());
        }
    }
}

#[test]
fn smoke_single_element() {
    for k in all_kernels() {
        assert_eq!(k.imin(1, &[42.0f32], 1), 1);
        assert_eq!(k.max(1, &[-42.0f32], 1), -42.0);
    }
}

// ============================================================================
// DEGENERATE INPUT
// ============================================================================

#[test]
fn smoke_sentinels_on_empty_buffer() {
    let empty: [f32; 0] = [];
    for k in all_kernels() {
        assert_eq!(k.imin(0, &empty, 1), 0);
        assert_eq!(k.imin(10, &empty, 0), 0);
        assert_eq!(k.imin(10, &empty, -2), 0);
        assert_eq!(k.max(0, &empty, 1), 0.0);
        assert_eq!(k.max(-1, &empty, 1), 0.0);

        let mut y: [f32; 0] = [];
        k.copy(0, &empty, 1, &mut y, 1);
        k.axpy(-5, 1.0, &empty, 1, &mut y, 1);
    }
}

// ============================================================================
// STRIDED COPY
// ============================================================================

#[test]
fn smoke_strided_copy_independent_increments() {
    let n = 100;
    let x: Vec<f32> = (0..2 * n).map(|i| i as f32).collect();
    for k in all_kernels() {
        let mut y = vec![f32::NAN; 3 * n];
        k.copy(n as isize, &x, 2, &mut y, 3);
        for i in 0..n {
            assert_eq!(y[3 * i], x[2 * i]);
            assert!(y[3 * i + 1].is_nan());
        }
    }
}

#[test]
fn smoke_copy_then_imin_agree() {
    let x: Vec<f64> = (0..517).map(|i| ((i * 7919) % 389) as f64).collect();
    for k in all_kernels() {
        let mut y = vec![0.0f64; 517];
        k.copy(517, &x, 1, &mut y, 1);
        assert_eq!(k.imin(517, &x, 1), k.imin(517, &y, 1));
    }
}

// ============================================================================
// AXPY
// ============================================================================

#[test]
fn smoke_axpy_bit_exact_across_backends() {
    let n = 1003;
    let x: Vec<f32> = (0..n).map(|i| (i as f32 * 0.37).sin()).collect();
    let y0: Vec<f32> = (0..n).map(|i| (i as f32 * 0.11).cos()).collect();

    let mut expected = y0.clone();
    for i in 0..n {
        expected[i] += 1.25 * x[i];
    }

    for k in all_kernels() {
        let mut y = y0.clone();
        k.axpy(n as isize, 1.25, &x, 1, &mut y, 1);
        assert_eq!(bits(&y), bits(&expected), "{:?}", k.backend());
    }
}
