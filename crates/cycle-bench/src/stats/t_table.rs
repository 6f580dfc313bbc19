//! Two-tailed 95% critical values of Student's t distribution.
//!
//! Only a subset of the full table is stored. Lookup is a step function: the
//! first entry whose degrees-of-freedom threshold is `<= df` wins, so a `df`
//! between two stored rows uses the smaller row's (larger) critical value and
//! the confidence interval errs on the wide side. No interpolation is done.

/// Degrees of freedom treated as infinity.
pub const T_TABLE_INFINITY: usize = 1024;

/// `(df threshold, t value)` ordered by decreasing threshold.
pub const T_TABLE_95: &[(usize, f64)] = &[
    (T_TABLE_INFINITY, 1.960),
    (300, 1.968),
    (100, 1.984),
    (80, 1.990),
    (60, 2.000),
    (50, 2.009),
    (40, 2.021),
    (30, 2.042),
    (20, 2.086),
    (18, 2.101),
    (16, 2.120),
    (14, 2.145),
    (12, 2.179),
    (10, 2.228),
    (9, 2.262),
    (8, 2.306),
    (7, 2.365),
    (6, 2.447),
    (5, 2.571),
    (4, 2.776),
    (3, 3.182),
    (2, 4.303),
    (1, 12.706),
];

/// Critical t value for a sample of `n` values (`df = n - 1`).
///
/// # Panics
///
/// Panics if `n < 2`; a confidence interval needs at least one degree of
/// freedom.
///
/// # Examples
///
/// ```
/// use cycle_bench::stats::t_value;
///
/// assert_eq!(t_value(4), 3.182);   // df = 3
/// assert_eq!(t_value(101), 1.984); // df = 100
/// assert_eq!(t_value(36), 2.042);  // df = 35 falls back to the df = 30 row
/// ```
pub fn t_value(n: usize) -> f64 {
    assert!(n > 1, "t value needs at least 2 samples (got {})", n);

    let df = n - 1;
    T_TABLE_95
        .iter()
        .find(|(threshold, _)| df >= *threshold)
        .map(|&(_, t)| t)
        .expect("t table ends with df = 1")
}
