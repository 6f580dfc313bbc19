//! Statistics of published reference datasets
//!
//! Expected values were computed independently of this crate. Robust and
//! parametric values must match within 0.001%; the confidence interval bounds
//! within 0.1% because the stored t table is rounded.
//!
//! Run with: cargo test -p cycle-bench --test reference_datasets

#[path = "common/counter.rs"]
mod counter;

use counter::ScriptedCounter;
use cycle_bench::{SampleStore, Statistics};

const RTOL_NARROW: f64 = 0.00001;
const RTOL_WIDE: f64 = 0.001;

/// Normal distribution, mean 1'000'000, sd 100'000, n = 101.
const DATA1: [u64; 101] = [
    996741, 1042651, 757072, 1078921, 919322, 1038198, 935586, 837703, 874305, 1058255, 1060602,
    945072, 811022, 984377, 1009921, 917695, 1111104, 1160768, 986824, 1088920, 955952, 1196703,
    1018870, 916257, 907630, 1040466, 1069042, 918638, 997844, 1052655, 855711, 1074501, 1072637,
    898349, 997692, 1155499, 1040669, 1017868, 1226173, 891234, 1067356, 1043179, 872030, 1047991,
    1066673, 974536, 1073497, 1218791, 964708, 1055225, 1089842, 995410, 740516, 1011374, 1024122,
    1121446, 919776, 1069853, 1045024, 1007487, 1023407, 1163792, 959350, 1049170, 1094754, 938595,
    942773, 885211, 811808, 952822, 968111, 1122784, 1149973, 1114145, 1110608, 792954, 1008669,
    925160, 1018784, 970606, 1114745, 1138732, 1017553, 965294, 1094759, 989196, 1035290, 952470,
    857766, 910864, 819845, 991630, 878751, 766477, 963790, 1084276, 1002248, 1155900, 1012169,
    1090662, 1057084,
];

/// Normal distribution, n = 31, analyzed with denominator 32.
const DATA2: [u64; 31] = [
    816470, 1238486, 966711, 977648, 606973, 1183548, 742549, 918595, 1283970, 1100167, 960535,
    982734, 1119218, 1028509, 1014213, 1255995, 783184, 715697, 1176160, 847037, 603338, 1057617,
    327444, 931031, 914510, 1036230, 1120600, 894320, 1219739, 962894, 702271,
];

/// Smallest count with quartiles.
const DATA3: [u64; 4] = [1, 2, 3, 4];

struct Expected {
    count: usize,
    denominator: u32,
    abs_min: u64,
    abs_max: u64,
    min: f64,
    q1: f64,
    median: f64,
    q3: f64,
    max: f64,
    mean: f64,
    sd: f64,
    ci95_lo: f64,
    ci95_hi: f64,
}

fn assert_close(name: &str, value: f64, reference: f64, rtol: f64) {
    assert!(
        (value - reference).abs() < rtol * reference.abs(),
        "{}: got {:.4}, expected {:.4} (rtol {:e})",
        name,
        value,
        reference,
        rtol
    );
}

fn analyze(values: &[u64], denominator: u32) -> Statistics {
    let mut store = SampleStore::with_counter(ScriptedCounter::constant(20), 128).unwrap();
    store.reset();
    store.set_denominator(denominator);
    store.load_raw_values(values).unwrap();
    store.statistics()
}

fn check(stats: &Statistics, expected: &Expected) {
    assert_eq!(stats.count, expected.count);
    assert_eq!(stats.denominator, expected.denominator);
    assert_eq!(stats.abs_min, expected.abs_min);
    assert_eq!(stats.abs_max, expected.abs_max);

    assert_close("min", stats.min, expected.min, RTOL_NARROW);
    assert_close("q1", stats.q1, expected.q1, RTOL_NARROW);
    assert_close("median", stats.median, expected.median, RTOL_NARROW);
    assert_close("q3", stats.q3, expected.q3, RTOL_NARROW);
    assert_close("max", stats.max, expected.max, RTOL_NARROW);

    assert_close("mean", stats.mean, expected.mean, RTOL_NARROW);
    assert_close("sd", stats.sd, expected.sd, RTOL_NARROW);
    assert_close("ci95_lo", stats.ci95_lo, expected.ci95_lo, RTOL_WIDE);
    assert_close("ci95_hi", stats.ci95_hi, expected.ci95_hi, RTOL_WIDE);
}

#[test]
fn test_normal_distribution_n101() {
    let stats = analyze(&DATA1, 1);
    check(
        &stats,
        &Expected {
            count: 101,
            denominator: 1,
            abs_min: 740516,
            abs_max: 1226173,
            min: 740516.0,
            q1: 937842.75,
            median: 1011374.0,
            q3: 1070549.0,
            max: 1226173.0,
            mean: 1002289.7228,
            sd: 102380.3052,
            ci95_lo: 982078.5662,
            ci95_hi: 1022500.8793,
        },
    );
}

#[test]
fn test_normal_distribution_with_denominator() {
    let stats = analyze(&DATA2, 32);
    check(
        &stats,
        &Expected {
            count: 31,
            denominator: 32,
            abs_min: 327444,
            abs_max: 1283970,
            min: 10232.625,
            q1: 25753.4922,
            median: 30209.7188,
            q3: 34826.7266,
            max: 40124.0625,
            mean: 29726.2026,
            sd: 6811.9025,
            ci95_lo: 27227.5766,
            ci95_hi: 32224.8286,
        },
    );
}

#[test]
fn test_corner_case_n4() {
    let stats = analyze(&DATA3, 1);
    check(
        &stats,
        &Expected {
            count: 4,
            denominator: 1,
            abs_min: 1,
            abs_max: 4,
            min: 1.0,
            q1: 1.5,
            median: 2.5,
            q3: 3.5,
            max: 4.0,
            mean: 2.5,
            sd: 1.2910,
            ci95_lo: 0.4457,
            ci95_hi: 4.5543,
        },
    );
}

#[test]
fn test_baseline_is_carried_not_subtracted() {
    let stats = analyze(&DATA3, 1);
    assert_eq!(stats.baseline, 20);
    assert_eq!(stats.abs_min, 1);
}
