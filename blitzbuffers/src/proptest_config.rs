use proptest::test_runner::Config;

/// Shared configuration for property tests.
///
/// Failure persistence is disabled so test runs never write regression files into
/// the source tree.
pub(crate) fn proptest_cfg() -> Config {
    Config {
        failure_persistence: None,
        ..Config::with_cases(256)
    }
}
