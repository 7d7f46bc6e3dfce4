#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    // initialize a subscriber only for tests (captured per test by the test harness)
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
