//! Live-server integration entry. Every spec from the registry runs as its
//! own test against `SHAKEDOWN_BASE_URL`; without that variable the tests
//! skip, so the suite stays runnable on machines with no server.

use shakedown_e2e::context::TestContext;

fn base_url() -> Option<String> {
    std::env::var("SHAKEDOWN_BASE_URL")
        .or_else(|_| std::env::var("BASE_URL"))
        .ok()
}

macro_rules! live_test {
    ($module:ident :: $name:ident) => {
        #[tokio::test]
        async fn $name() {
            let Some(base_url) = base_url() else {
                eprintln!(
                    "skipping {}::{}: SHAKEDOWN_BASE_URL not set",
                    stringify!($module),
                    stringify!($name)
                );
                return;
            };
            let ctx = TestContext::new(base_url);
            shakedown_e2e::specs::$module::$name(&ctx).await.unwrap();
        }
    };
}

shakedown_e2e::for_each_spec!(live_test);
