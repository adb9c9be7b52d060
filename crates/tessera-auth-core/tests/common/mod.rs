//! Common test utilities for tessera-auth-core integration tests

pub mod directories;
pub mod forge;

use std::sync::{Arc, Once};

use tessera_auth_core::{TokenConfig, TokenService};
use tessera_db::{MemoryUserDirectory, StoragePrecision};
use tessera_types::{Role, UserId};

#[allow(unused_imports)]
pub use directories::{CountingDirectory, FailingDirectory, FailurePoint};
#[allow(unused_imports)]
pub use forge::TokenForger;

/// Signing secret shared by every test service
pub const TEST_SECRET: &str = "tessera-integration-test-secret-0123456789";

static TRACING: Once = Once::new();

/// Route tracing output through the test harness (`RUST_LOG` to filter)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn test_config() -> TokenConfig {
    TokenConfig::try_new(TEST_SECRET).expect("test secret is long enough")
}

/// A service over a fresh in-memory directory seeded with the given users
#[allow(dead_code)]
pub fn service_with_users(
    precision: StoragePrecision,
    users: &[(i64, Option<Role>)],
) -> (TokenService<MemoryUserDirectory>, Arc<MemoryUserDirectory>) {
    init_tracing();
    let dir = Arc::new(MemoryUserDirectory::with_precision(precision));
    for (id, role) in users {
        dir.insert_user(UserId(*id), *role);
    }
    let service = TokenService::new(test_config(), Arc::clone(&dir)).expect("valid config");
    (service, dir)
}
