use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::Router;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use voca_backend::audio::TracingPronouncer;
use voca_backend::catalog::Catalog;
use voca_backend::config::Config;
use voca_backend::routes::build_router;
use voca_backend::state::AppState;
use voca_backend::store::{KeyValueStore, Store};
use voca_backend::study::StudyDesk;

use super::fixtures::{FIXTURE_CATALOG, TEST_PASSPHRASE};

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    store: Arc<Store>,
    temp_dir: TempDir,
}

fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: temp_dir
            .path()
            .join("voca-test.sled")
            .to_string_lossy()
            .to_string(),
        catalog_path: None,
        access_passphrase: TEST_PASSPHRASE.to_string(),
        jwt_secret: format!("integration-test-jwt-secret-{}", uuid::Uuid::new_v4()),
        jwt_expires_in_hours: 1,
        cors_origin: "http://localhost:5173".to_string(),
    }
}

fn assemble(temp_dir: TempDir, config: Config) -> TestApp {
    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    let kv: Arc<dyn KeyValueStore> = store.clone();
    let catalog = Arc::new(Catalog::from_json_str(FIXTURE_CATALOG).expect("fixture catalog"));
    let desk = StudyDesk::new(catalog, kv.clone(), Arc::new(TracingPronouncer))
        .with_rng(StdRng::seed_from_u64(42));
    let state = AppState::new(desk, kv, &config);

    TestApp {
        app: build_router(state.clone()),
        state,
        config,
        store,
        temp_dir,
    }
}

pub async fn spawn_test_server() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&temp_dir);
    assemble(temp_dir, config)
}

impl TestApp {
    /// Drops every handle on the store and reopens it from the same directory,
    /// as a process restart would.
    pub async fn restart(self) -> TestApp {
        let TestApp {
            app,
            state,
            config,
            store,
            temp_dir,
        } = self;
        store.flush().expect("flush store");
        drop(app);
        drop(state);
        drop(store);
        assemble(temp_dir, config)
    }
}
