use crate::config::{Config, Mode};
use std::env;
use std::sync::Mutex;
use std::sync::OnceLock;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

fn clear_backend_vars() {
    unsafe {
        env::remove_var("MODE");
        env::remove_var("BACKEND_BASE_URL");
        env::remove_var("BACKEND_API_KEY");
        env::remove_var("BACKEND_API_SECRET");
        env::remove_var("SESSION_USER_ID");
    }
}

#[test]
fn test_defaults_to_mock_mode() {
    let _guard = get_env_lock().lock().unwrap();
    clear_backend_vars();

    let config = Config::from_env().unwrap();

    assert_eq!(config.mode, Mode::Mock);
    assert!(config.session_user_id.is_none());
}

#[test]
fn test_rest_mode_requires_credentials() {
    let _guard = get_env_lock().lock().unwrap();
    clear_backend_vars();
    unsafe {
        env::set_var("MODE", "rest");
    }

    let result = Config::from_env();
    assert!(result.is_err());

    unsafe {
        env::set_var("BACKEND_API_KEY", "key");
        env::set_var("BACKEND_API_SECRET", "secret");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.mode, Mode::Rest);

    clear_backend_vars();
}

#[test]
fn test_invalid_mode_is_rejected() {
    let _guard = get_env_lock().lock().unwrap();
    clear_backend_vars();
    unsafe {
        env::set_var("MODE", "paper");
    }

    assert!(Config::from_env().is_err());

    clear_backend_vars();
}

#[test]
fn test_invalid_backend_url_is_rejected() {
    let _guard = get_env_lock().lock().unwrap();
    clear_backend_vars();
    unsafe {
        env::set_var("BACKEND_BASE_URL", "not a url");
    }

    assert!(Config::from_env().is_err());

    clear_backend_vars();
}
