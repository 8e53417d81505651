use super::*;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.endpoint_host, "127.0.0.1");
    assert_eq!(config.endpoint_port, 8100);
    assert_eq!(config.screencast_quality, 60);
    assert_eq!(config.screencast_every_nth_frame, 3);
    assert_eq!(config.viewport.width, 1280);
    assert_eq!(config.viewport.height, 720);
    assert!((config.viewport.device_scale_factor - 1.0).abs() < f64::EPSILON);
    assert!(!config.viewport.mobile);
}

#[test]
fn test_browser_ws_url() {
    let config = Config::default();
    assert_eq!(
        config.browser_ws_url("abc123"),
        "ws://127.0.0.1:8100/browser?token=abc123"
    );
}

#[test]
fn test_browser_ws_url_escapes_token() {
    let config = Config::default();
    let url = config.browser_ws_url("a b&c");
    assert_eq!(url, "ws://127.0.0.1:8100/browser?token=a+b%26c");
}

#[test]
fn test_pool_base_url() {
    let mut config = Config::default();
    config.endpoint_host = "pool.internal".to_string();
    config.endpoint_port = 9000;
    assert_eq!(config.pool_base_url(), "http://pool.internal:9000");
}
