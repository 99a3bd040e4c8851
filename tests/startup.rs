use std::{
    process::{Command, Stdio},
    time::{Duration, Instant},
};

#[test]
fn missing_credentials_abort_before_listening() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_beszel-widget-proxy"))
        .args(["--rest-server", "127.0.0.1:0"])
        // Keep a stray .env file from providing credentials
        .current_dir(std::env::temp_dir())
        .env_remove("BESZEL_EMAIL")
        .env_remove("BESZEL_PASSWORD")
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start the proxy");

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("The proxy kept running without credentials");
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    assert!(!status.success());

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("BESZEL_EMAIL and BESZEL_PASSWORD must be configured"));
    assert!(!stdout.contains("Server running at"));
}
