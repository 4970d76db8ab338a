// CLI runs against the mock server on a random port.
use std::process::Command;

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_restreq");
    let mut cmd = Command::new(exe);
    cmd.env_remove("RESTREQ_TIMEOUT").env_remove("RESTREQ_USER_AGENT");
    cmd
}

fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn parse_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("valid json")
}

#[test]
fn post_items_are_echoed_as_json() {
    let base = spawn_server();
    let out = cmd()
        .args([
            "POST",
            format!("{base}/echo").as_str(),
            "nick=test=test",
            "bool:=true",
            "int32:=76",
            "float64:=2.34",
            "bool2:=xxx",
            "-H",
            "X-Token: abc",
            "-b",
            "session=s1",
        ])
        .output()
        .expect("run restreq");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let echo = parse_json(&out.stdout);
    assert_eq!(echo["method"], "POST");
    assert_eq!(
        echo["json"],
        serde_json::json!({"nick": "test=test", "bool": true, "int32": 76, "float64": 2.34})
    );
    assert_eq!(echo["headers"]["x-token"], "abc");
    assert_eq!(echo["headers"]["content-type"], "application/json");
    assert_eq!(echo["cookies"]["session"], "s1");
}

#[test]
fn user_agent_comes_from_env() {
    let base = spawn_server();
    let out = cmd()
        .env("RESTREQ_USER_AGENT", "env-agent/1")
        .args(["GET", format!("{base}/echo").as_str()])
        .output()
        .expect("run restreq");
    assert!(out.status.success());
    assert_eq!(parse_json(&out.stdout)["headers"]["user-agent"], "env-agent/1");
}

#[test]
fn include_prints_status_line() {
    let base = spawn_server();
    let out = cmd()
        .args(["-i", "GET", format!("{base}/status/404").as_str()])
        .output()
        .expect("run restreq");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("HTTP 404\n"), "{stdout}");
    assert!(stdout.ends_with("status 404\n"), "{stdout}");
}

#[test]
fn check_status_fails_on_error_response() {
    let base = spawn_server();
    let out = cmd()
        .args(["--check-status", "GET", format!("{base}/status/500").as_str()])
        .output()
        .expect("run restreq");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("HTTP 500"));
}

#[test]
fn invalid_url_fails() {
    let out = cmd().args(["GET", "not a url"]).output().expect("run restreq");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid url"));
}
