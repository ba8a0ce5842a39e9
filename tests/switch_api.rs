use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;

use switchtalk::{
    render_line, ApiConfig, Credentials, Fetch, SwitchApiClient, SwitchApiError, SwitchState,
};

const INTERFACES: &str = r#"{"items":[
    {"port":1,"id":"eth1","trunking":{"enabled":true,"native_vlan":5},"vlan_id":0,"admin":"up","link":"up","duplex":"full","speed":1000,"type":"ethernet","name":"eth1"},
    {"port":-1,"id":"vlan5","trunking":{"enabled":false},"vlan_id":5,"admin":"up","link":"up","duplex":"full","speed":0,"type":"vlan","name":"Vlan5"}
]}"#;

const VLANS: &str = r#"{"items":[
    {"id":5,"interface_ids":["eth1"],"mac_addresses":[{"interface_id":"eth1","address":"aa:bb:cc:dd:ee:ff"}]}
]}"#;

/// Minimal HTTP/1.1 responder: one canned reply per accepted connection,
/// chosen by request path. Every raw request is forwarded to the returned
/// receiver.
fn serve(routes: Vec<(&'static str, u16, &'static [u8])>) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/switches/", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();
    let expected = routes.len();

    thread::spawn(move || {
        for stream in listener.incoming().take(expected) {
            let mut stream = stream.unwrap();
            let request = read_request(&mut stream);
            let path = request.split_whitespace().nth(1).unwrap_or_default().to_string();

            let (status, body) = routes
                .iter()
                .find(|(route, _, _)| path.ends_with(route))
                .map(|(_, status, body)| (*status, *body))
                .unwrap_or((404, &b""[..]));

            let reason = match status {
                200 => "OK",
                404 => "Not Found",
                500 => "Internal Server Error",
                _ => "",
            };
            let head = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                reason,
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
            let _ = tx.send(request);
        }
    });

    (base_url, rx)
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];

    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }

    String::from_utf8_lossy(&raw).into_owned()
}

fn client(base_url: &str) -> SwitchApiClient {
    SwitchApiClient::new(ApiConfig {
        base_url: base_url.to_string(),
        switch_name: "sw1".to_string(),
        credentials: Credentials::new("user", "pass"),
        min_tls_version: None,
        max_tls_version: None,
        use_system_proxy: false,
    })
    .unwrap()
}

#[test]
fn fetch_sends_basic_auth_and_returns_body() {
    let (base_url, requests) = serve(vec![("/sw1/interfaces", 200, INTERFACES.as_bytes())]);

    let body = client(&base_url).fetch(Some("interfaces"), None).unwrap();
    let request = requests.recv().unwrap();

    assert_eq!(body, INTERFACES);
    assert!(request.starts_with("GET /switches/sw1/interfaces HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("authorization: basic dxnlcjpwyxnz"));
}

#[test]
fn http_error_status_is_classified() {
    let (base_url, _requests) = serve(vec![("/sw1/interfaces", 404, &b""[..])]);

    let err = client(&base_url).fetch(Some("interfaces"), None).unwrap_err();

    match err {
        SwitchApiError::HttpStatus { code, reason } => {
            assert_eq!(code, 404);
            assert_eq!(reason, "Not Found");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn refused_connection_carries_url() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base_url = format!("http://127.0.0.1:{}/switches/", port);

    let err = client(&base_url).fetch(Some("vlans"), None).unwrap_err();

    match err {
        SwitchApiError::Connection { url, reason } => {
            assert_eq!(url, format!("{}sw1/vlans", base_url));
            assert!(!reason.is_empty());
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn build_and_render_over_http() {
    let (base_url, requests) = serve(vec![
        ("/sw1/interfaces", 200, INTERFACES.as_bytes()),
        ("/sw1/vlans", 200, VLANS.as_bytes()),
    ]);

    let state = SwitchState::build(&client(&base_url)).unwrap();

    assert!(requests.recv().unwrap().contains("/sw1/interfaces "));
    assert!(requests.recv().unwrap().contains("/sw1/vlans "));

    assert_eq!(state.ports().keys().copied().collect::<Vec<_>>(), vec![1]);
    let record = state.port(1).unwrap();
    assert_eq!(record.allowed_vlans, vec!["5"]);
    assert_eq!(record.native_vlan_id.as_deref(), Some("5"));
    assert_eq!(record.mac_addresses, vec!["aa:bb:cc:dd:ee:ff"]);
    assert_eq!(state.find_by_mac("aa:bb:cc:dd:ee:ff"), Some(1));

    assert_eq!(
        render_line(record),
        "[1]\t[link:up] [admin:up] [1000/full] [Trunk: *5*] [MAC: aa:bb:cc:dd:ee:ff]"
    );
}

#[test]
fn vlans_failure_discards_interfaces() {
    let (base_url, _requests) = serve(vec![
        ("/sw1/interfaces", 200, INTERFACES.as_bytes()),
        ("/sw1/vlans", 500, &b""[..]),
    ]);

    let err = SwitchState::build(&client(&base_url)).unwrap_err();

    assert!(matches!(err, SwitchApiError::HttpStatus { code: 500, .. }));
}

#[test]
fn body_is_returned_byte_for_byte() {
    let body = "{\"items\":[{\"name\":\"caf\u{e9} \u{fffd}\"}]}";
    let (base_url, _requests) = serve(vec![("/sw1", 200, body.as_bytes())]);

    assert_eq!(client(&base_url).fetch(None, None).unwrap(), body);
}

#[test]
fn invalid_utf8_body_is_an_error() {
    let (base_url, _requests) = serve(vec![("/sw1/vlans", 200, &b"{\"items\":[\xff]}"[..])]);

    let err = client(&base_url).fetch(Some("vlans"), None).unwrap_err();

    match err {
        SwitchApiError::InvalidBody { url, .. } => assert_eq!(url, format!("{}sw1/vlans", base_url)),
        other => panic!("unexpected error {:?}", other),
    }
}
