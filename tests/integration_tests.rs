use flate2::write::GzEncoder;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Command, Output, Stdio};
use std::thread;
use tempfile::{tempdir, TempDir};

const NO_SUCH_COUNTRY: &str = "Oops, there is no country with that name";
const TOO_MANY_MATCHES: &str = "Too many matches found. Please enter a more specific name.";

fn flagly_binary() -> String {
    env!("CARGO_BIN_EXE_flagly").to_string()
}

fn country_json(name: &str, capital: &str, population: u64, language: &str) -> String {
    format!(
        r#"{{"name":"{name}","capital":"{capital}","population":{population},"flags":{{"svg":"https://flagcdn.com/{code}.svg"}},"languages":[{{"name":"{language}"}}]}}"#,
        code = name.to_lowercase().replace(' ', "-"),
    )
}

fn many_countries(n: usize) -> String {
    let items: Vec<String> = (0..n)
        .map(|i| country_json(&format!("Country {i}"), "Capital", 1000, "English"))
        .collect();
    format!("[{}]", items.join(","))
}

/// Canned answer for a request path: status, extra headers, body.
fn answer(path: &str) -> (u16, Vec<(&'static str, &'static str)>, Vec<u8>) {
    let path = path.split('?').next().unwrap_or_default();
    match path {
        "/v2/name/poland" => (
            200,
            vec![],
            format!("[{}]", country_json("Poland", "Warsaw", 37950000, "Polish")).into_bytes(),
        ),
        "/v2/name/united" => {
            let body = [
                country_json("United States", "Washington, D.C.", 329484123, "English"),
                country_json("United Kingdom", "London", 67215293, "English"),
                country_json("United Arab Emirates", "Abu Dhabi", 9890400, "Arabic"),
            ];
            (200, vec![], format!("[{}]", body.join(",")).into_bytes())
        }
        "/v2/name/a" => (200, vec![], many_countries(15).into_bytes()),
        "/v2/name/chad" => {
            let json = format!("[{}]", country_json("Chad", "N'Djamena", 16425859, "French"));
            let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(json.as_bytes()).unwrap();
            (200, vec![("Content-Encoding", "gzip")], encoder.finish().unwrap())
        }
        "/v2/name/broken" => (500, vec![], b"internal error".to_vec()),
        _ => (404, vec![], br#"{"status":404,"message":"Not Found"}"#.to_vec()),
    }
}

fn serve(mut stream: TcpStream) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) => break,
            Ok(_) if header == "\r\n" => break,
            Ok(_) => continue,
            Err(_) => return,
        }
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let (status, headers, body) = answer(path);
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Internal Server Error",
    };

    let mut response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    for (name, value) in headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str("\r\n");

    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&body);
    let _ = stream.flush();
}

/// Start a fake country API on a random loopback port and return its base URL.
fn start_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || serve(stream));
        }
    });
    format!("http://{addr}/v2")
}

/// A command with an empty HOME so no real profile file is picked up.
fn flagly(home: &TempDir) -> Command {
    let mut cmd = Command::new(flagly_binary());
    cmd.env("HOME", home.path()).env("NO_COLOR", "1");
    cmd
}

fn lookup(name: &str) -> Output {
    let home = tempdir().expect("Failed to create temp dir");
    let endpoint = start_api();
    flagly(&home)
        .args(["-e", &endpoint, name])
        .output()
        .expect("Failed to execute flagly")
}

#[test]
fn test_help_command() {
    let output = Command::new(flagly_binary())
        .arg("--help")
        .output()
        .expect("Failed to execute flagly");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("A debounced country lookup for the command line"));
    assert!(stdout.contains("Usage:"));
}

#[test]
fn test_version_command() {
    let output = Command::new(flagly_binary())
        .arg("--version")
        .output()
        .expect("Failed to execute flagly");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("flagly"));
}

#[test]
fn test_single_match_prints_country_card() {
    let output = lookup("poland");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("country-info__list"));
    for text in ["Poland", "Warsaw", "37950000", "Polish"] {
        assert!(stdout.contains(text), "{text} missing from:\n{stdout}");
    }
    assert!(!stdout.contains("country-list__item"));
}

#[test]
fn test_few_matches_print_list() {
    let output = lookup("united");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("<li class=\"country-list__item\">").count(), 3);
    assert_eq!(stdout.matches("<img class=\"country-list__flag\"").count(), 3);
    assert!(!stdout.contains("country-info__list"));
}

#[test]
fn test_too_many_matches_prints_notice_only() {
    let output = lookup("a");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(TOO_MANY_MATCHES));
    assert!(!stdout.contains("country-list__item"));
    assert!(!stdout.contains("country-info__list"));
}

#[test]
fn test_unknown_country_fails_with_notice() {
    let output = lookup("zzzzz");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches(NO_SUCH_COUNTRY).count(), 1);
}

#[test]
fn test_server_error_uses_same_notice() {
    let output = lookup("broken");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(NO_SUCH_COUNTRY));
}

#[test]
fn test_gzip_response_is_decoded() {
    let output = lookup("chad");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("N&#39;Djamena"));
}

#[test]
fn test_piped_input_is_debounced() {
    let home = tempdir().expect("Failed to create temp dir");
    let endpoint = start_api();
    let page = home.path().join("page.html");

    let mut cmd = flagly(&home)
        .args(["-e", &endpoint, "-d", "50", "-o"])
        .arg(&page)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn flagly");

    if let Some(stdin) = cmd.stdin.as_mut() {
        // Lines arrive in one burst, so only the last one is looked up.
        stdin
            .write_all(b"zzzzz\n   \nunited\n")
            .expect("Failed to write to stdin");
    }

    let output = cmd.wait_with_output().expect("Failed to read stdout");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stdout.matches("<li class=\"country-list__item\">").count(), 3);
    assert!(!stderr.contains(NO_SUCH_COUNTRY));

    let html = std::fs::read_to_string(&page).expect("Failed to read page");
    assert!(html.contains("id=\"search-box\""));
    assert_eq!(html.matches("<li class=\"country-list__item\">").count(), 3);
}

#[test]
fn test_profile_configuration() {
    let home = tempdir().expect("Failed to create temp dir");
    let endpoint = start_api();

    std::fs::write(
        home.path().join(".flagly"),
        format!("[test]\nendpoint = {endpoint}\n@X-Api-Key = ABCDE\n"),
    )
    .expect("Failed to write config file");

    let output = flagly(&home)
        .args(["-p", "test", "poland"])
        .output()
        .expect("Failed to execute flagly");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Warsaw"));
}

#[test]
fn test_malformed_profile_is_reported() {
    let home = tempdir().expect("Failed to create temp dir");
    std::fs::write(home.path().join(".flagly"), "[default]\ndelay_ms = soon\n")
        .expect("Failed to write config file");

    let output = flagly(&home)
        .arg("poland")
        .output()
        .expect("Failed to execute flagly");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("delay_ms"));
}
