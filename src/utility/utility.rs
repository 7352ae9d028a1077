//! Utilities
use log::*;
use std::{collections::HashMap, env, fs, io::Write, time::Duration};
use anyhow::{bail, Context, Result};

use crate::DEFAULT_HTTP_GET_TIMEOUT;
use crate::DEFAULT_HOSTS;
use crate::DEFAULT_PORTS;

pub fn http_get(
    host: &str,
    port: &str,
    url: &str,
) -> Result<String>
{
    http_get_with_timeout(host, port, url, DEFAULT_HTTP_GET_TIMEOUT)
}

/// A get that fails when `host:port` does not answer within `timeout`.
pub fn http_get_with_timeout(
    host: &str,
    port: &str,
    url: &str,
    timeout: Duration,
) -> Result<String>
{
    let data_from_web_request = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .with_context(|| "Error creating http client")?
        .get(format!("http://{}:{}/{}", host, port, url))
        .send()
        .with_context(|| format!("Error reading: {}:{}/{}", host, port, url))?;

    if !data_from_web_request.status().is_success()
    {
        debug!("Non success response: {}:{}/{} = {}", host, port, url, &data_from_web_request.status());
        bail!("Non success response: {}:{}/{} = {}", host, port, url, data_from_web_request.status());
    }
    debug!("Success response: {}:{}/{} = {}", host, port, url, &data_from_web_request.status());
    data_from_web_request.text()
        .with_context(|| format!("Error reading response body: {}:{}/{}", host, port, url))
}

/// Take the option if set, otherwise the environment variable `env_name` (set directly or
/// via `.env`), otherwise the default.
///
/// The option or environment value is added to `changed_options`, to be written to `.env`.
pub fn set_option(
    option: &Option<String>,
    env_name: &'static str,
    default: &str,
    changed_options: &mut HashMap<&str, String>,
) -> String
{
    match option {
        Some(option) => {
            info!("{} argument set: using: {}", env_name, option);
            changed_options.insert(env_name, option.to_string());
            option.to_string()
        },
        None => match env::var(env_name) {
            Ok(set_var) => {
                info!("{} not set: set via .env: {}", env_name, set_var);
                changed_options.insert(env_name, set_var.to_owned());
                set_var
            },
            Err(_e) => {
                info!("{} not set: and not set via .env: using default: {}", env_name, default);
                default.to_string()
            },
        },
    }
}

pub fn set_hosts(
    option: &Option<String>,
    changed_options: &mut HashMap<&str, String>,
) -> Vec<String>
{
    split_list(&set_option(option, "TELEMETRY_HOSTS", DEFAULT_HOSTS, changed_options))
}

pub fn set_ports(
    option: &Option<String>,
    changed_options: &mut HashMap<&str, String>,
) -> Vec<String>
{
    split_list(&set_option(option, "TELEMETRY_PORTS", DEFAULT_PORTS, changed_options))
}

fn split_list(
    list: &str,
) -> Vec<String>
{
    list.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

pub fn dotenv_writer(
    write_dotenv: bool,
    changed_options: HashMap<&str, String>,
) -> Result<()>
{
    if !changed_options.is_empty() && write_dotenv {
        info!("Writing .env file");
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(".env")
            .with_context(|| "Error writing .env file: .env")?;

        for (key, value) in changed_options {
            file.write_all(format!("{}={}\n", key, value).as_bytes())?;
            info!("{}={}", key, value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_set_option_argument() {
        let mut changed_options = HashMap::new();
        let result = set_option(&Some("zero1,zero2".to_string()), "TELEMETRY_UNIT_TEST_HOSTS", "localhost", &mut changed_options);
        assert_eq!(result, "zero1,zero2");
        assert_eq!(changed_options.get("TELEMETRY_UNIT_TEST_HOSTS").unwrap(), "zero1,zero2");
    }

    #[test]
    fn unit_set_option_default() {
        let mut changed_options = HashMap::new();
        let result = set_option(&None, "TELEMETRY_UNIT_TEST_UNSET", "6080", &mut changed_options);
        assert_eq!(result, "6080");
        assert!(changed_options.is_empty());
    }

    #[test]
    fn unit_set_hosts_splits() {
        let mut changed_options = HashMap::new();
        let hosts = set_hosts(&Some("zero1, zero2,,zero3".to_string()), &mut changed_options);
        assert_eq!(hosts, vec!["zero1", "zero2", "zero3"]);
        let ports = set_ports(&Some("6080".to_string()), &mut changed_options);
        assert_eq!(ports, vec!["6080"]);
        assert_eq!(changed_options.len(), 2);
    }

    #[test]
    fn unit_http_get_times_out() {
        use std::{io::Read, net::TcpListener, thread, time::Instant};
        // accepts the connection, reads the request and never answers.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port().to_string();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buffer = [0u8; 1024];
            let _ = stream.read(&mut buffer);
            thread::sleep(Duration::from_secs(5));
        });
        let timer = Instant::now();
        let error = http_get_with_timeout("127.0.0.1", &port, "state", Duration::from_millis(300)).unwrap_err();
        assert!(timer.elapsed() < Duration::from_secs(4), "{:?}", timer.elapsed());
        let reqwest_error = error.downcast_ref::<reqwest::Error>().expect("transport error");
        assert!(reqwest_error.is_timeout(), "{:?}", reqwest_error);
    }

    #[test]
    fn unit_http_get_unreachable() {
        // port 9 (discard) is not expected to run an http server.
        assert!(http_get("127.0.0.1", "9", "state").is_err());
    }
}
