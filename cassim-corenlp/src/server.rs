//! Starting and stopping a local CoreNLP server process.

use crate::error::{CoreNlpError, CoreNlpResult};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const SERVER_CLASS: &str = "edu.stanford.nlp.pipeline.StanfordCoreNLPServer";

/// How to launch the Java server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Directory holding the CoreNLP jars.
    pub corenlp_dir: PathBuf,
    pub port: u16,
    /// JVM heap, as passed to `-mx`.
    pub heap: String,
    /// Server-side request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Where the server writes its shutdown key.
    pub shutdown_key_path: PathBuf,
    pub java: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            corenlp_dir: PathBuf::from("corenlp"),
            port: 9000,
            heap: "3g".to_string(),
            timeout_ms: 30_000,
            shutdown_key_path: std::env::temp_dir().join("corenlp.shutdown"),
            java: "java".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Arguments passed to `java`.
    pub fn args(&self) -> Vec<String> {
        vec![
            format!("-mx{}", self.heap),
            "-cp".to_string(),
            "*".to_string(),
            SERVER_CLASS.to_string(),
            "-preload".to_string(),
            "tokenize".to_string(),
            "-status_port".to_string(),
            self.port.to_string(),
            "-port".to_string(),
            self.port.to_string(),
            "-timeout".to_string(),
            self.timeout_ms.to_string(),
        ]
    }
}

/// A server process started by [`CoreNlpServer::launch`].
#[derive(Debug)]
pub struct CoreNlpServer {
    config: ServerConfig,
    child: Child,
}

impl CoreNlpServer {
    /// Spawn the server in `corenlp_dir`. Returns as soon as the process is
    /// running; use [`CoreNlpServer::wait_ready`] before sending requests.
    pub fn launch(config: ServerConfig) -> CoreNlpResult<Self> {
        if !config.corenlp_dir.is_dir() {
            return Err(CoreNlpError::Config(format!(
                "CoreNLP directory {} does not exist",
                config.corenlp_dir.display()
            )));
        }
        info!(port = config.port, dir = %config.corenlp_dir.display(), "starting CoreNLP server");
        let child = Command::new(&config.java)
            .args(config.args())
            .current_dir(&config.corenlp_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(Self { config, child })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn url(&self) -> String {
        self.config.url()
    }

    /// Poll the server until it answers or `timeout` passes.
    pub fn wait_ready(&self, timeout: Duration) -> CoreNlpResult<()> {
        let client = Client::builder().timeout(Duration::from_secs(2)).build()?;
        let deadline = Instant::now() + timeout;
        loop {
            match client.head(self.url()).send() {
                Ok(_) => return Ok(()),
                Err(err) if Instant::now() >= deadline => return Err(err.into()),
                Err(err) => {
                    debug!(error = %err, "CoreNLP server not ready yet");
                    thread::sleep(Duration::from_millis(500));
                }
            }
        }
    }

    /// Ask the server to shut down and reap the process.
    pub fn stop(mut self) -> CoreNlpResult<()> {
        let result = shutdown(&self.url(), &self.config.shutdown_key_path);
        if result.is_err() {
            self.child.kill()?;
        }
        self.child.wait()?;
        result
    }
}

/// Stop a server through its `/shutdown` endpoint, using the key the server
/// wrote at `key_path`. Works for servers this process did not start.
pub fn shutdown(url: &str, key_path: &Path) -> CoreNlpResult<()> {
    let key = read_shutdown_key(key_path)?;
    let response = Client::new()
        .get(format!("{}/shutdown", url.trim_end_matches('/')))
        .query(&[("key", key)])
        .send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(CoreNlpError::Status {
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        });
    }
    info!(url, "CoreNLP server stopped");
    Ok(())
}

fn read_shutdown_key(path: &Path) -> CoreNlpResult<String> {
    let key = fs::read_to_string(path)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CoreNlpError::Config(format!(
            "shutdown key file {} is empty",
            path.display()
        )));
    }
    Ok(key.to_string())
}
