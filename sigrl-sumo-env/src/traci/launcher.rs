//! Starting SUMO as a child process.
use crate::{SimError, SumoEnvError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    env,
    ffi::OsString,
    net::{TcpListener, TcpStream},
    path::PathBuf,
    process::{Child, Command},
    thread::sleep,
    time::Duration,
};

/// Configuration of [`TraciConnector`](super::TraciConnector).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TraciConfig {
    /// Root directory of the SUMO installation.
    ///
    /// If `None`, the environment variable `SUMO_HOME` is used.
    pub sumo_home: Option<PathBuf>,

    /// Use `sumo-gui` instead of `sumo`.
    ///
    /// The GUI is started with `--quit-on-end` so that it exits when the connection is closed.
    pub gui: bool,

    /// SUMO configuration file of the scenario.
    pub sumo_cfg: PathBuf,

    /// Arguments appended to the command line.
    pub extra_args: Vec<String>,

    /// Host SUMO listens on.
    pub host: String,

    /// Port SUMO listens on. A free port is chosen if `None`.
    pub port: Option<u16>,

    /// Attempts to connect while SUMO starts up.
    pub connect_attempts: usize,

    /// Wait between two attempts in milliseconds.
    pub connect_interval_ms: u64,
}

impl Default for TraciConfig {
    fn default() -> Self {
        Self {
            sumo_home: env::var_os("SUMO_HOME").map(PathBuf::from),
            gui: false,
            sumo_cfg: PathBuf::from("data/cross.sumocfg"),
            extra_args: vec!["--tripinfo-output".into(), "tripinfo.xml".into()],
            host: "localhost".into(),
            port: None,
            connect_attempts: 60,
            connect_interval_ms: 1000,
        }
    }
}

impl TraciConfig {
    /// Sets the root directory of SUMO.
    pub fn sumo_home(mut self, v: impl Into<PathBuf>) -> Self {
        self.sumo_home = Some(v.into());
        self
    }

    /// Selects the graphical front-end.
    pub fn gui(mut self, v: bool) -> Self {
        self.gui = v;
        self
    }

    /// Sets the SUMO configuration file.
    pub fn sumo_cfg(mut self, v: impl Into<PathBuf>) -> Self {
        self.sumo_cfg = v.into();
        self
    }

    /// Sets the arguments appended to the command line.
    pub fn extra_args(mut self, v: Vec<String>) -> Self {
        self.extra_args = v;
        self
    }

    /// Sets the port.
    pub fn port(mut self, v: u16) -> Self {
        self.port = Some(v);
        self
    }

    /// Path to the simulator binary.
    ///
    /// Fails if no SUMO installation is configured or the binary does not exist.
    pub fn binary_path(&self) -> Result<PathBuf, SumoEnvError> {
        self.binary_path_with(env::var_os("SUMO_HOME"))
    }

    fn binary_path_with(&self, env_home: Option<OsString>) -> Result<PathBuf, SumoEnvError> {
        let home = self
            .sumo_home
            .clone()
            .or_else(|| env_home.map(PathBuf::from))
            .ok_or(SumoEnvError::MissingSumoHome)?;
        let name = if self.gui { "sumo-gui" } else { "sumo" };
        let path = home.join("bin").join(name);
        if path.exists() || path.with_extension("exe").exists() {
            Ok(path)
        } else {
            Err(SumoEnvError::BinaryNotFound(path))
        }
    }

    fn command_args(&self, port: u16) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-c".into(),
            self.sumo_cfg.clone().into(),
            "--remote-port".into(),
            port.to_string().into(),
        ];
        if self.gui {
            args.push("--quit-on-end".into());
        }
        args.extend(self.extra_args.iter().map(OsString::from));
        args
    }
}

/// A running SUMO process, killed when dropped.
pub struct SumoProcess(Child);

impl SumoProcess {
    /// Waits for the process to exit after the connection was closed.
    pub fn wait(mut self) -> Result<(), SimError> {
        self.0.wait()?;
        Ok(())
    }
}

impl Drop for SumoProcess {
    fn drop(&mut self) {
        if let Ok(None) = self.0.try_wait() {
            warn!("Killing SUMO process {}", self.0.id());
            let _ = self.0.kill();
            let _ = self.0.wait();
        }
    }
}

fn free_port() -> Result<u16, SimError> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}

/// Spawns SUMO and connects to its TraCI server.
pub fn launch(config: &TraciConfig) -> Result<(TcpStream, SumoProcess), anyhow::Error> {
    let binary = config.binary_path()?;
    let port = match config.port {
        Some(p) => p,
        None => free_port()?,
    };
    info!(
        "Starting {:?} -c {:?} on port {}",
        binary, config.sumo_cfg, port
    );
    let child = Command::new(&binary)
        .args(config.command_args(port))
        .spawn()
        .map_err(|e| SimError::Launch(format!("{:?}: {}", binary, e)))?;
    let mut process = SumoProcess(child);

    for _ in 0..config.connect_attempts.max(1) {
        if let Some(status) = process.0.try_wait()? {
            return Err(SimError::Launch(format!("SUMO exited with {}", status)).into());
        }
        match TcpStream::connect((config.host.as_str(), port)) {
            Ok(stream) => {
                stream.set_nodelay(true)?;
                return Ok((stream, process));
            }
            Err(_) => sleep(Duration::from_millis(config.connect_interval_ms)),
        }
    }
    Err(SimError::Launch(format!(
        "could not connect to SUMO on {}:{} after {} attempts",
        config.host, port, config.connect_attempts
    ))
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_path_without_sumo_home() {
        let config = TraciConfig {
            sumo_home: None,
            ..Default::default()
        };
        assert!(matches!(
            config.binary_path_with(None),
            Err(SumoEnvError::MissingSumoHome)
        ));
    }

    #[test]
    fn test_binary_path_falls_back_to_environment() {
        let config: TraciConfig = serde_yaml::from_str(
            "sumo_home: null\ngui: false\nsumo_cfg: data/cross.sumocfg\nextra_args: []\n\
             host: localhost\nport: null\nconnect_attempts: 1\nconnect_interval_ms: 10\n",
        )
        .unwrap();
        match config.binary_path_with(Some("/opt/sumo".into())) {
            Err(SumoEnvError::BinaryNotFound(p)) => {
                assert_eq!(p, PathBuf::from("/opt/sumo/bin/sumo"))
            }
            r => panic!("unexpected result {:?}", r),
        }

        let config = config.sumo_home("/usr/share/sumo");
        match config.binary_path_with(Some("/opt/sumo".into())) {
            Err(SumoEnvError::BinaryNotFound(p)) => {
                assert_eq!(p, PathBuf::from("/usr/share/sumo/bin/sumo"))
            }
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_gui_quits_on_end() {
        let config = TraciConfig::default();
        let args = config.command_args(8813);
        assert_eq!(
            args[..4],
            ["-c", "data/cross.sumocfg", "--remote-port", "8813"].map(OsString::from)
        );
        assert!(!args.contains(&OsString::from("--quit-on-end")));
        assert_eq!(&args[4..], ["--tripinfo-output", "tripinfo.xml"].map(OsString::from));

        let args = config.gui(true).command_args(8813);
        assert!(args.contains(&OsString::from("--quit-on-end")));
    }

    #[test]
    fn test_binary_path_missing_binary() {
        let config = TraciConfig::default()
            .sumo_home("/nonexistent/sumo")
            .gui(true);
        match config.binary_path() {
            Err(SumoEnvError::BinaryNotFound(p)) => {
                assert_eq!(p, PathBuf::from("/nonexistent/sumo/bin/sumo-gui"))
            }
            r => panic!("unexpected result {:?}", r),
        }
    }
}
