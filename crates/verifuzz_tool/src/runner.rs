//! Blocking external-process execution with timeout and output capture.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// How often the runner polls a child for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A description of one external tool invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Short name used for the `<name>.log` file in the working directory.
    pub name: String,
    /// The executable to run.
    pub executable: PathBuf,
    /// Command-line arguments.
    pub args: Vec<String>,
    /// Working directory; created if absent.
    pub cwd: PathBuf,
    /// Hard deadline for the invocation.
    pub timeout: Duration,
}

impl Invocation {
    /// Creates an invocation with the given name and executable.
    pub fn new(name: impl Into<String>, executable: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            executable: executable.into(),
            args: Vec::new(),
            cwd: PathBuf::from("."),
            timeout: Duration::from_secs(60),
        }
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets the working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Classified outcome of one invocation.
///
/// These are values, not errors: a failing or wedged tool is an expected
/// event that the drivers record and classify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolStatus {
    /// The tool exited with status 0.
    Ok,
    /// The tool exited with a non-zero status.
    NonZeroExit(i32),
    /// The tool exceeded its deadline and was killed, or exited with the
    /// conventional `timeout(1)` status 124.
    Timeout,
    /// The tool exited cleanly but left no usable output behind (a missing
    /// netlist, an undecodable simulation stream). Set by the drivers, never
    /// by the runner itself.
    EmptyFail,
    /// The tool could not be launched at all.
    LaunchFail(String),
}

impl ToolStatus {
    /// True for a clean zero exit.
    pub fn is_ok(&self) -> bool {
        matches!(self, ToolStatus::Ok)
    }

    /// True when the invocation hit its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ToolStatus::Timeout)
    }
}

/// Captured result of one invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// The classified outcome.
    pub status: ToolStatus,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Wall-clock duration of the invocation.
    pub duration: Duration,
}

/// Runs an external tool to completion or timeout.
///
/// Creates the working directory if absent, exports `ROOT` (the invoker's
/// working directory) so vendor scripts can resolve auxiliary files, and
/// tees the captured stdout/stderr to `<name>.log` in the working
/// directory. The child runs as the leader of its own process group; on
/// timeout the whole group is killed, so a wedged vendor tool's own
/// subprocess tree dies with it, and the result carries
/// [`ToolStatus::Timeout`].
pub fn invoke(invocation: &Invocation) -> ToolOutput {
    let started = Instant::now();

    if let Err(e) = std::fs::create_dir_all(&invocation.cwd) {
        return ToolOutput {
            status: ToolStatus::LaunchFail(format!(
                "cannot create working directory {}: {e}",
                invocation.cwd.display()
            )),
            stdout: String::new(),
            stderr: String::new(),
            duration: started.elapsed(),
        };
    }

    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut command = Command::new(&invocation.executable);
    command
        .args(&invocation.args)
        .current_dir(&invocation.cwd)
        .env("ROOT", &root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    // The child leads a fresh process group so a timeout can take down its
    // entire subprocess tree, not just the direct child.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }
    let spawned = command.spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            return ToolOutput {
                status: ToolStatus::LaunchFail(format!(
                    "cannot spawn {}: {e}",
                    invocation.executable.display()
                )),
                stdout: String::new(),
                stderr: String::new(),
                duration: started.elapsed(),
            };
        }
    };

    // Drain both pipes on background threads so a chatty child cannot
    // deadlock against a full pipe buffer while we poll for completion.
    let stdout_handle = drain_pipe(child.stdout.take());
    let stderr_handle = drain_pipe(child.stderr.take());

    let status = wait_with_deadline(&mut child, started, invocation.timeout);
    let duration = started.elapsed();

    let stdout = stdout_handle
        .join()
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();
    let stderr = stderr_handle
        .join()
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();

    write_log(invocation, &status, &stdout, &stderr);

    ToolOutput {
        status,
        stdout,
        stderr,
        duration,
    }
}

fn drain_pipe<R: Read + Send + 'static>(
    pipe: Option<R>,
) -> std::thread::JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn wait_with_deadline(child: &mut Child, started: Instant, timeout: Duration) -> ToolStatus {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                return match status.code() {
                    Some(0) => ToolStatus::Ok,
                    // timeout(1)-wrapped commands report 124.
                    Some(124) => ToolStatus::Timeout,
                    Some(code) => ToolStatus::NonZeroExit(code),
                    // Killed by a signal.
                    None => ToolStatus::NonZeroExit(-1),
                };
            }
            Ok(None) => {}
            Err(e) => return ToolStatus::LaunchFail(format!("wait failed: {e}")),
        }
        if started.elapsed() >= timeout {
            kill_process_group(child);
            let _ = child.wait();
            return ToolStatus::Timeout;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Kills the child's whole process group.
///
/// The child was spawned as its own group leader, so the group id equals
/// its pid and `killpg` reaches every descendant a vendor tool forked.
#[cfg(unix)]
fn kill_process_group(child: &mut Child) {
    let pgid = child.id() as libc::pid_t;
    unsafe {
        libc::killpg(pgid, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    let _ = child.kill();
}

fn write_log(invocation: &Invocation, status: &ToolStatus, stdout: &str, stderr: &str) {
    let log_path = invocation.cwd.join(format!("{}.log", invocation.name));
    let body = format!(
        "$ {} {}\nstatus: {status:?}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}\n",
        invocation.executable.display(),
        invocation.args.join(" "),
    );
    let _ = std::fs::write(log_path, body);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(dir: &std::path::Path, name: &str, script: &str) -> ToolOutput {
        let inv = Invocation::new(name, "sh")
            .arg("-c")
            .arg(script)
            .cwd(dir)
            .timeout(Duration::from_secs(10));
        invoke(&inv)
    }

    #[test]
    fn clean_exit_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let out = sh(dir.path(), "ok", "exit 0");
        assert_eq!(out.status, ToolStatus::Ok);
    }

    #[test]
    fn nonzero_exit_is_classified() {
        let dir = tempfile::tempdir().unwrap();
        let out = sh(dir.path(), "fail", "exit 3");
        assert_eq!(out.status, ToolStatus::NonZeroExit(3));
    }

    #[test]
    fn exit_124_maps_to_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let out = sh(dir.path(), "wrapped", "exit 124");
        assert_eq!(out.status, ToolStatus::Timeout);
    }

    #[test]
    fn captures_stdout_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let out = sh(dir.path(), "echo", "echo front; echo back 1>&2");
        assert_eq!(out.stdout.trim(), "front");
        assert_eq!(out.stderr.trim(), "back");
    }

    #[test]
    fn deadline_kills_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::new("sleepy", "sh")
            .arg("-c")
            .arg("sleep 30")
            .cwd(dir.path())
            .timeout(Duration::from_millis(200));
        let started = Instant::now();
        let out = invoke(&inv);
        assert_eq!(out.status, ToolStatus::Timeout);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn deadline_kills_the_whole_process_group() {
        let dir = tempfile::tempdir().unwrap();
        // The backgrounded subshell would create `leaked` one second after
        // the deadline if it outlived the group kill.
        let inv = Invocation::new("tree", "sh")
            .arg("-c")
            .arg("(sleep 1; touch leaked) & sleep 30")
            .cwd(dir.path())
            .timeout(Duration::from_millis(200));
        let out = invoke(&inv);
        assert_eq!(out.status, ToolStatus::Timeout);
        std::thread::sleep(Duration::from_millis(1500));
        assert!(!dir.path().join("leaked").exists());
    }

    #[test]
    fn missing_executable_is_launch_fail() {
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::new("ghost", "/nonexistent/tool/binary")
            .cwd(dir.path())
            .timeout(Duration::from_secs(1));
        let out = invoke(&inv);
        assert!(matches!(out.status, ToolStatus::LaunchFail(_)));
    }

    #[test]
    fn creates_cwd_and_tees_log() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("runs").join("r0");
        let inv = Invocation::new("hello", "sh")
            .arg("-c")
            .arg("echo logged")
            .cwd(&nested)
            .timeout(Duration::from_secs(10));
        let out = invoke(&inv);
        assert_eq!(out.status, ToolStatus::Ok);
        let log = std::fs::read_to_string(nested.join("hello.log")).unwrap();
        assert!(log.contains("logged"));
        assert!(log.contains("--- stdout ---"));
    }

    #[test]
    fn root_env_points_at_invoker_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let out = sh(dir.path(), "root", "printf %s \"$ROOT\"");
        let expected = std::env::current_dir().unwrap();
        assert_eq!(out.stdout, expected.display().to_string());
    }

    #[test]
    fn chatty_child_does_not_deadlock() {
        let dir = tempfile::tempdir().unwrap();
        // Emit well past the OS pipe buffer size.
        let out = sh(
            dir.path(),
            "chatty",
            "i=0; while [ $i -lt 20000 ]; do echo line_$i; i=$((i+1)); done",
        );
        assert_eq!(out.status, ToolStatus::Ok);
        assert!(out.stdout.lines().count() == 20000);
    }
}
