//! Running the external converter for one job.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::ConversionError;
use crate::utils::config::{CONVERTER_NAME, ProcessConsts};
use crate::{Job, Opts};

/// Converts one job. Implementations block until the conversion is done and report every failure
/// through the returned error rather than panicking.
pub trait Converter: Send + Sync {
    fn convert(&self, job: &Job) -> Result<(), ConversionError>;
}

/// Runs an external program per job: `<program> <extra_args...> <input> <output_flag> <output>`.
#[derive(Clone, Debug)]
pub struct ExternalConverter {
    program: PathBuf,
    extra_args: Vec<String>,
    output_flag: String,
    timeout: Option<Duration>,
    check_exit_status: bool,
}

impl ExternalConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
            output_flag: crate::utils::config::DEFAULT_OUTPUT_FLAG.to_string(),
            timeout: None,
            check_exit_status: false,
        }
    }

    /// Converter configured from `opts`, with the program resolved by [`resolve_converter`].
    pub fn from_opts(opts: &Opts) -> Self {
        Self {
            program: resolve_converter(opts.converter.as_deref()),
            extra_args: opts.extra_args.clone(),
            output_flag: opts.output_flag.clone(),
            timeout: opts.timeout_secs.map(Duration::from_secs),
            check_exit_status: opts.check_exit_status,
        }
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_check_exit_status(mut self, check: bool) -> Self {
        self.check_exit_status = check;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Argument list for `job`, without the program itself.
    pub fn args_for(&self, job: &Job) -> Vec<std::ffi::OsString> {
        let mut args: Vec<std::ffi::OsString> =
            self.extra_args.iter().map(Into::into).collect();
        args.push(job.source_path.clone().into_os_string());
        args.push(self.output_flag.clone().into());
        args.push(job.target_path.clone().into_os_string());
        args
    }

    fn program_label(&self) -> String {
        self.program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| CONVERTER_NAME.to_string())
    }

    fn wait(&self, child: &mut Child, job: &Job) -> Result<ExitStatus, ConversionError> {
        let Some(timeout) = self.timeout else {
            return child
                .wait()
                .map_err(|e| ConversionError::new(&job.source_path, format!("wait failed: {e}")));
        };
        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ConversionError::new(
                        &job.source_path,
                        format!(
                            "{} did not finish within {}s and was killed.",
                            self.program_label(),
                            timeout.as_secs()
                        ),
                    ));
                }
                Ok(None) => thread::sleep(Duration::from_millis(ProcessConsts::TIMEOUT_POLL_MS)),
                Err(e) => {
                    return Err(ConversionError::new(
                        &job.source_path,
                        format!("wait failed: {e}"),
                    ));
                }
            }
        }
    }
}

impl Converter for ExternalConverter {
    fn convert(&self, job: &Job) -> Result<(), ConversionError> {
        if let Some(parent) = job.target_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ConversionError::new(
                    &job.source_path,
                    format!("create output folder {}: {e}", parent.display()),
                )
            })?;
        }

        let mut child = Command::new(&self.program)
            .args(self.args_for(job))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                debug!("spawn {} failed: {}", self.program.display(), e);
                let name = self.program_label();
                ConversionError::new(
                    &job.source_path,
                    format!("Failed to launch {name}. Make sure {name} is next to this executable."),
                )
            })?;

        let status = self.wait(&mut child, job)?;
        if self.check_exit_status && !status.success() {
            return Err(ConversionError::new(
                &job.source_path,
                format!("{} exited with {status}", self.program_label()),
            ));
        }
        Ok(())
    }
}

/// Pick the converter executable: explicit path, else `cwebp` next to this executable, else
/// `cwebp` on PATH. Falls back to the exe-adjacent path so a launch failure names it.
pub fn resolve_converter(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let file_name = format!("{CONVERTER_NAME}{}", std::env::consts::EXE_SUFFIX);
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&file_name)));
    if let Some(ref p) = beside_exe
        && p.is_file()
    {
        return p.clone();
    }
    if let Ok(p) = which::which(CONVERTER_NAME) {
        return p;
    }
    beside_exe.unwrap_or_else(|| PathBuf::from(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(dir: &Path) -> Job {
        Job::new(dir.join("in").join("a.png"), dir.join("out").join("sub").join("a.webp"))
    }

    #[test]
    fn args_put_shared_args_first() {
        let conv = ExternalConverter::new("cwebp")
            .with_extra_args(vec!["-q".into(), "80".into(), "-mt".into()]);
        let j = Job::new("Input/a b.png", "Output/a b.webp");
        let args: Vec<String> = conv
            .args_for(&j)
            .into_iter()
            .map(|a| a.into_string().unwrap())
            .collect();
        assert_eq!(
            args,
            vec!["-q", "80", "-mt", "Input/a b.png", "-o", "Output/a b.webp"]
        );
    }

    #[test]
    fn missing_executable_names_it() {
        let dir = tempfile::tempdir().unwrap();
        let conv = ExternalConverter::new(dir.path().join("no-such-cwebp"));
        let j = job(dir.path());
        let err = conv.convert(&j).unwrap_err();
        assert_eq!(err.path, j.source_path);
        assert!(err.message.contains("Failed to launch no-such-cwebp"), "{}", err.message);
        assert!(
            dir.path().join("out").join("sub").is_dir(),
            "output folder is created before launch"
        );
    }

    #[test]
    fn explicit_converter_wins() {
        assert_eq!(
            resolve_converter(Some(Path::new("/opt/tools/cwebp"))),
            PathBuf::from("/opt/tools/cwebp")
        );
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_ignored_unless_checked() {
        let dir = tempfile::tempdir().unwrap();
        let j = job(dir.path());
        let Ok(false_bin) = which::which("false") else {
            eprintln!("skip: `false` not on PATH");
            return;
        };
        assert!(ExternalConverter::new(&false_bin).convert(&j).is_ok());
        let err = ExternalConverter::new(&false_bin)
            .with_check_exit_status(true)
            .convert(&j)
            .unwrap_err();
        assert!(err.message.contains("exited with"), "{}", err.message);
    }

    #[cfg(unix)]
    #[test]
    fn timeout_kills_hung_converter() {
        let dir = tempfile::tempdir().unwrap();
        let Ok(sleep_bin) = which::which("sleep") else {
            eprintln!("skip: `sleep` not on PATH");
            return;
        };
        // sh -c binds the trailing <in> -o <out> operands to $0.. and ignores them.
        let Ok(sh) = which::which("sh") else {
            eprintln!("skip: `sh` not on PATH");
            return;
        };
        let conv = ExternalConverter::new(&sh)
            .with_extra_args(vec!["-c".into(), format!("{} 30", sleep_bin.display())])
            .with_timeout(Some(Duration::from_millis(100)));
        let started = Instant::now();
        let err = conv.convert(&job(dir.path())).unwrap_err();
        assert!(err.message.contains("was killed"), "{}", err.message);
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
