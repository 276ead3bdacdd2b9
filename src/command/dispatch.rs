use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use crate::runtime::Error;
use crate::utils::command_to_string;

/// Environment variable through which the child sees its gene
pub const DEFAULT_GENE_ENV: &str = "GENE";

/// Environment variable pointing the child at node-local scratch space
pub const SCRATCH_ENV: &str = "TMPDIR";

/// Arguments that are the same for every task of the array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticParams {
    pub verbose: bool,
    pub gene_metadata: PathBuf,
    pub target_dir: PathBuf,
    pub window: u32,
    pub enzymes: Vec<String>,
    pub reference_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl StaticParams {
    pub fn enzyme_list(&self) -> String {
        self.enzymes.join(",")
    }
}

/// The external per-gene analysis program. `program_args` go before everything
/// else, e.g. the script path when `program` is an interpreter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisProgram {
    pub program: PathBuf,
    pub program_args: Vec<String>,
    pub gene_env: String,
}

impl AnalysisProgram {
    pub fn new(program: impl Into<PathBuf>) -> AnalysisProgram {
        AnalysisProgram {
            program: program.into(),
            program_args: Vec::new(),
            gene_env: DEFAULT_GENE_ENV.to_string(),
        }
    }
}

/// A fully built launch of the analysis program for one gene.
///
/// Built without side effects so it can be printed or inspected before (or instead of) running
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub env: Vec<(String, OsString)>,
    pub gene: String,
}

impl Invocation {
    pub fn new(
        program: &AnalysisProgram,
        gene: &str,
        params: &StaticParams,
        scratch_dir: Option<&Path>,
    ) -> Invocation {
        let mut args: Vec<OsString> = program.program_args.iter().map(OsString::from).collect();
        if params.verbose {
            args.push("-v".into());
        }
        args.push("--gene_file".into());
        args.push(params.gene_metadata.clone().into_os_string());
        args.push(gene.into());
        args.push(params.target_dir.clone().into_os_string());
        args.push(params.window.to_string().into());
        args.push(params.enzyme_list().into());
        args.push(params.reference_dir.clone().into_os_string());
        args.push(params.out_dir.clone().into_os_string());
        args.push("--window".into());

        let mut env = vec![(program.gene_env.clone(), OsString::from(gene))];
        if let Some(scratch_dir) = scratch_dir {
            env.push((SCRATCH_ENV.to_string(), scratch_dir.as_os_str().to_os_string()));
        }

        Invocation {
            program: program.program.clone(),
            args,
            env,
            gene: gene.to_string(),
        }
    }

    /// The command to spawn. Environment is set on the child only
    pub fn to_command(&self) -> process::Command {
        let mut cmd = process::Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

/// Launch the analysis program, wait for it, and return its exit code unchanged.
///
/// A child killed by a signal reports 128 + signal, as a shell would.
/// Only a failure to start is an error; a non-zero exit is a result.
pub fn dispatch(invocation: &Invocation) -> Result<i32, Error> {
    let mut cmd = invocation.to_command();
    let cmd_string = command_to_string(&cmd);
    log::info!("Running: {}", cmd_string);

    let utility = invocation.program.to_string_lossy().to_string();
    let status = cmd.status().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
            Error::utility_not_executable(&utility)
        }
        _ => Error::utility_execution_error(&utility, &cmd_string, Some(e.to_string())),
    })?;

    let code = exit_code(status);
    if code == 0 {
        log::info!("Gene {:?} finished", invocation.gene);
    } else {
        log::warn!("Gene {:?} exited with status {}", invocation.gene, code);
    }
    Ok(code)
}

pub fn exit_code(status: process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> StaticParams {
        StaticParams {
            verbose: true,
            gene_metadata: PathBuf::from("/ref/gene_metadata.bed"),
            target_dir: PathBuf::from("/out/targ"),
            window: 5000,
            enzymes: vec!["cpf1".to_string(), "SpCas9".to_string()],
            reference_dir: PathBuf::from("/ref/hg19"),
            out_dir: PathBuf::from("/out/results"),
        }
    }

    fn args_of(invocation: &Invocation) -> Vec<String> {
        invocation
            .args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_invocation_arguments() {
        let inv = Invocation::new(&AnalysisProgram::new("gen_targ_dfs"), "EGFR", &params(), None);
        assert_eq!(
            args_of(&inv),
            vec![
                "-v",
                "--gene_file",
                "/ref/gene_metadata.bed",
                "EGFR",
                "/out/targ",
                "5000",
                "cpf1,SpCas9",
                "/ref/hg19",
                "/out/results",
                "--window",
            ]
        );
        assert_eq!(inv.gene, "EGFR");
        assert_eq!(inv.env, vec![("GENE".to_string(), OsString::from("EGFR"))]);
    }

    #[test]
    fn test_program_args_and_scratch() {
        let mut program = AnalysisProgram::new("python3");
        program.program_args = vec!["gen_targ_dfs.py".to_string()];
        let mut p = params();
        p.verbose = false;

        let inv = Invocation::new(&program, "TP53", &p, Some(Path::new("/scratch/123")));
        let args = args_of(&inv);
        assert_eq!(args[0], "gen_targ_dfs.py");
        assert_eq!(args[1], "--gene_file");
        assert!(!args.contains(&"-v".to_string()));
        assert_eq!(
            inv.env,
            vec![
                ("GENE".to_string(), OsString::from("TP53")),
                ("TMPDIR".to_string(), OsString::from("/scratch/123")),
            ]
        );
    }

    #[test]
    fn test_missing_program_is_launch_failure() {
        let inv = Invocation::new(
            &AnalysisProgram::new("/nonexistent/genesweep-analysis"),
            "EGFR",
            &params(),
            None,
        );
        assert!(matches!(dispatch(&inv), Err(Error::UtilityNotExecutable { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_is_propagated() {
        let mut program = AnalysisProgram::new("/bin/sh");
        program.program_args = vec!["-c".to_string(), "exit 7".to_string()];
        let inv = Invocation::new(&program, "EGFR", &params(), None);
        let code = dispatch(&inv).unwrap();
        assert_eq!(code, 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_gene_env_is_scoped_to_child() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("seen");
        let mut program = AnalysisProgram::new("/bin/sh");
        program.gene_env = "GENESWEEP_TEST_GENE".to_string();
        program.program_args = vec![
            "-c".to_string(),
            format!("printf %s \"$GENESWEEP_TEST_GENE\" > {}", marker.display()),
        ];

        let code = dispatch(&Invocation::new(&program, "BRCA1", &params(), None)).unwrap();
        assert_eq!(code, 0);
        assert_eq!(std::fs::read_to_string(&marker).unwrap(), "BRCA1");
        assert!(std::env::var("GENESWEEP_TEST_GENE").is_err());
    }
}
