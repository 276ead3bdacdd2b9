use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use super::AnalysisProgram;
use super::GeneList;
use super::IndexPolicy;
use super::Invocation;
use super::Scheduler;
use super::StaticParams;
use crate::utils::command_to_string;

/// One array task: select the gene, invoke the program, wait, report accounting.
pub struct RunTask {
    pub path_gene_list: PathBuf,
    pub task_index: usize,
    pub index_policy: IndexPolicy,
    pub program: AnalysisProgram,
    pub params: StaticParams,
    pub scratch_dir: Option<PathBuf>,
    /// Where to ask for the accounting record afterwards, if anywhere
    pub accounting: Option<(Scheduler, String)>,
    /// Print the command instead of running it
    pub dry_run: bool,
}

impl RunTask {
    /// Run the task. Returns the exit code of the analysis program, which
    /// becomes the exit code of this process
    pub fn run(&self, out: &mut impl Write) -> Result<i32> {
        let list = GeneList::from_file(&self.path_gene_list)?;
        let gene = self.index_policy.select(&list, self.task_index)?;
        log::info!(
            "Task {} of {}: gene {:?}",
            self.task_index,
            list.len(),
            gene
        );

        let invocation = Invocation::new(
            &self.program,
            gene,
            &self.params,
            self.scratch_dir.as_deref(),
        );

        if self.dry_run {
            writeln!(out, "{}", command_to_string(&invocation.to_command()))?;
            return Ok(0);
        }

        let code = super::dispatch(&invocation)?;

        if let Some((scheduler, job_id)) = &self.accounting {
            super::report_accounting(*scheduler, job_id, out);
        } else {
            log::debug!("No job id known, skipping accounting");
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Error;

    fn task(path_gene_list: PathBuf, task_index: usize) -> RunTask {
        RunTask {
            path_gene_list,
            task_index,
            index_policy: IndexPolicy::Reject,
            program: AnalysisProgram::new("gen_targ_dfs"),
            params: StaticParams {
                verbose: false,
                gene_metadata: PathBuf::from("gene_metadata.bed"),
                target_dir: PathBuf::from("targ"),
                window: 5000,
                enzymes: vec!["cpf1".to_string(), "SpCas9".to_string()],
                reference_dir: PathBuf::from("ref"),
                out_dir: PathBuf::from("results"),
            },
            scratch_dir: None,
            accounting: None,
            dry_run: true,
        }
    }

    fn gene_list(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("genes_hg19.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "BRCA1\nTP53\nEGFR").unwrap();
        path
    }

    #[test]
    fn test_dry_run_prints_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let code = task(gene_list(&dir), 3).run(&mut out).unwrap();
        assert_eq!(code, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "GENE=EGFR gen_targ_dfs --gene_file gene_metadata.bed EGFR targ 5000 cpf1,SpCas9 ref results --window\n"
        );
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = task(gene_list(&dir), 4).run(&mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::TaskIndexOutOfRange { index: 4, len: 3 })
        ));
    }

    #[test]
    fn test_out_of_range_with_placeholder_policy() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = task(gene_list(&dir), 4);
        t.index_policy = IndexPolicy::Placeholder;
        let mut out = Vec::new();
        t.run(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("GENE='' gen_targ_dfs --gene_file gene_metadata.bed '' targ"));
    }

    #[cfg(unix)]
    #[test]
    fn test_accounting_failure_keeps_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = task(gene_list(&dir), 1);
        t.dry_run = false;
        t.program = AnalysisProgram::new("/bin/sh");
        t.program.program_args = vec!["-c".to_string(), "exit 7".to_string()];
        // no scheduler on the test machine, or a job id it has never heard of
        t.accounting = Some((Scheduler::Sge, "genesweep-no-such-job".to_string()));

        let code = t.run(&mut Vec::new()).unwrap();
        assert_eq!(code, 7);
    }
}
