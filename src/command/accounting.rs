use std::io::Write;
use std::process;

use serde::Serialize;

use crate::runtime::Error;
use crate::utils::command_to_string;

/// Batch systems we know how to talk to
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Scheduler {
    /// Grid engine (SGE, SoGE, UGE): qsub / qstat
    Sge,
    /// Slurm: sbatch / sacct
    Slurm,
}

impl Scheduler {
    /// Guess the scheduler from the variables it sets inside a job
    pub fn detect<F: Fn(&str) -> Option<String>>(lookup: F) -> Option<Scheduler> {
        if lookup("SLURM_JOB_ID").is_some() {
            Some(Scheduler::Slurm)
        } else if lookup("JOB_ID").is_some() || lookup("SGE_TASK_ID").is_some() {
            Some(Scheduler::Sge)
        } else {
            None
        }
    }

    pub fn submit_utility(&self) -> &'static str {
        match self {
            Scheduler::Sge => "qsub",
            Scheduler::Slurm => "sbatch",
        }
    }

    pub fn accounting_command(&self, job_id: &str) -> process::Command {
        match self {
            Scheduler::Sge => {
                let mut cmd = process::Command::new("qstat");
                cmd.arg("-j").arg(job_id);
                cmd
            }
            Scheduler::Slurm => {
                let mut cmd = process::Command::new("sacct");
                cmd.arg("-j")
                    .arg(job_id)
                    .arg("--parsable2")
                    .arg("--format=JobID,JobName,State,ExitCode,Elapsed,MaxRSS");
                cmd
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AccountingEntry {
    pub key: String,
    pub value: String,
}

/// What the scheduler reports about a job: the raw text, plus whatever key/value pairs could be read from it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountingRecord {
    pub job_id: String,
    pub raw: String,
    pub entries: Vec<AccountingEntry>,
}

impl AccountingRecord {
    pub fn parse(scheduler: Scheduler, job_id: &str, raw: &str) -> AccountingRecord {
        let entries = match scheduler {
            Scheduler::Sge => parse_qstat(raw),
            Scheduler::Slurm => parse_sacct(raw),
        };
        AccountingRecord {
            job_id: job_id.to_string(),
            raw: raw.to_string(),
            entries,
        }
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn write_tsv(&self, out: impl Write) -> anyhow::Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(out);
        for entry in &self.entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// `qstat -j` prints one `key:   value` per line, below a row of `=`
fn parse_qstat(raw: &str) -> Vec<AccountingEntry> {
    raw.lines()
        .filter(|line| !line.starts_with('='))
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| AccountingEntry {
            key: key.split_whitespace().collect::<Vec<_>>().join(" "),
            value: value.trim().to_string(),
        })
        .filter(|e| !e.key.is_empty())
        .collect()
}

/// `sacct --parsable2` prints a `|`-separated header and one row per job step.
/// Keys are `<step>.<field>`
fn parse_sacct(raw: &str) -> Vec<AccountingEntry> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .flexible(true)
        .quoting(false)
        .from_reader(raw.as_bytes());
    let header = match reader.headers() {
        Ok(header) => header.clone(),
        Err(e) => {
            log::debug!("Could not read sacct header: {}", e);
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Skipping unreadable sacct row: {}", e);
                continue;
            }
        };
        let step = record.get(0).unwrap_or_default();
        for (name, value) in header.iter().zip(record.iter()).skip(1) {
            entries.push(AccountingEntry {
                key: format!("{}.{}", step, name),
                value: value.to_string(),
            });
        }
    }
    entries
}

pub fn query_accounting(scheduler: Scheduler, job_id: &str) -> Result<AccountingRecord, Error> {
    let mut cmd = scheduler.accounting_command(job_id);
    let cmd_string = command_to_string(&cmd);
    let utility = cmd.get_program().to_string_lossy().to_string();
    log::debug!("Querying accounting: {}", cmd_string);

    let output = cmd.output().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
            Error::utility_not_executable(&utility)
        }
        _ => Error::utility_execution_error(&utility, &cmd_string, Some(e.to_string())),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::utility_execution_error(
            utility,
            cmd_string,
            Some(stderr),
        ));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    Ok(AccountingRecord::parse(scheduler, job_id, &raw))
}

/// Best effort: print the accounting record to `out`. Failures are logged, never returned
pub fn report_accounting(
    scheduler: Scheduler,
    job_id: &str,
    out: &mut impl Write,
) -> Option<AccountingRecord> {
    match query_accounting(scheduler, job_id) {
        Ok(record) => {
            if let Err(e) = out.write_all(record.raw.as_bytes()).and_then(|_| out.flush()) {
                log::warn!("Could not print accounting record for job {}: {}", job_id, e);
            }
            Some(record)
        }
        Err(e) => {
            log::warn!("Accounting record for job {} not available: {}", job_id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QSTAT: &str = "==============================================================
job_number:                 4178042
submission_time:            Tue Mar 12 10:01:44 2019
owner:                      kathleen
hard resource_list:         mem_free=1G,scratch=1G,h_rt=336:00:00
job-array tasks:            1-25867:1
usage    12:                cpu=00:03:01, mem=2.51 GBs, io=0.04, vmem=411.5M, maxvmem=411.5M
";

    const SACCT: &str = "JobID|JobName|State|ExitCode|Elapsed|MaxRSS
812_3|sweep|COMPLETED|0:0|00:03:01|
812_3.batch|batch|COMPLETED|0:0|00:03:01|411M
";

    #[test]
    fn test_parse_qstat() {
        let record = AccountingRecord::parse(Scheduler::Sge, "4178042", QSTAT);
        assert_eq!(record.get("job_number"), Some("4178042"));
        assert_eq!(record.get("job-array tasks"), Some("1-25867:1"));
        assert_eq!(
            record.get("usage 12"),
            Some("cpu=00:03:01, mem=2.51 GBs, io=0.04, vmem=411.5M, maxvmem=411.5M")
        );
        // values with their own colons are kept whole
        assert_eq!(record.get("submission_time"), Some("Tue Mar 12 10:01:44 2019"));
        assert_eq!(record.raw, QSTAT);
    }

    #[test]
    fn test_parse_sacct() {
        let record = AccountingRecord::parse(Scheduler::Slurm, "812", SACCT);
        assert_eq!(record.get("812_3.State"), Some("COMPLETED"));
        assert_eq!(record.get("812_3.batch.MaxRSS"), Some("411M"));
        assert_eq!(record.get("812_3.MaxRSS"), Some(""));
        assert_eq!(record.entries.len(), 10);
    }

    #[test]
    fn test_parse_sacct_short_rows_and_blank_lines() {
        let raw = "JobID|State|ExitCode\n\n815|FAILED\n815.batch|FAILED|7:0\n";
        let record = AccountingRecord::parse(Scheduler::Slurm, "815", raw);
        assert_eq!(record.get("815.State"), Some("FAILED"));
        assert_eq!(record.get("815.ExitCode"), None);
        assert_eq!(record.get("815.batch.ExitCode"), Some("7:0"));
        assert_eq!(record.entries.len(), 3);
        assert!(AccountingRecord::parse(Scheduler::Slurm, "815", "").entries.is_empty());
    }

    #[test]
    fn test_write_tsv() {
        let record = AccountingRecord::parse(Scheduler::Sge, "1", "job_number: 1\nowner: me\n");
        let mut out = Vec::new();
        record.write_tsv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "key\tvalue\njob_number\t1\nowner\tme\n");
    }

    #[test]
    fn test_detect_scheduler() {
        let sge = |k: &str| (k == "JOB_ID").then(|| "1".to_string());
        let slurm = |k: &str| (k == "SLURM_JOB_ID").then(|| "1".to_string());
        assert_eq!(Scheduler::detect(sge), Some(Scheduler::Sge));
        assert_eq!(Scheduler::detect(slurm), Some(Scheduler::Slurm));
        assert_eq!(Scheduler::detect(|_| None), None);
    }
}
