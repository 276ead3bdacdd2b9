use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::command::dispatch::DEFAULT_GENE_ENV;
use crate::command::AnalysisProgram;
use crate::command::StaticParams;
use crate::utils::expand_and_resolve_path;

pub const DEFAULT_WINDOW: u32 = 5000;

/// The analysis program and the arguments shared by every task of the sweep
#[derive(Args, Clone, Debug)]
pub struct AnalysisArgs {
    // Program to invoke once per gene
    #[arg(long = "program", env = "GENESWEEP_PROGRAM", value_parser = clap::value_parser!(PathBuf))]
    pub program: PathBuf,

    // Leading argument for the program, e.g. the script when --program is an interpreter. Repeatable
    #[arg(long = "program-arg", allow_hyphen_values = true)]
    pub program_args: Vec<String>,

    // Environment variable that carries the gene into the program
    #[arg(long = "gene-env", default_value = DEFAULT_GENE_ENV)]
    pub gene_env: String,

    // Pass -v to the program
    #[arg(short = 'v', long = "verbose-analysis")]
    pub verbose: bool,

    // Gene metadata file (--gene_file of the program)
    #[arg(long = "gene-metadata", env = "GENESWEEP_GENE_METADATA", value_parser = clap::value_parser!(PathBuf))]
    pub gene_metadata: PathBuf,

    // Directory the program reads targetable sites from
    #[arg(long = "target-dir", value_parser = clap::value_parser!(PathBuf))]
    pub target_dir: PathBuf,

    // Window around each gene, in bp
    #[arg(short = 'w', long = "window", default_value_t = DEFAULT_WINDOW)]
    pub window: u32,

    // Comma separated enzyme identifiers, e.g. cpf1,SpCas9
    #[arg(short = 'e', long = "enzymes", value_delimiter = ',', required = true)]
    pub enzymes: Vec<String>,

    // Reference data directory
    #[arg(long = "reference-dir", env = "GENESWEEP_REFERENCE_DIR", value_parser = clap::value_parser!(PathBuf))]
    pub reference_dir: PathBuf,

    // Result directory
    #[arg(short = 'o', long = "out-dir", value_parser = clap::value_parser!(PathBuf))]
    pub out_dir: PathBuf,
}

impl AnalysisArgs {
    pub fn program(&self) -> AnalysisProgram {
        AnalysisProgram {
            program: self.program.clone(),
            program_args: self.program_args.clone(),
            gene_env: self.gene_env.clone(),
        }
    }

    pub fn static_params(&self) -> StaticParams {
        StaticParams {
            verbose: self.verbose,
            gene_metadata: self.gene_metadata.clone(),
            target_dir: self.target_dir.clone(),
            window: self.window,
            enzymes: self.enzymes.clone(),
            reference_dir: self.reference_dir.clone(),
            out_dir: self.out_dir.clone(),
        }
    }

    /// The same arguments as command-line words, with paths made absolute so
    /// the job script does not depend on where the scheduler starts it.
    /// A bare program name is left alone to be found on PATH
    pub fn to_args(&self) -> Result<Vec<String>> {
        let abs = |p: &PathBuf| -> Result<String> {
            Ok(expand_and_resolve_path(p)?.to_string_lossy().to_string())
        };

        let program = if self.program.components().count() > 1 {
            abs(&self.program)?
        } else {
            self.program.to_string_lossy().to_string()
        };

        let mut words = vec!["--program".to_string(), program];
        for arg in &self.program_args {
            words.push(format!("--program-arg={}", arg));
        }
        if self.gene_env != DEFAULT_GENE_ENV {
            words.push("--gene-env".to_string());
            words.push(self.gene_env.clone());
        }
        if self.verbose {
            words.push("--verbose-analysis".to_string());
        }
        words.extend([
            "--gene-metadata".to_string(),
            abs(&self.gene_metadata)?,
            "--target-dir".to_string(),
            abs(&self.target_dir)?,
            "--window".to_string(),
            self.window.to_string(),
            "--enzymes".to_string(),
            self.enzymes.join(","),
            "--reference-dir".to_string(),
            abs(&self.reference_dir)?,
            "--out-dir".to_string(),
            abs(&self.out_dir)?,
        ]);
        Ok(words)
    }
}
