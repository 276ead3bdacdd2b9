use std::fmt;

use clap::Subcommand;

use crate::cmd;

///////////////////////////////
/// Possible subcommands to parse
#[derive(Subcommand)]
pub enum Commands {
    /// Run one array task: resolve the gene, invoke the analysis program, report accounting
    Run(cmd::RunCMD),
    /// Print the gene assigned to a task index
    Resolve(cmd::ResolveCMD),
    /// Render the array job script for a gene list
    Script(cmd::ScriptCMD),
    /// Render the array job script and hand it to the scheduler
    Submit(cmd::SubmitCMD),
    /// Print the scheduler accounting record of a job
    Accounting(cmd::AccountingCMD),
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cmd = match self {
            Commands::Run(_) => "Run",
            Commands::Resolve(_) => "Resolve",
            Commands::Script(_) => "Script",
            Commands::Submit(_) => "Submit",
            Commands::Accounting(_) => "Accounting",
        };
        write!(f, "{}", cmd)
    }
}
