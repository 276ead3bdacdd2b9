pub mod accounting_cmd;
pub mod analysis_args;
pub mod resolve_cmd;
pub mod run_cmd;
pub mod script_cmd;
pub mod submit_cmd;

pub use accounting_cmd::AccountingCMD;
pub use analysis_args::AnalysisArgs;
pub use resolve_cmd::ResolveCMD;
pub use run_cmd::RunCMD;
pub use script_cmd::ScriptArgs;
pub use script_cmd::ScriptCMD;
pub use submit_cmd::SubmitCMD;
