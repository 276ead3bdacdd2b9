pub mod accounting;
pub mod dispatch;
pub mod genelist;
pub mod jobscript;
pub mod task;
pub mod task_env;

pub use accounting::query_accounting;
pub use accounting::report_accounting;
pub use accounting::AccountingRecord;
pub use accounting::Scheduler;

pub use dispatch::dispatch;
pub use dispatch::AnalysisProgram;
pub use dispatch::Invocation;
pub use dispatch::StaticParams;

pub use genelist::resolve_gene;
pub use genelist::GeneList;
pub use genelist::IndexPolicy;

pub use jobscript::render_job_script;
pub use jobscript::submit_job_script;
pub use jobscript::ArrayJobSpec;

pub use task::RunTask;
pub use task_env::TaskEnv;
