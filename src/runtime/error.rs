use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Gene list at {:?} not found.", path)]
    GeneListNotFound { path: std::path::PathBuf },

    #[error("File at {:?} is invalid{}.", path, Error::format_msg_as_detail(msg))]
    FileNotValid {
        path: std::path::PathBuf,
        msg: Option<String>,
    },

    #[error(
        "No task index available{}. Pass --task-index or run inside an array job.",
        Error::format_msg_as_detail(msg)
    )]
    TaskIndexMissing { msg: Option<String> },

    #[error("Task index {index} is outside the gene list (1..={len}).")]
    TaskIndexOutOfRange { index: usize, len: usize },

    #[error("Line {index} of the gene list is blank.")]
    BlankGene { index: usize },

    #[error(
        "Utility '{}' failed on execute \'{}\'{}",
        utility,
        cmd,
        Error::format_msg_as_detail(msg)
    )]
    UtilityExecutionError {
        utility: String,
        cmd: String,
        msg: Option<String>,
    },

    #[error(
        "Failed trying to execute utility '{utility}'. Make sure it is in your $PATH and you have execution permissions."
    )]
    UtilityNotExecutable { utility: String },
}

impl Error {
    #[cold]
    pub fn gene_list_not_found<P: AsRef<std::path::Path>>(path: P) -> Self {
        Error::GeneListNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[cold]
    pub fn file_not_valid<P: AsRef<std::path::Path>, M: Into<String>>(
        path: P,
        msg: Option<M>,
    ) -> Self {
        Error::FileNotValid {
            path: path.as_ref().to_path_buf(),
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn task_index_missing<M: Into<String>>(msg: Option<M>) -> Self {
        Error::TaskIndexMissing {
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn task_index_out_of_range(index: usize, len: usize) -> Self {
        Error::TaskIndexOutOfRange { index, len }
    }

    #[cold]
    pub fn blank_gene(index: usize) -> Self {
        Error::BlankGene { index }
    }

    #[cold]
    pub fn utility_execution_error<U: Into<String>, C: Into<String>, M: Into<String>>(
        utility: U,
        cmd: C,
        msg: Option<M>,
    ) -> Self {
        Error::UtilityExecutionError {
            utility: utility.into(),
            cmd: cmd.into(),
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn utility_not_executable<U: Into<String>>(utility: U) -> Self {
        Error::UtilityNotExecutable {
            utility: utility.into(),
        }
    }

    pub fn format_msg_as_detail(msg: &Option<String>) -> String {
        match msg {
            Some(m) => format!(" ({})", m),
            None => String::new(),
        }
    }
}
