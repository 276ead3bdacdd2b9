use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use crate::runtime::Error;

/// Entry stored at index 0, and returned for any index that does not name a gene
pub const PLACEHOLDER: &str = "";

/// Ordered list of gene names, addressed with the scheduler's 1-based task numbering.
///
/// Position 0 holds [`PLACEHOLDER`] so that task `i` maps to line `i` of the file.
/// Blank lines are kept; dropping them would shift every later gene to another task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneList {
    entries: Vec<String>,
}

impl GeneList {
    pub fn from_reader(reader: impl BufRead) -> std::io::Result<GeneList> {
        let mut entries = vec![PLACEHOLDER.to_string()];
        for line in reader.lines() {
            entries.push(line?.trim().to_string());
        }
        Ok(GeneList { entries })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<GeneList, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::gene_list_not_found(path),
            _ => Error::file_not_valid(path, Some(e.to_string())),
        })?;
        let list = GeneList::from_reader(BufReader::new(file))
            .map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;
        log::debug!("Loaded {} genes from {:?}", list.len(), path);
        Ok(list)
    }

    /// Number of genes, not counting the placeholder
    pub fn len(&self) -> usize {
        self.entries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The gene for a task index, or None for index 0 and anything past the end
    pub fn get(&self, task_index: usize) -> Option<&str> {
        if task_index == 0 {
            None
        } else {
            self.entries.get(task_index).map(|s| s.as_str())
        }
    }

    /// Lookup that never fails: index 0 and out-of-range indices give the placeholder
    pub fn resolve(&self, task_index: usize) -> &str {
        self.get(task_index).unwrap_or(PLACEHOLDER)
    }

}

/// Load the gene list and return the gene for one task.
pub fn resolve_gene(task_index: usize, gene_list_path: impl AsRef<Path>) -> Result<String, Error> {
    let list = GeneList::from_file(gene_list_path)?;
    Ok(list.resolve(task_index).to_string())
}

/// What to do when the task index does not name a gene
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum IndexPolicy {
    /// Dispatch anyway, passing the empty placeholder as the gene
    Placeholder,
    /// Fail the task before launching anything
    Reject,
}

impl IndexPolicy {
    pub fn select<'a>(&self, list: &'a GeneList, task_index: usize) -> Result<&'a str, Error> {
        match (self, list.get(task_index)) {
            (IndexPolicy::Reject, Some(gene)) if gene.is_empty() => Err(Error::blank_gene(task_index)),
            (_, Some(gene)) => Ok(gene),
            (IndexPolicy::Placeholder, None) => {
                log::warn!(
                    "Task index {} is outside the gene list (1..={}); dispatching with an empty gene",
                    task_index,
                    list.len()
                );
                Ok(PLACEHOLDER)
            }
            (IndexPolicy::Reject, None) => Err(Error::task_index_out_of_range(task_index, list.len())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn list_of(text: &str) -> GeneList {
        GeneList::from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_one_based_lookup() {
        let list = list_of("geneA\ngeneB\ngeneC\n");
        assert_eq!(list.len(), 3);
        assert_eq!(list.resolve(1), "geneA");
        assert_eq!(list.resolve(2), "geneB");
        assert_eq!(list.resolve(3), "geneC");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let list = list_of("BRCA1  \r\n\tTP53\nEGFR \n");
        assert_eq!(list.len(), 3);
        assert_eq!(list.resolve(1), "BRCA1");
        assert_eq!(list.resolve(2), "TP53");
        assert_eq!(list.resolve(3), "EGFR");
    }

    #[test]
    fn test_blank_lines_keep_positions() {
        let list = list_of("BRCA1\n\nEGFR\n");
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(2), Some(""));
        assert_eq!(list.resolve(3), "EGFR");
    }

    #[test]
    fn test_out_of_range_gives_placeholder() {
        let list = list_of("geneA\ngeneB\ngeneC");
        assert_eq!(list.get(0), None);
        assert_eq!(list.get(4), None);
        assert_eq!(list.resolve(0), PLACEHOLDER);
        assert_eq!(list.resolve(4), PLACEHOLDER);
        assert_eq!(list.resolve(usize::MAX), PLACEHOLDER);
    }

    #[test]
    fn test_index_policy() {
        let list = list_of("geneA\ngeneB");
        assert_eq!(IndexPolicy::Reject.select(&list, 2).unwrap(), "geneB");
        assert_eq!(IndexPolicy::Placeholder.select(&list, 3).unwrap(), PLACEHOLDER);
        assert!(matches!(
            IndexPolicy::Reject.select(&list, 3),
            Err(Error::TaskIndexOutOfRange { index: 3, len: 2 })
        ));
        assert!(matches!(
            IndexPolicy::Reject.select(&list, 0),
            Err(Error::TaskIndexOutOfRange { index: 0, len: 2 })
        ));
    }

    #[test]
    fn test_blank_line_under_index_policy() {
        let list = list_of("BRCA1\n\nEGFR\n");
        assert!(matches!(
            IndexPolicy::Reject.select(&list, 2),
            Err(Error::BlankGene { index: 2 })
        ));
        assert_eq!(IndexPolicy::Placeholder.select(&list, 2).unwrap(), "");
        assert_eq!(IndexPolicy::Reject.select(&list, 3).unwrap(), "EGFR");
    }

    #[test]
    fn test_resolve_gene_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "BRCA1\nTP53\nEGFR").unwrap();

        assert_eq!(resolve_gene(3, f.path()).unwrap(), "EGFR");
        // same file, same index, same answer
        assert_eq!(resolve_gene(3, f.path()).unwrap(), resolve_gene(3, f.path()).unwrap());
        assert_eq!(resolve_gene(7, f.path()).unwrap(), PLACEHOLDER);
    }

    #[test]
    fn test_missing_gene_list() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_gene(1, dir.path().join("genes_hg19.txt")).unwrap_err();
        assert!(matches!(err, Error::GeneListNotFound { .. }));
    }
}
