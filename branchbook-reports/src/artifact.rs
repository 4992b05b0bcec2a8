//! Downloadable report artifact and its atomic delivery to disk.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::pipeline::BranchReport;
use crate::{cash_in_hand, passbook, xlsx};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Build the two-sheet workbook for a report
pub fn export_workbook(report: &BranchReport) -> Result<ReportArtifact> {
    let sheets = [passbook::build_sheet(report), cash_in_hand::build_sheet(report)];
    let bytes = xlsx::render_workbook(&sheets, report.config.locale)?;
    Ok(ReportArtifact {
        filename: suggested_filename(report),
        mime_type: XLSX_MIME,
        bytes,
    })
}

/// `passbook_<branch>_<from>_<to>.xlsx`, falling back to the data's own span
pub fn suggested_filename(report: &BranchReport) -> String {
    let branch: String = report
        .config
        .branch_label()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();

    let span = report
        .config
        .date_range
        .map(|r| (r.from, r.to))
        .or_else(|| {
            let first = report.transactions.iter().map(|t| t.txn.date).min()?;
            let last = report.transactions.iter().map(|t| t.txn.date).max()?;
            Some((first, last))
        });

    match span {
        Some((from, to)) => format!(
            "passbook_{}_{}_{}.xlsx",
            branch,
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        ),
        None => format!("passbook_{branch}.xlsx"),
    }
}

/// Write `artifact` into `dir` under its suggested name.
///
/// Bytes go to a uniquely named hidden partial file in the same directory and
/// are renamed into place, so a failed export leaves nothing behind and
/// concurrent exports to one name never share a partial file.
pub async fn write_artifact(artifact: &ReportArtifact, dir: &Path) -> Result<PathBuf> {
    write_bytes_atomic(&artifact.bytes, &dir.join(&artifact.filename)).await
}

pub async fn write_bytes_atomic(bytes: &[u8], target: &Path) -> Result<PathBuf> {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "report".to_string());
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    // Removed on drop unless the rename succeeded
    let partial = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".partial")
        .tempfile_in(dir)?
        .into_temp_path();

    tokio::fs::write(&partial, bytes).await?;
    tokio::fs::rename(&partial, target).await?;
    let _ = partial.keep();

    tracing::info!(path = %target.display(), bytes = bytes.len(), "report written");
    Ok(target.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ReportPipeline;
    use branchbook_core::{DateRange, ReportConfig};
    use chrono::NaiveDate;

    fn empty_report(cfg: ReportConfig) -> BranchReport {
        ReportPipeline::run(&[], &cfg)
    }

    #[test]
    fn test_suggested_filename() {
        let cfg = ReportConfig {
            branch: Some("Kalyan West/2".to_string()),
            date_range: Some(DateRange::new(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            )),
            ..Default::default()
        };
        assert_eq!(
            suggested_filename(&empty_report(cfg)),
            "passbook_Kalyan_West_2_2024-03-01_2024-03-31.xlsx"
        );
        assert_eq!(
            suggested_filename(&empty_report(ReportConfig::default())),
            "passbook_branch.xlsx"
        );
    }

    #[test]
    fn test_export_sets_mime_type() {
        let artifact = export_workbook(&empty_report(ReportConfig::default())).unwrap();
        assert_eq!(artifact.mime_type, XLSX_MIME);
        assert!(!artifact.bytes.is_empty());
    }

    #[tokio::test]
    async fn test_write_artifact_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ReportArtifact {
            filename: "out.xlsx".to_string(),
            mime_type: XLSX_MIME,
            bytes: b"PK-data".to_vec(),
        };
        let path = write_artifact(&artifact, dir.path()).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"PK-data");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(leftovers, vec!["out.xlsx".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_writes_to_one_name() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("same.xlsx");
        let a = vec![b'a'; 64 * 1024];
        let b = vec![b'b'; 64 * 1024];

        let (ra, rb) = tokio::join!(write_bytes_atomic(&a, &target), write_bytes_atomic(&b, &target));
        ra.unwrap();
        rb.unwrap();

        let written = std::fs::read(&target).unwrap();
        assert!(written == a || written == b);
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["same.xlsx".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let artifact = ReportArtifact {
            filename: "out.xlsx".to_string(),
            mime_type: XLSX_MIME,
            bytes: vec![1, 2, 3],
        };
        let err = write_artifact(&artifact, &missing).await.unwrap_err();
        assert!(err.to_string().starts_with("report generation failed"));
        assert!(!missing.join("out.xlsx").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
