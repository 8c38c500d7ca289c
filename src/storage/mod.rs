use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const ALLOWED_PROOF_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

/// Conference paper number shown to authors and admins.
pub fn generate_paper_reference() -> String {
    format!(
        "PAP-{}-{}",
        Utc::now().format("%Y%m%d"),
        &Uuid::new_v4().to_string()[..8]
    )
}

pub fn ensure_dirs(upload_folder: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(upload_folder)
}

pub fn is_allowed_proof(filename: &str) -> bool {
    Path::new(&filename.to_lowercase())
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ALLOWED_PROOF_EXTENSIONS.contains(&ext))
}

/// Write an uploaded proof file under a collision-free name and return the
/// URL it will be served at.
pub fn save_proof(
    upload_folder: &Path,
    original_name: &str,
    data: &[u8],
) -> std::io::Result<String> {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("proof");
    let stored = format!("{}_{}", &Uuid::new_v4().to_string()[..8], base);
    std::fs::write(upload_folder.join(&stored), data)?;
    Ok(format!("/uploads/{stored}"))
}

/// Resolve a stored proof URL back to its path. Anything that is not a bare
/// filename under the upload folder resolves to nothing.
pub fn proof_path(upload_folder: &Path, proof_url: &str) -> Option<PathBuf> {
    let filename = proof_url.strip_prefix("/uploads/")?;
    if filename.is_empty() || filename.contains("..") || filename.contains('/') {
        return None;
    }
    Some(upload_folder.join(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_carries_date_and_suffix() {
        let reference = generate_paper_reference();
        assert!(reference.starts_with("PAP-"));
        let parts: Vec<&str> = reference.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn proof_extension_allow_list() {
        assert!(is_allowed_proof("receipt.pdf"));
        assert!(is_allowed_proof("RECEIPT.PNG"));
        assert!(!is_allowed_proof("receipt.exe"));
        assert!(!is_allowed_proof("receipt"));
    }

    #[test]
    fn save_and_resolve_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = save_proof(dir.path(), "receipt.pdf", b"%PDF-1.4").expect("save");
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("_receipt.pdf"));

        let path = proof_path(dir.path(), &url).expect("resolves");
        assert_eq!(std::fs::read(path).expect("read"), b"%PDF-1.4");
    }

    #[test]
    fn traversal_urls_do_not_resolve() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(proof_path(dir.path(), "/uploads/../etc/passwd").is_none());
        assert!(proof_path(dir.path(), "/uploads/a/b.pdf").is_none());
        assert!(proof_path(dir.path(), "/elsewhere/x.pdf").is_none());
        assert!(proof_path(dir.path(), "/uploads/").is_none());
    }

    #[test]
    fn upload_names_keep_only_the_basename() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = save_proof(dir.path(), "../../sneaky.pdf", b"x").expect("save");
        assert!(url.ends_with("_sneaky.pdf"));
        assert!(!url.contains(".."));
    }
}
