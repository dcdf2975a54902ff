//! Run-directory archiving.

use std::path::Path;
use verifuzz_common::{FuzzResult, InternalError};

/// Recursively copies a run directory to `dst`.
///
/// Used to set failing runs aside under a `_failed` or `_timeout` suffix
/// before the original is cleaned up.
pub fn copy_dir(src: &Path, dst: &Path) -> FuzzResult<()> {
    std::fs::create_dir_all(dst)
        .map_err(|e| InternalError::new(format!("cannot create {}: {e}", dst.display())))?;
    let entries = std::fs::read_dir(src)
        .map_err(|e| InternalError::new(format!("cannot read {}: {e}", src.display())))?;
    for entry in entries {
        let entry =
            entry.map_err(|e| InternalError::new(format!("cannot list {}: {e}", src.display())))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copy_dir(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(|e| {
                InternalError::new(format!("cannot copy {}: {e}", from.display()))
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_nested_trees() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("run_0");
        std::fs::create_dir_all(src.join("yosys")).unwrap();
        std::fs::write(src.join("rtl.v"), "module top; endmodule\n").unwrap();
        std::fs::write(src.join("yosys").join("synth.ys"), "synth\n").unwrap();

        let dst = dir.path().join("run_0_failed");
        copy_dir(&src, &dst).unwrap();

        assert_eq!(
            std::fs::read_to_string(dst.join("rtl.v")).unwrap(),
            "module top; endmodule\n"
        );
        assert_eq!(
            std::fs::read_to_string(dst.join("yosys").join("synth.ys")).unwrap(),
            "synth\n"
        );
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let r = copy_dir(&dir.path().join("absent"), &dir.path().join("dst"));
        assert!(r.is_err());
    }
}
