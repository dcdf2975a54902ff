//! The identity back-end.
//!
//! Its "netlist" is the source itself, so any real synthesizer that is
//! equivalent to it is equivalent to the original module. Every
//! equivalence run includes this baseline, which also makes a run with a
//! single configured synthesizer produce one comparison pair.

use crate::backend::{SynthOutcome, RTL_FILE};
use std::path::{Path, PathBuf};
use std::time::Duration;
use verifuzz_common::{FuzzResult, InternalError};
use verifuzz_tool::ToolStatus;

/// The pass-through back-end.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Configured back-end name.
    pub name: String,
    /// Netlist output filename.
    pub output: PathBuf,
}

impl Identity {
    /// Copies `rtl.v` to the output path; never invokes an external tool.
    pub fn run(&self, dir: &Path) -> FuzzResult<SynthOutcome> {
        std::fs::copy(dir.join(RTL_FILE), dir.join(&self.output))
            .map_err(|e| InternalError::new(format!("cannot copy {RTL_FILE}: {e}")))?;
        Ok(SynthOutcome::new(ToolStatus::Ok, Duration::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SynthBackend;
    use verifuzz_gen::{Generator, Seed};
    use verifuzz_verilog::print_source;

    #[test]
    fn netlist_is_byte_identical_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = Generator::default().sample_source(Seed(1), 3);
        let backend = SynthBackend::identity();
        let outcome = backend.run(&src, dir.path()).unwrap();
        assert!(outcome.status.is_ok());
        let netlist = std::fs::read_to_string(dir.path().join(backend.output_path())).unwrap();
        assert_eq!(netlist, print_source(&src));
    }

    #[test]
    fn missing_rtl_is_an_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let b = Identity {
            name: "identity".to_string(),
            output: "syn_identity.v".into(),
        };
        assert!(b.run(dir.path()).is_err());
    }
}
