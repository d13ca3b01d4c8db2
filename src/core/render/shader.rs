//=========================================================================
// Shader Sources
//=========================================================================
//
// Loads vertex/fragment source text for a renderer backend.
//
// A stage whose file cannot be read is logged and left empty; the other
// stage still loads. Backends must cope with incomplete programs.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error};

//=== Internal Dependencies ===============================================

use crate::core::error::EngineError;

//=== ShaderStage =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

//=== ShaderProgram =======================================================

/// Source text of a vertex + fragment program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgram {
    vertex: Option<String>,
    fragment: Option<String>,
}

impl ShaderProgram {
    /// Reads both stages. Read failures are logged and skip that stage.
    pub fn load(vertex_path: impl AsRef<Path>, fragment_path: impl AsRef<Path>) -> Self {
        let program = Self {
            vertex: Self::load_stage(ShaderStage::Vertex, vertex_path.as_ref()),
            fragment: Self::load_stage(ShaderStage::Fragment, fragment_path.as_ref()),
        };
        debug!(
            target: "render",
            "Shader program loaded (vertex: {}, fragment: {})",
            program.vertex.is_some(),
            program.fragment.is_some()
        );
        program
    }

    /// Reads one stage's source.
    pub fn read_source(path: &Path) -> Result<String, EngineError> {
        fs::read_to_string(path).map_err(|source| EngineError::ShaderRead {
            path: PathBuf::from(path),
            source,
        })
    }

    fn load_stage(stage: ShaderStage, path: &Path) -> Option<String> {
        match Self::read_source(path) {
            Ok(source) => Some(source),
            Err(err) => {
                error!(target: "render", "{:?} shader skipped: {}", stage, err);
                None
            }
        }
    }

    pub fn source(&self, stage: ShaderStage) -> Option<&str> {
        match stage {
            ShaderStage::Vertex => self.vertex.as_deref(),
            ShaderStage::Fragment => self.fragment.as_deref(),
        }
    }

    /// `true` if both stages loaded.
    pub fn is_complete(&self) -> bool {
        self.vertex.is_some() && self.fragment.is_some()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("kestrel_{}_{}", std::process::id(), name));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_both_stages() {
        let vs = temp_file("ok.vert", "void main() {}");
        let fs_path = temp_file("ok.frag", "void main() { }");

        let program = ShaderProgram::load(&vs, &fs_path);

        assert!(program.is_complete());
        assert_eq!(program.source(ShaderStage::Vertex), Some("void main() {}"));
        let _ = fs::remove_file(vs);
        let _ = fs::remove_file(fs_path);
    }

    #[test]
    fn missing_stage_is_skipped() {
        let fs_path = temp_file("only.frag", "void main() {}");

        let program = ShaderProgram::load("/nonexistent/kestrel.vert", &fs_path);

        assert!(!program.is_complete());
        assert!(program.source(ShaderStage::Vertex).is_none());
        assert!(program.source(ShaderStage::Fragment).is_some());
        let _ = fs::remove_file(fs_path);
    }

    #[test]
    fn read_error_carries_path() {
        let err = ShaderProgram::read_source(Path::new("/nonexistent/x.vert")).unwrap_err();
        match err {
            EngineError::ShaderRead { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/x.vert"))
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
