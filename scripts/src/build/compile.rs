use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::info;

use crate::{
    build::artifact::{ContractArtifact, Framework},
    errors::ScriptError,
    utils::command_success_or,
};

/// Compiles the Solidity project and reads back its artifacts
pub struct ArtifactBuilder {
    /// Toolchain used by the project
    framework: Framework,
    /// Root of the contracts project
    project_dir: PathBuf,
    /// Where the compiler writes its artifacts
    artifacts_dir: PathBuf,
}

impl ArtifactBuilder {
    /// Create a builder for the project at `project_dir`
    pub fn new(framework: Framework, project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let artifacts_dir = project_dir.join(framework.default_artifacts_dir());
        ArtifactBuilder {
            framework,
            project_dir,
            artifacts_dir,
        }
    }

    /// Read artifacts from `dir`, relative to the project unless absolute
    pub fn with_artifacts_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.artifacts_dir = self.project_dir.join(dir);
        self
    }

    /// Run the framework compiler inside the project
    pub fn compile(&self) -> Result<(), ScriptError> {
        let [program, args @ ..] = self.framework.compile_command();

        let mut compile_cmd = Command::new(program);
        compile_cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        compile_cmd.current_dir(&self.project_dir);
        compile_cmd.args(args);

        command_success_or(compile_cmd, "Failed to compile the contracts")
    }

    /// Load the compiled artifact of `contract`
    pub fn artifact(&self, contract: &str) -> Result<ContractArtifact, ScriptError> {
        let artifact = ContractArtifact::load(self.framework, &self.artifacts_dir, contract)?;
        info!(
            "Loaded {} ({} bytes of creation code)",
            artifact.name,
            artifact.bytecode.len()
        );
        Ok(artifact)
    }

    /// Root of the contracts project
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Directory the artifacts are read from
    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }
}
